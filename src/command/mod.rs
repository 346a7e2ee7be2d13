pub mod breakdown;
pub mod manifest_align;

pub use breakdown::Breakdown;
pub use breakdown::BreakdownParams;

pub use manifest_align::EntryOutcome;
pub use manifest_align::ManifestAlign;
pub use manifest_align::ManifestAlignParams;
