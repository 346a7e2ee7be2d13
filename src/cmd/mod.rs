pub mod breakdown_cmd;
pub mod manifest_align_cmd;

pub use breakdown_cmd::BreakdownCMD;
pub use manifest_align_cmd::ManifestAlignCMD;
