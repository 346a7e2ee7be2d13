mod manifest;

pub use manifest::{Manifest, ManifestEntry};
