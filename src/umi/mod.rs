mod umi_dedup;

pub use umi_dedup::*;
