pub mod align;
pub mod cmd;
pub mod command;
pub mod common;
pub mod experiment;
pub mod fileformat;
pub mod manifest;
pub mod runtime;
pub mod umi;
pub mod utils;
