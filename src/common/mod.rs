mod consts;
mod readpair;

pub use consts::*;
pub use readpair::*;
