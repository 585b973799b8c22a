mod base62;
mod error;
mod quoted;

pub use base62::*;
pub use error::*;
pub use quoted::*;
