mod interface;
mod lock;
mod recovery;
mod status;
#[cfg(test)]
mod tests;

pub use interface::*;
pub use lock::*;
pub use recovery::*;
pub use status::*;
