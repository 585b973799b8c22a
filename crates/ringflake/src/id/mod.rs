mod layout;
mod node;
mod snowflake;

pub use layout::*;
pub use node::*;
pub use snowflake::*;
