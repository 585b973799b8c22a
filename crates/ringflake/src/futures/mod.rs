mod sleep_provider;
mod snowflake;

pub use sleep_provider::*;
pub use snowflake::*;
