//! Coordinator-free Snowflake IDs.
//!
//! A process first derives a small [`NodeIdentity`] from its position on a
//! hash ring of cluster endpoints ([`Bootstrap`], behind the `cluster`
//! feature). It then mints time-ordered 64-bit [`SnowflakeId`]s with a
//! [`LockSnowflakeGenerator`], laid out as timestamp, node and sequence
//! fields according to a [`Layout`].
//!
//! ```
//! use ringflake::{Layout, LockSnowflakeGenerator, NodeIdentity, SystemClock};
//!
//! let layout = Layout::default();
//! let generator = LockSnowflakeGenerator::new(NodeIdentity::new(42), layout, SystemClock::default());
//!
//! let id = generator.generate().unwrap();
//! assert_eq!(layout.node(id), 42);
//! assert_eq!(id.to_base62(11).len(), 11);
//! assert_eq!(id.to_string().parse::<ringflake::SnowflakeId>().unwrap(), id);
//! ```
//!
//! ## Features
//!
//! - `async-tokio`: [`SnowflakeGeneratorAsyncExt`] and [`TokioSleep`]
//! - `cluster`: host resolution, ring assignment and peer conflict checks
//! - `serde`: quoted-decimal (de)serialization of [`SnowflakeId`]
//! - `tracing`: spans and events for generation and bootstrap
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "cluster")]
mod cluster;
mod encoding;
mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

#[cfg(feature = "cluster")]
pub use crate::cluster::*;
pub use crate::encoding::*;
pub use crate::error::*;
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
