//! Peer-to-peer node identity assignment.
//!
//! Every process hashes its own endpoint URL onto a ring of [`RING_SIZE`]
//! slots and uses the slot as its node identity. When a peer landed on the
//! same slot and already claims that identity, the newcomer shifts by one.
//! [`Bootstrap`] runs the whole sequence once at startup.

mod bootstrap;
mod conflict;
mod endpoint;
mod hash;
mod peer;
mod resolver;
mod ring;

pub use bootstrap::*;
pub use conflict::*;
pub use endpoint::*;
pub use hash::*;
pub use peer::*;
pub use resolver::*;
pub use ring::*;
