use core::fmt;

/// The small integer that distinguishes this process inside the cluster.
///
/// Built once during startup (see [`Bootstrap`]) and never mutated afterwards,
/// so it can be copied freely into request handlers.
///
/// [`Bootstrap`]: crate::cluster::Bootstrap
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdentity(u64);

impl NodeIdentity {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
