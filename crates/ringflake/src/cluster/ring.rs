use super::HostCandidate;
use crate::{Layout, NodeIdentity};

/// Orders cluster endpoints on the identity ring and derives the local
/// candidate identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct RingAssigner {
    layout: Layout,
}

impl RingAssigner {
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Sorts candidates by slot. Ties keep their input order.
    pub fn assign(&self, candidates: impl IntoIterator<Item = HostCandidate>) -> Vec<HostCandidate> {
        let mut ring: Vec<_> = candidates.into_iter().collect();
        ring.sort_by_key(|c| c.slot);
        ring
    }

    /// The identity `local` claims before any collision check: its slot,
    /// masked to the layout's node field.
    pub fn candidate_identity(&self, local: &HostCandidate) -> NodeIdentity {
        self.layout.node_identity(u64::from(local.slot))
    }
}
