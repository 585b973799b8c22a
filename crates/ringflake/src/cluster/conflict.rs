#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{HostCandidate, PeerClient};
use crate::{Error, Layout, NodeIdentity, Result};

/// Settles a slot shared with another member.
///
/// Only one shift is ever applied: if the shifted identity collides again,
/// the two members end up with the same identity. Membership is small and
/// static, so this is left to operators to avoid.
#[derive(Clone, Debug)]
pub struct ConflictResolver<P> {
    client: P,
    layout: Layout,
}

impl<P: PeerClient> ConflictResolver<P> {
    pub fn new(client: P, layout: Layout) -> Self {
        Self { client, layout }
    }

    /// Confirms or shifts the identity `candidate` that `local` claims.
    ///
    /// Every other endpoint on `local`'s slot is asked for its identity, in
    /// ring order. The first one that already reports `candidate` makes this
    /// process take `candidate + 1` (wrapping within the node field), and no
    /// further peers are asked.
    ///
    /// # Errors
    ///
    /// [`Error::CollisionResolution`] if any peer that had to be asked could
    /// not answer. Without an answer the identity cannot be trusted.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, ring), fields(local = %local.url))
    )]
    pub async fn resolve(
        &self,
        local: &HostCandidate,
        ring: &[HostCandidate],
        candidate: NodeIdentity,
    ) -> Result<NodeIdentity> {
        let colliding = ring
            .iter()
            .filter(|peer| peer.slot == local.slot && peer.url != local.url);

        for peer in colliding {
            let claimed = self
                .client
                .node_identity(&peer.url)
                .await
                .map_err(|source| Error::CollisionResolution {
                    peer: peer.url.clone(),
                    source,
                })?;

            if claimed == candidate {
                let shifted = self.layout.node_identity(candidate.get() + 1);
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    peer = %peer.url,
                    slot = local.slot,
                    from = %candidate,
                    to = %shifted,
                    "slot already claimed by peer, shifting identity"
                );
                return Ok(shifted);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(peer = %peer.url, %claimed, "peer shares slot but not identity");
        }
        Ok(candidate)
    }
}
