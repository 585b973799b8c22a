use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{
    ConflictResolver, DEFAULT_PEER_TIMEOUT, DEFAULT_PORT, DnsResolver, HostCandidate,
    HostResolver, HttpPeerClient, NameResolver, PeerClient, RingAssigner,
};
use crate::{ConfigError, Layout, NodeIdentity, Result};

/// Default bound on the whole startup resolution.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(30);

/// The outcome of startup resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// The endpoint this process is known by.
    pub local: HostCandidate,
    /// Every member, in ring order.
    pub ring: Vec<HostCandidate>,
    /// The identity to hand to the generator.
    pub identity: NodeIdentity,
}

/// Runs host resolution, ring assignment and conflict resolution once.
///
/// # Example
///
/// ```no_run
/// use ringflake::{Bootstrap, Layout, LockSnowflakeGenerator, SystemClock};
///
/// # async fn run() -> ringflake::Result<()> {
/// let layout = Layout::default();
/// let assignment = Bootstrap::new(layout, 8080)
///     .run(Some("10.0.0.1"), "10.0.0.2,10.0.0.3:9000")
///     .await?;
/// let _generator = LockSnowflakeGenerator::new(assignment.identity, layout, SystemClock::default());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Bootstrap<R = DnsResolver, P = HttpPeerClient> {
    hosts: HostResolver<R>,
    assigner: RingAssigner,
    conflicts: ConflictResolver<P>,
    timeout: Duration,
}

impl Bootstrap<DnsResolver, HttpPeerClient> {
    /// System DNS, HTTP peer queries bounded by the default peer timeout.
    pub fn new(layout: Layout, default_port: u16) -> Self {
        Self::from_parts(
            HostResolver::new(default_port),
            HttpPeerClient::new(DEFAULT_PEER_TIMEOUT),
            layout,
        )
    }
}

impl Default for Bootstrap<DnsResolver, HttpPeerClient> {
    fn default() -> Self {
        Self::new(Layout::default(), DEFAULT_PORT)
    }
}

impl<R, P> Bootstrap<R, P>
where
    R: NameResolver,
    P: PeerClient,
{
    pub fn from_parts(hosts: HostResolver<R>, client: P, layout: Layout) -> Self {
        Self {
            hosts,
            assigner: RingAssigner::new(layout),
            conflicts: ConflictResolver::new(client, layout),
            timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
        }
    }

    /// Replaces the overall deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Derives this process's node identity.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for bad addresses, failed lookups, or when the
    ///   deadline passes ([`ConfigError::BootstrapTimeout`])
    /// - [`Error::CollisionResolution`] if a colliding peer cannot be asked
    ///
    /// [`Error::Config`]: crate::Error::Config
    /// [`Error::CollisionResolution`]: crate::Error::CollisionResolution
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    pub async fn run(&self, self_address: Option<&str>, node_list: &str) -> Result<Assignment> {
        match tokio::time::timeout(self.timeout, self.assign(self_address, node_list)).await {
            Ok(result) => result,
            Err(_) => Err(ConfigError::BootstrapTimeout {
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into()),
        }
    }

    async fn assign(&self, self_address: Option<&str>, node_list: &str) -> Result<Assignment> {
        let resolved = self.hosts.resolve(self_address, node_list).await?;
        let ring = self.assigner.assign(resolved.candidates);
        let candidate = self.assigner.candidate_identity(&resolved.local);
        let identity = self
            .conflicts
            .resolve(&resolved.local, &ring, candidate)
            .await?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            local = %resolved.local.url,
            slot = resolved.local.slot,
            members = ring.len(),
            %identity,
            "node identity assigned"
        );

        Ok(Assignment {
            local: resolved.local,
            ring,
            identity,
        })
    }
}
