use core::future::Future;
use std::{io, net::IpAddr};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{HostCandidate, PeerEntry};
use crate::ConfigError;

/// Default port for entries that do not name one.
pub const DEFAULT_PORT: u16 = 8080;

/// Looks up the address records of a domain name.
pub trait NameResolver {
    /// Returns every address record for `host`, in record order.
    fn lookup(&self, host: &str, port: u16) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send;
}

/// [`NameResolver`] backed by the system resolver via Tokio.
#[derive(Clone, Copy, Debug, Default)]
pub struct DnsResolver;

impl NameResolver for DnsResolver {
    fn lookup(&self, host: &str, port: u16) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send {
        async move {
            let addrs = tokio::net::lookup_host((host, port)).await?;
            Ok(addrs.map(|addr| addr.ip()).collect())
        }
    }
}

/// Self endpoint and the full member list, before ring ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedHosts {
    /// The endpoint this process is known by: the first address of its own
    /// host entry.
    pub local: HostCandidate,
    /// Own endpoints first, then peers in list order. Duplicate URLs keep
    /// their first occurrence.
    pub candidates: Vec<HostCandidate>,
}

/// Turns the configured self address and node list into endpoint URLs.
#[derive(Clone, Debug)]
pub struct HostResolver<R = DnsResolver> {
    resolver: R,
    default_port: u16,
}

impl HostResolver<DnsResolver> {
    pub fn new(default_port: u16) -> Self {
        Self::with_resolver(DnsResolver, default_port)
    }
}

impl Default for HostResolver<DnsResolver> {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

impl<R: NameResolver> HostResolver<R> {
    pub fn with_resolver(resolver: R, default_port: u16) -> Self {
        Self {
            resolver,
            default_port,
        }
    }

    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    /// Resolves one host to its endpoints.
    ///
    /// IP literals are used as is. Anything else must be a valid (IDNA)
    /// domain name and is looked up through the configured
    /// [`NameResolver`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidAddress`] if `host` is not an IP or domain
    /// - [`ConfigError::NoRecords`] if the lookup fails or finds nothing
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub async fn resolve_host(&self, host: &str, port: u16) -> Result<Vec<HostCandidate>, ConfigError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![HostCandidate::new(ip, port)]);
        }

        let ascii = to_ascii_domain(host)?;
        let ips = self
            .resolver
            .lookup(&ascii, port)
            .await
            .map_err(|e| ConfigError::NoRecords {
                host: host.to_owned(),
                reason: e.to_string(),
            })?;
        if ips.is_empty() {
            return Err(ConfigError::NoRecords {
                host: host.to_owned(),
                reason: "no address records".to_owned(),
            });
        }
        Ok(ips.into_iter().map(|ip| HostCandidate::new(ip, port)).collect())
    }

    /// Resolves the self address and every entry of `node_list`.
    ///
    /// `self_address` may be `None`, in which case the machine hostname is
    /// used. `node_list` is a comma-separated list of `host[:port]` items;
    /// blank items are ignored.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from parsing or resolving a single entry aborts
    /// the whole resolution.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub async fn resolve(
        &self,
        self_address: Option<&str>,
        node_list: &str,
    ) -> Result<ResolvedHosts, ConfigError> {
        let hostname;
        let self_address = match self_address.map(str::trim).filter(|s| !s.is_empty()) {
            Some(addr) => addr,
            None => {
                hostname = local_hostname()?;
                hostname.as_str()
            }
        };

        let own = PeerEntry::parse(self_address, self.default_port)?;
        let own = self.resolve_host(own.host, own.port).await?;
        // resolve_host never returns an empty list
        let local = own[0].clone();

        let mut candidates = Vec::with_capacity(own.len());
        push_unique(&mut candidates, own);
        for entry in PeerEntry::parse_list(node_list, self.default_port) {
            let entry = entry?;
            let resolved = self.resolve_host(entry.host, entry.port).await?;
            push_unique(&mut candidates, resolved);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(local = %local, members = candidates.len(), "resolved cluster members");

        Ok(ResolvedHosts { local, candidates })
    }
}

fn push_unique(into: &mut Vec<HostCandidate>, from: Vec<HostCandidate>) {
    for candidate in from {
        if !into.iter().any(|c| c.url == candidate.url) {
            into.push(candidate);
        }
    }
}

/// Validates `host` as a domain name and returns its ASCII form.
fn to_ascii_domain(host: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidAddress {
        host: host.to_owned(),
    };
    let ascii = idna::domain_to_ascii(host).map_err(|_| invalid())?;
    let valid = !ascii.is_empty()
        && ascii.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        });
    if valid { Ok(ascii) } else { Err(invalid()) }
}

/// The machine hostname: `$HOSTNAME` if set, otherwise the name reported by
/// the operating system.
pub fn local_hostname() -> Result<String, ConfigError> {
    hostname_from(std::env::var("HOSTNAME").ok())
}

fn hostname_from(env_value: Option<String>) -> Result<String, ConfigError> {
    if let Some(name) = env_value {
        let name = name.trim();
        if !name.is_empty() {
            return Ok(name.to_owned());
        }
    }
    let name = gethostname::gethostname()
        .into_string()
        .map_err(|raw| ConfigError::Hostname {
            reason: format!("hostname {raw:?} is not valid UTF-8"),
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::Hostname {
            reason: "hostname is empty".to_owned(),
        });
    }
    Ok(name.to_owned())
}
