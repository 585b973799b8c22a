use core::fmt;
use std::net::{IpAddr, SocketAddr};

use super::ring_slot;
use crate::ConfigError;

/// One reachable endpoint of a cluster member and its ring slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostCandidate {
    /// `http://<ip>:<port>`, IPv6 addresses in brackets.
    pub url: String,
    /// FNV-1a of `url` modulo [`RING_SIZE`](super::RING_SIZE).
    pub slot: u32,
}

impl HostCandidate {
    /// Builds the candidate for `ip:port`, computing its slot.
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self::from_url(endpoint_url(ip, port))
    }

    /// Builds a candidate from an already formatted endpoint URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let slot = ring_slot(&url);
        Self { url, slot }
    }
}

impl fmt::Display for HostCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (slot {})", self.url, self.slot)
    }
}

/// Formats the URL peers use to reach `ip:port`.
pub fn endpoint_url(ip: IpAddr, port: u16) -> String {
    format!("http://{}", SocketAddr::new(ip, port))
}

/// A `host[:port]` item from a comma-separated node list.
///
/// IPv6 literals with a port must be bracketed (`[::1]:8080`); a bare IPv6
/// literal takes the default port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerEntry<'a> {
    pub host: &'a str,
    pub port: u16,
}

impl<'a> PeerEntry<'a> {
    /// Parses one trimmed, non-empty entry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPeer`] if the host is empty, the port is not a
    /// number in `0..=65535`, or brackets are unbalanced.
    pub fn parse(entry: &'a str, default_port: u16) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPeer {
            entry: entry.to_owned(),
            reason: reason.to_owned(),
        };

        if let Some(rest) = entry.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| invalid("missing closing bracket"))?;
            let port = match tail {
                "" => default_port,
                _ => {
                    let port = tail
                        .strip_prefix(':')
                        .ok_or_else(|| invalid("unexpected text after bracketed address"))?;
                    parse_port(port).ok_or_else(|| invalid("port is not a number in 0..=65535"))?
                }
            };
            if host.is_empty() {
                return Err(invalid("empty host"));
            }
            return Ok(Self { host, port });
        }

        if entry.parse::<IpAddr>().is_ok() {
            return Ok(Self {
                host: entry,
                port: default_port,
            });
        }

        let (host, port) = match entry.split_once(':') {
            None => (entry, default_port),
            Some((host, port)) => (
                host,
                parse_port(port).ok_or_else(|| invalid("port is not a number in 0..=65535"))?,
            ),
        };
        if host.is_empty() {
            return Err(invalid("empty host"));
        }
        Ok(Self { host, port })
    }

    /// Splits a comma-separated list, skipping blank items.
    pub fn parse_list(
        list: &'a str,
        default_port: u16,
    ) -> impl Iterator<Item = Result<Self, ConfigError>> + 'a {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(move |item| Self::parse(item, default_port))
    }
}

fn parse_port(s: &str) -> Option<u16> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
