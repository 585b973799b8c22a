use core::{future::Future, time::Duration};

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{StatusCode, Uri};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

use crate::NodeIdentity;

/// Path every node serves its identity on.
pub const NODE_PATH: &str = "/node";

/// Default bound on a single peer query.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a peer could not tell us its identity.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PeerError {
    #[error("invalid peer URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("peer answered with status {0}")]
    Status(StatusCode),

    #[error("peer answered with a body that is not a node identity: {body:?}")]
    InvalidBody { body: String },

    #[error("no answer within {millis}ms")]
    Timeout { millis: u64 },
}

/// Asks another cluster member for its node identity.
pub trait PeerClient {
    /// Fetches `GET <url>/node` and parses the decimal body.
    fn node_identity(&self, url: &str) -> impl Future<Output = Result<NodeIdentity, PeerError>> + Send;
}

/// [`PeerClient`] speaking HTTP/1 through a pooled hyper client.
#[derive(Clone, Debug)]
pub struct HttpPeerClient {
    client: Client<HttpConnector, Empty<Bytes>>,
    timeout: Duration,
}

impl Default for HttpPeerClient {
    fn default() -> Self {
        Self::new(DEFAULT_PEER_TIMEOUT)
    }
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, uri: Uri) -> Result<NodeIdentity, PeerError> {
        let response = self.client.get(uri).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status(status));
        }
        let body = response.into_body().collect().await?.to_bytes();
        parse_identity(&body)
    }
}

impl PeerClient for HttpPeerClient {
    fn node_identity(&self, url: &str) -> impl Future<Output = Result<NodeIdentity, PeerError>> + Send {
        async move {
            let target = format!("{}{NODE_PATH}", url.trim_end_matches('/'));
            let uri = target.parse::<Uri>().map_err(|e| PeerError::InvalidUrl {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
            tokio::time::timeout(self.timeout, self.fetch(uri))
                .await
                .map_err(|_| PeerError::Timeout {
                    millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                })?
        }
    }
}

/// Parses the body of a `/node` response: a decimal integer, surrounding
/// whitespace allowed.
pub fn parse_identity(body: &[u8]) -> Result<NodeIdentity, PeerError> {
    let invalid = || PeerError::InvalidBody {
        body: String::from_utf8_lossy(body).into_owned(),
    };
    let text = core::str::from_utf8(body).map_err(|_| invalid())?;
    text.trim()
        .parse::<u64>()
        .map(NodeIdentity::new)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_bodies() {
        assert_eq!(parse_identity(b"175").unwrap(), NodeIdentity::new(175));
        assert_eq!(parse_identity(b" 42\n").unwrap(), NodeIdentity::new(42));
        let bad: [&[u8]; 5] = [b"", b"-1", b"abc", b"\"7\"", &[0xff, 0xfe]];
        for bad in bad {
            assert!(matches!(
                parse_identity(bad),
                Err(PeerError::InvalidBody { .. })
            ));
        }
    }

    #[tokio::test]
    async fn rejects_unparsable_urls() {
        let err = HttpPeerClient::default()
            .node_identity("http://bad host")
            .await
            .unwrap_err();
        assert!(matches!(err, PeerError::InvalidUrl { .. }));
    }
}
