use core::{num::NonZeroUsize, time::Duration};
use std::net::SocketAddr;

use anyhow::{Context, bail};
use clap::Parser;
use ringflake::{DEFAULT_BASE62_WIDTH, Layout, SystemClock, TimeSource};

/// Runtime configuration for the `ringflake-server` binary.
///
/// All values are parsed from CLI arguments or environment variables. The
/// environment names match what existing deployments already export.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ringflake-server",
    version,
    about = "A URL shortener backed by cluster-unique Snowflake IDs"
)]
pub struct CliArgs {
    /// Address this instance is reachable at by its peers.
    ///
    /// An IP literal or a domain name, optionally with `:port`. Defaults to
    /// the machine hostname.
    ///
    /// Environment variable: `HOST_ADDRESS`
    #[arg(long, env = "HOST_ADDRESS")]
    pub host_address: Option<String>,

    /// Comma-separated `host[:port]` list of every cluster member.
    ///
    /// The list may include this instance; duplicates are ignored. It must
    /// be the same on every member for identities to line up.
    ///
    /// Environment variable: `NODE_LIST`
    #[arg(long, env = "NODE_LIST", default_value_t = String::new())]
    pub node_list: String,

    /// Port peers are assumed to listen on when an entry names none.
    ///
    /// Environment variable: `HOST_PORT`
    #[arg(long, env = "HOST_PORT", default_value_t = 8080)]
    pub host_port: u16,

    /// Socket address to bind. Defaults to `0.0.0.0:<host-port>`.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR")]
    pub server_addr: Option<String>,

    /// Public `host[:port]` used to build short URLs.
    ///
    /// Environment variable: `URL_DOMAIN`
    #[arg(long, env = "URL_DOMAIN", default_value_t = String::from("127.0.0.1:8080"))]
    pub url_domain: String,

    /// Number of base62 digits in a short key (1 to 11).
    ///
    /// Environment variable: `SHORT_ID_WIDTH`
    #[arg(long, env = "SHORT_ID_WIDTH", default_value_t = 9)]
    pub short_id_width: usize,

    /// Maximum number of redirects kept in memory.
    ///
    /// Environment variable: `CACHE_CAPACITY`
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 256)]
    pub cache_capacity: usize,

    /// How long a cached redirect stays valid.
    ///
    /// Environment variable: `CACHE_TTL_SECS`
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Bound on a single peer identity query during startup.
    ///
    /// Environment variable: `PEER_TIMEOUT_MS`
    #[arg(long, env = "PEER_TIMEOUT_MS", default_value_t = 5000)]
    pub peer_timeout_ms: u64,

    /// Bound on the whole identity bootstrap.
    ///
    /// Environment variable: `BOOTSTRAP_TIMEOUT_MS`
    #[arg(long, env = "BOOTSTRAP_TIMEOUT_MS", default_value_t = 30_000)]
    pub bootstrap_timeout_ms: u64,

    /// Pause before bootstrapping, giving headless DNS time to list every
    /// member.
    ///
    /// Environment variable: `STARTUP_DELAY_MS`
    #[arg(long, env = "STARTUP_DELAY_MS", default_value_t = 1000)]
    pub startup_delay_ms: u64,

    /// Generator epoch in milliseconds since 1970-01-01 UTC.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = 1_706_857_834_902)]
    pub epoch_ms: u64,

    /// Timestamp bits of each ID.
    ///
    /// Environment variable: `TIME_BITS`
    #[arg(long, env = "TIME_BITS", default_value_t = 41)]
    pub time_bits: u8,

    /// Node identity bits of each ID.
    ///
    /// Environment variable: `NODE_BITS`
    #[arg(long, env = "NODE_BITS", default_value_t = 10)]
    pub node_bits: u8,

    /// Sequence bits of each ID.
    ///
    /// Environment variable: `STEP_BITS`
    #[arg(long, env = "STEP_BITS", default_value_t = 12)]
    pub step_bits: u8,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host_address: Option<String>,
    pub node_list: String,
    pub host_port: u16,
    pub server_addr: SocketAddr,
    pub url_domain: String,
    pub short_id_width: usize,
    pub cache_capacity: NonZeroUsize,
    pub cache_ttl: Duration,
    pub peer_timeout: Duration,
    pub bootstrap_timeout: Duration,
    pub startup_delay: Duration,
    pub epoch: Duration,
    pub layout: Layout,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.short_id_width == 0 || args.short_id_width > DEFAULT_BASE62_WIDTH {
            bail!(
                "SHORT_ID_WIDTH ({}) must be between 1 and {}",
                args.short_id_width,
                DEFAULT_BASE62_WIDTH
            );
        }

        let Some(cache_capacity) = NonZeroUsize::new(args.cache_capacity) else {
            bail!("CACHE_CAPACITY must be greater than 0");
        };

        if args.peer_timeout_ms == 0 {
            bail!("PEER_TIMEOUT_MS must be greater than 0");
        }
        if args.bootstrap_timeout_ms < args.peer_timeout_ms {
            bail!(
                "BOOTSTRAP_TIMEOUT_MS ({}) must be at least PEER_TIMEOUT_MS ({})",
                args.bootstrap_timeout_ms,
                args.peer_timeout_ms
            );
        }

        let url_domain = args.url_domain.trim().trim_end_matches('/').to_owned();
        if url_domain.is_empty() || url_domain.contains("://") {
            bail!(
                "URL_DOMAIN ({:?}) must be a bare host[:port] without a scheme",
                args.url_domain
            );
        }

        let layout = Layout::new(args.time_bits, args.node_bits, args.step_bits)
            .context("invalid TIME_BITS / NODE_BITS / STEP_BITS")?;

        let epoch = Duration::from_millis(args.epoch_ms);
        let now = SystemClock::with_epoch(epoch).current_millis();
        if !layout.contains_timestamp(now) {
            bail!(
                "current time is {now}ms from EPOCH_MS ({}), outside the {}-bit timestamp range 0..={}",
                args.epoch_ms,
                layout.time_bits(),
                layout.max_timestamp()
            );
        }

        let server_addr = match args.server_addr.as_deref() {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("SERVER_ADDR ({addr}) is not a socket address"))?,
            None => SocketAddr::from(([0, 0, 0, 0], args.host_port)),
        };

        Ok(Self {
            host_address: args.host_address.filter(|h| !h.trim().is_empty()),
            node_list: args.node_list,
            host_port: args.host_port,
            server_addr,
            url_domain,
            short_id_width: args.short_id_width,
            cache_capacity,
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            peer_timeout: Duration::from_millis(args.peer_timeout_ms),
            bootstrap_timeout: Duration::from_millis(args.bootstrap_timeout_ms),
            startup_delay: Duration::from_millis(args.startup_delay_ms),
            epoch,
            layout,
        })
    }
}
