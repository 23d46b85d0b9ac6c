use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::traits::{BookSource, Trader};
use crate::exchanges::{bitfloor, mtgox};
use crate::tracking::book::{L1BookTracker, DEFAULT_REFRESH_INTERVAL};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Supported venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    Bitfloor,
    Mtgox,
}

impl Exchange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bitfloor => "bitfloor",
            Self::Mtgox => "mtgox",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Bitfloor, Self::Mtgox]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitfloor" => Ok(Self::Bitfloor),
            "mtgox" => Ok(Self::Mtgox),
            _ => Err(ExchangeError::UnsupportedExchange(s.to_string())),
        }
    }
}

/// Wire protocol used to reach a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Rest,
}

impl FromStr for Protocol {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            _ => Err(ExchangeError::UnsupportedProtocol(s.to_string())),
        }
    }
}

/// Book depth a tracker maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    L1,
}

impl FromStr for Depth {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L1" | "l1" => Ok(Self::L1),
            other => Err(ExchangeError::InvalidParameters(format!(
                "only L1 books are supported, got {:?}",
                other
            ))),
        }
    }
}

fn default_protocol() -> String {
    "rest".to_string()
}

fn default_depth() -> String {
    "L1".to_string()
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

const fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

/// What to trade on and with which credentials
///
/// Deserializes from the flat config-file shape
/// `{exchange, protocol?, host, port?, api_key, sec_key, passphrase?}`.
/// Names are kept as text so unknown ones surface as typed errors from
/// [`TraderFactory::create`] rather than as parse failures.
#[derive(Debug, Clone, Deserialize)]
pub struct TraderSpec {
    pub exchange: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(flatten)]
    pub config: ExchangeConfig,
}

impl TraderSpec {
    pub fn new(exchange: impl Into<String>, config: ExchangeConfig) -> Self {
        Self {
            exchange: exchange.into(),
            protocol: default_protocol(),
            config,
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }
}

/// Which book to watch and how often
#[derive(Debug, Clone, Deserialize)]
pub struct BookSpec {
    pub exchange: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_depth")]
    pub depth: String,
    pub product: String,
    #[serde(flatten)]
    pub config: ExchangeConfig,
    /// Milliseconds in config files
    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "deserialize_millis"
    )]
    pub refresh_interval: Duration,
}

impl BookSpec {
    pub fn new(exchange: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            protocol: default_protocol(),
            depth: default_depth(),
            product: product.into(),
            config: ExchangeConfig::read_only(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_depth(mut self, depth: impl Into<String>) -> Self {
        self.depth = depth.into();
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }
}

/// Factory for trading connectors
pub struct TraderFactory;

impl TraderFactory {
    /// Build a trader for the venue named in `spec`; no I/O happens here
    pub fn create(spec: TraderSpec) -> Result<Box<dyn Trader>, ExchangeError> {
        let exchange: Exchange = spec.exchange.parse()?;
        spec.protocol.parse::<Protocol>()?;

        info!(%exchange, "creating trader");
        match exchange {
            Exchange::Bitfloor => Ok(Box::new(bitfloor::build_connector(spec.config)?)),
            Exchange::Mtgox => Ok(Box::new(mtgox::build_connector(spec.config)?)),
        }
    }
}

/// Factory for top-of-book trackers
pub struct BookFactory;

impl BookFactory {
    pub fn create_source(spec: &BookSpec) -> Result<Arc<dyn BookSource>, ExchangeError> {
        let exchange: Exchange = spec.exchange.parse()?;
        spec.protocol.parse::<Protocol>()?;
        spec.depth.parse::<Depth>()?;

        if spec.product.trim().is_empty() && exchange == Exchange::Bitfloor {
            return Err(ExchangeError::InvalidParameters(
                "bitfloor books need a product id".to_string(),
            ));
        }

        let config = spec.config.clone();
        let product = spec.product.clone();
        match exchange {
            Exchange::Bitfloor => Ok(Arc::new(bitfloor::build_book(config, product)?)),
            Exchange::Mtgox => Ok(Arc::new(mtgox::build_book(config, product)?)),
        }
    }

    /// Build an idle tracker; call `spawn` or `poll_once` to start fetching
    pub fn create(spec: BookSpec) -> Result<L1BookTracker, ExchangeError> {
        if spec.refresh_interval.is_zero() {
            return Err(ExchangeError::InvalidParameters(
                "refresh interval must be positive".to_string(),
            ));
        }

        let source = Self::create_source(&spec)?;
        info!(
            exchange = %spec.exchange,
            product = %spec.product,
            interval_ms = spec.refresh_interval.as_millis() as u64,
            "creating L1 book tracker"
        );
        Ok(L1BookTracker::new(source).with_refresh_interval(spec.refresh_interval))
    }
}
