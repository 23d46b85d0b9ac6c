use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::bitfloor::{
    connector::{BitfloorConnector, MarketData},
    signer::bitfloor_signer,
};
use std::sync::Arc;

pub const DEFAULT_HOST: &str = "api.bitfloor.com";

/// Builder for creating Bitfloor connectors and book sources
pub struct BitfloorBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
}

impl Default for BitfloorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BitfloorBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: 30,
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    fn rest_client(&self) -> Result<ReqwestRest, ExchangeError> {
        let rest_config = RestClientConfig::new(
            self.config.resolve_base_url(DEFAULT_HOST),
            "bitfloor".to_string(),
        )
        .with_timeout(self.rest_timeout);

        let mut rest_builder = RestClientBuilder::new(rest_config);

        // read-only configs still get a client; signed calls then fail with AuthError
        if self.config.has_credentials() {
            rest_builder = rest_builder.with_signer(Arc::new(bitfloor_signer(&self.config)?));
        }

        rest_builder.build()
    }

    /// Build a trading connector
    pub fn build(self) -> Result<BitfloorConnector<ReqwestRest>, ExchangeError> {
        Ok(BitfloorConnector::new(self.rest_client()?))
    }

    /// Build a public book source for one product
    pub fn build_book(
        self,
        product: impl Into<String>,
    ) -> Result<MarketData<ReqwestRest>, ExchangeError> {
        Ok(MarketData::new(&self.rest_client()?, product))
    }
}

pub fn build_connector(
    config: ExchangeConfig,
) -> Result<BitfloorConnector<ReqwestRest>, ExchangeError> {
    BitfloorBuilder::new().with_config(config).build()
}

pub fn build_book(
    config: ExchangeConfig,
    product: impl Into<String>,
) -> Result<MarketData<ReqwestRest>, ExchangeError> {
    BitfloorBuilder::new().with_config(config).build_book(product)
}
