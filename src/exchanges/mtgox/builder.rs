use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::mtgox::{
    connector::{MarketData, MtgoxConnector},
    signer::mtgox_signer,
};
use std::sync::Arc;

pub const DEFAULT_HOST: &str = "mtgox.com";
pub const USER_AGENT: &str = "btctrader";

/// Builder for creating Mt.Gox connectors and book sources
pub struct MtgoxBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
}

impl Default for MtgoxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MtgoxBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: 30,
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    fn rest_client(&self) -> Result<ReqwestRest, ExchangeError> {
        let rest_config = RestClientConfig::new(
            self.config.resolve_base_url(DEFAULT_HOST),
            "mtgox".to_string(),
        )
        .with_timeout(self.rest_timeout)
        .with_user_agent(USER_AGENT.to_string());

        let mut rest_builder = RestClientBuilder::new(rest_config);
        if self.config.has_credentials() {
            rest_builder = rest_builder.with_signer(Arc::new(mtgox_signer(&self.config)?));
        }

        rest_builder.build()
    }

    pub fn build(self) -> Result<MtgoxConnector<ReqwestRest>, ExchangeError> {
        Ok(MtgoxConnector::new(self.rest_client()?))
    }

    pub fn build_book(
        self,
        product: impl Into<String>,
    ) -> Result<MarketData<ReqwestRest>, ExchangeError> {
        Ok(MarketData::new(&self.rest_client()?, product))
    }
}

pub fn build_connector(config: ExchangeConfig) -> Result<MtgoxConnector<ReqwestRest>, ExchangeError> {
    MtgoxBuilder::new().with_config(config).build()
}

pub fn build_book(
    config: ExchangeConfig,
    product: impl Into<String>,
) -> Result<MarketData<ReqwestRest>, ExchangeError> {
    MtgoxBuilder::new().with_config(config).build_book(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{AccountInfo, BookSource, Trader};
    use crate::core::types::DepositRequest;

    #[test]
    fn test_build_mtgox_connector() {
        let config = ExchangeConfig::new(
            "mtgox-builder-test".to_string(),
            "c2VjcmV0LWtleS1ieXRlcw==".to_string(),
        );
        let connector = build_connector(config).unwrap();
        assert_eq!(connector.exchange_name(), "mtgox");
    }

    #[test]
    fn test_build_mtgox_book() {
        let book = build_book(ExchangeConfig::read_only(), "").unwrap();
        assert_eq!(book.exchange_name(), "mtgox");
    }

    #[tokio::test]
    async fn test_deposit_is_not_supported() {
        let connector = build_connector(ExchangeConfig::read_only()).unwrap();
        let err = connector
            .deposit(&DepositRequest {
                source: "bitfloor".to_string(),
                code: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NotSupported(_)));
    }
}
