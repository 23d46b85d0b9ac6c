use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::BookSource;
use crate::core::types::OrderBook;
use crate::exchanges::bitfloor::{conversions, rest::BitfloorRest};
use async_trait::async_trait;

/// Bitfloor level 2 book for one product
pub struct MarketData<R: RestClient> {
    rest: BitfloorRest<R>,
    product: String,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R, product: impl Into<String>) -> Self {
        Self {
            rest: BitfloorRest::new(rest.clone()),
            product: product.into(),
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> BookSource for MarketData<R> {
    async fn fetch_book(&self) -> Result<OrderBook, ExchangeError> {
        self.rest
            .book_l2(&self.product)
            .await?
            .convert(|book| conversions::convert_bitfloor_book(&book))
    }

    fn exchange_name(&self) -> &'static str {
        "bitfloor"
    }
}
