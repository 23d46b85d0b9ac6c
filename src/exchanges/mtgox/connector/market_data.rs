use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::BookSource;
use crate::core::types::OrderBook;
use crate::exchanges::mtgox::{conversions, rest::MtgoxRest};
use async_trait::async_trait;

/// Mt.Gox full depth snapshot for one product
pub struct MarketData<R: RestClient> {
    rest: MtgoxRest<R>,
    product: String,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R, product: impl Into<String>) -> Self {
        Self {
            rest: MtgoxRest::new(rest.clone()),
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
            .depth(&self.product)
            .await?
            .convert(|depth| conversions::convert_mtgox_depth(&depth))
    }

    fn exchange_name(&self) -> &'static str {
        "mtgox"
    }
}
