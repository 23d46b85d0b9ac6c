use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{CancelConfirmation, Order, OrderRequest};
use crate::exchanges::bitfloor::{conversions, rest::BitfloorRest};
use async_trait::async_trait;
use tracing::debug;

/// Bitfloor trading implementation
pub struct Trading<R: RestClient> {
    rest: BitfloorRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: BitfloorRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for Trading<R> {
    async fn place_order(&self, order: &OrderRequest) -> Result<String, ExchangeError> {
        order.validate()?;

        let ack = self
            .rest
            .new_order(
                &order.product,
                conversions::convert_side_to_bitfloor(order.side),
                &order.size.to_string(),
                &order.price.to_string(),
            )
            .await?;

        debug!(order_id = %ack.order_id, product = %order.product, "bitfloor order placed");
        Ok(ack.order_id)
    }

    async fn cancel_order(
        &self,
        product: &str,
        order_id: &str,
    ) -> Result<CancelConfirmation, ExchangeError> {
        let ack = self.rest.cancel_order(product, order_id).await?;
        Ok(CancelConfirmation {
            order_id: ack.order_id,
            product: product.to_string(),
        })
    }

    async fn order_details(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.rest
            .order_details(order_id)
            .await?
            .convert(conversions::convert_bitfloor_order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ExchangeError> {
        self.rest.orders().await?.convert(|orders| {
            orders
                .into_iter()
                .map(conversions::convert_bitfloor_order)
                .collect()
        })
    }
}
