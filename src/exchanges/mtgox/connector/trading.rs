use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{CancelConfirmation, Order, OrderRequest};
use crate::exchanges::mtgox::{conversions, rest::MtgoxRest};
use async_trait::async_trait;
use tracing::debug;

/// Mt.Gox trading implementation
pub struct Trading<R: RestClient> {
    rest: MtgoxRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: MtgoxRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for Trading<R> {
    async fn place_order(&self, order: &OrderRequest) -> Result<String, ExchangeError> {
        order.validate()?;
        let amount_int = conversions::amount_to_int(order.size)?;
        let price_int = conversions::price_to_int(order.price)?;

        let oid = self
            .rest
            .order_add(
                &order.product,
                conversions::convert_side_to_mtgox(order.side),
                &amount_int,
                &price_int,
            )
            .await?;

        debug!(order_id = %oid, product = %order.product, "mtgox order placed");
        Ok(oid)
    }

    async fn cancel_order(
        &self,
        product: &str,
        order_id: &str,
    ) -> Result<CancelConfirmation, ExchangeError> {
        self.rest.cancel_order(order_id).await?;
        Ok(CancelConfirmation {
            order_id: order_id.to_string(),
            product: product.to_string(),
        })
    }

    /// Mt.Gox has no single-order lookup, so this scans the open orders
    async fn order_details(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.list_orders()
            .await?
            .into_iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| ExchangeError::Rejected {
                message: format!("order {} is not open", order_id),
                raw: None,
            })
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ExchangeError> {
        self.rest.orders().await?.convert(|orders| {
            orders
                .into_iter()
                .map(conversions::convert_mtgox_order)
                .collect()
        })
    }
}
