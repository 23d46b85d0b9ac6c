use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, OrderPlacer, Trader};
use crate::core::types::{
    Account as CoreAccount, CancelConfirmation, DepositRequest, Order, OrderRequest,
    WithdrawRequest,
};
use async_trait::async_trait;
use serde_json::Value;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// Mt.Gox connector that composes all sub-trait implementations
pub struct MtgoxConnector<R: RestClient> {
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient + Clone + Send + Sync> MtgoxConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            trading: Trading::new(&rest),
            account: Account::new(&rest),
        }
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> OrderPlacer for MtgoxConnector<R> {
    async fn place_order(&self, order: &OrderRequest) -> Result<String, ExchangeError> {
        self.trading.place_order(order).await
    }

    async fn cancel_order(
        &self,
        product: &str,
        order_id: &str,
    ) -> Result<CancelConfirmation, ExchangeError> {
        self.trading.cancel_order(product, order_id).await
    }

    async fn order_details(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.trading.order_details(order_id).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ExchangeError> {
        self.trading.list_orders().await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> AccountInfo for MtgoxConnector<R> {
    async fn list_accounts(&self) -> Result<Vec<CoreAccount>, ExchangeError> {
        self.account.list_accounts().await
    }

    async fn withdraw(&self, request: &WithdrawRequest) -> Result<Value, ExchangeError> {
        self.account.withdraw(request).await
    }

    async fn deposit(&self, request: &DepositRequest) -> Result<Value, ExchangeError> {
        self.account.deposit(request).await
    }
}

impl<R: RestClient + Clone + Send + Sync> Trader for MtgoxConnector<R> {
    fn exchange_name(&self) -> &'static str {
        "mtgox"
    }
}
