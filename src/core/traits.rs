use crate::core::{
    errors::ExchangeError,
    types::{
        Account, CancelConfirmation, DepositRequest, Order, OrderBook, OrderRequest,
        WithdrawRequest,
    },
};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait OrderPlacer {
    /// Place a new limit order, returning the venue-assigned id
    async fn place_order(&self, order: &OrderRequest) -> Result<String, ExchangeError>;

    /// Cancel an order. Cancelling an order that is already gone surfaces
    /// whatever the venue answers.
    async fn cancel_order(
        &self,
        product: &str,
        order_id: &str,
    ) -> Result<CancelConfirmation, ExchangeError>;

    async fn order_details(&self, order_id: &str) -> Result<Order, ExchangeError>;

    /// Currently open orders
    async fn list_orders(&self) -> Result<Vec<Order>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn list_accounts(&self) -> Result<Vec<Account>, ExchangeError>;

    async fn withdraw(&self, request: &WithdrawRequest) -> Result<Value, ExchangeError>;

    async fn deposit(&self, request: &DepositRequest) -> Result<Value, ExchangeError>;
}

/// Everything a trading front end needs from one venue
pub trait Trader: OrderPlacer + AccountInfo + Send + Sync {
    fn exchange_name(&self) -> &'static str;
}

/// A venue's public depth endpoint for one product
#[async_trait]
pub trait BookSource: Send + Sync {
    async fn fetch_book(&self) -> Result<OrderBook, ExchangeError>;

    fn exchange_name(&self) -> &'static str;
}
