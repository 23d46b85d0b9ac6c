use crate::core::errors::ExchangeError;
use crate::core::kernel::{Decoded, RestClient};
use crate::exchanges::bitfloor::types::{
    BitfloorAccount, BitfloorBook, BitfloorOrder, BitfloorOrderAck,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// Bitfloor REST API client implementation
#[derive(Debug, Clone)]
pub struct BitfloorRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> BitfloorRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    /// Generic handler for Bitfloor API responses
    ///
    /// Bitfloor reports failures in-band as `{"error": "..."}`, sometimes
    /// with a 200 status.
    fn handle_response<T>(&self, response_value: Value) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        if let Some(error) = response_value.get("error").filter(|e| !e.is_null()) {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            return Err(ExchangeError::rejected(message, response_value.to_string()));
        }

        serde_json::from_value(response_value.clone()).map_err(|e| {
            ExchangeError::malformed(
                format!("Failed to parse Bitfloor response: {}", e),
                response_value.to_string(),
            )
        })
    }

    /// Like `handle_response`, keeping the body for later conversion errors
    fn handle_decoded<T>(&self, response_value: Value) -> Result<Decoded<T>, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let raw = response_value.to_string();
        self.handle_response(response_value)
            .map(|data| Decoded { data, raw })
    }

    #[instrument(skip(self), fields(exchange = "bitfloor"))]
    pub async fn new_order(
        &self,
        product_id: &str,
        side: u8,
        size: &str,
        price: &str,
    ) -> Result<BitfloorOrderAck, ExchangeError> {
        let side = side.to_string();
        let params = [
            ("price", price),
            ("size", size),
            ("product_id", product_id),
            ("side", side.as_str()),
        ];
        let response = self.rest_client.post_form("/order/new", &params, true).await?;
        self.handle_response(response)
    }

    #[instrument(skip(self), fields(exchange = "bitfloor"))]
    pub async fn cancel_order(
        &self,
        product_id: &str,
        order_id: &str,
    ) -> Result<BitfloorOrderAck, ExchangeError> {
        let params = [("product_id", product_id), ("order_id", order_id)];
        let response = self
            .rest_client
            .post_form("/order/cancel", &params, true)
            .await?;
        self.handle_response(response)
    }

    #[instrument(skip(self), fields(exchange = "bitfloor"))]
    pub async fn order_details(
        &self,
        order_id: &str,
    ) -> Result<Decoded<BitfloorOrder>, ExchangeError> {
        let response = self
            .rest_client
            .post_form("/order/details", &[("order_id", order_id)], true)
            .await?;
        self.handle_decoded(response)
    }

    #[instrument(skip(self), fields(exchange = "bitfloor"))]
    pub async fn orders(&self) -> Result<Decoded<Vec<BitfloorOrder>>, ExchangeError> {
        let response = self.rest_client.post_form("/orders", &[], true).await?;
        self.handle_decoded(response)
    }

    #[instrument(skip(self), fields(exchange = "bitfloor"))]
    pub async fn accounts(&self) -> Result<Vec<BitfloorAccount>, ExchangeError> {
        let response = self.rest_client.post_form("/accounts", &[], true).await?;
        self.handle_response(response)
    }

    #[instrument(skip(self, destination), fields(exchange = "bitfloor"))]
    pub async fn withdraw(
        &self,
        currency: &str,
        amount: &str,
        method: &str,
        destination: &str,
    ) -> Result<Value, ExchangeError> {
        let params = [
            ("currency", currency),
            ("amount", amount),
            ("method", method),
            ("destination", destination),
        ];
        let response = self.rest_client.post_form("/withdraw", &params, true).await?;
        self.handle_response(response)
    }

    #[instrument(skip(self, mtgox_code), fields(exchange = "bitfloor"))]
    pub async fn deposit(&self, source: &str, mtgox_code: &str) -> Result<Value, ExchangeError> {
        let params = [("source", source), ("mtgox_code", mtgox_code)];
        let response = self.rest_client.post_form("/deposit", &params, true).await?;
        self.handle_response(response)
    }

    #[instrument(skip(self), fields(exchange = "bitfloor"))]
    pub async fn book_l2(
        &self,
        product_id: &str,
    ) -> Result<Decoded<BitfloorBook>, ExchangeError> {
        let endpoint = format!("/book/l2/{}", urlencoding::encode(product_id));
        let response = self.rest_client.get(&endpoint, &[]).await?;
        self.handle_decoded(response)
    }
}
