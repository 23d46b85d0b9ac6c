use crate::core::errors::ExchangeError;
use crate::core::kernel::{Decoded, RestClient};
use crate::exchanges::mtgox::types::{MtgoxDepth, MtgoxEnvelope, MtgoxInfo, MtgoxOrder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// Mt.Gox REST API client implementation
#[derive(Debug, Clone)]
pub struct MtgoxRest<R: RestClient> {
    rest_client: R,
}

impl<R: RestClient> MtgoxRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    /// Check the envelope for an in-band error and hand back the raw
    /// envelope with it
    fn check_envelope(
        &self,
        response_value: Value,
    ) -> Result<(MtgoxEnvelope, Value), ExchangeError> {
        let envelope: MtgoxEnvelope =
            serde_json::from_value(response_value.clone()).map_err(|e| {
                ExchangeError::malformed(
                    format!("Failed to parse Mt.Gox response: {}", e),
                    response_value.to_string(),
                )
            })?;

        if let Some(error) = envelope.error.as_ref().filter(|e| !e.is_null()) {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            return Err(ExchangeError::rejected(message, response_value.to_string()));
        }

        if envelope.result.as_deref() == Some("error") {
            return Err(ExchangeError::rejected(
                "request failed without an error message",
                response_value.to_string(),
            ));
        }

        Ok((envelope, response_value))
    }

    /// Generic handler for Mt.Gox responses carrying a `return` payload
    fn handle_response<T>(&self, response_value: Value) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let (envelope, raw) = self.check_envelope(response_value)?;
        let data = envelope.data.ok_or_else(|| {
            ExchangeError::malformed("response has no return field", raw.to_string())
        })?;

        serde_json::from_value(data).map_err(|e| {
            ExchangeError::malformed(
                format!("Failed to parse Mt.Gox return payload: {}", e),
                raw.to_string(),
            )
        })
    }

    fn handle_decoded<T>(&self, response_value: Value) -> Result<Decoded<T>, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let raw = response_value.to_string();
        self.handle_response(response_value)
            .map(|data| Decoded { data, raw })
    }

    #[instrument(skip(self), fields(exchange = "mtgox"))]
    pub async fn order_add(
        &self,
        product: &str,
        order_type: &str,
        amount_int: &str,
        price_int: &str,
    ) -> Result<String, ExchangeError> {
        let endpoint = format!("/api/1/{}/private/order/add", urlencoding::encode(product));
        let params = [
            ("type", order_type),
            ("amount_int", amount_int),
            ("price_int", price_int),
        ];
        let response = self.rest_client.post_form(&endpoint, &params, true).await?;
        self.handle_response(response)
    }

    /// Success is the absence of an error; the body carries nothing else of use
    #[instrument(skip(self), fields(exchange = "mtgox"))]
    pub async fn cancel_order(&self, oid: &str) -> Result<(), ExchangeError> {
        let response = self
            .rest_client
            .post_form("/api/0/cancelOrder.php", &[("oid", oid)], true)
            .await?;
        self.check_envelope(response).map(|_| ())
    }

    #[instrument(skip(self), fields(exchange = "mtgox"))]
    pub async fn orders(&self) -> Result<Decoded<Vec<MtgoxOrder>>, ExchangeError> {
        let response = self
            .rest_client
            .post_form("/api/1/generic/private/orders", &[], true)
            .await?;
        self.handle_decoded(response)
    }

    #[instrument(skip(self), fields(exchange = "mtgox"))]
    pub async fn info(&self) -> Result<Decoded<MtgoxInfo>, ExchangeError> {
        let response = self
            .rest_client
            .post_form("/api/1/generic/private/info", &[], true)
            .await?;
        self.handle_decoded(response)
    }

    #[instrument(skip(self, address), fields(exchange = "mtgox"))]
    pub async fn send_bitcoin(
        &self,
        address: &str,
        amount_int: &str,
    ) -> Result<Value, ExchangeError> {
        let params = [("address", address), ("amount_int", amount_int)];
        let response = self
            .rest_client
            .post_form("/api/1/generic/bitcoin/send_simple", &params, true)
            .await?;
        self.handle_response(response)
    }

    /// Public depth; the currency parameter is `USD` followed by the product
    #[instrument(skip(self), fields(exchange = "mtgox"))]
    pub async fn depth(&self, product: &str) -> Result<Decoded<MtgoxDepth>, ExchangeError> {
        let currency = format!("USD{}", product);
        let response = self
            .rest_client
            .get("/api/0/data/getDepth.php", &[("Currency", currency.as_str())])
            .await?;
        let raw = response.to_string();

        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            return Err(ExchangeError::rejected(message, raw));
        }

        // v0 answers bare, later revisions wrap the same shape in `return`
        let depth = match response.get("return") {
            Some(inner) if inner.is_object() => inner.clone(),
            _ => response,
        };

        match serde_json::from_value(depth) {
            Ok(data) => Ok(Decoded { data, raw }),
            Err(e) => Err(ExchangeError::malformed(
                format!("Failed to parse Mt.Gox depth: {}", e),
                raw,
            )),
        }
    }
}
