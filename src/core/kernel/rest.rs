use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::Signer;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, trace};

/// REST client trait for making HTTP requests
///
/// Every venue in this crate speaks JSON back, takes public reads as GET
/// and takes authenticated writes as form-urlencoded POST bodies carrying
/// a nonce.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make an unauthenticated GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters as key-value pairs
    async fn get(&self, endpoint: &str, query_params: &[(&str, &str)])
        -> Result<Value, ExchangeError>;

    /// POST a form-urlencoded body
    ///
    /// When `authenticated` is set a `nonce` field is appended to `params`
    /// and the resulting body is signed.
    async fn post_form(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;
}

/// A venue payload decoded into its wire type, with the body it came from
///
/// Converting wire types into crate types can still fail after decoding;
/// `convert` reports that as malformed with the original body attached.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub data: T,
    pub raw: String,
}

impl<T> Decoded<T> {
    pub fn convert<U, F>(self, f: F) -> Result<U, ExchangeError>
    where
        F: FnOnce(T) -> Result<U, String>,
    {
        let Self { data, raw } = self;
        f(data).map_err(|message| ExchangeError::malformed(message, raw))
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Overall request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: "btctrader".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::Transport(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn exchange_name(&self) -> &str {
        &self.config.exchange_name
    }

    /// Build the full URL for an endpoint
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Serialize parameters exactly as they will be signed and sent
    pub fn encode_form(params: &[(&str, &str)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Handle the response and extract JSON
    ///
    /// Non-2xx statuses are venue rejections; the body's `error` string is
    /// used as the message when there is one. A 2xx body that is not JSON
    /// is malformed. Either way the raw body is kept.
    #[instrument(skip(self, response), fields(exchange = %self.config.exchange_name, status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await?;

        trace!("Response body: {}", response_text);

        let parsed = serde_json::from_str::<Value>(&response_text);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ExchangeError::rejected(message, response_text));
        }

        parsed.map_err(|e| {
            ExchangeError::malformed(format!("body was not valid json: {}", e), response_text)
        })
    }

    #[instrument(skip(self, params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint))]
    async fn send_form(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.request(Method::POST, &url);

        let body = if authenticated {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(
                    "Authentication required but no signer provided".to_string(),
                )
            })?;

            // nonce goes in before serialization so the signature covers it
            let nonce = signer.next_nonce().to_string();
            let mut signed_params = params.to_vec();
            signed_params.push(("nonce", nonce.as_str()));
            let body = Self::encode_form(&signed_params);

            let headers = signer.sign_request(Method::POST.as_str(), endpoint, body.as_bytes())?;
            for (key, value) in headers {
                request = request.header(key, value);
            }
            body
        } else {
            Self::encode_form(params)
        };

        let response = request
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Value, ExchangeError> {
        let response = self
            .client
            .get(self.build_url(endpoint))
            .query(query_params)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn post_form(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.send_form(endpoint, params, authenticated).await
    }
}
