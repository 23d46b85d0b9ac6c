use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Account as CoreAccount, DepositRequest, WithdrawRequest};
use crate::exchanges::bitfloor::{conversions, rest::BitfloorRest};
use async_trait::async_trait;
use serde_json::Value;

/// Bitfloor account implementation
pub struct Account<R: RestClient> {
    rest: BitfloorRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: BitfloorRest::new(rest.clone()),
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ExchangeError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ExchangeError::InvalidParameters(format!("{} is required", name)))
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    async fn list_accounts(&self) -> Result<Vec<CoreAccount>, ExchangeError> {
        let accounts = self.rest.accounts().await?;
        Ok(accounts
            .into_iter()
            .map(conversions::convert_bitfloor_account)
            .collect())
    }

    async fn withdraw(&self, request: &WithdrawRequest) -> Result<Value, ExchangeError> {
        let method = required(request.method.as_deref(), "method")?;
        let destination = required(request.destination.as_deref(), "destination")?;
        if request.amount <= rust_decimal::Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }

        self.rest
            .withdraw(
                &request.currency,
                &request.amount.to_string(),
                method,
                destination,
            )
            .await
    }

    async fn deposit(&self, request: &DepositRequest) -> Result<Value, ExchangeError> {
        let source = required(Some(request.source.as_str()), "source")?;
        let code = required(request.code.as_deref(), "code")?;
        self.rest.deposit(source, code).await
    }
}
