use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Account as CoreAccount, DepositRequest, WithdrawRequest};
use crate::exchanges::mtgox::{conversions, rest::MtgoxRest};
use async_trait::async_trait;
use serde_json::Value;

/// Mt.Gox account implementation
pub struct Account<R: RestClient> {
    rest: MtgoxRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: MtgoxRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    async fn list_accounts(&self) -> Result<Vec<CoreAccount>, ExchangeError> {
        let mut accounts = self.rest.info().await?.convert(|info| {
            info.wallets
                .iter()
                .map(|(currency, wallet)| conversions::convert_mtgox_wallet(currency, wallet))
                .collect::<Result<Vec<_>, _>>()
        })?;

        // wallets arrive as a map; keep output stable
        accounts.sort_by(|a, b| a.currency.cmp(&b.currency));
        Ok(accounts)
    }

    async fn withdraw(&self, request: &WithdrawRequest) -> Result<Value, ExchangeError> {
        if !request.currency.eq_ignore_ascii_case("BTC") {
            return Err(ExchangeError::NotSupported(format!(
                "mtgox withdrawals are BTC only, got {}",
                request.currency
            )));
        }
        let address = request
            .destination
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                ExchangeError::InvalidParameters("destination is required".to_string())
            })?;
        if request.amount <= rust_decimal::Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }

        let amount_int = conversions::amount_to_int(request.amount)?;
        self.rest.send_bitcoin(address, &amount_int).await
    }

    async fn deposit(&self, _request: &DepositRequest) -> Result<Value, ExchangeError> {
        Err(ExchangeError::NotSupported(
            "mtgox deposits are not available through the API".to_string(),
        ))
    }
}
