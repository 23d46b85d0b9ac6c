use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HeaderScheme, HmacSigner, SecretEncoding};

pub const KEY_HEADER: &str = "Rest-Key";
pub const SIGN_HEADER: &str = "Rest-Sign";

pub const SECRET_ENCODING: SecretEncoding = SecretEncoding::Base64;

pub fn mtgox_signer(config: &ExchangeConfig) -> Result<HmacSigner, ExchangeError> {
    HmacSigner::new(
        config.api_key().to_string(),
        config.secret_key(),
        SECRET_ENCODING,
        HeaderScheme::new(KEY_HEADER, SIGN_HEADER),
    )
}
