use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HeaderScheme, HmacSigner, SecretEncoding};

pub const KEY_HEADER: &str = "bitfloor-key";
pub const SIGN_HEADER: &str = "bitfloor-sign";
pub const PASSPHRASE_HEADER: &str = "bitfloor-passphrase";
pub const VERSION_HEADER: &str = "bitfloor-version";

/// Bitfloor hands out base64 secrets and signs with the decoded bytes
pub const SECRET_ENCODING: SecretEncoding = SecretEncoding::Base64;

pub fn header_scheme() -> HeaderScheme {
    HeaderScheme::new(KEY_HEADER, SIGN_HEADER)
        .with_passphrase_header(PASSPHRASE_HEADER)
        .with_header(VERSION_HEADER, "1")
}

/// Build the signer for a Bitfloor account
pub fn bitfloor_signer(config: &ExchangeConfig) -> Result<HmacSigner, ExchangeError> {
    let signer = HmacSigner::new(
        config.api_key().to_string(),
        config.secret_key(),
        SECRET_ENCODING,
        header_scheme(),
    )?;
    Ok(signer.with_passphrase(config.passphrase_value().map(str::to_string)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::Signer;

    #[test]
    fn test_headers_include_version_and_passphrase() {
        let config = ExchangeConfig::new(
            "bitfloor-signer-test".to_string(),
            "c2VjcmV0LWtleS1ieXRlcw==".to_string(),
        )
        .passphrase("hunter2".to_string());

        let signer = bitfloor_signer(&config).unwrap();
        let headers = signer.sign_request("POST", "/orders", b"nonce=1").unwrap();

        assert_eq!(headers[KEY_HEADER], "bitfloor-signer-test");
        assert_eq!(headers[PASSPHRASE_HEADER], "hunter2");
        assert_eq!(headers[VERSION_HEADER], "1");
        assert!(!headers[SIGN_HEADER].is_empty());
    }

    #[test]
    fn test_undecodable_secret_fails() {
        let config = ExchangeConfig::new("k".to_string(), "***".to_string());
        assert!(matches!(
            bitfloor_signer(&config),
            Err(ExchangeError::AuthError(_))
        ));
    }
}
