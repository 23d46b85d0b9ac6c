use crate::core::errors::ExchangeError;
use crate::core::kernel::nonce::{self, NonceGenerator};
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::collections::HashMap;
use std::sync::Arc;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Result type for signing operations: headers to attach to the request
pub type SignatureResult = Result<HashMap<String, String>, ExchangeError>;

/// Signer trait for request authentication
///
/// The transport asks for a nonce, places it in the payload, serializes the
/// payload, and only then asks for headers over the exact body bytes.
pub trait Signer: Send + Sync {
    /// Next nonce for this signer's credentials
    fn next_nonce(&self) -> u64;

    /// Sign a serialized request body
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `body` - Raw request body bytes, nonce included
    fn sign_request(&self, method: &str, endpoint: &str, body: &[u8]) -> SignatureResult;
}

/// How the configured secret becomes HMAC key bytes
///
/// Venues disagree here and getting it wrong yields valid-looking but
/// rejected signatures, so every adapter states its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretEncoding {
    /// Use the secret's UTF-8 bytes directly
    Raw,
    /// Base64-decode the secret first
    Base64,
}

/// Header names a venue expects on signed requests
#[derive(Debug, Clone)]
pub struct HeaderScheme {
    pub key_header: &'static str,
    pub sign_header: &'static str,
    pub passphrase_header: Option<&'static str>,
    pub extra: Vec<(&'static str, String)>,
}

impl HeaderScheme {
    pub fn new(key_header: &'static str, sign_header: &'static str) -> Self {
        Self {
            key_header,
            sign_header,
            passphrase_header: None,
            extra: Vec::new(),
        }
    }

    pub fn with_passphrase_header(mut self, header: &'static str) -> Self {
        self.passphrase_header = Some(header);
        self
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra.push((name, value.into()));
        self
    }
}

/// HMAC-SHA512 signer producing base64 signatures
pub struct HmacSigner {
    api_key: String,
    key: Zeroizing<Vec<u8>>,
    passphrase: Option<String>,
    scheme: HeaderScheme,
    nonces: Arc<NonceGenerator>,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("scheme", &self.scheme)
            .field("has_passphrase", &self.passphrase.is_some())
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer drawing nonces from the shared generator
    /// for `api_key`
    ///
    /// # Arguments
    /// * `api_key` - API key from the exchange
    /// * `secret_key` - Secret as handed out by the exchange
    /// * `encoding` - How to turn the secret into key bytes
    /// * `scheme` - Which headers carry key and signature
    pub fn new(
        api_key: String,
        secret_key: &str,
        encoding: SecretEncoding,
        scheme: HeaderScheme,
    ) -> Result<Self, ExchangeError> {
        let nonces = nonce::shared_for(&api_key);
        Self::with_nonces(api_key, secret_key, encoding, scheme, nonces)
    }

    pub fn with_nonces(
        api_key: String,
        secret_key: &str,
        encoding: SecretEncoding,
        scheme: HeaderScheme,
        nonces: Arc<NonceGenerator>,
    ) -> Result<Self, ExchangeError> {
        let key = match encoding {
            SecretEncoding::Raw => secret_key.as_bytes().to_vec(),
            SecretEncoding::Base64 => general_purpose::STANDARD
                .decode(secret_key.trim())
                .map_err(|e| ExchangeError::AuthError(format!("Secret is not base64: {}", e)))?,
        };

        if key.is_empty() {
            return Err(ExchangeError::AuthError("Secret key is empty".to_string()));
        }

        Ok(Self {
            api_key,
            key: Zeroizing::new(key),
            passphrase: None,
            scheme,
            nonces,
        })
    }

    pub fn with_passphrase(mut self, passphrase: Option<String>) -> Self {
        self.passphrase = passphrase;
        self
    }

    /// base64(HMAC-SHA512(key, body))
    pub fn signature(&self, body: &[u8]) -> Result<String, ExchangeError> {
        let mut mac = HmacSha512::new_from_slice(&self.key)
            .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
        mac.update(body);
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl Signer for HmacSigner {
    fn next_nonce(&self) -> u64 {
        self.nonces.next()
    }

    fn sign_request(&self, _method: &str, _endpoint: &str, body: &[u8]) -> SignatureResult {
        let mut headers = HashMap::new();
        headers.insert(self.scheme.key_header.to_string(), self.api_key.clone());
        headers.insert(self.scheme.sign_header.to_string(), self.signature(body)?);

        if let (Some(header), Some(passphrase)) = (self.scheme.passphrase_header, &self.passphrase)
        {
            headers.insert(header.to_string(), passphrase.clone());
        }

        for (name, value) in &self.scheme.extra {
            headers.insert((*name).to_string(), value.clone());
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_B64: &str = "c2VjcmV0LWtleS1ieXRlcw==";

    fn scheme() -> HeaderScheme {
        HeaderScheme::new("x-key", "x-sign")
            .with_passphrase_header("x-pass")
            .with_header("x-version", "1")
    }

    fn signer(encoding: SecretEncoding) -> HmacSigner {
        HmacSigner::with_nonces(
            "api".to_string(),
            SECRET_B64,
            encoding,
            scheme(),
            Arc::new(NonceGenerator::new()),
        )
        .unwrap()
    }

    fn reference(key: &[u8], body: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(key).unwrap();
        mac.update(body);
        general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_signature_matches_reference_hmac() {
        let body = b"price=500.00&size=0.1&product_id=BTCUSD&side=0&nonce=1";
        let signed = signer(SecretEncoding::Base64);
        assert_eq!(
            signed.signature(body).unwrap(),
            reference(b"secret-key-bytes", body)
        );
    }

    #[test]
    fn test_secret_encoding_changes_key() {
        let body = b"nonce=1";
        let raw = signer(SecretEncoding::Raw).signature(body).unwrap();
        let decoded = signer(SecretEncoding::Base64).signature(body).unwrap();
        assert_ne!(raw, decoded);
        assert_eq!(raw, reference(SECRET_B64.as_bytes(), body));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signed = signer(SecretEncoding::Base64);
        assert_eq!(signed.signature(b"a=1").unwrap(), signed.signature(b"a=1").unwrap());
        assert_ne!(signed.signature(b"a=1").unwrap(), signed.signature(b"a=2").unwrap());
    }

    #[test]
    fn test_invalid_base64_secret_is_rejected() {
        let result = HmacSigner::new(
            "api".to_string(),
            "not base64!!",
            SecretEncoding::Base64,
            scheme(),
        );
        assert!(matches!(result, Err(ExchangeError::AuthError(_))));
    }

    #[test]
    fn test_headers_follow_scheme() {
        let signed = signer(SecretEncoding::Base64).with_passphrase(Some("pp".to_string()));
        let headers = signed.sign_request("POST", "/orders", b"nonce=7").unwrap();
        assert_eq!(headers["x-key"], "api");
        assert_eq!(headers["x-sign"], reference(b"secret-key-bytes", b"nonce=7"));
        assert_eq!(headers["x-pass"], "pp");
        assert_eq!(headers["x-version"], "1");

        let without = signer(SecretEncoding::Base64)
            .sign_request("POST", "/orders", b"nonce=7")
            .unwrap();
        assert!(!without.contains_key("x-pass"));
    }
}
