/// Kernel - shared transport and request signing for every venue
///
/// The kernel contains no venue-specific logic. Adapters plug in their own
/// header names and secret handling through [`HeaderScheme`] and
/// [`SecretEncoding`], and talk to the network only through [`RestClient`].
///
/// ## Signed request pipeline
///
/// 1. The adapter hands `post_form` its payload fields
/// 2. The transport draws a nonce from the signer and appends it
/// 3. The payload is form-urlencoded once; those exact bytes are signed
/// 4. Signature headers are attached and the body is sent
/// 5. The response is decoded as JSON, keeping the raw body on failure
///
/// ```rust,no_run
/// use btctrader::core::kernel::*;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = HmacSigner::new(
///     "api_key".to_string(),
///     "c2VjcmV0",
///     SecretEncoding::Base64,
///     HeaderScheme::new("bitfloor-key", "bitfloor-sign"),
/// )?;
/// let rest = RestClientBuilder::new(RestClientConfig::new(
///     "https://api.bitfloor.com".to_string(),
///     "bitfloor".to_string(),
/// ))
/// .with_signer(Arc::new(signer))
/// .build()?;
///
/// let orders = rest.post_form("/orders", &[], true).await?;
/// # Ok(())
/// # }
/// ```
pub mod nonce;
pub mod rest;
pub mod signer;

pub use nonce::NonceGenerator;
pub use rest::{Decoded, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{HeaderScheme, HmacSigner, SecretEncoding, SignatureResult, Signer};
