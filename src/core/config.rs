use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Credentials and endpoint for one venue
///
/// Owned by the trader or tracker built from it; nothing here is shared
/// process-wide.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Option<Secret<String>>,
    pub host: String,
    pub port: Option<u16>,
    pub base_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 6)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field(
            "passphrase",
            &self.passphrase.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.serialize_field("host", &self.host)?;
        state.serialize_field("port", &self.port)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            #[serde(default)]
            api_key: String,
            #[serde(default, alias = "sec_key")]
            secret_key: String,
            passphrase: Option<String>,
            #[serde(default)]
            host: String,
            port: Option<u16>,
            base_url: Option<String>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: helper.passphrase.map(Secret::new),
            host: helper.host,
            port: helper.port,
            base_url: helper.base_url,
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: None,
            host: String::new(),
            port: None,
            base_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `BITFLOOR_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY`
    /// - `{EXCHANGE}_HOST`
    /// - `{EXCHANGE}_PORT` (optional)
    /// - `{EXCHANGE}_PASSPHRASE` (optional)
    /// - `{EXCHANGE}_BASE_URL` (optional, overrides host and port)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let var = |name: &str| format!("{}_{}", prefix, name);

        let api_key = env::var(var("API_KEY"))
            .map_err(|_| ConfigError::MissingEnvironmentVariable(var("API_KEY")))?;
        let secret_key = env::var(var("SECRET_KEY"))
            .map_err(|_| ConfigError::MissingEnvironmentVariable(var("SECRET_KEY")))?;
        let host = env::var(var("HOST"))
            .map_err(|_| ConfigError::MissingEnvironmentVariable(var("HOST")))?;

        let port = match env::var(var("PORT")) {
            Ok(raw) => Some(raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!("{}: {}", var("PORT"), e))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: env::var(var("PASSPHRASE")).ok().map(Secret::new),
            host,
            port,
            base_url: env::var(var("BASE_URL")).ok(),
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no file, fall through to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Configuration for public market data only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = Some(Secret::new(passphrase));
        self
    }

    /// Set custom base URL, bypassing host/port derivation
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Resolve the REST base URL
    ///
    /// Port 443 (or no port) means TLS on the bare host; any other port is
    /// plain HTTP, which is how venue test servers are reached.
    pub fn resolve_base_url(&self, default_host: &str) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }

        let host = if self.host.is_empty() {
            default_host
        } else {
            self.host.as_str()
        };

        match self.port {
            None | Some(443) => format!("https://{}", host),
            Some(port) => format!("http://{}:{}", host, port),
        }
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    pub fn passphrase_value(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.expose_secret().as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_redacts_secrets() {
        let config = ExchangeConfig::new("key".to_string(), "c2VjcmV0".to_string())
            .passphrase("hunter2".to_string())
            .host("api.bitfloor.com");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("c2VjcmV0"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("api.bitfloor.com"));
    }

    #[test]
    fn test_deserialize_config_file_shape() {
        let config: ExchangeConfig = serde_json::from_str(
            r#"{"host":"api.bitfloor.com","port":443,"api_key":"k","sec_key":"s"}"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), "k");
        assert_eq!(config.secret_key(), "s");
        assert!(config.passphrase.is_none());
        assert!(config.has_credentials());
    }

    #[test]
    fn test_base_url_resolution() {
        let tls = ExchangeConfig::read_only().host("api.bitfloor.com").port(443);
        assert_eq!(tls.resolve_base_url("x"), "https://api.bitfloor.com");

        let plain = ExchangeConfig::read_only().host("localhost").port(8080);
        assert_eq!(plain.resolve_base_url("x"), "http://localhost:8080");

        let defaulted = ExchangeConfig::read_only();
        assert_eq!(defaulted.resolve_base_url("mtgox.com"), "https://mtgox.com");

        let overridden = ExchangeConfig::read_only().base_url("http://127.0.0.1:9/".to_string());
        assert_eq!(overridden.resolve_base_url("x"), "http://127.0.0.1:9");
    }

    #[test]
    fn test_read_only_has_no_credentials() {
        assert!(!ExchangeConfig::read_only().has_credentials());
    }
}
