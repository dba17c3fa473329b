//! Adapter Configuration Settings
//!
//! Configuration types for the adapter, loaded from environment variables.
//! Every setting except the API key has a default.

use std::collections::HashMap;
use std::time::Duration;

use crate::application::use_cases::JobDefaults;
use crate::domain::pricing::QuoteAssetResolver;
use crate::domain::shared::{AssetCode, Interval, Region};
use crate::infrastructure::market_data::{KaikoConfig, RetryConfig};

/// Prefix of per-base quote list overrides, e.g. `QUOTE_ASSETS_LINK`.
const QUOTE_OVERRIDE_PREFIX: &str = "QUOTE_ASSETS_";

/// How the binary receives jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterMode {
    /// Long-running HTTP server.
    #[default]
    Http,
    /// Read one event from stdin, write one envelope to stdout.
    Event,
}

impl AdapterMode {
    /// Parse mode from string.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "event" => Ok(Self::Event),
            other => Err(ConfigError::InvalidValue {
                key: "ADAPTER_MODE".to_string(),
                message: format!("expected http or event, got {other}"),
            }),
        }
    }

    /// Get the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Event => "event",
        }
    }
}

/// Kaiko API credentials.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Kaiko client settings.
#[derive(Debug, Clone)]
pub struct KaikoSettings {
    /// Default API region.
    pub region: Region,
    /// Replaces the regional host when set.
    pub base_url: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Maximum attempts per request.
    pub max_attempts: u32,
    /// Initial retry backoff.
    pub initial_backoff: Duration,
}

impl Default for KaikoSettings {
    fn default() -> Self {
        let retry = RetryConfig::default();
        Self {
            region: Region::Us,
            base_url: None,
            timeout: Duration::from_secs(30),
            max_attempts: retry.max_attempts,
            initial_backoff: retry.initial_backoff,
        }
    }
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP port for jobs, health and metrics.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8080 }
    }
}

/// VWAP job settings.
#[derive(Debug, Clone)]
pub struct PricingSettings {
    /// Base asset when a job names none.
    pub default_base_asset: AssetCode,
    /// Interval when a job names none.
    pub default_interval: Interval,
    /// Quote markets blended for any base without an override.
    pub quote_assets: Vec<AssetCode>,
    /// Per-base quote market lists.
    pub quote_overrides: HashMap<AssetCode, Vec<AssetCode>>,
}

impl Default for PricingSettings {
    fn default() -> Self {
        let defaults = JobDefaults::default();
        Self {
            default_base_asset: defaults.base_asset,
            default_interval: defaults.interval,
            quote_assets: QuoteAssetResolver::default().default_quotes().to_vec(),
            quote_overrides: HashMap::new(),
        }
    }
}

impl PricingSettings {
    /// Resolver for these quote lists.
    #[must_use]
    pub fn resolver(&self) -> QuoteAssetResolver {
        self.quote_overrides.iter().fold(
            QuoteAssetResolver::new(self.quote_assets.clone()),
            |resolver, (base, quotes)| resolver.with_override(base.clone(), quotes.clone()),
        )
    }

    /// Defaults applied to VWAP jobs.
    #[must_use]
    pub fn job_defaults(&self) -> JobDefaults {
        JobDefaults {
            base_asset: self.default_base_asset.clone(),
            interval: self.default_interval,
        }
    }
}

/// Complete adapter configuration.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Entry point mode.
    pub mode: AdapterMode,
    /// API credentials.
    pub credentials: Credentials,
    /// Kaiko client settings.
    pub kaiko: KaikoSettings,
    /// Server settings.
    pub server: ServerSettings,
    /// VWAP job settings.
    pub pricing: PricingSettings,
}

impl AdapterConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_lookup(|key| vars.get(key).cloned())
            .and_then(|config| config.with_quote_overrides(&vars))
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// Per-base quote overrides are not discoverable through a lookup; see
    /// [`Self::with_quote_overrides`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = match lookup("KAIKO_API_KEY").or_else(|| lookup("API_KEY")) {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::EmptyValue("KAIKO_API_KEY".to_string()));
            }
            Some(key) => key.trim().to_string(),
            None => return Err(ConfigError::MissingEnvVar("KAIKO_API_KEY".to_string())),
        };

        let mode = non_empty(&lookup, "ADAPTER_MODE")
            .map(|v| AdapterMode::parse(&v))
            .transpose()?
            .unwrap_or_default();

        let kaiko_defaults = KaikoSettings::default();
        let kaiko = KaikoSettings {
            region: non_empty(&lookup, "KAIKO_REGION")
                .map(|v| {
                    Region::parse(&v.to_lowercase())
                        .map_err(|e| ConfigError::invalid("KAIKO_REGION", e))
                })
                .transpose()?
                .unwrap_or(kaiko_defaults.region),
            base_url: non_empty(&lookup, "KAIKO_BASE_URL"),
            timeout: parse_or(&lookup, "KAIKO_TIMEOUT_SECS", 30_u64)
                .map(Duration::from_secs)?,
            max_attempts: parse_or(&lookup, "KAIKO_MAX_ATTEMPTS", kaiko_defaults.max_attempts)?
                .max(1),
            initial_backoff: parse_or(&lookup, "KAIKO_INITIAL_BACKOFF_MS", 100_u64)
                .map(Duration::from_millis)?,
        };

        let server = ServerSettings {
            http_port: parse_or(&lookup, "HTTP_PORT", ServerSettings::default().http_port)?,
        };

        let pricing_defaults = PricingSettings::default();
        let pricing = PricingSettings {
            default_base_asset: non_empty(&lookup, "DEFAULT_BASE_ASSET")
                .map(|v| {
                    AssetCode::parse(&v).map_err(|e| ConfigError::invalid("DEFAULT_BASE_ASSET", e))
                })
                .transpose()?
                .unwrap_or(pricing_defaults.default_base_asset),
            default_interval: non_empty(&lookup, "DEFAULT_INTERVAL")
                .map(|v| {
                    Interval::parse(&v).map_err(|e| ConfigError::invalid("DEFAULT_INTERVAL", e))
                })
                .transpose()?
                .unwrap_or(pricing_defaults.default_interval),
            quote_assets: non_empty(&lookup, "QUOTE_ASSETS")
                .map(|v| parse_asset_list("QUOTE_ASSETS", &v))
                .transpose()?
                .unwrap_or(pricing_defaults.quote_assets),
            quote_overrides: HashMap::new(),
        };

        Ok(Self {
            mode,
            credentials: Credentials::new(api_key),
            kaiko,
            server,
            pricing,
        })
    }

    /// Add per-base quote lists from `QUOTE_ASSETS_<BASE>` variables.
    pub fn with_quote_overrides<'a, I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in vars {
            let Some(base) = key.strip_prefix(QUOTE_OVERRIDE_PREFIX) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            let base = AssetCode::parse(base).map_err(|e| ConfigError::invalid(key, e))?;
            let quotes = parse_asset_list(key, value)?;
            self.pricing.quote_overrides.insert(base, quotes);
        }
        Ok(self)
    }

    /// Kaiko client configuration.
    #[must_use]
    pub fn kaiko_config(&self) -> KaikoConfig {
        let retry = RetryConfig {
            max_attempts: self.kaiko.max_attempts,
            initial_backoff: self.kaiko.initial_backoff,
            ..RetryConfig::default()
        };
        let config = KaikoConfig::new(self.credentials.api_key().to_string(), self.kaiko.region)
            .with_timeout(self.kaiko.timeout)
            .with_retry(retry);

        match &self.kaiko.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable does not parse.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// What was wrong.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, err: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, key).map_or(Ok(default), |v| {
        v.parse().map_err(|e| ConfigError::invalid(key, e))
    })
}

fn parse_asset_list(key: &str, value: &str) -> Result<Vec<AssetCode>, ConfigError> {
    let assets = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| AssetCode::parse(s).map_err(|e| ConfigError::invalid(key, e)))
        .collect::<Result<Vec<_>, _>>()?;

    if assets.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::DEFAULT_QUOTE_ASSETS;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn codes(assets: &[AssetCode]) -> Vec<&str> {
        assets.iter().map(AssetCode::as_str).collect()
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = AdapterConfig::from_lookup(lookup(&[("KAIKO_API_KEY", "k")])).unwrap();

        assert_eq!(config.mode, AdapterMode::Http);
        assert_eq!(config.credentials.api_key(), "k");
        assert_eq!(config.kaiko.region, Region::Us);
        assert_eq!(config.kaiko.timeout, Duration::from_secs(30));
        assert_eq!(config.kaiko.max_attempts, 3);
        assert_eq!(config.kaiko.initial_backoff, Duration::from_millis(100));
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.pricing.default_base_asset.as_str(), "ampl");
        assert_eq!(config.pricing.default_interval.to_string(), "1d");
        assert_eq!(
            codes(&config.pricing.quote_assets),
            DEFAULT_QUOTE_ASSETS.to_vec()
        );
    }

    #[test]
    fn api_key_fallback() {
        let config = AdapterConfig::from_lookup(lookup(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.credentials.api_key(), "legacy");
    }

    #[test]
    fn missing_api_key() {
        let err = AdapterConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "KAIKO_API_KEY"));
    }

    #[test]
    fn empty_api_key() {
        let err = AdapterConfig::from_lookup(lookup(&[("KAIKO_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(_)));
    }

    #[test]
    fn full_environment() {
        let config = AdapterConfig::from_lookup(lookup(&[
            ("KAIKO_API_KEY", "k"),
            ("ADAPTER_MODE", "event"),
            ("KAIKO_REGION", "EU"),
            ("KAIKO_BASE_URL", "http://localhost:9999"),
            ("KAIKO_TIMEOUT_SECS", "5"),
            ("KAIKO_MAX_ATTEMPTS", "0"),
            ("HTTP_PORT", "3000"),
            ("DEFAULT_BASE_ASSET", "LINK"),
            ("DEFAULT_INTERVAL", "1h"),
            ("QUOTE_ASSETS", "usd, eth"),
        ]))
        .unwrap();

        assert_eq!(config.mode, AdapterMode::Event);
        assert_eq!(config.kaiko.region, Region::Eu);
        assert_eq!(config.kaiko.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.kaiko.timeout, Duration::from_secs(5));
        assert_eq!(config.kaiko.max_attempts, 1);
        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.pricing.default_base_asset.as_str(), "link");
        assert_eq!(config.pricing.default_interval.to_string(), "1h");
        assert_eq!(codes(&config.pricing.quote_assets), vec!["usd", "eth"]);

        let kaiko = config.kaiko_config();
        assert_eq!(kaiko.base_url(Region::Us), "http://localhost:9999");
        assert_eq!(kaiko.retry.max_attempts, 1);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err =
            AdapterConfig::from_lookup(lookup(&[("KAIKO_API_KEY", "k"), ("HTTP_PORT", "eighty")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "HTTP_PORT"));

        let err =
            AdapterConfig::from_lookup(lookup(&[("KAIKO_API_KEY", "k"), ("KAIKO_REGION", "asia")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "KAIKO_REGION"));

        let err =
            AdapterConfig::from_lookup(lookup(&[("KAIKO_API_KEY", "k"), ("ADAPTER_MODE", "cron")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "ADAPTER_MODE"));
    }

    #[test]
    fn quote_overrides() {
        let vars: HashMap<String, String> = [
            ("QUOTE_ASSETS_LINK", "usd,eth"),
            ("QUOTE_ASSETS_EMPTY", ""),
            ("UNRELATED", "x"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

        let config = AdapterConfig::from_lookup(lookup(&[("KAIKO_API_KEY", "k")]))
            .unwrap()
            .with_quote_overrides(&vars)
            .unwrap();

        let resolver = config.pricing.resolver();
        let link = AssetCode::parse("link").unwrap();
        let ampl = AssetCode::parse("ampl").unwrap();
        assert_eq!(codes(&resolver.resolve(&link)), vec!["usd", "eth"]);
        assert_eq!(resolver.resolve(&ampl).len(), 4);
        assert_eq!(config.pricing.quote_overrides.len(), 1);
    }

    #[test]
    fn credentials_debug_redacts_key() {
        let debug = format!("{:?}", Credentials::new("secret-key".to_string()));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
