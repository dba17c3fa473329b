//! Quote asset resolution.

use std::collections::HashMap;

use crate::domain::shared::AssetCode;

/// Quote assets blended when no per-base list is configured.
pub const DEFAULT_QUOTE_ASSETS: [&str; 4] = ["usd", "usdt", "eth", "btc"];

/// Decides which quote markets feed the blended price of a base asset.
#[derive(Debug, Clone)]
pub struct QuoteAssetResolver {
    default_quotes: Vec<AssetCode>,
    overrides: HashMap<AssetCode, Vec<AssetCode>>,
}

impl QuoteAssetResolver {
    /// Create a resolver with the given default quote list.
    #[must_use]
    pub fn new(default_quotes: Vec<AssetCode>) -> Self {
        Self {
            default_quotes,
            overrides: HashMap::new(),
        }
    }

    /// Use a dedicated quote list for one base asset.
    #[must_use]
    pub fn with_override(mut self, base: AssetCode, quotes: Vec<AssetCode>) -> Self {
        self.overrides.insert(base, quotes);
        self
    }

    /// Quote assets for `base`, in configured order.
    ///
    /// Never contains `base` itself or duplicates.
    #[must_use]
    pub fn resolve(&self, base: &AssetCode) -> Vec<AssetCode> {
        let configured = self.overrides.get(base).unwrap_or(&self.default_quotes);

        let mut quotes: Vec<AssetCode> = Vec::with_capacity(configured.len());
        for quote in configured {
            if quote != base && !quotes.contains(quote) {
                quotes.push(quote.clone());
            }
        }
        quotes
    }

    /// Default quote list.
    #[must_use]
    pub fn default_quotes(&self) -> &[AssetCode] {
        &self.default_quotes
    }
}

impl Default for QuoteAssetResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_QUOTE_ASSETS
                .iter()
                .filter_map(|code| AssetCode::parse(code).ok())
                .collect(),
        )
    }
}
