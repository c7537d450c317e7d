//! Static model catalog: context window capacity per model identifier

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ChatContextError, ChatContextResult};

/// Default reserved tokens for the model response, used when an entry omits it
pub const DEFAULT_RESERVE_TOKENS: usize = 4_000;

/// Model id used when a requested identifier is not in the catalog
pub const DEFAULT_MODEL_ID: &str = "gpt-4o";

fn default_reserve_tokens() -> usize {
    DEFAULT_RESERVE_TOKENS
}

/// Pricing tier of a model, carried as a display label only
///
/// Budgeting never consults this; it exists for the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    /// Cheapest family
    Budget,
    /// Mid-tier family
    Standard,
    /// Most expensive family
    Premium,
}

impl Default for PricingTier {
    fn default() -> Self {
        PricingTier::Standard
    }
}

/// Static, immutable configuration for one model identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier, used as the lookup key
    pub id: String,
    /// Maximum total tokens (input + output) the model accepts
    #[serde(rename = "context-window")]
    pub context_window: usize,
    /// Tokens set aside for the model's own response
    #[serde(rename = "reserve-tokens", default = "default_reserve_tokens")]
    pub reserve_tokens: usize,
    /// Display-only pricing tier
    #[serde(default)]
    pub tier: PricingTier,
}

impl ModelConfig {
    /// Create a new model configuration with the default reserve
    pub fn new<S: Into<String>>(id: S, context_window: usize) -> Self {
        Self {
            id: id.into(),
            context_window,
            reserve_tokens: DEFAULT_RESERVE_TOKENS,
            tier: PricingTier::default(),
        }
    }

    /// Set the reserved response tokens
    pub fn with_reserve_tokens(mut self, reserve: usize) -> Self {
        self.reserve_tokens = reserve;
        self
    }

    /// Set the pricing tier
    pub fn with_tier(mut self, tier: PricingTier) -> Self {
        self.tier = tier;
        self
    }

    /// Tokens available for input: `context_window - reserve_tokens`
    pub fn available_tokens(&self) -> usize {
        self.context_window.saturating_sub(self.reserve_tokens)
    }

    fn validate(&self) -> ChatContextResult<()> {
        if self.id.is_empty() {
            return Err(ChatContextError::catalog("model id must not be empty"));
        }
        if self.context_window == 0 {
            return Err(ChatContextError::catalog(format!(
                "{}: context window must be non-zero",
                self.id
            )));
        }
        if self.reserve_tokens >= self.context_window {
            return Err(ChatContextError::catalog(format!(
                "{}: reserve tokens ({}) must be smaller than the context window ({})",
                self.id, self.reserve_tokens, self.context_window
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "models")]
    models: Vec<ModelConfig>,
}

/// Lookup table from model identifier to its context-window configuration
///
/// Populated at construction and read-only afterwards. Lookups are total:
/// unknown identifiers fall back to the [`DEFAULT_MODEL_ID`] entry instead of
/// erroring, so callers must not rely on an error to detect unsupported
/// models.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: HashMap<String, ModelConfig>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCatalog {
    /// Create a catalog with the builtin entries
    pub fn new() -> Self {
        let builtin = [
            ModelConfig::new("gpt-4o", 128_000).with_tier(PricingTier::Standard),
            ModelConfig::new("gpt-4o-mini", 128_000).with_tier(PricingTier::Budget),
            ModelConfig::new("gpt-4-turbo", 128_000).with_tier(PricingTier::Premium),
            ModelConfig::new("gpt-3.5-turbo", 16_385)
                .with_reserve_tokens(2_000)
                .with_tier(PricingTier::Budget),
            ModelConfig::new("claude-3.5-sonnet", 200_000).with_tier(PricingTier::Premium),
        ];

        Self {
            models: builtin
                .into_iter()
                .map(|config| (config.id.clone(), config))
                .collect(),
        }
    }

    /// Look up a model configuration by identifier
    ///
    /// Unknown identifiers return the default entry.
    pub fn get(&self, model_id: &str) -> &ModelConfig {
        self.models.get(model_id).unwrap_or_else(|| {
            &self.models[DEFAULT_MODEL_ID]
        })
    }

    /// Whether the catalog has an exact entry for `model_id`
    pub fn contains(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    /// All known model identifiers
    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Merge deployment-supplied entries over the builtins
    ///
    /// Entries with a known id replace the builtin; new ids are added.
    /// Each entry is validated before any of them is applied.
    pub fn apply_overrides(
        &mut self,
        overrides: impl IntoIterator<Item = ModelConfig>,
    ) -> ChatContextResult<()> {
        let overrides: Vec<ModelConfig> = overrides.into_iter().collect();
        for config in &overrides {
            config.validate()?;
        }
        for config in overrides {
            self.models.insert(config.id.clone(), config);
        }
        Ok(())
    }

    /// Create a catalog from builtins plus a TOML override document
    ///
    /// ```toml
    /// [[models]]
    /// id = "gpt-5"
    /// context-window = 400000
    /// reserve-tokens = 8000
    /// tier = "premium"
    /// ```
    pub fn from_toml_str(toml_str: &str) -> ChatContextResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| ChatContextError::config(e.to_string()))?;
        let mut catalog = Self::new();
        catalog.apply_overrides(file.models)?;
        Ok(catalog)
    }
}
