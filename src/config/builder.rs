//! Type-safe builder for `HarvestConfig` using the typestate pattern
//!
//! The output directory and the base URL are required; `build()` only exists
//! once both are set. Everything else starts at its default.

use anyhow::{Context, Result, anyhow, bail};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::types::HarvestConfig;

// Type states for the builder
pub struct WithOutputDir;
pub struct WithBaseUrl;

pub struct HarvestConfigBuilder<State = ()> {
    pub(crate) draft: HarvestConfig,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) base_url: Option<String>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for HarvestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            draft: HarvestConfig::default(),
            output_dir: None,
            base_url: None,
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfig {
    /// Create a builder for configuring a `HarvestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> HarvestConfigBuilder<()> {
        HarvestConfigBuilder::default()
    }

    /// Load a serialized config, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid JSON, or holds values
    /// that would not pass the builder's validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.base_url = normalize_base_url(&config.base_url);
        validate(&config)?;
        Ok(config)
    }
}

impl<State> HarvestConfigBuilder<State> {
    fn into_state<Next>(self) -> HarvestConfigBuilder<Next> {
        HarvestConfigBuilder {
            draft: self.draft,
            output_dir: self.output_dir,
            base_url: self.base_url,
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfigBuilder<()> {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> HarvestConfigBuilder<WithOutputDir> {
        self.output_dir = Some(dir.into());
        self.into_state()
    }
}

impl HarvestConfigBuilder<WithOutputDir> {
    pub fn base_url(mut self, url: impl Into<String>) -> HarvestConfigBuilder<WithBaseUrl> {
        self.base_url = Some(normalize_base_url(&url.into()));
        self.into_state()
    }
}

// Build method only available when all required fields are set
impl HarvestConfigBuilder<WithBaseUrl> {
    /// Validate and produce the config
    ///
    /// # Errors
    ///
    /// Returns an error when a ceiling or poll interval is zero, the base URL
    /// does not parse, or the price filter bounds are inverted.
    pub fn build(self) -> Result<HarvestConfig> {
        let config = HarvestConfig {
            output_dir: self
                .output_dir
                .ok_or_else(|| anyhow!("output_dir is required"))?,
            base_url: self
                .base_url
                .ok_or_else(|| anyhow!("base_url is required"))?,
            ..self.draft
        };
        validate(&config)?;
        Ok(config)
    }

    /// Replace the output directory of a reopened config
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Replace the base URL of a reopened config
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(normalize_base_url(&url.into()));
        self
    }
}

/// Add `https://` when the URL has no scheme
fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("file://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn validate(config: &HarvestConfig) -> Result<()> {
    url::Url::parse(&config.base_url)
        .with_context(|| format!("Invalid base_url '{}'", config.base_url))?;

    if config.max_pages == 0 {
        bail!("max_pages must be at least 1");
    }
    if config.max_scrolls == 0 {
        bail!("max_scrolls must be at least 1");
    }
    if config.max_stagnant_rounds == 0 {
        bail!("max_stagnant_rounds must be at least 1");
    }
    if config.recovery_after_stagnant_rounds == 0 {
        bail!("recovery_after_stagnant_rounds must be at least 1");
    }
    // a view stalls at max_stagnant_rounds, so a later recovery never runs
    if config.recovery_after_stagnant_rounds > config.max_stagnant_rounds {
        bail!(
            "recovery_after_stagnant_rounds {} exceeds max_stagnant_rounds {}",
            config.recovery_after_stagnant_rounds,
            config.max_stagnant_rounds
        );
    }
    if config.poll_interval_ms == 0 {
        bail!("poll_interval_ms must be greater than 0");
    }
    if config.max_category_depth == 0 {
        bail!("max_category_depth must be at least 1");
    }
    if config.output_stem.trim().is_empty() {
        bail!("output_stem must not be empty");
    }
    if let (Some(min), Some(max)) = (config.filter.min_price, config.filter.max_price)
        && min > max
    {
        bail!("filter min_price {min} exceeds max_price {max}");
    }
    Ok(())
}
