//! Resolver configuration from flags and environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use serde_json::{Value, json};
use swap_client::ReqwestTransport;
use swap_core::{SwapBuilder, SwapConfig};
use swap_services::{currency_layer, fixer, static_rates};
use swap_types::ProviderOptions;

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Providers to chain, in fallback order
    #[arg(
        long = "provider",
        env = "SWAP_PROVIDERS",
        value_delimiter = ',',
        default_value = "frankfurter",
        global = true
    )]
    pub providers: Vec<String>,

    /// Cache TTL in seconds
    #[arg(long, env = "SWAP_CACHE_TTL", global = true)]
    pub cache_ttl: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, env = "SWAP_HTTP_TIMEOUT", default_value_t = 10, global = true)]
    pub timeout: u64,

    /// JSON file with options for the static provider
    #[arg(long, env = "SWAP_STATIC_RATES", global = true)]
    pub static_rates: Option<PathBuf>,

    /// Access key for fixer.io
    #[arg(long, env = "FIXER_ACCESS_KEY", global = true, hide_env_values = true)]
    pub fixer_access_key: Option<String>,

    /// Access key for currencylayer
    #[arg(
        long,
        env = "CURRENCY_LAYER_ACCESS_KEY",
        global = true,
        hide_env_values = true
    )]
    pub currency_layer_access_key: Option<String>,

    /// Bypass the cache for this invocation
    #[arg(long, global = true)]
    pub no_cache: bool,
}

impl Settings {
    /// Translates the settings into a library configuration.
    pub fn swap_config(&self) -> anyhow::Result<SwapConfig> {
        let mut config = SwapConfig::default();

        for name in &self.providers {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            config.add_provider(name, self.provider_options(name)?);
        }

        if let Some(secs) = self.cache_ttl {
            config.cache.ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Builder wired with a reqwest transport honouring `timeout`.
    pub fn builder(&self) -> anyhow::Result<SwapBuilder> {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(self.timeout))
            .context("Failed to create HTTP client")?;
        Ok(SwapBuilder::from_config(self.swap_config()?).use_transport(Arc::new(transport)))
    }

    fn provider_options(&self, name: &str) -> anyhow::Result<ProviderOptions> {
        let options = match name {
            fixer::NAME => {
                let Some(key) = &self.fixer_access_key else {
                    bail!("The fixer provider requires --fixer-access-key or FIXER_ACCESS_KEY");
                };
                json!({ "access_key": key })
            }
            currency_layer::NAME => {
                let Some(key) = &self.currency_layer_access_key else {
                    bail!(
                        "The currency_layer provider requires \
                         --currency-layer-access-key or CURRENCY_LAYER_ACCESS_KEY"
                    );
                };
                json!({ "access_key": key })
            }
            static_rates::NAME => {
                let Some(path) = &self.static_rates else {
                    bail!("The static provider requires --static-rates or SWAP_STATIC_RATES");
                };
                read_options(path)?
            }
            // Unknown names surface as BuildError::UnknownProvider at build time.
            _ => json!({}),
        };

        match options {
            Value::Object(map) => Ok(map),
            _ => bail!("Options for provider {name} must be a JSON object"),
        }
    }
}

fn read_options(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings(providers: &[&str]) -> Settings {
        Settings {
            providers: providers.iter().map(|p| p.to_string()).collect(),
            cache_ttl: None,
            timeout: 10,
            static_rates: None,
            fixer_access_key: None,
            currency_layer_access_key: None,
            no_cache: false,
        }
    }

    #[test]
    fn test_default_provider() {
        let config = settings(&["frankfurter"]).swap_config().unwrap();

        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].name, "frankfurter");
        assert!(config.providers[0].options.is_empty());
    }

    #[test]
    fn test_fixer_requires_access_key() {
        let err = settings(&["fixer"]).swap_config().unwrap_err();
        assert!(err.to_string().contains("FIXER_ACCESS_KEY"));

        let mut with_key = settings(&["fixer", "frankfurter"]);
        with_key.fixer_access_key = Some("secret".into());
        let config = with_key.swap_config().unwrap();

        assert_eq!(config.providers[0].options["access_key"], "secret");
        assert_eq!(config.providers[1].name, "frankfurter");
    }

    #[test]
    fn test_static_rates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"latest": {{"EUR/USD": 1.1}}}}"#).unwrap();

        let mut settings = settings(&["static"]);
        settings.static_rates = Some(file.path().to_path_buf());
        let config = settings.swap_config().unwrap();

        assert_eq!(config.providers[0].options["latest"]["EUR/USD"], 1.1);
    }

    #[test]
    fn test_static_rates_must_be_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();

        let mut settings = settings(&["static"]);
        settings.static_rates = Some(file.path().to_path_buf());

        assert!(settings.swap_config().is_err());
    }

    #[test]
    fn test_cache_ttl_and_blank_names() {
        let mut settings = settings(&["frankfurter", " ", ""]);
        settings.cache_ttl = Some(60);
        let config = settings.swap_config().unwrap();

        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_unknown_provider_fails_build() {
        let err = settings(&["nope"]).builder().unwrap().build().unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
