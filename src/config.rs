use crate::listing::TransformOptions;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BackendConfig {
    /// Project URL; empty selects the in-memory demo backend
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    pub bucket: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SiteConfig {
    pub currency: String,
    pub placeholder_image: String,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[backend]
url = ""
anon_key = ""
timeout_secs = 30

[storage]
bucket = "site-images"

[site]
currency = "UGX"
placeholder_image = "/images/placeholder.jpg"
"#;

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    pub fn uses_demo_backend(&self) -> bool {
        self.backend.url.trim().is_empty()
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            currency: self.site.currency.clone(),
            placeholder_image: self.site.placeholder_image.clone(),
        }
    }

    /// Replace backend credentials with non-empty values from the environment
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SUPABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY").filter(|v| !v.trim().is_empty()) {
            self.backend.anon_key = key;
        }
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    toml::from_str(contents).context("Failed to parse configuration")
}

/// Load configuration
///
/// Search order:
/// 1. The explicit `path`, if given
/// 2. `config.toml` next to the executable
/// 3. The embedded default
///
/// `SUPABASE_URL` and `SUPABASE_ANON_KEY` override whatever the file says.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_config(&contents)?
        }
        None => load_default_location()?,
    };

    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

fn load_default_location() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            }
            tracing::debug!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}
