use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow, Context};
use tracing::warn;

/// Environment variable naming the completion endpoint.
pub const ENDPOINT_ENV: &str = "BEAUTY_CHAT_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// URL of the completion endpoint (e.g. a Cloudflare Worker).
    pub endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_endpoint(endpoint: &str) -> Result<PathBuf> {
        let path = Self::get_config_path()?;
        Self::save_endpoint_to(&path, endpoint)?;
        Ok(path)
    }

    pub fn save_endpoint_to(path: &Path, endpoint: &str) -> Result<()> {
        let endpoint = validate_endpoint(endpoint)?;
        let mut config = match Self::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, path = %path.display(), "replacing unreadable config file");
                Self::default()
            }
        };
        config.endpoint = Some(endpoint);
        config.save_to(path)
    }

    /// Resolve the endpoint for this run. An explicit value (CLI flag or
    /// environment) is used without reading the config file at all.
    pub fn resolve(explicit: Option<&str>) -> Result<String> {
        match non_blank(explicit) {
            Some(endpoint) => validate_endpoint(endpoint),
            None => Self::load()?.resolve_endpoint(None),
        }
    }

    pub fn resolve_at(path: &Path, explicit: Option<&str>) -> Result<String> {
        match non_blank(explicit) {
            Some(endpoint) => validate_endpoint(endpoint),
            None => Self::load_from(path)?.resolve_endpoint(None),
        }
    }

    /// Pick the endpoint: an explicit value (CLI flag or environment) wins
    /// over the config file. A missing or malformed URL is an error.
    pub fn resolve_endpoint(&self, explicit: Option<&str>) -> Result<String> {
        let endpoint = non_blank(explicit)
            .or_else(|| non_blank(self.endpoint.as_deref()))
            .ok_or_else(|| {
                anyhow!(
                    "No completion endpoint configured. Pass --endpoint, set {}, or run `beauty-chat config <URL>`",
                    ENDPOINT_ENV
                )
            })?;
        validate_endpoint(endpoint)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("beauty-chat").join("config.json"))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = reqwest::Url::parse(endpoint.trim())
        .with_context(|| format!("invalid endpoint URL: {}", endpoint))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(anyhow!("endpoint must be http or https, got {}", other)),
    }
}
