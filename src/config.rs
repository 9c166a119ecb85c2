use anyhow::Result;
use figment::{Figment, providers::{Env, Format, Serialized, Toml}};
use serde::{Deserialize, Serialize};
use std::fs;
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub operating_mode: OperatingMode,
    pub api_base_url: String,
    pub base_path: String,
    pub request_timeout_ms: u64,
    pub ui_settings: UiSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OperatingMode {
    Live,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    pub refresh_rate_ms: u64,
    pub theme: String,
    pub show_debug_info: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operating_mode: OperatingMode::Live,
            api_base_url: "http://localhost:8000".to_string(),
            base_path: "/app".to_string(),
            request_timeout_ms: 10_000,
            ui_settings: UiSettings::default(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            theme: "dark".to_string(),
            show_debug_info: false,
        }
    }
}

pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_file = config_path.unwrap_or("config.toml");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_file))
        .merge(Env::prefixed("FOLIO_").split("__"))
        .extract()?;

    validate_config(&config)?;

    Ok(config)
}

pub fn generate_sample_config() -> Result<()> {
    let config = Config::default();
    let toml_content = toml::to_string_pretty(&config)?;

    fs::write("config.toml", toml_content)?;

    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api_base_url)
        .map_err(|e| anyhow::anyhow!("api_base_url is not a valid URL: {}", e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow::anyhow!("api_base_url must use http or https, got {}", url.scheme()));
    }

    if !config.base_path.starts_with('/') {
        return Err(anyhow::anyhow!("base_path must start with '/'"));
    }

    if config.request_timeout_ms < 100 {
        return Err(anyhow::anyhow!("request_timeout_ms must be at least 100ms"));
    }

    if config.ui_settings.refresh_rate_ms < 50 {
        return Err(anyhow::anyhow!("UI refresh_rate_ms must be at least 50ms"));
    }

    Ok(())
}

pub fn save_config_to_file(config: &Config, path: &str) -> Result<()> {
    let toml_content = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_content)?;
    Ok(())
}
