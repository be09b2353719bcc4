use anyhow::{anyhow, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_MAX_TOKENS: u32 = crate::sampler::DEFAULT_MAX_TOKENS;
pub const DEFAULT_STORE_PATH: &str = "building_blocks.bin";
pub const DEFAULT_TEMPLATE_PATH: &str = "./templates/conjunction_fallacy_template.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub default_max_tokens: u32,
    pub use_mock: bool,
    pub store_path: PathBuf,
    pub template_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            use_mock: false,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
        }
    }
}

impl Config {
    /// Load configuration from file, environment variables, or create default
    pub fn load() -> Result<Self> {
        let config = Self::get_config_path()
            .and_then(|path| Self::load_from_path(&path))
            .unwrap_or_else(|_| {
                info!("No config file found, using defaults");
                Self::default()
            });

        // Environment variables override config file
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Parses a TOML config file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("Config file not found"));
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Applies `COGBIAS_*` overrides looked up through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_key) = lookup("COGBIAS_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(api_url) = lookup("COGBIAS_API_URL") {
            self.api_url = api_url;
        }
        if let Some(model) = lookup("COGBIAS_MODEL") {
            self.model = model;
        }
        if lookup("COGBIAS_USE_MOCK").is_some() {
            self.use_mock = true;
        }
        self
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::get_config_path()?)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        info!("Saved config to: {}", config_path.display());
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".cogbias"))
    }

    /// Set API key and save config
    pub fn set_api_key(&mut self, api_key: String) -> Result<()> {
        self.api_key = Some(api_key);
        self.save()?;
        info!("API key saved to config file");
        Ok(())
    }

    pub fn get_api_key(&self) -> Option<&String> {
        self.api_key.as_ref()
    }

    pub fn is_mock_mode(&self) -> bool {
        self.use_mock
    }

    pub fn show_config_info() -> Result<()> {
        let config_path = Self::get_config_path()?;
        println!("Configuration file: {}", config_path.display());

        if config_path.exists() {
            println!("Status: Found");
            let config = Self::load_from_path(&config_path)?;
            println!("API Key: {}", if config.api_key.is_some() { "Set" } else { "Not set" });
            println!("API URL: {}", config.api_url);
            println!("Model: {}", config.model);
            println!("Store: {}", config.store_path.display());
            println!("Template: {}", config.template_path.display());
            println!("Mock mode: {}", config.use_mock);
        } else {
            println!("Status: Not found (using defaults)");
        }

        println!("\nTo set API key:");
        println!("  cogbias --set-api-key <your-key>");
        println!("\nOr set environment variable:");
        println!("  export COGBIAS_API_KEY=<your-key>");

        Ok(())
    }
}
