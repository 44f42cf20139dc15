use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Origin of the presentation client allowed through CORS.
    pub allowed_origin: String,
    /// When set, `/api/weather` requires `Authorization: Bearer <token>`.
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            allowed_origin: "http://localhost:5173".to_string(),
            api_token: None,
        }
    }
}

/// Auth0 management API credentials, used to resend verification emails.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Auth0Config {
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// cities_file = "cities.json"
///
/// [server]
/// bind = "0.0.0.0:5000"
///
/// [auth0]
/// domain = "example.eu.auth0.com"
/// client_id = "..."
/// client_secret = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,
    pub openweather_base_url: String,
    pub cities_file: PathBuf,
    pub cache_ttl_secs: u64,
    /// Upper bound on upstream requests in flight during one fetch cycle.
    pub fetch_concurrency: usize,
    pub server: ServerConfig,
    pub auth0: Option<Auth0Config>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            openweather_base_url: "https://api.openweathermap.org".to_string(),
            cities_file: PathBuf::from("cities.json"),
            cache_ttl_secs: 300,
            fetch_concurrency: 4,
            server: ServerConfig::default(),
            auth0: None,
        }
    }
}

impl Config {
    /// Load config from the platform location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "comfort-rank", "comfort")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from the environment. `lookup` is usually `std::env::var(..).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(token) = lookup("COMFORT_API_TOKEN") {
            self.server.api_token = Some(token);
        }

        let domain = lookup("AUTH0_DOMAIN");
        let client_id = lookup("AUTH0_CLIENT_ID");
        let client_secret = lookup("AUTH0_CLIENT_SECRET");
        if domain.is_some() || client_id.is_some() || client_secret.is_some() {
            let auth0 = self.auth0.get_or_insert_with(Auth0Config::default);
            if let Some(domain) = domain {
                auth0.domain = domain;
            }
            if let Some(client_id) = client_id {
                auth0.client_id = client_id;
            }
            if let Some(client_secret) = client_secret {
                auth0.client_secret = client_secret;
            }
        }
    }

    /// Returns the OpenWeather API key or a hint on how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `comfort configure` or set OPENWEATHER_API_KEY."
            )
        })
    }

    /// Auth0 settings, only when every field is filled in.
    pub fn auth0(&self) -> Option<&Auth0Config> {
        self.auth0.as_ref().filter(|a| {
            !a.domain.is_empty() && !a.client_id.is_empty() && !a.client_secret.is_empty()
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
