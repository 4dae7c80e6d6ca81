use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub fx: FxConfig,

    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (0 = number of CPU cores)
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/voltfund.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens. Override in production.
    pub jwt_secret: String,

    /// Token lifetime in days.
    pub token_ttl_days: i64,

    pub min_password_length: usize,

    /// Identity provider endpoint for opaque OAuth session lookups.
    pub oauth_session_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "voltfund-dev-secret-change-me".to_string(),
            token_ttl_days: 7,
            min_password_length: 6,
            oauth_session_url: "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Rate provider endpoint (USD base).
    pub api_url: String,

    /// Quote currency to read from the provider response.
    pub quote_currency: String,

    /// Served until the first successful refresh, and as the permanent
    /// fallback when the provider has never answered.
    pub default_rate: f64,

    /// Freshness window in seconds.
    pub ttl_seconds: u64,

    /// Provider request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// When false the provider is never contacted and the cached rate is
    /// served as-is. Used by tests.
    pub refresh_enabled: bool,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            api_url: "https://open.er-api.com/v6/latest/USD".to_string(),
            quote_currency: "TRY".to_string(),
            default_rate: 38.0,
            ttl_seconds: 3600,
            request_timeout_seconds: 5,
            refresh_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Root directory for uploaded KYC documents.
    pub path: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: "uploads".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        if let Ok(path) = std::env::var("VOLTFUND_CONFIG") {
            return Self::load_from_path(Path::new(&path));
        }

        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("voltfund").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".voltfund").join("config.toml"));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret cannot be empty");
        }

        if self.auth.token_ttl_days <= 0 {
            anyhow::bail!("auth.token_ttl_days must be positive");
        }

        if self.fx.default_rate <= 0.0 {
            anyhow::bail!("fx.default_rate must be positive");
        }

        Ok(())
    }
}
