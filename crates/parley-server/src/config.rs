//! Server configuration loading from file and environment variables.

use parley_tenants::{SheetClient, SheetConfig, TenantSource, TenantTable};
use parley_types::{Language, TenantConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Telephony provider API settings.
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Tenant table source, defaults, and cache settings.
    #[serde(default)]
    pub tenants: TenantsConfig,

    /// Directory holding the browser client build, served as static files.
    #[serde(default = "default_client_dir")]
    pub client_dir: String,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "parley_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Telephony provider settings; the API key must come from config or the
/// `PARLEY_PROVIDER_API_KEY` environment variable.
#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Tenant source and resolution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantsConfig {
    /// Cache window for the tenant table, in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Fallback agent configuration for absent or unknown tenant ids.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Inline tenant table, used when no sheet is configured.
    #[serde(default, rename = "static")]
    pub static_table: HashMap<String, TenantConfig>,

    /// Remote spreadsheet source; takes precedence over the inline table.
    #[serde(default)]
    pub sheet: Option<SheetConfig>,
}

/// Default agent configuration used for absent or unknown tenants.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Must be configured; an empty agent id is rejected by the provider.
    #[serde(default)]
    pub agent_id: String,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl DefaultsConfig {
    pub fn to_tenant_config(&self) -> TenantConfig {
        TenantConfig {
            agent_id: self.agent_id.clone(),
            language: self.language,
            display_name: self.display_name.clone(),
        }
    }
}

impl TenantsConfig {
    /// Builds the tenant source: the sheet when configured, otherwise the
    /// inline table.
    pub fn source(&self) -> TenantSource {
        match &self.sheet {
            Some(sheet) => TenantSource::Sheet(SheetClient::new(sheet.clone())),
            None => {
                let table: TenantTable = self.static_table.clone();
                TenantSource::Static(Arc::new(table))
            }
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider_base_url() -> String {
    "https://api.retellai.com".to_string()
}

fn default_ttl_seconds() -> u64 {
    5 * 60
}

fn default_language() -> Language {
    Language::En
}

fn default_display_name() -> String {
    "Sycorax AI".to_string()
}

fn default_client_dir() -> String {
    "client/build".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            provider: ProviderSettings::default(),
            tenants: TenantsConfig::default(),
            client_dir: default_client_dir(),
        }
    }
}

impl Default for TenantsConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            defaults: DefaultsConfig::default(),
            static_table: HashMap::new(),
            sheet: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            agent_id: String::new(),
            language: default_language(),
            display_name: default_display_name(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `PARLEY_HOST` overrides `server.host`
/// - `PARLEY_PORT` overrides `server.port`
/// - `PARLEY_LOG_LEVEL` overrides `logging.level`
/// - `PARLEY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `PARLEY_PROVIDER_BASE_URL` overrides `provider.base_url`
/// - `PARLEY_PROVIDER_API_KEY` overrides `provider.api_key`
/// - `PARLEY_CLIENT_DIR` overrides `client_dir`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("PARLEY_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("PARLEY_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("PARLEY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("PARLEY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(base_url) = std::env::var("PARLEY_PROVIDER_BASE_URL") {
        config.provider.base_url = base_url;
    }
    if let Ok(api_key) = std::env::var("PARLEY_PROVIDER_API_KEY") {
        config.provider.api_key = api_key;
    }
    if let Ok(client_dir) = std::env::var("PARLEY_CLIENT_DIR") {
        config.client_dir = client_dir;
    }

    Ok(config)
}
