//! Bootstrap configuration
//!
//! Settings are resolved once at startup, highest priority first:
//! 1. Command-line arguments (environment variables are folded in by clap)
//! 2. TOML config file (explicit path, else the per-user or system file)
//! 3. Compiled defaults
//!
//! Nothing here changes while the server runs.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;

/// Bind-all interface
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Time a superseded player gets to exit after the graceful signal
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 5000;

/// Directory name used under the platform config dir
const APP_DIR: &str = "castplay";

/// Configuration as read from the TOML file
///
/// Every field is optional in the file; missing ones take compiled defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Grace period before a superseded player is force-killed
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Terminate the tracked player when the server shuts down
    #[serde(default)]
    pub stop_player_on_exit: bool,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            grace_period_ms: default_grace_period_ms(),
            stop_player_on_exit: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr when unset)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub grace_period_ms: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub grace_period: Duration,
    pub stop_player_on_exit: bool,
    pub logging: LoggingConfig,
    /// TOML file the values came from, if any
    pub source: Option<PathBuf>,
    /// Default-location file that was skipped because it failed to load
    pub ignored: Option<IgnoredConfig>,
}

/// A config file found at a default location but not used
///
/// Loading happens before logging is set up, so the caller reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredConfig {
    pub path: PathBuf,
    pub reason: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        // Compiled defaults always validate
        Self {
            host: default_host(),
            port: default_port(),
            grace_period: Duration::from_millis(DEFAULT_GRACE_PERIOD_MS),
            stop_player_on_exit: false,
            logging: LoggingConfig::default(),
            source: None,
            ignored: None,
        }
    }
}

impl ServiceConfig {
    /// Resolve configuration from overrides, TOML file and defaults
    ///
    /// An explicit `config_path` must exist and parse. The default file
    /// locations are optional: a broken file there falls back to defaults
    /// and is recorded in `ignored`.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        Self::load_with_default(overrides, default_config_path())
    }

    /// Same as [`ServiceConfig::load`], with the default file location given
    pub fn load_with_default(
        overrides: ConfigOverrides,
        default_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut ignored = None;
        let (toml_config, source) = match overrides.config_path.as_deref() {
            Some(path) => (load_toml_config(path)?, Some(path.to_path_buf())),
            None => match default_path {
                Some(path) => match load_toml_config(&path) {
                    Ok(cfg) => (cfg, Some(path)),
                    Err(e) => {
                        ignored = Some(IgnoredConfig {
                            path,
                            reason: e.to_string(),
                        });
                        (TomlConfig::default(), None)
                    }
                },
                None => (TomlConfig::default(), None),
            },
        };

        let mut config = Self::resolve(toml_config, overrides)?;
        config.source = source;
        config.ignored = ignored;
        Ok(config)
    }

    /// Apply overrides on top of a parsed TOML config and validate the result
    pub fn resolve(toml_config: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let host = overrides.host.unwrap_or(toml_config.host);
        let port = overrides.port.unwrap_or(toml_config.port);
        let grace_period_ms = overrides
            .grace_period_ms
            .unwrap_or(toml_config.grace_period_ms);

        let mut logging = toml_config.logging;
        if let Some(level) = overrides.log_level {
            logging.level = level;
        }

        if host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if grace_period_ms == 0 {
            return Err(Error::Config(
                "grace_period_ms must be greater than zero".to_string(),
            ));
        }
        logging.level.parse::<LevelFilter>().map_err(|_| {
            Error::Config(format!("Unknown log level '{}'", logging.level))
        })?;

        Ok(Self {
            host,
            port,
            grace_period: Duration::from_millis(grace_period_ms),
            stop_player_on_exit: toml_config.stop_player_on_exit,
            logging,
            source: None,
            ignored: None,
        })
    }

    /// Listen address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&content)?)
}

/// First existing config file in the platform search order
///
/// Linux: `~/.config/castplay/config.toml`, then `/etc/castplay/config.toml`.
/// Elsewhere: the platform config dir only.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
