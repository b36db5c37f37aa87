use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Health Assistant";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filename offered for every exported prediction.
pub const EXPORT_FILENAME: &str = "prediction_result.pdf";

/// Environment variable overriding the models directory.
pub const MODELS_DIR_ENV: &str = "HEALTH_ASSISTANT_MODELS_DIR";
/// Environment variable overriding the listen address.
pub const ADDR_ENV: &str = "HEALTH_ASSISTANT_ADDR";

const DEFAULT_ADDR: &str = "127.0.0.1:8501";

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,health_assistant_lib=debug"
}

/// Get the application data directory
/// ~/HealthAssistant/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("HealthAssistant")
}

/// Get the models directory (pre-trained artifacts, one per form)
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub models_dir: PathBuf,
    pub addr: SocketAddr,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary lookup (tests inject maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let models_dir = match lookup(MODELS_DIR_ENV) {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::Empty { var: MODELS_DIR_ENV })
            }
            Some(dir) => PathBuf::from(dir),
            None => models_dir(),
        };

        let raw_addr = lookup(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                var: ADDR_ENV,
                value: raw_addr.clone(),
            })?;

        Ok(Self { models_dir, addr })
    }
}
