pub mod api;
pub mod config;
pub mod core_state;
pub mod forms;
pub mod inference;
pub mod pipeline;
pub mod session;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::CoreState;
use crate::forms::FormCatalog;
use crate::inference::ModelRegistry;

/// Anything that stops the process before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Model loading failed: {0}")]
    Models(#[from] inference::InferenceError),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Catalog plus every model, loaded eagerly: a missing or mismatched
/// artifact stops startup before the port is bound.
pub fn build_state(config: &AppConfig) -> Result<CoreState, StartupError> {
    let catalog = FormCatalog::standard();
    let models = ModelRegistry::load(&config.models_dir, &catalog)?;
    tracing::info!(count = models.len(), "Models loaded");
    Ok(CoreState::new(catalog, models))
}

/// Load every model, serve until Ctrl-C, then drain and exit.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(models_dir = %config.models_dir.display(), addr = %config.addr, "Configuration resolved");

    let core = Arc::new(build_state(&config)?);
    let server = api::start_server(core, config.addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Serving");

    let signal = tokio::signal::ctrl_c().await.map_err(StartupError::Signal);
    server.stop().await;
    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use crate::inference::registry::tests::{write_all_artifacts, write_artifact};
    use crate::forms::FormId;

    fn config_for(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            models_dir: dir.to_path_buf(),
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        }
    }

    #[test]
    fn build_state_loads_every_form() {
        let dir = tempfile::tempdir().unwrap();
        write_all_artifacts(dir.path(), &FormCatalog::standard());

        let state = build_state(&config_for(dir.path())).unwrap();
        assert_eq!(state.models().len(), FormId::ALL.len());
    }

    #[test]
    fn build_state_fails_fast_on_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::standard();
        write_artifact(dir.path(), catalog.get(FormId::Diabetes), 8);

        let err = build_state(&config_for(dir.path())).unwrap_err();
        assert!(matches!(err, StartupError::Models(_)));
    }

    #[test]
    fn build_state_rejects_mis_sized_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::standard();
        write_all_artifacts(dir.path(), &catalog);
        // Overwrite Calories with a model fitted on the wrong column count.
        write_artifact(dir.path(), catalog.get(FormId::Calories), 6);

        let err = build_state(&config_for(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Models(inference::InferenceError::Incompatible { expected: 7, found: 6, .. })
        ));
    }
}
