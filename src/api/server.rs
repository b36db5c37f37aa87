//! HTTP server lifecycle: bind, spawn, shut down.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel. The caller owns the handle and decides when to stop.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::app_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Where a running server is listening.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSession {
    pub server_addr: String,
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running server.
pub struct AppServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AppServer {
    /// Send the shutdown signal. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to drain.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Server task ended abnormally: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start serving `app_router` on `addr`.
///
/// Port 0 binds an ephemeral port; the chosen port is in the returned
/// session metadata.
pub async fn start_server(core: Arc<CoreState>, addr: SocketAddr) -> Result<AppServer, ServerError> {
    // 1. Bind
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    tracing::info!(%addr, "Server binding");

    // 2. Build the router
    let app = app_router(core);

    // 3. Record the bound address
    let session = ServerSession {
        server_addr: addr.to_string(),
        port: addr.port(),
    };

    // 4. Set up shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // 5. Spawn server in background task
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(AppServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::core_state::tests::state_with_output;

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_core() -> Arc<CoreState> {
        Arc::new(state_with_output(1.0))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let server = start_server(test_core(), loopback())
            .await
            .expect("server should start");

        assert!(server.session.port > 0);
        assert_eq!(
            server.session.server_addr,
            format!("127.0.0.1:{}", server.session.port)
        );

        let url = format!("http://127.0.0.1:{}/api/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.headers()["cache-control"], "no-store");

        server.stop().await;
    }

    #[tokio::test]
    async fn serves_prediction_over_http() {
        let server = start_server(test_core(), loopback())
            .await
            .expect("server should start");
        let port = server.session.port;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://127.0.0.1:{port}/forms/calories/predict"))
            .form(&[
                ("Gender", "Male"),
                ("Age", "30"),
                ("Height (cm)", "180"),
                ("Weight (kg)", "80"),
                ("Exercise Duration (min)", "20"),
                ("Heart Rate", "100"),
                ("Body Temperature (°C)", "40"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body = resp.text().await.unwrap();
        assert!(body.contains("Estimated Calories Burnt: 1.00 kcal"));

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/nonexistent"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let first = start_server(test_core(), loopback()).await.unwrap();
        let taken: SocketAddr = first.session.server_addr.parse().unwrap();

        let second = start_server(test_core(), taken).await;
        assert!(matches!(second, Err(ServerError::Bind { .. })));

        first.stop().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(test_core(), loopback())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
        server.stop().await;
    }
}
