//! API server lifecycle — binds the listener, mounts `api_router()`,
//! and runs the axum server in a background task with a shutdown
//! channel. Pattern: bind → spawn → return handle.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Start the API server on the given address.
///
/// Binds the listener (an `:0` port is resolved to the actual one),
/// builds the router, and spawns the serve loop in a background tokio
/// task. Returns a handle with the bound address and shutdown channel.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = result {
            tracing::error!("API server error: {e}");
        }
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        handle,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;

    fn test_ctx() -> (ApiContext, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: tmp.path().join("test.db"),
            uploads_dir: tmp.path().join("uploads"),
            session_ttl_hours: 24,
        };
        (ApiContext::new(Arc::new(config)), tmp)
    }

    #[tokio::test]
    async fn server_binds_ephemeral_port_and_shuts_down() {
        let (ctx, _tmp) = test_ctx();
        let mut server = start_server(ctx, "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();

        assert_ne!(server.addr.port(), 0);

        // Health endpoint answers over a real TCP connection
        let response = raw_get(server.addr, "/api/health").await;
        assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");

        server.shutdown();
        server.join().await;
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let (ctx, _tmp) = test_ctx();
        let mut first = start_server(ctx.clone(), "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();

        // Same port again must fail
        let result = start_server(ctx, first.addr).await;
        assert!(result.is_err());

        first.shutdown();
        first.join().await;
    }

    async fn raw_get(addr: SocketAddr, path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut buf = String::new();
        stream.read_to_string(&mut buf).await.unwrap();
        buf
    }
}
