//! HTTP server handle
//!
//! Binds the listener, serves the router on a background task and stops on
//! request.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::Result;
use crate::routes::router;
use crate::state::AppState;

/// Running API server
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl Server {
    /// Bind `addr` and start serving. Port 0 picks a free port.
    pub async fn start(addr: SocketAddr, state: AppState) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let bound_addr = listener.local_addr()?;

        info!(addr = %bound_addr, "Server started");

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let app = router(state);

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await;
            if let Err(e) = served {
                error!(error = %e, "Server failed");
            }
        });

        Ok(Server {
            addr: bound_addr,
            shutdown_tx,
            task,
        })
    }

    /// Get the server's bound address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Begin graceful shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        info!("Server shutdown initiated");
    }

    /// Wait for the serve task to finish
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            error!(error = %e, "Server task panicked");
        }
    }
}
