//! Daybook HTTP API
//!
//! JSON REST interface over `daybook-core`, mounted under `/api`.
//!
//! # Usage
//!
//! ```ignore
//! let state = AppState::new(Database::open("daybook.db")?, AuthService::new(policy)?);
//! let server = Server::start("127.0.0.1:8080".parse()?, state).await?;
//! tokio::signal::ctrl_c().await?;
//! server.shutdown();
//! server.stopped().await;
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{Error, Result};
pub use routes::router;
pub use server::Server;
pub use state::AppState;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;
