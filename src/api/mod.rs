//! Admin REST API.
//!
//! Exposes the clinic's business logic as HTTP endpoints under `/api/`,
//! protected (except health and admin auth) by a bearer-token
//! middleware. The router is composable — `api_router()` returns a
//! `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::ApiServer;
pub use types::ApiContext;
