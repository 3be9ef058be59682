//! Shared types for the API layer.

use std::sync::Arc;

use base64::Engine;
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::Config;
use crate::db;
use crate::synthesis::RiskWeights;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<Config>,
    pub weights: Arc<RiskWeights>,
}

impl ApiContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            weights: Arc::new(RiskWeights::default()),
        }
    }

    /// Open a database connection for this request.
    ///
    /// Each handler owns its own connection; SQLite serializes writers
    /// internally, and per-request reads are independent.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        db::open_database(&self.config.db_path)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════
// Admin context — injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Authenticated admin context, injected into request extensions
/// by the auth middleware after successful token validation.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: i64,
    pub username: String,
}

// ═══════════════════════════════════════════════════════════
// Bearer tokens
// ═══════════════════════════════════════════════════════════

/// Hash a bearer token with SHA-256 for storage/lookup.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
