use serde::{Deserialize, Serialize};

/// Admin account as exposed over the API (never carries the hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub admin_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}
