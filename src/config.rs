use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CareDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "caredesk=info,tower_http=info".to_string()
}

/// Get the application data directory
/// ~/CareDesk/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("CareDesk")
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Directory where uploaded documents are stored.
    pub uploads_dir: PathBuf,
    /// Admin session lifetime in hours.
    pub session_ttl_hours: i64,
}

impl Config {
    /// Resolve configuration from `CAREDESK_*` environment variables,
    /// falling back to defaults under the app data directory.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("CAREDESK_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| "127.0.0.1:3000".parse().expect("static addr"));

        let db_path = std::env::var("CAREDESK_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir().join("caredesk.db"));

        let uploads_dir = std::env::var("CAREDESK_UPLOADS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir().join("uploads"));

        let session_ttl_hours = std::env::var("CAREDESK_SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        Self {
            bind_addr,
            db_path,
            uploads_dir,
            session_ttl_hours,
        }
    }
}
