use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Remedi";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port, overridable via `REMEDI_PORT`.
pub const DEFAULT_PORT: u16 = 3000;

/// Default vision model, overridable via `REMEDI_VISION_MODEL`.
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";

/// Get the application data directory
/// ~/Remedi/ on all platforms, or `REMEDI_DATA_DIR` when set.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("REMEDI_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Remedi")
}

/// Get the SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("remedi.db")
}

/// HTTP port the service binds to.
pub fn server_port() -> u16 {
    std::env::var("REMEDI_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Vision provider API key (`GEMINI_API_KEY`), None when unset or blank.
pub fn vision_api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

/// Vision model identifier sent to the provider.
pub fn vision_model() -> String {
    std::env::var("REMEDI_VISION_MODEL")
        .ok()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string())
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info,tower_http=warn", env!("CARGO_PKG_NAME"))
}
