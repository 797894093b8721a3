use std::path::PathBuf;

/// Server settings read from the environment (and `.env`, when present).
///
/// | Env Var               | Default        |
/// |-----------------------|----------------|
/// | `WATCHLIST_PORT`      | `5000`         |
/// | `WATCHLIST_DB_PATH`   | `watchlist.db` |
/// | `WATCHLIST_BASE_PATH` | (empty)        |
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub base_path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("WATCHLIST_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("WATCHLIST_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 5000,
        };

        let db_path = lookup("WATCHLIST_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("watchlist.db"));

        let base_path = lookup("WATCHLIST_BASE_PATH")
            .map(|path| normalize_base_path(&path))
            .unwrap_or_default();

        Ok(Self {
            port,
            db_path,
            base_path,
        })
    }
}

/// `"app/"` and `"/app"` both become `"/app"`; `"/"` becomes empty.
pub fn normalize_base_path(path: &str) -> String {
    let path = path.trim().trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
