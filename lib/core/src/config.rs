use std::path::PathBuf;

/// Common storage/listen configuration shared by all service binaries.
///
/// The binary parses these from its config file and command line, then
/// passes them to storage layer initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding all persistent data.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/data.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/data.sqlite` if not specified.
    pub sqlite_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            sqlite_path: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Some(ref path) = self.db_path {
            return path.clone();
        }
        self.base_dir().join("data.redb")
    }

    /// Resolve the SQLite database path.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        if let Some(ref path) = self.sqlite_path {
            return path.clone();
        }
        self.base_dir().join("data.sqlite")
    }

    fn base_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_under_data_dir() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/var/lib/burrow")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/var/lib/burrow/data.redb"));
        assert_eq!(config.resolve_sqlite_path(), PathBuf::from("/var/lib/burrow/data.sqlite"));
    }

    #[test]
    fn explicit_paths_win() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/var/lib/burrow")),
            sqlite_path: Some(PathBuf::from("/tmp/other.sqlite")),
            ..Default::default()
        };
        assert_eq!(config.resolve_sqlite_path(), PathBuf::from("/tmp/other.sqlite"));
    }
}
