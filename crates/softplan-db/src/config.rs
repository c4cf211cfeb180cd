use std::env;
use std::path::{Path, PathBuf};

/// Storage configuration.
///
/// Reads from the `SOFTPLAN_DATA_DIR` environment variable, falling back to
/// the platform data directory (`~/.local/share/softplan` on Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one JSON file per collection.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Environment variable that overrides the data directory.
    pub const ENV_VAR: &str = "SOFTPLAN_DATA_DIR";

    /// Build a config from the environment.
    ///
    /// Priority: `SOFTPLAN_DATA_DIR` env var, then [`Self::default_data_dir`].
    pub fn from_env() -> Self {
        let data_dir = env::var_os(Self::ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_data_dir);
        Self { data_dir }
    }

    /// Build a config from an explicit directory (useful for tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Platform data directory, or `./.softplan` when the platform has none.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("softplan"))
            .unwrap_or_else(|| PathBuf::from(".softplan"))
    }

    /// Path of the JSON file backing a collection key.
    pub fn collection_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
