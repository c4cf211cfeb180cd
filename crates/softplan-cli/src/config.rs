//! Configuration file management for softplan.
//!
//! Provides a TOML-based config file at `~/.config/softplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use softplan_core::Identity;
use softplan_db::config::StoreConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub user: UserSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserSection {
    pub id: Option<String>,
    pub name: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the softplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/softplan` or `~/.config/softplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("softplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("softplan")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. `None` if there is no file; a file that
/// exists but does not parse is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct SoftplanConfig {
    pub store_config: StoreConfig,
    pub identity: Identity,
}

impl SoftplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Data dir: `cli_data_dir` > `SOFTPLAN_DATA_DIR` env > `storage.data_dir` > platform data dir
    /// - User: `user.id` / `user.name` from the file, each defaulting independently
    pub fn resolve(cli_data_dir: Option<&Path>) -> Result<Self> {
        let file_config = load_config()?.unwrap_or_default();

        let data_dir = if let Some(dir) = cli_data_dir {
            dir.to_path_buf()
        } else if let Some(dir) = std::env::var_os(StoreConfig::ENV_VAR) {
            PathBuf::from(dir)
        } else if let Some(dir) = file_config.storage.data_dir {
            dir
        } else {
            StoreConfig::default_data_dir()
        };

        let defaults = Identity::default();
        let identity = Identity::new(
            file_config.user.id.unwrap_or(defaults.id),
            file_config.user.name.unwrap_or(defaults.name),
        );

        Ok(Self {
            store_config: StoreConfig::new(data_dir),
            identity,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point `XDG_CONFIG_HOME` at a fresh temp dir for the duration of `f`.
    fn with_config_home<T>(f: impl FnOnce(&Path) -> T) -> T {
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let result = f(tmp.path());

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        result
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();

        let loaded = with_config_home(|_| {
            let original = ConfigFile {
                storage: StorageSection {
                    data_dir: Some(PathBuf::from("/tmp/softplan-data")),
                },
                user: UserSection {
                    id: Some("u42".to_string()),
                    name: Some("Robin".to_string()),
                },
            };
            save_config(&original).unwrap();
            load_config().unwrap().unwrap()
        });

        assert_eq!(
            loaded.storage.data_dir.as_deref(),
            Some(Path::new("/tmp/softplan-data"))
        );
        assert_eq!(loaded.user.id.as_deref(), Some("u42"));
        assert_eq!(loaded.user.name.as_deref(), Some("Robin"));
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let _lock = lock_env();
        let loaded = with_config_home(|_| load_config().unwrap());
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let _lock = lock_env();
        let result = with_config_home(|home| {
            let dir = home.join("softplan");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("config.toml"), "[storage\n").unwrap();
            SoftplanConfig::resolve(None)
        });
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("failed to parse config file"), "unexpected error: {msg}");
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();

        unsafe { std::env::set_var(StoreConfig::ENV_VAR, "/env/data") };
        let config = with_config_home(|_| {
            SoftplanConfig::resolve(Some(Path::new("/cli/data"))).unwrap()
        });
        unsafe { std::env::remove_var(StoreConfig::ENV_VAR) };

        assert_eq!(config.store_config.data_dir, PathBuf::from("/cli/data"));
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();

        unsafe { std::env::set_var(StoreConfig::ENV_VAR, "/env/data") };
        let config = with_config_home(|_| {
            save_config(&ConfigFile {
                storage: StorageSection {
                    data_dir: Some(PathBuf::from("/file/data")),
                },
                user: UserSection::default(),
            })
            .unwrap();
            SoftplanConfig::resolve(None).unwrap()
        });
        unsafe { std::env::remove_var(StoreConfig::ENV_VAR) };

        assert_eq!(config.store_config.data_dir, PathBuf::from("/env/data"));
    }

    #[test]
    fn resolve_reads_config_file_then_defaults() {
        let _lock = lock_env();
        unsafe { std::env::remove_var(StoreConfig::ENV_VAR) };

        let config = with_config_home(|_| {
            save_config(&ConfigFile {
                storage: StorageSection {
                    data_dir: Some(PathBuf::from("/file/data")),
                },
                user: UserSection {
                    id: None,
                    name: Some("Robin".to_string()),
                },
            })
            .unwrap();
            SoftplanConfig::resolve(None).unwrap()
        });
        assert_eq!(config.store_config.data_dir, PathBuf::from("/file/data"));
        assert_eq!(config.identity.name, "Robin");
        assert_eq!(config.identity.id, Identity::default().id);

        let config = with_config_home(|_| SoftplanConfig::resolve(None).unwrap());
        assert_eq!(config.store_config.data_dir, StoreConfig::default_data_dir());
        assert_eq!(config.identity, Identity::default());
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("softplan/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
