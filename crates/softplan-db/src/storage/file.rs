use std::io::ErrorKind;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::{Collection, Storage};
use crate::config::StoreConfig;

/// One JSON file per collection under the configured data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    config: StoreConfig,
}

impl FileStorage {
    /// Open storage, creating the data directory if it does not exist yet.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let dir = config.data_dir();
        let existed = fs::try_exists(dir).await.unwrap_or(false);
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        if !existed {
            info!(dir = %dir.display(), "data directory created");
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Size in bytes of every collection saved so far.
    ///
    /// Useful for the `softplan init` summary.
    pub async fn collection_sizes(&self) -> Result<Vec<(Collection, u64)>> {
        let mut sizes = Vec::new();
        for collection in Collection::ALL {
            let path = self.config.collection_path(collection.key());
            match fs::metadata(&path).await {
                Ok(meta) => sizes.push((collection, meta.len())),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("failed to stat {}", path.display()));
                }
            }
        }
        Ok(sizes)
    }
}

#[async_trait]
impl Storage for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, collection: Collection) -> Result<Option<String>> {
        let path = self.config.collection_path(collection.key());
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    async fn save(&self, collection: Collection, contents: &str) -> Result<()> {
        let path = self.config.collection_path(collection.key());
        // Readers never observe a half-written collection.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("failed to replace {}", path.display()))?;
        debug!(collection = %collection, bytes = contents.len(), "collection saved");
        Ok(())
    }

    async fn remove(&self, collection: Collection) -> Result<()> {
        let path = self.config.collection_path(collection.key());
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}
