use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Collection, Storage};

/// In-process storage. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<Collection, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collections currently held.
    pub async fn len(&self) -> usize {
        self.data.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.lock().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, collection: Collection) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(&collection).cloned())
    }

    async fn save(&self, collection: Collection, contents: &str) -> Result<()> {
        self.data
            .lock()
            .await
            .insert(collection, contents.to_owned());
        Ok(())
    }

    async fn remove(&self, collection: Collection) -> Result<()> {
        self.data.lock().await.remove(&collection);
        Ok(())
    }
}
