//! Persistence for the `chatData` collection.
//!
//! Threads are stored as a map keyed by chat id. A list of full threads is
//! also accepted on read and re-keyed; anything else is treated as
//! malformed.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{load_json, save_json};
use crate::models::ChatThread;
use crate::seed;
use crate::storage::{Collection, Storage};

/// Chat threads keyed by id.
pub type ThreadMap = BTreeMap<String, ChatThread>;

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredThreads {
    Keyed(ThreadMap),
    Listed(Vec<ChatThread>),
}

impl StoredThreads {
    fn into_map(self) -> ThreadMap {
        match self {
            Self::Keyed(mut map) => {
                for (key, thread) in &mut map {
                    if thread.id.is_empty() {
                        thread.id = key.clone();
                    }
                }
                map
            }
            Self::Listed(list) => list
                .into_iter()
                .filter(|t| !t.id.is_empty())
                .map(|t| (t.id.clone(), t))
                .collect(),
        }
    }
}

/// Saved threads, or `None` when nothing usable is stored.
pub async fn load_threads(storage: &dyn Storage) -> Result<Option<ThreadMap>> {
    let stored: Option<StoredThreads> = load_json(storage, Collection::Chats).await?;
    Ok(stored.map(StoredThreads::into_map))
}

/// Saved threads, or the built-in samples when nothing usable is stored.
pub async fn load_threads_or_seed(storage: &dyn Storage, now: DateTime<Utc>) -> Result<ThreadMap> {
    Ok(load_threads(storage)
        .await?
        .unwrap_or_else(|| seed::sample_threads(now)))
}

/// Replace the whole thread collection.
pub async fn save_threads(storage: &dyn Storage, threads: &ThreadMap) -> Result<()> {
    save_json(storage, Collection::Chats, threads).await
}
