//! Typed load/save functions, one module per collection.
//!
//! Every loader treats unreadable JSON as "nothing saved": the fault is
//! logged and the caller falls back to built-in sample data.

pub mod chats;
pub mod friends;
pub mod moods;
pub mod plans;
pub mod settings;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::storage::{Collection, Storage};

/// Load and decode a collection. Malformed contents yield `Ok(None)`.
pub(crate) async fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    collection: Collection,
) -> Result<Option<T>> {
    let Some(raw) = storage.load(collection).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(
                collection = %collection,
                backend = storage.name(),
                error = %e,
                "ignoring malformed saved state"
            );
            Ok(None)
        }
    }
}

/// Encode and save a collection, replacing whatever was there.
pub(crate) async fn save_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    collection: Collection,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)
        .with_context(|| format!("failed to encode {collection}"))?;
    storage
        .save(collection, &raw)
        .await
        .with_context(|| format!("failed to save {collection}"))
}
