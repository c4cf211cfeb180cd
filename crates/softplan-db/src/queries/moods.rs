//! Persistence for the `customMoods` collection: user-defined mood labels.

use anyhow::Result;

use super::{load_json, save_json};
use crate::storage::{Collection, Storage};

/// Saved custom mood labels; empty when nothing usable is stored.
pub async fn load_custom_moods(storage: &dyn Storage) -> Result<Vec<String>> {
    Ok(load_json(storage, Collection::CustomMoods)
        .await?
        .unwrap_or_default())
}

pub async fn save_custom_moods(storage: &dyn Storage, labels: &[String]) -> Result<()> {
    save_json(storage, Collection::CustomMoods, labels).await
}
