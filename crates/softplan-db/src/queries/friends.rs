//! Persistence for the `friends` collection.

use anyhow::Result;

use super::{load_json, save_json};
use crate::models::Friend;
use crate::seed;
use crate::storage::{Collection, Storage};

pub async fn load_friends(storage: &dyn Storage) -> Result<Option<Vec<Friend>>> {
    load_json(storage, Collection::Friends).await
}

pub async fn load_friends_or_seed(storage: &dyn Storage) -> Result<Vec<Friend>> {
    Ok(load_friends(storage)
        .await?
        .unwrap_or_else(seed::sample_friends))
}

pub async fn save_friends(storage: &dyn Storage, friends: &[Friend]) -> Result<()> {
    save_json(storage, Collection::Friends, friends).await
}
