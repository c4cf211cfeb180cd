//! Friends list, grouped into tiers.

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use softplan_db::models::{Friend, FriendStatus, FriendTier};
use softplan_db::queries::friends as friend_queries;
use softplan_db::storage::Storage;

#[derive(Debug, Error)]
pub enum FriendError {
    #[error("friend {0} not found")]
    NotFound(String),

    #[error("friend name is empty")]
    EmptyName,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Narrowing applied when listing friends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendFilter {
    /// Case-insensitive substring of the name. Blank matches everyone.
    pub query: String,
    pub nearby_only: bool,
}

impl FriendFilter {
    fn matches(&self, friend: &Friend) -> bool {
        let query = self.query.trim().to_lowercase();
        (!self.nearby_only || friend.is_nearby)
            && (query.is_empty() || friend.name.to_lowercase().contains(&query))
    }
}

#[derive(Clone)]
pub struct FriendStore {
    storage: Arc<dyn Storage>,
}

impl FriendStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Friend>, FriendError> {
        Ok(friend_queries::load_friends_or_seed(self.storage.as_ref()).await?)
    }

    /// Friends matching `filter`, grouped by tier in tier order. Empty tiers
    /// are kept so every heading can be shown.
    pub async fn grouped(
        &self,
        filter: &FriendFilter,
    ) -> Result<Vec<(FriendTier, Vec<Friend>)>, FriendError> {
        let friends = self.list().await?;
        Ok(FriendTier::ALL
            .into_iter()
            .map(|tier| {
                let members = friends
                    .iter()
                    .filter(|f| f.tier == tier && filter.matches(f))
                    .cloned()
                    .collect();
                (tier, members)
            })
            .collect())
    }

    pub async fn add(&self, name: &str, tier: FriendTier) -> Result<Friend, FriendError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FriendError::EmptyName);
        }
        let friend = Friend {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            avatar: None,
            tier,
            status: FriendStatus::Offline,
            last_active: "Just added".to_owned(),
            is_nearby: false,
        };

        let mut friends = self.list().await?;
        friends.push(friend.clone());
        self.save(&friends).await?;

        info!(friend_id = %friend.id, %tier, "friend added");
        Ok(friend)
    }

    pub async fn set_tier(&self, id: &str, tier: FriendTier) -> Result<Friend, FriendError> {
        let updated = self.modify(id, |f| f.tier = tier).await?;
        info!(friend_id = %id, %tier, "friend tier changed");
        Ok(updated)
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<Friend, FriendError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FriendError::EmptyName);
        }
        self.modify(id, |f| f.name = name.to_owned()).await
    }

    pub async fn remove(&self, id: &str) -> Result<Friend, FriendError> {
        let mut friends = self.list().await?;
        let pos = friends
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| FriendError::NotFound(id.to_owned()))?;
        let removed = friends.remove(pos);
        self.save(&friends).await?;

        info!(friend_id = %id, "friend removed");
        Ok(removed)
    }

    async fn modify(
        &self,
        id: &str,
        edit: impl FnOnce(&mut Friend),
    ) -> Result<Friend, FriendError> {
        let mut friends = self.list().await?;
        let friend = friends
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FriendError::NotFound(id.to_owned()))?;
        edit(friend);
        let updated = friend.clone();
        self.save(&friends).await?;
        Ok(updated)
    }

    async fn save(&self, friends: &[Friend]) -> Result<(), FriendError> {
        friend_queries::save_friends(self.storage.as_ref(), friends)
            .await
            .context("failed to save friends")?;
        Ok(())
    }
}
