//! Persistence for user-level settings: presence, its expiry, quiet mode.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::warn;

use super::{load_json, save_json};
use crate::models::StoredPresence;
use crate::storage::{Collection, Storage};

/// The saved presence and the instant it lapses, if both are present.
pub async fn load_presence(
    storage: &dyn Storage,
) -> Result<Option<(StoredPresence, DateTime<Utc>)>> {
    let presence: Option<StoredPresence> = load_json(storage, Collection::UserStatus).await?;
    if presence.is_none() {
        return Ok(None);
    }
    let expiry = load_expiry(storage).await?;
    Ok(presence.zip(expiry))
}

/// The expiry is written as a JSON string, but a bare RFC 3339 timestamp
/// is accepted too.
async fn load_expiry(storage: &dyn Storage) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = storage.load(Collection::StatusExpiry).await? else {
        return Ok(None);
    };
    if let Ok(at) = serde_json::from_str::<DateTime<Utc>>(&raw) {
        return Ok(Some(at));
    }
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(at) => Ok(Some(at.with_timezone(&Utc))),
        Err(e) => {
            warn!(
                collection = %Collection::StatusExpiry,
                backend = storage.name(),
                error = %e,
                "ignoring malformed saved state"
            );
            Ok(None)
        }
    }
}

pub async fn save_presence(
    storage: &dyn Storage,
    presence: &StoredPresence,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    save_json(storage, Collection::UserStatus, presence).await?;
    save_json(storage, Collection::StatusExpiry, &expires_at).await
}

pub async fn clear_presence(storage: &dyn Storage) -> Result<()> {
    storage.remove(Collection::UserStatus).await?;
    storage.remove(Collection::StatusExpiry).await
}

pub async fn load_quiet_mode(storage: &dyn Storage) -> Result<bool> {
    Ok(load_json(storage, Collection::QuietMode)
        .await?
        .unwrap_or(false))
}

pub async fn save_quiet_mode(storage: &dyn Storage, enabled: bool) -> Result<()> {
    save_json(storage, Collection::QuietMode, &enabled).await
}
