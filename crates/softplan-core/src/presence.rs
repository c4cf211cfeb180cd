//! The local user's presence: a short-lived status that lapses back to
//! "available", plus a separate quiet-mode switch.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use softplan_db::clock::Clock;
use softplan_db::models::{PresenceKind, StoredPresence};
use softplan_db::queries::settings;
use softplan_db::storage::Storage;

use crate::expiry::ExpiryTimer;

/// How long a chosen presence lasts before resetting.
pub const PRESENCE_TTL_HOURS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub kind: PresenceKind,
    /// `None` for the default presence, which never lapses.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            kind: PresenceKind::Available,
            expires_at: None,
        }
    }
}

#[derive(Clone)]
pub struct PresenceService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl PresenceService {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// The presence in effect now. A lapsed presence is cleared from storage.
    pub async fn current(&self) -> Result<Presence> {
        let Some((stored, expires_at)) = settings::load_presence(self.storage.as_ref()).await?
        else {
            return Ok(Presence::default());
        };
        if expires_at > self.clock.now() {
            return Ok(Presence {
                kind: stored.id,
                expires_at: Some(expires_at),
            });
        }
        settings::clear_presence(self.storage.as_ref())
            .await
            .context("failed to clear lapsed presence")?;
        info!(presence = %stored.id, "presence lapsed");
        Ok(Presence::default())
    }

    /// Choose a presence for the next eight hours.
    pub async fn set(&self, kind: PresenceKind) -> Result<Presence> {
        let expires_at = self.clock.now() + Duration::hours(PRESENCE_TTL_HOURS);
        settings::save_presence(self.storage.as_ref(), &StoredPresence::from(kind), expires_at)
            .await
            .context("failed to save presence")?;
        info!(presence = %kind, %expires_at, "presence set");
        Ok(Presence {
            kind,
            expires_at: Some(expires_at),
        })
    }

    pub async fn reset(&self) -> Result<()> {
        settings::clear_presence(self.storage.as_ref())
            .await
            .context("failed to clear presence")?;
        info!("presence reset");
        Ok(())
    }

    pub async fn quiet_mode(&self) -> Result<bool> {
        settings::load_quiet_mode(self.storage.as_ref()).await
    }

    /// Flip quiet mode and return the new setting.
    pub async fn toggle_quiet_mode(&self) -> Result<bool> {
        let enabled = !self.quiet_mode().await?;
        settings::save_quiet_mode(self.storage.as_ref(), enabled)
            .await
            .context("failed to save quiet mode")?;
        info!(enabled, "quiet mode toggled");
        Ok(enabled)
    }

    /// A timer for the current presence lapsing, if it can lapse.
    pub async fn watch(&self) -> Result<Option<ExpiryTimer>> {
        let presence = self.current().await?;
        Ok(presence
            .expires_at
            .map(|at| ExpiryTimer::start(at, self.clock.now())))
    }
}
