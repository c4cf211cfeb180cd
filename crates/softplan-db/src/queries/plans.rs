//! Persistence for the `userPlans` collection.

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::{load_json, save_json};
use crate::models::Plan;
use crate::seed;
use crate::storage::{Collection, Storage};

/// Saved plans, most recent first, or `None` when nothing usable is stored.
pub async fn load_plans(storage: &dyn Storage) -> Result<Option<Vec<Plan>>> {
    load_json(storage, Collection::Plans).await
}

/// Saved plans, or the built-in samples when nothing usable is stored.
pub async fn load_plans_or_seed(storage: &dyn Storage, now: DateTime<Utc>) -> Result<Vec<Plan>> {
    Ok(load_plans(storage)
        .await?
        .unwrap_or_else(|| seed::sample_plans(now)))
}

/// Replace the whole plan collection.
pub async fn save_plans(storage: &dyn Storage, plans: &[Plan]) -> Result<()> {
    save_json(storage, Collection::Plans, plans).await
}
