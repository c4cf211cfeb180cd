//! Plan service layer.
//!
//! Orchestrates the plan collection and the 1:1 chat thread each plan owns.
//! Every mutation loads the whole collection, edits it in memory and writes
//! it back through the storage port.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use softplan_db::clock::Clock;
use softplan_db::models::{ChatThread, Plan, PlanSnapshot, RsvpCounts, RsvpStatus};
use softplan_db::queries::{chats as chat_queries, plans as plan_queries};
use softplan_db::storage::Storage;

use super::draft::{PlanDraft, ValidationErrors, validate};
use crate::identity::Identity;
use crate::rsvp::{RsvpResponse, RsvpTally};

/// Errors surfaced by [`PlanService`].
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid plan: {0}")]
    Validation(ValidationErrors),

    #[error("plan {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// First half of a two-step delete. Only [`PlanService::confirm_delete`]
/// mutates anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    plan_id: String,
    activity: String,
}

impl DeleteRequest {
    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    /// Activity of the plan at request time, for the confirmation prompt.
    pub fn activity(&self) -> &str {
        &self.activity
    }
}

/// Creates, edits and deletes the local user's plans.
#[derive(Clone)]
pub struct PlanService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    me: Identity,
}

impl PlanService {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, me: Identity) -> Self {
        Self { storage, clock, me }
    }

    pub fn validate(&self, draft: &PlanDraft) -> ValidationErrors {
        validate(draft)
    }

    /// All plans, most recent first.
    pub async fn list(&self) -> Result<Vec<Plan>, PlanError> {
        Ok(plan_queries::load_plans_or_seed(self.storage.as_ref(), self.clock.now()).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Plan, PlanError> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PlanError::NotFound(id.to_owned()))
    }

    /// Validate and store a new plan, then open its chat thread.
    ///
    /// An invalid draft is rejected before storage is touched.
    pub async fn create(&self, draft: PlanDraft) -> Result<Plan, PlanError> {
        let checked = Checked::from_draft(&draft)?;
        let now = self.clock.now();

        let plan = Plan {
            id: Uuid::new_v4().to_string(),
            activity: draft.activity.trim().to_owned(),
            description: draft.description.trim().to_owned(),
            date: checked.date,
            time: checked.time.clone(),
            location: draft.location.trim().to_owned(),
            mood: draft.mood.clone(),
            rsvps: RsvpCounts::default(),
            audience: draft.audience,
            created_at: Some(now),
        };

        let mut plans = self.list().await?;
        plans.insert(0, plan.clone());
        plan_queries::save_plans(self.storage.as_ref(), &plans)
            .await
            .context("failed to save new plan")?;

        let expires_at = draft.expiry.expires_at(checked.date, checked.start);
        let thread = ChatThread {
            id: plan.id.clone(),
            plan: self.snapshot(&plan, expires_at, now),
            messages: Vec::new(),
            unread: 0,
            plan_related: true,
        };
        let mut threads = chat_queries::load_threads_or_seed(self.storage.as_ref(), now).await?;
        threads.insert(thread.id.clone(), thread);
        chat_queries::save_threads(self.storage.as_ref(), &threads)
            .await
            .context("failed to open chat for new plan")?;

        info!(
            plan_id = %plan.id,
            activity = %plan.activity,
            %expires_at,
            "plan created"
        );
        Ok(plan)
    }

    /// Replace a plan's editable fields with those of `patch`.
    ///
    /// The id, counters, audience and creation time are kept. The plan's chat
    /// picks up the new details but keeps its original expiry.
    pub async fn update(&self, id: &str, patch: PlanDraft) -> Result<Plan, PlanError> {
        let checked = Checked::from_draft(&patch)?;
        let now = self.clock.now();

        let mut plans = self.list().await?;
        let plan = plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PlanError::NotFound(id.to_owned()))?;
        plan.activity = patch.activity.trim().to_owned();
        plan.description = patch.description.trim().to_owned();
        plan.date = checked.date;
        plan.time = checked.time;
        plan.location = patch.location.trim().to_owned();
        plan.mood = patch.mood;
        let updated = plan.clone();

        plan_queries::save_plans(self.storage.as_ref(), &plans)
            .await
            .with_context(|| format!("failed to save plan {id}"))?;

        let mut threads = chat_queries::load_threads_or_seed(self.storage.as_ref(), now).await?;
        if let Some(thread) = threads.get_mut(id).filter(|t| owns_thread(t, id)) {
            let expires_at = thread.plan.expires_at;
            let participants = std::mem::take(&mut thread.plan.participants);
            thread.plan = PlanSnapshot {
                participants,
                ..self.snapshot(&updated, expires_at, now)
            };
            chat_queries::save_threads(self.storage.as_ref(), &threads)
                .await
                .with_context(|| format!("failed to refresh chat for plan {id}"))?;
        }

        info!(plan_id = %id, "plan updated");
        Ok(updated)
    }

    /// Look up the plan to be deleted without changing anything.
    pub async fn request_delete(&self, id: &str) -> Result<DeleteRequest, PlanError> {
        let plan = self.get(id).await?;
        Ok(DeleteRequest {
            plan_id: plan.id,
            activity: plan.activity,
        })
    }

    /// Delete the plan named by `request` together with its chat thread.
    pub async fn confirm_delete(&self, request: DeleteRequest) -> Result<Plan, PlanError> {
        let id = request.plan_id;
        let now = self.clock.now();

        let mut plans = self.list().await?;
        let pos = plans
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PlanError::NotFound(id.clone()))?;
        let removed = plans.remove(pos);
        plan_queries::save_plans(self.storage.as_ref(), &plans)
            .await
            .with_context(|| format!("failed to delete plan {id}"))?;

        let mut threads = chat_queries::load_threads_or_seed(self.storage.as_ref(), now).await?;
        if threads.get(&id).is_some_and(|t| owns_thread(t, &id)) {
            threads.remove(&id);
            chat_queries::save_threads(self.storage.as_ref(), &threads)
                .await
                .with_context(|| format!("failed to remove chat for plan {id}"))?;
        }

        info!(plan_id = %id, activity = %removed.activity, "plan deleted");
        Ok(removed)
    }

    /// Count one response against a plan's counters.
    pub async fn record_rsvp(&self, id: &str, response: RsvpResponse) -> Result<Plan, PlanError> {
        let mut plans = self.list().await?;
        let plan = plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PlanError::NotFound(id.to_owned()))?;
        plan.rsvps.record(response);
        let updated = plan.clone();

        plan_queries::save_plans(self.storage.as_ref(), &plans)
            .await
            .with_context(|| format!("failed to save rsvp for plan {id}"))?;

        info!(plan_id = %id, %response, total = updated.rsvps.total(), "rsvp recorded");
        Ok(updated)
    }

    fn snapshot(&self, plan: &Plan, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> PlanSnapshot {
        let today = now.with_timezone(&Local).date_naive();
        PlanSnapshot {
            id: plan.id.clone(),
            activity: plan.activity.clone(),
            description: plan.description.clone(),
            date: display_date(plan.date, today),
            time: plan.time.clone(),
            location: plan.location.clone(),
            host: self.me.name.clone(),
            mood: plan.mood.clone(),
            expires_at,
            participants: vec![self.me.participant(RsvpStatus::CountMeIn)],
        }
    }
}

/// A plan's chat is the plan-related thread stored under the plan's id.
/// Any other thread under that key belongs to someone else.
fn owns_thread(thread: &ChatThread, plan_id: &str) -> bool {
    thread.plan_related && thread.plan.id == plan_id
}

/// Validated pieces of a draft.
struct Checked {
    date: NaiveDate,
    start: chrono::NaiveTime,
    time: String,
}

impl Checked {
    fn from_draft(draft: &PlanDraft) -> Result<Self, PlanError> {
        let errors = validate(draft);
        let parts = draft
            .date
            .zip(draft.time.as_ref().and_then(|t| t.time_of_day()));
        match parts {
            Some((date, start)) if errors.is_empty() => Ok(Self {
                date,
                start,
                time: super::draft::format_time_of_day(start),
            }),
            _ => Err(PlanError::Validation(errors)),
        }
    }
}

/// Calendar date as shown in a chat header: `Today`, `Tomorrow`, or
/// `Sat, Jun 1`.
pub fn display_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_owned()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_owned()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_is_relative_near_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(display_date(today, today), "Today");
        assert_eq!(display_date(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            display_date(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(), today),
            "Sat, Jun 8"
        );
    }
}
