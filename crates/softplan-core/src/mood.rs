//! Mood vocabulary: the presets plus labels the user has added.

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::info;

use softplan_db::models::{MoodTag, PresetMood};
use softplan_db::queries::moods as mood_queries;
use softplan_db::storage::Storage;

#[derive(Debug, Error)]
pub enum MoodError {
    #[error("mood label is empty")]
    EmptyLabel,

    #[error("custom mood {0:?} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct MoodLibrary {
    storage: Arc<dyn Storage>,
}

impl MoodLibrary {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Presets first, then custom labels in the order they were added.
    pub async fn list(&self) -> Result<Vec<MoodTag>, MoodError> {
        let custom = self.custom().await?;
        Ok(PresetMood::ALL
            .into_iter()
            .map(MoodTag::preset)
            .chain(custom.into_iter().map(MoodTag::custom))
            .collect())
    }

    pub async fn custom(&self) -> Result<Vec<String>, MoodError> {
        Ok(mood_queries::load_custom_moods(self.storage.as_ref()).await?)
    }

    /// Add a label. A label that already names a preset or an existing custom
    /// mood is returned as that tag without being stored twice.
    pub async fn add_custom(&self, label: &str) -> Result<MoodTag, MoodError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(MoodError::EmptyLabel);
        }

        let tag = MoodTag::parse(label);
        if matches!(tag, MoodTag::Preset { .. }) {
            return Ok(tag);
        }

        let mut custom = self.custom().await?;
        if custom.iter().any(|c| c.eq_ignore_ascii_case(label)) {
            return Ok(tag);
        }
        custom.push(label.to_owned());
        mood_queries::save_custom_moods(self.storage.as_ref(), &custom)
            .await
            .context("failed to save custom moods")?;

        info!(label, "custom mood added");
        Ok(tag)
    }

    pub async fn remove_custom(&self, label: &str) -> Result<(), MoodError> {
        let label = label.trim();
        let mut custom = self.custom().await?;
        let before = custom.len();
        custom.retain(|c| !c.eq_ignore_ascii_case(label));
        if custom.len() == before {
            return Err(MoodError::NotFound(label.to_owned()));
        }
        mood_queries::save_custom_moods(self.storage.as_ref(), &custom)
            .await
            .context("failed to save custom moods")?;

        info!(label, "custom mood removed");
        Ok(())
    }
}
