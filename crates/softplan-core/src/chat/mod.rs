//! Plan-scoped chat threads.
//!
//! [`ChatStore`] is the single repository for threads, keyed by chat id.
//! Inbox previews are derived from it (see [`preview`]) and never stored on
//! their own.

pub mod preview;
pub mod view;

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use softplan_db::clock::Clock;
use softplan_db::models::{ChatThread, Message, Reaction};
use softplan_db::queries::chats::{self as chat_queries, ThreadMap};
use softplan_db::storage::Storage;

use crate::identity::Identity;

pub use preview::{InboxPreview, InboxTab, previews};
pub use view::{ChatHeader, ChatView};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat {0} not found")]
    NotFound(String),

    #[error("message {message_id} not found in chat {chat_id}")]
    MessageNotFound { chat_id: String, message_id: String },

    #[error("chat {0} has expired and is read-only")]
    Expired(String),

    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Whether a reaction toggle added or removed the reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Added,
    Removed,
}

/// Repository for chat threads.
#[derive(Clone)]
pub struct ChatStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    me: Identity,
}

impl ChatStore {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, me: Identity) -> Self {
        Self { storage, clock, me }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn identity(&self) -> &Identity {
        &self.me
    }

    async fn load(&self) -> Result<ThreadMap, ChatError> {
        Ok(chat_queries::load_threads_or_seed(self.storage.as_ref(), self.clock.now()).await?)
    }

    async fn save(&self, threads: &ThreadMap) -> Result<(), ChatError> {
        chat_queries::save_threads(self.storage.as_ref(), threads)
            .await
            .context("failed to save chats")?;
        Ok(())
    }

    pub async fn get_by_id(&self, chat_id: &str) -> Result<ChatThread, ChatError> {
        self.load()
            .await?
            .remove(chat_id)
            .ok_or_else(|| ChatError::NotFound(chat_id.to_owned()))
    }

    pub async fn list(&self) -> Result<Vec<ChatThread>, ChatError> {
        Ok(self.load().await?.into_values().collect())
    }

    /// Insert or replace a thread under its own id.
    pub async fn upsert(&self, thread: ChatThread) -> Result<(), ChatError> {
        let mut threads = self.load().await?;
        debug!(chat_id = %thread.id, "upserting chat");
        threads.insert(thread.id.clone(), thread);
        self.save(&threads).await
    }

    pub async fn remove(&self, chat_id: &str) -> Result<ChatThread, ChatError> {
        let mut threads = self.load().await?;
        let removed = threads
            .remove(chat_id)
            .ok_or_else(|| ChatError::NotFound(chat_id.to_owned()))?;
        self.save(&threads).await?;
        info!(chat_id, "chat removed");
        Ok(removed)
    }

    /// Post a message as the local user.
    ///
    /// Rejected without any change if the chat is unknown, expired, or the
    /// text is blank (emoji messages are exempt from the blank check).
    pub async fn append_message(
        &self,
        chat_id: &str,
        content: &str,
        is_emoji: bool,
    ) -> Result<Message, ChatError> {
        let now = self.clock.now();
        let mut threads = self.load().await?;
        let thread = threads
            .get_mut(chat_id)
            .ok_or_else(|| ChatError::NotFound(chat_id.to_owned()))?;
        if thread.is_expired(now) {
            return Err(ChatError::Expired(chat_id.to_owned()));
        }
        let content = content.trim();
        if content.is_empty() && !is_emoji {
            return Err(ChatError::EmptyMessage);
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender: self.me.sender(),
            content: content.to_owned(),
            timestamp: now,
            is_emoji,
            reactions: Vec::new(),
        };
        thread.messages.push(message.clone());
        self.save(&threads).await?;

        info!(chat_id, message_id = %message.id, is_emoji, "message sent");
        Ok(message)
    }

    /// Add `user`'s `emoji` to a message, or take it back if already there.
    ///
    /// Allowed on expired threads.
    pub async fn toggle_reaction(
        &self,
        chat_id: &str,
        message_id: &str,
        emoji: &str,
        user: &Identity,
    ) -> Result<ReactionChange, ChatError> {
        let mut threads = self.load().await?;
        let thread = threads
            .get_mut(chat_id)
            .ok_or_else(|| ChatError::NotFound(chat_id.to_owned()))?;
        let message = thread
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| ChatError::MessageNotFound {
                chat_id: chat_id.to_owned(),
                message_id: message_id.to_owned(),
            })?;

        let existing = message
            .reactions
            .iter()
            .position(|r| r.user_id == user.id && r.emoji == emoji);
        let change = match existing {
            Some(pos) => {
                message.reactions.remove(pos);
                ReactionChange::Removed
            }
            None => {
                message.reactions.push(Reaction {
                    emoji: emoji.to_owned(),
                    user_id: user.id.clone(),
                    user_name: user.name.clone(),
                });
                ReactionChange::Added
            }
        };
        self.save(&threads).await?;

        debug!(chat_id, message_id, emoji, ?change, "reaction toggled");
        Ok(change)
    }

    /// Zero the thread's unread counter.
    pub async fn mark_read(&self, chat_id: &str) -> Result<(), ChatError> {
        let mut threads = self.load().await?;
        let thread = threads
            .get_mut(chat_id)
            .ok_or_else(|| ChatError::NotFound(chat_id.to_owned()))?;
        if thread.unread == 0 {
            return Ok(());
        }
        thread.unread = 0;
        self.save(&threads).await?;
        debug!(chat_id, "chat marked read");
        Ok(())
    }
}
