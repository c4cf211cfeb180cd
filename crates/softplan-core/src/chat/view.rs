//! An open chat: the thread, its header, and a composer that locks itself
//! when the plan expires.

use std::fmt;

use chrono::{DateTime, Utc};
use softplan_db::models::{ChatThread, Message, MoodTag, RsvpCounts};
use tokio::sync::watch;
use tracing::info;

use super::{ChatError, ChatStore, ReactionChange};
use crate::expiry::{ExpiryTimer, countdown_label, evaluate};
use crate::rsvp::aggregate;

/// Rendered header of an open chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatHeader {
    pub activity: String,
    pub mood: Vec<MoodTag>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub host: String,
    /// `1h 30m left`, or `Expired`.
    pub countdown: String,
    pub is_expired: bool,
    pub rsvps: RsvpCounts,
    pub is_one_on_one: bool,
}

impl fmt::Display for ChatHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", self.activity, self.countdown)?;
        if !self.mood.is_empty() {
            let moods: Vec<String> = self.mood.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", moods.join("  "))?;
        }
        write!(f, "{} at {}", self.date, self.time)?;
        if !self.location.is_empty() {
            write!(f, " · {}", self.location)?;
        }
        if !self.host.is_empty() {
            write!(f, " · hosted by {}", self.host)?;
        }
        writeln!(f)?;
        if !self.is_one_on_one {
            write!(
                f,
                "{} count me in · {} think I can",
                self.rsvps.count_me_in, self.rsvps.think_i_can
            )?;
        }
        Ok(())
    }
}

/// A chat opened for reading and writing.
///
/// Holds an [`ExpiryTimer`] for the plan so the composer disables itself at
/// the expiry instant. Dropping the view cancels the timer.
pub struct ChatView {
    store: ChatStore,
    thread: ChatThread,
    timer: ExpiryTimer,
}

impl ChatView {
    /// Load a thread and arm its expiry timer. Must run inside a Tokio runtime.
    pub async fn open(store: ChatStore, chat_id: &str) -> Result<Self, ChatError> {
        let thread = store.get_by_id(chat_id).await?;
        let timer = ExpiryTimer::start(thread.plan.expires_at, store.clock().now());
        Ok(Self {
            store,
            thread,
            timer,
        })
    }

    pub fn thread(&self) -> &ChatThread {
        &self.thread
    }

    /// False once the expiry timer has fired.
    pub fn composer_enabled(&self) -> bool {
        !self.timer.is_expired()
    }

    /// Observe the composer locking.
    pub fn expiry_watch(&self) -> watch::Receiver<bool> {
        self.timer.subscribe()
    }

    /// Resolve when the chat expires. `false` if the timer was cancelled.
    pub async fn wait_expired(&self) -> bool {
        self.timer.expired().await
    }

    /// Send a message through the store. Refused once the composer is locked.
    pub async fn send(&mut self, content: &str, is_emoji: bool) -> Result<Message, ChatError> {
        if !self.composer_enabled() {
            return Err(ChatError::Expired(self.thread.id.clone()));
        }
        let message = self
            .store
            .append_message(&self.thread.id, content, is_emoji)
            .await?;
        self.thread.messages.push(message.clone());
        Ok(message)
    }

    /// Toggle the local user's reaction on a message.
    pub async fn react(&mut self, message_id: &str, emoji: &str) -> Result<ReactionChange, ChatError> {
        let me = self.store.identity().clone();
        let change = self
            .store
            .toggle_reaction(&self.thread.id, message_id, emoji, &me)
            .await?;
        self.refresh().await?;
        Ok(change)
    }

    /// Re-read the thread from storage.
    pub async fn refresh(&mut self) -> Result<(), ChatError> {
        let thread = self.store.get_by_id(&self.thread.id).await?;
        if thread.plan.expires_at != self.timer.expires_at() {
            info!(chat_id = %thread.id, "chat expiry moved, rescheduling timer");
            self.timer
                .reschedule(thread.plan.expires_at, self.store.clock().now());
        }
        self.thread = thread;
        Ok(())
    }

    pub fn header(&self, now: DateTime<Utc>) -> ChatHeader {
        let plan = &self.thread.plan;
        let is_expired = evaluate(plan.expires_at, now).is_expired();
        let countdown = if is_expired {
            countdown_label(plan.expires_at, now)
        } else {
            format!("{} left", countdown_label(plan.expires_at, now))
        };
        ChatHeader {
            activity: plan.activity.clone(),
            mood: plan.mood.clone(),
            date: plan.date.clone(),
            time: plan.time.clone(),
            location: plan.location.clone(),
            host: plan.host.clone(),
            countdown,
            is_expired,
            rsvps: aggregate(&plan.participants),
            is_one_on_one: plan.participants.len() == 2,
        }
    }
}
