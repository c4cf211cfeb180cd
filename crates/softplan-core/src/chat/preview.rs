//! Inbox rows derived from chat threads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use softplan_db::models::{ChatThread, ParseEnumError};

use crate::expiry::{countdown_label, evaluate};

/// Inbox filter tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InboxTab {
    #[default]
    All,
    Plans,
    Direct,
}

impl fmt::Display for InboxTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Plans => "plans",
            Self::Direct => "direct",
        })
    }
}

impl FromStr for InboxTab {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "plans" => Ok(Self::Plans),
            "direct" => Ok(Self::Direct),
            other => Err(ParseEnumError {
                kind: "inbox tab",
                value: other.to_owned(),
            }),
        }
    }
}

/// One inbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxPreview {
    pub id: String,
    /// Plan activity, or the other person's name for a direct chat.
    pub name: String,
    pub last_message: String,
    pub last_activity: Option<DateTime<Utc>>,
    pub unread: u32,
    pub plan_related: bool,
    pub is_direct: bool,
    /// Countdown label, `Expired` once the thread is read-only.
    pub countdown: String,
    pub is_expired: bool,
}

impl InboxPreview {
    pub fn from_thread(thread: &ChatThread, me_id: &str, now: DateTime<Utc>) -> Self {
        let is_direct = is_direct(thread);
        let name = if is_direct {
            thread
                .plan
                .participants
                .iter()
                .find(|p| p.id != me_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| thread.plan.activity.clone())
        } else {
            thread.plan.activity.clone()
        };
        let last = thread.last_message();

        Self {
            id: thread.id.clone(),
            name,
            last_message: last.map(|m| m.content.clone()).unwrap_or_default(),
            last_activity: last.map(|m| m.timestamp),
            unread: thread.unread,
            plan_related: thread.plan_related,
            is_direct,
            countdown: countdown_label(thread.plan.expires_at, now),
            is_expired: evaluate(thread.plan.expires_at, now).is_expired(),
        }
    }

    fn matches(&self, query: &str, tab: InboxTab) -> bool {
        let in_tab = match tab {
            InboxTab::All => true,
            InboxTab::Plans => self.plan_related,
            InboxTab::Direct => self.is_direct,
        };
        in_tab && (query.is_empty() || self.name.to_lowercase().contains(query))
    }
}

/// A direct chat is a non-plan thread between exactly two people.
pub fn is_direct(thread: &ChatThread) -> bool {
    !thread.plan_related && thread.plan.participants.len() == 2
}

/// Filtered inbox rows, most recent activity first.
///
/// `query` matches case-insensitively against the row name; blank matches
/// everything.
pub fn previews<'a>(
    threads: impl IntoIterator<Item = &'a ChatThread>,
    me_id: &str,
    now: DateTime<Utc>,
    query: &str,
    tab: InboxTab,
) -> Vec<InboxPreview> {
    let query = query.trim().to_lowercase();
    let mut rows: Vec<InboxPreview> = threads
        .into_iter()
        .map(|t| InboxPreview::from_thread(t, me_id, now))
        .filter(|p| p.matches(&query, tab))
        .collect();
    rows.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    rows
}

#[cfg(test)]
mod tests {
    use softplan_db::seed;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn direct_chats_are_named_after_the_other_person() {
        let threads = seed::sample_threads(now());
        let rows = previews(threads.values(), "u1", now(), "", InboxTab::Direct);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Morgan", "Alex"]);
        assert!(rows.iter().all(|r| r.is_direct && !r.plan_related));
    }

    #[test]
    fn plans_tab_excludes_direct_chats() {
        let threads = seed::sample_threads(now());
        let rows = previews(threads.values(), "u1", now(), "", InboxTab::Plans);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.plan_related));
    }

    #[test]
    fn query_is_case_insensitive() {
        let threads = seed::sample_threads(now());
        let rows = previews(threads.values(), "u1", now(), "  MOVIE ", InboxTab::All);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "3");
        assert_eq!(rows[0].countdown, "24h 30m");
        assert_eq!(rows[0].last_message, "🍿");
    }

    #[test]
    fn expired_rows_say_so() {
        let threads = seed::sample_threads(now());
        let rows = previews(threads.values(), "u1", now(), "picnic", InboxTab::All);
        assert!(rows[0].is_expired);
        assert_eq!(rows[0].countdown, "Expired");
    }
}
