//! RSVP tallies.
//!
//! Chat participants carry one of two response tiers. Plans keep three
//! counters, the third ("still thinking") only reachable through an
//! explicit [`RsvpResponse::StillThinking`] record.

use std::fmt;
use std::str::FromStr;

use softplan_db::models::{ParseEnumError, Participant, RsvpCounts, RsvpStatus};

/// A response recorded against a plan's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsvpResponse {
    CountMeIn,
    ThinkICan,
    StillThinking,
}

impl From<RsvpStatus> for RsvpResponse {
    fn from(status: RsvpStatus) -> Self {
        match status {
            RsvpStatus::CountMeIn => Self::CountMeIn,
            RsvpStatus::ThinkICan => Self::ThinkICan,
        }
    }
}

impl fmt::Display for RsvpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CountMeIn => "count-me-in",
            Self::ThinkICan => "think-i-can",
            Self::StillThinking => "still-thinking",
        })
    }
}

impl FromStr for RsvpResponse {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count-me-in" => Ok(Self::CountMeIn),
            "think-i-can" => Ok(Self::ThinkICan),
            "still-thinking" => Ok(Self::StillThinking),
            other => Err(ParseEnumError {
                kind: "rsvp response",
                value: other.to_owned(),
            }),
        }
    }
}

/// Count participants by response tier.
pub fn aggregate(participants: &[Participant]) -> RsvpCounts {
    participants
        .iter()
        .fold(RsvpCounts::default(), |mut counts, p| {
            counts.record(p.rsvp_status.into());
            counts
        })
}

/// Operations on [`RsvpCounts`] beyond plain storage.
pub trait RsvpTally {
    /// Bump the counter for one response.
    fn record(&mut self, response: RsvpResponse);

    /// Human summary, e.g. `3 responses: 2 confirmed, 1 maybe`.
    fn summary(&self) -> String;
}

impl RsvpTally for RsvpCounts {
    fn record(&mut self, response: RsvpResponse) {
        let counter = match response {
            RsvpResponse::CountMeIn => &mut self.count_me_in,
            RsvpResponse::ThinkICan => &mut self.think_i_can,
            RsvpResponse::StillThinking => &mut self.still_thinking,
        };
        *counter = counter.saturating_add(1);
    }

    fn summary(&self) -> String {
        let total = self.total();
        if total == 0 {
            return "No responses yet".to_owned();
        }
        let parts: Vec<String> = [
            (self.count_me_in, "confirmed"),
            (self.think_i_can, "maybe"),
            (self.still_thinking, "still thinking"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();
        let noun = if total == 1 { "response" } else { "responses" };
        format!("{total} {noun}: {}", parts.join(", "))
    }
}
