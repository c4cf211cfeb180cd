//! Plan form input and validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use softplan_db::models::{Audience, MoodTag};

/// Format every plan time is displayed in, e.g. `3:00 PM`.
const DISPLAY_FORMAT: &str = "%-I:%M %p";
/// Accepted input format for custom times; the hour may be zero-padded.
const INPUT_FORMAT: &str = "%I:%M %p";

/// Default gap between a plan's start and its chat closing, in minutes.
pub const DEFAULT_EXPIRY_GRACE_MINUTES: i64 = 30;

/// Parse a `h:mm AM/PM` string, case-insensitively.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), INPUT_FORMAT).ok()
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}

/// The UTC instant of `time` on `date`, interpreted in host local time.
///
/// A wall-clock time skipped by a DST jump falls back to reading it as UTC.
pub fn local_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = NaiveDateTime::new(date, time);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

// ---------------------------------------------------------------------------
// Time options
// ---------------------------------------------------------------------------

/// Time-of-day choice on the plan form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeOption {
    Morning,
    Afternoon,
    Evening,
    Night,
    /// Free-form `h:mm AM/PM`.
    Custom(String),
}

impl TimeOption {
    /// Wall-clock time this option stands for, if it parses.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        match self {
            Self::Morning => NaiveTime::from_hms_opt(9, 0, 0),
            Self::Afternoon => NaiveTime::from_hms_opt(15, 0, 0),
            Self::Evening => NaiveTime::from_hms_opt(18, 30, 0),
            Self::Night => NaiveTime::from_hms_opt(21, 0, 0),
            Self::Custom(raw) => parse_time_of_day(raw),
        }
    }

    /// The display string stored on the plan.
    pub fn display(&self) -> Option<String> {
        self.time_of_day().map(format_time_of_day)
    }
}

impl fmt::Display for TimeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Morning => f.write_str("morning"),
            Self::Afternoon => f.write_str("afternoon"),
            Self::Evening => f.write_str("evening"),
            Self::Night => f.write_str("night"),
            Self::Custom(raw) => f.write_str(raw),
        }
    }
}

/// Named slots are matched case-insensitively; anything else is a custom
/// time, checked later by validation.
impl From<&str> for TimeOption {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Self::Morning,
            "afternoon" => Self::Afternoon,
            "evening" => Self::Evening,
            "night" => Self::Night,
            _ => Self::Custom(s.trim().to_owned()),
        }
    }
}

impl FromStr for TimeOption {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// ---------------------------------------------------------------------------
// Expiry policy
// ---------------------------------------------------------------------------

/// When a new plan's chat becomes read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Thirty minutes after the plan starts.
    #[default]
    AfterStart,
    /// A fixed time of day on the plan's date.
    At(NaiveTime),
}

impl ExpiryPolicy {
    /// Absolute expiry for a plan starting at `start` on `date`.
    pub fn expires_at(&self, date: NaiveDate, start: NaiveTime) -> DateTime<Utc> {
        match self {
            Self::AfterStart => {
                local_instant(date, start) + Duration::minutes(DEFAULT_EXPIRY_GRACE_MINUTES)
            }
            Self::At(time) => local_instant(date, *time),
        }
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Unvalidated plan form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDraft {
    pub activity: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeOption>,
    pub location: String,
    pub mood: Vec<MoodTag>,
    pub audience: Audience,
    pub expiry: ExpiryPolicy,
}

/// Field-keyed validation messages. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Check a draft. Every failing field is reported, not just the first.
pub fn validate(draft: &PlanDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.activity.trim().is_empty() {
        errors.insert("activity", "Please enter an activity");
    }
    if draft.date.is_none() {
        errors.insert("date", "Please select a date");
    }
    match &draft.time {
        None => errors.insert("time", "Please select a time"),
        Some(option) if option.time_of_day().is_none() => {
            errors.insert("time", format!("Please enter a time like 3:00 PM, not \"{option}\""))
        }
        Some(_) => {}
    }
    if draft.mood.is_empty() {
        errors.insert("mood", "Please select at least one mood");
    }

    errors
}
