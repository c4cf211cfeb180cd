use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Moods
// ---------------------------------------------------------------------------

/// Built-in mood vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetMood {
    Chill,
    Social,
    Reflective,
    DeepTalk,
    LowEnergy,
    Open,
}

impl PresetMood {
    pub const ALL: [PresetMood; 6] = [
        Self::Chill,
        Self::Social,
        Self::Reflective,
        Self::DeepTalk,
        Self::LowEnergy,
        Self::Open,
    ];

    /// Stable identifier, as stored in legacy comma-joined mood strings.
    pub fn id(self) -> &'static str {
        match self {
            Self::Chill => "chill",
            Self::Social => "social",
            Self::Reflective => "reflective",
            Self::DeepTalk => "deep-talk",
            Self::LowEnergy => "low-energy",
            Self::Open => "open",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chill => "Chill",
            Self::Social => "Social",
            Self::Reflective => "Reflective",
            Self::DeepTalk => "Deep Talk",
            Self::LowEnergy => "Low Energy",
            Self::Open => "Open",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Chill => "😌",
            Self::Social => "🎉",
            Self::Reflective => "🧠",
            Self::DeepTalk => "💬",
            Self::LowEnergy => "😴",
            Self::Open => "🤔",
        }
    }
}

impl fmt::Display for PresetMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PresetMood {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| ParseEnumError::new("mood", s))
    }
}

/// A mood tag on a plan: either one of the presets or a user-defined label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MoodTag {
    Preset { id: PresetMood },
    Custom { label: String },
}

/// Emoji shown next to user-defined mood tags.
pub const CUSTOM_MOOD_EMOJI: &str = "✨";

impl MoodTag {
    pub fn preset(id: PresetMood) -> Self {
        Self::Preset { id }
    }

    pub fn custom(label: impl Into<String>) -> Self {
        Self::Custom {
            label: label.into(),
        }
    }

    /// Interpret a typed or legacy mood string. Preset ids match regardless
    /// of case or a space in place of the hyphen; anything else is kept
    /// verbatim as a custom tag.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().replace(' ', "-").parse::<PresetMood>() {
            Ok(id) => Self::Preset { id },
            Err(_) => Self::Custom {
                label: raw.to_owned(),
            },
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Preset { id } => id.label(),
            Self::Custom { label } => label,
        }
    }

    pub fn emoji(&self) -> &str {
        match self {
            Self::Preset { id } => id.emoji(),
            Self::Custom { .. } => CUSTOM_MOOD_EMOJI,
        }
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Split a comma-joined mood string. Blank segments are dropped.
pub fn split_moods(raw: &str) -> Vec<MoodTag> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(MoodTag::parse)
        .collect()
}

/// Serde adapter: a mood list is written as an array of tagged values. Older
/// records stored one comma-joined string, which is still accepted on read.
pub mod mood_list {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{MoodTag, split_moods};

    pub fn serialize<S: Serializer>(moods: &[MoodTag], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(moods)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Joined(String),
        Tags(Vec<MoodTag>),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<MoodTag>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Joined(raw) => split_moods(&raw),
            Repr::Tags(tags) => tags,
        })
    }
}

/// Serde adapter for a plan's calendar date.
///
/// Written as `YYYY-MM-DD`. Older records stored a full ISO timestamp; those
/// are re-parsed and reduced to their date in host local time.
pub mod calendar_date {
    use chrono::{DateTime, Local, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Local).date_naive())
            .map_err(|e| D::Error::custom(format!("invalid plan date {raw:?}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// A participant's RSVP tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RsvpStatus {
    CountMeIn,
    ThinkICan,
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CountMeIn => "count-me-in",
            Self::ThinkICan => "think-i-can",
        })
    }
}

impl FromStr for RsvpStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count-me-in" => Ok(Self::CountMeIn),
            "think-i-can" => Ok(Self::ThinkICan),
            other => Err(ParseEnumError::new("rsvp status", other)),
        }
    }
}

/// Aggregate RSVP counters kept on a self-authored plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpCounts {
    pub count_me_in: u32,
    pub think_i_can: u32,
    pub still_thinking: u32,
}

impl RsvpCounts {
    pub fn total(&self) -> u32 {
        self.count_me_in + self.think_i_can + self.still_thinking
    }
}

/// Who a plan is shown to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    #[default]
    Friends,
    FriendsOfFriends,
    Public,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Friends => "friends",
            Self::FriendsOfFriends => "friends-of-friends",
            Self::Public => "public",
        })
    }
}

impl FromStr for Audience {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friends" => Ok(Self::Friends),
            "friends-of-friends" => Ok(Self::FriendsOfFriends),
            "public" => Ok(Self::Public),
            other => Err(ParseEnumError::new("audience", other)),
        }
    }
}

/// A soft plan authored by the local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub activity: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(with = "mood_list")]
    pub mood: Vec<MoodTag>,
    #[serde(default)]
    pub rsvps: RsvpCounts,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Chat threads
// ---------------------------------------------------------------------------

/// A member of a plan's chat, with their response tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub rsvp_status: RsvpStatus,
}

/// Plan metadata embedded in a chat thread for header display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub id: String,
    pub activity: String,
    #[serde(default)]
    pub description: String,
    /// Display date ("Today", "Sat, Jun 1").
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub host: String,
    #[serde(with = "mood_list", default)]
    pub mood: Vec<MoodTag>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_emoji: bool,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

fn default_plan_related() -> bool {
    true
}

/// A plan-scoped conversation. Its id equals the plan id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThread {
    /// Filled from the collection key on load when absent from the record.
    #[serde(default)]
    pub id: String,
    pub plan: PlanSnapshot,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub unread: u32,
    #[serde(default = "default_plan_related")]
    pub plan_related: bool,
}

impl ChatThread {
    /// A thread is read-only from its expiry instant onwards.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.plan.expires_at
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }
}

// ---------------------------------------------------------------------------
// Friends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FriendTier {
    Close,
    Acquaintance,
    QuietFollow,
}

impl FriendTier {
    pub const ALL: [FriendTier; 3] = [Self::Close, Self::Acquaintance, Self::QuietFollow];

    pub fn label(self) -> &'static str {
        match self {
            Self::Close => "Close Circle",
            Self::Acquaintance => "Acquaintances",
            Self::QuietFollow => "Quiet Follows",
        }
    }
}

impl fmt::Display for FriendTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Close => "close",
            Self::Acquaintance => "acquaintance",
            Self::QuietFollow => "quiet-follow",
        })
    }
}

impl FromStr for FriendTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "close" => Ok(Self::Close),
            "acquaintance" => Ok(Self::Acquaintance),
            "quiet-follow" => Ok(Self::QuietFollow),
            other => Err(ParseEnumError::new("friend tier", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FriendStatus {
    Available,
    Busy,
    Quiet,
    Offline,
}

impl fmt::Display for FriendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Quiet => "quiet",
            Self::Offline => "offline",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub tier: FriendTier,
    pub status: FriendStatus,
    #[serde(default)]
    pub last_active: String,
    #[serde(default)]
    pub is_nearby: bool,
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// The local user's short-lived availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresenceKind {
    #[default]
    Available,
    Open,
    Quiet,
}

impl PresenceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "I'm around",
            Self::Open => "Not planning but open",
            Self::Quiet => "Quiet mode",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Available => "✅",
            Self::Open => "🤔",
            Self::Quiet => "🚫",
        }
    }
}

impl fmt::Display for PresenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "available",
            Self::Open => "open",
            Self::Quiet => "quiet",
        })
    }
}

impl FromStr for PresenceKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "open" => Ok(Self::Open),
            "quiet" => Ok(Self::Quiet),
            other => Err(ParseEnumError::new("presence", other)),
        }
    }
}

/// Shape of the persisted `userStatus` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPresence {
    pub id: PresenceKind,
    #[serde(default)]
    pub label: String,
}

impl From<PresenceKind> for StoredPresence {
    fn from(kind: PresenceKind) -> Self {
        Self {
            id: kind,
            label: kind.label().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_mood_roundtrips_through_str() {
        for mood in PresetMood::ALL {
            assert_eq!(mood.id().parse::<PresetMood>().unwrap(), mood);
        }
        assert!("sleepy".parse::<PresetMood>().is_err());
    }

    #[test]
    fn unknown_mood_is_custom_not_default() {
        assert_eq!(MoodTag::parse("board games"), MoodTag::custom("board games"));
        assert_eq!(MoodTag::parse(" deep-talk "), MoodTag::preset(PresetMood::DeepTalk));
        assert_eq!(MoodTag::parse("board games").emoji(), CUSTOM_MOOD_EMOJI);
    }

    #[test]
    fn typed_preset_names_ignore_case() {
        assert_eq!(MoodTag::parse("Chill"), MoodTag::preset(PresetMood::Chill));
        assert_eq!(MoodTag::parse("DEEP-TALK"), MoodTag::preset(PresetMood::DeepTalk));
        assert_eq!(MoodTag::parse("Low energy"), MoodTag::preset(PresetMood::LowEnergy));
        assert_eq!(MoodTag::parse("Board Games"), MoodTag::custom("Board Games"));
    }

    #[test]
    fn legacy_mood_string_splits() {
        let moods = split_moods("chill, social,  ,karaoke");
        assert_eq!(
            moods,
            vec![
                MoodTag::preset(PresetMood::Chill),
                MoodTag::preset(PresetMood::Social),
                MoodTag::custom("karaoke"),
            ]
        );
    }

    #[test]
    fn plan_reads_legacy_record() {
        let raw = r#"{
            "id": "1",
            "activity": "Coffee with Jamie",
            "description": "",
            "date": "2024-06-01T12:00:00.000Z",
            "time": "3:00 PM",
            "location": "Quiet Corner Cafe",
            "mood": "chill, reflective",
            "rsvps": { "countMeIn": 2, "thinkICan": 1, "stillThinking": 0 }
        }"#;
        let plan: Plan = serde_json::from_str(raw).unwrap();
        assert_eq!(plan.mood.len(), 2);
        assert_eq!(plan.rsvps.count_me_in, 2);
        assert_eq!(plan.rsvps.total(), 3);
        assert_eq!(plan.audience, Audience::Friends);
        assert!(plan.created_at.is_none());
    }

    #[test]
    fn plan_writes_date_and_tagged_mood() {
        let plan = Plan {
            id: "p".into(),
            activity: "Walk".into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: "9:00 AM".into(),
            location: String::new(),
            mood: vec![MoodTag::preset(PresetMood::Open), MoodTag::custom("sunrise")],
            rsvps: RsvpCounts::default(),
            audience: Audience::Public,
            created_at: None,
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["date"], "2024-06-01");
        assert_eq!(
            value["mood"],
            serde_json::json!([
                {"kind": "preset", "id": "open"},
                {"kind": "custom", "label": "sunrise"},
            ])
        );
        assert_eq!(value["rsvps"]["thinkICan"], 0);
        assert_eq!(value["audience"], "public");
    }

    #[test]
    fn custom_mood_with_comma_survives_reload() {
        let plan = Plan {
            id: "p".into(),
            activity: "Games night".into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: "7:00 PM".into(),
            location: String::new(),
            mood: vec![
                MoodTag::custom("board games, chess"),
                MoodTag::preset(PresetMood::Social),
            ],
            rsvps: RsvpCounts::default(),
            audience: Audience::Friends,
            created_at: None,
        };
        let raw = serde_json::to_string(&plan).unwrap();
        let reloaded: Plan = serde_json::from_str(&raw).unwrap();
        assert_eq!(reloaded.mood, plan.mood);
    }

    #[test]
    fn mood_list_accepts_tagged_array() {
        let raw = r#"{
            "id": "c", "activity": "x", "date": "Today", "time": "1:00 PM",
            "mood": [{"kind":"preset","id":"low-energy"},{"kind":"custom","label":"naps"}],
            "expiresAt": "2024-06-01T10:00:00.000Z"
        }"#;
        let snapshot: PlanSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(
            snapshot.mood,
            vec![MoodTag::preset(PresetMood::LowEnergy), MoodTag::custom("naps")]
        );
    }

    #[test]
    fn thread_expiry_is_inclusive() {
        let expires_at = DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let thread = ChatThread {
            id: "1".into(),
            plan: PlanSnapshot {
                id: "1".into(),
                activity: "Coffee".into(),
                description: String::new(),
                date: "Today".into(),
                time: "10:30 AM".into(),
                location: String::new(),
                host: "You".into(),
                mood: vec![],
                expires_at,
                participants: vec![],
            },
            messages: vec![],
            unread: 0,
            plan_related: true,
        };
        assert!(!thread.is_expired(expires_at - chrono::Duration::seconds(1)));
        assert!(thread.is_expired(expires_at));
    }

    #[test]
    fn enum_parse_errors_name_the_kind() {
        let err = "bestie".parse::<FriendTier>().unwrap_err();
        assert_eq!(err.to_string(), "invalid friend tier: \"bestie\"");
        assert_eq!("quiet-follow".parse::<FriendTier>().unwrap(), FriendTier::QuietFollow);
        assert_eq!("open".parse::<PresenceKind>().unwrap(), PresenceKind::Open);
    }
}
