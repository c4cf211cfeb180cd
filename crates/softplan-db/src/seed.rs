//! Built-in sample data used when nothing usable has been saved yet.
//!
//! Instants are laid out relative to `now` so that a fresh install always
//! shows a mix of live and expired plan chats.

use chrono::{DateTime, Duration, Local, Utc};

use crate::models::{
    Audience, ChatThread, Friend, FriendStatus, FriendTier, Message, MoodTag, Participant, Plan,
    PlanSnapshot, PresetMood, Reaction, RsvpCounts, RsvpStatus, Sender,
};
use crate::queries::chats::ThreadMap;

/// Id and display name of the local user in sample threads.
pub const SAMPLE_USER_ID: &str = "u1";
pub const SAMPLE_USER_NAME: &str = "You";

const AVATAR: &str = "/placeholder.svg?height=40&width=40";

/// Built-in plans. Their ids never collide with a built-in chat id, so no
/// sample plan owns a sample thread.
pub fn sample_plans(now: DateTime<Utc>) -> Vec<Plan> {
    let today = now.with_timezone(&Local).date_naive();
    vec![
        Plan {
            id: "plan-1".into(),
            activity: "Coffee with Jamie".into(),
            description: "Catching up over coffee to discuss the new book we're both reading."
                .into(),
            date: today,
            time: "3:00 PM".into(),
            location: "Quiet Corner Cafe".into(),
            mood: vec![MoodTag::preset(PresetMood::Chill)],
            rsvps: RsvpCounts {
                count_me_in: 2,
                think_i_can: 1,
                still_thinking: 0,
            },
            audience: Audience::Friends,
            created_at: None,
        },
        Plan {
            id: "plan-2".into(),
            activity: "Book exchange".into(),
            description: "Bringing a few books to swap. Looking for something new to read!".into(),
            date: today + Duration::days(1),
            time: "11:00 AM".into(),
            location: "City Park Bench".into(),
            mood: vec![MoodTag::preset(PresetMood::Reflective)],
            rsvps: RsvpCounts {
                count_me_in: 1,
                think_i_can: 0,
                still_thinking: 1,
            },
            audience: Audience::Friends,
            created_at: None,
        },
        Plan {
            id: "plan-3".into(),
            activity: "Walk around the lake".into(),
            description: "Casual stroll around the lake. Weather should be nice.".into(),
            date: today + Duration::days(5),
            time: "9:00 AM".into(),
            location: "Willow Lake".into(),
            mood: vec![MoodTag::preset(PresetMood::Open)],
            rsvps: RsvpCounts {
                count_me_in: 3,
                think_i_can: 2,
                still_thinking: 1,
            },
            audience: Audience::Friends,
            created_at: None,
        },
    ]
}

fn participant(id: &str, name: &str, rsvp_status: RsvpStatus) -> Participant {
    Participant {
        id: id.into(),
        name: name.into(),
        avatar: (id != SAMPLE_USER_ID).then(|| AVATAR.to_owned()),
        rsvp_status,
    }
}

fn sender(id: &str, name: &str) -> Sender {
    let is_current_user = id == SAMPLE_USER_ID;
    Sender {
        id: id.into(),
        name: name.into(),
        avatar: (!is_current_user).then(|| AVATAR.to_owned()),
        is_current_user,
    }
}

fn message(id: &str, from: Sender, content: &str, timestamp: DateTime<Utc>) -> Message {
    Message {
        id: id.into(),
        sender: from,
        content: content.into(),
        timestamp,
        is_emoji: false,
        reactions: Vec::new(),
    }
}

fn emoji_message(id: &str, from: Sender, content: &str, timestamp: DateTime<Utc>) -> Message {
    Message {
        is_emoji: true,
        ..message(id, from, content, timestamp)
    }
}

fn reaction(emoji: &str, user_id: &str, user_name: &str) -> Reaction {
    Reaction {
        emoji: emoji.into(),
        user_id: user_id.into(),
        user_name: user_name.into(),
    }
}

struct SnapshotSeed<'a> {
    id: &'a str,
    activity: &'a str,
    date: &'a str,
    time: &'a str,
    location: &'a str,
    host: &'a str,
    mood: PresetMood,
    expires_at: DateTime<Utc>,
}

fn snapshot(seed: SnapshotSeed<'_>, participants: Vec<Participant>) -> PlanSnapshot {
    PlanSnapshot {
        id: seed.id.into(),
        activity: seed.activity.into(),
        description: String::new(),
        date: seed.date.into(),
        time: seed.time.into(),
        location: seed.location.into(),
        host: seed.host.into(),
        mood: vec![MoodTag::preset(seed.mood)],
        expires_at: seed.expires_at,
        participants,
    }
}

pub fn sample_threads(now: DateTime<Utc>) -> ThreadMap {
    let hours = Duration::hours;
    let minutes = Duration::minutes;

    let mut morning_greeting = message(
        "m1",
        sender("u2", "Jamie"),
        "Hey everyone! Looking forward to seeing you all at the cafe.",
        now - hours(2),
    );
    morning_greeting.reactions = vec![reaction("👍", "u1", "You"), reaction("🫶", "u3", "Alex")];

    let threads = vec![
        ChatThread {
            id: "1".into(),
            plan: snapshot(
                SnapshotSeed {
                    id: "1",
                    activity: "Morning Coffee ☕",
                    date: "Today",
                    time: "10:30 AM",
                    location: "Quiet Corner Cafe",
                    host: "Jamie",
                    mood: PresetMood::Chill,
                    expires_at: now + hours(2),
                },
                vec![
                    participant("u2", "Jamie", RsvpStatus::CountMeIn),
                    participant("u3", "Alex", RsvpStatus::CountMeIn),
                    participant("u1", "You", RsvpStatus::CountMeIn),
                    participant("u4", "Taylor", RsvpStatus::ThinkICan),
                ],
            ),
            messages: vec![
                morning_greeting,
                message(
                    "m2",
                    sender("u3", "Alex"),
                    "I'll be there in 10 minutes",
                    now - minutes(30),
                ),
            ],
            unread: 2,
            plan_related: true,
        },
        ChatThread {
            id: "2".into(),
            plan: snapshot(
                SnapshotSeed {
                    id: "2",
                    activity: "Walk & Chai? 🍵",
                    date: "Tomorrow",
                    time: "4:00 PM",
                    location: "Riverside Path",
                    host: "Alex",
                    mood: PresetMood::Chill,
                    expires_at: now + hours(48),
                },
                vec![
                    participant("u3", "Alex", RsvpStatus::CountMeIn),
                    participant("u1", "You", RsvpStatus::ThinkICan),
                ],
            ),
            messages: vec![
                message(
                    "m1",
                    sender("u3", "Alex"),
                    "Fancy a walk tomorrow afternoon?",
                    now - hours(26),
                ),
                message("m2", sender("u1", "You"), "Sounds good to me!", now - hours(25)),
            ],
            unread: 0,
            plan_related: false,
        },
        ChatThread {
            id: "3".into(),
            plan: snapshot(
                SnapshotSeed {
                    id: "3",
                    activity: "Movie Night 🎬",
                    date: "Tomorrow",
                    time: "7:00 PM",
                    location: "Sam's place",
                    host: "Sam",
                    mood: PresetMood::Social,
                    expires_at: now + hours(24) + minutes(30),
                },
                vec![
                    participant("u6", "Sam", RsvpStatus::CountMeIn),
                    participant("u1", "You", RsvpStatus::ThinkICan),
                    participant("u3", "Alex", RsvpStatus::CountMeIn),
                    participant("u2", "Jamie", RsvpStatus::ThinkICan),
                ],
            ),
            messages: vec![
                message(
                    "m1",
                    sender("u6", "Sam"),
                    "Popcorn is on me, bring blankets!",
                    now - hours(20),
                ),
                emoji_message("m2", sender("u3", "Alex"), "🍿", now - hours(19)),
            ],
            unread: 5,
            plan_related: true,
        },
        ChatThread {
            id: "6".into(),
            plan: snapshot(
                SnapshotSeed {
                    id: "6",
                    activity: "Park Picnic 🌿",
                    date: "Saturday",
                    time: "1:00 PM",
                    location: "Willow Park",
                    host: "Riley",
                    mood: PresetMood::Chill,
                    expires_at: now - hours(1),
                },
                vec![
                    participant("u7", "Riley", RsvpStatus::CountMeIn),
                    participant("u1", "You", RsvpStatus::CountMeIn),
                    participant("u5", "Morgan", RsvpStatus::CountMeIn),
                ],
            ),
            messages: vec![
                message(
                    "m1",
                    sender("u7", "Riley"),
                    "Thanks for coming everyone, lovely afternoon.",
                    now - hours(50),
                ),
                emoji_message("m2", sender("u5", "Morgan"), "🌞", now - hours(49)),
            ],
            unread: 0,
            plan_related: true,
        },
        ChatThread {
            id: "7".into(),
            plan: snapshot(
                SnapshotSeed {
                    id: "7",
                    activity: "Coffee Chat ☕",
                    date: "Friday",
                    time: "3:00 PM",
                    location: "Bean There",
                    host: "Morgan",
                    mood: PresetMood::Chill,
                    expires_at: now + hours(72) + minutes(30),
                },
                vec![
                    participant("u5", "Morgan", RsvpStatus::CountMeIn),
                    participant("u1", "You", RsvpStatus::CountMeIn),
                ],
            ),
            messages: vec![message(
                "m1",
                sender("u5", "Morgan"),
                "🥹 Can't wait!",
                now - hours(6),
            )],
            unread: 0,
            plan_related: false,
        },
    ];

    threads.into_iter().map(|t| (t.id.clone(), t)).collect()
}

fn friend(
    id: &str,
    name: &str,
    tier: FriendTier,
    status: FriendStatus,
    last_active: &str,
    is_nearby: bool,
) -> Friend {
    Friend {
        id: id.into(),
        name: name.into(),
        avatar: Some(AVATAR.to_owned()),
        tier,
        status,
        last_active: last_active.into(),
        is_nearby,
    }
}

pub fn sample_friends() -> Vec<Friend> {
    use FriendStatus::*;
    use FriendTier::*;

    vec![
        friend("1", "Alex Chen", Close, Available, "Now", true),
        friend("2", "Jamie Smith", Acquaintance, Quiet, "2h ago", false),
        friend("3", "Taylor Johnson", Close, Busy, "1h ago", true),
        friend("4", "Jordan Lee", QuietFollow, Offline, "2d ago", false),
        friend("5", "Casey Williams", Acquaintance, Available, "Just now", true),
        friend("6", "Morgan Rivera", QuietFollow, Available, "5m ago", true),
        friend("7", "Riley Cooper", Close, Quiet, "1h ago", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_threads_mix_live_and_expired() {
        let now = Utc::now();
        let threads = sample_threads(now);
        assert!(threads.values().any(|t| t.is_expired(now)));
        assert!(threads.values().any(|t| !t.is_expired(now)));
        for (key, thread) in &threads {
            assert_eq!(key, &thread.id);
            assert_eq!(thread.id, thread.plan.id);
        }
    }

    #[test]
    fn sample_plan_ids_never_name_a_sample_thread() {
        let now = Utc::now();
        let threads = sample_threads(now);
        for plan in sample_plans(now) {
            assert!(
                !threads.contains_key(&plan.id),
                "plan {} shares an id with a sample chat",
                plan.id
            );
        }
    }

    #[test]
    fn sample_friends_cover_every_tier() {
        let friends = sample_friends();
        for tier in FriendTier::ALL {
            assert!(friends.iter().any(|f| f.tier == tier), "missing {tier}");
        }
    }
}
