use softplan_db::models::{Participant, RsvpStatus, Sender};
use softplan_db::seed::{SAMPLE_USER_ID, SAMPLE_USER_NAME};

/// The local user, as seen by the stores that author messages and plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn sender(&self) -> Sender {
        Sender {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: None,
            is_current_user: true,
        }
    }

    pub fn participant(&self, rsvp_status: RsvpStatus) -> Participant {
        Participant {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: None,
            rsvp_status,
        }
    }
}

/// Matches the author of the built-in sample threads.
impl Default for Identity {
    fn default() -> Self {
        Self::new(SAMPLE_USER_ID, SAMPLE_USER_NAME)
    }
}
