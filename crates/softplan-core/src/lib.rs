//! Core logic for softplan: plan lifecycle, chat expiry, RSVPs, moods,
//! friends, and presence.

pub mod chat;
pub mod expiry;
pub mod friends;
pub mod identity;
pub mod mood;
pub mod plan;
pub mod presence;
pub mod rsvp;

pub use identity::Identity;
