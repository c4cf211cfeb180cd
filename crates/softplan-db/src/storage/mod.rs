//! Storage port.
//!
//! Entity stores never touch the filesystem directly: they read and write
//! whole JSON collections through a [`Storage`] backend. Two backends ship
//! with the crate: [`FileStorage`] (one file per collection) and
//! [`MemoryStorage`] (for tests and ephemeral sessions).

pub mod file;
pub mod memory;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Logical name of a persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Plans,
    Chats,
    CustomMoods,
    Friends,
    UserStatus,
    StatusExpiry,
    QuietMode,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Self::Plans,
        Self::Chats,
        Self::CustomMoods,
        Self::Friends,
        Self::UserStatus,
        Self::StatusExpiry,
        Self::QuietMode,
    ];

    /// Storage key, shared with earlier releases of the client.
    pub fn key(self) -> &'static str {
        match self {
            Self::Plans => "userPlans",
            Self::Chats => "chatData",
            Self::CustomMoods => "customMoods",
            Self::Friends => "friends",
            Self::UserStatus => "userStatus",
            Self::StatusExpiry => "statusExpiry",
            Self::QuietMode => "quietMode",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Backend for persisted collections.
///
/// Writes always replace the whole collection (last writer wins).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Human-readable backend name (e.g. "file", "memory").
    fn name(&self) -> &str;

    /// Raw contents of a collection, or `None` if nothing was saved yet.
    async fn load(&self, collection: Collection) -> Result<Option<String>>;

    /// Replace a collection's contents.
    async fn save(&self, collection: Collection, contents: &str) -> Result<()>;

    /// Forget a collection. Removing a missing collection is not an error.
    async fn remove(&self, collection: Collection) -> Result<()>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn Storage) {}
};
