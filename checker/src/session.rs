//! Which asset each user picked last.

use async_trait::async_trait;
use providers::AssetKind;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub type UserId = u64;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user: UserId) -> Option<AssetKind>;
    async fn set(&self, user: UserId, kind: AssetKind);
}

/// Process lifetime map, entries are overwritten but never evicted.
#[derive(Default)]
pub struct MemorySessionStore {
    choices: RwLock<HashMap<UserId, AssetKind>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user: UserId) -> Option<AssetKind> {
        self.choices.read().await.get(&user).copied()
    }

    async fn set(&self, user: UserId, kind: AssetKind) {
        self.choices.write().await.insert(user, kind);
    }
}
