//! Per-entity locks so concurrent resolutions of the same entity share one ESI request.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::server::model::eve::EntityKind;

/// Identifies one entity across all kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    /// Kind of the entity
    pub kind: EntityKind,
    /// EVE Online ID of the entity
    pub id: i64,
}

impl EntityKey {
    /// Key of an alliance
    pub fn alliance(alliance_id: i64) -> Self {
        Self {
            kind: EntityKind::Alliance,
            id: alliance_id,
        }
    }

    /// Key of a corporation
    pub fn corporation(corporation_id: i64) -> Self {
        Self {
            kind: EntityKind::Corporation,
            id: corporation_id,
        }
    }

    /// Key of a character
    pub fn character(character_id: i64) -> Self {
        Self {
            kind: EntityKind::Character,
            id: character_id,
        }
    }
}

/// Table of async mutexes keyed by entity.
///
/// Entries only hold weak references; a lock is dropped from the table once nobody holds
/// or waits on it. Locks must be taken character before corporation before alliance.
#[derive(Clone, Default)]
pub struct EntityLocks {
    locks: Arc<parking_lot::Mutex<HashMap<EntityKey, Weak<Mutex<()>>>>>,
}

impl EntityLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other task holds the lock for `key` and takes it.
    pub async fn acquire(&self, key: EntityKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.retain(|_, lock| lock.strong_count() > 0);

            match locks.get(&key).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(Mutex::new(()));
                    locks.insert(key, Arc::downgrade(&lock));
                    lock
                }
            }
        };

        lock.lock_owned().await
    }

    /// Number of entities currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }

    /// Whether no entity is currently locked or waited on.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
