//! Persisted state slot.
//!
//! A [`PersistedSlot`] binds one key of the [`DurableStore`] to a typed,
//! JSON-serializable value. Every committed change is written through to the
//! store synchronously and then published to subscribers. When the store
//! refuses a write the slot keeps the new value in memory and reports
//! [`Durability::MemoryOnly`] so the caller can warn the user.

use crate::db::{DurableStore, SCHEMA_VERSION};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// Written to the durable store; survives a restart.
    Durable,
    /// Held in memory only; lost on restart.
    MemoryOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

pub struct PersistedSlot<T> {
    store: Arc<dyn DurableStore>,
    key: String,
    value: T,
    default: T,
    durability: Durability,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_subscription: u64,
}

impl<T> PersistedSlot<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load `key` from the store, or seed it with `default` when the entry is
    /// missing, unreadable or written by a newer layout.
    pub fn initialize(store: Arc<dyn DurableStore>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();

        let loaded = match store.read(&key) {
            Ok(Some(entry)) if entry.schema_version > SCHEMA_VERSION => {
                tracing::warn!(
                    key = %key,
                    stored_version = entry.schema_version,
                    known_version = SCHEMA_VERSION,
                    "slot written by a newer schema, reseeding"
                );
                None
            }
            Ok(Some(entry)) => match serde_json::from_str::<T>(&entry.value) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "corrupt slot entry, reseeding");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "slot read failed, using default");
                None
            }
        };

        let mut slot = Self {
            store,
            key,
            value: default.clone(),
            default,
            durability: Durability::Durable,
            listeners: Vec::new(),
            next_subscription: 0,
        };

        match loaded {
            Some(value) => {
                tracing::debug!(key = %slot.key, "slot restored");
                slot.value = value;
            }
            None => {
                tracing::info!(key = %slot.key, "seeding slot with default value");
                let seeded = serde_json::to_string(&slot.value)
                    .map_err(crate::error::Error::from)
                    .and_then(|json| slot.store.write(&slot.key, &json, SCHEMA_VERSION));
                if let Err(e) = seeded {
                    slot.degrade(&e);
                }
            }
        }

        slot
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    pub fn is_durable(&self) -> bool {
        self.durability == Durability::Durable
    }

    /// Replace the value. A serialization failure leaves the slot untouched;
    /// a store failure keeps the new value in memory only.
    pub fn set(&mut self, value: T) -> Result<Durability> {
        let json = serde_json::to_string(&value)?;
        self.value = value;

        match self.store.write(&self.key, &json, SCHEMA_VERSION) {
            Ok(()) => {
                if self.durability == Durability::MemoryOnly {
                    tracing::info!(key = %self.key, "durable store available again");
                }
                self.durability = Durability::Durable;
            }
            Err(e) => self.degrade(&e),
        }

        self.publish();
        Ok(self.durability)
    }

    /// Compute the next value from the current one and commit it.
    pub fn update<F>(&mut self, f: F) -> Result<Durability>
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next)
    }

    /// Drop the stored entry and fall back to the default value.
    pub fn clear(&mut self) -> Result<Durability> {
        self.value = self.default.clone();
        match self.store.remove(&self.key) {
            Ok(()) => self.durability = Durability::Durable,
            Err(e) => self.degrade(&e),
        }
        self.publish();
        Ok(self.durability)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn publish(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.value);
        }
    }

    fn degrade(&mut self, error: &crate::error::Error) {
        if self.durability == Durability::Durable {
            tracing::warn!(
                key = %self.key,
                error = %error,
                "durable store unavailable, continuing in memory"
            );
        }
        self.durability = Durability::MemoryOnly;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory() -> Arc<dyn DurableStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn seeds_default_and_writes_it() {
        let store = memory();
        let slot = PersistedSlot::initialize(store.clone(), "numbers", vec![1, 2, 3]);

        assert_eq!(slot.get(), &vec![1, 2, 3]);
        let entry = store.read("numbers").unwrap().unwrap();
        assert_eq!(entry.value, "[1,2,3]");
        assert_eq!(entry.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn restores_existing_value_instead_of_default() {
        let store = memory();
        store.write("numbers", "[9]", SCHEMA_VERSION).unwrap();

        let slot = PersistedSlot::initialize(store, "numbers", vec![1]);
        assert_eq!(slot.get(), &vec![9]);
    }

    #[test]
    fn corrupt_entry_is_reseeded() {
        let store = memory();
        store.write("numbers", "{not json", SCHEMA_VERSION).unwrap();

        let slot = PersistedSlot::initialize(store.clone(), "numbers", vec![1]);
        assert_eq!(slot.get(), &vec![1]);
        assert_eq!(store.read("numbers").unwrap().unwrap().value, "[1]");
    }

    #[test]
    fn newer_schema_is_reseeded() {
        let store = memory();
        store.write("numbers", "[5]", SCHEMA_VERSION + 1).unwrap();

        let slot = PersistedSlot::initialize(store, "numbers", vec![1]);
        assert_eq!(slot.get(), &vec![1]);
    }

    #[test]
    fn round_trip_through_fresh_slot() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_app_dir(dir.path()).unwrap();
        db.initialize().unwrap();
        let store: Arc<dyn DurableStore> = Arc::new(db);

        let mut slot = PersistedSlot::initialize(store.clone(), "names", Vec::<String>::new());
        slot.set(vec!["a".into(), "b".into()]).unwrap();

        let fresh = PersistedSlot::initialize(store, "names", Vec::<String>::new());
        assert_eq!(fresh.get(), slot.get());
    }

    #[test]
    fn update_sees_previous_value() {
        let mut slot = PersistedSlot::initialize(memory(), "counter", 0u32);
        slot.update(|n| n + 1).unwrap();
        slot.update(|n| n + 1).unwrap();
        assert_eq!(*slot.get(), 2);
    }

    #[test]
    fn unavailable_store_keeps_value_in_memory() {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::unavailable());
        let mut slot = PersistedSlot::initialize(store.clone(), "counter", 0u32);
        assert!(!slot.is_durable());

        let durability = slot.set(7).unwrap();
        assert_eq!(durability, Durability::MemoryOnly);
        assert_eq!(*slot.get(), 7);
        assert!(store.read("counter").unwrap().is_none());
    }

    #[test]
    fn subscribers_see_every_commit() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut slot = PersistedSlot::initialize(memory(), "counter", 0usize);

        let sink = seen.clone();
        let id = slot.subscribe(move |v| sink.store(*v, Ordering::SeqCst));

        slot.set(3).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 3);

        assert!(slot.unsubscribe(id));
        slot.set(5).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn clear_restores_default_and_removes_entry() {
        let store = memory();
        let mut slot = PersistedSlot::initialize(store.clone(), "session", Some(1u8));
        slot.set(Some(2)).unwrap();

        slot.clear().unwrap();
        assert_eq!(slot.get(), &Some(1));
        assert!(store.read("session").unwrap().is_none());
    }
}
