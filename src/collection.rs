//! Generic create / update / delete / filter container over one persisted list.

use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::filter::{filter_entities, FilterSpec, Filterable};
use crate::ids;
use crate::slot::{Durability, PersistedSlot, SubscriptionId};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Where newly created entities land in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Append,
    /// Index 0; used by logs and inboxes.
    Newest,
}

pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Human name used in errors and audit entries, e.g. `"Food Item"`.
    const KIND: &'static str;
    const INSERT: Insert = Insert::Append;

    fn id(&self) -> &str;
}

/// Turns a form draft into a stored entity.
pub trait Draft<E> {
    fn into_entity(self, id: String, now: DateTime<Utc>) -> E;
}

/// Merges a partial update into an entity, stamping `updated_at` where the
/// entity has one.
pub trait Patch<E> {
    fn apply(self, entity: &mut E, now: DateTime<Utc>);
}

pub struct Collection<E> {
    slot: PersistedSlot<Vec<E>>,
}

impl<E: Entity> Collection<E> {
    pub fn open(store: Arc<dyn DurableStore>, key: &str, seed: Vec<E>) -> Self {
        Self {
            slot: PersistedSlot::initialize(store, key, seed),
        }
    }

    pub fn list(&self) -> &[E] {
        self.slot.get()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.list().iter().find(|e| e.id() == id)
    }

    pub fn durability(&self) -> Durability {
        self.slot.durability()
    }

    pub fn create<D: Draft<E>>(&mut self, draft: D) -> Result<E> {
        let entity = draft.into_entity(ids::new_id(), Utc::now());
        self.insert(entity)
    }

    /// Insert an already-built entity at the position `E::INSERT` dictates.
    pub fn insert(&mut self, entity: E) -> Result<E> {
        let created = entity.clone();
        self.slot.update(|prev| {
            let mut next = Vec::with_capacity(prev.len() + 1);
            match E::INSERT {
                Insert::Append => {
                    next.extend(prev.iter().cloned());
                    next.push(entity);
                }
                Insert::Newest => {
                    next.push(entity);
                    next.extend(prev.iter().cloned());
                }
            }
            next
        })?;
        tracing::debug!(kind = E::KIND, id = %created.id(), "entity created");
        Ok(created)
    }

    pub fn update<P: Patch<E>>(&mut self, id: &str, patch: P) -> Result<E> {
        let now = Utc::now();
        self.modify(id, |entity| patch.apply(entity, now))
    }

    /// Apply `f` to the entity at `id` and commit the whole list.
    pub fn modify<F>(&mut self, id: &str, f: F) -> Result<E>
    where
        F: FnOnce(&mut E),
    {
        self.try_modify(id, |entity| {
            f(entity);
            Ok(())
        })
    }

    /// Like [`Collection::modify`], but `f` may reject the change; nothing is
    /// committed when it does.
    pub fn try_modify<F>(&mut self, id: &str, f: F) -> Result<E>
    where
        F: FnOnce(&mut E) -> Result<()>,
    {
        let pos = self.position(id)?;
        let mut items = self.list().to_vec();
        f(&mut items[pos])?;
        let updated = items[pos].clone();
        self.slot.set(items)?;
        tracing::debug!(kind = E::KIND, id = %id, "entity updated");
        Ok(updated)
    }

    pub fn remove(&mut self, id: &str) -> Result<E> {
        let pos = self.position(id)?;
        let removed = self.list()[pos].clone();
        self.slot
            .update(|prev| prev.iter().filter(|e| e.id() != id).cloned().collect())?;
        tracing::debug!(kind = E::KIND, id = %id, "entity removed");
        Ok(removed)
    }

    pub fn replace_all(&mut self, items: Vec<E>) -> Result<Durability> {
        self.slot.set(items)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<E>) + Send + Sync + 'static,
    {
        self.slot.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.slot.unsubscribe(id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.list()
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| Error::not_found(E::KIND, id))
    }
}

impl<E: Entity + Filterable> Collection<E> {
    pub fn filter(&self, spec: &FilterSpec, now: DateTime<Utc>) -> Vec<E> {
        filter_entities(self.list(), spec, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde::Deserialize;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
        updated_at: DateTime<Utc>,
    }

    impl Entity for Note {
        const KIND: &'static str = "Note";
        fn id(&self) -> &str {
            &self.id
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
    }

    impl Entity for Entry {
        const KIND: &'static str = "Entry";
        const INSERT: Insert = Insert::Newest;
        fn id(&self) -> &str {
            &self.id
        }
    }

    struct NewNote(&'static str);

    impl Draft<Note> for NewNote {
        fn into_entity(self, id: String, now: DateTime<Utc>) -> Note {
            Note {
                id,
                text: self.0.to_string(),
                updated_at: now,
            }
        }
    }

    struct SetText(&'static str);

    impl Patch<Note> for SetText {
        fn apply(self, note: &mut Note, now: DateTime<Utc>) {
            note.text = self.0.to_string();
            note.updated_at = now;
        }
    }

    fn notes() -> Collection<Note> {
        Collection::open(Arc::new(MemoryStore::new()), "notes", Vec::new())
    }

    #[test]
    fn create_appends_with_unique_ids() {
        let mut c = notes();
        for _ in 0..50 {
            c.create(NewNote("x")).unwrap();
        }
        assert_eq!(c.len(), 50);
        let ids: HashSet<_> = c.list().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn newest_insert_goes_first() {
        let mut c: Collection<Entry> =
            Collection::open(Arc::new(MemoryStore::new()), "entries", Vec::new());
        c.insert(Entry { id: "a".into() }).unwrap();
        c.insert(Entry { id: "b".into() }).unwrap();
        let ids: Vec<_> = c.list().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn update_touches_only_the_target() {
        let mut c = notes();
        let a = c.create(NewNote("a")).unwrap();
        let b = c.create(NewNote("b")).unwrap();

        let updated = c.update(&a.id, SetText("changed")).unwrap();
        assert_eq!(updated.text, "changed");
        assert!(updated.updated_at >= a.updated_at);

        let matching: Vec<_> = c.list().iter().filter(|n| n.id == a.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0], &updated);
        assert_eq!(c.get(&b.id), Some(&b));
    }

    #[test]
    fn remove_keeps_others_in_order() {
        let mut c = notes();
        let a = c.create(NewNote("a")).unwrap();
        let b = c.create(NewNote("b")).unwrap();
        let d = c.create(NewNote("d")).unwrap();

        let removed = c.remove(&b.id).unwrap();
        assert_eq!(removed, b);
        assert_eq!(c.list(), &[a, d]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut c = notes();
        c.create(NewNote("a")).unwrap();

        let err = c.update("missing", SetText("x")).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Note", .. }));
        assert!(matches!(c.remove("missing"), Err(Error::NotFound { .. })));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn rejected_modification_commits_nothing() {
        let mut c = notes();
        let a = c.create(NewNote("a")).unwrap();

        let result = c.try_modify(&a.id, |n| {
            n.text = "half-done".into();
            Err(Error::validation("nope"))
        });
        assert!(result.is_err());
        assert_eq!(c.get(&a.id).unwrap().text, "a");
    }

    #[test]
    fn list_survives_reopen() {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        let mut c: Collection<Note> = Collection::open(store.clone(), "notes", Vec::new());
        c.create(NewNote("kept")).unwrap();

        let reopened: Collection<Note> = Collection::open(store, "notes", Vec::new());
        assert_eq!(reopened.list(), c.list());
    }
}
