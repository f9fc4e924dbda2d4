//! Generic keyed registry of entities.
//!
//! A [`Registry`] owns its entries and enforces key uniqueness. Filtering
//! does not copy: [`Registry::filter`] returns a `Registry<&V>`, a view that
//! borrows the same entities from its source. The borrow checker keeps the
//! source from being mutated while a view is alive, so a view can never
//! observe a removed entry.
//!
//! Iteration order is unspecified. [`Registry::serialize`] and
//! [`Registry::sorted`] order by key.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{AgendaError, AgendaResult};
use crate::identifier::Identifier;

/// Something stored in a [`Registry`], identified by a unique key.
///
/// The error constructors let each registry report failures in terms of its
/// own entity (e.g. `ExistedUser` vs `ExistedMeeting`).
pub trait Entity {
    type Key: Identifier;

    fn key(&self) -> &Self::Key;

    fn nil_error() -> AgendaError;
    fn empty_key_error() -> AgendaError;
    fn duplicate_error(key: &Self::Key) -> AgendaError;
    fn not_found_error(key: &Self::Key) -> AgendaError;
}

impl<T: Entity> Entity for &T {
    type Key = T::Key;

    fn key(&self) -> &Self::Key {
        (**self).key()
    }

    fn nil_error() -> AgendaError {
        T::nil_error()
    }

    fn empty_key_error() -> AgendaError {
        T::empty_key_error()
    }

    fn duplicate_error(key: &Self::Key) -> AgendaError {
        T::duplicate_error(key)
    }

    fn not_found_error(key: &Self::Key) -> AgendaError {
        T::not_found_error(key)
    }
}

/// An entity with a public, persistable representation.
pub trait Persist: Entity {
    type Record: Serialize + DeserializeOwned;

    fn record(&self) -> Self::Record;
}

impl<T: Persist> Persist for &T {
    type Record = T::Record;

    fn record(&self) -> Self::Record {
        (**self).record()
    }
}

/// An entity that can be rebuilt from its record.
pub trait Restore: Persist + Sized {
    fn record_key(record: &Self::Record) -> &Self::Key;

    /// `None` when the record cannot form an entity.
    fn restore(record: Self::Record) -> Option<Self>;
}

#[derive(Debug, Clone)]
pub struct Registry<V: Entity> {
    entries: HashMap<V::Key, V>,
}

impl<V: Entity> Default for Registry<V> {
    fn default() -> Self {
        Registry {
            entries: HashMap::new(),
        }
    }
}

impl<V: Entity> Registry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value, taking ownership of it.
    ///
    /// Accepts `V` or `Option<V>`; `None` is rejected with the entity's nil
    /// error, a key already present with its duplicate error.
    pub fn add(&mut self, value: impl Into<Option<V>>) -> AgendaResult<()> {
        let value = value.into().ok_or_else(V::nil_error)?;
        let key = value.key().clone();

        if key.is_empty() {
            return Err(V::empty_key_error());
        }
        if self.entries.contains_key(&key) {
            return Err(V::duplicate_error(&key));
        }

        self.entries.insert(key, value);
        Ok(())
    }

    /// Remove the entry with the same key as `value`.
    pub fn remove<'a>(&mut self, value: impl Into<Option<&'a V>>) -> AgendaResult<()>
    where
        V: 'a,
    {
        let value = value.into().ok_or_else(V::nil_error)?;
        let key = value.key();

        match self.entries.remove(key) {
            Some(_) => Ok(()),
            None => Err(V::not_found_error(key)),
        }
    }

    /// Look up and remove in one step, handing ownership to the caller.
    pub fn pick_out(&mut self, key: &V::Key) -> AgendaResult<V> {
        if key.is_empty() {
            return Err(V::empty_key_error());
        }
        self.entries
            .remove(key)
            .ok_or_else(|| V::not_found_error(key))
    }

    pub fn contains(&self, key: &V::Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Non-owning lookup. `None` is a valid answer, not an error.
    pub fn get(&self, key: &V::Key) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &V::Key) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Mutable access to every entry. Keys must not change.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &V::Key> {
        self.entries.keys()
    }

    /// Entries ordered by key.
    pub fn sorted(&self) -> Vec<&V> {
        let mut values: Vec<&V> = self.entries.values().collect();
        values.sort_by(|a, b| a.key().cmp(b.key()));
        values
    }

    /// Visit every entry, stopping at the first error.
    pub fn for_each<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&V) -> Result<(), E>,
    {
        for value in self.entries.values() {
            visit(value)?;
        }
        Ok(())
    }

    /// A new registry viewing the entries accepted by `pred`.
    /// The receiver is left untouched.
    pub fn filter<P>(&self, mut pred: P) -> Registry<&V>
    where
        P: FnMut(&V) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter(|(_, value)| pred(*value))
            .map(|(key, value)| (key.clone(), value))
            .collect();

        Registry { entries }
    }

    /// Remove every entry accepted by `pred`, returning the removed values.
    pub fn extract_if<P>(&mut self, mut pred: P) -> Vec<V>
    where
        P: FnMut(&V) -> bool,
    {
        let doomed: Vec<V::Key> = self
            .entries
            .iter()
            .filter(|(_, value)| pred(*value))
            .map(|(key, _)| key.clone())
            .collect();

        doomed
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect()
    }
}

impl<V: Persist> Registry<V> {
    /// Public records of every entry, ordered by key.
    pub fn serialize(&self) -> Vec<V::Record> {
        self.sorted().into_iter().map(|v| v.record()).collect()
    }
}

impl<V: Restore> Registry<V> {
    /// Best-effort rebuild from records.
    ///
    /// Records with an invalid key, records that cannot form an entity, and
    /// duplicates are logged and skipped; the rest still load.
    pub fn deserialize(records: impl IntoIterator<Item = V::Record>) -> Self {
        let mut registry = Registry::new();

        for record in records {
            let key = V::record_key(&record);
            if !key.is_valid() {
                warn!(key = %key, "Skipping record with invalid key");
                continue;
            }

            let key = key.clone();
            if let Err(e) = registry.add(V::restore(record)) {
                warn!(key = %key, error = %e, "Skipping record");
            }
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Username;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        owner: Username,
        body: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct NoteRecord {
        owner: Username,
        body: String,
    }

    impl Entity for Note {
        type Key = Username;

        fn key(&self) -> &Username {
            &self.owner
        }

        fn nil_error() -> AgendaError {
            AgendaError::NilUser
        }

        fn empty_key_error() -> AgendaError {
            AgendaError::EmptyUsername
        }

        fn duplicate_error(key: &Username) -> AgendaError {
            AgendaError::ExistedUser(key.clone())
        }

        fn not_found_error(key: &Username) -> AgendaError {
            AgendaError::UserNotFound(key.clone())
        }
    }

    impl Persist for Note {
        type Record = NoteRecord;

        fn record(&self) -> NoteRecord {
            NoteRecord {
                owner: self.owner.clone(),
                body: self.body.clone(),
            }
        }
    }

    impl Restore for Note {
        fn record_key(record: &NoteRecord) -> &Username {
            &record.owner
        }

        fn restore(record: NoteRecord) -> Option<Self> {
            if record.body.is_empty() {
                return None;
            }
            Some(Note {
                owner: record.owner,
                body: record.body,
            })
        }
    }

    fn note(owner: &str, body: &str) -> Note {
        Note {
            owner: Username::new(owner),
            body: body.to_string(),
        }
    }

    fn sample() -> Registry<Note> {
        let mut registry = Registry::new();
        registry.add(note("alice", "a")).unwrap();
        registry.add(note("bob", "bb")).unwrap();
        registry.add(note("carol", "ccc")).unwrap();
        registry
    }

    #[test]
    fn duplicate_add_is_rejected_and_size_unchanged() {
        let mut registry = sample();
        let err = registry.add(note("alice", "other")).unwrap_err();

        assert!(matches!(err, AgendaError::ExistedUser(ref name) if name.as_str() == "alice"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(&Username::new("alice")).unwrap().body, "a");
    }

    #[test]
    fn absent_value_is_rejected() {
        let mut registry = sample();
        assert!(matches!(registry.add(None::<Note>), Err(AgendaError::NilUser)));
        assert!(matches!(registry.remove(None::<&Note>), Err(AgendaError::NilUser)));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut registry = sample();
        assert!(matches!(registry.add(note("", "x")), Err(AgendaError::EmptyUsername)));
        assert!(matches!(
            registry.pick_out(&Username::new("")),
            Err(AgendaError::EmptyUsername)
        ));
    }

    #[test]
    fn remove_twice_reports_not_found() {
        let mut registry = sample();
        let bob = note("bob", "whatever");

        registry.remove(&bob).unwrap();
        assert!(!registry.contains(&Username::new("bob")));
        assert!(matches!(registry.remove(&bob), Err(AgendaError::UserNotFound(_))));
    }

    #[test]
    fn pick_out_removes_exactly_one() {
        let mut registry = sample();
        let key = Username::new("carol");

        let picked = registry.pick_out(&key).unwrap();

        assert_eq!(picked.body, "ccc");
        assert!(!registry.contains(&key));
        assert_eq!(registry.len(), 2);
        assert!(matches!(registry.pick_out(&key), Err(AgendaError::UserNotFound(_))));
    }

    #[test]
    fn get_absent_is_none() {
        let registry = sample();
        assert!(registry.get(&Username::new("dave")).is_none());
    }

    #[test]
    fn for_each_stops_at_first_error() {
        let registry = sample();
        let mut visited = 0;

        let result: Result<(), &str> = registry.for_each(|_| {
            visited += 1;
            Err("stop")
        });

        assert_eq!(result, Err("stop"));
        assert_eq!(visited, 1);
    }

    #[test]
    fn for_each_visits_everything_when_ok() {
        let registry = sample();
        let mut total = 0;

        registry
            .for_each(|n| {
                total += n.body.len();
                Ok::<(), AgendaError>(())
            })
            .unwrap();

        assert_eq!(total, 6);
    }

    #[test]
    fn filter_leaves_receiver_untouched() {
        let registry = sample();
        let before = registry.len();

        let long = registry.filter(|n| n.body.len() >= 2);

        assert_eq!(registry.len(), before);
        assert_eq!(long.len(), 2);
        assert!(long.contains(&Username::new("bob")));
        assert!(!long.contains(&Username::new("alice")));
    }

    #[test]
    fn filter_views_share_entities() {
        let registry = sample();
        let view = registry.filter(|_| true);

        let original = registry.get(&Username::new("bob")).unwrap();
        let viewed = view.get(&Username::new("bob")).unwrap();
        assert!(std::ptr::eq(original, *viewed));

        let narrower = view.filter(|n| n.body.len() == 3);
        assert_eq!(narrower.len(), 1);
    }

    #[test]
    fn extract_if_returns_removed_values() {
        let mut registry = sample();
        let mut dropped = registry.extract_if(|n| n.body.len() == 2);

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped.pop().unwrap().owner.as_str(), "bob");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn serialize_then_deserialize_preserves_records() {
        let registry = sample();
        let records = registry.serialize();

        let owners: Vec<_> = records.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["alice", "bob", "carol"]);

        let restored = Registry::<Note>::deserialize(records.clone());
        assert_eq!(restored.len(), registry.len());
        assert_eq!(restored.serialize(), records);
    }

    #[test]
    fn deserialize_skips_bad_records_and_keeps_going() {
        let records = vec![
            NoteRecord {
                owner: Username::new(""),
                body: "nameless".into(),
            },
            NoteRecord {
                owner: Username::new("alice"),
                body: "first".into(),
            },
            NoteRecord {
                owner: Username::new("alice"),
                body: "duplicate".into(),
            },
            NoteRecord {
                owner: Username::new("bob"),
                body: String::new(),
            },
            NoteRecord {
                owner: Username::new("carol"),
                body: "ok".into(),
            },
        ];

        let registry = Registry::<Note>::deserialize(records);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&Username::new("alice")).unwrap().body, "first");
        assert!(registry.contains(&Username::new("carol")));
    }

    #[test]
    fn views_serialize_like_their_source() {
        let registry = sample();
        let view = registry.filter(|n| n.owner.as_str() != "bob");
        let owners: Vec<_> = view.serialize().into_iter().map(|r| r.owner).collect();
        assert_eq!(owners, vec![Username::new("alice"), Username::new("carol")]);
    }
}
