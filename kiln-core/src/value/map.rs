//! The ordered, duplicate-key-tolerant backing store for [`Value::Object`](crate::Value::Object).
//!
//! Storage is a single `Vec<(Box<str>, Value)>` in insertion order, kept
//! behind a `Mutex` so that every operation — including plain reads — is
//! synchronized and whole-operation atomic. Point lookups (`get`/
//! `equal_range`) hand back owned clones rather than borrowed references:
//! this avoids tying a caller's borrow to the mutex guard's lifetime, at
//! the cost of a clone per lookup. A key-sorted view is computed on demand
//! rather than maintained incrementally alongside the insertion-order list.

use std::cmp::Ordering;
use std::sync::Mutex;

use crate::Value;

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<(Box<str>, Value)>,
}

/// An insertion-ordered, duplicate-key-tolerant map from `String` to
/// [`Value`].
#[derive(Debug)]
pub struct Map {
    inner: Mutex<Inner>,
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl Map {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Appends a new `(key, value)` pair, even if `key` already exists.
    ///
    /// This is how the parser builds objects: every member, duplicate or
    /// not, is retained in insertion order.
    pub fn insert(&self, key: impl Into<Box<str>>, value: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.push((key.into(), value));
    }

    /// Replaces the value of the last existing entry for `key`, or appends a
    /// new entry if none exists. Returns the replaced value, if any.
    ///
    /// This is the semantics patch `add`/`replace` need: "last wins" in
    /// place, not a second duplicate entry.
    pub fn set(&self, key: &str, value: Value) -> Option<Value> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(idx) = inner
            .entries
            .iter()
            .rposition(|(k, _)| k.as_ref() == key)
        {
            Some(std::mem::replace(&mut inner.entries[idx].1, value))
        } else {
            inner.entries.push((key.into(), value));
            None
        }
    }

    /// Returns a clone of the last-inserted live entry for `key`, or
    /// [`Value::Invalid`] if no entry exists.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .iter()
            .rev()
            .find(|(k, _)| k.as_ref() == key)
            .map_or(Value::Invalid, |(_, v)| v.clone())
    }

    /// `true` if at least one entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.entries.iter().any(|(k, _)| k.as_ref() == key)
    }

    /// The number of entries (not necessarily 0 or 1) for `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.entries.iter().filter(|(k, _)| k.as_ref() == key).count()
    }

    /// All entries for `key`, in insertion order.
    #[must_use]
    pub fn equal_range(&self, key: &str) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .iter()
            .filter(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Removes every entry for `key`. Returns the number of entries removed.
    pub fn remove(&self, key: &str) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.entries.len();
        inner.entries.retain(|(k, _)| k.as_ref() != key);
        before - inner.entries.len()
    }

    /// The number of entries, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of `(key, value)` pairs in insertion order.
    #[must_use]
    pub fn iter(&self) -> Vec<(Box<str>, Value)> {
        self.inner.lock().unwrap().entries.clone()
    }

    /// Key-sorted snapshot. Within a run of equal keys, entries are ordered
    /// by the natural ordering of their values (see [`Value`]'s `Ord` impl),
    /// not insertion order.
    #[must_use]
    pub fn sorted_iter(&self) -> Vec<(Box<str>, Value)> {
        let mut entries = self.inner.lock().unwrap().entries.clone();
        entries.sort_by(|(ka, va), (kb, vb)| ka.cmp(kb).then_with(|| va.cmp(vb)));
        entries
    }

    /// Object member names, in insertion order (duplicates included).
    #[must_use]
    pub fn keys(&self) -> Vec<Box<str>> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// The index, in the key-sorted view, of the first entry not less than
    /// `key`.
    #[must_use]
    pub fn lower_bound(&self, key: &str) -> usize {
        let sorted = self.sorted_iter();
        sorted.partition_point(|(k, _)| k.as_ref() < key)
    }

    /// The index, in the key-sorted view, of the first entry greater than
    /// `key`.
    #[must_use]
    pub fn upper_bound(&self, key: &str) -> usize {
        let sorted = self.sorted_iter();
        sorted.partition_point(|(k, _)| k.as_ref() <= key)
    }
}

impl Clone for Map {
    fn clone(&self) -> Self {
        let entries = self.inner.lock().unwrap().entries.clone();
        Self {
            inner: Mutex::new(Inner { entries }),
        }
    }
}

/// Equality ignores insertion order: two maps are equal iff their key-sorted
/// views match pairwise, element for element.
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_iter() == other.sorted_iter()
    }
}
impl Eq for Map {}

/// Lexicographic ordering over the key-sorted view, matching the equality
/// contract above.
impl PartialOrd for Map {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Map {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_iter().cmp(&other.sorted_iter())
    }
}

impl FromIterator<(Box<str>, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (Box<str>, Value)>>(iter: T) -> Self {
        let map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_last_wins_on_get() {
        let map = Map::new();
        map.insert("a", Value::from(1i64));
        map.insert("a", Value::from(2i64));
        assert_eq!(map.get("a"), Value::from(2i64));
        assert_eq!(map.equal_range("a").len(), 2);
    }

    #[test]
    fn set_replaces_in_place() {
        let map = Map::new();
        map.insert("a", Value::from(1i64));
        map.insert("b", Value::from(2i64));
        map.set("a", Value::from(9i64));
        assert_eq!(
            map.iter()
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>(),
            vec![Box::from("a"), Box::from("b")]
        );
        assert_eq!(map.get("a"), Value::from(9i64));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = Map::new();
        a.insert("a", Value::from(1i64));
        a.insert("b", Value::from(2i64));
        let b = Map::new();
        b.insert("b", Value::from(2i64));
        b.insert("a", Value::from(1i64));
        assert_eq!(a, b);
    }

    #[test]
    fn remove_drops_all_duplicates() {
        let map = Map::new();
        map.insert("a", Value::from(1i64));
        map.insert("a", Value::from(2i64));
        map.insert("b", Value::from(3i64));
        assert_eq!(map.remove("a"), 2);
        assert_eq!(map.len(), 1);
    }
}
