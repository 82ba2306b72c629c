//! Association lists: small maps that keep insertion order.
//!
//! Attribute and style maps, column mappings and code tables are all
//! short and their iteration order ends up in the rendered HTML, so a
//! vector of pairs with linear lookup is the right tool.

use std::borrow::Borrow;

#[derive(Debug, Clone, PartialEq)]
pub struct AList<K, V>(Vec<(K, V)>);

impl<K, V> Default for AList<K, V> {
    fn default() -> Self {
        AList(Vec::new())
    }
}

impl<K: Eq, V> AList<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where K: Borrow<Q>, Q: Eq + ?Sized
    {
        self.0.iter().find(|(k, _)| k.borrow() == key).map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where K: Borrow<Q>, Q: Eq + ?Sized
    {
        self.0.iter_mut().find(|(k, _)| k.borrow() == key).map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where K: Borrow<Q>, Q: Eq + ?Sized
    {
        self.0.iter().any(|(k, _)| k.borrow() == key)
    }

    /// Position of `key`, if present.
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where K: Borrow<Q>, Q: Eq + ?Sized
    {
        self.0.iter().position(|(k, _)| k.borrow() == key)
    }

    /// Replaces the value in place if the key exists (keeping its
    /// position), appends otherwise. Returns the old value.
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            Some(std::mem::replace(slot, val))
        } else {
            self.0.push((key, val));
            None
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where K: Borrow<Q>, Q: Eq + ?Sized
    {
        let i = self.position(key)?;
        Some(self.0.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl<K: Eq, V> FromIterator<(K, V)> for AList<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut l = AList::new();
        for (k, v) in iter {
            l.insert(k, v);
        }
        l
    }
}

impl<K, V> IntoIterator for AList<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
