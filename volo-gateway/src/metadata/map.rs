use std::fmt;

use ahash::RandomState;
use faststr::FastStr;
use linked_hash_map::LinkedHashMap;

use super::{MetadataKey, key::fold};
use crate::error::InvalidMetadataKey;

/// An ordered multimap from [`MetadataKey`] to string values.
///
/// Keys keep their first insertion order, values keep the order they were
/// appended in. Lookups by `&str` are case-insensitive.
#[derive(Clone, PartialEq, Eq)]
pub struct MetadataMap {
    entries: LinkedHashMap<MetadataKey, Vec<FastStr>, RandomState>,
}

impl Default for MetadataMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataMap {
    pub fn new() -> Self {
        Self {
            entries: LinkedHashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: LinkedHashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Builds a map from key/value pairs, appending repeated keys in order.
    ///
    /// ```rust
    /// use volo_gateway::MetadataMap;
    ///
    /// let md = MetadataMap::from_pairs([("k", "a"), ("K", "b")]).unwrap();
    /// let values: Vec<&str> = md.get_all("k").iter().map(|v| v.as_str()).collect();
    /// assert_eq!(values, ["a", "b"]);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, InvalidMetadataKey>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FastStr>,
        V: Into<FastStr>,
    {
        let pairs = pairs.into_iter();
        let mut md = Self::with_capacity(pairs.size_hint().0);
        for (k, v) in pairs {
            md.append(MetadataKey::new(k)?, v);
        }
        Ok(md)
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a value after any existing values of `key`.
    pub fn append(&mut self, key: MetadataKey, value: impl Into<FastStr>) {
        let value = value.into();
        match self.entries.get_mut(key.as_str()) {
            Some(values) => values.push(value),
            None => {
                self.entries.insert(key, vec![value]);
            }
        }
    }

    /// Replaces every value of `key`, returning the previous ones.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: MetadataKey, value: impl Into<FastStr>) -> Option<Vec<FastStr>> {
        let value = value.into();
        match self.entries.get_mut(key.as_str()) {
            Some(values) => Some(std::mem::replace(values, vec![value])),
            None => {
                self.entries.insert(key, vec![value]);
                None
            }
        }
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&FastStr> {
        self.get_all(key).first()
    }

    /// All values of `key` in insertion order, empty if there is none.
    pub fn get_all(&self, key: &str) -> &[FastStr] {
        self.entries
            .get(&*fold(key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&*fold(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<FastStr>> {
        self.entries.remove(&*fold(key))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &MetadataKey> {
        self.entries.keys()
    }
}

impl fmt::Debug for MetadataMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Iterator over the keys of a [`MetadataMap`] with their values.
pub struct Iter<'a> {
    inner: linked_hash_map::Iter<'a, MetadataKey, Vec<FastStr>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a MetadataKey, &'a [FastStr]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a MetadataMap {
    type Item = (&'a MetadataKey, &'a [FastStr]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> Extend<(MetadataKey, V)> for MetadataMap
where
    V: Into<FastStr>,
{
    fn extend<T: IntoIterator<Item = (MetadataKey, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.append(k, v);
        }
    }
}

impl<V> FromIterator<(MetadataKey, V)> for MetadataMap
where
    V: Into<FastStr>,
{
    fn from_iter<T: IntoIterator<Item = (MetadataKey, V)>>(iter: T) -> Self {
        let mut md = Self::new();
        md.extend(iter);
        md
    }
}
