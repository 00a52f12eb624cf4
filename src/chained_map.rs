use std::{iter::FusedIterator, mem, slice};

use log::{debug, trace};

use crate::{
    error::ConfigError,
    strategy::{FnStrategy, KeyStrategy, reduce},
};

/// Number of buckets used when the caller does not choose one
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// A stored key-value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The key, fixed once stored
    key: K,
    /// The value, replaced in place on update
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Returns the stored key
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the stored value
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Splits the entry into its key and value
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// A hash map resolving collisions by separate chaining, keyed through a caller-supplied
/// [`KeyStrategy`].
///
/// The number of buckets is fixed when the map is built and never changes: the map does not
/// resize, so long chains stay long. Keys landing in the same bucket are kept in insertion
/// order and scanned linearly with the strategy's equality.
///
/// Note: This implementation is not thread-safe. Shared mutation needs an external lock.
#[derive(Debug, Clone)]
pub struct ChainedMap<K, V, S> {
    /// One chain of entries per bucket
    buckets: Vec<Vec<Entry<K, V>>>,
    /// Number of live entries across all buckets
    size: usize,
    /// Hashing and equality for keys
    strategy: S,
}

impl<K, V, S> Default for ChainedMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> ChainedMap<K, V, S> {
    /// Creates an empty map with [`DEFAULT_BUCKET_COUNT`] buckets
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self::with_buckets(strategy, DEFAULT_BUCKET_COUNT)
    }

    /// Creates an empty map with `bucket_count` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBucketCount`] when `bucket_count` is zero.
    pub fn with_bucket_count(strategy: S, bucket_count: usize) -> Result<Self, ConfigError> {
        if bucket_count == 0 {
            return Err(ConfigError::InvalidBucketCount { requested: bucket_count });
        }
        Ok(Self::with_buckets(strategy, bucket_count))
    }

    /// Allocates the bucket array; `bucket_count` must already be validated
    fn with_buckets(strategy: S, bucket_count: usize) -> Self {
        debug_assert_ne!(bucket_count, 0);
        debug!("creating chained map with {bucket_count} buckets");

        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Vec::new);

        Self { buckets, size: 0, strategy }
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the fixed number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the chain length of every bucket, in bucket order
    pub fn bucket_lens(&self) -> impl Iterator<Item = usize> {
        self.buckets.iter().map(Vec::len)
    }

    /// Returns the average number of entries per bucket
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Returns the key strategy
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Removes every entry, keeping the bucket count
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.size = 0;
    }

    /// Returns an iterator over the entries, bucket by bucket
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { buckets: self.buckets.iter(), current: slice::Iter::default(), remaining: self.size }
    }
}

impl<K, V, H, E> ChainedMap<K, V, FnStrategy<H, E>>
where
    H: Fn(&K) -> i64,
    E: Fn(&K, &K) -> bool,
{
    /// Creates an empty map with the default bucket count from a hash and an equality function
    #[must_use]
    pub fn from_fns(hash: H, equal: E) -> Self {
        Self::new(FnStrategy::new(hash, equal))
    }

    /// Creates an empty map with `bucket_count` buckets from a hash and an equality function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBucketCount`] when `bucket_count` is zero.
    pub fn from_fns_with_bucket_count(
        hash: H,
        equal: E,
        bucket_count: usize,
    ) -> Result<Self, ConfigError> {
        Self::with_bucket_count(FnStrategy::new(hash, equal), bucket_count)
    }
}

impl<K, V, S> ChainedMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    /// Computes the bucket a key belongs to
    fn bucket_index(&self, key: &K) -> usize {
        reduce(self.strategy.hash(key), self.buckets.len())
    }

    /// Associates `value` with `key`, replacing the value of an equal key if one is stored
    pub fn set(&mut self, key: K, value: V) {
        let _previous = self.insert(key, value);
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// When an equal key is already stored its value is swapped in place and the stored key is
    /// kept. Otherwise the pair is appended to the end of its bucket.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        debug_assert!(self.strategy.equal(&key, &key), "key equality must be reflexive");

        let index = self.bucket_index(&key);
        let strategy = &self.strategy;
        // `reduce` keeps the index below the bucket count
        let bucket = self.buckets.get_mut(index)?;

        if let Some(entry) = bucket.iter_mut().find(|entry| strategy.equal(&entry.key, &key)) {
            return Some(mem::replace(&mut entry.value, value));
        }

        bucket.push(Entry { key, value });
        self.size = self.size.saturating_add(1);
        trace!("inserted entry into bucket {index}, chain length {}", bucket.len());
        None
    }

    /// Retrieve a value for a given key
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Retrieve the stored key and its value for a given key
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let bucket = self.buckets.get(self.bucket_index(key))?;
        bucket
            .iter()
            .find(|entry| self.strategy.equal(&entry.key, key))
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        let strategy = &self.strategy;
        self.buckets
            .get_mut(index)?
            .iter_mut()
            .find(|entry| strategy.equal(&entry.key, key))
            .map(|entry| &mut entry.value)
    }

    /// Returns true if the map contains the given key
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for `key` if present. Deleting an absent key does nothing.
    pub fn delete(&mut self, key: &K) {
        let _removed = self.remove(key);
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// The remaining entries of the bucket keep their relative order.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let strategy = &self.strategy;
        let bucket = self.buckets.get_mut(index)?;

        let position = bucket.iter().position(|entry| strategy.equal(&entry.key, key))?;
        let entry = bucket.remove(position);
        self.size = self.size.saturating_sub(1);
        trace!("removed entry from bucket {index}, chain length {}", bucket.len());

        Some(entry.value)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedMap<K, V, S> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`ChainedMap`].
///
/// Walks buckets in index order and each bucket in storage order.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Vec<Entry<K, V>>>,
    /// Entries left in the bucket being visited
    current: slice::Iter<'a, Entry<K, V>>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(entry);
            }
            self.current = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Configures and builds a [`ChainedMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainedMapBuilder {
    /// Requested number of buckets
    bucket_count: usize,
}

impl Default for ChainedMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainedMapBuilder {
    /// Starts from [`DEFAULT_BUCKET_COUNT`] buckets
    #[must_use]
    pub const fn new() -> Self {
        Self { bucket_count: DEFAULT_BUCKET_COUNT }
    }

    /// Sets the number of buckets
    #[must_use]
    pub const fn bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Builds an empty map using `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBucketCount`] when the bucket count is zero.
    pub fn build<K, V, S>(self, strategy: S) -> Result<ChainedMap<K, V, S>, ConfigError> {
        ChainedMap::with_bucket_count(strategy, self.bucket_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{DefaultStrategy, comparable_equal};

    /// Hashes integers to themselves
    fn identity(k: &i64) -> i64 {
        *k
    }

    /// Identity-hashed map over `i64` keys
    type IdentityMap<V> =
        ChainedMap<i64, V, FnStrategy<fn(&i64) -> i64, fn(&i64, &i64) -> bool>>;

    fn identity_map<V>(bucket_count: usize) -> Result<IdentityMap<V>, ConfigError> {
        let hash: fn(&i64) -> i64 = identity;
        let equal: fn(&i64, &i64) -> bool = comparable_equal::<i64>;
        ChainedMap::from_fns_with_bucket_count(hash, equal, bucket_count)
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct CustomKey {
        id: i64,
        name: String,
    }

    #[test]
    fn test_new_is_empty() {
        let map: ChainedMap<String, i32, DefaultStrategy<String>> =
            ChainedMap::new(DefaultStrategy::new());
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert!(map.bucket_lens().all(|len| len == 0));
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let result = identity_map::<&str>(0);
        assert!(matches!(result, Err(ConfigError::InvalidBucketCount { requested: 0 })));

        let built = ChainedMapBuilder::new()
            .bucket_count(0)
            .build::<i64, &str, _>(DefaultStrategy::<i64>::new());
        assert_eq!(built.err(), Some(ConfigError::InvalidBucketCount { requested: 0 }));
    }

    #[test]
    fn test_builder_bucket_count() -> Result<(), ConfigError> {
        let map: ChainedMap<i64, (), _> =
            ChainedMapBuilder::new().bucket_count(7).build(DefaultStrategy::<i64>::new())?;
        assert_eq!(map.bucket_count(), 7);
        assert_eq!(ChainedMapBuilder::default(), ChainedMapBuilder::new());
        Ok(())
    }

    #[test]
    fn test_set_and_get_with_collision() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(1, "one");
        map.set(2, "two");
        map.set(11, "eleven");

        assert_eq!(map.get(&1), Some(&"one"));
        assert_eq!(map.get(&2), Some(&"two"));
        assert_eq!(map.get(&11), Some(&"eleven"));
        assert_eq!(map.get(&3), None);
        assert_eq!(map.len(), 3);

        let lens: Vec<usize> = map.bucket_lens().collect();
        assert_eq!(lens.get(1), Some(&2));
        assert_eq!(lens.get(2), Some(&1));
        Ok(())
    }

    #[test]
    fn test_update_keeps_size() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(1, "one");
        map.set(1, "uno");
        assert_eq!(map.get(&1), Some(&"uno"));
        assert_eq!(map.len(), 1);

        assert_eq!(map.insert(1, "eins"), Some("uno"));
        assert_eq!(map.insert(2, "two"), None);
        assert_eq!(map.len(), 2);
        Ok(())
    }

    #[test]
    fn test_update_keeps_stored_key() -> Result<(), ConfigError> {
        let mut map = ChainedMap::from_fns_with_bucket_count(
            |k: &CustomKey| k.id,
            |a: &CustomKey, b: &CustomKey| a.id == b.id,
            4,
        )?;
        let original = CustomKey { id: 5, name: "first".to_string() };
        let alias = CustomKey { id: 5, name: "second".to_string() };

        map.set(original.clone(), 1);
        map.set(alias.clone(), 2);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get_key_value(&alias), Some((&original, &2)));
        Ok(())
    }

    #[test]
    fn test_set_is_idempotent() -> Result<(), ConfigError> {
        let mut map = identity_map(3)?;
        for _ in 0..5 {
            map.set(42, "answer");
        }
        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().count(), 1);
        Ok(())
    }

    #[test]
    fn test_delete() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(1, "one");
        map.set(2, "two");
        map.set(11, "eleven");

        map.delete(&1);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.get(&11), Some(&"eleven"));
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&2), Some("two"));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.len(), 1);
        Ok(())
    }

    #[test]
    fn test_delete_absent_is_noop() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(1, "one");
        map.set(11, "eleven");
        let before: Vec<(i64, &str)> = map.iter().map(|e| (*e.key(), *e.value())).collect();

        map.delete(&21);
        map.delete(&5);

        let after: Vec<(i64, &str)> = map.iter().map(|e| (*e.key(), *e.value())).collect();
        assert_eq!(before, after);
        assert_eq!(map.len(), 2);
        Ok(())
    }

    #[test]
    fn test_delete_preserves_chain_order() -> Result<(), ConfigError> {
        let mut map = identity_map(1)?;
        for k in 1..=5 {
            map.set(k, k * 10);
        }
        map.delete(&3);

        let keys: Vec<i64> = map.iter().map(|e| *e.key()).collect();
        assert_eq!(keys, vec![1, 2, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_size_tracks_operations() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(1, "one");
        map.set(2, "two");
        map.set(11, "eleven");
        map.set(1, "uno");
        map.delete(&1);
        assert_eq!(map.len(), 2);

        map.set(3, "three");
        map.set(4, "four");
        assert_eq!(map.len(), 4);
        assert_eq!(map.len(), map.iter().count());
        Ok(())
    }

    #[test]
    fn test_iteration_order() {
        let mut map = ChainedMap::from_fns(identity, comparable_equal::<i64>);
        map.set(3, "three");
        map.set(1, "one");
        map.set(2, "two");

        let entries: Vec<(i64, &str)> = map.iter().map(|e| (*e.key(), *e.value())).collect();
        assert_eq!(entries, vec![(1, "one"), (2, "two"), (3, "three")]);
        assert_eq!(map.iter().len(), 3);
    }

    #[test]
    fn test_iteration_within_bucket_is_insertion_order() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(21, 'c');
        map.set(1, 'a');
        map.set(11, 'b');
        map.set(0, 'z');

        let keys: Vec<i64> = (&map).into_iter().map(|e| *e.key()).collect();
        assert_eq!(keys, vec![0, 21, 1, 11]);
        Ok(())
    }

    #[test]
    fn test_iteration_early_stop() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        for k in 0..10 {
            map.set(k, k);
        }

        let mut iter = map.iter();
        let prefix: Vec<i64> = iter.by_ref().take(3).map(|e| *e.value()).collect();
        assert_eq!(prefix, vec![0, 1, 2]);
        assert_eq!(iter.len(), 7);
        assert_eq!(map.len(), 10);
        Ok(())
    }

    #[test]
    fn test_negative_hash() -> Result<(), ConfigError> {
        let mut map = identity_map(10)?;
        map.set(-1, "minus one");
        map.set(-11, "minus eleven");
        map.set(i64::MIN, "min");
        map.set(9, "nine");

        assert_eq!(map.get(&-1), Some(&"minus one"));
        assert_eq!(map.get(&-11), Some(&"minus eleven"));
        assert_eq!(map.get(&i64::MIN), Some(&"min"));
        assert_eq!(map.get(&9), Some(&"nine"));
        assert_eq!(map.len(), 4);

        // -1, -11 and 9 all floor-mod to bucket 9
        assert_eq!(map.bucket_lens().nth(9), Some(3));

        map.delete(&-11);
        assert_eq!(map.get(&-11), None);
        assert_eq!(map.get(&-1), Some(&"minus one"));
        Ok(())
    }

    #[test]
    fn test_string_keys() -> Result<(), ConfigError> {
        let mut map = ChainedMap::from_fns_with_bucket_count(
            |k: &String| k.chars().map(|c| i64::from(u32::from(c))).sum::<i64>(),
            |a: &String, b: &String| a == b,
            10,
        )?;
        map.set("one".to_string(), 1);
        map.set("two".to_string(), 2);
        map.set("neo".to_string(), 3);

        assert_eq!(map.get(&"one".to_string()), Some(&1));
        assert_eq!(map.get(&"two".to_string()), Some(&2));
        assert_eq!(map.get(&"neo".to_string()), Some(&3));
        Ok(())
    }

    #[test]
    fn test_custom_struct_keys() -> Result<(), ConfigError> {
        let mut map = ChainedMap::from_fns_with_bucket_count(
            |k: &CustomKey| k.id,
            |a: &CustomKey, b: &CustomKey| a.id == b.id && a.name == b.name,
            10,
        )?;
        let alice = CustomKey { id: 1, name: "Alice".to_string() };
        let bob = CustomKey { id: 2, name: "Bob".to_string() };
        let other_alice = CustomKey { id: 1, name: "Alicia".to_string() };

        map.set(alice.clone(), "Developer");
        map.set(bob.clone(), "Designer");

        assert_eq!(map.get(&alice), Some(&"Developer"));
        assert_eq!(map.get(&bob), Some(&"Designer"));
        assert_eq!(map.get(&other_alice), None);
        Ok(())
    }

    #[test]
    fn test_get_mut() {
        let mut map: ChainedMap<&str, i32, DefaultStrategy<&str>> = ChainedMap::default();
        map.set("key1", 1);

        if let Some(value) = map.get_mut(&"key1") {
            *value += 10;
        }

        assert_eq!(map.get(&"key1"), Some(&11));
        assert_eq!(map.get_mut(&"key2"), None);
    }

    #[test]
    fn test_clear() -> Result<(), ConfigError> {
        let mut map = identity_map(4)?;
        map.set(1, "one");
        map.set(2, "two");

        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.bucket_count(), 4);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.iter().count(), 0);
        Ok(())
    }

    #[test]
    fn test_contains_key_and_load_factor() -> Result<(), ConfigError> {
        let mut map = identity_map(4)?;
        for k in 0..6 {
            map.set(k, ());
        }
        assert!(map.contains_key(&5));
        assert!(!map.contains_key(&6));
        assert!((map.load_factor() - 1.5).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_extend_and_collect() {
        let map: ChainedMap<String, i32, DefaultStrategy<String>> =
            [("a".to_string(), 1), ("b".to_string(), 2), ("a".to_string(), 3)]
                .into_iter()
                .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a".to_string()), Some(&3));
        assert_eq!(map.get(&"b".to_string()), Some(&2));
    }

    #[test]
    fn test_entry_into_pair() -> Result<(), ConfigError> {
        let mut map = identity_map(2)?;
        map.set(7, "seven");
        let pairs: Vec<(i64, &str)> = map.iter().cloned().map(Entry::into_pair).collect();
        assert_eq!(pairs, vec![(7, "seven")]);
        Ok(())
    }
}
