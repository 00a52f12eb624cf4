//! Utility functions and traits for `ChainedMap`

use crate::{ChainedMap, KeyStrategy};

/// Extension trait for map implementations that provides additional utility methods
pub trait MapExtensions<K, V> {
    /// Returns the keys of the map as a Vec, in iteration order
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the map as a Vec, in iteration order
    fn values(&self) -> Vec<V>;

    /// Returns the key-value pairs of the map as a Vec, in iteration order
    fn entries(&self) -> Vec<(K, V)>;
}

impl<K, V, S> MapExtensions<K, V> for ChainedMap<K, V, S>
where
    K: Clone,
    V: Clone,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|e| e.key().clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|e| e.value().clone()).collect()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.iter().map(|e| (e.key().clone(), e.value().clone())).collect()
    }
}

/// Creates a `ChainedMap` with the default bucket count from an iterator of key-value pairs.
///
/// Later pairs overwrite earlier pairs with an equal key.
pub fn from_iter_with<K, V, S, I>(strategy: S, iter: I) -> ChainedMap<K, V, S>
where
    S: KeyStrategy<K>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = ChainedMap::new(strategy);
    map.extend(iter);
    map
}
