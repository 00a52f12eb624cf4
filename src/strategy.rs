//! Key strategies: how a `ChainedMap` hashes and compares its keys

use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// Hashing and equality capabilities for keys of type `K`.
///
/// Implementations must keep the two methods consistent: whenever
/// `equal(a, b)` holds, `hash(a)` and `hash(b)` must be identical, and
/// `equal` must be reflexive, symmetric and transitive. A map built on an
/// inconsistent strategy does not detect the violation and may store
/// entries that look like duplicates.
///
/// `hash` may return any `i64`, negative values included; the map reduces
/// it into its bucket range with a floor modulo.
pub trait KeyStrategy<K: ?Sized> {
    /// Maps a key to an integer hash
    fn hash(&self, key: &K) -> i64;

    /// Returns true when both keys denote the same entry
    fn equal(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, S: KeyStrategy<K> + ?Sized> KeyStrategy<K> for &S {
    fn hash(&self, key: &K) -> i64 {
        (**self).hash(key)
    }

    fn equal(&self, a: &K, b: &K) -> bool {
        (**self).equal(a, b)
    }
}

/// A strategy assembled from a hash closure and an equality closure.
#[derive(Clone, Copy)]
pub struct FnStrategy<H, E> {
    /// Hash closure
    hash: H,
    /// Equality closure
    equal: E,
}

impl<H, E> FnStrategy<H, E> {
    /// Pairs a hash function with an equality function
    pub const fn new(hash: H, equal: E) -> Self {
        Self { hash, equal }
    }
}

impl<H, E> fmt::Debug for FnStrategy<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy").finish_non_exhaustive()
    }
}

impl<K, H, E> KeyStrategy<K> for FnStrategy<H, E>
where
    K: ?Sized,
    H: Fn(&K) -> i64,
    E: Fn(&K, &K) -> bool,
{
    fn hash(&self, key: &K) -> i64 {
        (self.hash)(key)
    }

    fn equal(&self, a: &K, b: &K) -> bool {
        (self.equal)(a, b)
    }
}

/// Strategy for keys that already implement `Hash` and `Eq`.
///
/// Hashes with the standard library's `DefaultHasher` and compares with `==`.
pub struct DefaultStrategy<K: ?Sized> {
    /// Binds the strategy to its key type without owning one
    _marker: PhantomData<fn(&K)>,
}

impl<K: ?Sized> DefaultStrategy<K> {
    /// Creates the strategy
    #[must_use]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<K: ?Sized> Default for DefaultStrategy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ?Sized> Clone for DefaultStrategy<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for DefaultStrategy<K> {}

impl<K: ?Sized> fmt::Debug for DefaultStrategy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultStrategy")
    }
}

impl<K: Hash + Eq + ?Sized> KeyStrategy<K> for DefaultStrategy<K> {
    #[allow(clippy::cast_possible_wrap)]
    fn hash(&self, key: &K) -> i64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        // Reinterpreting the bits is fine, reduction handles the sign.
        hasher.finish() as i64
    }

    fn equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Equality helper for `Eq` keys, usable as the equality half of a `FnStrategy`.
pub fn comparable_equal<K: Eq + ?Sized>(a: &K, b: &K) -> bool {
    a == b
}

/// Reduces a signed hash into `[0, bucket_count)` with a floor modulo.
///
/// `bucket_count` must be non-zero; the map guarantees this at construction.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn reduce(hash: i64, bucket_count: usize) -> usize {
    debug_assert_ne!(bucket_count, 0);
    let modulus = bucket_count as u64;
    let rem = hash.unsigned_abs() % modulus;
    let index = if hash < 0 && rem != 0 { modulus - rem } else { rem };
    // index < bucket_count, so it fits back into usize.
    index as usize
}
