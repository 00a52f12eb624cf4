//! # Chained Map
//!
//! A Rust implementation of a separate-chaining hash map whose hashing and key equality are
//! supplied by the caller.
//!
//! `ChainedMap` is useful for keys that do not implement `Hash`/`Eq` the way you need (composite
//! records compared on a subset of fields, for instance), or when you want to control exactly
//! which bucket a key lands in.
//!
//! The bucket count is chosen at construction and never changes. Colliding keys share a bucket
//! and are scanned linearly, in insertion order.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chained_map::ChainedMap;
//!
//! // Hash integers to themselves and compare them with `==`
//! let mut map = ChainedMap::from_fns_with_bucket_count(
//!     |k: &i64| *k,
//!     |a: &i64, b: &i64| a == b,
//!     10,
//! )?;
//!
//! // 1 and 11 collide in bucket 1
//! map.set(1, "one");
//! map.set(11, "eleven");
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.get(&11), Some(&"eleven"));
//! assert_eq!(map.len(), 2);
//!
//! // Update values
//! map.set(1, "uno");
//! assert_eq!(map.get(&1), Some(&"uno"));
//!
//! // Remove values
//! map.delete(&1);
//! assert_eq!(map.get(&1), None);
//! # Ok::<(), chained_map::ConfigError>(())
//! ```
//!
//! ## Custom Strategies
//!
//! ```rust
//! use chained_map::{ChainedMap, KeyStrategy};
//!
//! struct Employee {
//!     id: i64,
//!     name: String,
//! }
//!
//! /// Employees are the same record when their ids match
//! struct ById;
//!
//! impl KeyStrategy<Employee> for ById {
//!     fn hash(&self, key: &Employee) -> i64 {
//!         key.id
//!     }
//!
//!     fn equal(&self, a: &Employee, b: &Employee) -> bool {
//!         a.id == b.id
//!     }
//! }
//!
//! let mut roles = ChainedMap::new(ById);
//! roles.set(Employee { id: 7, name: "Ada".to_string() }, "engineer");
//! roles.set(Employee { id: 7, name: "Ada L.".to_string() }, "lead");
//!
//! assert_eq!(roles.len(), 1);
//! for entry in &roles {
//!     assert_eq!(entry.key().name, "Ada");
//!     assert_eq!(*entry.value(), "lead");
//! }
//! ```

/// Module implementing the separate-chaining map
mod chained_map;
/// Errors reported while configuring a map
mod error;
/// Hashing and equality strategies for keys
mod strategy;
/// Utility functions and traits for the map
mod utils;

pub use chained_map::{ChainedMap, ChainedMapBuilder, DEFAULT_BUCKET_COUNT, Entry, Iter};
pub use error::ConfigError;
pub use strategy::{DefaultStrategy, FnStrategy, KeyStrategy, comparable_equal};
pub use utils::{MapExtensions, from_iter_with};
