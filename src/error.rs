//! Errors reported while configuring a map

use thiserror::Error;

/// Rejected map configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A map needs at least one bucket
    #[error("bucket count must be positive, got {requested}")]
    InvalidBucketCount {
        /// The bucket count the caller asked for
        requested: usize,
    },
}
