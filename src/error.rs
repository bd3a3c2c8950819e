//! Typed errors raised while selecting and resolving inventory activities.
//!
//! These are usually returned wrapped in an [`anyhow::Error`] with extra context. Callers which
//! need to distinguish between them can use [`anyhow::Error::downcast_ref`].
use thiserror::Error;

/// An error raised by activity selection, supplier allocation or variable resolution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LcaError {
    /// Malformed configuration or a missing entry in a static table
    #[error("Configuration error: {0}")]
    Config(String),
    /// The location fallback ladder was exhausted without finding a matching activity
    #[error("No supplier activity found in locations: {}", searched.join(", "))]
    NoSupplierFound {
        /// Every location tier which was searched, in order
        searched: Vec<String>,
    },
    /// An exact-name lookup found no activity
    #[error("No activity '{name}' found for location {location} in database {database}")]
    ActivityNotFound {
        /// Activity name
        name: String,
        /// Location code
        location: String,
        /// Database searched
        database: String,
    },
    /// An exact-name lookup expected to be unique found more than one activity
    #[error("{count} activities '{name}' found for location {location} in database {database}")]
    AmbiguousActivity {
        /// Activity name
        name: String,
        /// Location code
        location: String,
        /// Database searched
        database: String,
        /// Number of matching activities
        count: usize,
    },
}

impl LcaError {
    /// Shorthand for creating a [`LcaError::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
