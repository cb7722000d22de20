//! Error types
//!
//! Construction-time failures (`ArnError`) fail fast when a locator is
//! built. Traversal failures (`EnumerateError`) are yielded per branch, next
//! to the records produced by other branches.

use crate::arn::Level;
use crate::query::QueryError;
use thiserror::Error;

/// Boxed error carried from a backend enumerator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed locator string
#[derive(Debug, Error)]
pub enum ArnError {
    #[error("invalid {level} pattern {pattern:?}: {source}")]
    InvalidPattern {
        level: Level,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("invalid filter expression: {0}")]
    InvalidQuery(#[from] QueryError),
}

/// Failure of a single traversal branch
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// A matched resource type has no registered enumerator
    #[error("unresolvable resource type: {path}")]
    UnresolvableResourceType { path: String },

    /// The backend failed while listing one resource type
    #[error("failed to enumerate {path} in region {region:?}, account {account}")]
    Backend {
        path: String,
        region: String,
        account: String,
        #[source]
        source: BoxError,
    },

    /// Enumeration started at a level the context does not lead to
    #[error("cannot enumerate {level} under context {context}")]
    ContextMismatch { level: Level, context: String },
}

impl EnumerateError {
    /// Dotted resource path (`provider.service.type`) the error belongs to
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UnresolvableResourceType { path } | Self::Backend { path, .. } => Some(path),
            Self::ContextMismatch { .. } => None,
        }
    }
}
