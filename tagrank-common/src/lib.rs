//! Common types and utilities shared across tagrank crates.
//!
//! This crate defines the shared error type and the observability helpers used
//! throughout the workspace. It stays dependency-minimal so every crate can
//! depend on it without pulling in the HTTP or storage stacks.
//!
//! # Overview
//!
//! - [`TagrankError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use tagrank_common::{ErrorKind, TagrankError};
//!
//! let err = TagrankError::Auth("invalid or expired token".into());
//! assert_eq!(err.kind(), ErrorKind::Auth);
//! assert_eq!(err.to_string(), "Authentication error: invalid or expired token");
//! ```

pub mod observability;

/// Coarse classification of a [`TagrankError`], mostly useful in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Search,
    Store,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Search => "search",
            ErrorKind::Store => "store",
            ErrorKind::Config => "config",
        }
    }
}

/// Error types used across the tagrank system.
///
/// Every variant is fatal to a run; the handler boundary logs it and stops.
#[derive(thiserror::Error, Debug)]
pub enum TagrankError {
    /// Credentials were missing, malformed, or rejected by the search API.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A search request failed on the network, at the API, or while decoding.
    #[error("Search error: {0}")]
    Search(String),

    /// The key-value store rejected or failed a write.
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TagrankError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TagrankError::Auth(_) => ErrorKind::Auth,
            TagrankError::Search(_) => ErrorKind::Search,
            TagrankError::Store(_) => ErrorKind::Store,
            TagrankError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Convenient alias for results that use [`TagrankError`].
pub type Result<T> = std::result::Result<T, TagrankError>;
