// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the Roster student stream
//!
//! Every failure a consumer can observe is a [`RosterError`]. The same error
//! value is broadcast to every registered subscription, so it is cheap to
//! clone: underlying causes are kept behind an [`Arc`].
//!
//! # Examples
//!
//! ```
//! use roster_error::{RosterError, Result};
//!
//! fn resolve(address: &str) -> Result<()> {
//!     Err(RosterError::bad_url(address))
//! }
//!
//! let err = resolve("not a url/novos").unwrap_err();
//! assert!(err.is_bad_url());
//! ```

use std::fmt;
use std::sync::Arc;

/// Shared, type-erased cause attached to an error.
pub type ErrorSource = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Root error type for all Roster operations
///
/// The three variants mirror the three ways a fetch path can fail. All of
/// them are terminal for the subscriptions they reach.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RosterError {
    /// The configured server address does not form a valid URL
    ///
    /// Raised before any request is attempted.
    #[error("Bad URL: {address}")]
    BadUrl {
        /// The full endpoint address that failed to parse
        address: String,
    },

    /// The response carried no usable body, or the body did not decode
    ///
    /// The cause is `None` when the transport reported neither data nor an error.
    #[error("Invalid data{}", describe(.0))]
    InvalidData(#[source] Option<ErrorSource>),

    /// Any other transport-layer failure
    #[error("Unknown error{}", describe(.0))]
    Unknown(#[source] Option<ErrorSource>),
}

fn describe(cause: &Option<ErrorSource>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

impl RosterError {
    /// Create a bad URL error for the given address
    pub fn bad_url(address: impl Into<String>) -> Self {
        Self::BadUrl {
            address: address.into(),
        }
    }

    /// Wrap a decoding or body error
    pub fn invalid_data(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidData(Some(Arc::new(error)))
    }

    /// Invalid data with an optional, already shared cause
    #[must_use]
    pub const fn invalid_data_cause(cause: Option<ErrorSource>) -> Self {
        Self::InvalidData(cause)
    }

    /// Invalid data without any underlying cause
    #[must_use]
    pub const fn missing_data() -> Self {
        Self::invalid_data_cause(None)
    }

    /// Unknown failure with an optional, already shared cause
    #[must_use]
    pub const fn unknown_cause(cause: Option<ErrorSource>) -> Self {
        Self::Unknown(cause)
    }

    /// Check if the address could not be turned into a URL
    #[must_use]
    pub const fn is_bad_url(&self) -> bool {
        matches!(self, Self::BadUrl { .. })
    }

    /// Check if the response body was missing or malformed
    #[must_use]
    pub const fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData(_))
    }

    /// Check if this is an unclassified transport failure
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// The wrapped cause, if any
    #[must_use]
    pub fn cause(&self) -> Option<&ErrorSource> {
        match self {
            Self::BadUrl { .. } => None,
            Self::InvalidData(cause) | Self::Unknown(cause) => cause.as_ref(),
        }
    }
}

// Causes are opaque, so equality falls back to the rendered message.
impl PartialEq for RosterError {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.to_string() == other.to_string()
    }
}

/// Specialized Result type for Roster operations
///
/// # Examples
///
/// ```
/// use roster_error::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, RosterError>;

/// Extension trait for classifying foreign errors as `RosterError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`.
pub trait IntoRosterError {
    /// Classify this error as invalid data
    fn into_invalid_data(self) -> RosterError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoRosterError for E {
    fn into_invalid_data(self) -> RosterError {
        RosterError::invalid_data(self)
    }
}

impl RosterError {
    /// Short label for the variant, used in log fields
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadUrl { .. } => ErrorKind::BadUrl,
            Self::InvalidData(_) => ErrorKind::InvalidData,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

/// Fieldless mirror of [`RosterError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadUrl,
    InvalidData,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadUrl => write!(f, "bad_url"),
            Self::InvalidData => write!(f, "invalid_data"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
