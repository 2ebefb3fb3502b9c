//! Error types for the portal domain layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`FetchError`] - Connection fetcher (transport/GraphQL) errors
//! - [`StorageError`] - Catalog errors on the serving side
//! - [`ListError`] - Paginated list synchronization errors
//! - [`VisibilityError`] - Visibility observer errors
//! - [`PortalError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors raised by a connection fetcher.
///
/// Every variant is recoverable by re-issuing the same request; the list
/// layer never retries on its own.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request never reached the backend (DNS, TLS, connection reset...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The backend returned GraphQL errors instead of data.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response payload did not match the connection shape.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The transport gave up waiting for a response.
    #[error("Request timed out")]
    Timeout,
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Catalog errors on the serving side of the connection contract.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Cursor could not be decoded or points to an unknown record.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Request arguments failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// =============================================================================
// List Errors
// =============================================================================

/// Paginated list synchronization errors.
///
/// The two fetch variants map to the two failure surfaces of a list view:
/// an initial failure replaces the list with an error state, a load-more
/// failure leaves the list untouched and raises a transient notice.
#[derive(Debug, Clone, Error)]
pub enum ListError {
    /// First page could not be fetched.
    #[error("Initial fetch failed: {0}")]
    InitialFetchFailed(#[source] FetchError),

    /// A subsequent page could not be fetched. Prior state is retained.
    #[error("Load more failed: {0}")]
    LoadMoreFailed(#[source] FetchError),

    /// The owning view was unmounted.
    #[error("List is unmounted")]
    Unmounted,
}

// =============================================================================
// Visibility Errors
// =============================================================================

/// Visibility observation errors.
#[derive(Debug, Clone, Error)]
pub enum VisibilityError {
    /// The platform observer could not be attached.
    #[error("Visibility observer unavailable: {0}")]
    ObserverUnavailable(String),
}

// =============================================================================
// Portal Errors
// =============================================================================

/// Top-level portal errors.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Fetcher error.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Catalog error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// List synchronization error.
    #[error("List error: {0}")]
    List(#[from] ListError),

    /// Visibility observation error.
    #[error("Visibility error: {0}")]
    Visibility(#[from] VisibilityError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for top-level portal operations.
pub type PortalResult<T> = Result<T, PortalError>;

/// Result type for fetcher operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for catalog operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for list operations.
pub type ListResult<T> = Result<T, ListError>;

/// Result type for visibility observation.
pub type VisibilityResult<T> = Result<T, VisibilityError>;
