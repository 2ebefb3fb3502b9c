//! Core domain layer for the community portal.
//!
//! This crate contains the domain models, port traits (interfaces), and
//! the client-side synchronization services for cursor-paginated lists.
//! It follows hexagonal architecture principles - this is the innermost
//! layer with no dependencies on transports or storage engines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      portal (binary)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  portal-graphql   │  portal-client   │  portal-presenters   │
//! │  (fixture API)    │  (HTTP fetcher)  │  (view models)       │
//! ├───────────────────┴──────────────────┴──────────────────────┤
//! │                     portal-storage                          │
//! │                  (in-memory catalog)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     portal-core  ← YOU ARE HERE             │
//! │               (models, ports, services)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Domain entities (Opportunity, Reservation, Wallet, etc.)
//! - [`ports`] - Interface traits for adapters to implement
//! - [`services`] - Paginated list, edge merging and scroll sentinel
//! - [`error`] - Domain error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Key Concepts
//!
//! ## Ports
//!
//! - [`ports::ConnectionFetcher`] - Fetch one page of a tenant-scoped connection
//! - [`ports::Catalog`] - Serve connections from a data store
//! - [`ports::VisibilitySource`] - Observe the scroll sentinel
//! - [`ports::Notifier`] - Show transient user-facing notices
//!
//! ## List Lifecycle
//!
//! 1. Mount a [`services::PaginatedList`] and load the first page
//! 2. Attach a scroll sentinel to the end of the rendered list
//! 3. Each time the sentinel becomes visible, fetch the page after `endCursor`
//! 4. Merge new edges, collapsing duplicates by node id
//! 5. On unmount, detach the sentinel and discard any late page

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
