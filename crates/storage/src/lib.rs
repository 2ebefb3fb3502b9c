//! Storage layer for the community portal fixture backend.
//!
//! This crate provides an in-memory implementation of the
//! [`Catalog`](portal_core::ports::Catalog) trait defined in `portal-core`,
//! plus deterministic seed data.
//!
//! # Architecture
//!
//! - [`memory::MemoryCatalog`] - Tenant-tagged tables with keyset pagination
//! - [`fixtures`] - Reproducible seed data for several communities
//!
//! # Usage
//!
//! ```ignore
//! use portal_storage::{FixtureConfig, seed};
//!
//! let catalog = Arc::new(seed(&FixtureConfig::default()));
//! let page = catalog
//!     .list_opportunities(&TenantScope::community("neo88"), &Default::default(), &Default::default())
//!     .await?;
//! ```

pub mod fixtures;
pub mod memory;

pub use fixtures::{FixtureConfig, seed, user_id};
pub use memory::{CatalogStats, MemoryCatalog, RowTags};
