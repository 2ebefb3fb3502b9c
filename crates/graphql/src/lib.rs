//! GraphQL API for the community portal fixture backend.
//!
//! Serves every portal list as a tenant-scoped Relay connection over any
//! [`Catalog`](portal_core::ports::Catalog) implementation.
//!
//! # Usage
//!
//! ```ignore
//! use portal_graphql::{build_schema, serve_with_shutdown, ServerConfig};
//! use portal_storage::{seed, FixtureConfig};
//!
//! let schema = build_schema(Arc::new(seed(&FixtureConfig::default())));
//! serve_with_shutdown(schema, ServerConfig::default(), shutdown_signal()).await?;
//! ```

mod schema;
mod server;
mod types;

pub use schema::{
    MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH, PageInfo, PortalQuery, build_schema, schema_builder,
};
pub use server::{ServerConfig, bind, router, serve_listener, serve_with_shutdown};
pub use types::PortalSchema;
