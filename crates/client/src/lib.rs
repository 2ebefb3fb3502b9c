//! GraphQL client for the community portal.
//!
//! Implements [`ConnectionFetcher`](portal_core::ports::ConnectionFetcher)
//! for every portal resource over one shared HTTP client.
//!
//! # Usage
//!
//! ```ignore
//! use portal_client::{ClientConfig, GraphQlClient, GraphQlFetcher, Opportunities};
//!
//! let client = Arc::new(GraphQlClient::new(ClientConfig::for_endpoint(url))?);
//! let fetcher = Arc::new(GraphQlFetcher::<Opportunities>::new(client));
//! ```

mod client;
mod fetcher;
mod resources;

pub use client::{ClientConfig, DEFAULT_TIMEOUT, GraphQlClient};
pub use fetcher::GraphQlFetcher;
pub use resources::{
    Memberships, Opportunities, Reservations, Resource, Tickets, Transactions, Wallets,
};
