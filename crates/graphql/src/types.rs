//! GraphQL type definitions.

use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use crate::schema::PortalQuery;

/// The portal GraphQL schema type.
pub type PortalSchema = Schema<PortalQuery, EmptyMutation, EmptySubscription>;
