//! GraphQL HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::types::PortalSchema;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_playground: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            enable_playground: true,
        }
    }
}

impl ServerConfig {
    /// Loopback on an OS-assigned port, without the playground.
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            enable_playground: false,
        }
    }
}

/// Build the HTTP router: `POST /graphql`, `GET /health`, and the GraphiQL
/// playground on `GET /graphql` and `/` when enabled.
pub fn router(schema: PortalSchema, enable_playground: bool) -> Router {
    let graphql = if enable_playground {
        get(graphql_playground).post(graphql_handler)
    } else {
        axum::routing::post(graphql_handler)
    };

    let mut app = Router::new()
        .route("/graphql", graphql)
        .route("/health", get(health_check));

    if enable_playground {
        app = app.route("/", get(graphql_playground));
    }

    app.with_state(schema)
}

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, std::io::Error> {
    let addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&addr).await
}

/// Serve on an already bound listener until `shutdown_signal` resolves.
pub async fn serve_listener<F>(
    schema: PortalSchema,
    listener: TcpListener,
    enable_playground: bool,
    shutdown_signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = listener.local_addr()?;
    debug!(addr = %addr, "Server listening");

    axum::serve(listener, router(schema, enable_playground))
        .with_graceful_shutdown(shutdown_signal)
        .await
}

/// Start the GraphQL server with graceful shutdown support.
pub async fn serve_with_shutdown<F>(
    schema: PortalSchema,
    config: ServerConfig,
    shutdown_signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(&config).await?;
    info!(
        "⚡ GraphQL server listening on http://{}",
        listener.local_addr()?
    );
    if config.enable_playground {
        info!("🎮 GraphiQL playground enabled");
    }
    serve_listener(schema, listener, config.enable_playground, shutdown_signal).await
}

/// GraphQL query handler.
async fn graphql_handler(State(schema): State<PortalSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GraphQL Playground UI.
async fn graphql_playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
