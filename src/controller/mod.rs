use std::net::SocketAddr;

use anyhow::Context;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::Router;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;

pub mod health_check;
pub mod parking_controller;

#[derive(Clone)]
pub struct AppState {
    pub postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

pub async fn serve(
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    config: &Config,
) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .filter_map(|s| s.parse().ok())
        .collect::<Vec<HeaderValue>>();

    let app_state = AppState {
        postgres_connection,
    };
    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
            ),
        )
        .fallback(page_not_found_handler);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("API server listening on: {}", addr);
    axum::Server::bind(&addr)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .nest("/parking", parking_controller::router(app_state))
        .merge(health_check::router())
}
