pub(crate) mod controllers;
pub(crate) mod core;
pub(crate) mod identity;
pub(crate) mod routes;
pub(crate) mod token;
pub(crate) mod types;
pub(crate) mod utils;

use axum::ServiceExt;
use axum::extract::Request;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::error::ConfigError as Error;
use crate::core::{config::Args, state::AppState};
use crate::identity::IdentityStore;

pub async fn run() -> Result<(), Error> {
    let config = Args::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let identities = IdentityStore::seeded()?;
    tracing::info!(identities = identities.iter().count(), "identity store loaded");

    let state = AppState::new(&config, identities)?;
    let app = routes::router::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(Error::IO)?;

    tracing::info!("listening on port {}", config.port);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .map_err(Error::IO)?;

    Ok(())
}
