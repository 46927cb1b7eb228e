//! HTTP JSON API over the participant store.

pub mod error;
pub mod routes;
pub mod state;

use std::io;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use roster_store::error::StoreError;
use roster_store::Store;
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub use error::ApiError;
pub use state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] io::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/participants", get(routes::list_participants))
        .route("/api/participants/search", get(routes::search_participants))
        .route("/api/participants/email", post(routes::participant_by_email_body))
        .route("/api/participants/email/{email}", get(routes::participant_by_email))
        .route("/api/participants/{id}", get(routes::participant_by_id))
        .route("/api/participants/{id}/payments", get(routes::participant_payments))
        .route("/api/count", get(routes::count))
        .route("/api/stats", get(routes::stats))
        .route("/api/check-registration", get(routes::check_registration))
        .route(
            "/api/registrations",
            get(routes::list_registrations).post(routes::create_registration),
        )
        .route("/api/registrations/{id}", get(routes::get_registration))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves until Ctrl+C or SIGTERM, then closes the store.
pub async fn serve(store: Store, bind: &str, port: u16) -> Result<(), ServerError> {
    let state = AppState::new(store);
    let app = router(state.clone());

    let address = format!("{bind}:{port}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(address = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped, closing store");
    state.close()?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(err) => {
                error!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
