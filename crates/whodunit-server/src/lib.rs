//! JSON-over-HTTP adapter for the deduction engine.
//!
//! Routes mirror the browser game's API (`/api/start_game`,
//! `/api/round1_interview`, ...). Public aliases such as `kate` or `pipe`
//! are resolved here; everything else is delegated to
//! [`whodunit_engine::SessionRegistry`].

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;
use whodunit_engine::SessionRegistry;

pub use self::{error::ServerError, state::AppState};

mod alias;
mod cors;
mod error;
mod routes;
mod state;

pub async fn serve(addr: SocketAddr, registry: SessionRegistry) -> Result<(), ServerError> {
    let app = router(AppState::new(Arc::new(registry)));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/start_game",
            get(routes::start_game).post(routes::start_game),
        )
        .route("/api/round1_interview", get(routes::round1_interview))
        .route("/api/round2_alibis", get(routes::round2_alibis))
        .route("/api/round3_verify_alibi", post(routes::round3_verify_alibi))
        .route(
            "/api/round4_final_deduction",
            get(routes::round4_final_deduction).post(routes::round4_final_deduction),
        )
        .route("/api/make_guess", post(routes::make_guess))
        .route("/api/game_status", get(routes::game_status))
        .layer(middleware::from_fn(cors::cors_middleware))
        .with_state(state)
}
