use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{dispenser, spending};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/dispenser",
            post(dispenser::dispenser_new).get(dispenser::list),
        )
        .route("/dispenser/{id}", get(dispenser::get))
        .route("/dispenser/{id}/status", put(dispenser::change_status))
        .route("/dispenser/{id}/spending", get(spending::get))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine))).await
}
