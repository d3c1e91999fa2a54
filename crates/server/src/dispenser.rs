//! Dispenser API endpoints.

use api_types::dispenser::{
    DispenserCreated, DispenserList, DispenserNew, DispenserStatus, DispenserView,
    StatusConflict, StatusUpdate,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{StatusChange, StatusChangeCmd};

use crate::{ServerError, server::ServerState};

/// Handle requests for creating a new dispenser
pub async fn dispenser_new(
    State(state): State<ServerState>,
    payload: Result<Json<DispenserNew>, JsonRejection>,
) -> Result<Json<DispenserCreated>, ServerError> {
    let Json(payload) = payload?;
    let Some(flow_volume) = payload.flow_volume else {
        return Err(ServerError::Generic("flow_volume is required".to_string()));
    };

    let dispenser = state.engine.create_dispenser(flow_volume).await?;

    Ok(Json(DispenserCreated {
        id: dispenser.id,
        flow_volume: dispenser.flow_volume,
    }))
}

/// Handle requests for opening or closing a dispenser.
///
/// Answers `202 Accepted` on a change and `409 Conflict` when the dispenser is
/// already in the requested status.
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let (Some(status), Some(updated_at)) = (payload.status, payload.updated_at) else {
        return Err(ServerError::Generic(
            "status and updated_at are required".to_string(),
        ));
    };

    let outcome = state
        .engine
        .change_status(&id, StatusChangeCmd { status, updated_at })
        .await?;

    Ok(match outcome {
        StatusChange::Changed(_) => StatusCode::ACCEPTED.into_response(),
        StatusChange::AlreadyInState(dispenser) => (
            StatusCode::CONFLICT,
            Json(StatusConflict {
                message: format!("Dispenser is already {}", dispenser.status),
            }),
        )
            .into_response(),
    })
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DispenserView>, ServerError> {
    let dispenser = state.engine.dispenser(&id).await?;
    Ok(Json(view(&dispenser)))
}

pub async fn list(State(state): State<ServerState>) -> Json<DispenserList> {
    let dispensers = state.engine.dispensers().await;
    Json(DispenserList {
        dispensers: dispensers.iter().map(view).collect(),
    })
}

fn view(dispenser: &engine::Dispenser) -> DispenserView {
    DispenserView {
        id: dispenser.id,
        flow_volume: dispenser.flow_volume,
        status: match dispenser.status {
            engine::DispenserStatus::Open => DispenserStatus::Open,
            engine::DispenserStatus::Close => DispenserStatus::Close,
        },
        updated_at: dispenser.updated_at,
    }
}
