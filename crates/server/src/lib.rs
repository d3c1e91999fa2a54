use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::error::ErrorBody;
pub use server::{ServerState, router, run_with_listener};

mod dispenser;
mod server;
mod spending;

pub mod types {
    pub use api_types::error::ErrorBody;

    pub mod dispenser {
        pub use api_types::dispenser::{
            DispenserCreated, DispenserList, DispenserNew, DispenserStatus, DispenserView,
            StatusConflict, StatusUpdate,
        };
    }

    pub mod spending {
        pub use api_types::spending::{Spending, Usage};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

const INTERNAL_ERROR: &str = "Internal server error";

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::DispenserNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidFlowVolume(_)
        | EngineError::InvalidStatus(_)
        | EngineError::InvalidDateFormat(_)
        | EngineError::InvalidDateOrder(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidPrice(_) | EngineError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::InvalidPrice(_) | EngineError::Internal(_) => {
            tracing::error!("engine error: {err}");
            INTERNAL_ERROR.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                message_for_engine_error(err),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res =
            ServerError::from(EngineError::DispenserNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        for err in [
            EngineError::InvalidFlowVolume("x".to_string()),
            EngineError::InvalidStatus("x".to_string()),
            EngineError::InvalidDateFormat("x".to_string()),
            EngineError::InvalidDateOrder("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn engine_internal_maps_to_500() {
        let res = ServerError::from(EngineError::Internal("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_details_are_hidden() {
        let message =
            message_for_engine_error(EngineError::Internal("ledger out of sync".to_string()));
        assert_eq!(message, INTERNAL_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
