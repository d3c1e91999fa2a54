//! Spending API endpoint

use api_types::spending::{Spending, Usage};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState};

/// Handle requests for the money spent on a dispenser
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Spending>, ServerError> {
    let spending = state.engine.spending(&id).await?;

    Ok(Json(Spending {
        amount: spending.amount.as_decimal(),
        usages: spending
            .usages
            .into_iter()
            .map(|usage| Usage {
                opened_at: usage.opened_at,
                closed_at: usage.closed_at,
                flow_volume: usage.flow_volume,
                total_spent: usage.total_spent.map(|spent| spent.as_decimal()),
            })
            .collect(),
    }))
}
