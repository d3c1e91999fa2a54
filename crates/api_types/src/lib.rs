use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error {
    use super::*;

    /// Body of every error answer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
    }
}

pub mod dispenser {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DispenserStatus {
        Open,
        Close,
    }

    /// Request body for creating a dispenser.
    ///
    /// `flow_volume` is optional here so a missing value can be reported with
    /// the same error body as an invalid one.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenserNew {
        pub flow_volume: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenserCreated {
        pub id: Uuid,
        /// Litres per second.
        pub flow_volume: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenserView {
        pub id: Uuid,
        pub flow_volume: f64,
        pub status: DispenserStatus,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenserList {
        pub dispensers: Vec<DispenserView>,
    }

    /// Request body for `PUT /dispenser/{id}/status`.
    ///
    /// Both fields are plain strings: the engine validates them once it knows
    /// the dispenser exists.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusUpdate {
        pub status: Option<String>,
        /// ISO-8601 timestamp of the change.
        pub updated_at: Option<String>,
    }

    /// Body of a `409 Conflict` answer to a status update.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusConflict {
        pub message: String,
    }
}

pub mod spending {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Spending {
        /// Total spent, in currency units with two decimals.
        pub amount: f64,
        pub usages: Vec<Usage>,
    }

    /// One open-to-close interval.
    ///
    /// `closed_at` is `null` while the dispenser is still open; `total_spent`
    /// is then the cost up to the moment of the request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Usage {
        pub opened_at: DateTime<Utc>,
        pub closed_at: Option<DateTime<Utc>>,
        pub flow_volume: f64,
        pub total_spent: Option<f64>,
    }
}
