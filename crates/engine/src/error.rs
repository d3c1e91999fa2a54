//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidFlowVolume`] when a dispenser is created with a non positive rate.
//! - [`DispenserNotFound`] when an id does not match any dispenser.
//! - [`InvalidStatus`] and [`InvalidDateFormat`] when a status change request
//!   cannot be parsed.
//! - [`InvalidDateOrder`] when a status change would break the ordering of the
//!   usage periods.
//!
//!  [`InvalidFlowVolume`]: EngineError::InvalidFlowVolume
//!  [`DispenserNotFound`]: EngineError::DispenserNotFound
//!  [`InvalidStatus`]: EngineError::InvalidStatus
//!  [`InvalidDateFormat`]: EngineError::InvalidDateFormat
//!  [`InvalidDateOrder`]: EngineError::InvalidDateOrder
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Invalid flow volume: {0}")]
    InvalidFlowVolume(String),
    #[error("\"{0}\" dispenser not found!")]
    DispenserNotFound(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
    #[error("Invalid date order: {0}")]
    InvalidDateOrder(String),
    #[error("Invalid price per unit: {0}")]
    InvalidPrice(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
