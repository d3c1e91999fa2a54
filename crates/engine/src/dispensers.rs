//! The module contains `Dispenser` and the in-memory store holding them.

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Tap state of a dispenser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DispenserStatus {
    Open,
    #[default]
    Close,
}

impl DispenserStatus {
    /// Returns the canonical lowercase name, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for DispenserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispenserStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            _ => Err(EngineError::InvalidStatus(format!(
                "expected \"open\" or \"close\", got \"{s}\""
            ))),
        }
    }
}

/// A beer dispenser.
///
/// The flow volume is fixed at creation. Status and `updated_at` only change
/// through [`Engine::change_status`](crate::Engine::change_status).
#[derive(Clone, Debug, PartialEq)]
pub struct Dispenser {
    pub id: Uuid,
    /// Litres per second.
    pub flow_volume: f64,
    pub status: DispenserStatus,
    pub updated_at: DateTime<Utc>,
}

impl Dispenser {
    pub fn new(flow_volume: f64, created_at: DateTime<Utc>) -> ResultEngine<Self> {
        validate_flow_volume(flow_volume)?;

        Ok(Self {
            id: Uuid::new_v4(),
            flow_volume,
            status: DispenserStatus::Close,
            updated_at: created_at,
        })
    }
}

fn validate_flow_volume(flow_volume: f64) -> ResultEngine<()> {
    if !flow_volume.is_finite() || flow_volume <= 0.0 {
        return Err(EngineError::InvalidFlowVolume(format!(
            "flow_volume must be a positive number, got {flow_volume}"
        )));
    }
    Ok(())
}

/// In-memory collection of dispensers keyed by id.
///
/// Creation order is kept so listings are stable.
#[derive(Debug, Default)]
pub struct DispenserStore {
    dispensers: HashMap<Uuid, Dispenser>,
    order: Vec<Uuid>,
}

impl DispenserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a closed dispenser and return a copy of it.
    pub fn create(&mut self, flow_volume: f64, now: DateTime<Utc>) -> ResultEngine<Dispenser> {
        let dispenser = Dispenser::new(flow_volume, now)?;
        self.order.push(dispenser.id);
        self.dispensers.insert(dispenser.id, dispenser.clone());

        Ok(dispenser)
    }

    pub fn find(&self, id: &str) -> ResultEngine<&Dispenser> {
        let key = parse_id(id)?;
        self.dispensers
            .get(&key)
            .ok_or_else(|| EngineError::DispenserNotFound(id.to_string()))
    }

    pub fn find_mut(&mut self, id: &str) -> ResultEngine<&mut Dispenser> {
        let key = parse_id(id)?;
        self.dispensers
            .get_mut(&key)
            .ok_or_else(|| EngineError::DispenserNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over the dispensers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Dispenser> {
        self.order.iter().filter_map(|id| self.dispensers.get(id))
    }
}

/// An id that is not a UUID cannot name any dispenser.
fn parse_id(id: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| EngineError::DispenserNotFound(id.to_string()))
}
