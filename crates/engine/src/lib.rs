//! Dispenser lifecycle engine.
//!
//! The [`Engine`] owns every [`Dispenser`] and its usage history, applies
//! status changes in time order, and reports how much each dispenser has
//! cost so far.

use chrono::{DateTime, NaiveDateTime, Utc};
use tokio::sync::Mutex;

pub use dispensers::{Dispenser, DispenserStatus, DispenserStore};
pub use error::EngineError;
pub use money::MoneyCents;
pub use spend::{DEFAULT_PRICE_PER_UNIT, compute_spend};
pub use usage::{Spending, UsageLedger, UsagePeriod};

mod dispensers;
mod error;
mod money;
mod spend;
mod usage;

type ResultEngine<T> = Result<T, EngineError>;

/// Request to move a dispenser to another status.
///
/// Both fields are kept as received so the engine can report which one is
/// invalid after it knows the dispenser exists.
#[derive(Clone, Debug)]
pub struct StatusChangeCmd {
    pub status: String,
    pub updated_at: String,
}

/// Outcome of [`Engine::change_status`].
#[derive(Clone, Debug, PartialEq)]
pub enum StatusChange {
    /// The status was changed; holds the updated dispenser.
    Changed(Dispenser),
    /// The dispenser already had the requested status. Nothing was recorded.
    AlreadyInState(Dispenser),
}

#[derive(Debug, Default)]
struct State {
    dispensers: DispenserStore,
    usages: UsageLedger,
}

#[derive(Debug)]
pub struct Engine {
    state: Mutex<State>,
    price_per_unit: f64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Create a new closed dispenser pouring `flow_volume` litres per second.
    pub async fn create_dispenser(&self, flow_volume: f64) -> ResultEngine<Dispenser> {
        let mut state = self.state.lock().await;
        let dispenser = state.dispensers.create(flow_volume, Utc::now())?;
        tracing::info!(id = %dispenser.id, flow_volume, "dispenser created");

        Ok(dispenser)
    }

    /// Move dispenser `id` to the requested status at the requested time.
    ///
    /// The usage ledger is updated before the dispenser, so an out-of-order
    /// timestamp leaves both the dispenser and its history untouched.
    pub async fn change_status(
        &self,
        id: &str,
        cmd: StatusChangeCmd,
    ) -> ResultEngine<StatusChange> {
        let mut guard = self.state.lock().await;
        let State { dispensers, usages } = &mut *guard;

        let dispenser = dispensers.find_mut(id)?;
        let status: DispenserStatus = cmd.status.parse()?;
        let at = parse_timestamp(&cmd.updated_at)?;

        if dispenser.status == status {
            tracing::debug!(id = %dispenser.id, %status, "dispenser already in requested status");
            return Ok(StatusChange::AlreadyInState(dispenser.clone()));
        }

        match status {
            DispenserStatus::Open => {
                if let Err(err) = usages.record_open(dispenser.id, at, dispenser.flow_volume) {
                    tracing::debug!(id = %dispenser.id, "open rejected: {err}");
                    return Err(err);
                }
                tracing::info!(id = %dispenser.id, opened_at = %at, "dispenser opened");
            }
            DispenserStatus::Close => {
                let spent = match usages.record_close(dispenser.id, at, self.price_per_unit) {
                    Ok(spent) => spent,
                    Err(err) => {
                        tracing::debug!(id = %dispenser.id, "close rejected: {err}");
                        return Err(err);
                    }
                };
                tracing::info!(id = %dispenser.id, closed_at = %at, %spent, "dispenser closed");
            }
        }
        dispenser.status = status;
        dispenser.updated_at = at;

        Ok(StatusChange::Changed(dispenser.clone()))
    }

    /// Amount spent on dispenser `id` so far, with every usage period.
    ///
    /// A period that is still open is priced up to now.
    pub async fn spending(&self, id: &str) -> ResultEngine<Spending> {
        let state = self.state.lock().await;
        let dispenser = state.dispensers.find(id)?;

        state.usages.snapshot(dispenser.id, Utc::now(), self.price_per_unit)
    }

    /// Return a copy of dispenser `id`.
    pub async fn dispenser(&self, id: &str) -> ResultEngine<Dispenser> {
        let state = self.state.lock().await;
        state.dispensers.find(id).cloned()
    }

    /// Every dispenser, in creation order.
    pub async fn dispensers(&self) -> Vec<Dispenser> {
        let state = self.state.lock().await;
        state.dispensers.iter().cloned().collect()
    }
}

/// Parse an ISO-8601 timestamp.
///
/// An explicit offset is honoured; a timestamp without one is taken as UTC.
fn parse_timestamp(value: &str) -> ResultEngine<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }

    trimmed
        .parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            EngineError::InvalidDateFormat(format!("\"{value}\" is not an ISO-8601 date"))
        })
}

/// The builder for `Engine`
#[derive(Debug)]
pub struct EngineBuilder {
    price_per_unit: f64,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            price_per_unit: DEFAULT_PRICE_PER_UNIT,
        }
    }
}

impl EngineBuilder {
    /// Price of one litre, fixed for the lifetime of the engine.
    pub fn price_per_unit(mut self, price: f64) -> EngineBuilder {
        self.price_per_unit = price;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        if !self.price_per_unit.is_finite() || self.price_per_unit <= 0.0 {
            return Err(EngineError::InvalidPrice(format!(
                "price must be a positive number, got {}",
                self.price_per_unit
            )));
        }

        Ok(Engine {
            state: Mutex::new(State::default()),
            price_per_unit: self.price_per_unit,
        })
    }
}
