//! Spend calculation for a usage period.

use chrono::{DateTime, Utc};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Price of one litre when no other price is configured.
pub const DEFAULT_PRICE_PER_UNIT: f64 = 12.25;

/// Compute the cost of a dispenser running at `flow_volume` litres/second
/// from `opened_at` to `closed_at`, rounded to the cent.
///
/// Elapsed time keeps millisecond precision. A negative interval costs
/// nothing. A cost too large to be counted in cents is an error, never a
/// clamped value.
pub fn compute_spend(
    opened_at: DateTime<Utc>,
    closed_at: DateTime<Utc>,
    flow_volume: f64,
    price_per_unit: f64,
) -> ResultEngine<MoneyCents> {
    let elapsed_ms = (closed_at - opened_at).num_milliseconds().max(0);
    let elapsed_secs = elapsed_ms as f64 / 1000.0;
    let amount = elapsed_secs * flow_volume * price_per_unit;

    let Some(spent) = MoneyCents::from_decimal(amount) else {
        return Err(EngineError::Internal(format!(
            "spend of {amount} is out of range"
        )));
    };
    Ok(spent)
}
