//! Usage periods and the per-dispenser ledger recording them.
//!
//! Each dispenser owns an ordered list of open/close intervals. The last one
//! may still be open; every other one is closed and carries its cost, which is
//! also accumulated into a running total.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, spend::compute_spend};

/// One open-to-close interval of a dispenser.
#[derive(Clone, Debug, PartialEq)]
pub struct UsagePeriod {
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Flow volume of the dispenser when the period was opened.
    pub flow_volume: f64,
    /// Set when the period is closed, or estimated in a [`Spending`] snapshot.
    pub total_spent: Option<MoneyCents>,
}

impl UsagePeriod {
    fn open(opened_at: DateTime<Utc>, flow_volume: f64) -> Self {
        Self {
            opened_at,
            closed_at: None,
            flow_volume,
            total_spent: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// What a dispenser has cost so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spending {
    pub amount: MoneyCents,
    pub usages: Vec<UsagePeriod>,
}

#[derive(Debug, Default)]
struct Usages {
    periods: Vec<UsagePeriod>,
    total: MoneyCents,
}

/// Usage history of every dispenser that has been opened at least once.
#[derive(Debug, Default)]
pub struct UsageLedger {
    usages: HashMap<Uuid, Usages>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `id` can be opened at `at`, without recording anything.
    fn check_open(&self, id: Uuid, at: DateTime<Utc>) -> ResultEngine<()> {
        let Some(last) = self.last_period(id) else {
            return Ok(());
        };

        let Some(closed_at) = last.closed_at else {
            return Err(EngineError::Internal(format!(
                "dispenser {id} already has an open usage period"
            )));
        };
        if at <= closed_at {
            return Err(EngineError::InvalidDateOrder(format!(
                "opening at {} is not after the last close at {}",
                at.to_rfc3339(),
                closed_at.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Check that `id` can be closed at `at`, without recording anything.
    fn check_close(&self, id: Uuid, at: DateTime<Utc>) -> ResultEngine<()> {
        let Some(open) = self.last_period(id).filter(|period| period.is_open()) else {
            return Err(EngineError::Internal(format!(
                "dispenser {id} has no open usage period"
            )));
        };

        if at <= open.opened_at {
            return Err(EngineError::InvalidDateOrder(format!(
                "closing at {} is not after the opening at {}",
                at.to_rfc3339(),
                open.opened_at.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Append a new open period for `id`.
    pub fn record_open(
        &mut self,
        id: Uuid,
        at: DateTime<Utc>,
        flow_volume: f64,
    ) -> ResultEngine<()> {
        self.check_open(id, at)?;

        self.usages
            .entry(id)
            .or_default()
            .periods
            .push(UsagePeriod::open(at, flow_volume));
        Ok(())
    }

    /// Close the open period of `id` and return its cost.
    ///
    /// The cost and the new running total are computed before anything is
    /// written, so a failure leaves the period open.
    pub fn record_close(
        &mut self,
        id: Uuid,
        at: DateTime<Utc>,
        price_per_unit: f64,
    ) -> ResultEngine<MoneyCents> {
        self.check_close(id, at)?;

        let Some(usages) = self.usages.get_mut(&id) else {
            return Err(EngineError::Internal(format!(
                "dispenser {id} has no usages"
            )));
        };
        let Some(period) = usages.periods.last_mut() else {
            return Err(EngineError::Internal(format!(
                "dispenser {id} has no usages"
            )));
        };

        let spent = compute_spend(period.opened_at, at, period.flow_volume, price_per_unit)?;
        let total = add_spent(usages.total, spent)?;
        period.closed_at = Some(at);
        period.total_spent = Some(spent);
        usages.total = total;

        Ok(spent)
    }

    /// Spending of `id` as of `now`.
    ///
    /// An open period is priced up to `now` in the returned copy only; the
    /// ledger keeps it open and out of the running total.
    pub fn snapshot(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        price_per_unit: f64,
    ) -> ResultEngine<Spending> {
        let Some(usages) = self.usages.get(&id) else {
            return Ok(Spending::default());
        };

        let mut amount = usages.total;
        let mut periods = usages.periods.clone();
        if let Some(open) = periods.last_mut().filter(|period| period.is_open()) {
            let estimate = compute_spend(open.opened_at, now, open.flow_volume, price_per_unit)?;
            open.total_spent = Some(estimate);
            amount = add_spent(amount, estimate)?;
        }

        Ok(Spending {
            amount,
            usages: periods,
        })
    }

    fn last_period(&self, id: Uuid) -> Option<&UsagePeriod> {
        self.usages.get(&id).and_then(|usages| usages.periods.last())
    }
}

fn add_spent(total: MoneyCents, spent: MoneyCents) -> ResultEngine<MoneyCents> {
    let Some(sum) = total.checked_add(spent) else {
        return Err(EngineError::Internal(format!(
            "total {total} + {spent} overflows"
        )));
    };
    Ok(sum)
}
