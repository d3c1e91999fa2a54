use std::fmt;

/// Money amount represented as **integer cents**.
///
/// Every amount the engine computes (usage period totals, running totals) is
/// stored in this type, so rounding to two decimals happens exactly once, when
/// a spend is computed, and sums never drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(367_50);
/// assert_eq!(amount.cents(), 36750);
/// assert_eq!(amount.to_string(), "367.50");
/// assert_eq!(amount.as_decimal(), 367.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

/// 2^63, the first cent count that does not fit in an `i64`.
const CENTS_LIMIT: f64 = 9_223_372_036_854_775_808.0;

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Rounds a decimal amount to the nearest cent, half away from zero.
    ///
    /// Returns `None` when the amount is not finite or its cents do not fit
    /// in an `i64`.
    #[must_use]
    pub fn from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        if !(-CENTS_LIMIT..CENTS_LIMIT).contains(&cents) {
            return None;
        }
        Some(Self(cents as i64))
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the amount as a decimal number, e.g. `1050` cents → `10.5`.
    #[must_use]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}
