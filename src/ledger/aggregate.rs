//! Monthly net aggregation over a trailing window of ledger entries.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{entry::LedgerEntry, period::YearMonth};
use crate::errors::{ForecastError, Result};

/// Default trailing window, in months.
pub const DEFAULT_WINDOW_MONTHS: u32 = 3;
/// Days counted per month when computing the window start.
pub const WINDOW_DAYS_PER_MONTH: u32 = 31;

/// Income minus expense for a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyNet {
    pub period: YearMonth,
    pub net: Decimal,
}

/// Trailing span of whole months ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingWindow {
    pub months: u32,
    #[serde(default = "TrailingWindow::default_days_per_month")]
    pub days_per_month: u32,
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self {
            months: DEFAULT_WINDOW_MONTHS,
            days_per_month: WINDOW_DAYS_PER_MONTH,
        }
    }
}

impl TrailingWindow {
    pub fn new(months: u32) -> Result<Self> {
        let window = Self {
            months,
            ..Self::default()
        };
        window.validate()?;
        Ok(window)
    }

    pub fn default_days_per_month() -> u32 {
        WINDOW_DAYS_PER_MONTH
    }

    pub fn validate(&self) -> Result<()> {
        if self.months == 0 || self.days_per_month == 0 {
            return Err(ForecastError::EmptyWindow);
        }
        Ok(())
    }

    /// First date inside the window: `today - months * days_per_month`.
    pub fn since(&self, today: NaiveDate) -> Result<NaiveDate> {
        self.validate()?;
        let days = u64::from(self.months) * u64::from(self.days_per_month);
        today
            .checked_sub_days(Days::new(days))
            .ok_or(ForecastError::Overflow("window start date"))
    }

    /// Filters `entries` to the window and averages them.
    pub fn average_in_window(&self, entries: &[LedgerEntry], today: NaiveDate) -> Result<Decimal> {
        let since = self.since(today)?;
        let in_window: Vec<LedgerEntry> = entries
            .iter()
            .filter(|entry| entry.occurred_on >= since && entry.occurred_on <= today)
            .cloned()
            .collect();
        average_monthly_net(&in_window, self.months)
    }
}

/// Groups entries by calendar month into signed nets, ascending by period.
pub fn monthly_nets(entries: &[LedgerEntry]) -> Result<Vec<MonthlyNet>> {
    let mut by_month: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    for entry in entries {
        entry.validate()?;
        let slot = by_month
            .entry(YearMonth::of(entry.occurred_on))
            .or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(entry.signed_amount())
            .ok_or(ForecastError::Overflow("monthly net"))?;
    }
    Ok(by_month
        .into_iter()
        .map(|(period, net)| MonthlyNet { period, net })
        .collect())
}

/// Average monthly net over entries already restricted to the window.
///
/// Returns zero when there is no data or when the average is not positive;
/// zero is the "no feasible forecast" marker for downstream projections.
pub fn average_monthly_net(entries: &[LedgerEntry], window_months: u32) -> Result<Decimal> {
    if window_months == 0 {
        return Err(ForecastError::EmptyWindow);
    }
    let nets = monthly_nets(entries)?;
    if nets.is_empty() {
        debug!("no ledger activity in window, average net is zero");
        return Ok(Decimal::ZERO);
    }

    let total = nets.iter().try_fold(Decimal::ZERO, |acc, month| {
        acc.checked_add(month.net)
            .ok_or(ForecastError::Overflow("net total"))
    })?;
    let average = total
        .checked_div(Decimal::from(nets.len()))
        .ok_or(ForecastError::Overflow("average net"))?;
    debug!(months = nets.len(), %total, %average, "aggregated monthly nets");

    if average <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    Ok(average)
}

/// Signed sum of every entry: income minus expense across the whole set.
pub fn net_total(entries: &[LedgerEntry]) -> Result<Decimal> {
    entries.iter().try_fold(Decimal::ZERO, |acc, entry| {
        entry.validate()?;
        acc.checked_add(entry.signed_amount())
            .ok_or(ForecastError::Overflow("balance"))
    })
}
