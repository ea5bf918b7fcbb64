#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use savings_core::{
    config::ForecastConfig,
    core::{services::ForecastService, time::FixedClock},
    ledger::LedgerEntry,
    storage::EntrySource,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn income(amount: Decimal, on: NaiveDate) -> LedgerEntry {
    LedgerEntry::income(amount, on).expect("valid income")
}

pub fn expense(amount: Decimal, on: NaiveDate) -> LedgerEntry {
    LedgerEntry::expense(amount, on).expect("valid expense")
}

/// Two months of activity: February nets 3000, March nets -500.
pub fn two_month_history() -> Vec<LedgerEntry> {
    vec![
        income(Decimal::from(5000), date(2024, 2, 1)),
        expense(Decimal::from(2000), date(2024, 2, 10)),
        income(Decimal::from(4000), date(2024, 3, 1)),
        expense(Decimal::from(4500), date(2024, 3, 2)),
    ]
}

/// Service with default settings and "today" pinned.
pub fn service_at<S>(source: S, today: NaiveDate) -> ForecastService
where
    S: EntrySource + 'static,
{
    ForecastService::new(
        Box::new(source),
        Box::new(FixedClock::new(today)),
        ForecastConfig::default(),
    )
    .expect("default config is valid")
}
