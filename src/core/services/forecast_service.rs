//! Request-level orchestration: fetch a snapshot, aggregate it, forecast.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::ForecastConfig,
    core::time::Clock,
    forecast::{GoalDefinition, MonthsToGoal, SimulationOutcome},
    ledger::{net_total, LedgerEntry},
    storage::{EntryQuery, EntrySource, UserId},
    wishlist::WishlistSummary,
};

use super::ServiceResult;

/// Net total of a user's history and how many entries it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub balance: Decimal,
    pub count: usize,
}

/// Binds an entry source, a clock, and forecasting settings.
///
/// Holds no mutable state, so a single instance can serve concurrent callers.
pub struct ForecastService {
    source: Box<dyn EntrySource>,
    clock: Box<dyn Clock>,
    config: ForecastConfig,
}

impl ForecastService {
    pub fn new(
        source: Box<dyn EntrySource>,
        clock: Box<dyn Clock>,
        config: ForecastConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Average monthly net for the user over the configured trailing window.
    pub fn average_monthly_net(&self, user_id: UserId) -> ServiceResult<Decimal> {
        self.average_over(user_id, self.config.window_months)
    }

    /// Average monthly net over an explicit number of months.
    pub fn average_over(&self, user_id: UserId, window_months: u32) -> ServiceResult<Decimal> {
        let mut window = self.config.window();
        window.months = window_months;
        let today = self.clock.today();
        let since = window.since(today)?;
        let entries = self.source.fetch_entries(user_id, since)?;
        let average = window.average_in_window(&entries, today)?;
        info!(user_id, window_months, entries = entries.len(), %average, "computed average monthly net");
        Ok(average)
    }

    /// Income minus expense across every entry the user has.
    pub fn balance(&self, user_id: UserId) -> ServiceResult<Balance> {
        let entries = self.source.fetch_all_entries(user_id)?;
        Ok(Balance {
            balance: net_total(&entries)?,
            count: entries.len(),
        })
    }

    /// One page of the user's entries, optionally limited to a category.
    pub fn list_entries(
        &self,
        user_id: UserId,
        query: &EntryQuery,
    ) -> ServiceResult<Vec<LedgerEntry>> {
        let entries = self.source.query_entries(user_id, query)?;
        debug!(user_id, ?query, returned = entries.len(), "listed entries");
        Ok(entries)
    }

    pub fn goal_forecast(&self, goal: &GoalDefinition) -> ServiceResult<MonthsToGoal> {
        let months = goal.forecast()?;
        if months.is_unreachable() {
            warn!(target_amount = %goal.target_amount, "goal unreachable at current contribution");
        }
        Ok(months)
    }

    pub fn goal_simulation(
        &self,
        goal: &GoalDefinition,
        contribution_delta: Decimal,
    ) -> ServiceResult<SimulationOutcome> {
        let outcome = goal.simulate(contribution_delta)?;
        info!(verdict = ?outcome.verdict, "{}", outcome.message);
        Ok(outcome)
    }

    /// Forecast for a goal funded by the user's own average monthly net.
    pub fn goal_forecast_for_user(
        &self,
        user_id: UserId,
        target_amount: Decimal,
        current_savings: Decimal,
    ) -> ServiceResult<MonthsToGoal> {
        let average = self.average_monthly_net(user_id)?;
        let goal = GoalDefinition::new(target_amount, average).with_savings(current_savings);
        self.goal_forecast(&goal)
    }

    pub fn wishlist_summary(&self, user_id: UserId) -> ServiceResult<WishlistSummary> {
        let items = self.source.fetch_wishlist_items(user_id)?;
        let average = self.average_monthly_net(user_id)?;
        let summary = WishlistSummary::build_with(
            &items,
            average,
            self.clock.today(),
            self.config.eta_days_per_month,
        )?;
        info!(user_id, items = items.len(), "built wishlist summary");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{services::ServiceError, time::FixedClock},
        errors::ForecastError,
        ledger::LedgerEntry,
        storage::InMemorySource,
        wishlist::{ItemEta, WishlistItem},
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(source: InMemorySource) -> ForecastService {
        ForecastService::new(
            Box::new(source),
            Box::new(FixedClock::new(today())),
            ForecastConfig::default(),
        )
        .expect("valid config")
    }

    #[test]
    fn average_ignores_entries_outside_window() {
        let source = InMemorySource::new().with_entries(
            1,
            vec![
                LedgerEntry::income(dec!(99999), date(2023, 6, 1)).unwrap(),
                LedgerEntry::income(dec!(5000), date(2024, 2, 1)).unwrap(),
                LedgerEntry::expense(dec!(2000), date(2024, 2, 10)).unwrap(),
                LedgerEntry::income(dec!(4000), date(2024, 3, 1)).unwrap(),
                LedgerEntry::expense(dec!(4500), date(2024, 3, 2)).unwrap(),
            ],
        );
        let svc = service(source);
        assert_eq!(svc.average_monthly_net(1).unwrap(), dec!(1250));
        assert_eq!(
            svc.balance(1).unwrap(),
            Balance {
                balance: dec!(102499),
                count: 5
            }
        );
    }

    #[test]
    fn list_entries_pages_one_category() {
        let source = InMemorySource::new().with_entries(
            1,
            vec![
                LedgerEntry::expense(dec!(30), date(2024, 3, 3))
                    .unwrap()
                    .with_category("food"),
                LedgerEntry::income(dec!(3000), date(2024, 3, 1)).unwrap(),
                LedgerEntry::expense(dec!(20), date(2024, 3, 2))
                    .unwrap()
                    .with_category("food"),
            ],
        );
        let svc = service(source);
        let query = EntryQuery::default().with_category("food").with_page(1, 5);
        let page = svc.list_entries(1, &query).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].amount, dec!(30));

        let err = svc
            .list_entries(1, &EntryQuery::default().with_page(0, 500))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Storage(crate::storage::StorageError::InvalidQuery(_))
        ));
    }

    #[test]
    fn zero_window_surfaces_validation_error() {
        let svc = service(InMemorySource::new());
        let err = svc.average_over(1, 0).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Forecast(ForecastError::EmptyWindow)
        ));
    }

    #[test]
    fn wishlist_without_income_is_unavailable() {
        let source = InMemorySource::new().with_wishlist(
            1,
            vec![WishlistItem::new(1, "Laptop", dec!(35000)).unwrap()],
        );
        let summary = service(source).wishlist_summary(1).unwrap();
        assert_eq!(summary.forecast[0].eta, ItemEta::Unavailable);
        assert_eq!(summary.overall.progress_percent, Decimal::ZERO);
    }

    #[test]
    fn goal_for_user_uses_average_as_contribution() {
        let source = InMemorySource::new().with_entries(
            1,
            vec![LedgerEntry::income(dec!(3000), date(2024, 3, 1)).unwrap()],
        );
        let months = service(source)
            .goal_forecast_for_user(1, dec!(60000), Decimal::ZERO)
            .unwrap();
        assert_eq!(months, MonthsToGoal::Months(dec!(20)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ForecastConfig {
            eta_days_per_month: 0,
            ..ForecastConfig::default()
        };
        assert!(ForecastService::new(
            Box::new(InMemorySource::new()),
            Box::new(FixedClock::new(today())),
            config,
        )
        .is_err());
    }
}
