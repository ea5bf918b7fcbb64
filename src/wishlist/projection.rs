//! ETA projection for wishlist items from the average monthly net.

use chrono::{Days, NaiveDate};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::item::WishlistItem;
use crate::{
    errors::{ForecastError, Result},
    forecast::MONTHS_PRECISION,
};

/// Days counted per month when turning a month estimate into a date.
pub const ETA_DAYS_PER_MONTH: u32 = 30;

const MONEY_PRECISION: u32 = 2;
const PERCENT_PRECISION: u32 = 1;

/// Projected arrival of a single wishlist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemEta {
    /// Already purchased.
    Reached { date: NaiveDate },
    Projected { months: Decimal, eta: NaiveDate },
    /// Average net is zero, so no projection can be made.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemForecast {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub eta: ItemEta,
}

impl ItemForecast {
    pub fn months_to_goal(&self) -> Option<Decimal> {
        match self.eta {
            ItemEta::Reached { .. } => Some(Decimal::ZERO),
            ItemEta::Projected { months, .. } => Some(months),
            ItemEta::Unavailable => None,
        }
    }

    pub fn eta_date(&self) -> Option<NaiveDate> {
        match self.eta {
            ItemEta::Reached { date } => Some(date),
            ItemEta::Projected { eta, .. } => Some(eta),
            ItemEta::Unavailable => None,
        }
    }
}

/// Sorts items in display order: unbought first, then priority, then id.
pub fn ordered(items: &[WishlistItem]) -> Vec<WishlistItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(WishlistItem::display_order);
    sorted
}

/// Projects every item independently against `avg_net`.
pub fn wishlist_forecast(
    items: &[WishlistItem],
    avg_net: Decimal,
    today: NaiveDate,
) -> Result<Vec<ItemForecast>> {
    project_items(items, avg_net, today, ETA_DAYS_PER_MONTH)
}

/// Same as [`wishlist_forecast`] with a configurable month length for ETAs.
pub fn project_items(
    items: &[WishlistItem],
    avg_net: Decimal,
    today: NaiveDate,
    days_per_month: u32,
) -> Result<Vec<ItemForecast>> {
    if days_per_month == 0 {
        return Err(ForecastError::Validation(
            "ETA month length must be at least one day".into(),
        ));
    }
    if avg_net <= Decimal::ZERO {
        warn!("average monthly net is zero, wishlist ETAs unavailable");
    }
    ordered(items)
        .into_iter()
        .map(|item| {
            item.validate()?;
            let eta = project_item(&item, avg_net, today, days_per_month)?;
            Ok(ItemForecast {
                id: item.id,
                name: item.name,
                price: item.price,
                eta,
            })
        })
        .collect()
}

fn project_item(
    item: &WishlistItem,
    avg_net: Decimal,
    today: NaiveDate,
    days_per_month: u32,
) -> Result<ItemEta> {
    if item.is_bought {
        return Ok(ItemEta::Reached { date: today });
    }
    if avg_net <= Decimal::ZERO {
        return Ok(ItemEta::Unavailable);
    }
    let months = item
        .price
        .checked_div(avg_net)
        .ok_or(ForecastError::Overflow("wishlist months"))?;
    // price * days / avg_net keeps whole-day results exact before flooring
    let days = item
        .price
        .checked_mul(Decimal::from(days_per_month))
        .and_then(|scaled| scaled.checked_div(avg_net))
        .and_then(|days| days.floor().to_u64())
        .ok_or(ForecastError::Overflow("wishlist ETA days"))?;
    let eta = today
        .checked_add_days(Days::new(days))
        .ok_or(ForecastError::Overflow("wishlist ETA date"))?;
    Ok(ItemEta::Projected {
        months: months.round_dp(MONTHS_PRECISION),
        eta,
    })
}

/// Share of the wishlist value already bought, as a percentage.
///
/// Exactly zero when the wishlist is empty or worth nothing.
pub fn progress_percent(items: &[WishlistItem]) -> Result<Decimal> {
    let (total, completed) = totals(items)?;
    percent_of(completed, total)
}

fn percent_of(completed: Decimal, total: Decimal) -> Result<Decimal> {
    if total <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    completed
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or(ForecastError::Overflow("wishlist progress"))
}

fn totals(items: &[WishlistItem]) -> Result<(Decimal, Decimal)> {
    items
        .iter()
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(total, completed), item| {
            let total = total
                .checked_add(item.price)
                .ok_or(ForecastError::Overflow("wishlist total"))?;
            let completed = if item.is_bought {
                completed
                    .checked_add(item.price)
                    .ok_or(ForecastError::Overflow("wishlist completed"))?
            } else {
                completed
            };
            Ok((total, completed))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistOverall {
    pub total: Decimal,
    pub completed: Decimal,
    pub progress_percent: Decimal,
    pub avg_monthly_net: Decimal,
}

/// Everything a wishlist page needs: totals, ordered items, and per-item ETAs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistSummary {
    pub overall: WishlistOverall,
    pub items: Vec<WishlistItem>,
    pub forecast: Vec<ItemForecast>,
}

impl WishlistSummary {
    pub fn build(items: &[WishlistItem], avg_net: Decimal, today: NaiveDate) -> Result<Self> {
        Self::build_with(items, avg_net, today, ETA_DAYS_PER_MONTH)
    }

    pub fn build_with(
        items: &[WishlistItem],
        avg_net: Decimal,
        today: NaiveDate,
        days_per_month: u32,
    ) -> Result<Self> {
        let forecast = project_items(items, avg_net, today, days_per_month)?;
        let (total, completed) = totals(items)?;
        let progress = percent_of(completed, total)?;
        Ok(Self {
            overall: WishlistOverall {
                total: total.round_dp(MONEY_PRECISION),
                completed: completed.round_dp(MONEY_PRECISION),
                progress_percent: progress.round_dp(PERCENT_PRECISION),
                avg_monthly_net: avg_net.round_dp(MONEY_PRECISION),
            },
            items: ordered(items),
            forecast,
        })
    }
}
