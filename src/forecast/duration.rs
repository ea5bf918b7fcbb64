use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};

/// Decimal places kept on reported month figures.
pub const MONTHS_PRECISION: u32 = 1;

/// Months until a goal is reached, or the unreachable sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "snake_case")]
pub enum MonthsToGoal {
    Months(Decimal),
    /// Remaining balance is positive and the contribution rate is not.
    Unreachable,
}

impl MonthsToGoal {
    pub fn months(&self) -> Option<Decimal> {
        match self {
            MonthsToGoal::Months(value) => Some(*value),
            MonthsToGoal::Unreachable => None,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, MonthsToGoal::Months(value) if value.is_zero())
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, MonthsToGoal::Unreachable)
    }
}

impl fmt::Display for MonthsToGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthsToGoal::Months(value) => write!(f, "{:.1} months", value),
            MonthsToGoal::Unreachable => f.write_str("no forecast available"),
        }
    }
}

/// Months needed to close the gap between `current_savings` and `target_amount`.
pub fn duration(
    target_amount: Decimal,
    monthly_contribution: Decimal,
    current_savings: Decimal,
) -> Result<MonthsToGoal> {
    if target_amount < Decimal::ZERO {
        return Err(ForecastError::NegativeTarget(target_amount));
    }
    let remaining = target_amount
        .checked_sub(current_savings)
        .ok_or(ForecastError::Overflow("remaining amount"))?;
    if remaining <= Decimal::ZERO {
        return Ok(MonthsToGoal::Months(Decimal::ZERO));
    }
    if monthly_contribution <= Decimal::ZERO {
        return Ok(MonthsToGoal::Unreachable);
    }
    let months = remaining
        .checked_div(monthly_contribution)
        .ok_or(ForecastError::Overflow("months to goal"))?;
    Ok(MonthsToGoal::Months(months.round_dp(MONTHS_PRECISION)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sixty_thousand_at_three_thousand_is_twenty_months() {
        let months = duration(dec!(60000), dec!(3000), Decimal::ZERO).unwrap();
        assert_eq!(months, MonthsToGoal::Months(dec!(20.0)));
    }

    #[test]
    fn met_goal_is_zero_regardless_of_contribution() {
        for contribution in [dec!(-100), Decimal::ZERO, dec!(250)] {
            assert_eq!(
                duration(dec!(1000), contribution, dec!(1000)).unwrap(),
                MonthsToGoal::Months(Decimal::ZERO)
            );
            assert_eq!(
                duration(dec!(1000), contribution, dec!(5000)).unwrap(),
                MonthsToGoal::Months(Decimal::ZERO)
            );
        }
    }

    #[test]
    fn non_positive_contribution_is_unreachable() {
        assert!(duration(dec!(1000), Decimal::ZERO, dec!(0))
            .unwrap()
            .is_unreachable());
        assert!(duration(dec!(1000), dec!(-5), dec!(900))
            .unwrap()
            .is_unreachable());
    }

    #[test]
    fn debt_extends_the_remaining_amount() {
        let months = duration(dec!(1000), dec!(100), dec!(-500)).unwrap();
        assert_eq!(months.months(), Some(dec!(15)));
    }

    #[test]
    fn result_is_rounded_once_to_one_decimal() {
        let months = duration(dec!(1000), dec!(300), Decimal::ZERO).unwrap();
        assert_eq!(months.months(), Some(dec!(3.3)));
        let months = duration(dec!(100), dec!(40), Decimal::ZERO).unwrap();
        assert_eq!(months.months(), Some(dec!(2.5)));
    }

    #[test]
    fn negative_target_is_rejected() {
        assert_eq!(
            duration(dec!(-1), dec!(10), Decimal::ZERO).unwrap_err(),
            ForecastError::NegativeTarget(dec!(-1))
        );
    }

    #[test]
    fn more_contribution_never_takes_longer() {
        let target = dec!(12345.67);
        let mut previous = None;
        for step in 1..200 {
            let contribution = Decimal::from(step) * dec!(17.5);
            let months = duration(target, contribution, dec!(345)).unwrap().months().unwrap();
            if let Some(prev) = previous {
                assert!(months <= prev, "{months} > {prev} at {contribution}");
            }
            previous = Some(months);
        }
    }

    #[test]
    fn larger_target_never_takes_less_time() {
        let mut previous = Decimal::ZERO;
        for step in 0..200 {
            let target = Decimal::from(step) * dec!(123.4);
            let months = duration(target, dec!(250), dec!(1000)).unwrap().months().unwrap();
            assert!(months >= previous, "{months} < {previous} at {target}");
            previous = months;
        }
    }

    #[test]
    fn display_renders_sentinel_as_unavailable() {
        assert_eq!(MonthsToGoal::Unreachable.to_string(), "no forecast available");
        assert_eq!(MonthsToGoal::Months(dec!(20)).to_string(), "20.0 months");
    }
}
