//! What-if scenarios: rerun the duration forecast with perturbed inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::duration::{duration, MonthsToGoal, MONTHS_PRECISION};
use crate::errors::{ForecastError, Result};

/// Perturbation applied on top of a goal's current inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatIf {
    /// One-time expense deducted from current savings.
    #[serde(default)]
    pub purchase_cost: Decimal,
    /// Signed change to the monthly contribution.
    #[serde(default)]
    pub contribution_delta: Decimal,
}

impl WhatIf {
    pub fn purchase(cost: Decimal) -> Self {
        Self {
            purchase_cost: cost,
            ..Self::default()
        }
    }

    pub fn contribution_change(delta: Decimal) -> Self {
        Self {
            contribution_delta: delta,
            ..Self::default()
        }
    }
}

/// Difference between the simulated and current forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "snake_case")]
pub enum Impact {
    Months(Decimal),
    /// One side of the comparison is unreachable, so no arithmetic difference exists.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Delayed,
    Earlier,
    Unchanged,
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub current_months: MonthsToGoal,
    pub new_months: MonthsToGoal,
    pub new_contribution: Decimal,
    pub new_savings: Decimal,
    pub impact_months: Impact,
    pub verdict: Verdict,
    pub message: String,
}

/// Compares the forecast under current inputs with the forecast under `what_if`.
///
/// Both sides are computed from scratch, so goal-met and unreachable handling
/// applies identically to the modified scenario.
pub fn simulate(
    target_amount: Decimal,
    monthly_contribution: Decimal,
    current_savings: Decimal,
    what_if: WhatIf,
) -> Result<SimulationOutcome> {
    if what_if.purchase_cost < Decimal::ZERO {
        return Err(ForecastError::NegativePurchaseCost(what_if.purchase_cost));
    }
    let current_months = duration(target_amount, monthly_contribution, current_savings)?;

    let new_contribution = monthly_contribution
        .checked_add(what_if.contribution_delta)
        .ok_or(ForecastError::Overflow("new contribution"))?;
    let new_savings = current_savings
        .checked_sub(what_if.purchase_cost)
        .ok_or(ForecastError::Overflow("new savings"))?;
    let new_months = duration(target_amount, new_contribution, new_savings)?;

    let impact_months = match (current_months, new_months) {
        (MonthsToGoal::Months(current), MonthsToGoal::Months(new)) => {
            Impact::Months((new - current).round_dp(MONTHS_PRECISION))
        }
        _ => Impact::Undefined,
    };
    let verdict = verdict_for(impact_months);
    let message = describe(verdict, impact_months, current_months, new_months);

    Ok(SimulationOutcome {
        current_months,
        new_months,
        new_contribution,
        new_savings,
        impact_months,
        verdict,
        message,
    })
}

fn verdict_for(impact: Impact) -> Verdict {
    match impact {
        Impact::Months(months) if months > Decimal::ZERO => Verdict::Delayed,
        Impact::Months(months) if months < Decimal::ZERO => Verdict::Earlier,
        Impact::Months(_) => Verdict::Unchanged,
        Impact::Undefined => Verdict::Undefined,
    }
}

fn describe(
    verdict: Verdict,
    impact: Impact,
    current: MonthsToGoal,
    new: MonthsToGoal,
) -> String {
    let magnitude = match impact {
        Impact::Months(months) => months.abs(),
        Impact::Undefined => Decimal::ZERO,
    };
    match verdict {
        Verdict::Delayed => format!("Goal delayed by {:.1} months", magnitude),
        Verdict::Earlier => format!("Goal reached {:.1} months earlier", magnitude),
        Verdict::Unchanged => "No change: goal reached 0.0 months earlier".to_string(),
        Verdict::Undefined => match (current, new) {
            (MonthsToGoal::Unreachable, MonthsToGoal::Months(months)) => {
                format!("Goal becomes reachable in {:.1} months", months)
            }
            (MonthsToGoal::Months(_), MonthsToGoal::Unreachable) => {
                "No forecast available: goal becomes unreachable at the new contribution"
                    .to_string()
            }
            _ => "No forecast available: goal is unreachable at either contribution".to_string(),
        },
    }
}
