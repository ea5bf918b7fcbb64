use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    duration::{duration, MonthsToGoal},
    simulate::{simulate, SimulationOutcome, WhatIf},
};
use crate::errors::{ForecastError, Result};

/// Per-request description of a savings goal. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDefinition {
    pub target_amount: Decimal,
    pub monthly_contribution: Decimal,
    #[serde(default)]
    pub current_savings: Decimal,
    /// One-time purchase deducted before simulating.
    #[serde(default)]
    pub extra_expense: Decimal,
}

impl GoalDefinition {
    pub fn new(target_amount: Decimal, monthly_contribution: Decimal) -> Self {
        Self {
            target_amount,
            monthly_contribution,
            current_savings: Decimal::ZERO,
            extra_expense: Decimal::ZERO,
        }
    }

    pub fn with_savings(mut self, current_savings: Decimal) -> Self {
        self.current_savings = current_savings;
        self
    }

    pub fn with_extra_expense(mut self, extra_expense: Decimal) -> Self {
        self.extra_expense = extra_expense;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_amount < Decimal::ZERO {
            return Err(ForecastError::NegativeTarget(self.target_amount));
        }
        if self.extra_expense < Decimal::ZERO {
            return Err(ForecastError::NegativePurchaseCost(self.extra_expense));
        }
        Ok(())
    }

    /// Months to target under the unmodified inputs.
    pub fn forecast(&self) -> Result<MonthsToGoal> {
        self.validate()?;
        duration(
            self.target_amount,
            self.monthly_contribution,
            self.current_savings,
        )
    }

    /// Simulates the goal with `extra_expense` as the purchase and the given
    /// contribution change.
    pub fn simulate(&self, contribution_delta: Decimal) -> Result<SimulationOutcome> {
        self.validate()?;
        simulate(
            self.target_amount,
            self.monthly_contribution,
            self.current_savings,
            WhatIf {
                purchase_cost: self.extra_expense,
                contribution_delta,
            },
        )
    }
}
