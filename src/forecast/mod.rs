//! Goal forecasting: months-to-target and what-if simulation.

pub mod duration;
pub mod goal;
pub mod simulate;

pub use duration::{duration, MonthsToGoal, MONTHS_PRECISION};
pub use goal::GoalDefinition;
pub use simulate::{simulate, Impact, SimulationOutcome, Verdict, WhatIf};
