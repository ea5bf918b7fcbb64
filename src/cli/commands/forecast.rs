//! CLI command handlers for goal forecasts and ledger aggregates.

use rust_decimal::Decimal;

use crate::cli::io;
use crate::cli::output::{money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{
    parse_decimal, split_flags, CommandError, CommandResult, ShellContext,
};
use crate::forecast::{GoalDefinition, Impact, MonthsToGoal, Verdict};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "duration",
            "Months needed to reach a savings target",
            "duration <target> <monthly_contribution> [current_savings]",
            cmd_duration,
        ),
        CommandEntry::new(
            "simulate",
            "Compare a goal forecast against a what-if scenario",
            "simulate <target> <monthly_contribution> [current_savings] [--purchase <cost>] [--delta <change>]",
            cmd_simulate,
        ),
        CommandEntry::new(
            "goal",
            "Forecast a target funded by your average monthly net",
            "goal <target> [current_savings]",
            cmd_goal,
        ),
        CommandEntry::new(
            "average",
            "Average monthly net over the trailing window",
            "average [months]",
            cmd_average,
        ),
        CommandEntry::new(
            "balance",
            "Income minus expenses across all entries",
            "balance",
            cmd_balance,
        ),
    ]
}

fn goal_from(positional: &[&str], usage: &str) -> Result<GoalDefinition, CommandError> {
    let (target, contribution, savings) = match positional {
        [target, contribution] => (target, contribution, None),
        [target, contribution, savings] => (target, contribution, Some(savings)),
        _ => return Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    };
    let mut goal = GoalDefinition::new(
        parse_decimal("target", target)?,
        parse_decimal("monthly contribution", contribution)?,
    );
    if let Some(savings) = savings {
        goal = goal.with_savings(parse_decimal("current savings", savings)?);
    }
    Ok(goal)
}

fn print_months(label: &str, months: MonthsToGoal) {
    match months {
        MonthsToGoal::Unreachable => io::print_warning(format!("{label}: {months}")),
        _ => io::print_field(label, months),
    }
}

fn cmd_duration(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let goal = goal_from(
        args,
        "duration <target> <monthly_contribution> [current_savings]",
    )?;
    let months = context.service()?.goal_forecast(&goal)?;
    output_section("Goal forecast");
    print_months("Months to goal", months);
    if months.is_reached() {
        io::print_success("Goal already reached.");
    }
    Ok(())
}

fn cmd_simulate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(args, &["purchase", "delta"])?;
    let mut goal = goal_from(
        &positional,
        "simulate <target> <monthly_contribution> [current_savings] [--purchase <cost>] [--delta <change>]",
    )?;
    let mut delta = Decimal::ZERO;
    for (name, value) in flags {
        match name {
            "purchase" => goal = goal.with_extra_expense(parse_decimal("purchase", value)?),
            _ => delta = parse_decimal("delta", value)?,
        }
    }

    let outcome = context.service()?.goal_simulation(&goal, delta)?;
    output_section("What-if simulation");
    print_months("Current", outcome.current_months);
    print_months("Simulated", outcome.new_months);
    io::print_field("Contribution", money(outcome.new_contribution));
    io::print_field("Savings", money(outcome.new_savings));
    if let Impact::Months(months) = outcome.impact_months {
        io::print_field("Impact", format!("{:+.1} months", months));
    }
    match outcome.verdict {
        Verdict::Earlier | Verdict::Unchanged => io::print_success(&outcome.message),
        Verdict::Delayed | Verdict::Undefined => io::print_warning(&outcome.message),
    }
    Ok(())
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (target, savings) = match args {
        [target] => (parse_decimal("target", target)?, Decimal::ZERO),
        [target, savings] => (
            parse_decimal("target", target)?,
            parse_decimal("current savings", savings)?,
        ),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: goal <target> [current_savings]".into(),
            ))
        }
    };
    let service = context.service()?;
    let average = service.average_monthly_net(context.user_id)?;
    let months = service.goal_forecast_for_user(context.user_id, target, savings)?;
    output_section("Goal forecast");
    io::print_field("Avg net", money(average));
    print_months("Months to goal", months);
    Ok(())
}

fn cmd_average(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window_months = match args {
        [] => context.config.window_months,
        [months] => months.parse().map_err(|_| {
            CommandError::InvalidArguments(format!(
                "months must be a non-negative integer, got `{months}`"
            ))
        })?,
        _ => return Err(CommandError::InvalidArguments("usage: average [months]".into())),
    };
    let average = context
        .service()?
        .average_over(context.user_id, window_months)?;
    io::print_info(format!(
        "Average monthly net ({} months): {}",
        window_months,
        money(average)
    ));
    if average.is_zero() {
        io::print_warning("No positive monthly net in the window; forecasts are unavailable.");
    }
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let balance = context.service()?.balance(context.user_id)?;
    io::print_info(format!(
        "Balance: {} ({} entries)",
        money(balance.balance),
        balance.count
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell_context::test_support;
    use crate::core::services::ServiceError;
    use crate::errors::ForecastError;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn goal_from_reads_optional_savings() {
        let goal = goal_from(&["60000", "3000", "9000"], "usage").unwrap();
        assert_eq!(goal.current_savings, dec!(9000));
        let goal = goal_from(&["60000", "3000"], "usage").unwrap();
        assert_eq!(goal.current_savings, Decimal::ZERO);
        assert!(goal_from(&["60000"], "usage").is_err());
    }

    #[test]
    fn negative_target_is_reported_as_forecast_error() {
        let (_dir, mut context) = test_support::context(today());
        let err = context.process_line("duration -1 100").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Service(ServiceError::Forecast(ForecastError::NegativeTarget(_)))
        ));
    }

    #[test]
    fn simulate_accepts_flags_in_any_position() {
        let (_dir, mut context) = test_support::context(today());
        assert!(context
            .process_line("simulate --purchase 9000 60000 3000 9000 --delta 0")
            .is_ok());
        assert!(context
            .process_line("simulate 60000 3000 --purchase -5")
            .is_err());
    }

    #[test]
    fn average_rejects_zero_window() {
        let (_dir, mut context) = test_support::context(today());
        let err = context.process_line("average 0").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Service(ServiceError::Forecast(ForecastError::EmptyWindow))
        ));
    }
}
