use uuid::Uuid;

use crate::cli::io;
use crate::cli::output::{money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{
    parse_decimal, parse_id, split_flags, CommandError, CommandResult, ShellContext,
};
use crate::ledger::LedgerEntry;
use crate::storage::EntryQuery;

const USAGE: &str = "entry <add <income|expense> <amount> <YYYY-MM-DD> [--category <name>] | list [--category <name>] [--offset <n>] [--limit <n>] | remove <id>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "entry",
            "Record, list, or remove income and expense entries",
            USAGE,
            cmd_entry,
        ),
        CommandEntry::new(
            "user",
            "Show or switch the active user",
            "user [id]",
            cmd_user,
        ),
    ]
}

fn cmd_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"add", rest)) => add_entry(context, rest),
        Some((&"list", rest)) => list_entries(context, rest),
        Some((&"remove", [raw])) => {
            let id = Uuid::parse_str(raw).map_err(|_| {
                CommandError::InvalidArguments(format!("`{raw}` is not an entry id"))
            })?;
            if !context.store.remove_entry(context.user_id, id)? {
                return Err(CommandError::InvalidArguments(format!("entry {id} not found")));
            }
            io::print_success(format!("Removed entry {id}."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
}

fn add_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(args, &["category"])?;
    let [kind, amount, date] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    };
    let amount = parse_decimal("amount", amount)?;
    let mut entry = LedgerEntry::parse(kind, amount, date)?;
    if let Some((_, category)) = flags.last() {
        entry = entry.with_category(*category);
    }
    let id = entry.id;
    context.store.add_entry(context.user_id, entry)?;
    io::print_success(format!("Recorded {kind} of {} ({id}).", money(amount)));
    Ok(())
}

fn list_entries(context: &ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(args, &["category", "offset", "limit"])?;
    if !positional.is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    }
    let mut query = EntryQuery::default();
    for (flag, value) in flags {
        match flag {
            "category" => query = query.with_category(value),
            "offset" => query.offset = parse_count("offset", value)?,
            _ => query.limit = parse_count("limit", value)?,
        }
    }

    let entries = context.service()?.list_entries(context.user_id, &query)?;
    if entries.is_empty() {
        io::print_warning("No entries recorded.");
        return Ok(());
    }
    output_section(format!("Entries for user {}", context.user_id));
    for entry in entries {
        io::print_info(format!(
            "  {}  {:<8} {:>12}  {:<12} {}",
            entry.occurred_on,
            entry.kind.to_string(),
            money(entry.amount),
            entry.category.as_deref().unwrap_or("-"),
            entry.id
        ));
    }
    Ok(())
}

fn parse_count(label: &str, raw: &str) -> Result<usize, CommandError> {
    raw.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "{label} must be a non-negative integer, got `{raw}`"
        ))
    })
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            io::print_info(format!("Active user: {}", context.user_id));
            Ok(())
        }
        [raw] => {
            context.user_id = parse_id("user id", raw)?;
            io::print_success(format!("Switched to user {}.", context.user_id));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments("usage: user [id]".into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::shell_context::{test_support, CommandError};
    use crate::core::services::ServiceError;
    use crate::errors::ForecastError;
    use crate::storage::{EntrySource, JsonSnapshotStore, StorageError};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn entry_add_persists_to_snapshot() {
        let (_dir, mut context) = test_support::context(today());
        context
            .process_line("entry add income 5000 2024-02-01")
            .unwrap();
        context
            .process_line("entry add expense 2000 2024-02-10")
            .unwrap();

        let reopened = JsonSnapshotStore::open(context.store.path()).unwrap();
        let entries = reopened.fetch_all_entries(1).unwrap();
        assert_eq!(entries.len(), 2);
        let balance = context.service().unwrap().balance(1).unwrap();
        assert_eq!(balance.balance, dec!(3000));
        assert_eq!(balance.count, 2);
    }

    #[test]
    fn entry_add_records_category() {
        let (_dir, mut context) = test_support::context(today());
        context
            .process_line("entry add expense 40 2024-03-02 --category groceries")
            .unwrap();
        context
            .process_line("entry add expense 15 2024-03-03")
            .unwrap();

        let entries = context.store.fetch_all_entries(1).unwrap();
        assert_eq!(entries[0].category.as_deref(), Some("groceries"));
        assert_eq!(entries[1].category, None);
    }

    #[test]
    fn entry_list_accepts_filter_and_page_flags() {
        let (_dir, mut context) = test_support::context(today());
        context
            .process_line("entry add income 100 2024-03-01 --category salary")
            .unwrap();
        assert!(context.process_line("entry list").is_ok());
        assert!(context
            .process_line("entry list --category salary --offset 0 --limit 100")
            .is_ok());
        assert!(context.process_line("entry list --offset 5").is_ok());
        assert!(matches!(
            context.process_line("entry list --limit 101"),
            Err(CommandError::Service(ServiceError::Storage(
                StorageError::InvalidQuery(_)
            )))
        ));
        assert!(context.process_line("entry list --limit -1").is_err());
        assert!(context.process_line("entry list extra").is_err());
    }

    #[test]
    fn failed_save_discards_the_change() {
        let (_dir, mut context) = test_support::context(today());
        std::fs::create_dir(context.store.path()).unwrap();
        std::fs::write(context.store.path().join("blocker"), "x").unwrap();

        assert!(matches!(
            context.process_line("entry add income 5000 2024-03-01"),
            Err(CommandError::Storage(StorageError::Io(_)))
        ));
        assert!(context.store.fetch_all_entries(1).unwrap().is_empty());
        assert_eq!(
            context.service().unwrap().average_monthly_net(1).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn entry_remove_unknown_id_is_reported() {
        let (_dir, mut context) = test_support::context(today());
        let err = context
            .process_line("entry remove 67e55044-10b1-426f-9247-bb680e5fe0c8")
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(context.process_line("entry remove nope").is_err());
    }

    #[test]
    fn entry_add_validates_input() {
        let (_dir, mut context) = test_support::context(today());
        assert!(matches!(
            context.process_line("entry add gift 10 2024-02-01"),
            Err(CommandError::Forecast(ForecastError::InvalidKind(_)))
        ));
        assert!(matches!(
            context.process_line("entry add income 10 02/01/2024"),
            Err(CommandError::Forecast(ForecastError::MalformedDate(_)))
        ));
        assert!(matches!(
            context.process_line("entry add income -10 2024-02-01"),
            Err(CommandError::Forecast(ForecastError::NegativeAmount(_)))
        ));
    }

    #[test]
    fn user_switch_scopes_entries() {
        let (_dir, mut context) = test_support::context(today());
        context
            .process_line("entry add income 100 2024-03-01")
            .unwrap();
        context.process_line("user 2").unwrap();
        assert_eq!(context.user_id, 2);
        assert!(context.store.fetch_all_entries(2).unwrap().is_empty());
        assert!(context.process_line("user two").is_err());
    }
}
