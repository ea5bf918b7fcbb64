use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::storage::SNAPSHOT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "config",
            "Show or change forecasting settings",
            "config [show | set <window_months|window_days_per_month|eta_days_per_month> <value>]",
            cmd_config,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Savings Core {}", meta.version));
    io::print_field("Snapshot ver", format!("v{}", SNAPSHOT_SCHEMA_VERSION));
    io::print_field("Build hash", format!("{} ({})", meta.git_hash, meta.git_status));
    io::print_field("Built at", meta.timestamp);
    io::print_field("Target", meta.target);
    io::print_field("Profile", meta.profile);
    io::print_field("Rustc", meta.rustc);
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        help::print_command(entry);
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output_section("Configuration");
            let config = &context.config;
            io::print_field("window_months", config.window_months);
            io::print_field("window_days", config.window_days_per_month);
            io::print_field("eta_days", config.eta_days_per_month);
            io::print_field("file", context.config_manager.path().display());
            Ok(())
        }
        ["set", key, value] => {
            let mut updated = context.config.clone();
            match *key {
                "window_months" => updated.window_months = parse_count(key, value)?,
                "window_days_per_month" => updated.window_days_per_month = parse_count(key, value)?,
                "eta_days_per_month" => updated.eta_days_per_month = parse_count(key, value)?,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown setting `{other}`"
                    )))
                }
            }
            context.config_manager.save(&updated)?;
            context.config = updated;
            io::print_success(format!("Set {key} = {value}."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show | set <key> <value>]".into(),
        )),
    }
}

fn parse_count(key: &str, raw: &str) -> Result<u32, CommandError> {
    raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("{key} must be a non-negative integer, got `{raw}`"))
    })
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
