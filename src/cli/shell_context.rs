use std::{env, io, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    config::{ConfigError, ConfigManager, ForecastConfig},
    core::{
        services::{ForecastService, ServiceError},
        time::{Clock, FixedClock, SystemClock},
        utils::default_snapshot_file,
    },
    errors::ForecastError,
    ledger::parse_date,
    storage::{JsonSnapshotStore, StorageError, UserId},
};

use super::{commands, io as cli_io, registry::CommandRegistry};

/// Pins "today" for every command, mainly for reproducible scripts.
pub const TODAY_ENV: &str = "SAVINGS_CORE_TODAY";
/// Selects the user whose records commands operate on.
pub const USER_ENV: &str = "SAVINGS_CORE_USER";

const DEFAULT_USER: UserId = 1;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Invalid environment: {0}")]
    Environment(String),
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`. Type `help` to see available commands.")]
    UnknownCommand(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    /// Commands are read line by line from stdin.
    Script,
    /// A single command taken from process arguments.
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub registry: CommandRegistry,
    pub store: JsonSnapshotStore,
    pub config_manager: ConfigManager,
    pub config: ForecastConfig,
    pub user_id: UserId,
    pub today: Option<NaiveDate>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a context from the data directory and environment overrides.
    pub fn new() -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = JsonSnapshotStore::open(default_snapshot_file())?;
        let mut context = Self::with_parts(store, config_manager, config);

        if let Some(raw) = env::var_os(USER_ENV) {
            let raw = raw.to_string_lossy();
            context.user_id = raw
                .trim()
                .parse()
                .map_err(|_| CliError::Environment(format!("{USER_ENV}=`{raw}` is not a user id")))?;
        }
        if let Some(raw) = env::var_os(TODAY_ENV) {
            let raw = raw.to_string_lossy();
            context.today = Some(
                parse_date(raw.trim())
                    .map_err(|err| CliError::Environment(format!("{TODAY_ENV}: {err}")))?,
            );
        }
        Ok(context)
    }

    pub fn with_parts(
        store: JsonSnapshotStore,
        config_manager: ConfigManager,
        config: ForecastConfig,
    ) -> Self {
        Self {
            registry: CommandRegistry::with_entries(commands::all_definitions()),
            store,
            config_manager,
            config,
            user_id: DEFAULT_USER,
            today: None,
            last_command: None,
            running: true,
        }
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.today {
            Some(today) => Box::new(FixedClock::new(today)),
            None => Box::new(SystemClock),
        }
    }

    /// Forecast service over the current in-memory snapshot.
    pub fn service(&self) -> Result<ForecastService, CommandError> {
        Ok(ForecastService::new(
            Box::new(self.store.clone()),
            self.clock(),
            self.config.clone(),
        )?)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            return Err(CommandError::UnknownCommand(raw.to_string()));
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_info("Use `help <command>` for usage details.");
            }
            CommandError::UnknownCommand(_) => cli_io::print_warning(err),
            other => cli_io::print_error(other),
        }
    }
}

pub(crate) fn parse_decimal(label: &str, raw: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("{label} must be a number, got `{raw}`")))
}

pub(crate) fn parse_id(label: &str, raw: &str) -> Result<i64, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{label} must be an integer, got `{raw}`")))
}

/// Splits `--flag value` pairs from positional arguments.
pub(crate) fn split_flags<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(&'a str, &'a str)>), CommandError> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--") {
            if !known.contains(&name) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{arg}`"
                )));
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("option `{arg}` needs a value"))
            })?;
            flags.push((name, value));
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, flags))
}
