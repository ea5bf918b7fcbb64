use std::io::{self, BufRead};

use shell_words::split;
use tracing::debug;

use crate::cli::shell_context::{CliError, CliMode, CommandError, LoopControl, ShellContext};

/// Runs one command from process arguments, or a script from stdin when none are given.
pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = if args.is_empty() {
        CliMode::Script
    } else {
        CliMode::OneShot
    };

    let mut context = ShellContext::new()?;

    match mode {
        CliMode::OneShot => run_once(&mut context, &args),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_once(context: &mut ShellContext, args: &[String]) -> Result<(), CliError> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(());
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(args.join(" "));
    context
        .dispatch(&first.to_lowercase(), first, &rest)
        .map(|_| ())
        .map_err(CliError::from)
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = parse_command_line(trimmed)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    debug!(%command, "dispatching");
    context.last_command = Some(trimmed.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    split(input)
}
