//! CLI command handlers for wishlist items and their projected arrival.

use crate::cli::io;
use crate::cli::output::{money, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{
    parse_decimal, parse_id, split_flags, CommandError, CommandResult, ShellContext,
};
use crate::wishlist::{ItemEta, WishlistItem, WishlistPatch};

const USAGE: &str = "wishlist [summary | add <name> <price> [priority] | update <id> [--name <name>] [--price <price>] [--priority <n>] | toggle <id> | remove <id>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "wishlist",
        "Manage wishlist items and show projected purchase dates",
        USAGE,
        cmd_wishlist,
    )]
}

fn cmd_wishlist(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return show_summary(context);
    };
    match action.to_ascii_lowercase().as_str() {
        "summary" | "show" => show_summary(context),
        "add" => add_item(context, rest),
        "update" => update_item(context, rest),
        "toggle" => toggle_item(context, rest),
        "remove" | "rm" => remove_item(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown wishlist subcommand `{other}`. Available: summary, add, update, toggle, remove"
        ))),
    }
}

fn show_summary(context: &ShellContext) -> CommandResult {
    let summary = context.service()?.wishlist_summary(context.user_id)?;
    if summary.items.is_empty() {
        io::print_warning("Wishlist is empty.");
        return Ok(());
    }

    output_section("Wishlist");
    let overall = &summary.overall;
    io::print_field("Total", money(overall.total));
    io::print_field("Completed", money(overall.completed));
    io::print_field("Progress", format!("{}%", overall.progress_percent));
    io::print_field("Avg net", money(overall.avg_monthly_net));

    for forecast in &summary.forecast {
        let eta = match forecast.eta {
            ItemEta::Reached { .. } => "bought".to_string(),
            ItemEta::Projected { months, eta } => format!("{:.1} months, ETA {}", months, eta),
            ItemEta::Unavailable => "no forecast available".to_string(),
        };
        io::print_info(format!(
            "  #{:<4} {:<24} {:>12}  {}",
            forecast.id,
            forecast.name,
            money(forecast.price),
            eta
        ));
    }
    Ok(())
}

fn add_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, price, priority) = match args {
        [name, price] => (name, price, None),
        [name, price, priority] => (name, price, Some(priority)),
        _ => return Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    };
    let id = context.store.next_item_id(context.user_id);
    let mut item = WishlistItem::new(id, *name, parse_decimal("price", price)?)?;
    if let Some(priority) = priority {
        item = item.with_priority(parse_priority(priority)?)?;
    }
    let name = item.name.clone();
    context.store.add_wishlist_item(context.user_id, item)?;
    io::print_success(format!("Added wishlist item #{id} `{name}`."));
    Ok(())
}

fn update_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(args, &["name", "price", "priority"])?;
    let [raw_id] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    };
    let id = parse_id("item id", raw_id)?;

    let mut patch = WishlistPatch::default();
    for (flag, value) in flags {
        match flag {
            "name" => patch.name = Some(value.to_string()),
            "price" => patch.price = Some(parse_decimal("price", value)?),
            _ => patch.priority = Some(parse_priority(value)?),
        }
    }
    if !patch.has_effect() {
        return Err(CommandError::InvalidArguments(
            "nothing to update; pass --name, --price, or --priority".into(),
        ));
    }

    match context.store.update_wishlist_item(context.user_id, id, &patch)? {
        Some(item) => {
            io::print_success(format!("Updated wishlist item #{} `{}`.", item.id, item.name));
            Ok(())
        }
        None => Err(not_found(id)),
    }
}

fn toggle_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = single_id(args)?;
    let bought = context
        .store
        .toggle_wishlist_item(context.user_id, id)?
        .ok_or_else(|| not_found(id))?;
    let state = if bought { "bought" } else { "not bought" };
    io::print_success(format!("Marked wishlist item #{id} as {state}."));
    Ok(())
}

fn remove_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = single_id(args)?;
    if !context.store.remove_wishlist_item(context.user_id, id)? {
        return Err(not_found(id));
    }
    io::print_success(format!("Removed wishlist item #{id}."));
    Ok(())
}

fn single_id(args: &[&str]) -> Result<i64, CommandError> {
    match args {
        [raw] => parse_id("item id", raw),
        _ => Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
}

fn parse_priority(raw: &str) -> Result<u32, CommandError> {
    raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("priority must be a positive integer, got `{raw}`"))
    })
}

fn not_found(id: i64) -> CommandError {
    CommandError::InvalidArguments(format!("wishlist item #{id} not found"))
}
