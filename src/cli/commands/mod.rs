pub mod forecast;
pub mod ledger;
pub mod system;
pub mod wishlist;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(forecast::definitions());
    commands.extend(ledger::definitions());
    commands.extend(wishlist::definitions());
    commands
}
