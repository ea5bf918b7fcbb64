//! Ledger entries and the monthly aggregation built on top of them.

pub mod aggregate;
pub mod entry;
pub mod period;

pub use aggregate::{
    average_monthly_net, monthly_nets, net_total, MonthlyNet, TrailingWindow,
    DEFAULT_WINDOW_MONTHS, WINDOW_DAYS_PER_MONTH,
};
pub use entry::{parse_date, EntryKind, LedgerEntry};
pub use period::YearMonth;
