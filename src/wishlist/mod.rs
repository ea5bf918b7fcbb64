//! Wishlist items and their purchase-date projection.

pub mod item;
pub mod projection;

pub use item::{WishlistItem, WishlistPatch};
pub use projection::{
    ordered, progress_percent, project_items, wishlist_forecast, ItemEta, ItemForecast,
    WishlistOverall, WishlistSummary, ETA_DAYS_PER_MONTH,
};
