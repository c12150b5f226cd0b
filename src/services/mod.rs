//! External collaborators: the matching service and its indicator catalog.

pub mod screener;

pub use screener::{load_catalog, HttpScreenerClient, ScreenerApi};
