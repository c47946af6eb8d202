//! Dashboard module
//!
//! Provides a page showing one month of transactions as statistics cards, a
//! searchable, paginated table and charts of the price ranges and categories.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::{DashboardQuery, get_dashboard_page};
