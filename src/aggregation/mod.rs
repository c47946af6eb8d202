//! Summaries of a filtered set of transactions.
//!
//! The summaries are pure functions over transactions that have already been
//! filtered, so the same set can feed the statistics, the price histogram and
//! the category counts of one response.

mod handlers;
mod summaries;

pub use handlers::{
    MonthQuery, get_bar_chart_data_endpoint, get_pie_chart_data_endpoint,
    get_statistics_endpoint,
};
pub use summaries::{
    PRICE_RANGE_LABELS, PriceRangeCount, Statistics, compute_category_counts,
    compute_histogram, compute_statistics,
};
