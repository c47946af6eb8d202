//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page that shows a month of transactions as a table and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route that replaces the stored transactions with the seed data.
pub const INITIALIZE_DATABASE: &str = "/initialize-database";
/// The route for the paginated, searchable transaction listing.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sale totals of a month.
pub const TRANSACTION_STATISTICS: &str = "/transaction-statistics";
/// The route for the price-range histogram of a month.
pub const BAR_CHART_DATA: &str = "/bar-chart-data";
/// The route for the category counts of a month.
pub const PIE_CHART_DATA: &str = "/pie-chart-data";
/// The route for the page, statistics and chart data of a month in one response.
pub const COMBINED_DATA: &str = "/combined-data";
