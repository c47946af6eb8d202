//! Route handlers for the month-only summary endpoints.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    extract::ApiQuery,
    month::parse_month,
    transaction::{SearchScope, Transaction, TransactionFilter, get_transactions},
};

use super::summaries::{
    PriceRangeCount, Statistics, compute_category_counts, compute_histogram, compute_statistics,
};

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct AggregationState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AggregationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for endpoints that only filter by month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month name, e.g. "March". Required.
    pub month: Option<String>,
}

fn get_month_transactions(
    state: &AggregationState,
    query: &MonthQuery,
) -> Result<Vec<Transaction>, Error> {
    let month = parse_month(query.month.as_deref().unwrap_or_default())?;
    let filter = TransactionFilter::new(month, None, SearchScope::Listing);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(&filter, None, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions for {month}: {error}"))
}

/// Get the sale totals for a month.
pub async fn get_statistics_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    let transactions = get_month_transactions(&state, &query)?;

    Ok(Json(compute_statistics(&transactions)))
}

/// Get the price-range histogram for a month.
pub async fn get_bar_chart_data_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<[PriceRangeCount; 10]>, Error> {
    let transactions = get_month_transactions(&state, &query)?;

    Ok(Json(compute_histogram(&transactions)))
}

/// Get the number of transactions per category for a month.
pub async fn get_pie_chart_data_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<BTreeMap<String, u64>>, Error> {
    let transactions = get_month_transactions(&state, &query)?;

    Ok(Json(compute_category_counts(&transactions)))
}
