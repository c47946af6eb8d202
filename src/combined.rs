//! Composes one page of transactions with the summaries of every transaction
//! matching the same month and search.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    extract::ApiQuery,
    aggregation::{
        PriceRangeCount, Statistics, compute_category_counts, compute_histogram,
        compute_statistics,
    },
    month::parse_month,
    pagination::PageRequest,
    transaction::{
        SearchScope, Transaction, TransactionFilter, count_transactions, get_transactions,
    },
};

/// The number of transactions on each page of combined data.
pub const COMBINED_PAGE_SIZE: u64 = 10;

/// A page of transactions together with the statistics and chart data of the
/// whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The transactions on the requested page.
    pub transactions: Vec<Transaction>,
    /// Sale totals over every matching transaction.
    pub statistics: Statistics,
    /// The price histogram over every matching transaction.
    pub bar_chart_data: [PriceRangeCount; 10],
    /// The category counts over every matching transaction.
    pub pie_chart_data: BTreeMap<String, u64>,
    /// The number of matching transactions.
    pub total: u64,
}

/// Gather the page `page` of transactions sold in `month` that match
/// `search` in their title, description or category, and summarise every
/// matching transaction.
///
/// All reads go through `connection`, so hold its lock for the whole call to
/// get a consistent result.
///
/// # Errors
/// Returns [Error::InvalidPagination] if `page` is zero, or [Error::SqlError]
/// if any query fails. No partial data is returned.
pub fn compose_combined_data(
    month: Month,
    search: Option<&str>,
    page: u64,
    connection: &Connection,
) -> Result<CombinedData, Error> {
    let page = PageRequest::new(page, COMBINED_PAGE_SIZE)?;
    let filter = TransactionFilter::new(month, search, SearchScope::Combined);

    let matching = get_transactions(&filter, None, connection)?;
    let transactions = get_transactions(&filter, Some(page), connection)?;
    let total = count_transactions(&filter, connection)?;

    Ok(CombinedData {
        transactions,
        statistics: compute_statistics(&matching),
        bar_chart_data: compute_histogram(&matching),
        pie_chart_data: compute_category_counts(&matching),
        total,
    })
}

/// The state needed for the combined data endpoint.
#[derive(Debug, Clone)]
pub struct CombinedState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CombinedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the combined data endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CombinedQuery {
    /// The month name, e.g. "March". Required.
    pub month: Option<String>,
    /// Text to look for in the title, description or category.
    pub search: Option<String>,
    /// The 1-based page number, defaults to 1.
    pub page: Option<u64>,
}

/// Get a page of transactions with the statistics and chart data for a month.
pub async fn get_combined_data_endpoint(
    State(state): State<CombinedState>,
    ApiQuery(query): ApiQuery<CombinedQuery>,
) -> Result<Json<CombinedData>, Error> {
    let month = parse_month(query.month.as_deref().unwrap_or_default())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    compose_combined_data(
        month,
        query.search.as_deref(),
        query.page.unwrap_or(1),
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not compose combined data: {error}"))
    .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;
    use time::{Month, macros::datetime};

    use crate::{
        Error,
        extract::ApiQuery,
        aggregation::Statistics,
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{CombinedQuery, CombinedState, compose_combined_data, get_combined_data_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_numbered_transactions(count: u32, conn: &Connection) {
        for i in 1..=count {
            create_transaction(
                Transaction::build(
                    &format!("item #{i}"),
                    f64::from(i) * 100.0,
                    datetime!(2022-03-10 0:00 UTC),
                )
                .category(if i % 2 == 0 { "even" } else { "odd" })
                .sold(i <= 5),
                conn,
            )
            .unwrap();
        }
    }

    #[test]
    fn second_page_has_the_rest_and_summaries_cover_everything() {
        let conn = get_test_connection();
        create_numbered_transactions(15, &conn);

        let got = compose_combined_data(Month::March, None, 2, &conn)
            .expect("Could not compose combined data");

        let ids: Vec<_> = got.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, [11, 12, 13, 14, 15]);
        assert_eq!(got.total, 15);
        assert_eq!(
            got.statistics,
            Statistics {
                total_sale_amount: 12_000.0,
                total_sold_items: 5,
                total_not_sold_items: 10,
            }
        );
        assert_eq!(got.bar_chart_data.iter().map(|b| b.count).sum::<u64>(), 15);
        assert_eq!(got.pie_chart_data["odd"], 8);
        assert_eq!(got.pie_chart_data["even"], 7);
    }

    #[test]
    fn search_applies_to_every_part() {
        let conn = get_test_connection();
        create_numbered_transactions(15, &conn);
        create_transaction(
            Transaction::build("Phone", 250.0, datetime!(2022-03-12 0:00 UTC))
                .category("electronics")
                .sold(true),
            &conn,
        )
        .unwrap();

        let got = compose_combined_data(Month::March, Some("ELECTRONICS"), 1, &conn)
            .expect("Could not compose combined data");

        assert_eq!(got.total, 1);
        assert_eq!(got.transactions.len(), 1);
        assert_eq!(got.transactions[0].title, "Phone");
        assert_eq!(got.statistics.total_sale_amount, 250.0);
        assert_eq!(got.bar_chart_data[2].count, 1);
        assert_eq!(got.pie_chart_data.len(), 1);
    }

    #[test]
    fn page_past_the_end_still_has_summaries() {
        let conn = get_test_connection();
        create_numbered_transactions(3, &conn);

        let got = compose_combined_data(Month::March, None, 5, &conn)
            .expect("Could not compose combined data");

        assert!(got.transactions.is_empty());
        assert_eq!(got.total, 3);
        assert_eq!(got.statistics.total_sold_items, 3);
    }

    #[test]
    fn page_zero_is_rejected() {
        let conn = get_test_connection();

        let result = compose_combined_data(Month::March, None, 0, &conn);

        assert!(matches!(result, Err(Error::InvalidPagination(_))));
    }

    #[test]
    fn store_failure_fails_the_whole_envelope() {
        let conn = get_test_connection();
        create_numbered_transactions(3, &conn);
        conn.execute("DROP TABLE \"transaction\"", []).unwrap();

        let result = compose_combined_data(Month::March, None, 1, &conn);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error, got {result:?}"
        );
    }

    #[test]
    fn envelope_uses_camel_case_keys() {
        let conn = get_test_connection();
        create_numbered_transactions(1, &conn);

        let got = compose_combined_data(Month::March, None, 1, &conn).unwrap();
        let json = serde_json::to_value(got).unwrap();

        for key in [
            "transactions",
            "statistics",
            "barChartData",
            "pieChartData",
            "total",
        ] {
            assert!(json.get(key).is_some(), "missing key {key} in {json}");
        }
        assert_eq!(json["transactions"][0]["dateOfSale"], "2022-03-10T00:00:00Z");
    }

    #[tokio::test]
    async fn endpoint_defaults_to_first_page() {
        let conn = get_test_connection();
        create_numbered_transactions(12, &conn);
        let state = CombinedState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let Json(got) = get_combined_data_endpoint(
            State(state),
            ApiQuery(CombinedQuery {
                month: Some("march".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .expect("Could not get combined data");

        assert_eq!(got.transactions.len(), 10);
        assert_eq!(got.total, 12);
    }

    #[tokio::test]
    async fn endpoint_rejects_missing_month() {
        let state = CombinedState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let result =
            get_combined_data_endpoint(State(state), ApiQuery(CombinedQuery::default())).await;

        assert!(matches!(result, Err(Error::InvalidMonth(_))));
    }
}
