//! Defines the route handler for the paginated transaction listing.
use std::sync::{Arc, Mutex};

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
    pagination::{PageRequest, PaginationConfig},
};

use super::{
    core::{Transaction, get_transactions},
    filter::{SearchScope, TransactionFilter},
};

/// The state needed for the transaction listing.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the transaction listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// The month name, e.g. "March". Required.
    pub month: Option<String>,
    /// Text to look for in the title or description, or an exact price.
    pub search: Option<String>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub per_page: Option<u64>,
}

/// Get one page of the transactions sold in a month, optionally narrowed
/// down by a search.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    ApiQuery(query): ApiQuery<TransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let month = parse_month(query.month.as_deref().unwrap_or_default())?;
    let page = PageRequest::with_defaults(query.page, query.per_page, &state.pagination_config)?;
    let filter = TransactionFilter::new(month, query.search.as_deref(), SearchScope::Listing);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&filter, Some(page), &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        extract::ApiQuery,
        db::initialize,
        pagination::PaginationConfig,
        transaction::{Transaction, create_transaction},
    };

    use super::{TransactionsQuery, TransactionsState, get_transactions_endpoint};

    fn get_test_state() -> TransactionsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
        }
    }

    fn january_query() -> TransactionsQuery {
        TransactionsQuery {
            month: Some("January".to_owned()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn returns_second_page() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            for i in 1..=15 {
                create_transaction(
                    Transaction::build(&format!("item #{i}"), 10.0, datetime!(2022-01-10 0:00 UTC)),
                    &conn,
                )
                .unwrap();
            }
        }

        let Json(transactions) = get_transactions_endpoint(
            State(state),
            ApiQuery(TransactionsQuery {
                page: Some(2),
                per_page: Some(10),
                ..january_query()
            }),
        )
        .await
        .expect("Could not get transactions");

        let ids: Vec<_> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, [11, 12, 13, 14, 15]);
    }

    #[tokio::test]
    async fn defaults_to_first_page_of_ten() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            for i in 1..=12 {
                create_transaction(
                    Transaction::build(&format!("item #{i}"), 10.0, datetime!(2022-01-10 0:00 UTC)),
                    &conn,
                )
                .unwrap();
            }
        }

        let Json(transactions) = get_transactions_endpoint(State(state), ApiQuery(january_query()))
            .await
            .expect("Could not get transactions");

        assert_eq!(transactions.len(), 10);
        assert_eq!(transactions[0].id, 1);
    }

    #[tokio::test]
    async fn search_matches_title_ignoring_case() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build("Phone", 300.0, datetime!(2022-01-10 0:00 UTC)),
                &conn,
            )
            .unwrap();
            create_transaction(
                Transaction::build("Laptop", 900.0, datetime!(2022-01-11 0:00 UTC)),
                &conn,
            )
            .unwrap();
        }

        let Json(transactions) = get_transactions_endpoint(
            State(state),
            ApiQuery(TransactionsQuery {
                search: Some("phone".to_owned()),
                ..january_query()
            }),
        )
        .await
        .expect("Could not get transactions");

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "Phone");
    }

    #[tokio::test]
    async fn rejects_unknown_month() {
        let result = get_transactions_endpoint(
            State(get_test_state()),
            ApiQuery(TransactionsQuery {
                month: Some("Smarch".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(result.err(), Some(Error::InvalidMonth("Smarch".to_owned())));
    }

    #[tokio::test]
    async fn rejects_missing_month() {
        let result = get_transactions_endpoint(
            State(get_test_state()),
            ApiQuery(TransactionsQuery::default()),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidMonth(_))));
    }

    #[tokio::test]
    async fn rejects_page_zero() {
        let result = get_transactions_endpoint(
            State(get_test_state()),
            ApiQuery(TransactionsQuery {
                page: Some(0),
                ..january_query()
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidPagination(_))));
    }
}
