//! Transaction dashboard is a small web app for exploring product sale
//! transactions by month.
//!
//! This library provides a JSON API with monthly statistics, a price-range
//! histogram, category counts and a paginated, searchable transaction list,
//! plus a server-rendered dashboard page that draws them as a table and charts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod aggregation;
mod app_state;
mod combined;
mod dashboard;
mod db;
mod endpoints;
mod extract;
mod html;
mod logging;
mod month;
mod pagination;
mod routing;
mod seed;
mod transaction;

pub use aggregation::{
    PriceRangeCount, Statistics, compute_category_counts, compute_histogram, compute_statistics,
};
pub use app_state::{AppState, DEFAULT_SEED_URL};
pub use combined::{CombinedData, compose_combined_data};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::parse_month;
pub use pagination::{PageRequest, PaginationConfig};
pub use routing::build_router;
pub use transaction::{
    SearchScope, Transaction, TransactionBuilder, TransactionFilter, count_transactions,
    create_transaction, get_transactions, replace_all_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month in a request was missing or is not the name of a month.
    ///
    /// Month names may be given in full ("January") or as a three letter
    /// abbreviation ("jan"), in any case.
    #[error("\"{0}\" is not a valid month name")]
    InvalidMonth(String),

    /// The query string could not be parsed, e.g. `page=abc`.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A page number or page size of zero was requested.
    ///
    /// Pages are numbered from one and must hold at least one record.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// The seed data could not be downloaded or decoded.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not fetch seed data: {0}")]
    SeedFetchError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        Error::SqlError(error)
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidMonth(_) | Error::InvalidQuery(_) | Error::InvalidPagination(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SeedFetchError(_) => StatusCode::BAD_GATEWAY,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Error::InvalidMonth(_)
            | Error::InvalidQuery(_)
            | Error::InvalidPagination(_)
            | Error::NotFound => self.to_string(),
            Error::SeedFetchError(_) => {
                tracing::error!("{self}");
                "Error initializing database: the seed data could not be fetched.".to_owned()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
