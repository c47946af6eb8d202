//! Replaces the stored transactions with the product sale feed.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionBuilder, replace_all_transactions},
};

/// The text sent back after the seed data is stored.
pub const SEED_SUCCESS_MESSAGE: &str = "Database initialized with seed data.";

/// One product in the seed feed.
///
/// The feed also carries an `id` and an `image` URL, which are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedRecord {
    title: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    category: String,
    #[serde(default)]
    sold: bool,
    #[serde(with = "time::serde::rfc3339")]
    date_of_sale: OffsetDateTime,
}

impl TryFrom<SeedRecord> for TransactionBuilder {
    type Error = Error;

    fn try_from(record: SeedRecord) -> Result<Self, Self::Error> {
        if record.price < 0.0 {
            return Err(Error::SeedFetchError(format!(
                "\"{}\" has a negative price {}",
                record.title, record.price
            )));
        }

        Ok(Transaction::build(&record.title, record.price, record.date_of_sale)
            .description(&record.description)
            .category(&record.category)
            .sold(record.sold))
    }
}

/// Download the seed feed at `url` and convert it to transactions.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the request fails, the server answers
/// with an error status, the body is not a JSON array of products, or a
/// product has a negative price.
pub async fn fetch_seed_data(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<TransactionBuilder>, Error> {
    let records: Vec<SeedRecord> = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetchError(error.to_string()))?
        .json()
        .await
        .map_err(|error| Error::SeedFetchError(error.to_string()))?;

    tracing::debug!("fetched {} seed records from {url}", records.len());

    records.into_iter().map(TransactionBuilder::try_from).collect()
}

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for storing transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the seed feed.
    http_client: reqwest::Client,
    /// Where to download the seed feed from.
    seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Replace every stored transaction with the seed feed.
///
/// The stored transactions are left untouched if the feed cannot be fetched.
pub async fn initialize_database_endpoint(
    State(state): State<SeedState>,
) -> Result<&'static str, Error> {
    // Fetch before locking so the lock is not held across the request.
    let builders = fetch_seed_data(&state.http_client, &state.seed_url).await?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let inserted = replace_all_transactions(builders, &connection)
        .inspect_err(|error| tracing::error!("could not store seed data: {error}"))?;

    tracing::info!("database initialized with {inserted} transactions");

    Ok(SEED_SUCCESS_MESSAGE)
}
