//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::Serialize;
use time::{Month, OffsetDateTime, UtcOffset};

use crate::{Error, pagination::PageRequest};

use super::filter::TransactionFilter;

/// Alias for the integer type used for transaction IDs in the database.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// The sale of a product, i.e. an item listed for sale and whether it sold.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// When the sale happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            date_of_sale: date_of_sale.to_offset(UtcOffset::UTC),
            sold: false,
        }
    }

    /// The calendar month of the sale in UTC.
    pub fn sale_month(&self) -> Month {
        self.date_of_sale.to_offset(UtcOffset::UTC).month()
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to an empty description, an empty category and
/// unsold. The sale date is normalised to UTC so the month used for filtering
/// does not depend on the offset the date was recorded with.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price, expected to be zero or more.
    pub price: f64,
    /// The product category.
    pub category: String,
    /// When the sale happened, in UTC.
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const INSERT_TRANSACTION: &str = "INSERT INTO \"transaction\" \
    (title, description, price, category, date_of_sale, sale_month, sold) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
    RETURNING id, title, description, price, category, date_of_sale, sold";

type InsertParams = (String, String, f64, String, OffsetDateTime, u8, bool);

fn insert_params(builder: TransactionBuilder) -> InsertParams {
    // The builder fields are public, so the date may not be in UTC yet.
    let date_of_sale = builder.date_of_sale.to_offset(UtcOffset::UTC);

    (
        builder.title,
        builder.description,
        builder.price,
        builder.category,
        date_of_sale,
        u8::from(date_of_sale.month()),
        builder.sold,
    )
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(INSERT_TRANSACTION)?
        .query_row(insert_params(builder), map_transaction_row)?;

    Ok(transaction)
}

/// Replace every stored transaction with the transactions in `builders`.
///
/// The delete and the inserts run in one database transaction, so on failure
/// the previously stored transactions are left untouched. IDs restart from 1.
///
/// Returns the number of transactions inserted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn replace_all_transactions(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<usize, Error> {
    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let transaction = connection.unchecked_transaction()?;

    transaction.execute("DELETE FROM \"transaction\"", [])?;
    transaction.execute(
        "DELETE FROM sqlite_sequence WHERE name = 'transaction'",
        [],
    )?;

    let inserted_count = builders.len();
    {
        let mut statement = transaction.prepare(INSERT_TRANSACTION)?;

        for builder in builders {
            statement.query_row(insert_params(builder), |_| Ok(()))?;
        }
    }

    transaction.commit()?;

    Ok(inserted_count)
}

/// Get the transactions matching `filter`, ordered by ID.
///
/// If `page` is given, only the records on that page are returned. Pages past
/// the last matching record are empty.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(
    filter: &TransactionFilter,
    page: Option<PageRequest>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let sql_filter = filter.to_sql();
    let mut params = sql_filter.params;

    let limit_clause = match page {
        Some(page) => {
            params.push(sql_integer(page.page_size));
            params.push(sql_integer(page.offset()));
            " LIMIT ? OFFSET ?"
        }
        None => "",
    };

    let query = format!(
        "SELECT id, title, description, price, category, date_of_sale, sold \
        FROM \"transaction\" WHERE {} ORDER BY id ASC{limit_clause}",
        sql_filter.clause
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

fn sql_integer(value: u64) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Get the number of transactions matching `filter`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let sql_filter = filter.to_sql();
    let query = format!(
        "SELECT COUNT(id) FROM \"transaction\" WHERE {}",
        sql_filter.clause
    );

    connection
        .query_row(&query, params_from_iter(sql_filter.params), |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                date_of_sale TEXT NOT NULL,
                sale_month INTEGER NOT NULL CHECK (sale_month BETWEEN 1 AND 12),
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    // Every query filters by month first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_sale_month ON \"transaction\"(sale_month);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let date_of_sale = row.get(5)?;
    let sold = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        category,
        date_of_sale,
        sold,
    })
}

// ============================================================================
// TESTS
// ============================================================================
