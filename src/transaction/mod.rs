//! Product sale transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The month and search filter shared by every query
//! - Database functions for storing, replacing and querying transactions
//! - The paginated transaction listing endpoint

mod core;
mod filter;
mod transactions_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, count_transactions, create_transaction,
    create_transaction_table, get_transactions, replace_all_transactions,
};
pub use filter::{SearchScope, TransactionFilter};
pub use transactions_endpoint::{TransactionsQuery, get_transactions_endpoint};
