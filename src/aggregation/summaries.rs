//! The statistics, price histogram and category counts of a set of transactions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::transaction::Transaction;

/// Sale totals for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every transaction, sold or not.
    pub total_sale_amount: f64,
    /// The number of transactions that sold.
    pub total_sold_items: u64,
    /// The number of transactions that did not sell.
    pub total_not_sold_items: u64,
}

/// Compute the sale totals of `transactions` in a single pass.
///
/// `total_sold_items + total_not_sold_items` always equals the number of
/// transactions.
pub fn compute_statistics(transactions: &[Transaction]) -> Statistics {
    transactions
        .iter()
        .fold(Statistics::default(), |mut statistics, transaction| {
            statistics.total_sale_amount += transaction.price;

            if transaction.sold {
                statistics.total_sold_items += 1;
            } else {
                statistics.total_not_sold_items += 1;
            }

            statistics
        })
}

/// The labels of the price histogram buckets, in order.
pub const PRICE_RANGE_LABELS: [&str; 10] = [
    "0-100",
    "101-200",
    "201-300",
    "301-400",
    "401-500",
    "501-600",
    "601-700",
    "701-800",
    "801-900",
    "901-above",
];

/// Inclusive upper bounds of every bucket except the last, open-ended one.
const PRICE_RANGE_UPPER_BOUNDS: [f64; 9] =
    [100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0, 800.0, 900.0];

/// The number of transactions whose price falls in one histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRangeCount {
    /// The bucket label, e.g. "101-200".
    pub range: String,
    /// The number of transactions in the bucket.
    pub count: u64,
}

/// The index of the histogram bucket for `price`.
///
/// Upper bounds are inclusive, so 100 is in the first bucket and 100.5 is in
/// the second. Zero and negative prices go in the first bucket.
fn price_bucket(price: f64) -> usize {
    PRICE_RANGE_UPPER_BOUNDS
        .iter()
        .position(|&upper_bound| price <= upper_bound)
        .unwrap_or(PRICE_RANGE_UPPER_BOUNDS.len())
}

/// Count the transactions in each of the ten fixed price ranges.
///
/// Every bucket is present, in order, even when its count is zero.
pub fn compute_histogram(transactions: &[Transaction]) -> [PriceRangeCount; 10] {
    let mut counts = [0u64; 10];

    for transaction in transactions {
        counts[price_bucket(transaction.price)] += 1;
    }

    std::array::from_fn(|i| PriceRangeCount {
        range: PRICE_RANGE_LABELS[i].to_owned(),
        count: counts[i],
    })
}

/// Count the transactions in each category.
///
/// Only categories that occur in `transactions` are present.
pub fn compute_category_counts(transactions: &[Transaction]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();

    for transaction in transactions {
        *counts.entry(transaction.category.clone()).or_insert(0) += 1;
    }

    counts
}
