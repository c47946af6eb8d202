//! Builds the month and search filter shared by every transaction query.
//!
//! A [TransactionFilter] can be checked against a single [Transaction] in
//! memory with [TransactionFilter::matches], or rendered as an SQL `WHERE`
//! clause for the store. Both forms select exactly the same records.

use rusqlite::types::Value;
use time::Month;

use crate::month::parse_month;

use super::core::Transaction;

/// The fields that search text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Title or description, or a price equal to the search text when it is
    /// a number. Used by the transaction listing.
    #[default]
    Listing,
    /// Title, description or category. Used by the combined data endpoint and
    /// the dashboard.
    Combined,
}

/// Selects the transactions sold in one month, optionally narrowed down by a
/// case-insensitive search.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// `None` when the month name could not be resolved, which matches nothing.
    month: Option<Month>,
    /// Lower-cased search text, `None` when empty.
    search: Option<String>,
    scope: SearchScope,
}

/// An SQL `WHERE` clause with its positional parameters.
#[derive(Debug)]
pub(crate) struct SqlFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

impl TransactionFilter {
    /// Create a filter for transactions sold in `month`.
    ///
    /// Empty or whitespace-only `search` text is the same as no search.
    pub fn new(month: Month, search: Option<&str>, scope: SearchScope) -> Self {
        Self::with_optional_month(Some(month), search, scope)
    }

    /// Create a filter from a month name such as "January" or "jan".
    ///
    /// An unknown month name produces a filter that matches no transactions.
    pub fn for_month_name(month_name: &str, search: Option<&str>, scope: SearchScope) -> Self {
        Self::with_optional_month(parse_month(month_name).ok(), search, scope)
    }

    fn with_optional_month(month: Option<Month>, search: Option<&str>, scope: SearchScope) -> Self {
        let search = search
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_ascii_lowercase);

        Self {
            month,
            search,
            scope,
        }
    }

    /// The month this filter selects, if the month name was valid.
    pub fn month(&self) -> Option<Month> {
        self.month
    }

    /// Whether `transaction` is selected by this filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let Some(month) = self.month else {
            return false;
        };

        if transaction.sale_month() != month {
            return false;
        }

        let Some(search) = &self.search else {
            return true;
        };

        let contains = |text: &str| text.to_ascii_lowercase().contains(search.as_str());

        match self.scope {
            SearchScope::Listing => {
                contains(&transaction.title)
                    || contains(&transaction.description)
                    || self.search_price() == Some(transaction.price)
            }
            SearchScope::Combined => {
                contains(&transaction.title)
                    || contains(&transaction.description)
                    || contains(&transaction.category)
            }
        }
    }

    /// The search text as a price, if it is a finite number.
    fn search_price(&self) -> Option<f64> {
        self.search
            .as_deref()
            .and_then(|text| text.parse::<f64>().ok())
            .filter(|price| price.is_finite())
    }

    /// Render the filter as an SQL clause over the transaction table.
    ///
    /// SQLite's `LIKE` folds ASCII letters only, which is the same folding
    /// [TransactionFilter::matches] uses.
    pub(crate) fn to_sql(&self) -> SqlFilter {
        let Some(month) = self.month else {
            return SqlFilter {
                clause: "0".to_owned(),
                params: Vec::new(),
            };
        };

        let mut clause = "sale_month = ?".to_owned();
        let mut params = vec![Value::Integer(u8::from(month).into())];

        let Some(search) = &self.search else {
            return SqlFilter { clause, params };
        };

        let pattern = Value::Text(format!("%{}%", escape_like_pattern(search)));
        let like = |column: &str| format!("{column} LIKE ? ESCAPE '\\'");

        let mut alternatives = vec![like("title"), like("description")];
        params.push(pattern.clone());
        params.push(pattern.clone());

        match self.scope {
            SearchScope::Listing => {
                if let Some(price) = self.search_price() {
                    alternatives.push("price = ?".to_owned());
                    params.push(Value::Real(price));
                }
            }
            SearchScope::Combined => {
                alternatives.push(like("category"));
                params.push(pattern);
            }
        }

        clause.push_str(&format!(" AND ({})", alternatives.join(" OR ")));

        SqlFilter { clause, params }
    }
}

/// Escape the `LIKE` wildcards in `text` so it is matched literally.
fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
