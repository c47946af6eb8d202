//! Parsing of the month names used to filter transactions.

use time::Month;

use crate::Error;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Parse an English month name into a [Month].
///
/// Matching ignores case and surrounding whitespace, and accepts either the
/// full name ("January") or its three letter abbreviation ("Jan").
///
/// # Errors
/// Returns [Error::InvalidMonth] if `name` is not a month name.
pub fn parse_month(name: &str) -> Result<Month, Error> {
    let trimmed = name.trim();

    MONTHS
        .into_iter()
        .find(|month| {
            let full_name = month.to_string();
            trimmed.eq_ignore_ascii_case(&full_name)
                || (trimmed.len() == 3 && trimmed.eq_ignore_ascii_case(&full_name[..3]))
        })
        .ok_or_else(|| Error::InvalidMonth(name.to_owned()))
}

/// All twelve months in calendar order.
pub(crate) fn all_months() -> [Month; 12] {
    MONTHS
}
