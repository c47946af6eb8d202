//! Extractors that reject bad requests with the app's JSON errors.

use axum::extract::FromRequestParts;

use crate::Error;

/// Like [axum::extract::Query], but a query string that cannot be parsed is
/// rejected with [Error::InvalidQuery] instead of a plain text response.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);
