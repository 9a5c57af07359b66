//! Hosted table-backend client.
//!
//! # Architecture
//!
//! The durable owner of record is a hosted relational backend exposed as a
//! table-oriented REST API (PostgREST dialect): one route per table, filter
//! expressions in the query string, JSON rows on the wire.
//!
//! - The backend is the source of truth - the store mirrors it in memory
//!   and writes through on every mutation.
//! - Wire rows ([`types`]) are separate structs from the domain models;
//!   conversions live in [`convert`] and reject malformed rows individually
//!   so one bad row never fails a whole fetch.
//! - There is deliberately no retry, timeout tuning, or cancellation here;
//!   callers log failures and move on (the next full reload reconciles).
//!
//! # Tables
//!
//! `users`, `companies`, `departments`, `master_food_items`, `daily_menus`,
//! `menu_templates`, `orders`, `menu_issues`, `comments`, and the singleton
//! `tenant_settings` row.

mod client;
pub mod convert;
pub mod types;

pub use client::BackendClient;

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Api {
            status: 404,
            message: "relation does not exist".to_owned(),
        };
        assert_eq!(err.to_string(), "API error: 404 - relation does not exist");
    }
}
