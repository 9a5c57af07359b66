//! Integration tests for Lunchline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lunchline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `store_semantics` - Store consistency rules (login, copy, batches)
//! - `ordering_rules` - Cutoff, week strip, and summary logic
//! - `http_flows` - Route-level flows against an offline server
//!
//! All tests run against an offline store (no backend configured).
//! Offline startup is a supported mode of the server, and it is exactly
//! the degenerate case of every remote write failing, which is what most
//! of these rules are about.

use lunchline_core::CompanyId;
use lunchline_server::config::ServerConfig;
use lunchline_server::state::AppState;

/// Build an offline application state for tests.
#[must_use]
pub fn offline_state() -> AppState {
    AppState::new(ServerConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:0".to_owned(),
        default_company_id: CompanyId::new(1),
        backend: None,
        ai: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    })
}
