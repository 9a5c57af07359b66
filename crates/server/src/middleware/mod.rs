//! HTTP middleware for the application.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store)

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireUser, clear_principal, ensure, set_principal};
pub use session::create_session_layer;
