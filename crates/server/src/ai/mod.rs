//! Generative content client.
//!
//! Wraps the Anthropic Messages API for two kitchen-facing features:
//! menu-idea generation (cuisine theme + item count in, structured item
//! suggestions out) and feedback summarization (comment text in, prose out).
//!
//! The client only exists when an API key is configured; callers hold an
//! `Option<IdeasClient>` and degrade to an empty list / placeholder text
//! when it is absent. Failures are caught at the route layer and never
//! surfaced as errors to the user.

mod client;
mod error;
mod types;

pub use client::IdeasClient;
pub use error::AiError;
pub use types::SuggestedItem;
