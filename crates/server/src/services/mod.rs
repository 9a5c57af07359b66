//! Application services.
//!
//! Pure logic the routes lean on: week arithmetic and the order cutoff
//! ([`schedule`]), selection summaries ([`summary`]), delivery grouping
//! ([`delivery`]), and mail composition ([`mailto`]). Everything here is
//! synchronous and side-effect free, which is what keeps it testable
//! without a store or a clock.

pub mod delivery;
pub mod mailto;
pub mod schedule;
pub mod summary;
