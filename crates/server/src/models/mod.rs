//! Domain models for the lunch-ordering application.
//!
//! These are validated in-memory records, separate from the wire rows the
//! backend client speaks (see [`crate::backend::types`]). The store owns
//! collections of these; the hosted backend is the durable owner of record.

pub mod company;
pub mod feedback;
pub mod menu;
pub mod order;
pub mod session;
pub mod settings;
pub mod user;

pub use company::{Company, Department};
pub use feedback::{Comment, CommentResponse, MenuIssue};
pub use menu::{DailyMenu, MasterFoodItem, MenuItem, MenuTemplate};
pub use order::Order;
pub use session::{GuestIdentity, Principal, session_keys};
pub use settings::TenantSettings;
pub use user::User;
