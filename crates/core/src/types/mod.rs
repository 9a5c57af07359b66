//! Core types for Lunchline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod passcode;
pub mod role;
pub mod status;

pub use category::{FoodCategory, ParseCategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use passcode::GuestPasscode;
pub use role::Role;
pub use status::*;
