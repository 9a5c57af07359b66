//! Company and department records.

use serde::{Deserialize, Serialize};

use lunchline_core::{CompanyId, DepartmentId};

/// A tenant organization.
///
/// Users, menus, master items, and orders are scoped by an optional company
/// id; rows with no company belong to the default tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
}

/// A department, used to scope menus and label users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}
