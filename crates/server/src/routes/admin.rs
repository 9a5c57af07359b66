//! Admin views: users, departments, companies, tenant settings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use lunchline_core::{
    CompanyId, DepartmentId, Email, GuestAccessMode, GuestPasscode, Role, UserId,
};

use crate::error::Result;
use crate::middleware::{RequireUser, ensure};
use crate::models::{Company, User};
use crate::state::AppState;

use super::{NavContext, nav};

// =============================================================================
// Users
// =============================================================================

/// One user row for the management table.
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub department: String,
    pub company: String,
    pub locked: bool,
}

/// A select option (value/label/selected).
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub nav: NavContext,
    pub users: Vec<UserRow>,
    pub editing: bool,
    pub edit_id: i64,
    pub edit_username: String,
    pub edit_email: String,
    pub edit_display_name: String,
    pub role_options: Vec<SelectOption>,
    pub department_options: Vec<SelectOption>,
    pub company_options: Vec<SelectOption>,
    pub flash: String,
}

/// Users page query parameters.
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub edit: Option<i64>,
    pub flash: Option<String>,
}

const ASSIGNABLE_ROLES: [Role; 5] = [
    Role::Employee,
    Role::Kitchen,
    Role::Admin,
    Role::Reception,
    Role::Delivery,
];

fn users_flash(code: &str) -> String {
    match code {
        "saved" => "User saved.".to_owned(),
        "deleted" => "User deleted.".to_owned(),
        "bademail" => "That email address doesn't look valid.".to_owned(),
        "badrole" => "Pick a valid role.".to_owned(),
        _ => String::new(),
    }
}

/// `0` encodes "none" in the department/company selects.
fn optional_id(raw: Option<i64>) -> Option<i64> {
    raw.filter(|id| *id != 0)
}

/// Display the user management page.
#[instrument(skip(state, principal))]
pub async fn users(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<UsersQuery>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let store = state.store();
    let all_users = store.users().await;
    let departments = store.departments().await;
    let companies = store.companies().await;

    let department_name = |id: Option<DepartmentId>| {
        id.and_then(|id| departments.iter().find(|d| d.id == id))
            .map(|d| d.name.clone())
            .unwrap_or_default()
    };
    let company_name = |id: Option<CompanyId>| {
        id.and_then(|id| companies.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    };

    let rows = all_users
        .iter()
        .map(|u| UserRow {
            id: u.id.as_i64(),
            username: u.username.clone(),
            email: u.email.to_string(),
            display_name: u.display_name.clone(),
            role: u.role.to_string(),
            department: department_name(u.department_id),
            company: company_name(u.company_id),
            locked: u.is_locked,
        })
        .collect();

    let edited = query
        .edit
        .map(UserId::new)
        .and_then(|id| all_users.iter().find(|u| u.id == id).cloned());

    let selected_role = edited.as_ref().map_or(Role::Employee, |u| u.role);
    let selected_department = edited.as_ref().and_then(|u| u.department_id);
    let selected_company = edited.as_ref().and_then(|u| u.company_id);

    let mut department_options = vec![SelectOption {
        value: "0".to_owned(),
        label: "(none)".to_owned(),
        selected: selected_department.is_none(),
    }];
    department_options.extend(departments.iter().map(|d| SelectOption {
        value: d.id.to_string(),
        label: d.name.clone(),
        selected: selected_department == Some(d.id),
    }));

    let mut company_options = vec![SelectOption {
        value: "0".to_owned(),
        label: "(default)".to_owned(),
        selected: selected_company.is_none(),
    }];
    company_options.extend(companies.iter().map(|c| SelectOption {
        value: c.id.to_string(),
        label: c.name.clone(),
        selected: selected_company == Some(c.id),
    }));

    let template = UsersTemplate {
        nav: nav(&state, &principal).await,
        users: rows,
        editing: edited.is_some(),
        edit_id: edited.as_ref().map_or(0, |u| u.id.as_i64()),
        edit_username: edited.as_ref().map(|u| u.username.clone()).unwrap_or_default(),
        edit_email: edited.as_ref().map(|u| u.email.to_string()).unwrap_or_default(),
        edit_display_name: edited
            .as_ref()
            .map(|u| u.display_name.clone())
            .unwrap_or_default(),
        role_options: ASSIGNABLE_ROLES
            .iter()
            .map(|r| SelectOption {
                value: r.to_string(),
                label: r.to_string(),
                selected: *r == selected_role,
            })
            .collect(),
        department_options,
        company_options,
        flash: query.flash.as_deref().map(users_flash).unwrap_or_default(),
    };
    Ok(template.into_response())
}

/// User create/update form data.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub department_id: Option<i64>,
    pub company_id: Option<i64>,
}

/// Create or update a user.
#[instrument(skip(state, principal, form))]
pub async fn upsert_user(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let Ok(email) = Email::parse(form.email.trim()) else {
        return Ok(Redirect::to("/admin/users?flash=bademail").into_response());
    };
    let Ok(role) = form.role.parse::<Role>() else {
        return Ok(Redirect::to("/admin/users?flash=badrole").into_response());
    };
    // Guests are session-only; they never get an account row
    if role == Role::Guest {
        return Ok(Redirect::to("/admin/users?flash=badrole").into_response());
    }

    let store = state.store();
    let existing_id = optional_id(form.id).map(UserId::new);
    let existing = match existing_id {
        Some(id) => store.user(id).await,
        None => None,
    };

    let display_name = {
        let trimmed = form.display_name.trim();
        if trimmed.is_empty() {
            form.username.trim().to_owned()
        } else {
            trimmed.to_owned()
        }
    };

    let user = User {
        id: existing_id.unwrap_or(UserId::new(0)),
        username: form.username.trim().to_owned(),
        email,
        display_name,
        role,
        department_id: optional_id(form.department_id).map(DepartmentId::new),
        company_id: optional_id(form.company_id).map(CompanyId::new),
        // lock state is managed by its own action, not the edit form
        is_locked: existing.as_ref().is_some_and(|u| u.is_locked),
        created_at: existing.as_ref().map_or_else(Utc::now, |u| u.created_at),
    };

    if existing.is_some() {
        store.upsert_user(user).await;
    } else {
        store.create_user(user).await;
    }
    Ok(Redirect::to("/admin/users?flash=saved").into_response())
}

/// Lock/unlock form data.
#[derive(Debug, Deserialize)]
pub struct LockForm {
    pub id: i64,
    pub locked: u8,
}

/// Lock or unlock an account.
#[instrument(skip(state, principal, form))]
pub async fn lock_user(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<LockForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;
    state
        .store()
        .set_user_locked(UserId::new(form.id), form.locked == 1)
        .await;
    Ok(Redirect::to("/admin/users").into_response())
}

/// Id-only form data.
#[derive(Debug, Deserialize)]
pub struct IdForm {
    pub id: i64,
}

/// Delete a user.
#[instrument(skip(state, principal, form))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<IdForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;
    state.store().delete_user(UserId::new(form.id)).await;
    Ok(Redirect::to("/admin/users?flash=deleted").into_response())
}

// =============================================================================
// Departments
// =============================================================================

/// One department row.
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
}

/// Departments page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/departments.html")]
pub struct DepartmentsTemplate {
    pub nav: NavContext,
    pub departments: Vec<DepartmentRow>,
}

/// Display department management.
#[instrument(skip(state, principal))]
pub async fn departments(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let rows = state
        .store()
        .departments()
        .await
        .iter()
        .map(|d| DepartmentRow {
            id: d.id.as_i64(),
            name: d.name.clone(),
        })
        .collect();

    Ok(DepartmentsTemplate {
        nav: nav(&state, &principal).await,
        departments: rows,
    }
    .into_response())
}

/// Department name form data.
#[derive(Debug, Deserialize)]
pub struct DepartmentForm {
    pub name: String,
}

/// Create a department.
#[instrument(skip(state, principal, form))]
pub async fn create_department(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<DepartmentForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let name = form.name.trim();
    if !name.is_empty() {
        state.store().create_department(name.to_owned()).await;
    }
    Ok(Redirect::to("/admin/departments").into_response())
}

/// Department rename form data.
#[derive(Debug, Deserialize)]
pub struct RenameDepartmentForm {
    pub id: i64,
    pub name: String,
}

/// Rename a department.
#[instrument(skip(state, principal, form))]
pub async fn rename_department(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<RenameDepartmentForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let name = form.name.trim();
    if !name.is_empty() {
        state
            .store()
            .rename_department(DepartmentId::new(form.id), name.to_owned())
            .await;
    }
    Ok(Redirect::to("/admin/departments").into_response())
}

/// Delete a department.
#[instrument(skip(state, principal, form))]
pub async fn delete_department(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<IdForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;
    state
        .store()
        .delete_department(DepartmentId::new(form.id))
        .await;
    Ok(Redirect::to("/admin/departments").into_response())
}

// =============================================================================
// Companies
// =============================================================================

/// One company row.
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub tagline: String,
}

/// Companies page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/companies.html")]
pub struct CompaniesTemplate {
    pub nav: NavContext,
    pub companies: Vec<CompanyRow>,
    pub editing: bool,
    pub edit_id: i64,
    pub edit_name: String,
    pub edit_tagline: String,
    pub edit_logo_url: String,
}

/// Companies page query parameters.
#[derive(Debug, Deserialize)]
pub struct CompaniesQuery {
    pub edit: Option<i64>,
}

/// Display company management.
#[instrument(skip(state, principal))]
pub async fn companies(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<CompaniesQuery>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let all = state.store().companies().await;
    let rows = all
        .iter()
        .map(|c| CompanyRow {
            id: c.id.as_i64(),
            name: c.name.clone(),
            tagline: c.tagline.clone().unwrap_or_default(),
        })
        .collect();

    let edited = query
        .edit
        .map(CompanyId::new)
        .and_then(|id| all.iter().find(|c| c.id == id).cloned());

    Ok(CompaniesTemplate {
        nav: nav(&state, &principal).await,
        companies: rows,
        editing: edited.is_some(),
        edit_id: edited.as_ref().map_or(0, |c| c.id.as_i64()),
        edit_name: edited.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
        edit_tagline: edited
            .as_ref()
            .and_then(|c| c.tagline.clone())
            .unwrap_or_default(),
        edit_logo_url: edited
            .as_ref()
            .and_then(|c| c.logo_url.clone())
            .unwrap_or_default(),
    }
    .into_response())
}

/// Company create/update form data.
#[derive(Debug, Deserialize)]
pub struct CompanyForm {
    pub id: Option<i64>,
    pub name: String,
    pub tagline: String,
    pub logo_url: String,
}

/// Create or update a company.
#[instrument(skip(state, principal, form))]
pub async fn upsert_company(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<CompanyForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let name = form.name.trim().to_owned();
    if name.is_empty() {
        return Ok(Redirect::to("/admin/companies").into_response());
    }

    let trim_opt = |s: String| {
        let t = s.trim().to_owned();
        if t.is_empty() { None } else { Some(t) }
    };
    let company = Company {
        id: optional_id(form.id).map_or(CompanyId::new(0), CompanyId::new),
        name,
        tagline: trim_opt(form.tagline),
        logo_url: trim_opt(form.logo_url),
    };

    let store = state.store();
    if optional_id(form.id).is_some() {
        store.upsert_company(company).await;
    } else {
        store.create_company(company).await;
    }
    Ok(Redirect::to("/admin/companies").into_response())
}

/// Delete a company.
#[instrument(skip(state, principal, form))]
pub async fn delete_company(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<IdForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;
    state.store().delete_company(CompanyId::new(form.id)).await;
    Ok(Redirect::to("/admin/companies").into_response())
}

// =============================================================================
// Tenant settings
// =============================================================================

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/settings.html")]
pub struct SettingsTemplate {
    pub nav: NavContext,
    pub company_name: String,
    pub tagline: String,
    pub logo_url: String,
    pub cutoff: String,
    pub guest_access_options: Vec<SelectOption>,
    pub guest_passcode: String,
    pub saved: bool,
    pub error: String,
}

/// Settings page query parameters.
#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub saved: Option<u8>,
    pub err: Option<String>,
}

const GUEST_ACCESS_MODES: [GuestAccessMode; 3] = [
    GuestAccessMode::Disabled,
    GuestAccessMode::Passcode,
    GuestAccessMode::Open,
];

/// Display the tenant settings editor.
#[instrument(skip(state, principal))]
pub async fn settings(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Query(query): Query<SettingsQuery>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    let current = state.store().settings().await;
    Ok(SettingsTemplate {
        nav: nav(&state, &principal).await,
        company_name: current.company_name.clone(),
        tagline: current.tagline.clone().unwrap_or_default(),
        logo_url: current.logo_url.clone().unwrap_or_default(),
        cutoff: current.order_cutoff.format("%H:%M").to_string(),
        guest_access_options: GUEST_ACCESS_MODES
            .iter()
            .map(|m| SelectOption {
                value: m.to_string(),
                label: m.to_string(),
                selected: *m == current.guest_access,
            })
            .collect(),
        guest_passcode: current.guest_passcode.as_str().to_owned(),
        saved: query.saved == Some(1),
        error: match query.err.as_deref() {
            Some("cutoff") => "The cutoff must be a time like 10:30.".to_owned(),
            _ => String::new(),
        },
    }
    .into_response())
}

/// Settings form data.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub company_name: String,
    pub tagline: String,
    pub logo_url: String,
    pub cutoff: String,
    pub guest_access: String,
    pub guest_passcode: String,
}

/// Save tenant settings.
#[instrument(skip(state, principal, form))]
pub async fn save_settings(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Form(form): Form<SettingsForm>,
) -> Result<Response> {
    ensure(&principal, Role::is_admin)?;

    // time inputs submit HH:MM, or HH:MM:SS when a step is set
    let cutoff_raw = form.cutoff.trim();
    let Ok(cutoff) = NaiveTime::parse_from_str(cutoff_raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(cutoff_raw, "%H:%M:%S"))
    else {
        return Ok(Redirect::to("/admin/settings?err=cutoff").into_response());
    };

    let store = state.store();
    let mut settings = store.settings().await;
    let trim_opt = |s: &str| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_owned())
        }
    };

    if !form.company_name.trim().is_empty() {
        settings.company_name = form.company_name.trim().to_owned();
    }
    settings.tagline = trim_opt(&form.tagline);
    settings.logo_url = trim_opt(&form.logo_url);
    settings.order_cutoff = cutoff;
    if let Ok(mode) = form.guest_access.parse::<GuestAccessMode>() {
        settings.guest_access = mode;
    }
    if !form.guest_passcode.trim().is_empty() {
        settings.guest_passcode = GuestPasscode::from_string(form.guest_passcode.trim().to_owned());
    }

    store.update_settings(settings).await;
    Ok(Redirect::to("/admin/settings?saved=1").into_response())
}
