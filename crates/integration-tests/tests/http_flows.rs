//! Route-level flows driven through the router: the guest passcode gate,
//! identifier login, and role-based access.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use tower::ServiceExt;

use lunchline_core::{Email, Role, UserId};
use lunchline_integration_tests::offline_state;
use lunchline_server::models::User;
use lunchline_server::state::AppState;
use lunchline_server::{middleware, routes};

fn app(state: &AppState) -> Router {
    routes::routes()
        .layer(middleware::create_session_layer(state.config()))
        .with_state(state.clone())
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

async fn seed_employee(state: &AppState) {
    state
        .store()
        .upsert_user(User {
            id: UserId::new(1),
            username: "maria".to_owned(),
            email: Email::parse("maria@example.com").expect("valid email"),
            display_name: "Maria Lopez".to_owned(),
            role: Role::Employee,
            department_id: None,
            company_id: None,
            is_locked: false,
            created_at: Utc::now(),
        })
        .await;
}

// =============================================================================
// Guest passcode gate
// =============================================================================

#[tokio::test]
async fn wrong_guest_passcode_never_reaches_the_menu_step() {
    let state = offline_state();
    // default settings: passcode mode, code GUEST-0000

    let response = app(&state)
        .oneshot(form_post(
            "/guest/auth",
            "name=Visitor&host_contact=host%40example.com&company_id=0&passcode=GUEST-9999",
        ))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/guest?err=code");
}

#[tokio::test]
async fn correct_guest_passcode_advances_to_the_menu_step() {
    let state = offline_state();

    let response = app(&state)
        .oneshot(form_post(
            "/guest/auth",
            "name=Visitor&host_contact=host%40example.com&company_id=0&passcode=GUEST-0000",
        ))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/guest/menu");
}

#[tokio::test]
async fn guest_fields_are_required_even_with_the_right_code() {
    let state = offline_state();

    let response = app(&state)
        .oneshot(form_post(
            "/guest/auth",
            "name=&host_contact=&company_id=0&passcode=GUEST-0000",
        ))
        .await
        .expect("request succeeds");

    assert_eq!(location(&response), "/guest?err=fields");
}

#[tokio::test]
async fn guest_menu_without_a_session_returns_to_auth() {
    let state = offline_state();

    let response = app(&state)
        .oneshot(get("/guest/menu"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/guest");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn login_with_known_identifier_redirects_to_the_role_landing() {
    let state = offline_state();
    seed_employee(&state).await;

    let response = app(&state)
        .oneshot(form_post("/login", "identifier=MARIA"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/menu");
}

#[tokio::test]
async fn login_with_unknown_identifier_rerenders_the_login_page() {
    let state = offline_state();
    seed_employee(&state).await;

    let response = app(&state)
        .oneshot(form_post("/login", "identifier=nobody"))
        .await
        .expect("request succeeds");

    // no redirect: the page renders again with the generic message
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_views_redirect_anonymous_visitors_to_login() {
    let state = offline_state();

    for uri in ["/menu", "/kitchen", "/admin/users", "/reception", "/delivery"] {
        let response = app(&state).oneshot(get(uri)).await.expect("request succeeds");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }
}

// =============================================================================
// Role guard
// =============================================================================

#[tokio::test]
async fn employees_cannot_open_admin_views() {
    let state = offline_state();
    seed_employee(&state).await;
    let router = app(&state);

    // log in to capture the session cookie
    let login_response = router
        .clone()
        .oneshot(form_post("/login", "identifier=maria"))
        .await
        .expect("request succeeds");
    let cookie = login_response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie set")
        .to_owned();

    let request = Request::builder()
        .method("GET")
        .uri("/admin/users")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(request).await.expect("request succeeds");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
