//! Store consistency rules: identifier login, menu copying, batch
//! delivery, and the logout reset surface.

use chrono::{NaiveDate, Utc};

use lunchline_core::{
    CompanyId, Email, FoodCategory, MenuItemId, OrderId, OrderStatus, Role, UserId,
};
use lunchline_integration_tests::offline_state;
use lunchline_server::models::{MenuItem, User};
use lunchline_server::store::NewOrder;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

fn item(id: i64, calories: u32, tags: &[&str]) -> MenuItem {
    MenuItem {
        id: MenuItemId::new(id),
        name: format!("item-{id}"),
        description: String::new(),
        category: FoodCategory::Main,
        calories,
        dietary_tags: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

fn user(id: i64, username: &str, email: &str, locked: bool) -> User {
    User {
        id: UserId::new(id),
        username: username.to_owned(),
        email: Email::parse(email).expect("valid email"),
        display_name: username.to_owned(),
        role: Role::Employee,
        department_id: None,
        company_id: None,
        is_locked: locked,
        created_at: Utc::now(),
    }
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn locked_account_never_logs_in() {
    let state = offline_state();
    let store = state.store();
    store
        .upsert_user(user(1, "casey", "casey@example.com", true))
        .await;

    // identifier correctness is irrelevant once the account is locked
    assert!(store.login("casey").await.is_none());
    assert!(store.login("CASEY").await.is_none());
    assert!(store.login("casey@example.com").await.is_none());
    assert!(store.login(" Casey@Example.COM ").await.is_none());
}

#[tokio::test]
async fn login_matches_username_or_email_trimmed_case_insensitive() {
    let state = offline_state();
    let store = state.store();
    store
        .upsert_user(user(7, "Casey", "Casey.Jones@Example.com", false))
        .await;

    for identifier in [
        "casey",
        "  CASEY  ",
        "casey.jones@example.com",
        "CASEY.JONES@EXAMPLE.COM",
    ] {
        let principal = store.login(identifier).await;
        assert_eq!(
            principal.and_then(|p| p.user_id),
            Some(UserId::new(7)),
            "identifier {identifier:?} should log in"
        );
    }
    assert!(store.login("jones").await.is_none());
}

#[tokio::test]
async fn login_resolves_default_company_for_companyless_user() {
    let state = offline_state();
    let store = state.store();
    store
        .upsert_user(user(1, "casey", "casey@example.com", false))
        .await;

    let principal = store.login("casey").await.expect("login succeeds");
    assert_eq!(principal.company_id, CompanyId::new(1));
}

// =============================================================================
// Menu copy
// =============================================================================

#[tokio::test]
async fn copy_replaces_target_in_place_and_never_mutates_source() {
    let state = offline_state();
    let store = state.store();

    store
        .compose_menu(
            date(2),
            None,
            None,
            vec![item(1, 500, &[]), item(2, 300, &[])],
            Some("from source".to_owned()),
        )
        .await;
    let target = store
        .compose_menu(date(3), None, None, vec![item(9, 100, &[])], None)
        .await;

    let copied = store
        .copy_menu_from_date(date(2), date(3), None)
        .await
        .expect("source exists");

    // replaced in place by date key: id retained, contents overwritten
    assert_eq!(copied.id, target.id);
    assert_eq!(copied.items.len(), 2);
    assert_eq!(copied.notes.as_deref(), Some("from source"));

    // the source menu is untouched
    let source = store
        .menu_on(date(2), CompanyId::new(1))
        .await
        .expect("source still there");
    assert_eq!(source.items.len(), 2);
    assert_eq!(source.notes.as_deref(), Some("from source"));

    // and the (date, company) invariant holds: still two menus
    assert_eq!(store.menus_all().await.len(), 2);
}

#[tokio::test]
async fn copy_appends_new_menu_when_target_is_empty() {
    let state = offline_state();
    let store = state.store();

    let source = store
        .compose_menu(date(2), None, None, vec![item(1, 500, &[])], None)
        .await;
    let copied = store
        .copy_menu_from_date(date(2), date(4), None)
        .await
        .expect("source exists");

    assert_ne!(copied.id, source.id);
    assert_eq!(copied.date, date(4));
    assert_eq!(store.menus_all().await.len(), 2);
}

// =============================================================================
// Batch delivery
// =============================================================================

#[tokio::test]
async fn batch_delivery_updates_every_order_locally_without_a_backend() {
    let state = offline_state();
    let store = state.store();
    let menu = store
        .compose_menu(date(2), None, None, vec![item(1, 500, &[])], None)
        .await;

    let mut ids = Vec::new();
    for user_id in 1..=2 {
        let order = store
            .place_order(NewOrder {
                user_id: Some(UserId::new(user_id)),
                guest_name: None,
                host_contact: None,
                menu_id: menu.id,
                date: date(2),
                item_ids: vec![MenuItemId::new(1)],
                instructions: None,
                company_id: None,
            })
            .await;
        ids.push(order.id);
    }

    // no backend at all: the degenerate case of every remote write
    // failing. Local state must still flip to Delivered.
    let delivered = store.mark_batch_delivered(&ids).await;
    assert_eq!(delivered, 2);

    for order in store.orders_all().await {
        assert_eq!(order.status, OrderStatus::Delivered);
    }
}

#[tokio::test]
async fn batch_delivery_skips_unknown_and_terminal_orders() {
    let state = offline_state();
    let store = state.store();
    let menu = store
        .compose_menu(date(2), None, None, vec![item(1, 500, &[])], None)
        .await;

    let order = store
        .place_order(NewOrder {
            user_id: Some(UserId::new(1)),
            guest_name: None,
            host_contact: None,
            menu_id: menu.id,
            date: date(2),
            item_ids: vec![MenuItemId::new(1)],
            instructions: None,
            company_id: None,
        })
        .await;
    store.cancel_order(order.id).await;

    let delivered = store
        .mark_batch_delivered(&[order.id, OrderId::new(12345)])
        .await;
    assert_eq!(delivered, 0);
}

// =============================================================================
// Logout reset surface
// =============================================================================

#[tokio::test]
async fn logout_reset_drops_menus_and_orders_but_nothing_else() {
    let state = offline_state();
    let store = state.store();

    store
        .upsert_user(user(1, "casey", "casey@example.com", false))
        .await;
    store.create_department("Engineering".to_owned()).await;
    let menu = store
        .compose_menu(date(2), None, None, vec![item(1, 500, &[])], None)
        .await;
    store
        .place_order(NewOrder {
            user_id: Some(UserId::new(1)),
            guest_name: None,
            host_contact: None,
            menu_id: menu.id,
            date: date(2),
            item_ids: vec![MenuItemId::new(1)],
            instructions: None,
            company_id: None,
        })
        .await;

    store.clear_session_caches().await;

    assert!(store.menus_all().await.is_empty());
    assert!(store.orders_all().await.is_empty());
    assert_eq!(store.users().await.len(), 1);
    assert_eq!(store.departments().await.len(), 1);
}
