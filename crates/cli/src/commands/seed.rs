//! Seed the backend with a demo dataset.
//!
//! Upserts are keyed on id, so seeding is idempotent: running it twice
//! resets the demo rows instead of duplicating them.

use chrono::{Local, NaiveTime, Utc};

use lunchline_core::{
    CompanyId, DepartmentId, Email, FoodCategory, GuestAccessMode, GuestPasscode, MasterItemId,
    MenuId, Role, UserId,
};
use lunchline_server::models::{
    Company, DailyMenu, Department, MasterFoodItem, TenantSettings, User,
};

use super::CliError;

/// Run the seed command.
///
/// # Errors
///
/// Returns an error when the backend is not configured or a write fails.
pub async fn run() -> Result<(), CliError> {
    let backend = super::backend_from_env()?;

    tracing::info!("seeding companies and departments");
    let companies = demo_companies();
    for company in &companies {
        backend.upsert_company(company).await?;
    }
    for department in demo_departments() {
        backend.upsert_department(&department).await?;
    }

    tracing::info!("seeding users");
    for user in demo_users() {
        backend.upsert_user(&user).await?;
    }

    tracing::info!("seeding master food items");
    let items = demo_items();
    for item in &items {
        backend.upsert_master_item(item).await?;
    }

    tracing::info!("seeding today's menu");
    let today = Local::now().date_naive();
    let menu = DailyMenu {
        id: MenuId::new(9001),
        date: today,
        items: items.iter().take(6).map(MasterFoodItem::to_menu_item).collect(),
        notes: Some("Welcome to the demo canteen!".to_owned()),
        department_id: None,
        company_id: None,
    };
    backend.upsert_menu(&menu).await?;

    tracing::info!("seeding tenant settings");
    backend
        .upsert_settings(&TenantSettings {
            company_name: "Lunchline HQ".to_owned(),
            tagline: Some("Good food, no fuss".to_owned()),
            logo_url: None,
            order_cutoff: NaiveTime::from_hms_opt(10, 30, 0).expect("valid time"),
            guest_access: GuestAccessMode::Passcode,
            guest_passcode: GuestPasscode::generate(),
        })
        .await?;

    tracing::info!("seed complete");
    Ok(())
}

fn demo_companies() -> Vec<Company> {
    vec![
        Company {
            id: CompanyId::new(1),
            name: "Lunchline HQ".to_owned(),
            tagline: Some("Good food, no fuss".to_owned()),
            logo_url: None,
        },
        Company {
            id: CompanyId::new(2),
            name: "Acme Labs".to_owned(),
            tagline: None,
            logo_url: None,
        },
    ]
}

fn demo_departments() -> Vec<Department> {
    [(1, "Engineering"), (2, "Operations"), (3, "Sales")]
        .iter()
        .map(|(id, name)| Department {
            id: DepartmentId::new(*id),
            name: (*name).to_owned(),
        })
        .collect()
}

fn demo_users() -> Vec<User> {
    let user = |id: i64, username: &str, name: &str, role: Role, locked: bool| User {
        id: UserId::new(id),
        username: username.to_owned(),
        email: Email::parse(&format!("{username}@lunchline.app")).expect("valid demo email"),
        display_name: name.to_owned(),
        role,
        department_id: Some(DepartmentId::new(1)),
        company_id: Some(CompanyId::new(1)),
        is_locked: locked,
        created_at: Utc::now(),
    };

    vec![
        user(1, "maria", "Maria Lopez", Role::Employee, false),
        user(2, "chef", "Sam Okafor", Role::Kitchen, false),
        user(3, "admin", "Alex Admin", Role::Admin, false),
        user(4, "front", "Robin Desk", Role::Reception, false),
        user(5, "runner", "Kim Porter", Role::Delivery, false),
        user(6, "former", "Former Employee", Role::Employee, true),
    ]
}

fn demo_items() -> Vec<MasterFoodItem> {
    let item = |id: i64,
                name: &str,
                description: &str,
                category: FoodCategory,
                calories: u32,
                tags: &[&str]| MasterFoodItem {
        id: MasterItemId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        category,
        calories,
        dietary_tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        is_available: true,
        company_id: None,
    };

    vec![
        item(
            1,
            "Roasted Tomato Soup",
            "Slow-roasted tomatoes, basil oil",
            FoodCategory::Soup,
            210,
            &["vegetarian", "gluten-free"],
        ),
        item(
            2,
            "Harvest Grain Salad",
            "Farro, squash, pickled onion",
            FoodCategory::Salad,
            380,
            &["vegan"],
        ),
        item(
            3,
            "Herb Chicken Thighs",
            "With lemon and roast potatoes",
            FoodCategory::Main,
            620,
            &[],
        ),
        item(
            4,
            "Chickpea Tagine",
            "Warm spices, apricot, almonds",
            FoodCategory::Main,
            540,
            &["vegan", "gluten-free"],
        ),
        item(
            5,
            "Garlic Green Beans",
            "Blistered, with chili flakes",
            FoodCategory::Side,
            120,
            &["vegan", "gluten-free"],
        ),
        item(
            6,
            "Lemon Olive-Oil Cake",
            "With whipped yogurt",
            FoodCategory::Dessert,
            410,
            &["vegetarian"],
        ),
        item(
            7,
            "Mint Iced Tea",
            "Lightly sweetened",
            FoodCategory::Drink,
            60,
            &["vegan"],
        ),
    ]
}
