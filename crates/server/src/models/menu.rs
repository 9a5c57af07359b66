//! Food catalog, daily menus, and menu templates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lunchline_core::{
    CompanyId, DepartmentId, FoodCategory, MasterItemId, MenuId, MenuItemId, TemplateId, UserId,
};

/// A catalog entry the kitchen maintains.
///
/// Master items carry availability; when placed on a daily menu they become
/// [`MenuItem`]s (same data minus availability).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterFoodItem {
    pub id: MasterItemId,
    pub name: String,
    pub description: String,
    pub category: FoodCategory,
    pub calories: u32,
    pub dietary_tags: Vec<String>,
    pub is_available: bool,
    pub company_id: Option<CompanyId>,
}

impl MasterFoodItem {
    /// The menu-item form of this catalog entry.
    ///
    /// The menu item keeps the master item's numeric id so orders can be
    /// traced back to the catalog.
    #[must_use]
    pub fn to_menu_item(&self) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(self.id.as_i64()),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            calories: self.calories,
            dietary_tags: self.dietary_tags.clone(),
        }
    }
}

/// A food item as it appears on a daily menu or template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub category: FoodCategory,
    pub calories: u32,
    pub dietary_tags: Vec<String>,
}

/// The menu published for one date.
///
/// Invariant: at most one `DailyMenu` per (date, company). The store's menu
/// mutators uphold this by replacing in place on the (date, company) key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenu {
    pub id: MenuId,
    pub date: NaiveDate,
    pub items: Vec<MenuItem>,
    pub notes: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub company_id: Option<CompanyId>,
}

impl DailyMenu {
    /// Items in the given category, in menu order.
    #[must_use]
    pub fn items_in(&self, category: FoodCategory) -> Vec<&MenuItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// Look up an item on this menu by id.
    #[must_use]
    pub fn item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// A named, reusable snapshot of menu items and notes.
///
/// Distinct from any specific day's live menu; applying a template copies
/// its contents onto a target date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuTemplate {
    pub id: TemplateId,
    pub name: String,
    pub items: Vec<MenuItem>,
    pub notes: Option<String>,
    pub created_by: UserId,
    pub is_shared: bool,
}

impl MenuTemplate {
    /// Whether the given user may apply this template.
    #[must_use]
    pub fn visible_to(&self, user: UserId) -> bool {
        self.is_shared || self.created_by == user
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, category: FoodCategory) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: format!("item-{id}"),
            description: String::new(),
            category,
            calories: 100,
            dietary_tags: vec![],
        }
    }

    #[test]
    fn test_to_menu_item_keeps_id() {
        let master = MasterFoodItem {
            id: MasterItemId::new(99),
            name: "Tomato Soup".to_owned(),
            description: "With basil".to_owned(),
            category: FoodCategory::Soup,
            calories: 210,
            dietary_tags: vec!["vegetarian".to_owned()],
            is_available: true,
            company_id: None,
        };
        let item = master.to_menu_item();
        assert_eq!(item.id.as_i64(), 99);
        assert_eq!(item.name, "Tomato Soup");
        assert_eq!(item.category, FoodCategory::Soup);
    }

    #[test]
    fn test_items_in_filters_by_category() {
        let menu = DailyMenu {
            id: MenuId::new(1),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            items: vec![
                item(1, FoodCategory::Soup),
                item(2, FoodCategory::Main),
                item(3, FoodCategory::Main),
            ],
            notes: None,
            department_id: None,
            company_id: None,
        };
        assert_eq!(menu.items_in(FoodCategory::Main).len(), 2);
        assert_eq!(menu.items_in(FoodCategory::Dessert).len(), 0);
        assert!(menu.item(MenuItemId::new(2)).is_some());
        assert!(menu.item(MenuItemId::new(9)).is_none());
    }

    #[test]
    fn test_template_visibility() {
        let template = MenuTemplate {
            id: TemplateId::new(1),
            name: "Friday classics".to_owned(),
            items: vec![],
            notes: None,
            created_by: UserId::new(5),
            is_shared: false,
        };
        assert!(template.visible_to(UserId::new(5)));
        assert!(!template.visible_to(UserId::new(6)));
    }
}
