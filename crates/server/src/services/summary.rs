//! Selection summary: count, calories, dietary tags.

use crate::models::MenuItem;

/// Summary of a set of selected menu items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealSummary {
    pub item_count: usize,
    pub total_calories: u32,
    /// Deduplicated union of the items' dietary tags, first-seen order.
    pub dietary_tags: Vec<String>,
}

impl MealSummary {
    /// Whether there is anything to show.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Summarize selected items.
#[must_use]
pub fn summarize<'a, I>(items: I) -> MealSummary
where
    I: IntoIterator<Item = &'a MenuItem>,
{
    let mut item_count = 0;
    let mut total_calories: u32 = 0;
    let mut dietary_tags: Vec<String> = Vec::new();

    for item in items {
        item_count += 1;
        total_calories = total_calories.saturating_add(item.calories);
        for tag in &item.dietary_tags {
            if !dietary_tags.iter().any(|t| t == tag) {
                dietary_tags.push(tag.clone());
            }
        }
    }

    MealSummary {
        item_count,
        total_calories,
        dietary_tags,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lunchline_core::{FoodCategory, MenuItemId};

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

    #[test]
    fn test_total_calories_sum() {
        let items = [
            item(1, 500, &["vegetarian"]),
            item(2, 300, &["vegan", "gluten-free"]),
            item(3, 50, &["vegetarian"]),
        ];
        let summary = summarize(items.iter());
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_calories, 850);
    }

    #[test]
    fn test_tags_deduplicated_first_seen_order() {
        let items = [
            item(1, 0, &["vegetarian", "spicy"]),
            item(2, 0, &["vegan", "vegetarian"]),
            item(3, 0, &["spicy"]),
        ];
        let summary = summarize(items.iter());
        assert_eq!(summary.dietary_tags, vec!["vegetarian", "spicy", "vegan"]);
    }

    #[test]
    fn test_empty_selection() {
        let summary = summarize(std::iter::empty());
        assert!(summary.is_empty());
        assert_eq!(summary.total_calories, 0);
        assert!(summary.dietary_tags.is_empty());
    }
}
