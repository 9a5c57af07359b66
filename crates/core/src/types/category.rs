//! Food categories.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid food category: {0}")]
pub struct ParseCategoryError(pub String);

/// The fixed set of categories a food item can belong to.
///
/// Daily menus are composed by placing items into category slots, and the
/// generative menu-idea schema constrains suggestions to this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Soup,
    Salad,
    Main,
    Side,
    Dessert,
    Drink,
}

impl FoodCategory {
    /// All categories in menu display order.
    pub const ALL: [Self; 6] = [
        Self::Soup,
        Self::Salad,
        Self::Main,
        Self::Side,
        Self::Dessert,
        Self::Drink,
    ];

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Soup => "Soup",
            Self::Salad => "Salad",
            Self::Main => "Main",
            Self::Side => "Side",
            Self::Dessert => "Dessert",
            Self::Drink => "Drink",
        }
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Soup => write!(f, "soup"),
            Self::Salad => write!(f, "salad"),
            Self::Main => write!(f, "main"),
            Self::Side => write!(f, "side"),
            Self::Dessert => write!(f, "dessert"),
            Self::Drink => write!(f, "drink"),
        }
    }
}

impl std::str::FromStr for FoodCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soup" => Ok(Self::Soup),
            "salad" => Ok(Self::Salad),
            "main" => Ok(Self::Main),
            "side" => Ok(Self::Side),
            "dessert" => Ok(Self::Dessert),
            "drink" => Ok(Self::Drink),
            _ => Err(ParseCategoryError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for category in FoodCategory::ALL {
            let parsed: FoodCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("breakfast".parse::<FoodCategory>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&FoodCategory::Dessert).unwrap();
        assert_eq!(json, "\"dessert\"");
    }
}
