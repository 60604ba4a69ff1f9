//! The built-in catalogue of transaction categories.
//!
//! Categories are not stored as entities. When a transaction is created, the
//! label, icon and color of the chosen category are copied onto the
//! transaction, so renaming a category never relabels older transactions.

use crate::profile::Language;

/// A built-in category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// A stable identifier, e.g. "food".
    pub id: &'static str,
    /// The Chinese label.
    pub name: &'static str,
    /// The English label.
    pub name_en: &'static str,
    /// The icon token.
    pub icon: &'static str,
    /// The color token.
    pub color: &'static str,
}

impl Category {
    /// The label to display in `language`.
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::Zh => self.name,
            Language::En => self.name_en,
        }
    }
}

/// The built-in categories in display order.
pub const CATEGORIES: [Category; 8] = [
    Category {
        id: "food",
        name: "餐饮",
        name_en: "Food",
        icon: "restaurant",
        color: "#fb923c",
    },
    Category {
        id: "shop",
        name: "购物",
        name_en: "Shop",
        icon: "shopping_cart",
        color: "#60a5fa",
    },
    Category {
        id: "travel",
        name: "交通",
        name_en: "Travel",
        icon: "commute",
        color: "#4ade80",
    },
    Category {
        id: "fun",
        name: "娱乐",
        name_en: "Fun",
        icon: "movie",
        color: "#a855f7",
    },
    Category {
        id: "home",
        name: "居住",
        name_en: "Home",
        icon: "home",
        color: "#2dd4bf",
    },
    Category {
        id: "health",
        name: "医疗",
        name_en: "Health",
        icon: "medical_services",
        color: "#f87171",
    },
    Category {
        id: "study",
        name: "教育",
        name_en: "Study",
        icon: "school",
        color: "#facc15",
    },
    Category {
        id: "more",
        name: "更多",
        name_en: "More",
        icon: "more_horiz",
        color: "#94a3b8",
    },
];

/// The icon given to user-defined categories.
pub const CUSTOM_CATEGORY_ICON: &str = "stars";

/// The color given to user-defined categories.
pub const CUSTOM_CATEGORY_COLOR: &str = "#8E8E93";

/// Find a built-in category by its ID or by either of its labels.
pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES
        .iter()
        .find(|category| category.id == key || category.name == key || category.name_en == key)
}

/// The label, icon and color to copy onto a new transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStamp {
    /// The category label.
    pub label: String,
    /// The icon token.
    pub icon: String,
    /// The color token.
    pub color: String,
}

/// Resolve `key` into the data stored on a transaction.
///
/// Built-in categories are labelled in `language`. Anything else is treated as
/// a user-defined label and gets the custom icon and color.
pub fn stamp_category(key: &str, language: Language) -> CategoryStamp {
    match find_category(key) {
        Some(category) => CategoryStamp {
            label: category.label(language).to_owned(),
            icon: category.icon.to_owned(),
            color: category.color.to_owned(),
        },
        None => CategoryStamp {
            label: key.to_owned(),
            icon: CUSTOM_CATEGORY_ICON.to_owned(),
            color: CUSTOM_CATEGORY_COLOR.to_owned(),
        },
    }
}
