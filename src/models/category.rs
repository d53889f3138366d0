use serde::Serialize;

pub(crate) const INCOME_CATEGORY: &str = "Income";
pub(crate) const FALLBACK_COLOR: &str = "#7f8c8d";
pub(crate) const FALLBACK_ICON: &str = "DollarSign";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Category {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Master category list. Expense and income categories are views into it.
pub(crate) const CATEGORIES: &[Category] = &[
    Category {
        name: "Food & Dining",
        color: "#e74c3c",
        icon: "Utensils",
    },
    Category {
        name: "Transportation",
        color: "#3498db",
        icon: "Car",
    },
    Category {
        name: "Shopping",
        color: "#9b59b6",
        icon: "ShoppingCart",
    },
    Category {
        name: "Entertainment",
        color: "#f39c12",
        icon: "Gamepad2",
    },
    Category {
        name: "Healthcare",
        color: "#2ecc71",
        icon: "Heart",
    },
    Category {
        name: "Housing",
        color: "#34495e",
        icon: "Home",
    },
    Category {
        name: "Education",
        color: "#16a085",
        icon: "GraduationCap",
    },
    Category {
        name: "Personal Care",
        color: "#e67e22",
        icon: "Coffee",
    },
    Category {
        name: "Travel",
        color: "#8e44ad",
        icon: "Plane",
    },
    Category {
        name: "Gifts & Donations",
        color: "#c0392b",
        icon: "Gift",
    },
    Category {
        name: "Clothing",
        color: "#d35400",
        icon: "Shirt",
    },
    Category {
        name: INCOME_CATEGORY,
        color: "#27ae60",
        icon: "DollarSign",
    },
    Category {
        name: "Other",
        color: FALLBACK_COLOR,
        icon: "DollarSign",
    },
];

impl Category {
    pub(crate) fn all() -> &'static [Category] {
        CATEGORIES
    }

    pub(crate) fn expense_categories() -> impl Iterator<Item = &'static Category> {
        CATEGORIES.iter().filter(|c| c.name != INCOME_CATEGORY)
    }

    pub(crate) fn income_categories() -> impl Iterator<Item = &'static Category> {
        CATEGORIES.iter().filter(|c| c.name == INCOME_CATEGORY)
    }

    /// Find a category by name (case-insensitive).
    pub(crate) fn find_by_name(name: &str) -> Option<&'static Category> {
        let lower = name.trim().to_lowercase();
        CATEGORIES.iter().find(|c| c.name.to_lowercase() == lower)
    }

    pub(crate) fn color_of(name: &str) -> &'static str {
        CATEGORIES
            .iter()
            .find(|c| c.name == name)
            .map_or(FALLBACK_COLOR, |c| c.color)
    }

    pub(crate) fn icon_of(name: &str) -> &'static str {
        CATEGORIES
            .iter()
            .find(|c| c.name == name)
            .map_or(FALLBACK_ICON, |c| c.icon)
    }

    /// Parse the `#rrggbb` color into its components.
    pub(crate) fn rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(self.color).unwrap_or((0x7f, 0x8c, 0x8d))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub(crate) fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
