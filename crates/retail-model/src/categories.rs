//! Fixed allow-lists for categorical columns.
//!
//! Membership in a set is the only validity test; values outside the set
//! are replaced with null by the categorical filter rule.

/// A hand-enumerated set of valid values for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySet {
    pub values: &'static [&'static str],
}

impl CategorySet {
    /// Owned copy of the values, for embedding in serializable pipeline steps.
    pub fn to_vec(&self) -> Vec<String> {
        self.values.iter().map(|value| (*value).to_string()).collect()
    }
}

pub const CARD_PROVIDERS: CategorySet = CategorySet {
    values: &[
        "Diners Club / Carte Blanche",
        "American Express",
        "JCB 16 digit",
        "JCB 15 digit",
        "Maestro",
        "Mastercard",
        "Discover",
        "VISA 19 digit",
        "VISA 16 digit",
        "VISA 13 digit",
    ],
};

pub const STORE_TYPES: CategorySet = CategorySet {
    values: &["Web Portal", "Local", "Super Store", "Mall Kiosk", "Outlet"],
};

pub const STORE_COUNTRIES: CategorySet = CategorySet {
    values: &["DE", "US", "GB"],
};

pub const PRODUCT_CATEGORIES: CategorySet = CategorySet {
    values: &[
        "toys-and-games",
        "sports-and-leisure",
        "pets",
        "homeware",
        "health-and-beauty",
        "food-and-drink",
        "diy",
    ],
};

pub const AVAILABILITY: CategorySet = CategorySet {
    values: &["Still_available", "Removed"],
};

pub const TIME_PERIODS: CategorySet = CategorySet {
    values: &["Evening", "Morning", "Midday", "Late_Hours"],
};

/// Expected card number length per provider.
pub const CARD_NUMBER_LENGTHS: &[(&str, usize)] = &[
    ("JCB 16 digit", 16),
    ("VISA 16 digit", 16),
    ("Mastercard", 16),
    ("Discover", 16),
    ("Diners Club / Carte Blanche", 14),
    ("American Express", 15),
    ("JCB 15 digit", 15),
    ("Maestro", 12),
    ("VISA 19 digit", 19),
    ("VISA 13 digit", 13),
];

/// Looks up the expected card number length for a provider.
pub fn card_number_length(provider: &str) -> Option<usize> {
    CARD_NUMBER_LENGTHS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, len)| *len)
}
