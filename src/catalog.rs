//! Menu catalog and price tables.
//!
//! Both are populated once from the backend when a screen loads and are
//! read-only afterwards. The employee price table is the flat `name ->
//! amount` mapping from `/view-prices`; the kiosk uses the nested structure
//! from `/get-customer-prices`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::error::{PosError, PosResult};

/// Marker prefix the backend uses to flag premium entrées in `/menu-items`.
pub const PREMIUM_PREFIX: &str = "PREMIUM ";

// ---------------------------------------------------------------------------
// Menu catalog
// ---------------------------------------------------------------------------

/// Item name lists per category plus the premium entrée set.
///
/// A premium entrée arrives as `PREMIUM <name>`; the stripped name joins
/// both the entrée list and the premium set, so the UI shows one button and
/// pricing still knows the upcharge applies.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuCatalog {
    pub entrees: Vec<String>,
    pub sides: Vec<String>,
    pub appetizers: Vec<String>,
    pub drinks: Vec<String>,
    pub premiums: HashSet<String>,
}

impl MenuCatalog {
    /// Build the catalog from the `/menu-items` response rows.
    /// Rows with an unrecognised `type` are ignored, matching the four
    /// categories the ordering screens present.
    pub fn from_items(items: &[Value]) -> Self {
        let mut catalog = MenuCatalog::default();
        for item in items {
            let name = item.get("name").and_then(Value::as_str).unwrap_or("");
            let item_type = item.get("type").and_then(Value::as_str).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            match item_type {
                "entree" => {
                    if let Some(stripped) = name.strip_prefix(PREMIUM_PREFIX) {
                        catalog.premiums.insert(stripped.to_string());
                        catalog.entrees.push(stripped.to_string());
                    } else {
                        catalog.entrees.push(name.to_string());
                    }
                }
                "side" => catalog.sides.push(name.to_string()),
                "appetizer" => catalog.appetizers.push(name.to_string()),
                "drink" => catalog.drinks.push(name.to_string()),
                _ => {}
            }
        }
        catalog
    }

    pub fn is_premium(&self, entree: &str) -> bool {
        self.premiums.contains(entree)
    }

    /// True when `name` exists in the given category list.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.names(category).iter().any(|n| n == name)
    }

    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::Entree => &self.entrees,
            Category::Side => &self.sides,
            Category::Appetizer => &self.appetizers,
            Category::Drink => &self.drinks,
        }
    }
}

/// Selectable item categories on the ordering screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Entree,
    Side,
    Appetizer,
    Drink,
}

// ---------------------------------------------------------------------------
// Employee price table
// ---------------------------------------------------------------------------

/// Flat price lookup keyed by the backend's price-table names
/// (`base_bowl`, `norm prem`, `ala m side`, `ftn drk l`, ...).
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    /// Build the table from the `/view-prices` response rows. Amounts may
    /// arrive as JSON numbers or numeric strings (the backend serialises
    /// SQL decimals as strings).
    pub fn from_rows(rows: &[Value]) -> Self {
        let mut prices = HashMap::new();
        for row in rows {
            let name = row.get("name").and_then(Value::as_str).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let amount = match row.get("price") {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            if let Some(amount) = amount {
                prices.insert(name.to_string(), amount);
            }
        }
        Self { prices }
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            prices: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Look up a price key. A missing key refuses the line rather than
    /// producing a garbage price.
    pub fn get(&self, key: &str) -> PosResult<f64> {
        self.prices
            .get(key)
            .copied()
            .ok_or_else(|| PosError::selection(format!("Price table is missing entry '{key}'")))
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Customer (kiosk) price structure
// ---------------------------------------------------------------------------

/// Per-size amounts, as nested under the customer price structure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SizedPrices {
    #[serde(rename = "Small", default)]
    pub small: f64,
    #[serde(rename = "Medium", default)]
    pub medium: f64,
    #[serde(rename = "Large", default)]
    pub large: f64,
}

impl SizedPrices {
    pub fn for_size(&self, size: Size) -> f64 {
        match size {
            Size::Small => self.small,
            Size::Medium => self.medium,
            Size::Large => self.large,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComboPrices {
    #[serde(rename = "Bowl", default)]
    pub bowl: f64,
    #[serde(rename = "Plate", default)]
    pub plate: f64,
    #[serde(rename = "Bigger Plate", default)]
    pub bigger_plate: f64,
    #[serde(rename = "premiumUpcharge", default)]
    pub premium_upcharge: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ALaCartePrices {
    #[serde(default)]
    pub regular: SizedPrices,
    #[serde(default)]
    pub premium: SizedPrices,
}

/// The nested `/get-customer-prices` response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CustomerPrices {
    #[serde(rename = "Combo", default)]
    pub combo: ComboPrices,
    #[serde(rename = "A la Carte", default)]
    pub a_la_carte: ALaCartePrices,
    #[serde(rename = "Appetizers", default)]
    pub appetizers: SizedPrices,
    #[serde(rename = "Drinks", default)]
    pub drinks: SizedPrices,
}

/// Portion sizes offered on the kiosk size-selection modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    Small,
    Medium,
    Large,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_rows() -> Vec<Value> {
        serde_json::json!([
            {"name": "Orange Chicken", "type": "entree"},
            {"name": "PREMIUM Black Pepper Steak", "type": "entree"},
            {"name": "PREMIUM Honey Walnut Shrimp", "type": "entree"},
            {"name": "White Rice", "type": "side"},
            {"name": "Chow Mein", "type": "side"},
            {"name": "Chicken Egg Roll", "type": "appetizer"},
            {"name": "Small Fountain Drink", "type": "drink"},
            {"name": "base_bowl", "type": "price"}
        ])
        .as_array()
        .unwrap()
        .clone()
    }

    #[test]
    fn premium_prefix_is_stripped_into_both_lists() {
        let catalog = MenuCatalog::from_items(&menu_rows());
        assert_eq!(
            catalog.entrees,
            vec![
                "Orange Chicken",
                "Black Pepper Steak",
                "Honey Walnut Shrimp"
            ]
        );
        assert!(catalog.is_premium("Black Pepper Steak"));
        assert!(catalog.is_premium("Honey Walnut Shrimp"));
        assert!(!catalog.is_premium("Orange Chicken"));
    }

    #[test]
    fn unknown_types_are_ignored() {
        let catalog = MenuCatalog::from_items(&menu_rows());
        assert_eq!(catalog.sides.len(), 2);
        assert_eq!(catalog.appetizers, vec!["Chicken Egg Roll"]);
        assert_eq!(catalog.drinks, vec!["Small Fountain Drink"]);
    }

    #[test]
    fn price_table_accepts_numbers_and_numeric_strings() {
        let rows = serde_json::json!([
            {"name": "base_bowl", "price": 8.50},
            {"name": "norm prem", "price": "1.50"},
            {"name": "broken", "price": "n/a"}
        ])
        .as_array()
        .unwrap()
        .clone();
        let table = PriceTable::from_rows(&rows);
        assert_eq!(table.get("base_bowl").unwrap(), 8.50);
        assert_eq!(table.get("norm prem").unwrap(), 1.50);
        assert!(table.get("broken").is_err());
        assert!(table.get("missing").is_err());
    }

    #[test]
    fn customer_prices_parse_the_nested_shape() {
        let parsed: CustomerPrices = serde_json::from_value(serde_json::json!({
            "Combo": {"Bowl": 8.5, "Plate": 10.0, "Bigger Plate": 11.5, "premiumUpcharge": 1.5},
            "A la Carte": {
                "regular": {"Small": 5.0, "Medium": 8.0, "Large": 10.5},
                "premium": {"Small": 6.5, "Medium": 11.0, "Large": 14.5}
            },
            "Appetizers": {"Small": 2.0, "Large": 8.0},
            "Drinks": {"Small": 2.1, "Medium": 2.3, "Large": 2.5}
        }))
        .expect("customer prices should deserialize");

        assert_eq!(parsed.combo.bigger_plate, 11.5);
        assert_eq!(parsed.a_la_carte.premium.for_size(Size::Medium), 11.0);
        assert_eq!(parsed.appetizers.for_size(Size::Large), 8.0);
        assert_eq!(parsed.drinks.for_size(Size::Small), 2.1);
    }
}
