//! Employee order composition.
//!
//! Accumulates order lines against the remotely-sourced menu and price
//! table, computes each line's price locally, and builds the submit-order
//! wire payload. Two phases only: *Composing* (selection toggles active,
//! lines may be added/deleted) and *Submitting* (a network call is in
//! flight; mutating commands are rejected until it resolves).
//!
//! Selections are kept as per-category sets of item names rather than
//! positional toggle vectors, so a catalog reload can never shift which
//! item a toggle refers to.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::catalog::{Category, MenuCatalog, PriceTable};
use crate::error::{PosError, PosResult};

// ---------------------------------------------------------------------------
// Meal kinds
// ---------------------------------------------------------------------------

/// The fixed meal-kind enumeration offered on the employee ordering screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealKind {
    #[serde(rename = "Bowl")]
    Bowl,
    #[serde(rename = "Plate")]
    Plate,
    #[serde(rename = "Bigger Plate")]
    BiggerPlate,
    #[serde(rename = "Appetizer S")]
    AppetizerSmall,
    #[serde(rename = "Appetizer L")]
    AppetizerLarge,
    #[serde(rename = "A La Carte S")]
    ALaCarteSmall,
    #[serde(rename = "A La Carte M")]
    ALaCarteMedium,
    #[serde(rename = "A La Carte L")]
    ALaCarteLarge,
    #[serde(rename = "Drink")]
    Drink,
}

impl MealKind {
    pub const ALL: [MealKind; 9] = [
        MealKind::Bowl,
        MealKind::Plate,
        MealKind::BiggerPlate,
        MealKind::AppetizerSmall,
        MealKind::AppetizerLarge,
        MealKind::ALaCarteSmall,
        MealKind::ALaCarteMedium,
        MealKind::ALaCarteLarge,
        MealKind::Drink,
    ];

    /// Tag used on the wire and in the UI.
    pub fn wire_name(&self) -> &'static str {
        match self {
            MealKind::Bowl => "Bowl",
            MealKind::Plate => "Plate",
            MealKind::BiggerPlate => "Bigger Plate",
            MealKind::AppetizerSmall => "Appetizer S",
            MealKind::AppetizerLarge => "Appetizer L",
            MealKind::ALaCarteSmall => "A La Carte S",
            MealKind::ALaCarteMedium => "A La Carte M",
            MealKind::ALaCarteLarge => "A La Carte L",
            MealKind::Drink => "Drink",
        }
    }

    pub fn from_wire(name: &str) -> Option<MealKind> {
        MealKind::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == name)
    }

    /// A combo requires one side plus a fixed number of entrées.
    pub fn is_combo(&self) -> bool {
        matches!(self, MealKind::Bowl | MealKind::Plate | MealKind::BiggerPlate)
    }

    fn base_price_key(&self) -> Option<&'static str> {
        match self {
            MealKind::Bowl => Some("base_bowl"),
            MealKind::Plate => Some("base_plate"),
            MealKind::BiggerPlate => Some("base_bigger_plate"),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// In-progress, not-yet-committed picks: at most one selection round at a
/// time, cleared whenever a line is added. Order of insertion is preserved
/// so a line's item list reads the way the employee toggled it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Selections {
    pub meals: Vec<MealKind>,
    pub entrees: Vec<String>,
    pub sides: Vec<String>,
    pub appetizers: Vec<String>,
    pub drinks: Vec<String>,
}

impl Selections {
    fn toggle_name(list: &mut Vec<String>, name: &str) {
        if let Some(pos) = list.iter().position(|n| n == name) {
            list.remove(pos);
        } else {
            list.push(name.to_string());
        }
    }

    pub fn toggle_meal(&mut self, kind: MealKind) {
        if let Some(pos) = self.meals.iter().position(|k| *k == kind) {
            self.meals.remove(pos);
        } else {
            self.meals.push(kind);
        }
    }

    pub fn toggle_item(&mut self, category: Category, name: &str) {
        let list = match category {
            Category::Entree => &mut self.entrees,
            Category::Side => &mut self.sides,
            Category::Appetizer => &mut self.appetizers,
            Category::Drink => &mut self.drinks,
        };
        Self::toggle_name(list, name);
    }

    pub fn clear(&mut self) {
        self.meals.clear();
        self.entrees.clear();
        self.sides.clear();
        self.appetizers.clear();
        self.drinks.clear();
    }

    /// Cardinality check for the chosen meal kind, per the ordering rules:
    /// combos need their entrée count plus one side; à la carte M/L accept
    /// exactly one of an entrée or a side; everything else is one item of
    /// its own category.
    fn satisfies(&self, kind: MealKind) -> bool {
        let e = self.entrees.len();
        let s = self.sides.len();
        let a = self.appetizers.len();
        let d = self.drinks.len();
        match kind {
            MealKind::Bowl => e == 1 && s == 1 && a == 0 && d == 0,
            MealKind::Plate => e == 2 && s == 1 && a == 0 && d == 0,
            MealKind::BiggerPlate => e == 3 && s == 1 && a == 0 && d == 0,
            MealKind::ALaCarteSmall => e == 1 && s == 0 && a == 0 && d == 0,
            MealKind::ALaCarteMedium | MealKind::ALaCarteLarge => {
                (e == 1 || s == 1) && !(e >= 1 && s >= 1) && a == 0 && d == 0
            }
            MealKind::AppetizerSmall | MealKind::AppetizerLarge => {
                a == 1 && e == 0 && s == 0 && d == 0
            }
            MealKind::Drink => d == 1 && e == 0 && s == 0 && a == 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Order lines
// ---------------------------------------------------------------------------

/// One committed entry in the in-progress order. Immutable once added
/// except for deletion.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub meal: MealKind,
    pub entrees: Vec<String>,
    pub sides: Vec<String>,
    pub appetizers: Vec<String>,
    pub drinks: Vec<String>,
    pub price: f64,
}

impl OrderLine {
    /// Flatten to the `meal_items` wire list: appetizers, drinks, entrées,
    /// sides — the order the backend has always received.
    fn wire_items(&self) -> Vec<Value> {
        self.appetizers
            .iter()
            .chain(self.drinks.iter())
            .chain(self.entrees.iter())
            .chain(self.sides.iter())
            .map(|name| serde_json::json!({ "item_name": name }))
            .collect()
    }
}

/// The in-progress order: insertion-ordered lines keyed by a session-unique
/// counter, plus the customer name.
#[derive(Debug, Default)]
pub struct Order {
    lines: BTreeMap<u64, OrderLine>,
    next_id: u64,
    pub customer_name: String,
}

impl Order {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: u64) -> Option<&OrderLine> {
        self.lines.get(&id)
    }

    /// Lines in insertion order (ids are monotonically increasing).
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &OrderLine)> {
        self.lines.iter()
    }

    fn push(&mut self, line: OrderLine) -> u64 {
        let id = self.next_id;
        self.lines.insert(id, line);
        self.next_id += 1;
        id
    }

    fn remove(&mut self, id: u64) -> Option<OrderLine> {
        self.lines.remove(&id)
    }

    /// Sum of line prices, rounded to two decimals.
    pub fn total(&self) -> f64 {
        let total: f64 = self.lines.values().map(|l| l.price).sum();
        (total * 100.0).round() / 100.0
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.next_id = 0;
        self.customer_name.clear();
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Price one line: pure function of the line contents, the price table, and
/// the premium entrée set.
pub fn price_for_line(
    kind: MealKind,
    entrees: &[String],
    drinks: &[String],
    prices: &PriceTable,
    catalog: &MenuCatalog,
) -> PosResult<f64> {
    match kind {
        MealKind::Bowl | MealKind::Plate | MealKind::BiggerPlate => {
            let base_key = kind.base_price_key().expect("combo kinds have a base key");
            let mut price = prices.get(base_key)?;
            let premium_count = entrees.iter().filter(|e| catalog.is_premium(e)).count();
            if premium_count > 0 {
                price += premium_count as f64 * prices.get("norm prem")?;
            }
            Ok(price)
        }
        MealKind::ALaCarteSmall => {
            let entree = entrees.first().map(String::as_str).unwrap_or_default();
            if catalog.is_premium(entree) {
                prices.get("ala s prem")
            } else {
                prices.get("ala s reg")
            }
        }
        MealKind::ALaCarteMedium => a_la_carte_price(prices, catalog, entrees, "m"),
        MealKind::ALaCarteLarge => a_la_carte_price(prices, catalog, entrees, "l"),
        MealKind::AppetizerSmall => prices.get("appetizer s"),
        MealKind::AppetizerLarge => prices.get("appetizer l"),
        MealKind::Drink => {
            // Fountain drinks are priced by the size embedded in their name;
            // other drinks carry no size tier and stay at zero, matching the
            // backend's price table.
            let name = drinks.first().map(String::as_str).unwrap_or_default();
            let lower = name.to_lowercase();
            if lower.contains("small") {
                prices.get("ftn drk s")
            } else if lower.contains("medium") {
                prices.get("ftn drk m")
            } else if lower.contains("large") {
                prices.get("ftn drk l")
            } else {
                Ok(0.0)
            }
        }
    }
}

/// À la carte M/L: entrée chosen → premium/regular rate; side only → the
/// side-only rate.
fn a_la_carte_price(
    prices: &PriceTable,
    catalog: &MenuCatalog,
    entrees: &[String],
    size: &str,
) -> PosResult<f64> {
    match entrees.first() {
        Some(entree) if catalog.is_premium(entree) => prices.get(&format!("ala {size} prem")),
        Some(_) => prices.get(&format!("ala {size} reg")),
        None => prices.get(&format!("ala {size} side")),
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposerPhase {
    Composing,
    Submitting,
}

/// Session state for the employee ordering screen. Lives in Tauri managed
/// state behind a mutex; every command operates on it synchronously.
pub struct Composer {
    pub catalog: MenuCatalog,
    pub prices: PriceTable,
    pub selections: Selections,
    pub order: Order,
    pub phase: ComposerPhase,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            catalog: MenuCatalog::default(),
            prices: PriceTable::default(),
            selections: Selections::default(),
            order: Order::default(),
            phase: ComposerPhase::Composing,
        }
    }
}

impl Composer {
    /// Install a freshly fetched catalog and price table. Starts a new
    /// selection round; committed lines are kept.
    pub fn load(&mut self, catalog: MenuCatalog, prices: PriceTable) {
        self.catalog = catalog;
        self.prices = prices;
        self.selections.clear();
    }

    fn ensure_composing(&self) -> PosResult<()> {
        if self.phase == ComposerPhase::Submitting {
            return Err(PosError::validation(
                "Order submission is in progress, please wait",
            ));
        }
        Ok(())
    }

    pub fn toggle_meal(&mut self, kind: MealKind) -> PosResult<()> {
        self.ensure_composing()?;
        self.selections.toggle_meal(kind);
        Ok(())
    }

    /// Toggle an item by stable name. Unknown names are refused so stale
    /// frontends cannot select items that left the catalog.
    pub fn toggle_item(&mut self, category: Category, name: &str) -> PosResult<()> {
        self.ensure_composing()?;
        if !self.catalog.contains(category, name) {
            return Err(PosError::selection(format!(
                "Unknown {category:?} item: {name}"
            )));
        }
        self.selections.toggle_item(category, name);
        Ok(())
    }

    pub fn clear_selections(&mut self) -> PosResult<()> {
        self.ensure_composing()?;
        self.selections.clear();
        Ok(())
    }

    /// Validate the current selection round and commit it as a new line.
    ///
    /// On any validation failure nothing changes; on success the new line's
    /// id is returned and every selection set is cleared for the next round.
    pub fn add_line(&mut self) -> PosResult<u64> {
        self.ensure_composing()?;

        let kind = match self.selections.meals.as_slice() {
            [kind] => *kind,
            _ => {
                return Err(PosError::selection(
                    "Choose exactly one meal kind (Bowl, Plate, Bigger Plate, ...)",
                ))
            }
        };

        if !self.selections.satisfies(kind) {
            return Err(PosError::selection(
                "Invalid selection for the chosen meal type",
            ));
        }

        let price = price_for_line(
            kind,
            &self.selections.entrees,
            &self.selections.drinks,
            &self.prices,
            &self.catalog,
        )?;

        let line = OrderLine {
            meal: kind,
            entrees: std::mem::take(&mut self.selections.entrees),
            sides: std::mem::take(&mut self.selections.sides),
            appetizers: std::mem::take(&mut self.selections.appetizers),
            drinks: std::mem::take(&mut self.selections.drinks),
            price,
        };
        let id = self.order.push(line);
        self.selections.clear();
        Ok(id)
    }

    /// Remove a line by id. No-op when the id is unknown.
    pub fn delete_line(&mut self, id: u64) -> PosResult<()> {
        self.ensure_composing()?;
        self.order.remove(id);
        Ok(())
    }

    pub fn set_customer_name(&mut self, name: &str) -> PosResult<()> {
        self.ensure_composing()?;
        self.order.customer_name = name.to_string();
        Ok(())
    }

    /// Validate submit preconditions, enter *Submitting*, and build the
    /// wire payload. The caller performs the network call and reports back
    /// via [`Composer::finish_submit_success`] / [`Composer::finish_submit_failure`].
    ///
    /// A second submit while one is in flight is not coalesced; requests
    /// are never cancelled or deduplicated once issued.
    pub fn begin_submit(&mut self, employee_id: i64, order_date: &str) -> PosResult<Value> {
        if self.order.is_empty() {
            return Err(PosError::validation("No orders to submit"));
        }
        if self.order.customer_name.trim().is_empty() {
            return Err(PosError::validation("Please enter a customer name"));
        }

        let items: Vec<Value> = self
            .order
            .iter()
            .map(|(_, line)| {
                serde_json::json!({
                    "meal_type": line.meal.wire_name(),
                    "meal_items": line.wire_items(),
                })
            })
            .collect();

        let payload = serde_json::json!({
            "customer_name": self.order.customer_name,
            "order_date": order_date,
            "employee_id": employee_id,
            "total_price": self.order.total(),
            "items": items,
        });

        self.phase = ComposerPhase::Submitting;
        Ok(payload)
    }

    /// Submit succeeded: clear the order, reset the line counter, return to
    /// *Composing*.
    pub fn finish_submit_success(&mut self) {
        self.order.clear();
        self.phase = ComposerPhase::Composing;
    }

    /// Submit failed: keep the order exactly as it was so the employee can
    /// retry, return to *Composing*.
    pub fn finish_submit_failure(&mut self) {
        self.phase = ComposerPhase::Composing;
    }

    /// Snapshot for the frontend: selections, lines, total, phase.
    pub fn snapshot(&self) -> Value {
        let lines: Vec<Value> = self
            .order
            .iter()
            .map(|(id, line)| {
                serde_json::json!({
                    "id": id,
                    "meal": line.meal.wire_name(),
                    "entrees": line.entrees,
                    "sides": line.sides,
                    "appetizers": line.appetizers,
                    "drinks": line.drinks,
                    "price": line.price,
                })
            })
            .collect();
        serde_json::json!({
            "phase": self.phase,
            "selections": self.selections,
            "customer_name": self.order.customer_name,
            "lines": lines,
            "total": self.order.total(),
        })
    }
}

/// Tauri managed state wrapper.
pub struct ComposerState {
    pub inner: std::sync::Mutex<Composer>,
}

impl ComposerState {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(Composer::default()),
        }
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> MenuCatalog {
        MenuCatalog::from_items(
            serde_json::json!([
                {"name": "Orange Chicken", "type": "entree"},
                {"name": "Beijing Beef", "type": "entree"},
                {"name": "Broccoli Beef", "type": "entree"},
                {"name": "PREMIUM Black Pepper Steak", "type": "entree"},
                {"name": "PREMIUM Honey Walnut Shrimp", "type": "entree"},
                {"name": "White Rice", "type": "side"},
                {"name": "Chow Mein", "type": "side"},
                {"name": "Chicken Egg Roll", "type": "appetizer"},
                {"name": "Small Fountain Drink", "type": "drink"},
                {"name": "Medium Fountain Drink", "type": "drink"},
                {"name": "Sweet Tea", "type": "drink"}
            ])
            .as_array()
            .unwrap(),
        )
    }

    fn test_prices() -> PriceTable {
        PriceTable::from_pairs(&[
            ("base_bowl", 8.50),
            ("base_plate", 10.00),
            ("base_bigger_plate", 11.50),
            ("norm prem", 1.50),
            ("ala s reg", 5.00),
            ("ala s prem", 6.50),
            ("ala m reg", 8.00),
            ("ala m prem", 11.00),
            ("ala m side", 4.00),
            ("ala l reg", 10.50),
            ("ala l prem", 14.50),
            ("ala l side", 5.50),
            ("appetizer s", 2.00),
            ("appetizer l", 8.00),
            ("ftn drk s", 2.10),
            ("ftn drk m", 2.30),
            ("ftn drk l", 2.50),
        ])
    }

    fn composer() -> Composer {
        let mut c = Composer::default();
        c.load(test_catalog(), test_prices());
        c
    }

    fn toggle_all(c: &mut Composer, category: Category, names: &[&str]) {
        for name in names {
            c.toggle_item(category, name).unwrap();
        }
    }

    #[test]
    fn every_meal_kind_validates_with_its_exact_cardinality() {
        let cases: &[(MealKind, &[&str], &[&str], &[&str], &[&str])] = &[
            (MealKind::Bowl, &["Orange Chicken"], &["White Rice"], &[], &[]),
            (
                MealKind::Plate,
                &["Orange Chicken", "Beijing Beef"],
                &["White Rice"],
                &[],
                &[],
            ),
            (
                MealKind::BiggerPlate,
                &["Orange Chicken", "Beijing Beef", "Broccoli Beef"],
                &["Chow Mein"],
                &[],
                &[],
            ),
            (MealKind::ALaCarteSmall, &["Orange Chicken"], &[], &[], &[]),
            (MealKind::ALaCarteMedium, &["Orange Chicken"], &[], &[], &[]),
            (MealKind::ALaCarteMedium, &[], &["White Rice"], &[], &[]),
            (MealKind::ALaCarteLarge, &[], &["Chow Mein"], &[], &[]),
            (
                MealKind::AppetizerSmall,
                &[],
                &[],
                &["Chicken Egg Roll"],
                &[],
            ),
            (
                MealKind::AppetizerLarge,
                &[],
                &[],
                &["Chicken Egg Roll"],
                &[],
            ),
            (MealKind::Drink, &[], &[], &[], &["Small Fountain Drink"]),
        ];

        for (kind, entrees, sides, appetizers, drinks) in cases {
            let mut c = composer();
            c.toggle_meal(*kind).unwrap();
            toggle_all(&mut c, Category::Entree, entrees);
            toggle_all(&mut c, Category::Side, sides);
            toggle_all(&mut c, Category::Appetizer, appetizers);
            toggle_all(&mut c, Category::Drink, drinks);
            assert!(
                c.add_line().is_ok(),
                "expected {:?} to validate",
                kind.wire_name()
            );
        }
    }

    #[test]
    fn off_by_one_selections_are_rejected() {
        // Bowl with an extra entrée
        let mut c = composer();
        c.toggle_meal(MealKind::Bowl).unwrap();
        toggle_all(
            &mut c,
            Category::Entree,
            &["Orange Chicken", "Beijing Beef"],
        );
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        let err = c.add_line().unwrap_err();
        assert_eq!(err.kind(), "selection");
        assert_eq!(c.order.len(), 0, "rejected add must not change the order");

        // Bowl missing its side
        let mut c = composer();
        c.toggle_meal(MealKind::Bowl).unwrap();
        toggle_all(&mut c, Category::Entree, &["Orange Chicken"]);
        assert!(c.add_line().is_err());

        // Plate with only one entrée
        let mut c = composer();
        c.toggle_meal(MealKind::Plate).unwrap();
        toggle_all(&mut c, Category::Entree, &["Orange Chicken"]);
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        assert!(c.add_line().is_err());

        // À la carte M with both an entrée and a side
        let mut c = composer();
        c.toggle_meal(MealKind::ALaCarteMedium).unwrap();
        toggle_all(&mut c, Category::Entree, &["Orange Chicken"]);
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        assert!(c.add_line().is_err());

        // Drink with a stray appetizer
        let mut c = composer();
        c.toggle_meal(MealKind::Drink).unwrap();
        toggle_all(&mut c, Category::Drink, &["Small Fountain Drink"]);
        toggle_all(&mut c, Category::Appetizer, &["Chicken Egg Roll"]);
        assert!(c.add_line().is_err());
    }

    #[test]
    fn zero_or_multiple_meal_kinds_are_rejected() {
        let mut c = composer();
        toggle_all(&mut c, Category::Entree, &["Orange Chicken"]);
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        assert_eq!(c.add_line().unwrap_err().kind(), "selection");

        c.toggle_meal(MealKind::Bowl).unwrap();
        c.toggle_meal(MealKind::Plate).unwrap();
        assert_eq!(c.add_line().unwrap_err().kind(), "selection");
    }

    #[test]
    fn bowl_pricing_with_and_without_premium() {
        // Regular entrée: base price exactly.
        let mut c = composer();
        c.toggle_meal(MealKind::Bowl).unwrap();
        toggle_all(&mut c, Category::Entree, &["Orange Chicken"]);
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 8.50);

        // One premium entrée: base + one upcharge.
        let mut c = composer();
        c.toggle_meal(MealKind::Bowl).unwrap();
        toggle_all(&mut c, Category::Entree, &["Black Pepper Steak"]);
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 10.00);
    }

    #[test]
    fn plate_counts_each_premium_entree() {
        let mut c = composer();
        c.toggle_meal(MealKind::Plate).unwrap();
        toggle_all(
            &mut c,
            Category::Entree,
            &["Black Pepper Steak", "Honey Walnut Shrimp"],
        );
        toggle_all(&mut c, Category::Side, &["Chow Mein"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 10.00 + 2.0 * 1.50);
    }

    #[test]
    fn a_la_carte_medium_side_only_uses_side_rate() {
        let mut c = composer();
        c.toggle_meal(MealKind::ALaCarteMedium).unwrap();
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 4.00);

        // An entrée uses the entrée rate instead.
        let mut c = composer();
        c.toggle_meal(MealKind::ALaCarteMedium).unwrap();
        toggle_all(&mut c, Category::Entree, &["Black Pepper Steak"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 11.00);
    }

    #[test]
    fn drink_price_follows_the_size_in_the_name() {
        let mut c = composer();
        c.toggle_meal(MealKind::Drink).unwrap();
        toggle_all(&mut c, Category::Drink, &["Medium Fountain Drink"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 2.30);

        // A drink with no size tier stays at zero, like the price table.
        let mut c = composer();
        c.toggle_meal(MealKind::Drink).unwrap();
        toggle_all(&mut c, Category::Drink, &["Sweet Tea"]);
        let id = c.add_line().unwrap();
        assert_eq!(c.order.line(id).unwrap().price, 0.0);
    }

    #[test]
    fn adding_a_line_clears_every_selection_set() {
        let mut c = composer();
        c.toggle_meal(MealKind::Bowl).unwrap();
        toggle_all(&mut c, Category::Entree, &["Orange Chicken"]);
        toggle_all(&mut c, Category::Side, &["White Rice"]);
        c.add_line().unwrap();

        assert!(c.selections.meals.is_empty());
        assert!(c.selections.entrees.is_empty());
        assert!(c.selections.sides.is_empty());
        assert!(c.selections.appetizers.is_empty());
        assert!(c.selections.drinks.is_empty());
    }

    #[test]
    fn toggling_an_unknown_item_is_refused() {
        let mut c = composer();
        let err = c.toggle_item(Category::Entree, "Mystery Meat").unwrap_err();
        assert_eq!(err.kind(), "selection");
        assert!(c.selections.entrees.is_empty());
    }

    fn add_bowl(c: &mut Composer, entree: &str) -> u64 {
        c.toggle_meal(MealKind::Bowl).unwrap();
        c.toggle_item(Category::Entree, entree).unwrap();
        c.toggle_item(Category::Side, "White Rice").unwrap();
        c.add_line().unwrap()
    }

    #[test]
    fn deleting_a_line_leaves_the_others_untouched() {
        let mut c = composer();
        let a = add_bowl(&mut c, "Orange Chicken");
        let b = add_bowl(&mut c, "Black Pepper Steak");
        let third = add_bowl(&mut c, "Beijing Beef");

        c.delete_line(b).unwrap();
        assert_eq!(c.order.len(), 2);
        assert!(c.order.line(b).is_none());
        assert_eq!(c.order.line(a).unwrap().price, 8.50);
        assert_eq!(c.order.line(third).unwrap().price, 8.50);

        // Unknown id is a no-op.
        c.delete_line(999).unwrap();
        assert_eq!(c.order.len(), 2);
    }

    #[test]
    fn submit_preconditions_block_without_a_network_call() {
        // Empty order.
        let mut c = composer();
        c.set_customer_name("Alex").unwrap();
        let err = c.begin_submit(2, "2024-02-10 10:00:00").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(c.phase, ComposerPhase::Composing);

        // Missing customer name.
        let mut c = composer();
        add_bowl(&mut c, "Orange Chicken");
        let err = c.begin_submit(2, "2024-02-10 10:00:00").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(c.phase, ComposerPhase::Composing);
        assert_eq!(c.order.len(), 1);
    }

    #[test]
    fn submit_payload_has_the_wire_shape() {
        let mut c = composer();
        add_bowl(&mut c, "Black Pepper Steak");
        c.set_customer_name("Alex").unwrap();

        let payload = c.begin_submit(7, "2024-02-10 10:00:00").unwrap();
        assert_eq!(c.phase, ComposerPhase::Submitting);
        assert_eq!(payload["customer_name"], "Alex");
        assert_eq!(payload["employee_id"], 7);
        assert_eq!(payload["order_date"], "2024-02-10 10:00:00");
        assert_eq!(payload["total_price"], 10.00);

        let items = payload["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["meal_type"], "Bowl");
        let names: Vec<&str> = items[0]["meal_items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["item_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Black Pepper Steak", "White Rice"]);
    }

    #[test]
    fn mutations_are_rejected_while_submitting() {
        let mut c = composer();
        add_bowl(&mut c, "Orange Chicken");
        c.set_customer_name("Alex").unwrap();
        c.begin_submit(2, "2024-02-10 10:00:00").unwrap();

        assert!(c.toggle_meal(MealKind::Bowl).is_err());
        assert!(c.toggle_item(Category::Side, "White Rice").is_err());
        assert!(c.add_line().is_err());
        assert!(c.delete_line(0).is_err());

        // A rapid second submit is not coalesced with the in-flight one.
        assert!(c.begin_submit(2, "2024-02-10 10:00:01").is_ok());
    }

    #[test]
    fn submit_success_clears_the_order_and_resets_the_counter() {
        let mut c = composer();
        add_bowl(&mut c, "Orange Chicken");
        add_bowl(&mut c, "Beijing Beef");
        c.set_customer_name("Alex").unwrap();
        c.begin_submit(2, "2024-02-10 10:00:00").unwrap();
        c.finish_submit_success();

        assert!(c.order.is_empty());
        assert_eq!(c.phase, ComposerPhase::Composing);
        assert!(c.order.customer_name.is_empty());

        // Counter restarts at zero.
        let id = add_bowl(&mut c, "Orange Chicken");
        assert_eq!(id, 0);
    }

    #[test]
    fn submit_failure_preserves_the_order_for_retry() {
        let mut c = composer();
        add_bowl(&mut c, "Orange Chicken");
        add_bowl(&mut c, "Black Pepper Steak");
        c.set_customer_name("Alex").unwrap();
        c.begin_submit(2, "2024-02-10 10:00:00").unwrap();
        c.finish_submit_failure();

        assert_eq!(c.phase, ComposerPhase::Composing);
        assert_eq!(c.order.len(), 2);
        assert_eq!(c.order.customer_name, "Alex");
        assert_eq!(c.order.line(1).unwrap().price, 10.00);

        // A retry can go straight back out.
        assert!(c.begin_submit(2, "2024-02-10 10:05:00").is_ok());
    }

    #[test]
    fn total_is_rounded_to_two_decimals() {
        let mut c = composer();
        c.prices = PriceTable::from_pairs(&[("base_bowl", 3.333), ("norm prem", 1.5)]);
        add_bowl(&mut c, "Orange Chicken");
        add_bowl(&mut c, "Beijing Beef");
        add_bowl(&mut c, "Broccoli Beef");
        assert_eq!(c.order.total(), 10.0);
    }
}
