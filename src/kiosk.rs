//! Customer self-order flow.
//!
//! The walk-up kiosk mirrors the employee composer's combo rules with a
//! simpler single-meal-at-a-time interaction: direct click-to-select per
//! category instead of toggle sets, and a shopping cart instead of a
//! multi-line order. Prices come from the nested customer price structure.
//!
//! The displayed catalog is fixed signage (names, premium flags, allergen
//! blurbs live in the frontend); this module carries the names it needs for
//! validation and premium detection.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{CustomerPrices, Size, PREMIUM_PREFIX};
use crate::composer::MealKind;
use crate::error::{PosError, PosResult};

// ---------------------------------------------------------------------------
// Kiosk catalog
// ---------------------------------------------------------------------------

pub const KIOSK_SIDES: &[&str] = &["Chow Mein", "White Rice", "Fried Rice", "Super Greens"];

/// Combo-builder entrées; the bool marks premium items.
pub const KIOSK_ENTREES: &[(&str, bool)] = &[
    ("Orange Chicken", false),
    ("Beijing Beef", false),
    ("Sweet Fire Chicken Breast", false),
    ("Broccoli Beef", false),
    ("Grilled Teriyaki Chicken", false),
    ("Black Pepper Steak", true),
    ("Mushroom Chicken Breast", false),
    ("Black Pepper Chicken", false),
    ("Sesame Chicken Breast", false),
    ("Bourbon Chicken", false),
    ("String Bean Chicken Breast", false),
    ("Honey Walnut Shrimp", true),
];

pub const KIOSK_APPETIZERS: &[&str] = &[
    "Chicken Egg Roll",
    "Veggie Spring Roll",
    "Cream Cheese Rangoon",
    "Apple Pie Roll",
];

pub const KIOSK_DRINKS: &[&str] = &["Fountain Drink", "Sweet Tea", "Bottled Water"];

/// Kiosk categories for sized single items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KioskCategory {
    ALaCarte,
    Appetizer,
    Drink,
}

impl KioskCategory {
    /// The meal-type tag the kiosk checkout puts on the wire.
    fn wire_tag(&self) -> &'static str {
        match self {
            KioskCategory::ALaCarte => "a la carte",
            KioskCategory::Appetizer => "appetizer",
            KioskCategory::Drink => "drink",
        }
    }
}

fn entree_premium_flag(name: &str) -> Option<bool> {
    KIOSK_ENTREES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, premium)| *premium)
}

// ---------------------------------------------------------------------------
// Combo builder
// ---------------------------------------------------------------------------

/// One guided combo in progress: a side and the combo kind's entrée count.
#[derive(Debug, Clone, Serialize)]
pub struct ComboBuilder {
    pub kind: MealKind,
    pub side: Option<String>,
    pub entrees: Vec<String>,
}

impl ComboBuilder {
    pub fn new(kind: MealKind) -> PosResult<Self> {
        if !kind.is_combo() {
            return Err(PosError::selection(format!(
                "{} is not a combo meal",
                kind.wire_name()
            )));
        }
        Ok(Self {
            kind,
            side: None,
            entrees: Vec::new(),
        })
    }

    fn entree_slots(&self) -> usize {
        match self.kind {
            MealKind::Bowl => 1,
            MealKind::Plate => 2,
            _ => 3,
        }
    }

    pub fn select_side(&mut self, name: &str) -> PosResult<()> {
        if !KIOSK_SIDES.contains(&name) {
            return Err(PosError::selection(format!("Unknown side: {name}")));
        }
        self.side = Some(name.to_string());
        Ok(())
    }

    /// Select an entrée. Premium entrées are stored with the premium marker,
    /// matching the names the backend's menu uses. Re-selecting an entrée
    /// deselects it; extra picks beyond the combo's slots are refused.
    pub fn select_entree(&mut self, name: &str) -> PosResult<()> {
        let premium = entree_premium_flag(name)
            .ok_or_else(|| PosError::selection(format!("Unknown entree: {name}")))?;
        let stored = if premium {
            format!("{PREMIUM_PREFIX}{name}")
        } else {
            name.to_string()
        };
        if let Some(pos) = self.entrees.iter().position(|e| *e == stored) {
            self.entrees.remove(pos);
            return Ok(());
        }
        if self.entrees.len() >= self.entree_slots() {
            return Err(PosError::selection(format!(
                "{} takes {} entree(s)",
                self.kind.wire_name(),
                self.entree_slots()
            )));
        }
        self.entrees.push(stored);
        Ok(())
    }

    /// Cardinality check mirroring the employee composer's combo rules.
    fn is_complete(&self) -> bool {
        self.side.is_some() && self.entrees.len() == self.entree_slots()
    }

    fn price(&self, prices: &CustomerPrices) -> f64 {
        let base = match self.kind {
            MealKind::Bowl => prices.combo.bowl,
            MealKind::Plate => prices.combo.plate,
            _ => prices.combo.bigger_plate,
        };
        let has_premium = self
            .entrees
            .iter()
            .any(|e| e.starts_with(PREMIUM_PREFIX));
        if has_premium {
            base + prices.combo.premium_upcharge
        } else {
            base
        }
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartLine {
    Combo {
        id: String,
        combo: MealKind,
        side: String,
        entrees: Vec<String>,
        price: f64,
    },
    Item {
        id: String,
        category: KioskCategory,
        name: String,
        size: Size,
        price: f64,
    },
}

impl CartLine {
    pub fn id(&self) -> &str {
        match self {
            CartLine::Combo { id, .. } | CartLine::Item { id, .. } => id,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            CartLine::Combo { price, .. } | CartLine::Item { price, .. } => *price,
        }
    }

    fn wire_item(&self) -> Value {
        match self {
            CartLine::Combo {
                combo,
                side,
                entrees,
                ..
            } => {
                let mut meal_items = vec![serde_json::json!({ "item_name": side })];
                meal_items.extend(
                    entrees
                        .iter()
                        .map(|e| serde_json::json!({ "item_name": e })),
                );
                serde_json::json!({
                    "meal_type": combo.wire_name().to_lowercase(),
                    "meal_items": meal_items,
                })
            }
            CartLine::Item { category, name, .. } => serde_json::json!({
                "meal_type": category.wire_tag(),
                "meal_items": [{ "item_name": name }],
            }),
        }
    }
}

/// The kiosk session: customer prices, the combo in progress, and the cart.
#[derive(Debug, Default)]
pub struct Kiosk {
    pub prices: CustomerPrices,
    pub builder: Option<ComboBuilder>,
    pub cart: Vec<CartLine>,
    submitting: bool,
}

impl Kiosk {
    pub fn load(&mut self, prices: CustomerPrices) {
        self.prices = prices;
    }

    fn ensure_idle(&self) -> PosResult<()> {
        if self.submitting {
            return Err(PosError::validation(
                "Order submission is in progress, please wait",
            ));
        }
        Ok(())
    }

    /// Start (or restart) the guided combo flow.
    pub fn start_combo(&mut self, kind: MealKind) -> PosResult<()> {
        self.ensure_idle()?;
        self.builder = Some(ComboBuilder::new(kind)?);
        Ok(())
    }

    pub fn cancel_combo(&mut self) {
        self.builder = None;
    }

    pub fn select_side(&mut self, name: &str) -> PosResult<()> {
        self.ensure_idle()?;
        self.builder
            .as_mut()
            .ok_or_else(|| PosError::selection("No combo in progress"))?
            .select_side(name)
    }

    pub fn select_entree(&mut self, name: &str) -> PosResult<()> {
        self.ensure_idle()?;
        self.builder
            .as_mut()
            .ok_or_else(|| PosError::selection("No combo in progress"))?
            .select_entree(name)
    }

    /// Confirm the combo in progress into the cart.
    pub fn confirm_combo(&mut self) -> PosResult<String> {
        self.ensure_idle()?;
        let builder = self
            .builder
            .as_ref()
            .ok_or_else(|| PosError::selection("No combo in progress"))?;
        if !builder.is_complete() {
            return Err(PosError::selection(format!(
                "{} needs 1 side and {} entree(s)",
                builder.kind.wire_name(),
                builder.entree_slots()
            )));
        }
        let price = builder.price(&self.prices);
        let builder = self.builder.take().expect("builder checked above");
        let id = Uuid::new_v4().to_string();
        self.cart.push(CartLine::Combo {
            id: id.clone(),
            combo: builder.kind,
            side: builder.side.expect("complete combo has a side"),
            entrees: builder.entrees,
            price,
        });
        Ok(id)
    }

    /// Add a sized single item (à la carte, appetizer, or drink).
    pub fn add_item(&mut self, category: KioskCategory, name: &str, size: Size) -> PosResult<String> {
        self.ensure_idle()?;
        let price = match category {
            KioskCategory::ALaCarte => {
                let premium = entree_premium_flag(name).or_else(|| {
                    // Sides are sold à la carte too, never premium.
                    KIOSK_SIDES.contains(&name).then_some(false)
                });
                let premium = premium
                    .ok_or_else(|| PosError::selection(format!("Unknown a la carte item: {name}")))?;
                if premium {
                    self.prices.a_la_carte.premium.for_size(size)
                } else {
                    self.prices.a_la_carte.regular.for_size(size)
                }
            }
            KioskCategory::Appetizer => {
                if !KIOSK_APPETIZERS.contains(&name) {
                    return Err(PosError::selection(format!("Unknown appetizer: {name}")));
                }
                if size == Size::Medium {
                    return Err(PosError::selection("Appetizers come in Small or Large"));
                }
                self.prices.appetizers.for_size(size)
            }
            KioskCategory::Drink => {
                if !KIOSK_DRINKS.contains(&name) {
                    return Err(PosError::selection(format!("Unknown drink: {name}")));
                }
                self.prices.drinks.for_size(size)
            }
        };
        let id = Uuid::new_v4().to_string();
        self.cart.push(CartLine::Item {
            id: id.clone(),
            category,
            name: name.to_string(),
            size,
            price,
        });
        Ok(id)
    }

    /// Remove one cart line by id. No-op when absent.
    pub fn remove_line(&mut self, id: &str) -> PosResult<()> {
        self.ensure_idle()?;
        self.cart.retain(|line| line.id() != id);
        Ok(())
    }

    /// Cart total, rounded to two decimals.
    pub fn total(&self) -> f64 {
        let total: f64 = self.cart.iter().map(CartLine::price).sum();
        (total * 100.0).round() / 100.0
    }

    /// Validate checkout preconditions, mark the session as submitting, and
    /// build the submit-order payload (kiosk orders carry no employee id).
    pub fn begin_checkout(&mut self, customer_name: &str, order_date: &str) -> PosResult<Value> {
        self.ensure_idle()?;
        if self.cart.is_empty() {
            return Err(PosError::validation("Your cart is empty"));
        }
        if customer_name.trim().is_empty() {
            return Err(PosError::validation("Please enter your name"));
        }

        let items: Vec<Value> = self.cart.iter().map(CartLine::wire_item).collect();
        let payload = serde_json::json!({
            "customer_name": customer_name,
            "order_date": order_date,
            "employee_id": Value::Null,
            "total_price": self.total(),
            "items": items,
        });
        self.submitting = true;
        Ok(payload)
    }

    pub fn finish_checkout_success(&mut self) {
        self.cart.clear();
        self.builder = None;
        self.submitting = false;
    }

    pub fn finish_checkout_failure(&mut self) {
        self.submitting = false;
    }

    /// Snapshot for the frontend.
    pub fn snapshot(&self) -> Value {
        serde_json::json!({
            "builder": self.builder,
            "cart": self.cart,
            "total": self.total(),
            "submitting": self.submitting,
        })
    }
}

/// Tauri managed state wrapper.
pub struct KioskState {
    pub inner: std::sync::Mutex<Kiosk>,
}

impl KioskState {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(Kiosk::default()),
        }
    }
}

impl Default for KioskState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Checkout weather note
// ---------------------------------------------------------------------------

/// Pick the checkout note for the current conditions: the cold message wins
/// below 65°F, clear skies (WMO codes 0/1) get their own line, anything from
/// overcast up reassures, and everything else falls back to the generic note.
pub fn checkout_note(temperature_f: f64, weather_code: i64) -> String {
    if temperature_f < 65.0 {
        format!(
            "It is chilly outside: {temperature_f} degrees. Good thing your food is always hot! Enjoy!"
        )
    } else if weather_code == 0 || weather_code == 1 {
        "What great weather to enjoy great food, clear skies and fresh food! What more could you want?!".to_string()
    } else if (3..=99).contains(&weather_code) {
        "Don't let grey skies keep you down, your food will surely turn that frown upside down. No matter the bad weather, this food is sure to brighten your day!".to_string()
    } else {
        "No matter the weather, your food will be great! Enjoy!".to_string()
    }
}

/// Fetch current conditions and derive the checkout note. Decoration only:
/// any failure yields `None` and checkout proceeds without it.
pub async fn fetch_checkout_note() -> Option<String> {
    const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast?latitude=30.628&longitude=-96.3344&current=temperature_2m,weather_code&hourly=temperature_2m&temperature_unit=fahrenheit&timezone=America%2FChicago";

    let resp = reqwest::get(FORECAST_URL).await.ok()?;
    let info = resp.json::<Value>().await.ok()?;
    let hour = chrono::Local::now().format("%H").to_string().parse::<usize>().ok()?;
    let temperature = info
        .get("hourly")?
        .get("temperature_2m")?
        .as_array()?
        .get(hour)?
        .as_f64()?;
    let weather_code = info.get("current")?.get("weather_code")?.as_i64()?;
    Some(checkout_note(temperature, weather_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_prices() -> CustomerPrices {
        serde_json::from_value(serde_json::json!({
            "Combo": {"Bowl": 8.5, "Plate": 10.0, "Bigger Plate": 11.5, "premiumUpcharge": 1.5},
            "A la Carte": {
                "regular": {"Small": 5.0, "Medium": 8.0, "Large": 10.5},
                "premium": {"Small": 6.5, "Medium": 11.0, "Large": 14.5}
            },
            "Appetizers": {"Small": 2.0, "Large": 8.0},
            "Drinks": {"Small": 2.1, "Medium": 2.3, "Large": 2.5}
        }))
        .unwrap()
    }

    fn kiosk() -> Kiosk {
        let mut k = Kiosk::default();
        k.load(test_prices());
        k
    }

    #[test]
    fn bowl_combo_prices_base_without_premium() {
        let mut k = kiosk();
        k.start_combo(MealKind::Bowl).unwrap();
        k.select_side("White Rice").unwrap();
        k.select_entree("Orange Chicken").unwrap();
        k.confirm_combo().unwrap();

        assert_eq!(k.cart.len(), 1);
        assert_eq!(k.cart[0].price(), 8.5);
    }

    #[test]
    fn premium_entree_adds_the_upcharge_once() {
        let mut k = kiosk();
        k.start_combo(MealKind::Plate).unwrap();
        k.select_side("Chow Mein").unwrap();
        k.select_entree("Black Pepper Steak").unwrap();
        k.select_entree("Honey Walnut Shrimp").unwrap();
        k.confirm_combo().unwrap();

        // Kiosk combos charge a single upcharge regardless of how many
        // premium entrées were picked.
        assert_eq!(k.cart[0].price(), 11.5);
        match &k.cart[0] {
            CartLine::Combo { entrees, .. } => {
                assert!(entrees.iter().all(|e| e.starts_with(PREMIUM_PREFIX)));
            }
            other => panic!("expected combo line, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_combo_is_refused() {
        let mut k = kiosk();
        k.start_combo(MealKind::BiggerPlate).unwrap();
        k.select_side("Fried Rice").unwrap();
        k.select_entree("Orange Chicken").unwrap();
        k.select_entree("Beijing Beef").unwrap();
        let err = k.confirm_combo().unwrap_err();
        assert_eq!(err.kind(), "selection");
        assert!(k.cart.is_empty());
    }

    #[test]
    fn entree_slots_are_bounded_and_reselect_deselects() {
        let mut k = kiosk();
        k.start_combo(MealKind::Bowl).unwrap();
        k.select_entree("Orange Chicken").unwrap();
        assert!(k.select_entree("Beijing Beef").is_err());

        // Re-selecting removes the pick, freeing the slot.
        k.select_entree("Orange Chicken").unwrap();
        k.select_entree("Beijing Beef").unwrap();
    }

    #[test]
    fn sized_items_price_by_category_size_and_premium() {
        let mut k = kiosk();
        k.add_item(KioskCategory::ALaCarte, "Orange Chicken", Size::Medium)
            .unwrap();
        k.add_item(KioskCategory::ALaCarte, "Honey Walnut Shrimp", Size::Small)
            .unwrap();
        k.add_item(KioskCategory::Appetizer, "Cream Cheese Rangoon", Size::Large)
            .unwrap();
        k.add_item(KioskCategory::Drink, "Sweet Tea", Size::Small)
            .unwrap();

        let prices: Vec<f64> = k.cart.iter().map(CartLine::price).collect();
        assert_eq!(prices, vec![8.0, 6.5, 8.0, 2.1]);
        assert_eq!(k.total(), 24.6);
    }

    #[test]
    fn appetizers_have_no_medium_size() {
        let mut k = kiosk();
        let err = k
            .add_item(KioskCategory::Appetizer, "Chicken Egg Roll", Size::Medium)
            .unwrap_err();
        assert_eq!(err.kind(), "selection");
    }

    #[test]
    fn remove_line_removes_exactly_one() {
        let mut k = kiosk();
        let a = k
            .add_item(KioskCategory::Drink, "Sweet Tea", Size::Small)
            .unwrap();
        let b = k
            .add_item(KioskCategory::Drink, "Bottled Water", Size::Large)
            .unwrap();
        k.remove_line(&a).unwrap();
        assert_eq!(k.cart.len(), 1);
        assert_eq!(k.cart[0].id(), b);
        k.remove_line("not-a-line").unwrap();
        assert_eq!(k.cart.len(), 1);
    }

    #[test]
    fn checkout_payload_uses_kiosk_wire_tags() {
        let mut k = kiosk();
        k.start_combo(MealKind::BiggerPlate).unwrap();
        k.select_side("White Rice").unwrap();
        k.select_entree("Orange Chicken").unwrap();
        k.select_entree("Beijing Beef").unwrap();
        k.select_entree("Broccoli Beef").unwrap();
        k.confirm_combo().unwrap();
        k.add_item(KioskCategory::Appetizer, "Apple Pie Roll", Size::Small)
            .unwrap();
        k.add_item(KioskCategory::Drink, "Fountain Drink", Size::Large)
            .unwrap();

        let payload = k.begin_checkout("Jordan", "2024-02-10T10:00:00Z").unwrap();
        assert!(payload["employee_id"].is_null());
        let tags: Vec<&str> = payload["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["meal_type"].as_str().unwrap())
            .collect();
        assert_eq!(tags, vec!["bigger plate", "appetizer", "drink"]);

        // Combo meal_items lead with the side.
        let first = payload["items"][0]["meal_items"].as_array().unwrap();
        assert_eq!(first[0]["item_name"], "White Rice");
    }

    #[test]
    fn checkout_requires_cart_and_name() {
        let mut k = kiosk();
        assert_eq!(
            k.begin_checkout("Jordan", "2024-02-10T10:00:00Z")
                .unwrap_err()
                .kind(),
            "validation"
        );

        k.add_item(KioskCategory::Drink, "Sweet Tea", Size::Small)
            .unwrap();
        assert_eq!(
            k.begin_checkout("  ", "2024-02-10T10:00:00Z")
                .unwrap_err()
                .kind(),
            "validation"
        );
    }

    #[test]
    fn failed_checkout_keeps_the_cart() {
        let mut k = kiosk();
        k.add_item(KioskCategory::Drink, "Sweet Tea", Size::Small)
            .unwrap();
        k.begin_checkout("Jordan", "2024-02-10T10:00:00Z").unwrap();

        // While in flight, mutations are refused.
        assert!(k
            .add_item(KioskCategory::Drink, "Sweet Tea", Size::Small)
            .is_err());

        k.finish_checkout_failure();
        assert_eq!(k.cart.len(), 1);

        k.begin_checkout("Jordan", "2024-02-10T10:00:00Z").unwrap();
        k.finish_checkout_success();
        assert!(k.cart.is_empty());
    }

    #[test]
    fn checkout_note_buckets() {
        assert!(checkout_note(50.0, 0).contains("chilly"));
        assert!(checkout_note(70.0, 1).contains("clear skies"));
        assert!(checkout_note(70.0, 61).contains("grey skies"));
        assert!(checkout_note(70.0, 2).contains("No matter the weather"));
    }
}
