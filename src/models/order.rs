use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-ingredient purchasing metadata, keyed by ingredient id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMeta {
    pub supplier: String,

    #[serde(default)]
    pub pack_size_g: Option<f64>,

    /// Pack size as found in older metadata tables.
    #[serde(default)]
    pub pack_size_kg: Option<f64>,

    /// Trimming loss in percent of the purchased mass.
    #[serde(default)]
    pub waste_pct: Option<f64>,

    pub shelf_life_days: u32,

    #[serde(default)]
    pub allergens: Vec<String>,
}

impl IngredientMeta {
    /// Pack size in grams, from either unit. Non-positive sizes count as unknown.
    pub fn pack_size(&self) -> Option<f64> {
        self.pack_size_g
            .or(self.pack_size_kg.map(|kg| kg * 1000.0))
            .filter(|g| *g > 0.0)
    }

    /// Yield factor implied by the waste percentage.
    pub fn yield_factor(&self) -> Option<f64> {
        self.waste_pct.map(|pct| 1.0 - pct / 100.0)
    }
}

pub type IngredientMetaTable = HashMap<String, IngredientMeta>;

/// Accumulated weekly demand for one ingredient, before rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientDemand {
    pub ingredient_id: String,
    pub name: String,
    pub supplier: String,
    /// Edible grams.
    pub net_g: f64,
    /// Purchase grams (net divided by yield).
    pub gross_g: f64,
    pub pack_size_g: Option<f64>,
    pub shelf_life_days: u32,
    pub first_use: NaiveDate,
    /// Allergen labels declared for the purchased product.
    pub allergens: Vec<String>,
}

/// Days the suppliers deliver on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeliveryDay {
    Monday,
    Wednesday,
    Friday,
}

impl DeliveryDay {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryDay::Monday => "Mon",
            DeliveryDay::Wednesday => "Wed",
            DeliveryDay::Friday => "Fri",
        }
    }
}

impl fmt::Display for DeliveryDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderNote {
    FreezeOnArrival,
}

impl OrderNote {
    pub fn text(&self) -> &'static str {
        match self {
            OrderNote::FreezeOnArrival => "freeze on arrival",
        }
    }
}

/// Final, rounded purchase line for one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub ingredient_id: String,
    pub name: String,
    pub supplier: String,
    pub net_g: f64,
    pub gross_g: f64,
    /// Gross requirement after any shelf-life buffer.
    pub required_g: f64,
    pub pack_size_g: Option<f64>,
    pub packs: Option<u32>,
    pub order_qty_g: f64,
    pub first_use: NaiveDate,
    pub delivery_day: DeliveryDay,
    pub note: Option<OrderNote>,
    pub allergens: Vec<String>,
}

impl OrderLine {
    /// Grams bought beyond the requirement.
    pub fn surplus_g(&self) -> f64 {
        (self.order_qty_g - self.required_g).max(0.0)
    }
}
