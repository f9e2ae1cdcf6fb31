use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::FoodGroup;

// ─────────────────────────────────────────────────────────────────────────────
// Daily targets for a 62kg resident
// ─────────────────────────────────────────────────────────────────────────────

pub const DAILY_KCAL_MIN: f64 = 1700.0;
pub const DAILY_KCAL_MAX: f64 = 2000.0;

/// 1.0-1.2g protein per kg body mass.
pub const DAILY_PROTEIN_MIN_G: f64 = 62.0;
pub const DAILY_PROTEIN_MAX_G: f64 = 74.0;

/// Maximum share of energy from fat.
pub const DAILY_FAT_SHARE_MAX: f64 = 0.40;

pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of the daily energy planned for lunch; dinner gets the rest.
pub const LUNCH_SHARE: f64 = 0.6;

/// Per-person lunch target: 60% of the daily mean (1850 kcal).
pub const LUNCH_TARGET_KCAL: f64 = 1110.0;

/// Per-person dinner target: 40% of the daily mean.
pub const DINNER_TARGET_KCAL: f64 = 740.0;

// ─────────────────────────────────────────────────────────────────────────────
// Ampel thresholds (relative deviation from target)
// ─────────────────────────────────────────────────────────────────────────────

pub const AMPEL_GREEN_THRESHOLD: f64 = 0.10;
pub const AMPEL_YELLOW_THRESHOLD: f64 = 0.25;

// ─────────────────────────────────────────────────────────────────────────────
// Food-group goals per day
// ─────────────────────────────────────────────────────────────────────────────

pub const DAILY_VEG_FRUIT_GOAL: u32 = 5;
pub const DAILY_STARCH_GOAL: u32 = 3;
pub const DAILY_PROTEIN_DISH_GOAL: u32 = 1;
pub const DAILY_DAIRY_GOAL: u32 = 3;
pub const DAILY_WHOLE_GRAIN_GOAL: u32 = 1;

/// Advisor: starch dishes already chosen before a further one is discouraged.
pub const ADVISOR_STARCH_LIMIT: u32 = 2;

/// Advisor: protein dishes already chosen before a further one is downgraded.
pub const ADVISOR_PROTEIN_LIMIT: u32 = 2;

/// Advisor: veg+fruit count below which vegetable/fruit dishes are encouraged.
pub const ADVISOR_VEG_FRUIT_TARGET: u32 = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Weekly plan defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_DINERS_PER_DAY: u32 = 120;

/// Estimated diners choosing the lunch hit on each day it is offered.
pub const HIT_LUNCH_DINERS_PER_DAY: f64 = 20.0;

/// Estimated diners choosing a dinner hit per day, across all dinner hits.
pub const HIT_DINNER_DINERS_PER_DAY: f64 = 15.0;

/// Days covered by the first lunch hit (Mon-Wed).
pub const HIT_LUNCH_EARLY_DAYS: u32 = 3;

/// Days covered by the second lunch hit (Thu-Sun).
pub const HIT_LUNCH_LATE_DAYS: u32 = 4;

pub const HIT_DINNER_DAYS: u32 = 7;

// ─────────────────────────────────────────────────────────────────────────────
// Ordering
// ─────────────────────────────────────────────────────────────────────────────

/// Ingredients keeping fewer days than this are buffered and frozen.
pub const SHORT_SHELF_LIFE_DAYS: u32 = 3;

pub const SHORT_SHELF_LIFE_BUFFER: f64 = 1.05;

/// Tiered rounding: (upper bound in grams, step in grams), checked in order.
pub const ROUNDING_TIERS_G: [(f64, f64); 3] = [(100.0, 10.0), (1000.0, 500.0), (10_000.0, 1000.0)];

/// Step above the last tier.
pub const ROUNDING_TOP_STEP_G: f64 = 5000.0;

pub const UNKNOWN_SUPPLIER: &str = "unknown";

// ─────────────────────────────────────────────────────────────────────────────
// Loader defaults for records without portion data
// ─────────────────────────────────────────────────────────────────────────────

pub const FALLBACK_BASE_PORTION_G: f64 = 300.0;

/// Senior portion relative to the base portion.
pub const SENIOR_PORTION_RATIO: f64 = 0.87;

/// Child portion relative to the base portion.
pub const CHILD_PORTION_RATIO: f64 = 0.67;

/// Typical base portion per food group, used for records without one.
pub static BASE_PORTION_ESTIMATES_G: LazyLock<HashMap<FoodGroup, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(FoodGroup::Protein, 150.0);
    m.insert(FoodGroup::Dairy, 150.0);
    m.insert(FoodGroup::Vegetable, 150.0);
    m.insert(FoodGroup::Fruit, 120.0);
    m.insert(FoodGroup::Starch, 200.0);
    m.insert(FoodGroup::FatOil, 10.0);
    m.insert(FoodGroup::Dessert, 120.0);
    m.insert(FoodGroup::Soup, 250.0);
    m
});

/// Base portion estimate for a food group.
pub fn base_portion_estimate(group: FoodGroup) -> f64 {
    *BASE_PORTION_ESTIMATES_G
        .get(&group)
        .unwrap_or(&FALLBACK_BASE_PORTION_G)
}
