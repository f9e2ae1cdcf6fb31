use serde::Serialize;

use crate::config::DailyTargets;
use crate::error::Result;
use crate::models::{Dish, FoodGroup, PersonsByGroup};
use crate::planner::calculations::dish_energy;
use crate::planner::constants::KCAL_PER_G_FAT;

/// How many dishes of each relevant food group a day contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FoodGroupCounts {
    pub vegetable: u32,
    pub fruit: u32,
    pub starch: u32,
    pub protein: u32,
    pub dairy: u32,
    pub whole_grain: u32,
}

impl FoodGroupCounts {
    pub fn from_dishes<'a>(dishes: impl IntoIterator<Item = &'a Dish>) -> Self {
        let mut counts = Self::default();
        for dish in dishes {
            match dish.food_group {
                FoodGroup::Vegetable => counts.vegetable += 1,
                FoodGroup::Fruit => counts.fruit += 1,
                FoodGroup::Starch => counts.starch += 1,
                FoodGroup::Protein => counts.protein += 1,
                FoodGroup::Dairy => counts.dairy += 1,
                _ => {}
            }
            if dish.whole_grain {
                counts.whole_grain += 1;
            }
        }
        counts
    }

    pub fn veg_fruit(&self) -> u32 {
        self.vegetable + self.fruit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Good,
    Average,
    Bad,
    Neutral,
}

/// Whole-day check of per-person nutrition and food-group goals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayNutritionReport {
    pub per_person_kcal: f64,
    pub per_person_protein_g: f64,
    /// Share of energy from fat, 0..1.
    pub fat_share: f64,
    pub counts: FoodGroupCounts,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

const BALANCED: &str = "The day looks balanced.";

impl DayNutritionReport {
    fn empty() -> Self {
        Self {
            per_person_kcal: 0.0,
            per_person_protein_g: 0.0,
            fat_share: 0.0,
            counts: FoodGroupCounts::default(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn status(&self) -> DayStatus {
        if !self.warnings.is_empty() {
            DayStatus::Bad
        } else if self.suggestions.iter().any(|s| s == BALANCED) {
            DayStatus::Good
        } else if !self.suggestions.is_empty() {
            DayStatus::Average
        } else {
            DayStatus::Neutral
        }
    }
}

/// Evaluate a whole day (lunch and dinner) for one diner mix.
///
/// An empty day or a day without diners yields an empty, neutral report.
pub fn evaluate_day(
    lunch: &[&Dish],
    dinner: &[&Dish],
    persons: &PersonsByGroup,
    targets: &DailyTargets,
) -> Result<DayNutritionReport> {
    let diners = persons.total();
    if (lunch.is_empty() && dinner.is_empty()) || diners == 0 {
        return Ok(DayNutritionReport::empty());
    }

    let mut kcal = 0.0;
    let mut protein = 0.0;
    let mut fat = 0.0;
    for dish in lunch.iter().chain(dinner) {
        let energy = dish_energy(dish, persons)?;
        kcal += energy.kcal;
        protein += energy.protein_g;
        fat += energy.fat_g;
    }

    let n = diners as f64;
    let per_person_kcal = kcal / n;
    let per_person_protein_g = protein / n;
    let fat_share = if kcal > 0.0 {
        fat * KCAL_PER_G_FAT / kcal
    } else {
        0.0
    };

    let mut warnings = Vec::new();
    if per_person_kcal < targets.kcal_min {
        warnings.push(format!(
            "Calorie goal (min. {:.0}) not reached. Currently: ~{:.0} kcal.",
            targets.kcal_min, per_person_kcal
        ));
    }
    if per_person_kcal > targets.kcal_max {
        warnings.push(format!(
            "Calorie goal (max. {:.0}) exceeded. Currently: ~{:.0} kcal.",
            targets.kcal_max, per_person_kcal
        ));
    }
    if per_person_protein_g < targets.protein_min_g {
        warnings.push(format!(
            "Protein goal (min. {:.0}g) not reached. Currently: ~{:.0}g.",
            targets.protein_min_g, per_person_protein_g
        ));
    }
    if per_person_protein_g > targets.protein_max_g {
        warnings.push(format!(
            "Protein goal (max. {:.0}g) exceeded. Currently: ~{:.0}g.",
            targets.protein_max_g, per_person_protein_g
        ));
    }
    if fat_share > targets.fat_share_max {
        warnings.push(format!(
            "Fat share above {:.0}%.",
            targets.fat_share_max * 100.0
        ));
    }

    let counts = FoodGroupCounts::from_dishes(lunch.iter().chain(dinner).copied());
    let mut suggestions = Vec::new();
    if counts.veg_fruit() < targets.veg_fruit {
        suggestions.push(format!(
            "Vegetable/fruit goal ({}) not reached. Currently: {}.",
            targets.veg_fruit,
            counts.veg_fruit()
        ));
    }
    if counts.starch < targets.starch {
        suggestions.push(format!(
            "Too few starch sides (goal: {}). Currently: {}.",
            targets.starch, counts.starch
        ));
    }
    if counts.protein < targets.protein_dishes {
        suggestions.push("Protein source (meat/fish/etc.) missing or too small.".to_string());
    }
    if counts.dairy < targets.dairy {
        suggestions.push(format!(
            "Too few dairy products (goal: {}). Currently: {}.",
            targets.dairy, counts.dairy
        ));
    }
    if counts.whole_grain < targets.whole_grain {
        suggestions.push("One whole-grain portion per day is recommended.".to_string());
    }

    if warnings.is_empty() && suggestions.is_empty() {
        suggestions.push(BALANCED.to_string());
    }

    Ok(DayNutritionReport {
        per_person_kcal,
        per_person_protein_g,
        fat_share,
        counts,
        warnings,
        suggestions,
    })
}
