//! Meal traffic light: per-person calories of one meal against its target.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{AmpelConfig, AmpelThresholds};
use crate::error::Result;
use crate::models::{DayPlan, Dish, MealType, PersonsByGroup};
use crate::planner::calculations::recipe_total_kcal;
use crate::state::Catalogue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AmpelColor {
    Green,
    Yellow,
    Red,
    /// Nothing planned yet.
    Neutral,
}

impl AmpelColor {
    pub fn label(&self) -> &'static str {
        match self {
            AmpelColor::Green => "green",
            AmpelColor::Yellow => "yellow",
            AmpelColor::Red => "red",
            AmpelColor::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Warning,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub kind: NoteKind,
    pub text: String,
}

impl Note {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoteKind::Warning,
            text: text.into(),
        }
    }

    pub fn suggestion(text: impl Into<String>) -> Self {
        Self {
            kind: NoteKind::Suggestion,
            text: text.into(),
        }
    }
}

/// Result of evaluating one meal occasion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealBalanceReport {
    pub per_person_kcal: f64,
    pub target_kcal: f64,
    pub ratio: f64,
    /// `|1 - ratio|`.
    pub deviation: f64,
    /// Signed deviation in percent, negative when below target.
    pub deviation_pct: f64,
    pub color: AmpelColor,
    pub notes: Vec<Note>,
}

impl MealBalanceReport {
    pub fn neutral(target_kcal: f64) -> Self {
        Self {
            per_person_kcal: 0.0,
            target_kcal,
            ratio: 1.0,
            deviation: 0.0,
            deviation_pct: 0.0,
            color: AmpelColor::Neutral,
            notes: Vec::new(),
        }
    }
}

/// Map a relative deviation onto the traffic light.
pub fn classify(deviation: f64, thresholds: &AmpelThresholds) -> AmpelColor {
    if deviation <= thresholds.green {
        AmpelColor::Green
    } else if deviation <= thresholds.yellow {
        AmpelColor::Yellow
    } else {
        AmpelColor::Red
    }
}

fn summary_note(color: AmpelColor) -> Option<Note> {
    match color {
        AmpelColor::Green => Some(Note::suggestion("Calorie target met.")),
        AmpelColor::Yellow => Some(Note::warning("Calorie target slightly missed.")),
        AmpelColor::Red => Some(Note::warning("Calorie target significantly missed.")),
        AmpelColor::Neutral => None,
    }
}

/// Evaluate a set of dishes served to one diner mix against a per-person target.
pub fn evaluate_meal(
    dishes: &[&Dish],
    persons: &PersonsByGroup,
    target_kcal: f64,
    thresholds: &AmpelThresholds,
) -> Result<MealBalanceReport> {
    let diners = persons.total();
    if dishes.is_empty() || diners == 0 {
        return Ok(MealBalanceReport::neutral(target_kcal));
    }

    // Same dish twice yields the same warning once.
    let mut warnings = BTreeSet::new();
    let mut total_kcal = 0.0;
    for dish in dishes {
        let (kcal, dish_warnings) = recipe_total_kcal(dish, persons)?;
        total_kcal += kcal;
        warnings.extend(dish_warnings);
    }

    let per_person_kcal = total_kcal / diners as f64;
    let ratio = if target_kcal > 0.0 {
        per_person_kcal / target_kcal
    } else {
        1.0
    };
    let deviation = (1.0 - ratio).abs();
    let color = classify(deviation, thresholds);

    let mut notes: Vec<Note> = summary_note(color).into_iter().collect();
    notes.extend(warnings.into_iter().map(Note::warning));

    Ok(MealBalanceReport {
        per_person_kcal,
        target_kcal,
        ratio,
        deviation,
        deviation_pct: (ratio - 1.0) * 100.0,
        color,
        notes,
    })
}

/// Evaluate a meal against the configured target for its meal type.
pub fn evaluate_meal_type(
    meal: MealType,
    dishes: &[&Dish],
    persons: &PersonsByGroup,
    config: &AmpelConfig,
) -> Result<MealBalanceReport> {
    evaluate_meal(dishes, persons, config.target_for(meal), &config.thresholds)
}

/// Evaluate one meal of a planned day. Unresolved references are ignored.
pub fn evaluate_day_meal(
    day: &DayPlan,
    meal: MealType,
    catalogue: &Catalogue,
    config: &AmpelConfig,
) -> Result<MealBalanceReport> {
    let dishes = catalogue.resolve_all(day.meal_refs(meal));
    evaluate_meal_type(meal, &dishes, &day.persons, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodGroup, Nutrition, PopulationGroup, PortionSpec};

    fn dish(id: &str, kcal: f64) -> Dish {
        Dish {
            id: id.to_string(),
            name: id.to_string(),
            allergens: Vec::new(),
            food_group: FoodGroup::Protein,
            whole_grain: false,
            source_category: "meat".to_string(),
            nutrition: Nutrition::PerPortion {
                kcal_per_portion: kcal,
                protein_per_portion: 0.0,
                fat_per_portion: 0.0,
                base_portion_g: Some(300.0),
            },
            portion: PortionSpec::base_only(300.0).with_group(PopulationGroup::Adults, 300.0),
            ingredients: Vec::new(),
        }
    }

    #[test]
    fn test_classify_boundaries() {
        let t = AmpelThresholds::default();
        assert_eq!(classify(0.0, &t), AmpelColor::Green);
        assert_eq!(classify(0.10, &t), AmpelColor::Green);
        assert_eq!(classify(0.11, &t), AmpelColor::Yellow);
        assert_eq!(classify(0.25, &t), AmpelColor::Yellow);
        assert_eq!(classify(0.26, &t), AmpelColor::Red);
    }

    #[test]
    fn test_empty_meal_is_neutral() {
        let report =
            evaluate_meal(&[], &PersonsByGroup::adults_only(10), 900.0, &Default::default())
                .unwrap();
        assert_eq!(report.color, AmpelColor::Neutral);
        assert_eq!(report.ratio, 1.0);
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_zero_diners_is_neutral() {
        let d = dish("a", 500.0);
        let report =
            evaluate_meal(&[&d], &PersonsByGroup::default(), 900.0, &Default::default()).unwrap();
        assert_eq!(report.color, AmpelColor::Neutral);
        assert_eq!(report.deviation, 0.0);
    }

    #[test]
    fn test_per_person_sums_dishes() {
        let soup = dish("soup", 200.0);
        let main = dish("main", 700.0);
        let report = evaluate_meal(
            &[&soup, &main],
            &PersonsByGroup::adults_only(4),
            900.0,
            &Default::default(),
        )
        .unwrap();
        assert!((report.per_person_kcal - 900.0).abs() < 1e-9);
        assert_eq!(report.color, AmpelColor::Green);
        assert_eq!(report.notes, vec![Note::suggestion("Calorie target met.")]);
    }

    #[test]
    fn test_zero_target_counts_as_met() {
        let d = dish("a", 500.0);
        let report =
            evaluate_meal(&[&d], &PersonsByGroup::adults_only(1), 0.0, &Default::default())
                .unwrap();
        assert_eq!(report.ratio, 1.0);
        assert_eq!(report.color, AmpelColor::Green);
    }
}
