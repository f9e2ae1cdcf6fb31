use tracing::debug;

use crate::error::{MenuError, Result};
use crate::models::{Dish, Nutrition, PersonsByGroup, PopulationGroup};

/// Nutrients the calculator can scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Kcal,
    Protein,
    Fat,
}

impl Nutrition {
    /// Density (per 100g) or absolute amount (per portion) of a nutrient.
    fn amount(&self, nutrient: Nutrient) -> f64 {
        match (self, nutrient) {
            (Nutrition::Per100g { kcal_per_100g, .. }, Nutrient::Kcal) => *kcal_per_100g,
            (Nutrition::Per100g { protein_per_100g, .. }, Nutrient::Protein) => *protein_per_100g,
            (Nutrition::Per100g { fat_per_100g, .. }, Nutrient::Fat) => *fat_per_100g,
            (Nutrition::PerPortion { kcal_per_portion, .. }, Nutrient::Kcal) => *kcal_per_portion,
            (Nutrition::PerPortion { protein_per_portion, .. }, Nutrient::Protein) => {
                *protein_per_portion
            }
            (Nutrition::PerPortion { fat_per_portion, .. }, Nutrient::Fat) => *fat_per_portion,
        }
    }
}

/// Amount of a nutrient delivered by exactly `portion_g` grams.
///
/// Per-portion values are scaled against the declared base mass, or against
/// `fallback_base_g` when the dish declares none. A zero base is an error.
pub fn nutrient_for_portion(
    nutrition: &Nutrition,
    nutrient: Nutrient,
    portion_g: f64,
    fallback_base_g: f64,
) -> Result<f64> {
    match nutrition {
        Nutrition::Per100g { .. } => Ok(nutrition.amount(nutrient) * (portion_g / 100.0)),
        Nutrition::PerPortion { base_portion_g, .. } => {
            let base = base_portion_g.unwrap_or(fallback_base_g);
            if base <= 0.0 {
                return Err(MenuError::DivisionByZero(format!(
                    "per-portion nutrition with base portion {base}g"
                )));
            }
            Ok(nutrition.amount(nutrient) * (portion_g / base))
        }
    }
}

pub fn kcal_for_portion(nutrition: &Nutrition, portion_g: f64, fallback_base_g: f64) -> Result<f64> {
    nutrient_for_portion(nutrition, Nutrient::Kcal, portion_g, fallback_base_g)
}

pub fn protein_for_portion(
    nutrition: &Nutrition,
    portion_g: f64,
    fallback_base_g: f64,
) -> Result<f64> {
    nutrient_for_portion(nutrition, Nutrient::Protein, portion_g, fallback_base_g)
}

pub fn fat_for_portion(nutrition: &Nutrition, portion_g: f64, fallback_base_g: f64) -> Result<f64> {
    nutrient_for_portion(nutrition, Nutrient::Fat, portion_g, fallback_base_g)
}

/// Warning recorded when a group is served the base portion.
pub fn default_portion_warning(dish: &Dish, group: PopulationGroup) -> String {
    format!(
        "\"{}\" uses the default portion size for group \"{}\".",
        dish.name, group
    )
}

/// Energy delivered by one dish to a whole diner mix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishEnergy {
    pub kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    /// Groups that fell back to the base portion.
    pub warnings: Vec<String>,
}

/// Total energy a dish delivers to `persons`.
///
/// Each group with diners eats its own portion mass; a missing override is
/// served the base portion and noted in `warnings`. Linear in the counts.
pub fn dish_energy(dish: &Dish, persons: &PersonsByGroup) -> Result<DishEnergy> {
    let base_g = dish.base_portion_g();
    let mut energy = DishEnergy::default();

    for (group, count) in persons.iter() {
        if count == 0 {
            continue;
        }

        let (portion_g, defaulted) = dish.portion.resolve(group);
        if defaulted {
            debug!(dish = %dish.id, %group, "no portion override, using base portion");
            energy.warnings.push(default_portion_warning(dish, group));
        }

        let n = count as f64;
        energy.kcal += n * kcal_for_portion(&dish.nutrition, portion_g, base_g)?;
        energy.protein_g += n * protein_for_portion(&dish.nutrition, portion_g, base_g)?;
        energy.fat_g += n * fat_for_portion(&dish.nutrition, portion_g, base_g)?;
    }

    Ok(energy)
}

/// Total kcal of a dish for a diner mix, with the portion warnings collected.
pub fn recipe_total_kcal(dish: &Dish, persons: &PersonsByGroup) -> Result<(f64, Vec<String>)> {
    let energy = dish_energy(dish, persons)?;
    Ok((energy.kcal, energy.warnings))
}

/// Sum of portion grams served to a diner mix, with portion warnings.
///
/// Groups without diners are not resolved and never warn.
pub fn served_grams(dish: &Dish, persons: &PersonsByGroup) -> (f64, Vec<String>) {
    let mut warnings = Vec::new();
    let total = persons
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(group, count)| {
            let (portion_g, defaulted) = dish.portion.resolve(group);
            if defaulted {
                warnings.push(default_portion_warning(dish, group));
            }
            count as f64 * portion_g
        })
        .sum();
    (total, warnings)
}
