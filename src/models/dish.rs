use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Population groups with their own standard portion mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PopulationGroup {
    #[serde(rename = "adults", alias = "erwachsene")]
    Adults,
    #[serde(rename = "seniors", alias = "senioren")]
    Seniors,
    #[serde(rename = "children", alias = "kinder")]
    Children,
}

impl PopulationGroup {
    pub const ALL: [PopulationGroup; 3] = [
        PopulationGroup::Adults,
        PopulationGroup::Seniors,
        PopulationGroup::Children,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PopulationGroup::Adults => "adults",
            PopulationGroup::Seniors => "seniors",
            PopulationGroup::Children => "children",
        }
    }
}

impl fmt::Display for PopulationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Diner counts for one meal occasion. Always carries all three groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonsByGroup {
    #[serde(default, alias = "erwachsene")]
    pub adults: u32,
    #[serde(default, alias = "senioren")]
    pub seniors: u32,
    #[serde(default, alias = "kinder")]
    pub children: u32,
}

impl PersonsByGroup {
    pub fn new(adults: u32, seniors: u32, children: u32) -> Self {
        Self {
            adults,
            seniors,
            children,
        }
    }

    /// Mix with every diner counted as an adult.
    pub fn adults_only(count: u32) -> Self {
        Self::new(count, 0, 0)
    }

    pub fn get(&self, group: PopulationGroup) -> u32 {
        match group {
            PopulationGroup::Adults => self.adults,
            PopulationGroup::Seniors => self.seniors,
            PopulationGroup::Children => self.children,
        }
    }

    pub fn total(&self) -> u32 {
        self.adults + self.seniors + self.children
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// (group, count) pairs in fixed group order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (PopulationGroup, u32)> + '_ {
        PopulationGroup::ALL.into_iter().map(|g| (g, self.get(g)))
    }
}

/// Food-group classification of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    Protein,
    Dairy,
    Vegetable,
    Fruit,
    Starch,
    FatOil,
    Dessert,
    #[serde(alias = "suppe")]
    Soup,
}

impl FoodGroup {
    pub fn label(&self) -> &'static str {
        match self {
            FoodGroup::Protein => "protein",
            FoodGroup::Dairy => "dairy",
            FoodGroup::Vegetable => "vegetable",
            FoodGroup::Fruit => "fruit",
            FoodGroup::Starch => "starch",
            FoodGroup::FatOil => "fat_oil",
            FoodGroup::Dessert => "dessert",
            FoodGroup::Soup => "soup",
        }
    }
}

/// Closed allergen vocabulary (EU 14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allergen {
    Gluten,
    Milk,
    Egg,
    Soy,
    Nuts,
    Peanuts,
    Fish,
    Crustaceans,
    Celery,
    Mustard,
    Sesame,
    Lupin,
    Sulphites,
    Molluscs,
}

impl Allergen {
    /// Parse a label from the vocabulary or from the German kitchen labels.
    pub fn from_label(label: &str) -> Option<Allergen> {
        let allergen = match label.trim() {
            "Gluten" => Allergen::Gluten,
            "Milch" => Allergen::Milk,
            "Eier" => Allergen::Egg,
            "Soja" => Allergen::Soy,
            "Nüsse" => Allergen::Nuts,
            "Erdnüsse" => Allergen::Peanuts,
            "Fisch" => Allergen::Fish,
            "Krebstiere" => Allergen::Crustaceans,
            "Sellerie" => Allergen::Celery,
            "Senf" => Allergen::Mustard,
            "Sesam" => Allergen::Sesame,
            "Lupine" => Allergen::Lupin,
            "Schwefeldioxid" | "Schwefeldioxid/Sulphite" => Allergen::Sulphites,
            "Weichtiere" => Allergen::Molluscs,
            other => match other.to_lowercase().as_str() {
                "gluten" => Allergen::Gluten,
                "milk" => Allergen::Milk,
                "egg" => Allergen::Egg,
                "soy" => Allergen::Soy,
                "nuts" => Allergen::Nuts,
                "peanuts" => Allergen::Peanuts,
                "fish" => Allergen::Fish,
                "crustaceans" => Allergen::Crustaceans,
                "celery" => Allergen::Celery,
                "mustard" => Allergen::Mustard,
                "sesame" => Allergen::Sesame,
                "lupin" => Allergen::Lupin,
                "sulphites" => Allergen::Sulphites,
                "molluscs" => Allergen::Molluscs,
                _ => return None,
            },
        };
        Some(allergen)
    }
}

/// Energy specification of a dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Nutrition {
    #[serde(rename = "PER_100G", rename_all = "camelCase")]
    Per100g {
        kcal_per_100g: f64,
        #[serde(default)]
        protein_per_100g: f64,
        #[serde(default)]
        fat_per_100g: f64,
        #[serde(default)]
        carbs_per_100g: f64,
    },
    #[serde(rename = "PER_PORTION", rename_all = "camelCase")]
    PerPortion {
        kcal_per_portion: f64,
        #[serde(default)]
        protein_per_portion: f64,
        #[serde(default)]
        fat_per_portion: f64,
        /// Mass of the portion the absolute values refer to.
        #[serde(default, rename = "basePortionG")]
        base_portion_g: Option<f64>,
    },
}

/// Base portion mass plus explicit per-group overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionSpec {
    #[serde(rename = "basePortionG")]
    pub base_portion_g: f64,

    #[serde(rename = "portionGByGroup", default)]
    pub by_group: BTreeMap<PopulationGroup, f64>,
}

impl PortionSpec {
    /// Spec without any group override.
    pub fn base_only(base_portion_g: f64) -> Self {
        Self {
            base_portion_g,
            by_group: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: PopulationGroup, grams: f64) -> Self {
        self.by_group.insert(group, grams);
        self
    }

    /// Portion mass for a group, or `None` when the group has no override.
    pub fn explicit(&self, group: PopulationGroup) -> Option<f64> {
        self.by_group.get(&group).copied()
    }

    /// Portion mass for a group and whether the base mass was substituted.
    pub fn resolve(&self, group: PopulationGroup) -> (f64, bool) {
        match self.explicit(group) {
            Some(grams) => (grams, false),
            None => (self.base_portion_g, true),
        }
    }
}

/// One ingredient of a dish, quantified per base portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    pub ingredient_id: String,

    pub name: String,

    /// Edible grams needed for one base portion of the dish.
    #[serde(rename = "qtyPerBasePortionG")]
    pub qty_per_base_portion_g: f64,

    /// Edible:purchased ratio in (0, 1].
    #[serde(rename = "yield", default = "default_yield")]
    pub yield_factor: f64,

    #[serde(rename = "packSizeG", default)]
    pub pack_size_g: Option<f64>,

    /// Supplier/category key.
    #[serde(rename = "categoryKey")]
    pub category: String,
}

fn default_yield() -> f64 {
    1.0
}

/// A dish from the recipe catalogue. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(rename = "recipeId")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub allergens: Vec<Allergen>,

    pub food_group: FoodGroup,

    #[serde(rename = "isVollkorn", alias = "wholeGrain", default)]
    pub whole_grain: bool,

    #[serde(default)]
    pub source_category: String,

    pub nutrition: Nutrition,

    pub portion: PortionSpec,

    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

impl Dish {
    pub fn base_portion_g(&self) -> f64 {
        self.portion.base_portion_g
    }

    pub fn has_allergen(&self, allergen: Allergen) -> bool {
        self.allergens.contains(&allergen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persons_total_and_iter() {
        let persons = PersonsByGroup::new(10, 5, 0);
        assert_eq!(persons.total(), 15);
        let counts: Vec<u32> = persons.iter().map(|(_, c)| c).collect();
        assert_eq!(counts, vec![10, 5, 0]);
        assert!(PersonsByGroup::default().is_empty());
    }

    #[test]
    fn test_portion_resolve_falls_back_to_base() {
        let spec = PortionSpec::base_only(300.0).with_group(PopulationGroup::Children, 200.0);
        assert_eq!(spec.resolve(PopulationGroup::Children), (200.0, false));
        assert_eq!(spec.resolve(PopulationGroup::Seniors), (300.0, true));
    }

    #[test]
    fn test_allergen_labels() {
        assert_eq!(Allergen::from_label("Milch"), Some(Allergen::Milk));
        assert_eq!(
            Allergen::from_label("Schwefeldioxid/Sulphite"),
            Some(Allergen::Sulphites)
        );
        assert_eq!(Allergen::from_label("Celery"), Some(Allergen::Celery));
        assert_eq!(Allergen::from_label("Pollen"), None);
    }

    #[test]
    fn test_nutrition_tagged_json() {
        let json = r#"{"kind": "PER_PORTION", "kcalPerPortion": 450, "proteinPerPortion": 25, "basePortionG": 350}"#;
        let nutrition: Nutrition = serde_json::from_str(json).unwrap();
        assert_eq!(
            nutrition,
            Nutrition::PerPortion {
                kcal_per_portion: 450.0,
                protein_per_portion: 25.0,
                fat_per_portion: 0.0,
                base_portion_g: Some(350.0),
            }
        );
    }

    #[test]
    fn test_group_keys_accept_german_names() {
        let json = r#"{"basePortionG": 300, "portionGByGroup": {"erwachsene": 300, "kinder": 200}}"#;
        let spec: PortionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.explicit(PopulationGroup::Adults), Some(300.0));
        assert_eq!(spec.explicit(PopulationGroup::Children), Some(200.0));
        assert_eq!(spec.explicit(PopulationGroup::Seniors), None);
    }
}
