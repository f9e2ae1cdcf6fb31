//! Raw catalogue records and their normalisation into canonical dishes.
//!
//! Two record shapes are accepted: the canonical one (tagged nutrition,
//! portion spec, ingredient lines) and the older flat one (`kcal`,
//! `protein`, `fat`, ingredients with `grams`). Everything past this module
//! only sees [`Dish`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use crate::config::GroupPortionRatios;
use crate::error::{MenuError, Result};
use crate::models::{
    Allergen, Dish, FoodGroup, IngredientLine, IngredientMetaTable, Nutrition, PopulationGroup,
    PortionSpec,
};
use crate::planner::constants::{UNKNOWN_SUPPLIER, base_portion_estimate};

/// A catalogue record as found on disk, nothing validated yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDish {
    #[serde(alias = "id")]
    pub recipe_id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    pub food_group: Option<FoodGroup>,
    #[serde(rename = "isVollkorn", alias = "wholeGrain", default)]
    pub whole_grain: bool,
    pub source_category: Option<String>,
    pub nutrition: Option<Nutrition>,
    pub portion: Option<RawPortion>,
    /// Kept untyped so a non-array value can be reported per dish.
    pub ingredients: Option<Value>,

    // Flat legacy energy values, per base portion.
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPortion {
    #[serde(rename = "basePortionG")]
    pub base_portion_g: Option<f64>,
    #[serde(rename = "portionGByGroup", default)]
    pub by_group: BTreeMap<PopulationGroup, f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIngredient {
    #[serde(alias = "id")]
    pub ingredient_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "qtyPerBasePortionG", alias = "grams")]
    pub qty_g: Option<f64>,
    #[serde(rename = "yield")]
    pub yield_factor: Option<f64>,
    #[serde(rename = "packSizeG")]
    pub pack_size_g: Option<f64>,
    #[serde(rename = "categoryKey", alias = "category")]
    pub category: Option<String>,
}

impl RawDish {
    /// Flat record without a tagged nutrition block.
    pub fn is_legacy(&self) -> bool {
        self.nutrition.is_none() && self.kcal.is_some()
    }

    /// Best available label for error messages.
    fn label(&self) -> String {
        self.recipe_id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<unnamed>")
            .to_string()
    }
}

/// Decode one catalogue entry. Shape errors (an untagged nutrition block, an
/// unknown food group, a malformed portion) name the record they came from.
pub fn parse_record(value: Value, position: usize) -> Result<RawDish> {
    let label = ["recipeId", "id", "name"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .and_then(|s| non_blank(Some(s)))
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", position + 1));
    serde_json::from_value(value).map_err(|e| MenuError::invalid_dish(label, e.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Map allergen labels into the closed vocabulary, deduplicated and sorted.
pub fn normalize_allergens(dish: &str, labels: &[String]) -> Result<Vec<Allergen>> {
    let mut set = BTreeSet::new();
    for label in labels {
        if label.trim().is_empty() {
            continue;
        }
        let allergen = Allergen::from_label(label)
            .ok_or_else(|| MenuError::invalid_dish(dish, format!("unknown allergen \"{label}\"")))?;
        set.insert(allergen);
    }
    Ok(set.into_iter().collect())
}

/// Per-group overrides derived from the base portion.
pub fn synthesize_group_portions(base_g: f64, ratios: &GroupPortionRatios) -> PortionSpec {
    PortionSpec::base_only(base_g)
        .with_group(PopulationGroup::Adults, base_g)
        .with_group(PopulationGroup::Seniors, (base_g * ratios.seniors).round())
        .with_group(PopulationGroup::Children, (base_g * ratios.children).round())
}

fn normalize_ingredients(
    dish: &str,
    value: Option<&Value>,
    meta: &IngredientMetaTable,
) -> Result<Vec<IngredientLine>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(MenuError::invalid_dish(dish, "ingredients must be a list")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let raw: RawIngredient = serde_json::from_value(item.clone()).map_err(|e| {
                MenuError::invalid_dish(dish, format!("ingredient #{}: {e}", i + 1))
            })?;
            normalize_ingredient(dish, raw, meta)
        })
        .collect()
}

fn normalize_ingredient(
    dish: &str,
    raw: RawIngredient,
    meta: &IngredientMetaTable,
) -> Result<IngredientLine> {
    let name = non_blank(raw.name.as_deref())
        .or(non_blank(raw.ingredient_id.as_deref()))
        .ok_or_else(|| MenuError::invalid_dish(dish, "ingredient without name"))?
        .to_string();
    // Flat records key metadata by ingredient name.
    let ingredient_id = non_blank(raw.ingredient_id.as_deref())
        .unwrap_or(&name)
        .to_string();

    let qty = raw.qty_g.unwrap_or(0.0);
    if qty < 0.0 {
        return Err(MenuError::invalid_dish(
            dish,
            format!("negative quantity for \"{name}\""),
        ));
    }

    let info = meta.get(&ingredient_id);
    let yield_factor = raw
        .yield_factor
        .or(info.and_then(|m| m.yield_factor()))
        .unwrap_or(1.0);
    if !(yield_factor > 0.0 && yield_factor <= 1.0) {
        return Err(MenuError::invalid_dish(
            dish,
            format!("yield {yield_factor} of \"{name}\" is outside (0, 1]"),
        ));
    }

    let category = non_blank(raw.category.as_deref())
        .map(str::to_string)
        .or(info.map(|m| m.supplier.clone()))
        .unwrap_or_else(|| UNKNOWN_SUPPLIER.to_string());

    Ok(IngredientLine {
        ingredient_id,
        name,
        qty_per_base_portion_g: qty,
        yield_factor,
        pack_size_g: raw
            .pack_size_g
            .filter(|p| *p > 0.0)
            .or(info.and_then(|m| m.pack_size())),
        category,
    })
}

/// Turn a raw record of either shape into a canonical dish.
///
/// Structural problems are fatal: missing id or name, missing energy
/// specification, missing or non-positive base portion, unknown allergen,
/// non-list ingredients.
pub fn normalize(
    raw: RawDish,
    meta: &IngredientMetaTable,
    ratios: &GroupPortionRatios,
) -> Result<Dish> {
    let label = raw.label();
    let legacy = raw.is_legacy();

    let name = non_blank(raw.name.as_deref())
        .ok_or_else(|| MenuError::invalid_dish(&label, "missing name"))?
        .to_string();
    let id = match non_blank(raw.recipe_id.as_deref()) {
        Some(id) => id.to_string(),
        None if legacy => name.clone(),
        None => return Err(MenuError::invalid_dish(&label, "missing identifier")),
    };
    let food_group = raw
        .food_group
        .ok_or_else(|| MenuError::invalid_dish(&id, "missing food group"))?;

    let declared_base = raw.portion.as_ref().and_then(|p| p.base_portion_g);
    let (nutrition, base_g) = match (raw.nutrition, legacy) {
        (Some(nutrition), _) => {
            let per_portion_base = match &nutrition {
                Nutrition::PerPortion { base_portion_g, .. } => *base_portion_g,
                Nutrition::Per100g { .. } => None,
            };
            let base = declared_base
                .or(per_portion_base)
                .ok_or_else(|| MenuError::invalid_dish(&id, "missing base portion"))?;
            (nutrition, base)
        }
        (None, true) => {
            let base = declared_base.unwrap_or_else(|| base_portion_estimate(food_group));
            let nutrition = Nutrition::PerPortion {
                kcal_per_portion: raw.kcal.unwrap_or(0.0),
                protein_per_portion: raw.protein.unwrap_or(0.0),
                fat_per_portion: raw.fat.unwrap_or(0.0),
                base_portion_g: Some(base),
            };
            (nutrition, base)
        }
        (None, false) => {
            return Err(MenuError::invalid_dish(&id, "missing energy specification"));
        }
    };

    if base_g <= 0.0 {
        return Err(MenuError::invalid_dish(&id, "base portion must be > 0"));
    }

    let by_group = raw.portion.map(|p| p.by_group).unwrap_or_default();
    let portion = if legacy && by_group.is_empty() {
        synthesize_group_portions(base_g, ratios)
    } else {
        PortionSpec {
            base_portion_g: base_g,
            by_group,
        }
    };

    Ok(Dish {
        allergens: normalize_allergens(&id, &raw.allergens)?,
        ingredients: normalize_ingredients(&id, raw.ingredients.as_ref(), meta)?,
        id,
        name,
        food_group,
        whole_grain: raw.whole_grain,
        source_category: raw.source_category.unwrap_or_default(),
        nutrition,
        portion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientMeta;

    fn meta() -> IngredientMetaTable {
        let mut table = IngredientMetaTable::new();
        table.insert(
            "Rinderhack".to_string(),
            IngredientMeta {
                supplier: "butcher".to_string(),
                pack_size_g: None,
                pack_size_kg: Some(2.5),
                waste_pct: Some(10.0),
                shelf_life_days: 2,
                allergens: Vec::new(),
            },
        );
        table
    }

    fn parse(json: &str) -> RawDish {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_legacy_record() {
        let raw = parse(
            r#"{
                "name": "Lasagne",
                "allergens": ["Gluten", "Milch", "Milch"],
                "kcal": 650, "protein": 32, "fat": 28,
                "foodGroup": "starch",
                "isVollkorn": false,
                "ingredients": [
                    {"name": "Rinderhack", "grams": 120, "category": ""},
                    {"name": "Pasta", "grams": 80, "category": "dry goods"}
                ]
            }"#,
        );
        assert!(raw.is_legacy());

        let dish = normalize(raw, &meta(), &GroupPortionRatios::default()).unwrap();
        assert_eq!(dish.id, "Lasagne");
        assert_eq!(dish.allergens, vec![Allergen::Gluten, Allergen::Milk]);
        assert_eq!(dish.base_portion_g(), 200.0);
        assert_eq!(dish.portion.explicit(PopulationGroup::Seniors), Some(174.0));
        assert_eq!(dish.portion.explicit(PopulationGroup::Children), Some(134.0));
        assert!(matches!(
            dish.nutrition,
            Nutrition::PerPortion {
                kcal_per_portion,
                base_portion_g: Some(base),
                ..
            } if kcal_per_portion == 650.0 && base == 200.0
        ));

        let beef = &dish.ingredients[0];
        assert_eq!(beef.ingredient_id, "Rinderhack");
        assert!((beef.yield_factor - 0.9).abs() < 1e-12);
        assert_eq!(beef.pack_size_g, Some(2500.0));
        assert_eq!(beef.category, "butcher");

        let pasta = &dish.ingredients[1];
        assert_eq!(pasta.yield_factor, 1.0);
        assert_eq!(pasta.category, "dry goods");
    }

    #[test]
    fn test_canonical_keeps_missing_overrides() {
        let raw = parse(
            r#"{
                "recipeId": "r-1", "name": "Tomato soup", "foodGroup": "soup",
                "nutrition": {"kind": "PER_100G", "kcalPer100g": 45},
                "portion": {"basePortionG": 250, "portionGByGroup": {"adults": 250}},
                "ingredients": []
            }"#,
        );
        let dish = normalize(raw, &IngredientMetaTable::new(), &GroupPortionRatios::default())
            .unwrap();
        assert_eq!(dish.portion.explicit(PopulationGroup::Seniors), None);
        assert_eq!(dish.portion.resolve(PopulationGroup::Seniors), (250.0, true));
    }

    #[test]
    fn test_shape_errors_name_the_record() {
        let untagged = serde_json::json!({
            "recipeId": "bad-7", "name": "Broth", "foodGroup": "soup",
            "nutrition": {"kcalPer100g": 40}
        });
        let err = parse_record(untagged, 6).unwrap_err();
        assert!(matches!(&err, MenuError::InvalidDish { dish, .. } if dish == "bad-7"));
        assert!(err.to_string().contains("kind"));

        let unknown_group = serde_json::json!({"name": "Mystery stew", "foodGroup": "snack"});
        assert!(matches!(
            parse_record(unknown_group, 0),
            Err(MenuError::InvalidDish { dish, .. }) if dish == "Mystery stew"
        ));

        let anonymous = serde_json::json!({"portion": {"basePortionG": "lots"}});
        assert!(matches!(
            parse_record(anonymous, 2),
            Err(MenuError::InvalidDish { dish, .. }) if dish == "#3"
        ));
    }

    #[test]
    fn test_structural_errors() {
        let cases = [
            r#"{"name": "x", "foodGroup": "soup", "nutrition": {"kind": "PER_100G", "kcalPer100g": 1}, "portion": {"basePortionG": 100}}"#,
            r#"{"recipeId": "a", "foodGroup": "soup", "nutrition": {"kind": "PER_100G", "kcalPer100g": 1}, "portion": {"basePortionG": 100}}"#,
            r#"{"recipeId": "a", "name": "x", "foodGroup": "soup", "portion": {"basePortionG": 100}}"#,
            r#"{"recipeId": "a", "name": "x", "foodGroup": "soup", "nutrition": {"kind": "PER_100G", "kcalPer100g": 1}, "portion": {"basePortionG": 0}}"#,
            r#"{"recipeId": "a", "name": "x", "foodGroup": "soup", "nutrition": {"kind": "PER_100G", "kcalPer100g": 1}, "portion": {"basePortionG": 100}, "ingredients": {}}"#,
            r#"{"name": "x", "kcal": 1, "foodGroup": "soup", "allergens": ["Pollen"]}"#,
        ];
        for json in cases {
            let result = normalize(parse(json), &IngredientMetaTable::new(), &Default::default());
            assert!(
                matches!(result, Err(MenuError::InvalidDish { .. })),
                "accepted: {json}"
            );
        }
    }
}
