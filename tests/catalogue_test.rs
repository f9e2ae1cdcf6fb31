use std::io::Write;

use tempfile::NamedTempFile;

use menuplan::config::PlannerConfig;
use menuplan::error::MenuError;
use menuplan::models::{Allergen, FoodGroup, IngredientMeta, IngredientMetaTable, PopulationGroup};
use menuplan::state::load_catalogue;

fn write_json(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn meta() -> IngredientMetaTable {
    let mut table = IngredientMetaTable::new();
    table.insert(
        "Karotten".to_string(),
        IngredientMeta {
            supplier: "produce".to_string(),
            pack_size_g: None,
            pack_size_kg: Some(10.0),
            waste_pct: Some(20.0),
            shelf_life_days: 14,
            allergens: Vec::new(),
        },
    );
    table
}

const MIXED: &str = r#"[
    {
        "recipeId": "soup-01",
        "name": "Carrot soup",
        "allergens": ["celery"],
        "foodGroup": "soup",
        "sourceCategory": "soup",
        "nutrition": {"kind": "PER_100G", "kcalPer100g": 48, "proteinPer100g": 1.2, "fatPer100g": 2.1, "carbsPer100g": 6},
        "portion": {"basePortionG": 250, "portionGByGroup": {"adults": 250, "seniors": 220, "children": 180}},
        "ingredients": [
            {"ingredientId": "Karotten", "name": "Carrots", "qtyPerBasePortionG": 120, "categoryKey": "produce"}
        ]
    },
    {
        "name": "Rüeblikuchen",
        "allergens": ["Eier", "Gluten", "Nüsse"],
        "kcal": 380, "protein": 6, "fat": 18,
        "foodGroup": "dessert",
        "isVollkorn": true,
        "ingredients": [
            {"name": "Karotten", "grams": 40, "category": ""},
            {"name": "Mehl", "grams": 30, "category": "dry goods"}
        ]
    }
]"#;

#[test]
fn test_mixed_catalogue_loads() {
    let file = write_json(MIXED);
    let catalogue = load_catalogue(file.path(), &meta(), &PlannerConfig::default()).unwrap();
    assert_eq!(catalogue.len(), 2);

    let soup = catalogue.get("soup-01").unwrap();
    assert_eq!(soup.allergens, vec![Allergen::Celery]);
    assert_eq!(soup.portion.explicit(PopulationGroup::Seniors), Some(220.0));
    assert_eq!(soup.ingredients[0].yield_factor, 0.8);

    let cake = catalogue.get_by_name("rüeblikuchen").unwrap();
    assert_eq!(cake.id, "Rüeblikuchen");
    assert_eq!(cake.food_group, FoodGroup::Dessert);
    assert!(cake.whole_grain);
    assert_eq!(
        cake.allergens,
        vec![Allergen::Gluten, Allergen::Egg, Allergen::Nuts]
    );
    // dessert estimate 120g, seniors and children synthesised
    assert_eq!(cake.base_portion_g(), 120.0);
    assert_eq!(cake.portion.explicit(PopulationGroup::Children), Some(80.0));
    assert_eq!(cake.ingredients[0].category, "produce");
    assert_eq!(cake.ingredients[0].pack_size_g, Some(10_000.0));
    assert_eq!(cake.ingredients[1].pack_size_g, None);
}

#[test]
fn test_duplicate_id_fails_load() {
    let json = r#"[
        {"recipeId": "x", "name": "One", "foodGroup": "soup",
         "nutrition": {"kind": "PER_100G", "kcalPer100g": 40}, "portion": {"basePortionG": 250}},
        {"recipeId": "x", "name": "Two", "foodGroup": "soup",
         "nutrition": {"kind": "PER_100G", "kcalPer100g": 60}, "portion": {"basePortionG": 250}}
    ]"#;
    let file = write_json(json);
    let result = load_catalogue(file.path(), &meta(), &PlannerConfig::default());
    assert!(matches!(result, Err(MenuError::DuplicateDish(id)) if id == "x"));
}

#[test]
fn test_missing_energy_spec_fails_load() {
    let json = r#"[{"recipeId": "y", "name": "Mystery", "foodGroup": "soup", "portion": {"basePortionG": 250}}]"#;
    let file = write_json(json);
    let err = load_catalogue(file.path(), &meta(), &PlannerConfig::default()).unwrap_err();
    assert!(err.to_string().contains("missing energy specification"));
}

#[test]
fn test_untagged_nutrition_names_the_dish() {
    let json = r#"[
        {"recipeId": "ok-1", "name": "Broth", "foodGroup": "soup",
         "nutrition": {"kind": "PER_100G", "kcalPer100g": 20}, "portion": {"basePortionG": 250}},
        {"recipeId": "bad-7", "name": "Lentil soup", "foodGroup": "soup", "nutrition": {"kcalPer100g": 40}}
    ]"#;
    let file = write_json(json);
    let err = load_catalogue(file.path(), &meta(), &PlannerConfig::default()).unwrap_err();
    assert!(matches!(&err, MenuError::InvalidDish { dish, .. } if dish == "bad-7"));
    assert!(err.to_string().contains("bad-7"));
}

#[test]
fn test_unknown_food_group_names_the_dish() {
    let json = r#"[{"name": "Crisps", "kcal": 500, "foodGroup": "snack"}]"#;
    let file = write_json(json);
    let err = load_catalogue(file.path(), &meta(), &PlannerConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Crisps"));
}

#[test]
fn test_not_an_array_fails_load() {
    let file = write_json(r#"{"recipes": []}"#);
    assert!(matches!(
        load_catalogue(file.path(), &meta(), &PlannerConfig::default()),
        Err(MenuError::Json(_))
    ));
}
