use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::config::PlannerConfig;
use crate::error::{MenuError, Result};
use crate::models::{Allergen, Dish, FoodGroup, IngredientMetaTable, Nutrition, Slot};
use crate::state::cache::{CacheKey, SuggestionStore};
use crate::state::normalize::{RawDish, normalize, parse_record};

/// Validated, immutable recipe catalogue.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    /// Dishes in load order.
    dishes: Vec<Dish>,
    by_id: HashMap<String, usize>,
}

/// Reject dishes the calculators cannot work with.
pub fn validate_dish(dish: &Dish) -> Result<()> {
    let label = if dish.id.trim().is_empty() {
        dish.name.as_str()
    } else {
        dish.id.as_str()
    };

    if dish.id.trim().is_empty() {
        return Err(MenuError::invalid_dish(label, "missing identifier"));
    }
    if dish.name.trim().is_empty() {
        return Err(MenuError::invalid_dish(label, "missing name"));
    }
    if !(dish.base_portion_g() > 0.0) {
        return Err(MenuError::invalid_dish(label, "base portion must be > 0"));
    }
    if let Nutrition::PerPortion {
        base_portion_g: Some(base),
        ..
    } = dish.nutrition
    {
        if !(base > 0.0) {
            return Err(MenuError::invalid_dish(
                label,
                "per-portion nutrition base must be > 0",
            ));
        }
    }
    for line in &dish.ingredients {
        if !(line.yield_factor > 0.0 && line.yield_factor <= 1.0) {
            return Err(MenuError::invalid_dish(
                label,
                format!("yield of \"{}\" is outside (0, 1]", line.name),
            ));
        }
        if line.qty_per_base_portion_g < 0.0 {
            return Err(MenuError::invalid_dish(
                label,
                format!("negative quantity for \"{}\"", line.name),
            ));
        }
    }
    Ok(())
}

impl Catalogue {
    /// Build a catalogue from typed dishes. Any invalid dish or repeated id
    /// rejects the whole catalogue.
    pub fn new(dishes: Vec<Dish>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(dishes.len());
        for (i, dish) in dishes.iter().enumerate() {
            validate_dish(dish)?;
            if by_id.insert(dish.id.clone(), i).is_some() {
                return Err(MenuError::DuplicateDish(dish.id.clone()));
            }
        }
        Ok(Self { dishes, by_id })
    }

    /// Normalise raw records of either shape, then validate.
    pub fn from_raw(
        records: Vec<RawDish>,
        meta: &IngredientMetaTable,
        config: &PlannerConfig,
    ) -> Result<Self> {
        let dishes = records
            .into_iter()
            .map(|raw| normalize(raw, meta, &config.group_portions))
            .collect::<Result<Vec<_>>>()?;
        Self::new(dishes)
    }

    pub fn get(&self, id: &str) -> Option<&Dish> {
        self.by_id.get(id).map(|&i| &self.dishes[i])
    }

    /// Lookup by display name (case-insensitive). First match in load order.
    pub fn get_by_name(&self, name: &str) -> Option<&Dish> {
        let needle = name.trim().to_lowercase();
        self.dishes
            .iter()
            .find(|d| d.name.to_lowercase() == needle)
    }

    /// Resolve a reference typed by a user: dish id first, then display name.
    pub fn find(&self, reference: &str) -> Result<&Dish> {
        let reference = reference.trim();
        self.get(reference)
            .or_else(|| self.get_by_name(reference))
            .ok_or_else(|| MenuError::DishNotFound(reference.to_string()))
    }

    /// Resolve references to dishes, silently dropping unknown ones.
    pub fn resolve_all<I, S>(&self, refs: I) -> Vec<&Dish>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        refs.into_iter()
            .filter_map(|r| self.get(r.as_ref()))
            .collect()
    }

    /// Dishes that fit a plan slot: soups for the soup slot, desserts for the
    /// dessert slot, everything else for the main slots.
    pub fn candidates_for(&self, slot: Slot) -> Vec<&Dish> {
        self.dishes
            .iter()
            .filter(|d| match slot {
                Slot::LunchSoup => d.food_group == FoodGroup::Soup,
                Slot::LunchDessert => d.food_group == FoodGroup::Dessert,
                _ => !matches!(d.food_group, FoodGroup::Soup | FoodGroup::Dessert),
            })
            .collect()
    }

    /// Slot candidates, served from `store` while the entry under `key` is
    /// fresh. Ids that no longer resolve are dropped.
    pub fn cached_candidates(
        &self,
        slot: Slot,
        key: CacheKey,
        store: &dyn SuggestionStore,
        ttl: Duration,
    ) -> Vec<&Dish> {
        if let Some(ids) = store.get(&key) {
            return self.resolve_all(ids);
        }
        let candidates = self.candidates_for(slot);
        store.put(key, candidates.iter().map(|d| d.id.clone()).collect(), ttl);
        candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dish> + '_ {
        self.dishes.iter()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

/// Drop dishes that contain any of `excluded`.
pub fn exclude_allergens<'a>(dishes: Vec<&'a Dish>, excluded: &[Allergen]) -> Vec<&'a Dish> {
    dishes
        .into_iter()
        .filter(|d| !excluded.iter().any(|a| d.has_allergen(*a)))
        .collect()
}

/// Load and validate a catalogue from a JSON array of records.
pub fn load_catalogue<P: AsRef<Path>>(
    path: P,
    meta: &IngredientMetaTable,
    config: &PlannerConfig,
) -> Result<Catalogue> {
    let content = fs::read_to_string(path.as_ref())?;
    let values: Vec<Value> = serde_json::from_str(&content)?;
    let records = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| parse_record(value, i))
        .collect::<Result<Vec<RawDish>>>()?;
    let legacy = records.iter().filter(|r| r.is_legacy()).count();

    let catalogue = Catalogue::from_raw(records, meta, config)?;
    info!(
        dishes = catalogue.len(),
        legacy,
        path = %path.as_ref().display(),
        "catalogue loaded"
    );
    Ok(catalogue)
}
