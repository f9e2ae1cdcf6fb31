//! Weekly ingredient aggregation: plan slots and weekly hits to per-ingredient demand.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Weekday};
use tracing::{debug, warn};

use crate::config::HitEstimates;
use crate::models::{IngredientDemand, IngredientMetaTable, PersonsByGroup, WeekPlan};
use crate::planner::calculations::served_grams;
use crate::planner::constants::{HIT_DINNER_DAYS, HIT_LUNCH_EARLY_DAYS, HIT_LUNCH_LATE_DAYS};
use crate::state::Catalogue;

/// One planned serving of a dish: who eats it and when it is first needed.
#[derive(Debug, Clone, PartialEq)]
pub struct DishUsage<'a> {
    pub dish_ref: &'a str,
    pub persons: PersonsByGroup,
    /// Multiplier on `persons`; weekly hits use fractional diner estimates.
    pub share: f64,
    pub first_use: NaiveDate,
}

impl<'a> DishUsage<'a> {
    pub fn daily(dish_ref: &'a str, persons: PersonsByGroup, date: NaiveDate) -> Self {
        Self {
            dish_ref,
            persons,
            share: 1.0,
            first_use: date,
        }
    }

    /// Usage by an estimated number of adult diners.
    pub fn estimated(dish_ref: &'a str, diners: f64, first_use: NaiveDate) -> Self {
        Self {
            dish_ref,
            persons: PersonsByGroup::adults_only(1),
            share: diners,
            first_use,
        }
    }
}

/// Expand a week plan into dish usages: every filled day slot plus the weekly hits.
pub fn week_usages<'a>(plan: &'a WeekPlan, estimates: &HitEstimates) -> Vec<DishUsage<'a>> {
    let mut usages = Vec::new();

    for (weekday, day) in plan.iter_days() {
        if day.persons.is_empty() {
            continue;
        }
        let date = plan.date_of(weekday);
        usages.extend(
            day.all_refs()
                .into_iter()
                .map(|r| DishUsage::daily(r, day.persons, date)),
        );
    }

    if let Some(hit) = plan.hits.lunch_early() {
        let diners = estimates.lunch_diners_per_day * HIT_LUNCH_EARLY_DAYS as f64;
        usages.push(DishUsage::estimated(hit, diners, plan.date_of(Weekday::Mon)));
    }

    if let Some(hit) = plan.hits.lunch_late() {
        let diners = estimates.lunch_diners_per_day * HIT_LUNCH_LATE_DAYS as f64;
        usages.push(DishUsage::estimated(hit, diners, plan.date_of(Weekday::Thu)));
    }

    let dinner_hits = plan.hits.dinner();
    if !dinner_hits.is_empty() {
        let total = estimates.dinner_diners_per_day * HIT_DINNER_DAYS as f64;
        let per_hit = total / dinner_hits.len() as f64;
        let monday = plan.date_of(Weekday::Mon);
        usages.extend(
            dinner_hits
                .into_iter()
                .map(|hit| DishUsage::estimated(hit, per_hit, monday)),
        );
    }

    usages
}

#[derive(Debug)]
struct Accumulator {
    name: String,
    net_g: f64,
    gross_g: f64,
    pack_size_g: Option<f64>,
    first_use: NaiveDate,
}

/// Aggregated demand plus everything that looked incomplete on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// One entry per ingredient id, sorted by id.
    pub demands: Vec<IngredientDemand>,
    pub warnings: Vec<String>,
}

/// Purchase mass for an edible mass. Out-of-range yields count as lossless.
pub fn gross_from_net(net_g: f64, yield_factor: f64) -> f64 {
    if yield_factor > 0.0 && yield_factor <= 1.0 {
        net_g / yield_factor
    } else {
        net_g
    }
}

/// Accumulate ingredient demand over dish usages, in any order.
pub fn accumulate<'a>(
    usages: impl IntoIterator<Item = DishUsage<'a>>,
    catalogue: &Catalogue,
    meta: &IngredientMetaTable,
) -> Aggregation {
    let mut running: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut warnings: BTreeSet<String> = BTreeSet::new();

    for usage in usages {
        let Some(dish) = catalogue.get(usage.dish_ref) else {
            debug!(dish = usage.dish_ref, "unresolved dish reference, skipping");
            continue;
        };

        let base_g = dish.base_portion_g();
        if base_g <= 0.0 {
            warnings.insert(format!("\"{}\" has a base portion of 0.", dish.name));
            continue;
        }

        let (served_g, portion_warnings) = served_grams(dish, &usage.persons);
        warnings.extend(portion_warnings);
        let multiplier = served_g * usage.share / base_g;

        for line in &dish.ingredients {
            let net_g = line.qty_per_base_portion_g * multiplier;
            let gross_g = gross_from_net(net_g, line.yield_factor);

            let acc = running
                .entry(line.ingredient_id.clone())
                .or_insert_with(|| Accumulator {
                    name: line.name.clone(),
                    net_g: 0.0,
                    gross_g: 0.0,
                    pack_size_g: None,
                    first_use: usage.first_use,
                });
            acc.net_g += net_g;
            acc.gross_g += gross_g;
            acc.pack_size_g = acc.pack_size_g.or(line.pack_size_g);
            acc.first_use = acc.first_use.min(usage.first_use);
        }
    }

    let mut demands = Vec::with_capacity(running.len());
    let mut missing_meta = Vec::new();
    for (ingredient_id, acc) in running {
        let Some(info) = meta.get(&ingredient_id) else {
            warn!(ingredient = %ingredient_id, "no order metadata, dropped from order");
            missing_meta.push(format!(
                "No order metadata found for \"{}\" ({}).",
                acc.name, ingredient_id
            ));
            continue;
        };

        demands.push(IngredientDemand {
            ingredient_id,
            name: acc.name,
            supplier: info.supplier.clone(),
            net_g: acc.net_g,
            gross_g: acc.gross_g,
            pack_size_g: info.pack_size().or(acc.pack_size_g),
            shelf_life_days: info.shelf_life_days,
            first_use: acc.first_use,
            allergens: info.allergens.clone(),
        });
    }

    let mut all_warnings: Vec<String> = warnings.into_iter().collect();
    all_warnings.extend(missing_meta);

    Aggregation {
        demands,
        warnings: all_warnings,
    }
}

/// Aggregate a full week plan, weekly hits included.
pub fn aggregate_week(
    plan: &WeekPlan,
    catalogue: &Catalogue,
    meta: &IngredientMetaTable,
    estimates: &HitEstimates,
) -> Aggregation {
    accumulate(week_usages(plan, estimates), catalogue, meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPlan, Slot};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_gross_from_net() {
        assert_eq!(gross_from_net(90.0, 0.9), 100.0);
        assert_eq!(gross_from_net(90.0, 1.0), 90.0);
        assert_eq!(gross_from_net(90.0, 0.0), 90.0);
        assert_eq!(gross_from_net(90.0, 1.5), 90.0);
    }

    #[test]
    fn test_week_usages_days_and_hits() {
        let mut plan = WeekPlan::empty(monday(), PersonsByGroup::adults_only(100));
        *plan.day_mut(Weekday::Tue).slot_mut(Slot::LunchMain) = Some("goulash".to_string());
        *plan.day_mut(Weekday::Sat).slot_mut(Slot::DinnerVegetarian) = Some("risotto".to_string());
        plan.hits.lunch_early = Some("hit-a".to_string());
        plan.hits.lunch_late = Some("hit-b".to_string());
        plan.hits.dinner = vec![Some("d1".to_string()), None, Some("d2".to_string()), None];

        let usages = week_usages(&plan, &HitEstimates::default());
        assert_eq!(usages.len(), 6);

        let tuesday = &usages[0];
        assert_eq!(tuesday.dish_ref, "goulash");
        assert_eq!(tuesday.first_use, monday() + chrono::Days::new(1));

        let early = usages.iter().find(|u| u.dish_ref == "hit-a").unwrap();
        assert_eq!(early.share, 60.0);
        assert_eq!(early.first_use, monday());

        let late = usages.iter().find(|u| u.dish_ref == "hit-b").unwrap();
        assert_eq!(late.share, 80.0);
        assert_eq!(late.first_use, monday() + chrono::Days::new(3));

        // 15 * 7 diners split over the two configured dinner hits
        let d2 = usages.iter().find(|u| u.dish_ref == "d2").unwrap();
        assert_eq!(d2.share, 52.5);
        assert_eq!(d2.first_use, monday());
    }

    #[test]
    fn test_days_without_diners_are_skipped() {
        let mut plan = WeekPlan::empty(monday(), PersonsByGroup::default());
        plan.days[0] = DayPlan::default();
        *plan.day_mut(Weekday::Mon).slot_mut(Slot::LunchSoup) = Some("soup".to_string());
        assert!(week_usages(&plan, &HitEstimates::default()).is_empty());
    }
}
