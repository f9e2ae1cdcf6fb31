use std::fs;
use std::path::Path;

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::plan::PLAN_VERSION;
use crate::models::{IngredientMetaTable, PersonsByGroup, Slot, WeekPlan};
use crate::state::Catalogue;

/// Empty plan for the week containing `week_start`, every day serving
/// `diners` adults.
pub fn empty_plan(week_start: NaiveDate, diners: u32) -> WeekPlan {
    let offset = week_start.weekday().num_days_from_monday() as u64;
    let monday = week_start - Days::new(offset);
    if offset > 0 {
        debug!(%week_start, %monday, "week start moved back to Monday");
    }
    WeekPlan::empty(monday, PersonsByGroup::adults_only(diners))
}

/// Point a reference at the dish id, when it names a dish instead.
fn migrate_ref(slot: &mut Option<String>, catalogue: &Catalogue, unknown: &mut Vec<String>) {
    let Some(value) = slot.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    if catalogue.get(value).is_some() {
        return;
    }
    match catalogue.get_by_name(value) {
        Some(dish) => *slot = Some(dish.id.clone()),
        None => unknown.push(value.to_string()),
    }
}

/// Rewrite name references of an older plan to dish ids.
///
/// Returns the references that matched neither an id nor a name; those are
/// left in place and skipped by the planner.
pub fn migrate_plan_names(plan: &mut WeekPlan, catalogue: &Catalogue) -> Vec<String> {
    let mut unknown = Vec::new();

    for day in plan.days.iter_mut() {
        for slot in Slot::ALL {
            migrate_ref(day.slot_mut(slot), catalogue, &mut unknown);
        }
    }
    migrate_ref(&mut plan.hits.lunch_early, catalogue, &mut unknown);
    migrate_ref(&mut plan.hits.lunch_late, catalogue, &mut unknown);
    for hit in plan.hits.dinner.iter_mut() {
        migrate_ref(hit, catalogue, &mut unknown);
    }

    plan.version = Some(PLAN_VERSION.to_string());
    unknown
}

/// Load a plan, migrating older name-based plans against `catalogue`.
pub fn load_plan<P: AsRef<Path>>(path: P, catalogue: &Catalogue) -> Result<WeekPlan> {
    let content = fs::read_to_string(path)?;
    let mut plan: WeekPlan = serde_json::from_str(&content)?;

    if !plan.is_current_version() {
        let from = plan.version.take();
        let unknown = migrate_plan_names(&mut plan, catalogue);
        info!(?from, "plan migrated to current format");
        for name in unknown {
            warn!(dish = %name, "plan references an unknown dish");
        }
    }

    Ok(plan)
}

/// Save a plan as pretty JSON.
pub fn save_plan<P: AsRef<Path>>(path: P, plan: &WeekPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the ingredient metadata table (object keyed by ingredient id).
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<IngredientMetaTable> {
    let content = fs::read_to_string(path)?;
    let table: IngredientMetaTable = serde_json::from_str(&content)?;
    debug!(ingredients = table.len(), "ingredient metadata loaded");
    Ok(table)
}
