use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, Weekday};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use menuplan::cli::{Cli, Command};
use menuplan::config::PlannerConfig;
use menuplan::error::{MenuError, Result};
use menuplan::interface::{
    SlotChoice, display_day_report, display_meal_report, display_order, display_warnings,
    prompt_dish_choice, prompt_next_slot, prompt_yes_no, write_order_csv,
};
use menuplan::models::{Allergen, Dish, IngredientMetaTable, MealType, Slot, WeekPlan};
use menuplan::planner::{evaluate_day, evaluate_day_meal, generate_order, rank_candidates};
use menuplan::state::{
    CacheKey, Catalogue, SuggestionStore, TtlCache, empty_plan, exclude_allergens, load_catalogue,
    load_metadata, load_plan, save_plan,
};

/// How long a slot's candidate list stays cached.
const CANDIDATE_TTL: Duration = Duration::from_secs(15 * 60);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("menuplan=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };

    match cli.command {
        Command::NewPlan { week_start, diners } => {
            cmd_new_plan(&cli.plan, week_start, diners.unwrap_or(config.diners_per_day()))
        }
        Command::Check { day } => {
            let (catalogue, _, plan) = load_all(&cli.catalogue, &cli.meta, &cli.plan, &config)?;
            cmd_check(&catalogue, &plan, &config, day)
        }
        Command::Order { ref csv } => {
            let (catalogue, meta, plan) = load_all(&cli.catalogue, &cli.meta, &cli.plan, &config)?;
            cmd_order(&catalogue, &meta, &plan, &config, csv.as_deref())
        }
        Command::Pick {
            day,
            slot,
            ref dish,
            ref without,
        } => {
            let (catalogue, _, mut plan) =
                load_all(&cli.catalogue, &cli.meta, &cli.plan, &config)?;
            let changed = match dish {
                Some(reference) => cmd_assign(
                    &catalogue,
                    &mut plan,
                    &config,
                    without,
                    day,
                    slot.into(),
                    reference,
                )?,
                None => pick_session(&catalogue, &mut plan, &config, without, day, slot.into())?,
            };
            if changed {
                save_plan(&cli.plan, &plan)?;
                println!("Plan saved.");
            }
            Ok(())
        }
    }
}

/// Metadata, catalogue and plan, in the order they depend on each other.
fn load_all(
    catalogue_path: &Path,
    meta_path: &Path,
    plan_path: &Path,
    config: &PlannerConfig,
) -> Result<(Catalogue, IngredientMetaTable, WeekPlan)> {
    let meta = if meta_path.exists() {
        load_metadata(meta_path)?
    } else {
        warn!(path = %meta_path.display(), "no ingredient metadata file, ordering will skip every ingredient");
        IngredientMetaTable::new()
    };

    let catalogue = load_catalogue(catalogue_path, &meta, config)?;

    if !plan_path.exists() {
        return Err(MenuError::InvalidInput(format!(
            "plan file not found: {} (create one with 'new-plan')",
            plan_path.display()
        )));
    }
    let plan = load_plan(plan_path, &catalogue)?;

    Ok((catalogue, meta, plan))
}

/// Write an empty plan.
fn cmd_new_plan(path: &Path, week_start: NaiveDate, diners: u32) -> Result<()> {
    if path.exists() && !prompt_yes_no(&format!("Overwrite {}?", path.display()), false)? {
        return Ok(());
    }

    let plan = empty_plan(week_start, diners);
    save_plan(path, &plan)?;
    println!(
        "Empty plan for the week of {} ({} diners per day) written to {}",
        plan.week_start,
        diners,
        path.display()
    );
    Ok(())
}

/// Traffic lights per meal plus the day summary.
fn cmd_check(
    catalogue: &Catalogue,
    plan: &WeekPlan,
    config: &PlannerConfig,
    only: Option<Weekday>,
) -> Result<()> {
    println!();
    println!("=== Week of {} ===", plan.week_start);

    for (weekday, day) in plan.iter_days() {
        if only.is_some_and(|d| d != weekday) {
            continue;
        }

        println!();
        println!("{} {} ({} diners)", weekday, plan.date_of(weekday), day.persons.total());

        let lunch = evaluate_day_meal(day, MealType::Lunch, catalogue, &config.ampel)?;
        let dinner = evaluate_day_meal(day, MealType::Dinner, catalogue, &config.ampel)?;
        display_meal_report("lunch", &lunch);
        display_meal_report("dinner", &dinner);

        let lunch_dishes = catalogue.resolve_all(day.meal_refs(MealType::Lunch));
        let dinner_dishes = catalogue.resolve_all(day.meal_refs(MealType::Dinner));
        let summary = evaluate_day(&lunch_dishes, &dinner_dishes, &day.persons, &config.daily)?;
        if lunch_dishes.len() + dinner_dishes.len() > 0 {
            display_day_report(weekday, &summary);
        }

        let unresolved: Vec<String> = day
            .all_refs()
            .into_iter()
            .filter(|r| catalogue.get(r).is_none())
            .map(|r| format!("Unknown dish \"{}\" skipped.", r))
            .collect();
        display_warnings(&unresolved);
    }

    println!();
    Ok(())
}

/// Aggregate, round and schedule the week's order.
fn cmd_order(
    catalogue: &Catalogue,
    meta: &IngredientMetaTable,
    plan: &WeekPlan,
    config: &PlannerConfig,
    csv: Option<&Path>,
) -> Result<()> {
    let order = generate_order(plan, catalogue, meta, config);
    display_order(&order);

    if let Some(path) = csv {
        write_order_csv(path, &order)?;
        println!("Order written to {}", path.display());
    }
    Ok(())
}

/// Put a named dish into a slot without prompting.
fn cmd_assign(
    catalogue: &Catalogue,
    plan: &mut WeekPlan,
    config: &PlannerConfig,
    without: &[Allergen],
    weekday: Weekday,
    slot: Slot,
    reference: &str,
) -> Result<bool> {
    let dish = catalogue.find(reference)?;
    if let Some(allergen) = without.iter().find(|a| dish.has_allergen(**a)) {
        return Err(MenuError::InvalidInput(format!(
            "\"{}\" contains {:?}",
            dish.name, allergen
        )));
    }

    let day = plan.day_mut(weekday);
    if day.slot(slot) == Some(dish.id.as_str()) {
        return Ok(false);
    }
    *day.slot_mut(slot) = Some(dish.id.clone());
    println!("{} {}: {}", weekday, slot.label(), dish.name);

    let report = evaluate_day_meal(plan.day(weekday), slot.meal(), catalogue, &config.ampel)?;
    display_meal_report(slot.meal().label(), &report);
    Ok(true)
}

/// Pick slots until the user stops. Candidate lists are cached per
/// (week, slot) for the session.
fn pick_session(
    catalogue: &Catalogue,
    plan: &mut WeekPlan,
    config: &PlannerConfig,
    without: &[Allergen],
    mut weekday: Weekday,
    mut slot: Slot,
) -> Result<bool> {
    let store = TtlCache::new();
    let mut changed = false;
    loop {
        changed |= cmd_pick(catalogue, plan, config, &store, without, weekday, slot)?;
        match prompt_next_slot()? {
            Some((next_day, next_slot)) => {
                weekday = next_day;
                slot = next_slot;
            }
            None => return Ok(changed),
        }
    }
}

/// Interactive selection for one slot. Returns whether the plan changed.
fn cmd_pick(
    catalogue: &Catalogue,
    plan: &mut WeekPlan,
    config: &PlannerConfig,
    store: &dyn SuggestionStore,
    without: &[Allergen],
    weekday: Weekday,
    slot: Slot,
) -> Result<bool> {
    let key = CacheKey::for_date(plan.date_of(weekday), slot.label());
    let candidates = exclude_allergens(
        catalogue.cached_candidates(slot, key, store, CANDIDATE_TTL),
        without,
    );
    if candidates.is_empty() {
        println!("No dishes in the catalogue fit the {} slot.", slot.label());
        return Ok(false);
    }

    let day = plan.day(weekday);
    let current = day.slot(slot).map(str::to_string);
    // The advisor judges against the rest of the day.
    let others: Vec<&Dish> = Slot::ALL
        .iter()
        .filter(|s| **s != slot)
        .filter_map(|s| day.slot(*s))
        .filter_map(|r| catalogue.get(r))
        .collect();

    if let Some(id) = &current {
        let name = catalogue.get(id).map(|d| d.name.as_str()).unwrap_or(id.as_str());
        println!("Current {}: {}", slot.label(), name);
    }

    let ranked = rank_candidates(&candidates, &others);
    let chosen = match prompt_dish_choice(&ranked, slot)? {
        SlotChoice::Keep => return Ok(false),
        SlotChoice::Clear => None,
        SlotChoice::Dish(dish) => Some(dish.id.clone()),
    };
    if chosen == current {
        return Ok(false);
    }

    *plan.day_mut(weekday).slot_mut(slot) = chosen;

    let day = plan.day(weekday);
    let report = evaluate_day_meal(day, slot.meal(), catalogue, &config.ampel)?;
    display_meal_report(slot.meal().label(), &report);
    Ok(true)
}
