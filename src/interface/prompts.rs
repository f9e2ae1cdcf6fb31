use chrono::Weekday;
use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::Result;
use crate::interface::render::advice_badge;
use crate::models::{Dish, Slot};
use crate::planner::DishAdvice;

/// Minimum Jaro-Winkler similarity for a fuzzy hit.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Candidates shown per selection prompt.
const MAX_OPTIONS: usize = 15;

/// What the user did with a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotChoice<'a> {
    Dish(&'a Dish),
    Clear,
    Keep,
}

/// Narrow ranked candidates by a free-text query.
///
/// An empty query keeps the ranking. Otherwise substring hits come first (in
/// ranked order), then fuzzy hits by similarity.
pub fn fuzzy_filter<'a, 'b>(
    ranked: &'b [(&'a Dish, DishAdvice)],
    query: &str,
) -> Vec<&'b (&'a Dish, DishAdvice)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return ranked.iter().collect();
    }

    let (mut hits, rest): (Vec<_>, Vec<_>) = ranked
        .iter()
        .partition(|(dish, _)| dish.name.to_lowercase().contains(&query));

    let mut fuzzy: Vec<(&'b (&'a Dish, DishAdvice), f64)> = rest
        .into_iter()
        .map(|c| (c, jaro_winkler(&c.0.name.to_lowercase(), &query)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();
    fuzzy.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    hits.extend(fuzzy.into_iter().map(|(c, _)| c));
    hits
}

/// Interactive dish selection for one slot, with advisor badges.
pub fn prompt_dish_choice<'a>(
    ranked: &[(&'a Dish, DishAdvice)],
    slot: Slot,
) -> Result<SlotChoice<'a>> {
    loop {
        let query: String = Input::new()
            .with_prompt(format!("Search dish for {} (Enter lists all)", slot.label()))
            .allow_empty(true)
            .interact_text()?;

        let matches = fuzzy_filter(ranked, &query);
        if matches.is_empty() {
            println!("No matching dish found for '{}'", query.trim());
            continue;
        }

        let shown: Vec<&(&Dish, DishAdvice)> = matches.into_iter().take(MAX_OPTIONS).collect();
        let mut options: Vec<String> = shown
            .iter()
            .map(|(dish, advice)| format!("{}  {}", dish.name, advice_badge(advice)))
            .collect();
        options.push("Search again".to_string());
        options.push("Clear slot".to_string());
        options.push("Keep current".to_string());

        let selection = Select::new()
            .with_prompt("Which dish?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection.checked_sub(shown.len()) {
            None => return Ok(SlotChoice::Dish(shown[selection].0)),
            Some(0) => continue,
            Some(1) => return Ok(SlotChoice::Clear),
            Some(_) => return Ok(SlotChoice::Keep),
        }
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Ask whether to continue with another slot, and which one.
pub fn prompt_next_slot() -> Result<Option<(Weekday, Slot)>> {
    if !prompt_yes_no("Pick another slot?", false)? {
        return Ok(None);
    }

    let days: Vec<String> = WEEKDAYS.iter().map(|d| d.to_string()).collect();
    let day = Select::new()
        .with_prompt("Day")
        .items(&days)
        .default(0)
        .interact()?;

    let slots: Vec<&str> = Slot::ALL.iter().map(|s| s.label()).collect();
    let slot = Select::new()
        .with_prompt("Slot")
        .items(&slots)
        .default(0)
        .interact()?;

    Ok(Some((WEEKDAYS[day], Slot::ALL[slot])))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
