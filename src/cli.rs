use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use clap::{Parser, Subcommand, ValueEnum};

use crate::models::{Allergen, Slot};

/// menuplan: weekly menu planning for a kitchen. Checks meal balance,
/// advises on dish choice and turns the plan into a supplier order.
#[derive(Parser, Debug)]
#[command(name = "menuplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Recipe catalogue (JSON array of dishes).
    #[arg(long, global = true, default_value = "recipes.json")]
    pub catalogue: PathBuf,

    /// Ingredient order metadata (JSON object keyed by ingredient id).
    #[arg(long, global = true, default_value = "order_meta.json")]
    pub meta: PathBuf,

    /// Weekly plan file.
    #[arg(long, global = true, default_value = "plan.json")]
    pub plan: PathBuf,

    /// Optional planner configuration (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write an empty plan for a week.
    NewPlan {
        /// Any date in the week; the plan starts on its Monday.
        #[arg(long)]
        week_start: NaiveDate,

        /// Diners per day (adults); defaults to the configured value.
        #[arg(long)]
        diners: Option<u32>,
    },

    /// Show the meal traffic lights and the day summary.
    Check {
        /// Only this day (e.g. "mon", "thursday").
        #[arg(long, value_parser = parse_weekday)]
        day: Option<Weekday>,
    },

    /// Aggregate the week into a supplier order.
    Order {
        /// Also write the order as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Choose a dish for a slot, interactively or by name with --dish.
    /// Interactive sessions can go on to further slots.
    Pick {
        #[arg(long, value_parser = parse_weekday)]
        day: Weekday,

        #[arg(long, value_enum)]
        slot: SlotArg,

        /// Dish id or name to put in the slot without prompting.
        #[arg(long)]
        dish: Option<String>,

        /// Leave out dishes containing this allergen (repeatable).
        #[arg(long = "without", value_parser = parse_allergen)]
        without: Vec<Allergen>,
    },
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.parse::<Weekday>()
        .map_err(|_| format!("'{s}' is not a weekday (mon..sun)"))
}

fn parse_allergen(s: &str) -> Result<Allergen, String> {
    Allergen::from_label(s).ok_or_else(|| format!("'{s}' is not a known allergen"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlotArg {
    LunchSoup,
    LunchDessert,
    LunchMain,
    LunchVegetarian,
    DinnerMain,
    DinnerVegetarian,
}

impl From<SlotArg> for Slot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::LunchSoup => Slot::LunchSoup,
            SlotArg::LunchDessert => Slot::LunchDessert,
            SlotArg::LunchMain => Slot::LunchMain,
            SlotArg::LunchVegetarian => Slot::LunchVegetarian,
            SlotArg::DinnerMain => Slot::DinnerMain,
            SlotArg::DinnerVegetarian => Slot::DinnerVegetarian,
        }
    }
}
