use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::PersonsByGroup;

/// Storage format written by this version; older plans reference dishes by name.
pub const PLAN_VERSION: &str = "menuData.v2";

/// Number of dinner weekly-hit slots in a plan.
pub const DINNER_HIT_SLOTS: usize = 4;

/// The two meal occasions of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

/// A dish slot inside one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    LunchSoup,
    LunchDessert,
    LunchMain,
    LunchVegetarian,
    DinnerMain,
    DinnerVegetarian,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::LunchSoup,
        Slot::LunchDessert,
        Slot::LunchMain,
        Slot::LunchVegetarian,
        Slot::DinnerMain,
        Slot::DinnerVegetarian,
    ];

    pub fn meal(&self) -> MealType {
        match self {
            Slot::LunchSoup | Slot::LunchDessert | Slot::LunchMain | Slot::LunchVegetarian => {
                MealType::Lunch
            }
            Slot::DinnerMain | Slot::DinnerVegetarian => MealType::Dinner,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Slot::LunchSoup => "lunch soup",
            Slot::LunchDessert => "lunch dessert",
            Slot::LunchMain => "lunch main",
            Slot::LunchVegetarian => "lunch vegetarian",
            Slot::DinnerMain => "dinner main",
            Slot::DinnerVegetarian => "dinner vegetarian",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LunchSlots {
    #[serde(default, alias = "suppe")]
    pub soup: Option<String>,
    #[serde(default)]
    pub dessert: Option<String>,
    #[serde(default, alias = "menu")]
    pub main: Option<String>,
    #[serde(default, alias = "vegi")]
    pub vegetarian: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DinnerSlots {
    #[serde(default, alias = "menu")]
    pub main: Option<String>,
    #[serde(default, alias = "vegi")]
    pub vegetarian: Option<String>,
}

/// One day of the weekly plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(default)]
    pub persons: PersonsByGroup,
    #[serde(default, alias = "mittag")]
    pub lunch: LunchSlots,
    #[serde(default, alias = "abend")]
    pub dinner: DinnerSlots,
}

/// Empty strings come from UI state awaiting a selection.
fn filled(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl DayPlan {
    pub fn with_persons(persons: PersonsByGroup) -> Self {
        Self {
            persons,
            ..Default::default()
        }
    }

    /// Dish reference in a slot, if one is selected.
    pub fn slot(&self, slot: Slot) -> Option<&str> {
        filled(self.slot_ref(slot))
    }

    fn slot_ref(&self, slot: Slot) -> &Option<String> {
        match slot {
            Slot::LunchSoup => &self.lunch.soup,
            Slot::LunchDessert => &self.lunch.dessert,
            Slot::LunchMain => &self.lunch.main,
            Slot::LunchVegetarian => &self.lunch.vegetarian,
            Slot::DinnerMain => &self.dinner.main,
            Slot::DinnerVegetarian => &self.dinner.vegetarian,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::LunchSoup => &mut self.lunch.soup,
            Slot::LunchDessert => &mut self.lunch.dessert,
            Slot::LunchMain => &mut self.lunch.main,
            Slot::LunchVegetarian => &mut self.lunch.vegetarian,
            Slot::DinnerMain => &mut self.dinner.main,
            Slot::DinnerVegetarian => &mut self.dinner.vegetarian,
        }
    }

    /// Selected dish references of one meal, in slot order.
    pub fn meal_refs(&self, meal: MealType) -> Vec<&str> {
        Slot::ALL
            .iter()
            .filter(|s| s.meal() == meal)
            .filter_map(|s| self.slot(*s))
            .collect()
    }

    /// All selected dish references of the day, in slot order.
    pub fn all_refs(&self) -> Vec<&str> {
        Slot::ALL.iter().filter_map(|s| self.slot(*s)).collect()
    }
}

/// Standing alternatives offered across several days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHits {
    /// Lunch hit offered Monday to Wednesday.
    #[serde(default, alias = "wochenhitMittag1")]
    pub lunch_early: Option<String>,

    /// Lunch hit offered Thursday to Sunday.
    #[serde(default, alias = "wochenhitMittag2")]
    pub lunch_late: Option<String>,

    /// Dinner hits, all offered the whole week.
    #[serde(default, alias = "wochenhitAbend")]
    pub dinner: Vec<Option<String>>,
}

impl WeeklyHits {
    pub fn lunch_early(&self) -> Option<&str> {
        filled(&self.lunch_early)
    }

    pub fn lunch_late(&self) -> Option<&str> {
        filled(&self.lunch_late)
    }

    /// Configured dinner hits, empty slots skipped.
    pub fn dinner(&self) -> Vec<&str> {
        self.dinner.iter().filter_map(filled).collect()
    }
}

/// A full week of meal slots plus the weekly hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    #[serde(default)]
    pub version: Option<String>,

    /// Monday of the planned week.
    pub week_start: NaiveDate,

    /// Monday first.
    pub days: [DayPlan; 7],

    #[serde(default)]
    pub hits: WeeklyHits,
}

impl WeekPlan {
    /// Empty plan with the same diner mix every day.
    pub fn empty(week_start: NaiveDate, persons: PersonsByGroup) -> Self {
        Self {
            version: Some(PLAN_VERSION.to_string()),
            week_start,
            days: std::array::from_fn(|_| DayPlan::with_persons(persons)),
            hits: WeeklyHits {
                dinner: vec![None; DINNER_HIT_SLOTS],
                ..Default::default()
            },
        }
    }

    pub fn day(&self, weekday: Weekday) -> &DayPlan {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DayPlan {
        &mut self.days[weekday.num_days_from_monday() as usize]
    }

    /// Calendar date of a weekday in this plan's week.
    pub fn date_of(&self, weekday: Weekday) -> NaiveDate {
        self.week_start + Days::new(weekday.num_days_from_monday() as u64)
    }

    /// (weekday, day) pairs from Monday to Sunday.
    pub fn iter_days(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> + '_ {
        self.days
            .iter()
            .enumerate()
            .map(|(i, day)| (weekday_from_index(i), day))
    }

    pub fn is_current_version(&self) -> bool {
        self.version.as_deref() == Some(PLAN_VERSION)
    }
}

/// Weekday for a zero-based index with Monday = 0.
pub fn weekday_from_index(index: usize) -> Weekday {
    match index % 7 {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Zero-based weekday index (Monday = 0) of a date.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}
