//! Dish-in-context advisor: a short, ordered rule list that badges a
//! candidate dish against the dishes already chosen for the day.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{Dish, FoodGroup};
use crate::planner::constants::{
    ADVISOR_PROTEIN_LIMIT, ADVISOR_STARCH_LIMIT, ADVISOR_VEG_FRUIT_TARGET,
};
use crate::planner::day::FoodGroupCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceLabel {
    Good,
    Average,
    Bad,
    Neutral,
}

impl AdviceLabel {
    pub fn label(&self) -> &'static str {
        match self {
            AdviceLabel::Good => "good",
            AdviceLabel::Average => "average",
            AdviceLabel::Bad => "bad",
            AdviceLabel::Neutral => "neutral",
        }
    }

    /// Position when ranking candidates, lower first.
    fn rank(&self) -> u8 {
        match self {
            AdviceLabel::Good => 0,
            AdviceLabel::Neutral => 1,
            AdviceLabel::Average => 2,
            AdviceLabel::Bad => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishAdvice {
    pub label: AdviceLabel,
    pub reason: Option<&'static str>,
}

impl DishAdvice {
    fn neutral() -> Self {
        Self {
            label: AdviceLabel::Neutral,
            reason: None,
        }
    }
}

/// The advisor's rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceRule {
    StarchOverload,
    SecondProtein,
    WholeGrain,
    VegetableGoal,
}

pub const RULES: [AdviceRule; 4] = [
    AdviceRule::StarchOverload,
    AdviceRule::SecondProtein,
    AdviceRule::WholeGrain,
    AdviceRule::VegetableGoal,
];

impl AdviceRule {
    /// Advice if this rule matches the candidate, given the day's counts.
    pub fn apply(&self, dish: &Dish, day: &FoodGroupCounts) -> Option<DishAdvice> {
        let (matches, label, reason) = match self {
            AdviceRule::StarchOverload => (
                dish.food_group == FoodGroup::Starch && day.starch >= ADVISOR_STARCH_LIMIT,
                AdviceLabel::Bad,
                "already two starch sides planned",
            ),
            AdviceRule::SecondProtein => (
                dish.food_group == FoodGroup::Protein && day.protein >= ADVISOR_PROTEIN_LIMIT,
                AdviceLabel::Average,
                "a second protein source already present",
            ),
            AdviceRule::WholeGrain => (
                dish.whole_grain && day.whole_grain == 0,
                AdviceLabel::Good,
                "good whole-grain choice",
            ),
            AdviceRule::VegetableGoal => (
                matches!(dish.food_group, FoodGroup::Vegetable | FoodGroup::Fruit)
                    && day.veg_fruit() < ADVISOR_VEG_FRUIT_TARGET,
                AdviceLabel::Good,
                "helps reach the vegetable/fruit goal",
            ),
        };

        matches.then_some(DishAdvice {
            label,
            reason: Some(reason),
        })
    }
}

/// Badge a candidate dish; the first matching rule wins.
pub fn evaluate_dish_in_context(dish: &Dish, day: &[&Dish]) -> DishAdvice {
    let counts = FoodGroupCounts::from_dishes(day.iter().copied());
    advise(dish, &counts)
}

fn advise(dish: &Dish, counts: &FoodGroupCounts) -> DishAdvice {
    RULES
        .iter()
        .find_map(|rule| rule.apply(dish, counts))
        .unwrap_or_else(DishAdvice::neutral)
}

/// Candidates with their advice, good first and bad last, ties by name.
pub fn rank_candidates<'a>(candidates: &[&'a Dish], day: &[&Dish]) -> Vec<(&'a Dish, DishAdvice)> {
    let counts = FoodGroupCounts::from_dishes(day.iter().copied());

    let mut ranked: Vec<(&'a Dish, DishAdvice)> = candidates
        .iter()
        .map(|dish| (*dish, advise(dish, &counts)))
        .collect();

    ranked.sort_by(|(a, adv_a), (b, adv_b)| match adv_a.label.rank().cmp(&adv_b.label.rank()) {
        Ordering::Equal => a.name.cmp(&b.name),
        ord => ord,
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrition, PortionSpec};

    fn dish(name: &str, group: FoodGroup, whole_grain: bool) -> Dish {
        Dish {
            id: name.to_lowercase(),
            name: name.to_string(),
            allergens: Vec::new(),
            food_group: group,
            whole_grain,
            source_category: String::new(),
            nutrition: Nutrition::Per100g {
                kcal_per_100g: 100.0,
                protein_per_100g: 0.0,
                fat_per_100g: 0.0,
                carbs_per_100g: 0.0,
            },
            portion: PortionSpec::base_only(200.0),
            ingredients: Vec::new(),
        }
    }

    #[test]
    fn test_third_starch_is_bad() {
        let rice = dish("Rice", FoodGroup::Starch, false);
        let pasta = dish("Pasta", FoodGroup::Starch, false);
        let potatoes = dish("Potatoes", FoodGroup::Starch, false);

        let advice = evaluate_dish_in_context(&potatoes, &[&rice, &pasta]);
        assert_eq!(advice.label, AdviceLabel::Bad);
        assert_eq!(advice.reason, Some("already two starch sides planned"));

        let advice = evaluate_dish_in_context(&potatoes, &[&rice]);
        assert_eq!(advice.label, AdviceLabel::Neutral);
        assert_eq!(advice.reason, None);
    }

    #[test]
    fn test_starch_rule_beats_whole_grain() {
        let rice = dish("Rice", FoodGroup::Starch, false);
        let pasta = dish("Pasta", FoodGroup::Starch, false);
        let bread = dish("Bread", FoodGroup::Starch, true);

        let advice = evaluate_dish_in_context(&bread, &[&rice, &pasta]);
        assert_eq!(advice.label, AdviceLabel::Bad);
    }

    #[test]
    fn test_protein_and_whole_grain() {
        let fish = dish("Fish", FoodGroup::Protein, false);
        let beef = dish("Beef", FoodGroup::Protein, false);
        let tofu = dish("Tofu", FoodGroup::Protein, false);
        assert_eq!(
            evaluate_dish_in_context(&tofu, &[&fish, &beef]).label,
            AdviceLabel::Average
        );

        let bread = dish("Bread", FoodGroup::Starch, true);
        let advice = evaluate_dish_in_context(&bread, &[&fish]);
        assert_eq!(advice.label, AdviceLabel::Good);
        assert_eq!(advice.reason, Some("good whole-grain choice"));
        assert_eq!(
            evaluate_dish_in_context(&bread, &[&bread]).label,
            AdviceLabel::Neutral
        );
    }

    #[test]
    fn test_vegetable_goal() {
        let salad = dish("Salad", FoodGroup::Vegetable, false);
        let veg: Vec<Dish> = (0..4)
            .map(|i| dish(&format!("Veg{i}"), FoodGroup::Vegetable, false))
            .collect();
        let day: Vec<&Dish> = veg.iter().collect();

        assert_eq!(
            evaluate_dish_in_context(&salad, &day[..3]).label,
            AdviceLabel::Good
        );
        assert_eq!(
            evaluate_dish_in_context(&salad, &day).label,
            AdviceLabel::Neutral
        );
    }

    #[test]
    fn test_rank_candidates_order() {
        let rice = dish("Rice", FoodGroup::Starch, false);
        let pasta = dish("Pasta", FoodGroup::Starch, false);
        let fish = dish("Fish", FoodGroup::Protein, false);
        let beef = dish("Beef", FoodGroup::Protein, false);
        let day = [&rice, &pasta, &fish, &beef];

        let potatoes = dish("Potatoes", FoodGroup::Starch, false);
        let tofu = dish("Tofu", FoodGroup::Protein, false);
        let apple = dish("Apple", FoodGroup::Fruit, false);
        let soup = dish("Soup", FoodGroup::Soup, false);
        let cake = dish("Cake", FoodGroup::Dessert, false);

        let ranked = rank_candidates(&[&potatoes, &tofu, &soup, &apple, &cake], &day);
        let names: Vec<&str> = ranked.iter().map(|(d, _)| d.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Cake", "Soup", "Tofu", "Potatoes"]);
    }
}
