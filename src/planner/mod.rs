pub mod advisor;
pub mod aggregation;
pub mod ampel;
pub mod calculations;
pub mod constants;
pub mod day;
pub mod ordering;

pub use advisor::{AdviceLabel, AdviceRule, DishAdvice, evaluate_dish_in_context, rank_candidates};
pub use aggregation::{Aggregation, DishUsage, accumulate, aggregate_week, gross_from_net, week_usages};
pub use ampel::{
    AmpelColor, MealBalanceReport, Note, NoteKind, classify, evaluate_day_meal, evaluate_meal,
    evaluate_meal_type,
};
pub use calculations::{
    DishEnergy, Nutrient, dish_energy, fat_for_portion, kcal_for_portion, nutrient_for_portion,
    protein_for_portion, recipe_total_kcal, served_grams,
};
pub use constants::*;
pub use day::{DayNutritionReport, DayStatus, FoodGroupCounts, evaluate_day};
pub use ordering::{
    WeeklyOrder, build_order, delivery_day, generate_order, pack_count, round_order_qty,
    round_tiered_g, schedule, shelf_life_buffer,
};
