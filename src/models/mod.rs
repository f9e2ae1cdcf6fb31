pub mod dish;
pub mod order;
pub mod plan;

pub use dish::{
    Allergen, Dish, FoodGroup, IngredientLine, Nutrition, PersonsByGroup, PopulationGroup,
    PortionSpec,
};
pub use order::{
    DeliveryDay, IngredientDemand, IngredientMeta, IngredientMetaTable, OrderLine, OrderNote,
};
pub use plan::{DayPlan, DinnerSlots, LunchSlots, MealType, Slot, WeekPlan, WeeklyHits};
