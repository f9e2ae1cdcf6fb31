pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use config::PlannerConfig;
pub use error::{MenuError, Result};
pub use models::{Dish, IngredientLine, Nutrition, OrderLine, PersonsByGroup, PortionSpec, WeekPlan};
pub use state::Catalogue;
