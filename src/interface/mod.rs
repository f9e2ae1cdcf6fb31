pub mod export;
pub mod prompts;
pub mod render;

pub use export::{write_order, write_order_csv};
pub use prompts::{
    SlotChoice, fuzzy_filter, prompt_dish_choice, prompt_next_slot, prompt_yes_no,
};
pub use render::{
    advice_badge, display_day_report, display_meal_report, display_order, display_warnings,
};
