mod cache;
mod catalogue;
mod normalize;
mod persistence;

pub use cache::{CacheKey, SuggestionStore, TtlCache};
pub use catalogue::{Catalogue, exclude_allergens, load_catalogue, validate_dish};
pub use normalize::{
    RawDish, RawIngredient, RawPortion, normalize, normalize_allergens, parse_record,
    synthesize_group_portions,
};
pub use persistence::{empty_plan, load_metadata, load_plan, migrate_plan_names, save_plan};
