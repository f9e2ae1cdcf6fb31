use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Invalid dish {dish}: {reason}")]
    InvalidDish { dish: String, reason: String },

    #[error("Duplicate dish id: {0}")]
    DuplicateDish(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MenuError {
    pub(crate) fn invalid_dish(dish: impl Into<String>, reason: impl Into<String>) -> Self {
        MenuError::InvalidDish {
            dish: dish.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
