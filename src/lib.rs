pub mod client;
pub mod config;
pub mod error;
pub mod formatter;
pub mod model;
pub mod session;

pub use client::{HttpRecipeApi, RecipeApi};
pub use config::{ApiConfig, PantryConfig};
pub use error::PantryError;
pub use formatter::{
    collapse_closing_tags, format_recipe, format_recipe_with, read_recipe_text, FormatOptions,
};
pub use model::Recipe;
pub use session::Session;

