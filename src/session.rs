use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::client::{HttpRecipeApi, RecipeApi};
use crate::config::PantryConfig;
use crate::formatter::{format_recipe_with, FormatOptions};
use crate::model::Recipe;
use crate::PantryError;

/// State behind the recipe generator and the pantry views.
///
/// Every handler catches its own failures and logs them; the state is left
/// as the last successful step produced.
pub struct Session {
    api: Arc<dyn RecipeApi>,
    options: FormatOptions,
    ingredients: String,
    preferences: String,
    titles: Vec<String>,
    selected_title: Option<String>,
    recipe: Option<Recipe>,
    is_loading: bool,
    saved_recipes: Vec<Recipe>,
}

impl Session {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Session {
            api,
            options: FormatOptions::default(),
            ingredients: String::new(),
            preferences: String::new(),
            titles: Vec::new(),
            selected_title: None,
            recipe: None,
            is_loading: false,
            saved_recipes: Vec::new(),
        }
    }

    /// Session talking HTTP to the configured API
    pub fn from_config(config: &PantryConfig) -> Result<Self, PantryError> {
        let api = HttpRecipeApi::new(&config.api)?;
        info!("Using recipe API at {}", api.base_url());
        Ok(Session::new(Arc::new(api)).with_format_options(FormatOptions {
            escape_html: config.formatter.escape_html,
        }))
    }

    pub fn with_format_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    pub fn preferences(&self) -> &str {
        &self.preferences
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn selected_title(&self) -> Option<&str> {
        self.selected_title.as_deref()
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn saved_recipes(&self) -> &[Recipe] {
        &self.saved_recipes
    }

    /// Saved recipes that have both a title and content
    pub fn displayable_recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.saved_recipes.iter().filter(|r| r.is_displayable())
    }

    /// Update the ingredient list used by the next request. The selected
    /// recipe is not regenerated; select a title again to refresh it.
    pub fn set_ingredients(&mut self, ingredients: impl Into<String>) {
        self.ingredients = ingredients.into();
    }

    /// Same as [`Session::set_ingredients`], for dietary preferences
    pub fn set_preferences(&mut self, preferences: impl Into<String>) {
        self.preferences = preferences.into();
    }

    /// The current recipe as markup, empty when there is none
    pub fn formatted_recipe(&self) -> String {
        self.recipe
            .as_ref()
            .map(|r| format_recipe_with(&r.content, &self.options))
            .unwrap_or_default()
    }

    /// Format any recipe with this session's options
    pub fn format(&self, recipe: &Recipe) -> String {
        format_recipe_with(&recipe.content, &self.options)
    }

    /// Start over. The pantry listing is kept.
    pub fn reset(&mut self) {
        self.ingredients.clear();
        self.preferences.clear();
        self.titles.clear();
        self.selected_title = None;
        self.recipe = None;
        self.is_loading = false;
    }

    /// Ask for candidate titles and select the first one, which in turn
    /// generates its recipe.
    pub async fn generate_titles(&mut self) {
        self.is_loading = true;
        let result = self
            .api
            .generate_titles(&self.ingredients, &self.preferences)
            .await;
        match result {
            Ok(titles) => {
                info!("Generated {} recipe titles", titles.len());
                let first = titles.first().cloned();
                self.titles = titles;
                match first {
                    Some(title) => self.select_title(title).await,
                    None => self.selected_title = None,
                }
            }
            Err(e) => error!("Error generating titles: {}", e),
        }
        self.is_loading = false;
    }

    /// Change the selected title; a new non-empty selection generates
    /// its recipe.
    pub async fn select_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if self.selected_title.as_deref() == Some(title.as_str()) {
            debug!("'{}' already selected", title);
            return;
        }

        let generate = !title.is_empty();
        self.selected_title = Some(title);
        if generate {
            self.generate_recipe().await;
        }
    }

    /// Generate the full recipe for the selected title
    pub async fn generate_recipe(&mut self) {
        let Some(title) = self.selected_title.clone().filter(|t| !t.is_empty()) else {
            warn!("No title selected, not generating a recipe");
            return;
        };

        self.is_loading = true;
        let result = self
            .api
            .generate_recipe(&title, &self.ingredients, &self.preferences)
            .await;
        match result {
            Ok(recipe) => {
                info!("Generated recipe '{}'", recipe.title);
                self.recipe = Some(recipe);
            }
            Err(e) => error!("Error generating recipe: {}", e),
        }
        self.is_loading = false;
    }

    /// Save the current recipe to the pantry
    pub async fn save_recipe(&mut self) {
        let Some(recipe) = self.recipe.clone() else {
            debug!("No recipe to save");
            return;
        };

        let result = self.api.save_recipe(&recipe).await;
        match result {
            Ok(Some(_)) => {
                info!("Saved '{}' to the pantry", recipe.title);
                self.saved_recipes.push(recipe);
            }
            Ok(None) => warn!("Save response for '{}' had no recipe list", recipe.title),
            Err(e) => error!("Error saving recipe: {}", e),
        }
    }

    /// Remove a recipe from the pantry, then reload the listing
    pub async fn remove_recipe(&mut self, title: &str) {
        if title.is_empty() {
            error!("Error removing recipe: No title provided");
            return;
        }

        let result = self.api.remove_recipe(title).await;
        match result {
            Ok(()) => {
                info!("Removed '{}' from the pantry", title);
                self.load_saved_recipes().await;
            }
            Err(e) => error!("Error removing recipe: {}", e),
        }
    }

    /// Replace the local listing with the server's; empty on failure
    pub async fn load_saved_recipes(&mut self) {
        self.saved_recipes = match self.api.list_recipes().await {
            Ok(recipes) => recipes,
            Err(e) => {
                error!("Error loading recipes: {}", e);
                Vec::new()
            }
        };
    }
}
