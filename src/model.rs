use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A generated recipe, keyed by its title inside the pantry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Stamped by the server when the recipe is saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_date: Option<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Recipe {
            title: title.into(),
            content: content.into(),
            saved_date: None,
        }
    }

    /// Both a title and some content are needed to show a recipe
    pub fn is_displayable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct TitlesRequest<'a> {
    pub ingredients: &'a str,
    pub preferences: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeRequest<'a> {
    pub title: &'a str,
    pub ingredients: &'a str,
    pub preferences: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RemoveRequest<'a> {
    pub title: &'a str,
}

/// Body of the pantry listing and of a successful save.
///
/// `recipes` is `None` when the field is absent or is not an array.
#[derive(Debug, Default, Deserialize)]
pub struct PantryResponse {
    #[serde(default, deserialize_with = "lenient_recipes")]
    pub recipes: Option<Vec<Recipe>>,
}

/// Error body returned alongside a non-2xx status
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Pantry entries come back either as full recipe objects or as bare
/// titles depending on the deployed backend; accept both and drop
/// anything else.
fn lenient_recipes<'de, D>(deserializer: D) -> Result<Option<Vec<Recipe>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };

    let recipes = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(title) => Some(Recipe::new(title, "")),
            Value::Object(_) => serde_json::from_value::<Recipe>(item).ok(),
            _ => None,
        })
        .collect();

    Ok(Some(recipes))
}
