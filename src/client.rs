use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::model::{
    ErrorBody, PantryResponse, Recipe, RecipeRequest, RemoveRequest, TitlesRequest,
    TitlesResponse,
};
use crate::PantryError;

/// The remote recipe API: title and recipe generation plus the pantry
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Candidate recipe titles for the given ingredients
    async fn generate_titles(
        &self,
        ingredients: &str,
        preferences: &str,
    ) -> Result<Vec<String>, PantryError>;

    /// Full recipe text for one of the generated titles
    async fn generate_recipe(
        &self,
        title: &str,
        ingredients: &str,
        preferences: &str,
    ) -> Result<Recipe, PantryError>;

    /// Store a recipe in the pantry.
    ///
    /// Returns the pantry listing from the response, `None` when the
    /// response carried no `recipes` array.
    async fn save_recipe(&self, recipe: &Recipe) -> Result<Option<Vec<Recipe>>, PantryError>;

    /// Delete a recipe from the pantry by title
    async fn remove_recipe(&self, title: &str) -> Result<(), PantryError>;

    /// Everything currently in the pantry
    async fn list_recipes(&self) -> Result<Vec<Recipe>, PantryError>;
}

/// `RecipeApi` over HTTP
pub struct HttpRecipeApi {
    client: Client,
    base_url: String,
}

impl HttpRecipeApi {
    pub fn new(config: &ApiConfig) -> Result<Self, PantryError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(HttpRecipeApi {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, PantryError> {
        debug!("POST {}", path);
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }
}

/// Turn a non-2xx response into `PantryError::Status`, preferring the
/// `error` field of the body as the message.
async fn ensure_success(
    response: Response,
    fallback: Option<&str>,
) -> Result<Response, PantryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

    warn!("API answered {}: {}", status, message);
    Err(PantryError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PantryError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn generate_titles(
        &self,
        ingredients: &str,
        preferences: &str,
    ) -> Result<Vec<String>, PantryError> {
        let request = TitlesRequest {
            ingredients,
            preferences,
        };
        let response = ensure_success(self.post("/api/generate-titles", &request).await?, None)
            .await?;
        let titles: TitlesResponse = decode(response).await?;
        debug!("received {} titles", titles.titles.len());
        Ok(titles.titles)
    }

    async fn generate_recipe(
        &self,
        title: &str,
        ingredients: &str,
        preferences: &str,
    ) -> Result<Recipe, PantryError> {
        if title.is_empty() {
            return Err(PantryError::InvalidInput("No title provided".to_string()));
        }
        let request = RecipeRequest {
            title,
            ingredients,
            preferences,
        };
        let response =
            ensure_success(self.post("/api/generate-recipe", &request).await?, None).await?;
        decode(response).await
    }

    async fn save_recipe(&self, recipe: &Recipe) -> Result<Option<Vec<Recipe>>, PantryError> {
        let response = ensure_success(self.post("/api/save-recipe", recipe).await?, None).await?;
        let pantry: PantryResponse = decode(response).await?;
        Ok(pantry.recipes)
    }

    async fn remove_recipe(&self, title: &str) -> Result<(), PantryError> {
        if title.is_empty() {
            return Err(PantryError::InvalidInput("No title provided".to_string()));
        }
        let response = self
            .post("/api/remove-recipe", &RemoveRequest { title })
            .await?;
        ensure_success(response, Some("Failed to remove recipe")).await?;
        Ok(())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, PantryError> {
        debug!("GET /api/recipes");
        let response = self.client.get(self.url("/api/recipes")).send().await?;
        let response = ensure_success(response, None).await?;
        let pantry: PantryResponse = decode(response).await?;

        Ok(pantry.recipes.unwrap_or_else(|| {
            warn!("pantry listing had no recipes array");
            Vec::new()
        }))
    }
}
