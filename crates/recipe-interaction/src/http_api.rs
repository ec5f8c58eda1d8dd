//! HttpRecipeApi - REST implementation of [`RecipeApi`].
//!
//! Every request goes through one `reqwest::Client` with a cookie store, so the
//! session cookie set by login/register is attached to later requests.
//!
//! Configuration priority: command line > RECIPES_API_URL > config file > default

use async_trait::async_trait;
use recipe_core::api::RecipeApi;
use recipe_core::config::ClientConfig;
use recipe_core::error::{RecipeError, Result};
use recipe_core::recipe::{FilterCriteria, Recipe, RecipeDraft, RecipeId};
use recipe_core::session::{Credentials, Identity};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DELETE_FAILED_MESSAGE: &str = "Failed to delete";

/// Client for the recipe service HTTP API.
#[derive(Clone)]
pub struct HttpRecipeApi {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for CredentialsBody<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: &credentials.username,
            password: &credentials.password,
        }
    }
}

impl HttpRecipeApi {
    /// Creates a client for the service described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RecipeError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|err| {
            RecipeError::transport(format!("Recipe service request failed: {err}"))
        })
    }

    async fn post_credentials(&self, path: &str, credentials: &Credentials) -> Result<Identity> {
        tracing::debug!("[HttpRecipeApi] POST {} as {}", path, credentials.username);
        let response = self
            .send(
                self.client
                    .post(self.url(path))
                    .json(&CredentialsBody::from(credentials)),
            )
            .await?;
        // login/register are not protected, so a 401 here is an ordinary rejection
        parse_json(response, false).await
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        self.post_credentials("/auth/login", credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<Identity> {
        self.post_credentials("/auth/register", credentials).await
    }

    async fn logout(&self) -> Result<()> {
        tracing::debug!("[HttpRecipeApi] POST /auth/logout");
        let response = self.send(self.client.post(self.url("/auth/logout"))).await?;
        if !response.status().is_success() {
            tracing::debug!(
                "[HttpRecipeApi] Logout answered {}, ignoring",
                response.status()
            );
        }
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<Identity>> {
        tracing::debug!("[HttpRecipeApi] GET /auth/me");
        let response = self.send(self.client.get(self.url("/auth/me"))).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        parse_json(response, true).await.map(Some)
    }

    async fn list_recipes(&self, criteria: &FilterCriteria) -> Result<Vec<Recipe>> {
        tracing::debug!("[HttpRecipeApi] GET /recipes {:?}", criteria);
        let response = self
            .send(
                self.client
                    .get(self.url("/recipes"))
                    .query(&criteria.query_pairs()),
            )
            .await?;
        parse_json(response, true).await
    }

    async fn get_recipe(&self, id: &RecipeId) -> Result<Recipe> {
        tracing::debug!("[HttpRecipeApi] GET /recipes/{}", id);
        let response = self
            .send(self.client.get(self.url(&format!("/recipes/{id}"))))
            .await?;
        parse_json(response, true).await
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe> {
        tracing::debug!("[HttpRecipeApi] POST /recipes '{}'", draft.title);
        let response = self
            .send(self.client.post(self.url("/recipes")).json(draft))
            .await?;
        parse_json(response, true).await
    }

    async fn update_recipe(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<Recipe> {
        tracing::debug!("[HttpRecipeApi] PUT /recipes/{}", id);
        let response = self
            .send(
                self.client
                    .put(self.url(&format!("/recipes/{id}")))
                    .json(draft),
            )
            .await?;
        parse_json(response, true).await
    }

    async fn delete_recipe(&self, id: &RecipeId) -> Result<()> {
        tracing::debug!("[HttpRecipeApi] DELETE /recipes/{}", id);
        let response = self
            .send(self.client.delete(self.url(&format!("/recipes/{id}"))))
            .await?;
        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(RecipeError::request(status.as_u16(), DELETE_FAILED_MESSAGE));
        }
        Ok(())
    }

    async fn toggle_favorite(&self, id: &RecipeId) -> Result<()> {
        tracing::debug!("[HttpRecipeApi] POST /recipes/{}/favorite", id);
        let response = self
            .send(self.client.post(self.url(&format!("/recipes/{id}/favorite"))))
            .await?;
        ensure_success(response, true).await.map(|_| ())
    }

    async fn list_favorites(&self) -> Result<Vec<Recipe>> {
        tracing::debug!("[HttpRecipeApi] GET /recipes/favorites");
        let response = self
            .send(self.client.get(self.url("/recipes/favorites")))
            .await?;
        parse_json(response, true).await
    }
}

async fn ensure_success(response: Response, protected: bool) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_http_error(status, &body, protected))
}

async fn parse_json<T: DeserializeOwned>(response: Response, protected: bool) -> Result<T> {
    let response = ensure_success(response, protected).await?;
    let body = response
        .text()
        .await
        .map_err(|err| RecipeError::transport(format!("Failed to read response body: {err}")))?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

/// Maps a non-success response to the error taxonomy.
///
/// A 401 on a protected endpoint is an auth error; everything else is a
/// request error carrying the message extracted from the body.
pub(crate) fn map_http_error(status: StatusCode, body: &str, protected: bool) -> RecipeError {
    let message = error_message(status, body);
    if protected && status == StatusCode::UNAUTHORIZED {
        RecipeError::auth(message)
    } else {
        RecipeError::request(status.as_u16(), message)
    }
}

/// The body text if non-empty, the `detail`/`message`/`error` string if the
/// body is such a JSON object, else the status's reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        let text = [parsed.detail, parsed.message, parsed.error]
            .into_iter()
            .flatten()
            .find_map(|value| value.as_str().map(str::to_string));
        if let Some(text) = text {
            return text;
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_detail() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Username taken"}"#);
        assert_eq!(msg, "Username taken");
    }

    #[test]
    fn test_error_message_plain_text() {
        let msg = error_message(StatusCode::BAD_REQUEST, "  title is required\n");
        assert_eq!(msg, "title is required");
    }

    #[test]
    fn test_error_message_json_without_known_keys_is_kept_verbatim() {
        let msg = error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail": [1, 2]}"#);
        assert_eq!(msg, r#"{"detail": [1, 2]}"#);
    }

    #[test]
    fn test_error_message_empty_body_uses_reason() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_401_is_auth_only_on_protected_endpoints() {
        assert!(map_http_error(StatusCode::UNAUTHORIZED, "no session", true).is_auth());

        let login = map_http_error(StatusCode::UNAUTHORIZED, "Invalid credentials", false);
        assert_eq!(login, RecipeError::request(401, "Invalid credentials"));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let config = ClientConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        let api = HttpRecipeApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/recipes"), "http://localhost:8000/recipes");
    }
}
