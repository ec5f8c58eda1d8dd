//! Recipe service trait.
//!
//! Defines the interface to the remote recipe service, decoupling the client
//! state machine from the transport.

use crate::error::Result;
use crate::recipe::{FilterCriteria, Recipe, RecipeDraft, RecipeId};
use crate::session::{Credentials, Identity};
use async_trait::async_trait;

/// An abstract client for the recipe service.
///
/// The session is carried implicitly by the implementation (for HTTP, a cookie
/// jar); callers never handle a token.
///
/// # Implementation Notes
///
/// Implementations should map:
/// - 401 on protected endpoints to `RecipeError::Auth`
/// - any other non-success status to `RecipeError::Request` carrying the
///   message extracted from the response body
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<Identity>;

    /// `POST /auth/register`. A successful registration also logs in.
    async fn register(&self, credentials: &Credentials) -> Result<Identity>;

    /// `POST /auth/logout`. The response is not inspected.
    async fn logout(&self) -> Result<()>;

    /// `GET /auth/me`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(identity))`: a session exists
    /// - `Ok(None)`: the service answered 401, i.e. no session
    /// - `Err(_)`: any other failure
    async fn current_identity(&self) -> Result<Option<Identity>>;

    /// `GET /recipes?search=&favorites=`
    async fn list_recipes(&self, criteria: &FilterCriteria) -> Result<Vec<Recipe>>;

    /// `GET /recipes/{id}`
    async fn get_recipe(&self, id: &RecipeId) -> Result<Recipe>;

    /// `POST /recipes`
    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe>;

    /// `PUT /recipes/{id}`
    async fn update_recipe(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<Recipe>;

    /// `DELETE /recipes/{id}`. Only a 204 counts as success.
    async fn delete_recipe(&self, id: &RecipeId) -> Result<()>;

    /// `POST /recipes/{id}/favorite`. The response body is ignored.
    async fn toggle_favorite(&self, id: &RecipeId) -> Result<()>;

    /// `GET /recipes/favorites`
    async fn list_favorites(&self) -> Result<Vec<Recipe>>;
}
