//! Recipe application use case.
//!
//! This module provides [`RecipeApp`], which owns the auth session manager, the
//! recipe collection store and the view selection machine, and is the single
//! entry point for user intents. Each intent performs its state mutation and
//! then explicitly issues the refetches that mutation requires.

use crate::auth::AuthSessionManager;
use crate::collection::{CollectionSnapshot, RecipeCollectionStore, RefetchOutcome};
use crate::view::ViewSelectionMachine;
use recipe_core::api::RecipeApi;
use recipe_core::error::{RecipeError, Result};
use recipe_core::recipe::{Recipe, RecipeField, RecipeId};
use recipe_core::session::{AuthMode, Credentials, Session};
use recipe_core::view::{Theme, ViewSelection};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A user intent issued by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    /// Login or register, according to the current auth mode.
    SubmitCredentials(Credentials),
    Login(Credentials),
    Register(Credentials),
    ToggleAuthMode,
    Logout,
    /// Update the search term; refetches only if it changed.
    SetSearchTerm(String),
    /// Submit a search; always refetches, even for the current term.
    Search(String),
    ToggleFavoritesOnly,
    /// Clear the search term and the favorites-only toggle.
    ShowAll,
    Refresh,
    Select(Recipe),
    Open(RecipeId),
    Back,
    Add,
    Edit,
    EditField(RecipeField, String),
    Cancel,
    Save,
    /// Delete the recipe shown in the detail view (already confirmed by the user).
    Delete,
    ToggleFavorite(Recipe),
    ToggleTheme,
}

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    /// True until the startup identity check has resolved.
    pub initializing: bool,
    pub session: Session,
    pub auth_mode: AuthMode,
    pub theme: Theme,
    pub collection: CollectionSnapshot,
    pub view: ViewSelection,
}

impl AppSnapshot {
    pub fn is_favorite(&self, recipe: &Recipe) -> bool {
        self.collection.favorites.contains(&recipe.id)
    }

    /// Whether the current user may edit or delete `recipe`.
    pub fn is_owner(&self, recipe: &Recipe) -> bool {
        self.session
            .username()
            .is_some_and(|username| recipe.is_authored_by(username))
    }
}

pub struct RecipeApp {
    auth: AuthSessionManager,
    collection: RecipeCollectionStore,
    view: RwLock<ViewSelectionMachine>,
    theme: RwLock<Theme>,
}

impl RecipeApp {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            auth: AuthSessionManager::new(api.clone()),
            collection: RecipeCollectionStore::new(api),
            view: RwLock::new(ViewSelectionMachine::new()),
            theme: RwLock::new(Theme::default()),
        }
    }

    pub fn auth(&self) -> &AuthSessionManager {
        &self.auth
    }

    pub fn collection(&self) -> &RecipeCollectionStore {
        &self.collection
    }

    /// Resolves the startup session, then loads the list and favorites for it.
    ///
    /// Nothing but a loading indicator should be rendered before this returns.
    pub async fn start(&self) -> Session {
        let session = self.auth.initialize().await;
        self.collection.set_identity(session.clone()).await;
        if let Err(e) = self.refresh().await {
            tracing::debug!("[RecipeApp] Initial refetch failed: {}", e);
        }
        session
    }

    pub async fn dispatch(&self, intent: AppIntent) -> Result<()> {
        match intent {
            AppIntent::SubmitCredentials(credentials) => {
                self.submit_credentials(&credentials).await
            }
            AppIntent::Login(credentials) => self.login(&credentials).await,
            AppIntent::Register(credentials) => self.register(&credentials).await,
            AppIntent::ToggleAuthMode => {
                self.auth.toggle_mode().await;
                Ok(())
            }
            AppIntent::Logout => {
                self.logout().await;
                Ok(())
            }
            AppIntent::SetSearchTerm(term) => self.set_search_term(term).await,
            AppIntent::Search(term) => self.search(term).await,
            AppIntent::Refresh => self.refresh().await.map(|_| ()),
            AppIntent::ToggleFavoritesOnly => self.toggle_favorites_only().await,
            AppIntent::ShowAll => self.show_all().await,
            AppIntent::Select(recipe) => self.select(recipe).await,
            AppIntent::Open(id) => self.open(&id).await,
            AppIntent::Back => self.view.write().await.back(),
            AppIntent::Add => {
                self.view.write().await.begin_create();
                Ok(())
            }
            AppIntent::Edit => self.begin_edit().await,
            AppIntent::EditField(field, value) => self.view.write().await.edit_field(field, value),
            AppIntent::Cancel => self.view.write().await.cancel(),
            AppIntent::Save => self.save().await,
            AppIntent::Delete => self.delete().await,
            AppIntent::ToggleFavorite(recipe) => self.collection.toggle_favorite(&recipe).await,
            AppIntent::ToggleTheme => {
                let mut theme = self.theme.write().await;
                *theme = theme.toggled();
                Ok(())
            }
        }
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            initializing: self.auth.is_initializing().await,
            session: self.auth.session().await,
            auth_mode: self.auth.mode().await,
            theme: *self.theme.read().await,
            collection: self.collection.snapshot().await,
            view: self.view.read().await.current().clone(),
        }
    }

    pub async fn view(&self) -> ViewSelection {
        self.view.read().await.current().clone()
    }

    // ============================================================================
    // Auth intents
    // ============================================================================

    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let session = self.auth.login(credentials).await?;
        self.on_identity_changed(session).await;
        Ok(())
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<()> {
        let session = self.auth.register(credentials).await?;
        self.on_identity_changed(session).await;
        Ok(())
    }

    pub async fn submit_credentials(&self, credentials: &Credentials) -> Result<()> {
        let session = self.auth.submit(credentials).await?;
        self.on_identity_changed(session).await;
        Ok(())
    }

    /// Resets local state immediately, ends the remote session, then reloads as
    /// anonymous.
    ///
    /// Responses still in flight for the old identity are discarded by the
    /// collection store.
    pub async fn logout(&self) {
        self.view.write().await.reset();
        self.collection.set_identity(Session::Anonymous).await;
        // Clears the local session before the request goes out.
        self.auth.logout().await;

        // Only reload once the service has dropped the old session cookie.
        if let Err(e) = self.refresh().await {
            tracing::debug!("[RecipeApp] Anonymous refetch after logout failed: {}", e);
        }
    }

    async fn on_identity_changed(&self, session: Session) {
        if !self.collection.set_identity(session).await {
            return;
        }
        self.view.write().await.reset();
        if let Err(e) = self.refresh().await {
            tracing::debug!("[RecipeApp] Refetch after identity change failed: {}", e);
        }
    }

    // ============================================================================
    // Collection intents
    // ============================================================================

    /// Refetches the list and favorites; a replaced list closes any detail view.
    pub async fn refresh(&self) -> Result<RefetchOutcome> {
        self.collection
            .resync_with(|| self.close_detail_view())
            .await
    }

    /// Refetches the list only. Used for criteria changes.
    async fn refetch_list(&self) -> Result<()> {
        self.collection
            .refetch_with(|| self.close_detail_view())
            .await
            .map(|_| ())
    }

    // Runs under the store lock, in the same step that installs the new list.
    async fn close_detail_view(&self) {
        self.view.write().await.on_collection_replaced();
    }

    /// Sets the search term and refetches once, changed or not.
    pub async fn search(&self, term: impl Into<String>) -> Result<()> {
        self.collection.set_search_term(term).await;
        self.refetch_list().await
    }

    pub async fn set_search_term(&self, term: impl Into<String>) -> Result<()> {
        if self.collection.set_search_term(term).await {
            self.refetch_list().await?;
        }
        Ok(())
    }

    pub async fn toggle_favorites_only(&self) -> Result<()> {
        self.collection.toggle_favorites_only().await;
        self.refetch_list().await
    }

    pub async fn show_all(&self) -> Result<()> {
        if self.collection.clear_filters().await {
            self.refetch_list().await?;
        }
        Ok(())
    }

    // ============================================================================
    // View intents
    // ============================================================================

    pub async fn select(&self, recipe: Recipe) -> Result<()> {
        self.view.write().await.select(recipe)
    }

    /// Loads a recipe by id and opens its detail view.
    pub async fn open(&self, id: &RecipeId) -> Result<()> {
        {
            let view = self.view.read().await;
            if !matches!(view.current(), ViewSelection::List) {
                return Err(RecipeError::InvalidTransition {
                    from: view.current().name(),
                    intent: "open a recipe",
                });
            }
        }
        let recipe = self.collection.fetch_recipe(id).await?;
        self.view.write().await.select(recipe)
    }

    pub async fn begin_edit(&self) -> Result<()> {
        let mut view = self.view.write().await;
        if let Some(recipe) = view.current().subject() {
            self.ensure_owner(recipe, "edit").await?;
        }
        view.begin_edit()
    }

    /// Saves the active form. On success the view returns to the list; on
    /// failure the form stays open with its contents.
    pub async fn save(&self) -> Result<()> {
        let (target, draft) = {
            let view = self.view.read().await;
            match view.current() {
                ViewSelection::CreateForm(form) => (None, form.to_draft()?),
                ViewSelection::EditForm { recipe, form } => {
                    (Some(recipe.clone()), form.to_draft()?)
                }
                other => {
                    return Err(RecipeError::InvalidTransition {
                        from: other.name(),
                        intent: "save",
                    });
                }
            }
        };

        match &target {
            Some(recipe) => {
                self.ensure_owner(recipe, "edit").await?;
                self.collection.update(&recipe.id, &draft).await?;
            }
            None => {
                self.collection.create(&draft).await?;
            }
        }

        if let Err(e) = self.view.write().await.finish_save() {
            tracing::debug!("[RecipeApp] View moved on before save completed: {}", e);
        }
        Ok(())
    }

    /// Deletes the recipe in the detail view. On failure the detail view stays.
    pub async fn delete(&self) -> Result<()> {
        let recipe = match self.view.read().await.current() {
            ViewSelection::Detail(recipe) => recipe.clone(),
            other => {
                return Err(RecipeError::InvalidTransition {
                    from: other.name(),
                    intent: "delete",
                });
            }
        };
        self.ensure_owner(&recipe, "delete").await?;

        self.collection.delete(&recipe.id).await?;

        if let Err(e) = self.view.write().await.finish_delete() {
            tracing::debug!("[RecipeApp] View moved on before delete completed: {}", e);
        }
        Ok(())
    }

    async fn ensure_owner(&self, recipe: &Recipe, action: &str) -> Result<()> {
        let session = self.auth.session().await;
        match session.username() {
            Some(username) if recipe.is_authored_by(username) => Ok(()),
            _ => Err(RecipeError::forbidden(format!(
                "Only the author can {action} this recipe"
            ))),
        }
    }
}
