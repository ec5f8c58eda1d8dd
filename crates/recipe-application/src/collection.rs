//! Recipe collection store.
//!
//! Owns the recipe list, the filter criteria and the favorite set for the
//! identity the store is scoped to.
//!
//! Every list and favorites request takes a ticket. A response is applied only
//! if its ticket is still the latest one issued; changing identity invalidates
//! all outstanding tickets, so nothing fetched for a previous identity can land
//! after the switch.

use recipe_core::api::RecipeApi;
use recipe_core::error::{RecipeError, Result};
use recipe_core::recipe::{FavoriteSet, FilterCriteria, Recipe, RecipeDraft, RecipeId};
use recipe_core::session::Session;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What happened to a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchOutcome {
    /// The response replaced the collection.
    Applied,
    /// A newer request or an identity change made the response obsolete.
    Superseded,
}

/// Read-only copy of the store for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSnapshot {
    pub criteria: FilterCriteria,
    pub recipes: Vec<Recipe>,
    pub favorites: FavoriteSet,
    pub refreshing: bool,
    pub last_error: Option<RecipeError>,
}

#[derive(Debug, Default)]
struct CollectionState {
    identity: Session,
    criteria: FilterCriteria,
    recipes: Vec<Recipe>,
    favorites: FavoriteSet,
    refreshing: bool,
    last_error: Option<RecipeError>,
    /// Latest ticket issued for a list request.
    list_ticket: u64,
    /// Latest ticket issued for a favorites request.
    favorites_ticket: u64,
}

pub struct RecipeCollectionStore {
    api: Arc<dyn RecipeApi>,
    state: RwLock<CollectionState>,
}

impl RecipeCollectionStore {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            state: RwLock::new(CollectionState::default()),
        }
    }

    // ============================================================================
    // Scoping and criteria
    // ============================================================================

    /// Scopes the store to `identity`.
    ///
    /// On a change the list, favorites and last error are cleared and every
    /// request in flight is invalidated. Returns whether the identity changed.
    pub async fn set_identity(&self, identity: Session) -> bool {
        let mut state = self.state.write().await;
        if state.identity == identity {
            return false;
        }
        tracing::debug!(
            "[Collection] Identity changed to {}",
            identity.username().unwrap_or("(anonymous)")
        );
        state.identity = identity;
        state.recipes.clear();
        state.favorites = FavoriteSet::new();
        state.last_error = None;
        state.refreshing = false;
        state.list_ticket += 1;
        state.favorites_ticket += 1;
        true
    }

    /// Returns whether the term changed.
    pub async fn set_search_term(&self, term: impl Into<String>) -> bool {
        let term = term.into();
        let mut state = self.state.write().await;
        if state.criteria.search_term == term {
            return false;
        }
        state.criteria.search_term = term;
        true
    }

    /// Returns whether the flag changed.
    pub async fn set_favorites_only(&self, favorites_only: bool) -> bool {
        let mut state = self.state.write().await;
        if state.criteria.favorites_only == favorites_only {
            return false;
        }
        state.criteria.favorites_only = favorites_only;
        true
    }

    /// Flips the favorites-only toggle and returns the new value.
    pub async fn toggle_favorites_only(&self) -> bool {
        let mut state = self.state.write().await;
        state.criteria.favorites_only = !state.criteria.favorites_only;
        state.criteria.favorites_only
    }

    /// Resets the criteria to "all recipes". Returns whether anything changed.
    pub async fn clear_filters(&self) -> bool {
        let mut state = self.state.write().await;
        if state.criteria == FilterCriteria::default() {
            return false;
        }
        state.criteria = FilterCriteria::default();
        true
    }

    // ============================================================================
    // Fetching
    // ============================================================================

    /// Fetches the list for the current criteria and identity.
    ///
    /// The previous list stays in place while the request is in flight. A
    /// failure is recorded in `last_error`, keeps the previous list and is
    /// returned; it is not retried.
    pub async fn refetch(&self) -> Result<RefetchOutcome> {
        self.refetch_with(|| async {}).await
    }

    /// [`refetch`](Self::refetch), running `on_applied` when a response replaces
    /// the list.
    ///
    /// `on_applied` finishes before the store lock is released, so no reader
    /// sees the new list without the effects of `on_applied`.
    pub async fn refetch_with<F, Fut>(&self, on_applied: F) -> Result<RefetchOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let (ticket, criteria) = {
            let mut state = self.state.write().await;
            state.list_ticket += 1;
            state.refreshing = true;
            (state.list_ticket, state.criteria.clone())
        };

        tracing::debug!("[Collection] Refetch #{} {:?}", ticket, criteria);
        let result = self.api.list_recipes(&criteria).await;

        let mut state = self.state.write().await;
        if state.list_ticket != ticket {
            tracing::debug!(
                "[Collection] Dropping response #{} (latest is #{})",
                ticket,
                state.list_ticket
            );
            return Ok(RefetchOutcome::Superseded);
        }

        state.refreshing = false;
        match result {
            Ok(recipes) => {
                tracing::debug!(
                    "[Collection] Refetch #{} applied {} recipes",
                    ticket,
                    recipes.len()
                );
                state.recipes = recipes;
                state.last_error = None;
                on_applied().await;
                Ok(RefetchOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!("[Collection] Refetch #{} failed: {}", ticket, e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Re-derives the favorite set from the service.
    ///
    /// Anonymous identities always get an empty set without a request. A failed
    /// request also yields an empty set; favorites never block the rest of the UI.
    pub async fn refetch_favorites(&self) -> FavoriteSet {
        let ticket = {
            let mut state = self.state.write().await;
            state.favorites_ticket += 1;
            if !state.identity.is_authenticated() {
                state.favorites = FavoriteSet::new();
                return state.favorites.clone();
            }
            state.favorites_ticket
        };

        let favorites = match self.api.list_favorites().await {
            Ok(recipes) => FavoriteSet::from(recipes.as_slice()),
            Err(e) => {
                tracing::warn!("[Collection] Favorites unavailable, using empty set: {}", e);
                FavoriteSet::new()
            }
        };

        let mut state = self.state.write().await;
        if state.favorites_ticket == ticket {
            state.favorites = favorites;
        }
        state.favorites.clone()
    }

    /// Runs `refetch` and `refetch_favorites` together.
    pub async fn resync(&self) -> Result<RefetchOutcome> {
        self.resync_with(|| async {}).await
    }

    /// [`resync`](Self::resync) with an `on_applied` hook for the list, as in
    /// [`refetch_with`](Self::refetch_with).
    pub async fn resync_with<F, Fut>(&self, on_applied: F) -> Result<RefetchOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let (outcome, _) = tokio::join!(self.refetch_with(on_applied), self.refetch_favorites());
        outcome
    }

    /// Loads a single recipe.
    pub async fn fetch_recipe(&self, id: &RecipeId) -> Result<Recipe> {
        self.api.get_recipe(id).await
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Toggles a favorite, then re-reads the favorite set.
    ///
    /// No-op for anonymous identities. The favorites are re-read even if the
    /// toggle failed; the toggle error is returned afterwards.
    pub async fn toggle_favorite(&self, recipe: &Recipe) -> Result<()> {
        if !self.state.read().await.identity.is_authenticated() {
            tracing::debug!("[Collection] Ignoring favorite toggle while anonymous");
            return Ok(());
        }

        let result = self.api.toggle_favorite(&recipe.id).await;
        if let Err(e) = &result {
            tracing::warn!("[Collection] Favorite toggle for {} failed: {}", recipe.id, e);
        }
        self.refetch_favorites().await;
        result
    }

    /// Creates a recipe and resynchronises the list and favorites.
    pub async fn create(&self, draft: &RecipeDraft) -> Result<Recipe> {
        let created = self.api.create_recipe(draft).await?;
        tracing::info!("[Collection] Created recipe {} '{}'", created.id, created.title);
        self.resync_after_mutation().await;
        Ok(created)
    }

    /// Updates a recipe and resynchronises the list and favorites.
    pub async fn update(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<Recipe> {
        let updated = self.api.update_recipe(id, draft).await?;
        tracing::info!("[Collection] Updated recipe {}", id);
        self.resync_after_mutation().await;
        Ok(updated)
    }

    /// Deletes a recipe and resynchronises the list and favorites.
    pub async fn delete(&self, id: &RecipeId) -> Result<()> {
        self.api.delete_recipe(id).await?;
        tracing::info!("[Collection] Deleted recipe {}", id);
        self.resync_after_mutation().await;
        Ok(())
    }

    // The mutation itself succeeded; a failed refetch is already in `last_error`.
    async fn resync_after_mutation(&self) {
        if let Err(e) = self.resync().await {
            tracing::debug!("[Collection] Resync after mutation failed: {}", e);
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub async fn snapshot(&self) -> CollectionSnapshot {
        let state = self.state.read().await;
        CollectionSnapshot {
            criteria: state.criteria.clone(),
            recipes: state.recipes.clone(),
            favorites: state.favorites.clone(),
            refreshing: state.refreshing,
            last_error: state.last_error.clone(),
        }
    }

    pub async fn criteria(&self) -> FilterCriteria {
        self.state.read().await.criteria.clone()
    }

    pub async fn recipes(&self) -> Vec<Recipe> {
        self.state.read().await.recipes.clone()
    }

    pub async fn favorites(&self) -> FavoriteSet {
        self.state.read().await.favorites.clone()
    }

    pub async fn is_refreshing(&self) -> bool {
        self.state.read().await.refreshing
    }
}
