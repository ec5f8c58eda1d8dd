//! Filter criteria and the favorite set.

use super::model::{Recipe, RecipeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The active search term and favorites-only toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub favorites_only: bool,
}

impl FilterCriteria {
    /// Query parameters for `GET /recipes`.
    ///
    /// `search` is only sent when non-empty and `favorites=true` only when the
    /// toggle is on.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.search_term.is_empty() {
            pairs.push(("search", self.search_term.clone()));
        }
        if self.favorites_only {
            pairs.push(("favorites", "true".to_string()));
        }
        pairs
    }
}

/// Ids of the recipes the current identity has favorited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet(HashSet<RecipeId>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RecipeId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = RecipeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[Recipe]> for FavoriteSet {
    fn from(recipes: &[Recipe]) -> Self {
        recipes.iter().map(|r| r.id.clone()).collect()
    }
}
