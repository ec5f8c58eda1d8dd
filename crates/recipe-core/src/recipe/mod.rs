//! Recipe domain module.
//!
//! # Module Structure
//!
//! - `model`: Recipe, RecipeDraft and RecipeId
//! - `filter`: FilterCriteria and FavoriteSet
//! - `form`: the editable text form behind the create/edit views

mod filter;
mod form;
mod model;

// Re-export public API
pub use filter::{FavoriteSet, FilterCriteria};
pub use form::{
    MAX_CUISINE_CHARS, MAX_DESCRIPTION_CHARS, MAX_DURATION_MINUTES, MAX_TITLE_CHARS,
    MIN_DURATION_MINUTES, RecipeField, RecipeForm,
};
pub use model::{Recipe, RecipeDraft, RecipeId};
