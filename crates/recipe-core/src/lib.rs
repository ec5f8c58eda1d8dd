//! Domain layer for Recipe Explorer.
//!
//! Models, the [`api::RecipeApi`] seam to the recipe service, the shared error
//! type and client configuration.

pub mod api;
pub mod config;
pub mod error;
pub mod recipe;
pub mod session;
pub mod view;

// Re-export common types
pub use api::RecipeApi;
pub use error::{RecipeError, Result};
