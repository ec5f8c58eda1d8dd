//! Transport layer for Recipe Explorer.
//!
//! Provides [`HttpRecipeApi`], the `reqwest` implementation of
//! [`recipe_core::RecipeApi`].

pub mod http_api;

pub use http_api::HttpRecipeApi;
