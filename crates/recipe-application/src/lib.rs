//! Application layer for Recipe Explorer.
//!
//! This crate holds the client state machine: who is logged in, which recipes
//! are shown, and which view is active. [`RecipeApp`] coordinates the three
//! components and is what a presentation layer talks to.

pub mod app;
pub mod auth;
pub mod collection;
pub mod view;

pub use app::{AppIntent, AppSnapshot, RecipeApp};
pub use auth::AuthSessionManager;
pub use collection::{CollectionSnapshot, RecipeCollectionStore, RefetchOutcome};
pub use view::ViewSelectionMachine;
