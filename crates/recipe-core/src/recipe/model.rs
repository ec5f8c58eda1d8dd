//! Recipe domain models.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier assigned to a recipe by the recipe service.
///
/// The service may encode ids as JSON numbers or strings; both are accepted and
/// kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecipeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecipeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// A recipe as stored by the recipe service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub cuisine: String,
    /// Preparation time in minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub author: String,
}

impl Recipe {
    /// Returns true if `username` wrote this recipe.
    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author == username
    }

    /// Returns the writable fields of this recipe.
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            title: self.title.clone(),
            cuisine: self.cuisine.clone(),
            duration: self.duration,
            description: self.description.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
        }
    }

    /// Short description used on recipe cards: the first 72 characters followed by `...`.
    pub fn preview(&self) -> String {
        let head: String = self.description.chars().take(72).collect();
        format!("{head}...")
    }
}

/// The body of a create or update request.
///
/// Ids and authorship are assigned by the service, so they are absent here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub cuisine: String,
    pub duration: u32,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}
