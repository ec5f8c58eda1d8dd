//! Editable recipe form.
//!
//! The form holds raw text as typed by the user. Ingredients and instructions
//! are edited one entry per line and only become lists when the form is
//! converted into a [`RecipeDraft`].

use super::model::{Recipe, RecipeDraft};
use crate::error::{RecipeError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_TITLE_CHARS: usize = 64;
pub const MAX_CUISINE_CHARS: usize = 32;
pub const MAX_DESCRIPTION_CHARS: usize = 256;
pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 600;

/// A single editable field of [`RecipeForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeField {
    Title,
    Cuisine,
    Duration,
    Description,
    Ingredients,
    Instructions,
}

impl FromStr for RecipeField {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "cuisine" => Ok(Self::Cuisine),
            "duration" => Ok(Self::Duration),
            "description" => Ok(Self::Description),
            "ingredients" => Ok(Self::Ingredients),
            "instructions" => Ok(Self::Instructions),
            other => Err(RecipeError::validation(format!("Unknown field '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeForm {
    pub title: String,
    pub cuisine: String,
    pub duration: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
}

impl RecipeForm {
    /// An empty form for a new recipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form prefilled from an existing recipe.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            cuisine: recipe.cuisine.clone(),
            duration: recipe.duration.to_string(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.join("\n"),
            instructions: recipe.instructions.join("\n"),
        }
    }

    pub fn field(&self, field: RecipeField) -> &str {
        match field {
            RecipeField::Title => &self.title,
            RecipeField::Cuisine => &self.cuisine,
            RecipeField::Duration => &self.duration,
            RecipeField::Description => &self.description,
            RecipeField::Ingredients => &self.ingredients,
            RecipeField::Instructions => &self.instructions,
        }
    }

    pub fn set(&mut self, field: RecipeField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RecipeField::Title => self.title = value,
            RecipeField::Cuisine => self.cuisine = value,
            RecipeField::Duration => self.duration = value,
            RecipeField::Description => self.description = value,
            RecipeField::Ingredients => self.ingredients = value,
            RecipeField::Instructions => self.instructions = value,
        }
    }

    /// Converts the form into a request body.
    ///
    /// Only the form-level limits are checked here. Required fields are left to
    /// the recipe service, which reports them as request errors.
    pub fn to_draft(&self) -> Result<RecipeDraft> {
        check_length("Title", &self.title, MAX_TITLE_CHARS)?;
        check_length("Cuisine", &self.cuisine, MAX_CUISINE_CHARS)?;
        check_length("Description", &self.description, MAX_DESCRIPTION_CHARS)?;

        let duration = self
            .duration
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(d))
            .ok_or_else(|| {
                RecipeError::validation(format!(
                    "Duration must be a whole number of minutes \
                     between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}."
                ))
            })?;

        Ok(RecipeDraft {
            title: self.title.clone(),
            cuisine: self.cuisine.clone(),
            duration,
            description: self.description.clone(),
            ingredients: split_lines(&self.ingredients),
            instructions: split_lines(&self.instructions),
        })
    }
}

fn check_length(label: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(RecipeError::validation(format!(
            "{label} must be at most {max} characters."
        )));
    }
    Ok(())
}

/// One entry per line, trimmed, blank lines dropped.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeId;

    fn filled_form() -> RecipeForm {
        RecipeForm {
            title: "Shakshuka".to_string(),
            cuisine: "Levantine".to_string(),
            duration: " 35 ".to_string(),
            description: "Eggs poached in spiced tomato sauce".to_string(),
            ingredients: "  eggs \n\ntomatoes\n  \npaprika".to_string(),
            instructions: "Simmer sauce\nCrack eggs\n".to_string(),
        }
    }

    #[test]
    fn test_to_draft_splits_and_trims_lines() {
        let draft = filled_form().to_draft().unwrap();

        assert_eq!(draft.duration, 35);
        assert_eq!(draft.ingredients, vec!["eggs", "tomatoes", "paprika"]);
        assert_eq!(draft.instructions, vec!["Simmer sauce", "Crack eggs"]);
    }

    #[test]
    fn test_missing_title_is_left_to_the_service() {
        let mut form = filled_form();
        form.set(RecipeField::Title, "");

        assert_eq!(form.to_draft().unwrap().title, "");
    }

    #[test]
    fn test_duration_out_of_range_is_rejected() {
        for bad in ["0", "601", "abc", ""] {
            let mut form = filled_form();
            form.set(RecipeField::Duration, bad);
            let err = form.to_draft().unwrap_err();
            assert!(err.is_validation(), "duration {bad:?} should fail");
        }
    }

    #[test]
    fn test_title_limit() {
        let mut form = filled_form();
        form.set(RecipeField::Title, "x".repeat(MAX_TITLE_CHARS + 1));

        assert_eq!(
            form.to_draft().unwrap_err().to_string(),
            "Title must be at most 64 characters."
        );
    }

    #[test]
    fn test_from_recipe_prefills_multiline_fields() {
        let recipe = Recipe {
            id: RecipeId::from(3),
            title: "Dal".to_string(),
            cuisine: "Indian".to_string(),
            duration: 40,
            description: "Lentils".to_string(),
            ingredients: vec!["lentils".to_string(), "cumin".to_string()],
            instructions: vec!["Boil".to_string()],
            author: "chef1".to_string(),
        };

        let form = RecipeForm::from_recipe(&recipe);
        assert_eq!(form.field(RecipeField::Ingredients), "lentils\ncumin");
        assert_eq!(form.to_draft().unwrap(), recipe.to_draft());
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("Title".parse::<RecipeField>().unwrap(), RecipeField::Title);
        assert!("author".parse::<RecipeField>().is_err());
    }
}
