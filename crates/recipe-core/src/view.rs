//! View selection and presentation preferences.

use crate::recipe::{Recipe, RecipeForm};
use serde::{Deserialize, Serialize};

/// The single active screen of the application.
///
/// Form views carry the form being edited, so in-progress edits live exactly as
/// long as the form view does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewSelection {
    #[default]
    List,
    Detail(Recipe),
    CreateForm(RecipeForm),
    EditForm { recipe: Recipe, form: RecipeForm },
}

impl ViewSelection {
    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail(_) => "detail",
            Self::CreateForm(_) => "create form",
            Self::EditForm { .. } => "edit form",
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Self::CreateForm(_) | Self::EditForm { .. })
    }

    /// The recipe the view is about, if any.
    pub fn subject(&self) -> Option<&Recipe> {
        match self {
            Self::Detail(recipe) | Self::EditForm { recipe, .. } => Some(recipe),
            Self::List | Self::CreateForm(_) => None,
        }
    }

    pub fn form(&self) -> Option<&RecipeForm> {
        match self {
            Self::CreateForm(form) | Self::EditForm { form, .. } => Some(form),
            Self::List | Self::Detail(_) => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut RecipeForm> {
        match self {
            Self::CreateForm(form) | Self::EditForm { form, .. } => Some(form),
            Self::List | Self::Detail(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
