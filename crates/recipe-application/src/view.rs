//! View selection state machine.
//!
//! Exactly one [`ViewSelection`] is active. Every transition replaces it in a
//! single assignment, so no intermediate state can be observed.

use recipe_core::error::{RecipeError, Result};
use recipe_core::recipe::{Recipe, RecipeField, RecipeForm};
use recipe_core::view::ViewSelection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSelectionMachine {
    current: ViewSelection,
}

impl ViewSelectionMachine {
    /// Starts on the list view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &ViewSelection {
        &self.current
    }

    /// List → Detail(recipe)
    pub fn select(&mut self, recipe: Recipe) -> Result<()> {
        self.require(matches!(self.current, ViewSelection::List), "open a recipe")?;
        self.enter(ViewSelection::Detail(recipe));
        Ok(())
    }

    /// Detail → List
    pub fn back(&mut self) -> Result<()> {
        self.require(matches!(self.current, ViewSelection::Detail(_)), "go back")?;
        self.enter(ViewSelection::List);
        Ok(())
    }

    /// Any view → CreateForm, with an empty form.
    pub fn begin_create(&mut self) {
        self.enter(ViewSelection::CreateForm(RecipeForm::new()));
    }

    /// Detail(recipe) → EditForm(recipe), with the form prefilled.
    pub fn begin_edit(&mut self) -> Result<()> {
        let recipe = match &self.current {
            ViewSelection::Detail(recipe) => recipe.clone(),
            _ => return Err(self.rejected("edit")),
        };
        let form = RecipeForm::from_recipe(&recipe);
        self.enter(ViewSelection::EditForm { recipe, form });
        Ok(())
    }

    /// Changes one field of the active form.
    pub fn edit_field(&mut self, field: RecipeField, value: impl Into<String>) -> Result<()> {
        if let Some(form) = self.current.form_mut() {
            form.set(field, value);
            return Ok(());
        }
        Err(self.rejected("edit a field"))
    }

    /// Form → List. Always returns to the list, even if the form was opened
    /// from a detail view.
    pub fn cancel(&mut self) -> Result<()> {
        self.require(self.current.is_form(), "cancel")?;
        self.enter(ViewSelection::List);
        Ok(())
    }

    /// Form → List after the service accepted the save.
    pub fn finish_save(&mut self) -> Result<()> {
        self.require(self.current.is_form(), "save")?;
        self.enter(ViewSelection::List);
        Ok(())
    }

    /// Detail → List after the service confirmed the delete.
    pub fn finish_delete(&mut self) -> Result<()> {
        self.require(matches!(self.current, ViewSelection::Detail(_)), "delete")?;
        self.enter(ViewSelection::List);
        Ok(())
    }

    /// Any view → List, discarding detail and form state. Used on identity changes.
    pub fn reset(&mut self) {
        self.enter(ViewSelection::List);
    }

    /// The collection was replaced: a selected recipe may be gone, so a detail
    /// view falls back to the list. Forms are kept. Returns whether the view changed.
    pub fn on_collection_replaced(&mut self) -> bool {
        if matches!(self.current, ViewSelection::Detail(_)) {
            self.enter(ViewSelection::List);
            return true;
        }
        false
    }

    fn enter(&mut self, next: ViewSelection) {
        tracing::debug!("[View] {} -> {}", self.current.name(), next.name());
        self.current = next;
    }

    fn require(&self, allowed: bool, intent: &'static str) -> Result<()> {
        if allowed { Ok(()) } else { Err(self.rejected(intent)) }
    }

    fn rejected(&self, intent: &'static str) -> RecipeError {
        RecipeError::InvalidTransition {
            from: self.current.name(),
            intent,
        }
    }
}
