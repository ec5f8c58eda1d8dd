//! REPL command parsing.
//!
//! A line of input becomes a [`Command`]. Most commands map straight onto an
//! [`AppIntent`]; the ones that refer to a card by its number need the current
//! snapshot and are resolved in [`resolve_target`].

use recipe_application::{AppIntent, AppSnapshot};
use recipe_core::error::{RecipeError, Result};
use recipe_core::recipe::{Recipe, RecipeField, RecipeId};
use recipe_core::session::Credentials;
use recipe_core::view::ViewSelection;

/// Separator for list fields on a single input line.
pub const LIST_SEPARATOR: char = '|';

pub const HELP: &str = "\
Account:   login <user> <password>, register <user> <password>, logout
           mode switches the sign-in screen, submit <user> <password> uses it
Browse:    search [term], favorites, all, refresh, open <n|id>, back, fav [n]
Edit:      add, edit, set <field> <value>, save, cancel, delete
Other:     theme, help, quit

Fields: title, cuisine, duration, description, ingredients, instructions.
Separate ingredients and instructions with '|'.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(AppIntent),
    /// A card number from the list, or a recipe id.
    Open(String),
    /// Toggle a favorite by card number, or the recipe shown in the detail view.
    Favorite(Option<usize>),
    /// Needs a confirmation prompt before it becomes [`AppIntent::Delete`].
    Delete,
    Help,
    Quit,
}

/// What a card number or id resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Loaded(Recipe),
    Id(RecipeId),
}

pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "login" => Command::Intent(AppIntent::Login(credentials(rest, "login")?)),
        "register" => Command::Intent(AppIntent::Register(credentials(rest, "register")?)),
        "submit" => Command::Intent(AppIntent::SubmitCredentials(credentials(rest, "submit")?)),
        "mode" => Command::Intent(AppIntent::ToggleAuthMode),
        "logout" => Command::Intent(AppIntent::Logout),
        "search" => Command::Intent(AppIntent::Search(rest.to_string())),
        "favorites" | "favs" => Command::Intent(AppIntent::ToggleFavoritesOnly),
        "all" => Command::Intent(AppIntent::ShowAll),
        "refresh" => Command::Intent(AppIntent::Refresh),
        "open" => {
            if rest.is_empty() {
                return Err(usage("open <n|id>"));
            }
            Command::Open(rest.to_string())
        }
        "back" => Command::Intent(AppIntent::Back),
        "fav" => {
            if rest.is_empty() {
                Command::Favorite(None)
            } else {
                Command::Favorite(Some(card_number(rest)?))
            }
        }
        "add" | "new" => Command::Intent(AppIntent::Add),
        "edit" => Command::Intent(AppIntent::Edit),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(usage("set <field> <value>"));
            }
            let field: RecipeField = field.parse()?;
            Command::Intent(AppIntent::EditField(field, field_value(field, value)))
        }
        "save" => Command::Intent(AppIntent::Save),
        "cancel" => Command::Intent(AppIntent::Cancel),
        "delete" => Command::Delete,
        "theme" => Command::Intent(AppIntent::ToggleTheme),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(RecipeError::validation(format!(
                "Unknown command '{other}'. Type 'help' for a list of commands."
            )));
        }
    };
    Ok(command)
}

/// Resolves `open` arguments.
///
/// A number within the range of listed cards picks that card; anything else is
/// treated as a recipe id.
pub fn resolve_target(arg: &str, snapshot: &AppSnapshot) -> Target {
    let recipes = &snapshot.collection.recipes;
    match arg.parse::<usize>() {
        Ok(n) if (1..=recipes.len()).contains(&n) => Target::Loaded(recipes[n - 1].clone()),
        _ => Target::Id(RecipeId::new(arg.trim_start_matches('#'))),
    }
}

/// Picks the recipe a `fav` command refers to.
pub fn favorite_target(number: Option<usize>, snapshot: &AppSnapshot) -> Result<Recipe> {
    match number {
        Some(n) => n
            .checked_sub(1)
            .and_then(|index| snapshot.collection.recipes.get(index))
            .cloned()
            .ok_or_else(|| RecipeError::validation(format!("No recipe card numbered {n}"))),
        None => match &snapshot.view {
            ViewSelection::Detail(recipe) => Ok(recipe.clone()),
            _ => Err(usage("fav <n>")),
        },
    }
}

fn credentials(rest: &str, command: &str) -> Result<Credentials> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(username), Some(password), None) => Ok(Credentials::new(username, password)),
        _ => Err(usage(&format!("{command} <user> <password>"))),
    }
}

fn card_number(arg: &str) -> Result<usize> {
    arg.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| RecipeError::validation(format!("'{arg}' is not a card number")))
}

fn field_value(field: RecipeField, value: &str) -> String {
    match field {
        RecipeField::Ingredients | RecipeField::Instructions => value
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => value.to_string(),
    }
}

fn usage(text: &str) -> RecipeError {
    RecipeError::validation(format!("Usage: {text}"))
}
