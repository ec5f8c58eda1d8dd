//! Text rendering of an [`AppSnapshot`].
//!
//! Rendering is a pure function of the snapshot; the REPL prints whatever
//! [`render`] returns after every command.

use colored::{ColoredString, Colorize};
use recipe_application::AppSnapshot;
use recipe_core::recipe::{Recipe, RecipeField, RecipeForm};
use recipe_core::session::AuthMode;
use recipe_core::view::{Theme, ViewSelection};
use std::fmt::Write;

const STAR: &str = "★";
const NO_STAR: &str = "☆";

const FORM_FIELDS: [RecipeField; 6] = [
    RecipeField::Title,
    RecipeField::Cuisine,
    RecipeField::Duration,
    RecipeField::Description,
    RecipeField::Ingredients,
    RecipeField::Instructions,
];

pub fn render(snapshot: &AppSnapshot) -> String {
    let palette = Palette::for_theme(snapshot.theme);

    if snapshot.initializing {
        return palette.muted("Loading...").to_string();
    }

    let Some(username) = snapshot.session.username() else {
        return render_auth(snapshot.auth_mode, &palette);
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        palette.heading("=== Recipe Explorer ==="),
        palette.muted(&format!("signed in as {username}"))
    );
    render_status(snapshot, &palette, &mut out);

    match &snapshot.view {
        ViewSelection::List => render_list(snapshot, &palette, &mut out),
        ViewSelection::Detail(recipe) => render_detail(snapshot, recipe, &palette, &mut out),
        ViewSelection::CreateForm(form) => {
            render_form("New recipe", form, &palette, &mut out);
        }
        ViewSelection::EditForm { recipe, form } => {
            render_form(&format!("Editing \"{}\"", recipe.title), form, &palette, &mut out);
        }
    }

    out.trim_end().to_string()
}

fn render_auth(mode: AuthMode, palette: &Palette) -> String {
    let (title, hint, switch) = match mode {
        AuthMode::Login => (
            "Sign in",
            "login <user> <password>",
            "No account yet? Type 'mode' to register.",
        ),
        AuthMode::Register => (
            "Create an account",
            "register <user> <password>",
            "Already registered? Type 'mode' to sign in.",
        ),
    };
    [
        palette.heading("=== Recipe Explorer ===").to_string(),
        palette.heading(title).to_string(),
        format!("  {hint}"),
        palette.muted(switch).to_string(),
    ]
    .join("\n")
}

fn render_status(snapshot: &AppSnapshot, palette: &Palette, out: &mut String) {
    let criteria = &snapshot.collection.criteria;
    let search = if criteria.search_term.is_empty() {
        "all recipes".to_string()
    } else {
        format!("search \"{}\"", criteria.search_term)
    };
    let scope = if criteria.favorites_only {
        " (favorites only)"
    } else {
        ""
    };
    let _ = writeln!(out, "{}", palette.muted(&format!("Showing {search}{scope}")));

    if snapshot.collection.refreshing {
        let _ = writeln!(out, "{}", palette.muted("Refreshing..."));
    }
    if let Some(error) = &snapshot.collection.last_error {
        let _ = writeln!(out, "{}", format!("Error: {error}").red());
    }
    out.push('\n');
}

fn render_list(snapshot: &AppSnapshot, palette: &Palette, out: &mut String) {
    let recipes = &snapshot.collection.recipes;
    if recipes.is_empty() {
        let _ = writeln!(out, "{}", palette.muted("No recipes found."));
        return;
    }

    for (index, recipe) in recipes.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{}] {} {} {}",
            index + 1,
            star(snapshot, recipe, palette),
            palette.title(&recipe.title),
            palette.muted(&summary(recipe))
        );
        let _ = writeln!(out, "    {}", recipe.preview());
    }
}

fn render_detail(snapshot: &AppSnapshot, recipe: &Recipe, palette: &Palette, out: &mut String) {
    let _ = writeln!(
        out,
        "{} {}",
        star(snapshot, recipe, palette),
        palette.title(&recipe.title)
    );
    let _ = writeln!(
        out,
        "{}",
        palette.muted(&format!("{} by {}", summary(recipe), recipe.author))
    );
    let _ = writeln!(out, "\n{}", recipe.description);

    let _ = writeln!(out, "\n{}", palette.heading("Ingredients"));
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {ingredient}");
    }
    let _ = writeln!(out, "\n{}", palette.heading("Instructions"));
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {instruction}", step + 1);
    }

    let actions = if snapshot.is_owner(recipe) {
        "back, fav, edit, delete"
    } else {
        "back, fav"
    };
    let _ = writeln!(out, "\n{}", palette.muted(&format!("Actions: {actions}")));
}

fn render_form(title: &str, form: &RecipeForm, palette: &Palette, out: &mut String) {
    let _ = writeln!(out, "{}", palette.heading(title));
    for field in FORM_FIELDS {
        let name = field_name(field);
        let value = form.field(field);
        match field {
            RecipeField::Ingredients | RecipeField::Instructions => {
                let _ = writeln!(out, "  {name}:");
                for line in value.lines() {
                    let _ = writeln!(out, "    {line}");
                }
            }
            _ => {
                let _ = writeln!(out, "  {name}: {value}");
            }
        }
    }
    let _ = writeln!(
        out,
        "\n{}",
        palette.muted("set <field> <value>, save, cancel")
    );
}

fn star(snapshot: &AppSnapshot, recipe: &Recipe, palette: &Palette) -> ColoredString {
    if snapshot.is_favorite(recipe) {
        palette.accent(STAR)
    } else {
        palette.muted(NO_STAR)
    }
}

fn summary(recipe: &Recipe) -> String {
    format!("({}, {} min)", recipe.cuisine, recipe.duration)
}

fn field_name(field: RecipeField) -> &'static str {
    match field {
        RecipeField::Title => "title",
        RecipeField::Cuisine => "cuisine",
        RecipeField::Duration => "duration",
        RecipeField::Description => "description",
        RecipeField::Ingredients => "ingredients",
        RecipeField::Instructions => "instructions",
    }
}

/// Colors for the active theme. Dark terminals get the bright variants.
struct Palette {
    theme: Theme,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        Self { theme }
    }

    fn heading(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.magenta().bold(),
            Theme::Dark => text.bright_magenta().bold(),
        }
    }

    fn title(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.blue().bold(),
            Theme::Dark => text.bright_cyan().bold(),
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.yellow(),
            Theme::Dark => text.bright_yellow(),
        }
    }

    fn muted(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.bright_black(),
            Theme::Dark => text.white(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_application::CollectionSnapshot;
    use recipe_core::error::RecipeError;
    use recipe_core::recipe::RecipeId;
    use recipe_core::session::{Identity, Session};

    fn plain() {
        colored::control::set_override(false);
    }

    fn recipe(id: u64, title: &str, author: &str) -> Recipe {
        Recipe {
            id: RecipeId::from(id),
            title: title.to_string(),
            cuisine: "Thai".to_string(),
            duration: 25,
            description: concat!(
                "A fragrant curry with coconut milk, basil ",
                "and a generous handful of vegetables."
            )
            .to_string(),
            ingredients: vec!["coconut milk".to_string(), "basil".to_string()],
            instructions: vec!["Simmer".to_string(), "Serve".to_string()],
            author: author.to_string(),
        }
    }

    fn signed_in(view: ViewSelection, recipes: Vec<Recipe>) -> AppSnapshot {
        AppSnapshot {
            initializing: false,
            session: Session::Authenticated(Identity::new("chef1")),
            auth_mode: AuthMode::Login,
            theme: Theme::Light,
            collection: CollectionSnapshot {
                favorites: [RecipeId::from(1)].into_iter().collect(),
                recipes,
                ..CollectionSnapshot::default()
            },
            view,
        }
    }

    #[test]
    fn test_loading_shows_only_indicator() {
        plain();
        let snapshot = AppSnapshot {
            initializing: true,
            ..signed_in(ViewSelection::List, vec![recipe(1, "Curry", "chef1")])
        };

        assert_eq!(render(&snapshot), "Loading...");
    }

    #[test]
    fn test_anonymous_sees_auth_screen() {
        plain();
        let mut snapshot = signed_in(ViewSelection::List, vec![recipe(1, "Curry", "chef1")]);
        snapshot.session = Session::Anonymous;

        let login = render(&snapshot);
        assert!(login.contains("Sign in"));
        assert!(!login.contains("Curry"));

        snapshot.auth_mode = AuthMode::Register;
        assert!(render(&snapshot).contains("register <user> <password>"));
    }

    #[test]
    fn test_list_cards() {
        plain();
        let snapshot = signed_in(
            ViewSelection::List,
            vec![recipe(1, "Curry", "chef1"), recipe(2, "Noodles", "chef2")],
        );

        let text = render(&snapshot);

        assert!(text.contains("[1] ★ Curry (Thai, 25 min)"));
        assert!(text.contains("[2] ☆ Noodles"));
        let preview: String = snapshot.collection.recipes[0]
            .description
            .chars()
            .take(72)
            .collect();
        assert!(text.contains(&format!("    {preview}...")));
    }

    #[test]
    fn test_status_line() {
        plain();
        let mut snapshot = signed_in(ViewSelection::List, Vec::new());
        snapshot.collection.criteria.search_term = "pie".to_string();
        snapshot.collection.criteria.favorites_only = true;
        snapshot.collection.refreshing = true;
        snapshot.collection.last_error = Some(RecipeError::request(500, "database down"));

        let text = render(&snapshot);

        assert!(text.contains("Showing search \"pie\" (favorites only)"));
        assert!(text.contains("Refreshing..."));
        assert!(text.contains("Error: database down"));
        assert!(text.contains("No recipes found."));
    }

    #[test]
    fn test_detail_actions_depend_on_ownership() {
        plain();
        let own = recipe(1, "Curry", "chef1");
        let other = recipe(2, "Noodles", "chef2");

        let text = render(&signed_in(ViewSelection::Detail(own.clone()), vec![own]));
        assert!(text.contains("Actions: back, fav, edit, delete"));
        assert!(text.contains("  - coconut milk"));
        assert!(text.contains("  2. Serve"));

        let text = render(&signed_in(ViewSelection::Detail(other.clone()), vec![other]));
        assert!(text.contains("Actions: back, fav"));
        assert!(!text.contains("edit"));
    }

    #[test]
    fn test_edit_form_shows_fields() {
        plain();
        let curry = recipe(1, "Curry", "chef1");
        let view = ViewSelection::EditForm {
            form: RecipeForm::from_recipe(&curry),
            recipe: curry,
        };

        let text = render(&signed_in(view, Vec::new()));

        assert!(text.contains("Editing \"Curry\""));
        assert!(text.contains("  duration: 25"));
        assert!(text.contains("    basil"));
    }
}
