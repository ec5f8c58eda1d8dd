#![allow(dead_code)]

//! Scripted in-memory recipe service shared by the behaviour tests.

use async_trait::async_trait;
use recipe_core::api::RecipeApi;
use recipe_core::error::{RecipeError, Result};
use recipe_core::recipe::{FilterCriteria, Recipe, RecipeDraft, RecipeId};
use recipe_core::session::{Credentials, Identity};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    Register(String),
    Logout,
    Me,
    List(FilterCriteria),
    Get(RecipeId),
    Create(RecipeDraft),
    Update(RecipeId, RecipeDraft),
    Delete(RecipeId),
    Toggle(RecipeId),
    Favorites,
}

pub struct MockRecipeApi {
    calls: Mutex<Vec<Call>>,
    me: Mutex<Result<Option<Identity>>>,
    login: Mutex<Result<Identity>>,
    register: Mutex<Result<Identity>>,
    logout: Mutex<Result<()>>,
    recipes: Mutex<Result<Vec<Recipe>>>,
    favorite_ids: Mutex<BTreeSet<RecipeId>>,
    favorites_error: Mutex<Option<RecipeError>>,
    mutation_error: Mutex<Option<RecipeError>>,
    toggle_error: Mutex<Option<RecipeError>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    favorites_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    next_id: Mutex<u64>,
}

impl MockRecipeApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            me: Mutex::new(Ok(None)),
            login: Mutex::new(Ok(Identity::new("chef1"))),
            register: Mutex::new(Ok(Identity::new("chef1"))),
            logout: Mutex::new(Ok(())),
            recipes: Mutex::new(Ok(Vec::new())),
            favorite_ids: Mutex::new(BTreeSet::new()),
            favorites_error: Mutex::new(None),
            mutation_error: Mutex::new(None),
            toggle_error: Mutex::new(None),
            list_gates: Mutex::new(VecDeque::new()),
            favorites_gates: Mutex::new(VecDeque::new()),
            next_id: Mutex::new(100),
        }
    }

    // ----- scripting -----

    pub fn with_me(self, me: Result<Option<Identity>>) -> Self {
        *self.me.lock().unwrap() = me;
        self
    }

    pub fn set_login(&self, result: Result<Identity>) {
        *self.login.lock().unwrap() = result;
    }

    pub fn set_register(&self, result: Result<Identity>) {
        *self.register.lock().unwrap() = result;
    }

    pub fn set_logout(&self, result: Result<()>) {
        *self.logout.lock().unwrap() = result;
    }

    pub fn set_recipes(&self, recipes: Vec<Recipe>) {
        *self.recipes.lock().unwrap() = Ok(recipes);
    }

    pub fn set_list_error(&self, error: RecipeError) {
        *self.recipes.lock().unwrap() = Err(error);
    }

    pub fn set_favorites(&self, ids: &[u64]) {
        *self.favorite_ids.lock().unwrap() = ids.iter().map(|id| RecipeId::from(*id)).collect();
    }

    pub fn set_favorites_error(&self, error: Option<RecipeError>) {
        *self.favorites_error.lock().unwrap() = error;
    }

    pub fn set_mutation_error(&self, error: Option<RecipeError>) {
        *self.mutation_error.lock().unwrap() = error;
    }

    pub fn set_toggle_error(&self, error: Option<RecipeError>) {
        *self.toggle_error.lock().unwrap() = error;
    }

    /// Holds the next list request until the returned sender fires (or is dropped).
    ///
    /// The response is captured when the request arrives, not when it is released.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Holds the next favorites request until the returned sender fires.
    pub fn hold_next_favorites(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.favorites_gates.lock().unwrap().push_back(rx);
        tx
    }

    // ----- inspection -----

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn list_calls(&self) -> Vec<FilterCriteria> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(criteria) => Some(criteria),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn favorite_recipes(&self) -> Vec<Recipe> {
        self.favorite_ids
            .lock()
            .unwrap()
            .iter()
            .map(|id| Recipe {
                author: "someone".to_string(),
                ..recipe_with_id(id.clone(), "Favorite")
            })
            .collect()
    }
}

#[async_trait]
impl RecipeApi for MockRecipeApi {
    async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        self.record(Call::Login(credentials.username.clone()));
        self.login.lock().unwrap().clone()
    }

    async fn register(&self, credentials: &Credentials) -> Result<Identity> {
        self.record(Call::Register(credentials.username.clone()));
        self.register.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<()> {
        self.record(Call::Logout);
        self.logout.lock().unwrap().clone()
    }

    async fn current_identity(&self) -> Result<Option<Identity>> {
        self.record(Call::Me);
        self.me.lock().unwrap().clone()
    }

    async fn list_recipes(&self, criteria: &FilterCriteria) -> Result<Vec<Recipe>> {
        self.record(Call::List(criteria.clone()));
        let response = self.recipes.lock().unwrap().clone();
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        response
    }

    async fn get_recipe(&self, id: &RecipeId) -> Result<Recipe> {
        self.record(Call::Get(id.clone()));
        let recipes = self.recipes.lock().unwrap().clone()?;
        recipes
            .into_iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| RecipeError::request(404, "Recipe not found"))
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe> {
        self.record(Call::Create(draft.clone()));
        if let Some(e) = self.mutation_error.lock().unwrap().clone() {
            return Err(e);
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        Ok(recipe_from_draft(RecipeId::from(id), draft))
    }

    async fn update_recipe(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<Recipe> {
        self.record(Call::Update(id.clone(), draft.clone()));
        if let Some(e) = self.mutation_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(recipe_from_draft(id.clone(), draft))
    }

    async fn delete_recipe(&self, id: &RecipeId) -> Result<()> {
        self.record(Call::Delete(id.clone()));
        if let Some(e) = self.mutation_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(())
    }

    async fn toggle_favorite(&self, id: &RecipeId) -> Result<()> {
        self.record(Call::Toggle(id.clone()));
        if let Some(e) = self.toggle_error.lock().unwrap().clone() {
            return Err(e);
        }
        let mut ids = self.favorite_ids.lock().unwrap();
        if !ids.remove(id) {
            ids.insert(id.clone());
        }
        Ok(())
    }

    async fn list_favorites(&self) -> Result<Vec<Recipe>> {
        self.record(Call::Favorites);
        let response = match self.favorites_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(self.favorite_recipes()),
        };
        let gate = self.favorites_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        response
    }
}

pub fn recipe(id: u64, title: &str, author: &str) -> Recipe {
    Recipe {
        author: author.to_string(),
        ..recipe_with_id(RecipeId::from(id), title)
    }
}

fn recipe_with_id(id: RecipeId, title: &str) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        cuisine: "Test".to_string(),
        duration: 15,
        description: format!("{title} description"),
        ingredients: vec!["water".to_string()],
        instructions: vec!["boil".to_string()],
        author: "chef1".to_string(),
    }
}

fn recipe_from_draft(id: RecipeId, draft: &RecipeDraft) -> Recipe {
    Recipe {
        id,
        title: draft.title.clone(),
        cuisine: draft.cuisine.clone(),
        duration: draft.duration,
        description: draft.description.clone(),
        ingredients: draft.ingredients.clone(),
        instructions: draft.instructions.clone(),
        author: "chef1".to_string(),
    }
}

pub fn chef() -> Credentials {
    Credentials::new("chef1", "secret1")
}
