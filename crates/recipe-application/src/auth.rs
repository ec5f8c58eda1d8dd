//! Auth session manager.
//!
//! Owns the current [`Session`] and the auth screen mode. The session is only
//! ever changed through the operations below.

use recipe_core::api::RecipeApi;
use recipe_core::error::Result;
use recipe_core::session::{AuthMode, Credentials, Session};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct AuthState {
    session: Session,
    /// True until `initialize` has resolved one way or another.
    initializing: bool,
    mode: AuthMode,
}

/// Manages who the client is logged in as.
///
/// `AuthSessionManager` is responsible for:
/// - Resolving the startup session (fail-open to anonymous)
/// - Login and registration, with client-side credential validation
/// - Logout, which clears the local session regardless of the network
pub struct AuthSessionManager {
    api: Arc<dyn RecipeApi>,
    state: RwLock<AuthState>,
}

impl AuthSessionManager {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            state: RwLock::new(AuthState {
                session: Session::Anonymous,
                initializing: true,
                mode: AuthMode::Login,
            }),
        }
    }

    /// Asks the service who we are.
    ///
    /// Any failure resolves to anonymous; this never returns an error.
    pub async fn initialize(&self) -> Session {
        let session = match self.api.current_identity().await {
            Ok(Some(identity)) => {
                tracing::info!("[Auth] Restored session for {}", identity.username);
                Session::Authenticated(identity)
            }
            Ok(None) => {
                tracing::debug!("[Auth] No existing session");
                Session::Anonymous
            }
            Err(e) => {
                tracing::warn!("[Auth] Identity check failed, continuing anonymous: {}", e);
                Session::Anonymous
            }
        };

        let mut state = self.state.write().await;
        state.session = session.clone();
        state.initializing = false;
        session
    }

    /// Logs in. On failure the session is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;
        let identity = self.api.login(credentials).await?;
        tracing::info!("[Auth] Logged in as {}", identity.username);
        let session = Session::Authenticated(identity);
        self.replace_session(session.clone()).await;
        Ok(session)
    }

    /// Registers a new account, which also logs it in.
    pub async fn register(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;
        let identity = self.api.register(credentials).await?;
        tracing::info!("[Auth] Registered and logged in as {}", identity.username);
        let session = Session::Authenticated(identity);
        self.replace_session(session.clone()).await;
        Ok(session)
    }

    /// Logs in or registers depending on the current mode.
    ///
    /// The mode returns to `Login` after a successful submission.
    pub async fn submit(&self, credentials: &Credentials) -> Result<Session> {
        let mode = self.mode().await;
        let session = match mode {
            AuthMode::Login => self.login(credentials).await?,
            AuthMode::Register => self.register(credentials).await?,
        };
        self.state.write().await.mode = AuthMode::Login;
        Ok(session)
    }

    /// Clears the local session, then asks the service to end it.
    ///
    /// The local session is already anonymous before the request is sent, so a
    /// failing service cannot keep the user logged in.
    pub async fn logout(&self) {
        let previous = self.replace_session(Session::Anonymous).await;
        tracing::info!(
            "[Auth] Logged out {}",
            previous.username().unwrap_or("(anonymous)")
        );

        if let Err(e) = self.api.logout().await {
            tracing::warn!("[Auth] Logout request failed, session cleared locally: {}", e);
        }
    }

    pub async fn toggle_mode(&self) -> AuthMode {
        let mut state = self.state.write().await;
        state.mode = state.mode.toggled();
        state.mode
    }

    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn mode(&self) -> AuthMode {
        self.state.read().await.mode
    }

    pub async fn is_initializing(&self) -> bool {
        self.state.read().await.initializing
    }

    /// Swaps in `session` and returns the one it replaced.
    async fn replace_session(&self, session: Session) -> Session {
        let mut state = self.state.write().await;
        state.initializing = false;
        std::mem::replace(&mut state.session, session)
    }
}
