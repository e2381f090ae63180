use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{ApiClient, ApiError};
use crate::models::User;

/// Session identity as seen by this client.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Login/whoami/logout container.
///
/// Uses the bearer-token strategy: the token from `login` lives on the shared
/// [`ApiClient`] for the process lifetime and is never persisted.
#[derive(Clone)]
pub struct AuthSession {
    api: ApiClient,
    state: Arc<Mutex<AuthState>>,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(AuthState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> AuthState {
        self.lock().clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    /// Log in, then resolve the identity via `whoami` if the login response
    /// did not include the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }

        let result = match self.api.login(username, password).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => self.api.whoami().await,
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                state.is_authenticated = true;
                Ok(user)
            }
            Err(e) => {
                // A token from a login whose identity could not be resolved
                // must not ride along on later requests.
                self.api.set_token(None);
                state.user = None;
                state.is_authenticated = false;
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Refresh the session identity from the server.
    pub async fn fetch_me(&self) -> Result<User, ApiError> {
        let result = self.api.whoami().await;
        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                state.is_authenticated = true;
                Ok(user)
            }
            Err(e) => {
                state.user = None;
                state.is_authenticated = false;
                Err(e)
            }
        }
    }

    /// Log out. The token is gone either way, so the local identity is
    /// cleared too; a server failure is kept in `error`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.logout().await;
        let mut state = self.lock();
        state.user = None;
        state.is_authenticated = false;
        state.error = result.as_ref().err().map(ToString::to_string);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Logout request failed, session dropped locally");
        }
        result
    }
}
