//! Where the API tokens live, and the one-shot refresh-and-retry for authorized calls.

use crate::gateway::wire::SessionTokens;
use crate::gateway::{GatewayError, SessionGateway};
use std::future::Future;
use std::sync::RwLock;

/// Storage for the logged-in user's tokens. Passed explicitly to whatever needs them.
pub trait SessionProvider {
    fn tokens(&self) -> Option<SessionTokens>;
    fn store(&self, tokens: SessionTokens);
    fn clear(&self);

    fn is_logged_in(&self) -> bool {
        self.tokens().is_some()
    }
}

/// Session kept in process memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    tokens: RwLock<Option<SessionTokens>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl SessionProvider for MemorySession {
    fn tokens(&self) -> Option<SessionTokens> {
        match self.tokens.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, tokens: SessionTokens) {
        match self.tokens.write() {
            Ok(mut guard) => *guard = Some(tokens),
            Err(poisoned) => *poisoned.into_inner() = Some(tokens),
        }
    }

    fn clear(&self) {
        match self.tokens.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

/// Log in and keep the returned tokens.
pub async fn login<P, S>(
    provider: &P,
    sessions: &S,
    email: &str,
    password: &str,
) -> Result<SessionTokens, GatewayError>
where
    P: SessionProvider + ?Sized,
    S: SessionGateway,
{
    let tokens = sessions.login(email, password).await?;
    log::info!("User {} logged in", tokens.user_name);
    provider.store(tokens.clone());
    Ok(tokens)
}

/// Run an authorized request with the stored tokens.
///
/// A 401 triggers one token refresh and one retry; a second 401 is returned as is.
/// If the refresh token is no longer accepted the session is cleared and
/// [`GatewayError::SessionExpired`] is returned.
pub async fn authorized<P, S, T, F, Fut>(
    provider: &P,
    sessions: &S,
    mut request: F,
) -> Result<T, GatewayError>
where
    P: SessionProvider + ?Sized,
    S: SessionGateway,
    F: FnMut(SessionTokens) -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let tokens = provider.tokens().ok_or(GatewayError::NotLoggedIn)?;
    match request(tokens.clone()).await {
        Err(GatewayError::Unauthorized) => {
            log::info!("Token expired, requesting a new one");
            let fresh = match sessions.refresh(&tokens).await {
                Ok(fresh) => fresh,
                Err(GatewayError::RefreshExhausted) => {
                    log::info!("Refresh token expired, ending session of {}", tokens.user_name);
                    provider.clear();
                    return Err(GatewayError::SessionExpired);
                }
                Err(e) => return Err(e),
            };
            provider.store(fresh.clone());
            request(fresh).await
        }
        other => other,
    }
}
