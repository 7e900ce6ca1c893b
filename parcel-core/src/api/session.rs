use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    pending_redirect: Option<String>,
}

/// In-memory authentication session shared between the API client and the
/// front end.
///
/// Cloning is cheap; clones observe the same token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    pub fn set_token(
        &self,
        token: impl Into<String>,
    ) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(token.into());
        state.pending_redirect = None;
    }

    /// Drops the credentials after the server rejected them and records
    /// that the user must be sent to `login_route`.
    pub fn expire(
        &self,
        login_route: &str,
    ) {
        warn!(login_route, "session expired; clearing stored token");
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = None;
        state.pending_redirect = Some(login_route.to_string());
    }

    /// Returns and clears the pending login redirect, if any.
    pub fn take_redirect(&self) -> Option<String> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pending_redirect
            .take()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_session_has_no_token() {
        assert_eq!(Session::new().token(), None);
    }

    #[test]
    fn clones_share_the_token() {
        let session = Session::new();
        let clone = session.clone();

        session.set_token("abc");

        assert_eq!(clone.token().as_deref(), Some("abc"));
    }

    #[test]
    fn expire_clears_token_and_records_redirect_once() {
        let session = Session::with_token("abc");

        session.expire("/login");

        assert_eq!(session.token(), None);
        assert_eq!(session.take_redirect().as_deref(), Some("/login"));
        assert_eq!(session.take_redirect(), None);
    }
}
