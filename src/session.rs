//! Per-request session context and the guard for protected views.
//!
//! The [`resolve_session`] middleware asks the identity provider about the
//! request's access-token cookie once and stores the resulting
//! [`SessionContext`] in the request extensions. Every handler and view reads
//! that one value.

use crate::backend::{AuthSession, AuthUser};
use crate::state::AppState;
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{debug, warn};

pub const SESSION_COOKIE: &str = "sb-access-token";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// The identity provider has not answered yet
    #[default]
    Checking,
    Authenticated(AuthSession),
    Unauthenticated,
}

/// What a protected view should do for the current session
#[derive(Debug, PartialEq)]
pub enum Access<'a> {
    Loading,
    Granted(&'a AuthSession),
    Redirect(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    state: SessionState,
}

impl SessionContext {
    pub fn checking() -> Self {
        Self::default()
    }

    pub fn authenticated(session: AuthSession) -> Self {
        Self {
            state: SessionState::Authenticated(session),
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            state: SessionState::Unauthenticated,
        }
    }

    /// Settle a `Checking` context with the identity provider's answer.
    ///
    /// Errors count as unauthenticated. An already settled context is left
    /// unchanged.
    pub fn resolve(&mut self, token: &str, outcome: Result<Option<AuthUser>>) {
        if self.state != SessionState::Checking {
            return;
        }
        *self = match outcome {
            Ok(Some(user)) => Self::authenticated(AuthSession {
                access_token: token.to_string(),
                user,
            }),
            Ok(None) => Self::unauthenticated(),
            Err(e) => {
                warn!("Session check failed, treating as signed out: {:#}", e);
                Self::unauthenticated()
            }
        };
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(|session| &session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn guard(&self) -> Access<'_> {
        match &self.state {
            SessionState::Checking => Access::Loading,
            SessionState::Authenticated(session) => Access::Granted(session),
            SessionState::Unauthenticated => Access::Redirect(LOGIN_PATH),
        }
    }
}

/// Handlers see `Checking` when the middleware did not run
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .unwrap_or_default())
    }
}

pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let mut context = SessionContext::checking();

    match session_token(&cookies) {
        Some(token) => {
            let outcome = state.identity.current_user(&token).await;
            context.resolve(&token, outcome);
        }
        None => context.resolve("", Ok(None)),
    }
    debug!(
        "Session for {}: authenticated={}",
        request.uri().path(),
        context.is_authenticated()
    );

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Access token from the session cookie, quotes trimmed
pub fn session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn clear_session(cookies: &Cookies) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: "user-1".to_string(),
            email: None,
        }
    }

    #[test]
    fn starts_checking_and_loads() {
        let context = SessionContext::checking();
        assert_eq!(context.state(), &SessionState::Checking);
        assert_eq!(context.guard(), Access::Loading);
        assert!(!context.is_authenticated());
    }

    #[test]
    fn resolves_to_authenticated() {
        let mut context = SessionContext::checking();
        context.resolve("tok", Ok(Some(user())));

        let Access::Granted(session) = context.guard() else {
            panic!("expected access to be granted");
        };
        assert_eq!(session.access_token, "tok");
        assert_eq!(context.user(), Some(&user()));
    }

    #[test]
    fn failed_check_is_unauthenticated() {
        let mut context = SessionContext::checking();
        context.resolve("tok", Err(anyhow::anyhow!("timeout")));

        assert_eq!(context.state(), &SessionState::Unauthenticated);
        assert_eq!(context.guard(), Access::Redirect("/login"));
    }

    #[test]
    fn settled_state_is_final() {
        let mut context = SessionContext::unauthenticated();
        context.resolve("tok", Ok(Some(user())));
        assert_eq!(context.state(), &SessionState::Unauthenticated);
    }

    #[test]
    fn authenticated_context_is_granted() {
        let session = AuthSession {
            access_token: "tok".to_string(),
            user: user(),
        };
        let context = SessionContext::authenticated(session.clone());
        assert_eq!(context.guard(), Access::Granted(&session));
        assert!(context.is_authenticated());
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc123".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
