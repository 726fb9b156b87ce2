use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tower_cookies::Cookies;
use tracing::{info, warn};

use crate::forms::{LoginForm, SignupForm};
use crate::session::{clear_session, session_cookie, SessionContext};
use crate::state::AppState;
use crate::views::pages;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const SIGNUP_FAILED: &str = "An error occurred during signup. Please try again.";

fn signed_in(cookies: &Cookies, access_token: String) -> Response {
    cookies.add(session_cookie(access_token));
    Redirect::to("/").into_response()
}

pub async fn login_form(session: SessionContext) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    Html(pages::login(&session, "", None)).into_response()
}

pub async fn login(
    session: SessionContext,
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(e) = form.validate() {
        let page = pages::login(&session, &form.email, Some(&e.to_string()));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
    }

    match state.identity.sign_in(form.email.trim(), &form.password).await {
        Ok(auth) => {
            info!("User {} signed in", auth.user.id);
            signed_in(&cookies, auth.access_token)
        }
        Err(e) => {
            warn!("Sign-in failed: {:#}", e);
            let page = pages::login(&session, &form.email, Some(INVALID_CREDENTIALS));
            (StatusCode::UNAUTHORIZED, Html(page)).into_response()
        }
    }
}

pub async fn signup_form(session: SessionContext) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    Html(pages::signup(&session, &SignupForm::default(), None)).into_response()
}

pub async fn signup(
    session: SessionContext,
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Response {
    if let Err(e) = form.validate() {
        let page = pages::signup(&session, &form, Some(&e.to_string()));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
    }

    let email = form.email.trim();
    match state
        .identity
        .sign_up(form.full_name.trim(), email, &form.password)
        .await
    {
        Ok(Some(auth)) => {
            info!("User {} signed up", auth.user.id);
            signed_in(&cookies, auth.access_token)
        }
        Ok(None) => Html(pages::confirm_email(&session, email)).into_response(),
        Err(e) => {
            warn!("Sign-up failed: {:#}", e);
            let page = pages::signup(&session, &form, Some(SIGNUP_FAILED));
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
    }
}

pub async fn logout(
    session: SessionContext,
    cookies: Cookies,
    State(state): State<Arc<AppState>>,
) -> Response {
    if let Some(auth) = session.session() {
        if let Err(e) = state.identity.sign_out(&auth.access_token).await {
            warn!("Sign-out failed, clearing cookie anyway: {:#}", e);
        }
    }

    clear_session(&cookies);
    Redirect::to("/").into_response()
}
