pub mod auth;
pub mod listings;
pub mod sell;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::session::{resolve_session, SessionContext};
use crate::state::AppState;
use crate::views::pages;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(listings::home))
        .route("/listings", get(listings::listings))
        .route("/listings/:id", get(listings::detail))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route(
            "/sell",
            get(sell::sell_form)
                .post(sell::submit)
                .layer(DefaultBodyLimit::max(sell::MAX_UPLOAD_BYTES)),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(session: SessionContext) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found(&session)))
}
