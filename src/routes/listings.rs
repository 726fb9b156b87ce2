use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::debug;

use crate::filter;
use crate::forms::FilterForm;
use crate::models::Category;
use crate::session::SessionContext;
use crate::state::AppState;
use crate::views::pages;

pub async fn home(session: SessionContext, State(state): State<Arc<AppState>>) -> Html<String> {
    let repository = &state.repository;
    let new = repository.fetch_by_category(&Category::New).await;
    let popular = repository.fetch_by_category(&Category::Popular).await;
    let sold = repository.fetch_by_category(&Category::Sold).await;

    Html(pages::home(&session, &new, &popular, &sold))
}

pub async fn listings(
    session: SessionContext,
    State(state): State<Arc<AppState>>,
    Query(form): Query<FilterForm>,
) -> Html<String> {
    let category = form.category();
    let records = match &category {
        Some(category) => state.repository.fetch_by_category(category).await,
        None => state.repository.fetch_all().await,
    };
    let heading = category.as_ref().map_or("All Properties", Category::title);

    let (properties, error) = match form.to_spec() {
        Ok(spec) => {
            let total = records.len();
            let matching = filter::apply(records, &spec);
            debug!("Filter kept {} of {} properties", matching.len(), total);
            (matching, None)
        }
        Err(e) => (records, Some(e.to_string())),
    };

    Html(pages::listings(
        &session,
        heading,
        &form,
        &properties,
        error.as_deref(),
    ))
}

pub async fn detail(
    session: SessionContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.repository.fetch_by_id(&id).await {
        Some(property) => Html(pages::property_detail(&session, &property)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html(pages::property_not_found(&session)),
        )
            .into_response(),
    }
}
