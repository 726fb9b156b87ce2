use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::warn;

use crate::error::AppError;
use crate::forms::ListingForm;
use crate::models::ImageUpload;
use crate::session::{Access, SessionContext};
use crate::state::AppState;
use crate::views::pages;

/// Request body limit for the create-listing form
pub const MAX_UPLOAD_BYTES: usize = 30 * 1024 * 1024;

pub async fn sell_form(session: SessionContext) -> Response {
    match session.guard() {
        Access::Loading => Html(pages::loading(&session)).into_response(),
        Access::Redirect(to) => Redirect::to(to).into_response(),
        Access::Granted(_) => {
            Html(pages::sell(&session, &ListingForm::default(), None)).into_response()
        }
    }
}

pub async fn submit(
    session: SessionContext,
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let auth = match session.guard() {
        Access::Loading => return Ok(Html(pages::loading(&session)).into_response()),
        Access::Redirect(to) => return Ok(Redirect::to(to).into_response()),
        Access::Granted(auth) => auth.clone(),
    };

    // Body is only read once the session is known to be signed in
    let multipart = Multipart::from_request(request, &state).await?;
    let mut form = read_listing_form(multipart).await?;
    let listing = match form.validate() {
        Ok(listing) => listing,
        Err(e) => {
            let page = pages::sell(&session, &form, Some(&e.to_string()));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let images = std::mem::take(&mut form.images);
    match state.repository.submit(&listing, images, &auth).await {
        Ok(property) => Ok(Html(pages::sell_success(&session, &property)).into_response()),
        Err(e) => {
            warn!("Listing submission by {} failed: {}", auth.user.id, e);
            let page = pages::sell(&session, &form, Some(&e.to_string()));
            Ok((StatusCode::BAD_GATEWAY, Html(page)).into_response())
        }
    }
}

async fn read_listing_form(mut multipart: Multipart) -> Result<ListingForm, AppError> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            return Err(AppError::MalformedPayload(
                "form field without a name".to_string(),
            ));
        };

        if name == "images" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            form.add_image(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await?;
            form.set(&name, value);
        }
    }

    Ok(form)
}
