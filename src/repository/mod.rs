pub mod mapping;

use crate::backend::{AuthSession, FileStore, ListingStore, PropertyQuery};
use crate::models::{Category, ImageUpload, NewListing, Property};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Most images a single listing may carry
pub const MAX_IMAGES: usize = 5;

/// Failure of a listing write. Nothing already written is rolled back.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Error uploading image {file_name}: {cause:#}")]
    ImageUpload {
        file_name: String,
        cause: anyhow::Error,
    },

    #[error("Error creating listing: {0:#}")]
    Insert(anyhow::Error),

    #[error("Error saving listing images: {0:#}")]
    ImageRecords(anyhow::Error),
}

/// Read and write access to property listings
#[derive(Clone)]
pub struct ListingRepository {
    store: Arc<dyn ListingStore>,
    files: Arc<dyn FileStore>,
}

impl ListingRepository {
    pub fn new(store: Arc<dyn ListingStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Every listing, newest first. Empty when the backend fails.
    pub async fn fetch_all(&self) -> Vec<Property> {
        self.fetch(PropertyQuery::all()).await
    }

    /// Listings of one category, newest first. Empty when the backend fails.
    pub async fn fetch_by_category(&self, category: &Category) -> Vec<Property> {
        self.fetch(PropertyQuery::by_category(category.as_str())).await
    }

    async fn fetch(&self, query: PropertyQuery) -> Vec<Property> {
        match self.store.select_properties(&query).await {
            Ok(rows) => {
                debug!("Fetched {} property rows", rows.len());
                rows.into_iter().map(mapping::property_from_row).collect()
            }
            Err(e) => {
                warn!("Failed to fetch properties ({:?}): {:#}", query, e);
                Vec::new()
            }
        }
    }

    /// One listing by identifier, counting the view.
    ///
    /// The counter update is best-effort: when it fails the listing is still
    /// returned with its previous count.
    pub async fn fetch_by_id(&self, id: &str) -> Option<Property> {
        let rows = match self.store.select_properties(&PropertyQuery::by_id(id)).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to fetch property {}: {:#}", id, e);
                return None;
            }
        };

        let mut property = mapping::property_from_row(rows.into_iter().next()?);

        let views = property.views.unwrap_or(0) + 1;
        match self.store.update_views(&property.id, views).await {
            Ok(()) => property.views = Some(views),
            Err(e) => warn!("Failed to count view of property {}: {:#}", id, e),
        }

        Some(property)
    }

    /// Upload the images and store a new listing owned by the session's user.
    ///
    /// Uploads run one after another and stop at the first failure. Only the
    /// first [`MAX_IMAGES`] images are used.
    pub async fn submit(
        &self,
        listing: &NewListing,
        images: Vec<ImageUpload>,
        session: &AuthSession,
    ) -> Result<Property, SubmissionError> {
        let mut urls = Vec::new();
        for image in images.into_iter().take(MAX_IMAGES) {
            let path = format!(
                "{}/{}.{}",
                session.user.id,
                random_name(),
                image.extension()
            );
            let url = self
                .files
                .upload(&path, &image.content_type, image.bytes, &session.access_token)
                .await
                .map_err(|cause| SubmissionError::ImageUpload {
                    file_name: image.file_name.clone(),
                    cause,
                })?;
            debug!("Uploaded {} to {}", image.file_name, url);
            urls.push(url);
        }

        self.store_listing(
            listing,
            &urls,
            Some(&session.user.id),
            &session.access_token,
        )
        .await
    }

    /// Store a listing whose images are already hosted elsewhere
    pub async fn seed(
        &self,
        listing: &NewListing,
        image_urls: &[String],
        access_token: &str,
    ) -> Result<Property, SubmissionError> {
        let urls: Vec<String> = image_urls.iter().take(MAX_IMAGES).cloned().collect();
        self.store_listing(listing, &urls, None, access_token).await
    }

    async fn store_listing(
        &self,
        listing: &NewListing,
        urls: &[String],
        user_id: Option<&str>,
        access_token: &str,
    ) -> Result<Property, SubmissionError> {
        let row = mapping::new_property_row(listing, user_id);
        let mut stored = self
            .store
            .insert_property(&row, access_token)
            .await
            .map_err(SubmissionError::Insert)?;

        let image_rows = mapping::image_rows(&stored.id, urls);
        self.store
            .insert_images(&image_rows, access_token)
            .await
            .map_err(SubmissionError::ImageRecords)?;

        info!("Created listing {} ({})", stored.id, stored.title);

        stored.property_images = image_rows
            .into_iter()
            .map(|image| crate::backend::types::ImageRow {
                image_url: image.image_url,
                is_primary: image.is_primary,
            })
            .collect();
        Ok(mapping::property_from_row(stored))
    }
}

fn random_name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(13)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
