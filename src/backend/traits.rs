use crate::backend::types::{
    AuthSession, AuthUser, NewImageRow, NewPropertyRow, PropertyQuery, PropertyRow,
};
use anyhow::Result;
use async_trait::async_trait;

/// The property collection and its image sub-collection
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Rows matching the query, newest first, with their image rows embedded
    async fn select_properties(&self, query: &PropertyQuery) -> Result<Vec<PropertyRow>>;

    /// Overwrite the view counter of one property
    async fn update_views(&self, id: &str, views: i64) -> Result<()>;

    /// Insert a property on behalf of the token's owner and return the stored row
    async fn insert_property(&self, row: &NewPropertyRow, access_token: &str)
        -> Result<PropertyRow>;

    async fn insert_images(&self, rows: &[NewImageRow], access_token: &str) -> Result<()>;
}

/// Object storage for listing images
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` under `path` and return the object's public URL
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
        access_token: &str,
    ) -> Result<String>;
}

/// The external session/identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Returns `None` when the provider requires the address to be confirmed first
    async fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthSession>>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;

    /// `None` when the token is unknown or expired
    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>>;
}
