use crate::backend::traits::{FileStore, IdentityProvider, ListingStore};
use crate::backend::types::{
    AuthSession, AuthUser, NewImageRow, NewPropertyRow, PropertyQuery, PropertyRow,
};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const PROPERTIES: &str = "properties";
const PROPERTY_IMAGES: &str = "property_images";

/// Client for a Supabase-style backend: PostgREST collections, storage and auth
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
    bucket: String,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("housing-listings/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            service_key: config.service_key.clone(),
            bucket: config.storage_bucket.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// Attach the project key and a bearer token (the anon key when no user token is given)
    fn authorized(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token.unwrap_or(&self.anon_key))
    }

    /// Key used for writes that are not made on behalf of a user
    fn privileged_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.anon_key)
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Backend returned status {} while trying to {}", status, action);
    anyhow::bail!("Failed to {}: {} {}", action, status, body)
}

#[async_trait]
impl ListingStore for SupabaseClient {
    async fn select_properties(&self, query: &PropertyQuery) -> Result<Vec<PropertyRow>> {
        let mut request = self.client.get(self.rest_url(PROPERTIES)).query(&[
            ("select", "*,property_images(image_url,is_primary)"),
            ("order", "created_at.desc"),
        ]);
        if let Some(category) = &query.category {
            request = request.query(&[("category", format!("eq.{}", category))]);
        }
        if let Some(id) = &query.id {
            request = request.query(&[("id", format!("eq.{}", id))]);
        }

        debug!("Querying properties: {:?}", query);

        let response = self
            .authorized(request, None)
            .send()
            .await
            .context("Failed to query properties")?;
        let response = ensure_success(response, "query properties").await?;

        response
            .json()
            .await
            .context("Failed to decode property rows")
    }

    async fn update_views(&self, id: &str, views: i64) -> Result<()> {
        let request = self
            .client
            .patch(self.rest_url(PROPERTIES))
            .query(&[("id", format!("eq.{}", id))])
            .json(&json!({ "views": views }));

        let response = self
            .authorized(request, Some(self.privileged_key()))
            .send()
            .await
            .context("Failed to update view counter")?;
        ensure_success(response, "update view counter").await?;
        Ok(())
    }

    async fn insert_property(
        &self,
        row: &NewPropertyRow,
        access_token: &str,
    ) -> Result<PropertyRow> {
        let request = self
            .client
            .post(self.rest_url(PROPERTIES))
            .header("Prefer", "return=representation")
            .json(row);

        let response = self
            .authorized(request, Some(access_token))
            .send()
            .await
            .context("Failed to insert property")?;
        let response = ensure_success(response, "insert property").await?;

        let mut rows: Vec<PropertyRow> = response
            .json()
            .await
            .context("Failed to decode inserted property")?;
        if rows.is_empty() {
            anyhow::bail!("Backend returned no row for the inserted property");
        }
        Ok(rows.swap_remove(0))
    }

    async fn insert_images(&self, rows: &[NewImageRow], access_token: &str) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let request = self.client.post(self.rest_url(PROPERTY_IMAGES)).json(rows);
        let response = self
            .authorized(request, Some(access_token))
            .send()
            .await
            .context("Failed to insert property images")?;
        ensure_success(response, "insert property images").await?;
        Ok(())
    }
}

#[async_trait]
impl FileStore for SupabaseClient {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
        access_token: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, path
        );
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        let response = self
            .authorized(request, Some(access_token))
            .send()
            .await
            .context("Failed to upload image")?;
        ensure_success(response, "upload image").await?;

        Ok(self.public_url(path))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let response = self
            .authorized(request, None)
            .send()
            .await
            .context("Failed to reach identity provider")?;
        let response = ensure_success(response, "sign in").await?;

        response
            .json()
            .await
            .context("Failed to decode sign-in session")
    }

    async fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthSession>> {
        let request = self.client.post(self.auth_url("signup")).json(&json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        }));

        let response = self
            .authorized(request, None)
            .send()
            .await
            .context("Failed to reach identity provider")?;
        let response = ensure_success(response, "sign up").await?;

        let body: Value = response
            .json()
            .await
            .context("Failed to decode sign-up response")?;

        // Without a token the account is waiting for email confirmation
        if body.get("access_token").is_none() {
            return Ok(None);
        }
        let session = serde_json::from_value(body).context("Failed to decode sign-up session")?;
        Ok(Some(session))
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let request = self.client.post(self.auth_url("logout"));
        let response = self
            .authorized(request, Some(access_token))
            .send()
            .await
            .context("Failed to reach identity provider")?;
        ensure_success(response, "sign out").await?;
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        let request = self.client.get(self.auth_url("user"));
        let response = self
            .authorized(request, Some(access_token))
            .send()
            .await
            .context("Failed to reach identity provider")?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }
        let response = ensure_success(response, "resolve session").await?;

        let user = response
            .json()
            .await
            .context("Failed to decode session user")?;
        Ok(Some(user))
    }
}
