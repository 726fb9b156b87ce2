//! In-memory backend used by the test suites.

use crate::backend::traits::{FileStore, IdentityProvider, ListingStore};
use crate::backend::types::{
    AuthSession, AuthUser, ImageRow, NewImageRow, NewPropertyRow, PropertyQuery, PropertyRow,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TEST_EMAIL: &str = "owner@example.com";
pub const TEST_PASSWORD: &str = "hunter22";
pub const TEST_TOKEN: &str = "token-owner";

#[derive(Default)]
pub struct MemoryBackend {
    rows: Mutex<Vec<PropertyRow>>,
    uploads: Mutex<Vec<String>>,
    pub fail_reads: AtomicBool,
    pub fail_view_updates: AtomicBool,
    pub fail_session_lookup: AtomicBool,
    /// Number of uploads that succeed before every further upload fails
    pub upload_budget: Mutex<Option<usize>>,
    pub identity_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn with_rows(rows: Vec<PropertyRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn seeded() -> Self {
        Self::with_rows(sample_rows())
    }

    pub fn rows(&self) -> Vec<PropertyRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    fn owner() -> AuthUser {
        AuthUser {
            id: "user-1".to_string(),
            email: Some(TEST_EMAIL.to_string()),
        }
    }
}

#[async_trait]
impl ListingStore for MemoryBackend {
    async fn select_properties(&self, query: &PropertyQuery) -> Result<Vec<PropertyRow>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        let mut rows: Vec<PropertyRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| query.category.as_ref().map_or(true, |c| &row.category == c))
            .filter(|row| query.id.as_ref().map_or(true, |id| &row.id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_views(&self, id: &str, views: i64) -> Result<()> {
        if self.fail_view_updates.load(Ordering::SeqCst) {
            anyhow::bail!("permission denied for table properties");
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.views = Some(views);
        }
        Ok(())
    }

    async fn insert_property(
        &self,
        row: &NewPropertyRow,
        _access_token: &str,
    ) -> Result<PropertyRow> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let stored = PropertyRow {
            id: format!("new-{}", rows.len() + 1),
            title: row.title.clone(),
            description: Some(row.description.clone()),
            price: row.price,
            price_unit: Some(row.price_unit.clone()),
            property_type: row.property_type.clone(),
            category: row.category.clone(),
            dwelling_type: row.dwelling_type.clone(),
            street_address: row.street_address.clone(),
            city: row.city.clone(),
            state: row.state.clone(),
            zip_code: row.zip_code.clone(),
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            square_feet: row.square_feet,
            features: Some(row.features.clone()),
            created_at: Utc::now(),
            user_id: row.user_id.clone(),
            views: Some(0),
            property_images: Vec::new(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn insert_images(&self, images: &[NewImageRow], _access_token: &str) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        for image in images {
            if let Some(row) = rows.iter_mut().find(|row| row.id == image.property_id) {
                row.property_images.push(ImageRow {
                    image_url: image.image_url.clone(),
                    is_primary: image.is_primary,
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for MemoryBackend {
    async fn upload(
        &self,
        path: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
        _access_token: &str,
    ) -> Result<String> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut budget = self.upload_budget.lock().unwrap();
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    anyhow::bail!("storage quota exceeded");
                }
                *remaining -= 1;
            }
        }
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(format!("https://cdn.test/{}", path))
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        if email != TEST_EMAIL || password != TEST_PASSWORD {
            anyhow::bail!("Invalid login credentials");
        }
        Ok(AuthSession {
            access_token: TEST_TOKEN.to_string(),
            user: Self::owner(),
        })
    }

    async fn sign_up(
        &self,
        _full_name: &str,
        email: &str,
        _password: &str,
    ) -> Result<Option<AuthSession>> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(AuthSession {
            access_token: format!("token-{}", email),
            user: AuthUser {
                id: "user-2".to_string(),
                email: Some(email.to_string()),
            },
        }))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<()> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        if self.fail_session_lookup.load(Ordering::SeqCst) {
            anyhow::bail!("identity provider unavailable");
        }
        Ok((access_token == TEST_TOKEN).then(Self::owner))
    }
}

fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().unwrap()
}

#[allow(clippy::too_many_arguments)]
fn row(
    id: &str,
    title: &str,
    price: f64,
    property_type: &str,
    (city, state, zip): (&str, &str, &str),
    bedrooms: u32,
    bathrooms: f32,
    square_feet: u32,
    category: &str,
    created_at: &str,
) -> PropertyRow {
    PropertyRow {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(format!("{} in {}.", title, city)),
        price,
        price_unit: None,
        property_type: property_type.to_string(),
        category: category.to_string(),
        dwelling_type: None,
        street_address: Some(format!("{} Main St", id)),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: Some(zip.to_string()),
        bedrooms,
        bathrooms,
        square_feet,
        features: Some(vec!["Garage".to_string()]),
        created_at: at(created_at),
        user_id: Some("user-1".to_string()),
        views: Some(0),
        property_images: vec![
            ImageRow {
                image_url: format!("https://img.test/{}/b.jpg", id),
                is_primary: false,
            },
            ImageRow {
                image_url: format!("https://img.test/{}/a.jpg", id),
                is_primary: true,
            },
        ],
    }
}

/// The twelve sample listings the site was launched with
pub fn sample_rows() -> Vec<PropertyRow> {
    let mut rows = vec![
        row("1", "Modern Luxury Villa", 1_250_000.0, "sale", ("Beverly Hills", "CA", "90210"), 5, 4.5, 4200, "new", "2023-05-01T12:00:00Z"),
        row("2", "Downtown Luxury Loft", 850_000.0, "sale", ("Austin", "TX", "78701"), 2, 2.0, 1800, "popular", "2023-04-10T12:00:00Z"),
        row("3", "Seaside Retreat", 3_200_000.0, "sale", ("Malibu", "CA", "90265"), 4, 3.5, 3800, "popular", "2023-05-15T12:00:00Z"),
        row("4", "Cozy Downtown Apartment", 2_200.0, "rent", ("Seattle", "WA", "98101"), 1, 1.0, 750, "new", "2023-05-22T12:00:00Z"),
        row("5", "Classic Victorian Home", 950_000.0, "sale", ("San Francisco", "CA", "94117"), 4, 2.5, 2800, "sold", "2023-04-05T12:00:00Z"),
        row("6", "Modern Farmhouse", 875_000.0, "sale", ("Nashville", "TN", "37205"), 4, 3.0, 3200, "popular", "2023-03-28T12:00:00Z"),
        row("7", "Luxury High-Rise Condo", 1_100_000.0, "sale", ("Chicago", "IL", "60601"), 2, 2.5, 1600, "sold", "2023-02-18T12:00:00Z"),
        row("8", "Family Home with Pool", 650_000.0, "sale", ("Phoenix", "AZ", "85004"), 4, 3.0, 2500, "new", "2023-05-10T12:00:00Z"),
        row("9", "Lake House Retreat", 780_000.0, "sale", ("Lake Tahoe", "NV", "89449"), 3, 2.0, 2100, "popular", "2023-04-22T12:00:00Z"),
        row("10", "Urban Townhouse", 725_000.0, "sale", ("Boston", "MA", "02108"), 3, 2.5, 1950, "sold", "2023-03-15T12:00:00Z"),
        row("11", "Luxury Penthouse", 3_500_000.0, "sale", ("Miami", "FL", "33131"), 3, 3.5, 3500, "new", "2023-05-20T12:00:00Z"),
        row("12", "Charming Cottage", 450_000.0, "sale", ("Portland", "OR", "97205"), 2, 1.0, 1200, "sold", "2023-02-28T12:00:00Z"),
    ];
    rows[3].price_unit = Some("monthly".to_string());
    rows[3].dwelling_type = Some("apartment".to_string());
    rows[6].dwelling_type = Some("condo".to_string());
    rows[9].dwelling_type = Some("townhouse".to_string());
    rows[11].property_images.clear();
    rows
}
