use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `properties` collection, with its embedded image rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub price_unit: Option<String>,
    /// `sale` or `rent`
    pub property_type: String,
    pub category: String,
    #[serde(default)]
    pub dwelling_type: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub property_images: Vec<ImageRow>,
}

/// A row of the `property_images` sub-collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRow {
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Server-side selection over the `properties` collection.
///
/// Results are always ordered by `created_at` descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    pub category: Option<String>,
    pub id: Option<String>,
}

impl PropertyQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            id: None,
        }
    }

    pub fn by_id(id: &str) -> Self {
        Self {
            category: None,
            id: Some(id.to_string()),
        }
    }
}

/// Insert payload for the `properties` collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPropertyRow {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub price_unit: String,
    pub property_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dwelling_type: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Insert payload for the `property_images` sub-collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewImageRow {
    pub property_id: String,
    pub image_url: String,
    pub is_primary: bool,
}

/// The signed-in user as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An access token together with the user it belongs to
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}
