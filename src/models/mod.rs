use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when a listing has no images of its own
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400?text=No+Image";

/// Whether the property is offered for sale or for rent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

impl ListingType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sale" => Some(Self::Sale),
            "rent" => Some(Self::Rent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }

    /// The price unit a listing of this type carries by convention
    pub fn default_price_unit(self) -> PriceUnit {
        match self {
            Self::Sale => PriceUnit::Total,
            Self::Rent => PriceUnit::Monthly,
        }
    }
}

/// One-time total or recurring monthly price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    Total,
    Monthly,
}

impl PriceUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "total" => Some(Self::Total),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Marketing classification of a listing.
///
/// Values the application does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    New,
    Popular,
    Luxury,
    Affordable,
    Sold,
    Other(String),
}

impl Category {
    pub fn parse(value: &str) -> Self {
        match value {
            "new" => Self::New,
            "popular" => Self::Popular,
            "luxury" => Self::Luxury,
            "affordable" => Self::Affordable,
            "sold" => Self::Sold,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Popular => "popular",
            Self::Luxury => "luxury",
            Self::Affordable => "affordable",
            Self::Sold => "sold",
            Self::Other(value) => value,
        }
    }

    /// Heading used by the listings page for this category
    pub fn title(&self) -> &'static str {
        match self {
            Self::New => "New Listings",
            Self::Popular => "Popular Properties",
            Self::Luxury => "Luxury Properties",
            Self::Affordable => "Affordable Properties",
            Self::Sold => "Sold Properties",
            Self::Other(_) => "All Properties",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Kind of dwelling, the target of the "property type" filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DwellingKind {
    House,
    Apartment,
    Condo,
    Townhouse,
}

impl DwellingKind {
    pub const ALL: [DwellingKind; 4] = [
        DwellingKind::House,
        DwellingKind::Apartment,
        DwellingKind::Condo,
        DwellingKind::Townhouse,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "house" => Some(Self::House),
            "apartment" => Some(Self::Apartment),
            "condo" => Some(Self::Condo),
            "townhouse" => Some(Self::Townhouse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Condo => "condo",
            Self::Townhouse => "townhouse",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Condo => "Condo",
            Self::Townhouse => "Townhouse",
        }
    }
}

/// Location information for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub price_unit: PriceUnit,
    pub listing_type: ListingType,
    pub category: Category,
    pub kind: Option<DwellingKind>,
    pub location: Location,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<String>,
    pub views: Option<i64>,
}

impl Property {
    /// First image, falling back to the placeholder
    pub fn primary_image(&self) -> &str {
        self.images
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// A validated listing ready to be written to the backend
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub listing_type: ListingType,
    pub category: Category,
    #[serde(default)]
    pub kind: Option<DwellingKind>,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub location: Location,
    #[serde(default)]
    pub features: Vec<String>,
}

/// An image file received with a listing submission
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// File extension used for the stored object name
    pub fn extension(&self) -> &str {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin")
    }
}
