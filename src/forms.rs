//! Parsing and validation of user input.
//!
//! Everything here runs before the backend is contacted.

use crate::filter::{FilterSpec, KindFilter, MinCount, PriceRange, StatusFilter};
use crate::models::{Category, DwellingKind, ImageUpload, ListingType, Location, NewListing};
use crate::repository::MAX_IMAGES;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("You must agree to the terms and conditions")]
    TermsNotAccepted,

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("'{value}' is not a valid {field}")]
    InvalidChoice { field: &'static str, value: String },
}

/// Raw listings query string: `?category=` plus the filter sidebar fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterForm {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl FilterForm {
    pub fn category(&self) -> Option<Category> {
        present(&self.category).map(Category::parse)
    }

    pub fn to_spec(&self) -> Result<FilterSpec, FormError> {
        let min = optional_number(&self.min_price, "Minimum price")?;
        let max = optional_number(&self.max_price, "Maximum price")?;

        let kind = match present(&self.property_type) {
            None | Some("all") | Some("any") => KindFilter::Any,
            Some(value) => KindFilter::Only(DwellingKind::parse(value).ok_or_else(|| {
                FormError::InvalidChoice {
                    field: "property type",
                    value: value.to_string(),
                }
            })?),
        };

        let status = match present(&self.status) {
            None | Some("all") | Some("any") => StatusFilter::Any,
            Some(value) => StatusFilter::Only(status_choice(value).ok_or_else(|| {
                FormError::InvalidChoice {
                    field: "status",
                    value: value.to_string(),
                }
            })?),
        };

        Ok(FilterSpec {
            price: PriceRange::new(min, max),
            kind,
            bedrooms: min_count(&self.bedrooms, "Bedrooms")?,
            bathrooms: min_count(&self.bathrooms, "Bathrooms")?,
            location: self.location.clone().unwrap_or_default().trim().to_string(),
            status,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(FormError::Missing("Password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    /// Checkbox; present only when ticked
    pub terms: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.terms.is_none() {
            return Err(FormError::TermsNotAccepted);
        }
        required(&self.full_name, "Full name")?;
        required(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(FormError::Missing("Password"));
        }
        Ok(())
    }
}

/// Text fields and files of the create-listing form, as received
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub listing_type: String,
    pub category: String,
    pub property_type: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub square_feet: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub features: String,
    pub images: Vec<ImageUpload>,
}

impl ListingForm {
    /// Store a text field by its form name; unknown names are ignored
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "price" => &mut self.price,
            "listing_type" => &mut self.listing_type,
            "category" => &mut self.category,
            "property_type" => &mut self.property_type,
            "bedrooms" => &mut self.bedrooms,
            "bathrooms" => &mut self.bathrooms,
            "square_feet" => &mut self.square_feet,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "zip" => &mut self.zip,
            "features" => &mut self.features,
            _ => return,
        };
        *slot = value;
    }

    /// Keep an image unless the limit is reached or the file input was left empty
    pub fn add_image(&mut self, image: ImageUpload) {
        if image.bytes.is_empty() || self.images.len() >= MAX_IMAGES {
            return;
        }
        self.images.push(image);
    }

    pub fn validate(&self) -> Result<NewListing, FormError> {
        let title = required(&self.title, "Property title")?;
        let price: f64 = number(&self.price, "Price")?;
        if !price.is_finite() || price < 0.0 {
            return Err(FormError::InvalidNumber {
                field: "Price",
                value: self.price.clone(),
            });
        }

        let listing_type = required(&self.listing_type, "Listing type")?;
        let listing_type =
            ListingType::parse(listing_type).ok_or_else(|| FormError::InvalidChoice {
                field: "listing type",
                value: listing_type.to_string(),
            })?;
        let category = Category::parse(required(&self.category, "Category")?);

        let kind = match self.property_type.trim() {
            "" => None,
            value => Some(
                DwellingKind::parse(value).ok_or_else(|| FormError::InvalidChoice {
                    field: "property type",
                    value: value.to_string(),
                })?,
            ),
        };

        Ok(NewListing {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price,
            listing_type,
            category,
            kind,
            bedrooms: number(&self.bedrooms, "Bedrooms")?,
            bathrooms: number(&self.bathrooms, "Bathrooms")?,
            square_feet: number(&self.square_feet, "Square feet")?,
            location: Location {
                address: optional_text(&self.address),
                city: required(&self.city, "City")?.to_string(),
                state: required(&self.state, "State")?.to_string(),
                zip: optional_text(&self.zip),
            },
            features: split_features(&self.features),
        })
    }
}

/// Comma-separated tags, trimmed, empties dropped
pub fn split_features(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|feature| !feature.is_empty())
        .map(str::to_string)
        .collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FormError> {
    match value.trim() {
        "" => Err(FormError::Missing(field)),
        trimmed => Ok(trimmed),
    }
}

fn optional_text(value: &str) -> Option<String> {
    Some(value.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn number<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, FormError> {
    let trimmed = required(value, field)?;
    trimmed.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: trimmed.to_string(),
    })
}

fn optional_number(value: &Option<String>, field: &'static str) -> Result<Option<f64>, FormError> {
    present(value)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| FormError::InvalidNumber {
                    field,
                    value: v.to_string(),
                })
        })
        .transpose()
}

/// Status values, including the "for-sale" / "for-rent" forms
fn status_choice(value: &str) -> Option<ListingType> {
    let value = value.to_ascii_lowercase();
    ListingType::parse(value.strip_prefix("for-").unwrap_or(&value))
}

fn min_count(value: &Option<String>, field: &'static str) -> Result<MinCount, FormError> {
    match present(value) {
        None | Some("any") => Ok(MinCount::Any),
        Some(v) => v
            .trim_end_matches('+')
            .parse()
            .map(MinCount::AtLeast)
            .map_err(|_| FormError::InvalidNumber {
                field,
                value: v.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_form() -> ListingForm {
        let mut form = ListingForm::default();
        for (name, value) in [
            ("title", "Modern Luxury Villa"),
            ("price", "1250000"),
            ("listing_type", "sale"),
            ("category", "luxury"),
            ("bedrooms", "5"),
            ("bathrooms", "4.5"),
            ("square_feet", "4200"),
            ("city", "Beverly Hills"),
            ("state", "CA"),
            ("features", "Pool, Smart Home,, Wine Cellar ,"),
        ] {
            form.set(name, value.to_string());
        }
        form
    }

    #[test]
    fn empty_filter_form_is_any() {
        let spec = FilterForm::default().to_spec().unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn filter_form_parses_every_field() {
        let form = FilterForm {
            category: Some("new".to_string()),
            min_price: Some("100000".to_string()),
            max_price: Some(" ".to_string()),
            property_type: Some("condo".to_string()),
            bedrooms: Some("3".to_string()),
            bathrooms: Some("2+".to_string()),
            location: Some("  Austin ".to_string()),
            status: Some("rent".to_string()),
        };
        let spec = form.to_spec().unwrap();

        assert_eq!(form.category(), Some(Category::New));
        assert_eq!(spec.price, PriceRange::new(Some(100_000.0), None));
        assert_eq!(spec.kind, KindFilter::Only(DwellingKind::Condo));
        assert_eq!(spec.bedrooms, MinCount::AtLeast(3));
        assert_eq!(spec.bathrooms, MinCount::AtLeast(2));
        assert_eq!(spec.location, "Austin");
        assert_eq!(spec.status, StatusFilter::Only(ListingType::Rent));
    }

    #[test]
    fn filter_sentinels_are_any() {
        let form = FilterForm {
            property_type: Some("all".to_string()),
            bedrooms: Some("any".to_string()),
            status: Some("all".to_string()),
            ..FilterForm::default()
        };
        assert!(form.to_spec().unwrap().is_empty());
    }

    #[test]
    fn malformed_minimum_is_rejected() {
        let form = FilterForm {
            bedrooms: Some("three".to_string()),
            ..FilterForm::default()
        };
        assert_eq!(
            form.to_spec().unwrap_err(),
            FormError::InvalidNumber {
                field: "Bedrooms",
                value: "three".to_string()
            }
        );
    }

    #[test]
    fn hyphenated_status_values() {
        for (raw, expected) in [("for-sale", ListingType::Sale), ("for-rent", ListingType::Rent)] {
            let form = FilterForm {
                status: Some(raw.to_string()),
                ..FilterForm::default()
            };
            assert_eq!(form.to_spec().unwrap().status, StatusFilter::Only(expected));
        }
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let form = FilterForm {
                min_price: Some(raw.to_string()),
                ..FilterForm::default()
            };
            assert_eq!(
                form.to_spec().unwrap_err(),
                FormError::InvalidNumber {
                    field: "Minimum price",
                    value: raw.to_string()
                }
            );
        }

        let mut listing = listing_form();
        listing.set("price", "NaN".to_string());
        assert!(matches!(
            listing.validate(),
            Err(FormError::InvalidNumber { field: "Price", .. })
        ));
    }

    #[test]
    fn signup_password_mismatch() {
        let form = SignupForm {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret-one".to_string(),
            confirm_password: "secret-two".to_string(),
            terms: Some("on".to_string()),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, FormError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn signup_requires_terms() {
        let form = SignupForm {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            terms: None,
        };
        assert_eq!(form.validate().unwrap_err(), FormError::TermsNotAccepted);
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(form.validate().unwrap_err(), FormError::Missing("Password"));
    }

    #[test]
    fn listing_form_validates() {
        let listing = listing_form().validate().unwrap();

        assert_eq!(listing.title, "Modern Luxury Villa");
        assert_eq!(listing.price, 1_250_000.0);
        assert_eq!(listing.listing_type, ListingType::Sale);
        assert_eq!(listing.category, Category::Luxury);
        assert_eq!(listing.bathrooms, 4.5);
        assert_eq!(listing.location.address, None);
        assert_eq!(listing.features, vec!["Pool", "Smart Home", "Wine Cellar"]);
    }

    #[test]
    fn listing_form_reports_missing_city() {
        let mut form = listing_form();
        form.set("city", "  ".to_string());
        assert_eq!(form.validate().unwrap_err(), FormError::Missing("City"));
    }

    #[test]
    fn listing_form_rejects_bad_numbers() {
        let mut form = listing_form();
        form.set("bedrooms", "2.5".to_string());
        assert!(matches!(
            form.validate(),
            Err(FormError::InvalidNumber { field: "Bedrooms", .. })
        ));
    }

    #[test]
    fn listing_form_keeps_five_images() {
        let mut form = ListingForm::default();
        for i in 0..8 {
            form.add_image(ImageUpload {
                file_name: format!("{}.jpg", i),
                content_type: "image/jpeg".to_string(),
                bytes: if i == 0 { Vec::new() } else { vec![1] },
            });
        }
        let names: Vec<_> = form.images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]);
    }
}
