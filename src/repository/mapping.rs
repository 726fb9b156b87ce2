//! Translation between backend rows and the application's records.
//!
//! Column names of the external schema appear only in this module and in
//! `backend::types`.

use crate::backend::types::{ImageRow, NewImageRow, NewPropertyRow, PropertyRow};
use crate::models::{
    Category, DwellingKind, ListingType, Location, NewListing, PriceUnit, Property,
    PLACEHOLDER_IMAGE,
};
use tracing::debug;

/// Map one backend row into a property record
pub fn property_from_row(row: PropertyRow) -> Property {
    let listing_type = ListingType::parse(&row.property_type).unwrap_or_else(|| {
        debug!(
            "Property {} has unknown type '{}', treating as sale",
            row.id, row.property_type
        );
        ListingType::Sale
    });
    let price_unit = row
        .price_unit
        .as_deref()
        .and_then(PriceUnit::parse)
        .unwrap_or_else(|| listing_type.default_price_unit());

    Property {
        id: row.id,
        title: row.title,
        description: row.description.unwrap_or_default(),
        price: row.price,
        price_unit,
        listing_type,
        category: Category::parse(&row.category),
        kind: row.dwelling_type.as_deref().and_then(DwellingKind::parse),
        location: Location {
            address: non_empty(row.street_address),
            city: row.city,
            state: row.state,
            zip: non_empty(row.zip_code),
        },
        bedrooms: row.bedrooms,
        bathrooms: row.bathrooms,
        square_feet: row.square_feet,
        features: row.features.unwrap_or_default(),
        images: ordered_images(row.property_images),
        created_at: row.created_at,
        user_id: row.user_id,
        views: row.views,
    }
}

/// Primary images first, backend order otherwise; never empty
pub fn ordered_images(mut images: Vec<ImageRow>) -> Vec<String> {
    if images.is_empty() {
        return vec![PLACEHOLDER_IMAGE.to_string()];
    }
    // stable, so non-primary images keep their relative order
    images.sort_by_key(|image| !image.is_primary);
    images.into_iter().map(|image| image.image_url).collect()
}

/// Insert payload for a listing owned by `user_id`
pub fn new_property_row(listing: &NewListing, user_id: Option<&str>) -> NewPropertyRow {
    NewPropertyRow {
        title: listing.title.clone(),
        description: listing.description.clone(),
        price: listing.price,
        price_unit: match listing.listing_type.default_price_unit() {
            PriceUnit::Total => "total".to_string(),
            PriceUnit::Monthly => "monthly".to_string(),
        },
        property_type: listing.listing_type.as_str().to_string(),
        category: listing.category.as_str().to_string(),
        dwelling_type: listing.kind.map(|kind| kind.as_str().to_string()),
        bedrooms: listing.bedrooms,
        bathrooms: listing.bathrooms,
        square_feet: listing.square_feet,
        street_address: listing.location.address.clone(),
        city: listing.location.city.clone(),
        state: listing.location.state.clone(),
        zip_code: listing.location.zip.clone(),
        features: listing.features.clone(),
        user_id: user_id.map(str::to_string),
    }
}

/// Image rows for a freshly inserted property; the first URL is the primary image
pub fn image_rows(property_id: &str, urls: &[String]) -> Vec<NewImageRow> {
    urls.iter()
        .enumerate()
        .map(|(index, url)| NewImageRow {
            property_id: property_id.to_string(),
            image_url: url.clone(),
            is_primary: index == 0,
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::sample_rows;

    fn image(url: &str, is_primary: bool) -> ImageRow {
        ImageRow {
            image_url: url.to_string(),
            is_primary,
        }
    }

    #[test]
    fn primary_image_sorts_first() {
        let images = vec![
            image("b", false),
            image("c", false),
            image("a", true),
            image("d", false),
        ];
        assert_eq!(ordered_images(images), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn missing_images_become_placeholder() {
        assert_eq!(ordered_images(Vec::new()), vec![PLACEHOLDER_IMAGE]);
    }

    #[test]
    fn row_fields_are_renamed() {
        let row = sample_rows().remove(3);
        let property = property_from_row(row);

        assert_eq!(property.title, "Cozy Downtown Apartment");
        assert_eq!(property.listing_type, ListingType::Rent);
        assert_eq!(property.price_unit, PriceUnit::Monthly);
        assert_eq!(property.kind, Some(DwellingKind::Apartment));
        assert_eq!(property.location.zip.as_deref(), Some("98101"));
        assert_eq!(property.square_feet, 750);
        assert_eq!(property.images[0], "https://img.test/4/a.jpg");
    }

    #[test]
    fn unknown_category_is_kept() {
        let mut row = sample_rows().remove(0);
        row.category = "waterfront".to_string();
        row.street_address = Some("  ".to_string());

        let property = property_from_row(row);
        assert_eq!(property.category, Category::Other("waterfront".to_string()));
        assert_eq!(property.location.address, None);
    }

    #[test]
    fn first_uploaded_image_is_primary() {
        let urls = vec!["x".to_string(), "y".to_string()];
        let rows = image_rows("42", &urls);
        assert!(rows[0].is_primary);
        assert!(!rows[1].is_primary);
        assert!(rows.iter().all(|row| row.property_id == "42"));
    }
}
