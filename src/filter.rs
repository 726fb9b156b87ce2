use crate::models::{DwellingKind, ListingType, Property};

/// Inclusive price bounds; a missing side is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// "Any", or at least this many
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MinCount {
    #[default]
    Any,
    AtLeast(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    Any,
    Only(DwellingKind),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(ListingType),
}

/// User-chosen constraints narrowing a listing set.
///
/// The default value has every field at its "any" sentinel and matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub price: PriceRange,
    pub kind: KindFilter,
    pub bedrooms: MinCount,
    pub bathrooms: MinCount,
    pub location: String,
    pub status: StatusFilter,
}

impl FilterSpec {
    /// True when no predicate would remove anything
    pub fn is_empty(&self) -> bool {
        self.price.is_unbounded()
            && self.kind == KindFilter::Any
            && self.bedrooms == MinCount::Any
            && self.bathrooms == MinCount::Any
            && self.location.trim().is_empty()
            && self.status == StatusFilter::Any
    }
}

/// Narrow `records` to those matching every active predicate in `spec`.
///
/// Each active predicate is one pass over the survivors of the previous
/// one. The relative order of the input is preserved.
pub fn apply(mut records: Vec<Property>, spec: &FilterSpec) -> Vec<Property> {
    if !spec.price.is_unbounded() {
        records.retain(|p| spec.price.contains(p.price));
    }

    if let KindFilter::Only(kind) = spec.kind {
        records.retain(|p| p.kind == Some(kind));
    }

    if let StatusFilter::Only(listing_type) = spec.status {
        records.retain(|p| p.listing_type == listing_type);
    }

    let needle = spec.location.trim().to_lowercase();
    if !needle.is_empty() {
        records.retain(|p| location_matches(p, &needle));
    }

    if let MinCount::AtLeast(min) = spec.bedrooms {
        records.retain(|p| p.bedrooms >= min);
    }

    if let MinCount::AtLeast(min) = spec.bathrooms {
        records.retain(|p| p.bathrooms >= min as f32);
    }

    records
}

/// `needle` must already be lowercase
fn location_matches(property: &Property, needle: &str) -> bool {
    let location = &property.location;
    [
        Some(location.city.as_str()),
        Some(location.state.as_str()),
        location.zip.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
