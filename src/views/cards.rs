use crate::models::{Category, ListingType, Property};
use crate::views::{format_number, format_price, html_escape};

pub const EMPTY_CATEGORY_MESSAGE: &str = "No properties available in this category.";

fn type_badge(listing_type: ListingType) -> &'static str {
    match listing_type {
        ListingType::Sale => r#"<span class="badge badge-sale">For Sale</span>"#,
        ListingType::Rent => r#"<span class="badge badge-rent">For Rent</span>"#,
    }
}

/// Summary card linking to the detail page
pub fn property_card(property: &Property) -> String {
    let mut badges = String::from(type_badge(property.listing_type));
    match property.category {
        Category::New => badges.push_str(r#"<span class="badge badge-new">New</span>"#),
        Category::Sold => badges.push_str(r#"<div class="sold-overlay">Sold</div>"#),
        _ => {}
    }

    format!(
        r#"<a class="property-card" href="/listings/{id}">
    <div class="card-image">
        <img src="{image}" alt="{title}">
        {badges}
    </div>
    <div class="card-body">
        <h3 class="card-title">{title}</h3>
        <p class="card-location">{city}, {state}</p>
        <p class="card-price">{price}</p>
        <p class="card-stats"><span>{beds} bd</span> &bull; <span>{baths} ba</span> &bull; <span>{sqft} sqft</span></p>
    </div>
</a>"#,
        id = html_escape(&property.id),
        image = html_escape(property.primary_image()),
        title = html_escape(&property.title),
        badges = badges,
        city = html_escape(&property.location.city),
        state = html_escape(&property.location.state),
        price = format_price(property.price, property.price_unit),
        beds = property.bedrooms,
        baths = property.bathrooms,
        sqft = format_number(i64::from(property.square_feet)),
    )
}

/// A grid of cards, or `empty_message` when there are none
pub fn property_grid(properties: &[Property], empty_message: &str) -> String {
    if properties.is_empty() {
        return format!(
            r#"<div class="empty-state"><p>{}</p></div>"#,
            html_escape(empty_message)
        );
    }
    let cards: Vec<String> = properties.iter().map(property_card).collect();
    format!(
        "<div class=\"property-grid\">\n{}\n</div>",
        cards.join("\n")
    )
}

/// Titled section of the home page with a "View All" link
pub fn category_section(title: &str, properties: &[Property], view_all: Option<&str>) -> String {
    let link = view_all
        .map(|href| format!(r#"<a class="view-all" href="{}">View All</a>"#, html_escape(href)))
        .unwrap_or_default();

    format!(
        r#"<section class="category-section">
    <div class="section-header">
        <h2>{}</h2>
        {}
    </div>
    {}
</section>"#,
        html_escape(title),
        link,
        property_grid(properties, EMPTY_CATEGORY_MESSAGE)
    )
}
