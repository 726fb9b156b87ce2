use crate::forms::{FilterForm, ListingForm, SignupForm};
use crate::models::{DwellingKind, ListingType, Property};
use crate::repository::MAX_IMAGES;
use crate::session::SessionContext;
use crate::views::cards::{category_section, property_grid};
use crate::views::{format_date, format_number, format_price, html_escape, layout};

fn alert(error: Option<&str>) -> String {
    error
        .map(|message| {
            format!(
                r#"<div class="alert alert-error" role="alert">{}</div>"#,
                html_escape(message)
            )
        })
        .unwrap_or_default()
}

/// `<option>` list with `current` pre-selected
fn options(choices: &[(&str, &str)], current: &str) -> String {
    choices
        .iter()
        .map(|(value, label)| {
            let selected = if *value == current { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                value,
                selected,
                html_escape(label)
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn value_of(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

pub fn home(
    session: &SessionContext,
    new: &[Property],
    popular: &[Property],
    sold: &[Property],
) -> String {
    let call_to_action = if session.is_authenticated() {
        r#"<a class="button" href="/sell">List Your Property</a>"#
    } else {
        r#"<a class="button" href="/login">Login to List Property</a>"#
    };

    let content = format!(
        r#"<section class="hero">
    <h1>Find Your Dream Home</h1>
    <p>Explore our curated selection of properties for sale and rent in top locations</p>
    <form method="get" action="/listings" class="search">
        <input type="text" name="location" placeholder="City, state, ZIP code...">
        <button type="submit">Search</button>
    </form>
</section>
{}
{}
{}
<section class="cta">
    <h2>Ready to sell or rent your property?</h2>
    <p>List your property with us and reach thousands of potential buyers</p>
    {}
</section>"#,
        category_section("New Listings", new, Some("/listings?category=new")),
        category_section("Popular Properties", popular, Some("/listings?category=popular")),
        category_section("Sold Properties", sold, Some("/listings?category=sold")),
        call_to_action
    );

    layout("Home", session, "/", &content)
}

fn filter_sidebar(form: &FilterForm) -> String {
    let category = form
        .category
        .as_deref()
        .map(|c| {
            format!(
                r#"<input type="hidden" name="category" value="{}">"#,
                html_escape(c)
            )
        })
        .unwrap_or_default();

    let mut kinds = vec![("all", "All Types")];
    kinds.extend(DwellingKind::ALL.iter().map(|k| (k.as_str(), k.label())));

    let select_counts = |field: &Option<String>, max: u32| -> String {
        let pairs: Vec<(String, String)> =
            std::iter::once(("any".to_string(), "Any".to_string()))
                .chain((1..=max).map(|n| (n.to_string(), format!("{}+", n))))
                .collect();
        let borrowed: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(v, l)| (v.as_str(), l.as_str()))
            .collect();
        let current = match value_of(field) {
            "" => "any",
            value => value,
        };
        options(&borrowed, current)
    };

    format!(
        r#"<aside class="filter-sidebar">
    <h2>Filters</h2>
    <form method="get" action="/listings">
        {category}
        <label for="min_price">Min Price</label>
        <input id="min_price" name="min_price" type="number" min="0" value="{min_price}">
        <label for="max_price">Max Price</label>
        <input id="max_price" name="max_price" type="number" min="0" value="{max_price}">
        <label for="property_type">Property Type</label>
        <select id="property_type" name="property_type">{kinds}</select>
        <label for="status">Status</label>
        <select id="status" name="status">{status}</select>
        <label for="location">Location</label>
        <input id="location" name="location" placeholder="City, State or ZIP" value="{location}">
        <label for="bedrooms">Bedrooms</label>
        <select id="bedrooms" name="bedrooms">{bedrooms}</select>
        <label for="bathrooms">Bathrooms</label>
        <select id="bathrooms" name="bathrooms">{bathrooms}</select>
        <a class="button-outline" href="/listings">Reset</a>
        <button type="submit">Apply Filters</button>
    </form>
</aside>"#,
        category = category,
        min_price = html_escape(value_of(&form.min_price)),
        max_price = html_escape(value_of(&form.max_price)),
        kinds = options(&kinds, value_of(&form.property_type)),
        status = options(
            &[("all", "All"), ("sale", "For Sale"), ("rent", "For Rent")],
            value_of(&form.status)
        ),
        location = html_escape(value_of(&form.location)),
        bedrooms = select_counts(&form.bedrooms, 5),
        bathrooms = select_counts(&form.bathrooms, 4),
    )
}

pub fn listings(
    session: &SessionContext,
    heading: &str,
    form: &FilterForm,
    properties: &[Property],
    error: Option<&str>,
) -> String {
    let results = if properties.is_empty() {
        r#"<div class="empty-state">
    <p class="empty-title">No properties found</p>
    <p>Try adjusting your filters</p>
</div>"#
            .to_string()
    } else {
        property_grid(properties, "")
    };

    let content = format!(
        r#"<div class="listings-layout">
{}
<div class="listings-main">
    <h1>{}</h1>
    {}
    <p class="result-count">Showing {} properties</p>
    {}
</div>
</div>"#,
        filter_sidebar(form),
        html_escape(heading),
        alert(error),
        properties.len(),
        results
    );

    layout(heading, session, "/listings", &content)
}

pub fn property_detail(session: &SessionContext, property: &Property) -> String {
    let images: Vec<String> = property
        .images
        .iter()
        .enumerate()
        .map(|(i, url)| {
            format!(
                r#"<img src="{}" alt="{} image {}">"#,
                html_escape(url),
                html_escape(&property.title),
                i + 1
            )
        })
        .collect();

    let features: Vec<String> = property
        .features
        .iter()
        .map(|f| format!("<li>{}</li>", html_escape(f)))
        .collect();

    let location = &property.location;
    let street = location.address.as_deref().unwrap_or("");
    let state_zip = format!(
        "{} {}",
        location.state,
        location.zip.as_deref().unwrap_or("")
    );
    let parts: [&str; 3] = [street, &location.city, &state_zip];
    let full_address = parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let views = property
        .views
        .map(|v| format!(r#"<p class="views">{} views</p>"#, format_number(v)))
        .unwrap_or_default();

    let kind = property
        .kind
        .map(|k| format!(r#"<span class="kind">{}</span>"#, k.label()))
        .unwrap_or_default();

    let status = match property.listing_type {
        ListingType::Sale => "For Sale",
        ListingType::Rent => "For Rent",
    };

    let content = format!(
        r#"<article class="property-detail">
    <a href="/listings">&larr; Back to listings</a>
    <div class="gallery">{images}</div>
    <header>
        <h1>{title}</h1>
        <p class="address">{address}</p>
        <p class="price">{price}</p>
        <span class="badge">{status}</span>
        {kind}
    </header>
    <section class="overview">
        <h2>Overview</h2>
        <ul>
            <li class="beds">{beds} Bedrooms</li>
            <li class="baths">{baths} Bathrooms</li>
            <li class="sqft">{sqft} Sq Ft</li>
            <li class="listed">Listed {listed}</li>
        </ul>
        {views}
    </section>
    <section class="description">
        <h2>Description</h2>
        <p>{description}</p>
    </section>
    <section class="features">
        <h2>Features</h2>
        <ul>{features}</ul>
    </section>
    <section class="location">
        <h2>Location</h2>
        <p>{address}</p>
    </section>
    <aside class="contact">
        <h2>Interested in this property?</h2>
        <p>Fill out the form below and our agent will get in touch with you shortly.</p>
        <form>
            <label for="name">Your Name</label>
            <input type="text" id="name">
            <label for="email">Email Address</label>
            <input type="email" id="email">
            <label for="phone">Phone Number</label>
            <input type="tel" id="phone">
            <label for="message">Message</label>
            <textarea id="message" rows="4">Hi, I'm interested in {title} at {address}.</textarea>
            <button type="button">Send Message</button>
        </form>
    </aside>
</article>"#,
        images = images.join(""),
        title = html_escape(&property.title),
        address = html_escape(&full_address),
        price = format_price(property.price, property.price_unit),
        status = status,
        kind = kind,
        beds = property.bedrooms,
        baths = property.bathrooms,
        sqft = format_number(i64::from(property.square_feet)),
        listed = format_date(&property.created_at),
        views = views,
        description = html_escape(&property.description),
        features = features.join(""),
    );

    layout(&property.title, session, "/listings", &content)
}

pub fn property_not_found(session: &SessionContext) -> String {
    let content = r#"<div class="not-found">
    <h2>Property Not Found</h2>
    <p>The property you are looking for doesn't exist or has been removed.</p>
    <a class="button" href="/listings">View All Properties</a>
</div>"#;
    layout("Property Not Found", session, "/listings", content)
}

pub fn login(session: &SessionContext, email: &str, error: Option<&str>) -> String {
    let content = format!(
        r#"<div class="auth-card">
    <h1>Welcome back</h1>
    <p>Sign in to your account to access your properties</p>
    {}
    <form method="post" action="/login">
        <label for="email">Email address</label>
        <input id="email" name="email" type="email" autocomplete="email" required value="{}">
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="current-password" required>
        <button type="submit">Sign in</button>
    </form>
    <p>Don't have an account? <a href="/signup">Sign up</a></p>
</div>"#,
        alert(error),
        html_escape(email)
    );
    layout("Log in", session, "/login", &content)
}

pub fn signup(session: &SessionContext, form: &SignupForm, error: Option<&str>) -> String {
    let content = format!(
        r#"<div class="auth-card">
    <h1>Create an account</h1>
    <p>Sign up to list your property or save your favorite listings</p>
    {}
    <form method="post" action="/signup">
        <label for="full_name">Full Name</label>
        <input id="full_name" name="full_name" type="text" autocomplete="name" required value="{}">
        <label for="email">Email address</label>
        <input id="email" name="email" type="email" autocomplete="email" required value="{}">
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="new-password" required>
        <label for="confirm_password">Confirm Password</label>
        <input id="confirm_password" name="confirm_password" type="password" autocomplete="new-password" required>
        <label><input type="checkbox" name="terms"{}> I agree to the terms and conditions</label>
        <button type="submit">Create Account</button>
    </form>
    <p>Already have an account? <a href="/login">Log in</a></p>
</div>"#,
        alert(error),
        html_escape(&form.full_name),
        html_escape(&form.email),
        if form.terms.is_some() { " checked" } else { "" }
    );
    layout("Sign up", session, "/signup", &content)
}

/// Shown after sign-up when the provider wants the address confirmed first
pub fn confirm_email(session: &SessionContext, email: &str) -> String {
    let content = format!(
        r#"<div class="auth-card">
    <h1>Check your inbox</h1>
    <p>We sent a confirmation link to {}. Follow it, then <a href="/login">log in</a>.</p>
</div>"#,
        html_escape(email)
    );
    layout("Confirm your email", session, "/signup", &content)
}

pub fn sell(session: &SessionContext, form: &ListingForm, error: Option<&str>) -> String {
    let input = |name: &str, label: &str, value: &str, kind: &str| {
        format!(
            r#"<label for="{name}">{label}</label>
        <input id="{name}" name="{name}" type="{kind}" value="{value}">"#,
            name = name,
            label = label,
            kind = kind,
            value = html_escape(value)
        )
    };

    let mut kinds = vec![("", "Not specified")];
    kinds.extend(DwellingKind::ALL.iter().map(|k| (k.as_str(), k.label())));

    let content = format!(
        r#"<div class="sell">
    <h1>List Your Property</h1>
    <p>Complete the form below to list your property for sale or rent</p>
    {error}
    <form method="post" action="/sell" enctype="multipart/form-data">
        {title}
        {price}
        <label for="listing_type">Listing Type*</label>
        <select id="listing_type" name="listing_type">{listing_types}</select>
        <label for="category">Category*</label>
        <select id="category" name="category">{categories}</select>
        <label for="property_type">Property Type</label>
        <select id="property_type" name="property_type">{kinds}</select>
        {bedrooms}
        {bathrooms}
        {square_feet}
        {address}
        {city}
        {state}
        {zip}
        <label for="description">Description</label>
        <textarea id="description" name="description" rows="5">{description}</textarea>
        {features}
        <label for="images">Images (up to {max_images})</label>
        <input id="images" name="images" type="file" accept="image/*" multiple>
        <button type="submit">Submit Listing</button>
    </form>
</div>"#,
        error = alert(error),
        title = input("title", "Property Title*", &form.title, "text"),
        price = input("price", "Price*", &form.price, "number"),
        listing_types = options(
            &[("", "Select type"), ("sale", "For Sale"), ("rent", "For Rent")],
            &form.listing_type
        ),
        categories = options(
            &[
                ("", "Select category"),
                ("new", "New Listing"),
                ("popular", "Popular"),
                ("luxury", "Luxury"),
                ("affordable", "Affordable"),
            ],
            &form.category
        ),
        kinds = options(&kinds, &form.property_type),
        bedrooms = input("bedrooms", "Bedrooms*", &form.bedrooms, "number"),
        bathrooms = input("bathrooms", "Bathrooms*", &form.bathrooms, "number"),
        square_feet = input("square_feet", "Square Feet*", &form.square_feet, "number"),
        address = input("address", "Street Address", &form.address, "text"),
        city = input("city", "City*", &form.city, "text"),
        state = input("state", "State*", &form.state, "text"),
        zip = input("zip", "ZIP Code", &form.zip, "text"),
        description = html_escape(&form.description),
        features = input(
            "features",
            "Features (comma separated)",
            &form.features,
            "text"
        ),
        max_images = MAX_IMAGES,
    );

    layout("Sell", session, "/sell", &content)
}

pub fn sell_success(session: &SessionContext, property: &Property) -> String {
    let content = format!(
        r#"<div class="sell-success">
    <h1>Listing Created!</h1>
    <p>Your property has been listed.</p>
    <a class="button" href="/listings/{}">View Listing</a>
    <a class="button-outline" href="/listings">View Listings</a>
</div>"#,
        html_escape(&property.id)
    );
    layout("Listing Created", session, "/sell", &content)
}

/// Rendered by protected views while the session is still being checked
pub fn loading(session: &SessionContext) -> String {
    layout(
        "Loading",
        session,
        "",
        r#"<div class="loading" role="status">Loading...</div>"#,
    )
}

pub fn not_found(session: &SessionContext) -> String {
    let content = r#"<div class="not-found">
    <h1>404</h1>
    <p>Oops! Page not found</p>
    <a class="button" href="/">Return to Home</a>
</div>"#;
    layout("Page Not Found", session, "", content)
}
