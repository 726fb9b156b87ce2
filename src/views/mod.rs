//! Server-rendered HTML.
//!
//! Views are plain functions returning `String`. Every piece of user or
//! backend text goes through [`html_escape`].

pub mod cards;
pub mod pages;

use crate::models::PriceUnit;
use crate::session::{SessionContext, SessionState};
use chrono::{DateTime, Utc};

/// HTML-escape a string for text and attribute positions
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Whole number with thousands separators
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// USD without decimals, with `/mo` for monthly prices
pub fn format_price(price: f64, unit: PriceUnit) -> String {
    let amount = format_number(price.round() as i64);
    let amount = match amount.strip_prefix('-') {
        Some(positive) => format!("-${}", positive),
        None => format!("${}", amount),
    };
    match unit {
        PriceUnit::Total => amount,
        PriceUnit::Monthly => format!("{}/mo", amount),
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn nav_link(href: &str, label: &str, active: &str) -> String {
    let class = if href == active { " class=\"active\"" } else { "" };
    format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
}

fn navbar(session: &SessionContext, active: &str) -> String {
    let mut links = vec![
        nav_link("/", "Home", active),
        nav_link("/listings", "Listings", active),
    ];
    if session.is_authenticated() {
        links.push(nav_link("/sell", "Sell", active));
    }

    let account = match session.state() {
        SessionState::Checking => String::new(),
        SessionState::Authenticated(auth) => format!(
            r#"<span class="account">{}</span>
        <form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form>"#,
            html_escape(auth.user.email.as_deref().unwrap_or("Account"))
        ),
        SessionState::Unauthenticated => format!(
            "{}\n        {}",
            nav_link("/login", "Log in", active),
            nav_link("/signup", "Sign up", active)
        ),
    };

    format!(
        r#"<nav class="navbar">
    <a href="/" class="logo">RealEstate</a>
    <div class="nav-links">
        {}
    </div>
    <div class="nav-auth">
        {}
    </div>
</nav>"#,
        links.join("\n        "),
        account
    )
}

/// Wrap page content in the document shell and navigation bar
pub fn layout(title: &str, session: &SessionContext, active: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} | RealEstate</title>
</head>
<body>
{}
<main id="main">
{}
</main>
</body>
</html>"#,
        html_escape(title),
        navbar(session, active),
        content
    )
}
