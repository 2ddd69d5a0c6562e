//! Property cards in grid and list layouts, rendered as HTML fragments.

pub mod contact;
pub mod page;

use crate::currency::{format_price, Currency, RateTable};
use crate::models::{Property, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub use contact::{contact, ContactAction, ContactOutcome};
pub use page::render_search_page;

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/property-placeholder.jpg";

const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardLayout {
    #[default]
    Grid,
    List,
}

/// Display settings shared by every card on a page
#[derive(Debug, Clone)]
pub struct CardContext<'a> {
    pub currency: Currency,
    pub rates: &'a RateTable,
    pub alternates: &'a [Currency],
    pub placeholder_image: &'a str,
    pub now: DateTime<Utc>,
}

impl<'a> CardContext<'a> {
    pub fn new(currency: Currency, rates: &'a RateTable, alternates: &'a [Currency]) -> Self {
        Self {
            currency,
            rates,
            alternates,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE,
            now: Utc::now(),
        }
    }
}

/// Image shown on the card: the first non-blank image or the placeholder
pub fn card_image<'p>(property: &'p Property, placeholder: &'p str) -> &'p str {
    property.cover_image().unwrap_or(placeholder)
}

pub fn render_card(property: &Property, layout: CardLayout, ctx: &CardContext<'_>) -> String {
    match layout {
        CardLayout::Grid => render_grid_card(property, ctx),
        CardLayout::List => render_list_row(property, ctx),
    }
}

fn render_grid_card(property: &Property, ctx: &CardContext<'_>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<article class="property-card property-card--grid{premium}" data-property-id="{id}">"#,
        premium = premium_class(property),
        id = html_escape(&property.id),
    );
    html.push_str(&image_link(property, ctx, "property-card__image"));
    html.push_str(&badges(property));
    html.push_str(&title(property));
    html.push_str(&location(property));
    html.push_str(&price_block(property, ctx));
    html.push_str(&specs(property));
    html.push_str(&seller_line(property));
    html.push_str(&expiry_note(property, ctx.now));
    html.push_str(&actions(property));
    html.push_str("</article>");
    html
}

fn render_list_row(property: &Property, ctx: &CardContext<'_>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<article class="property-row{premium}" data-property-id="{id}">"#,
        premium = premium_class(property),
        id = html_escape(&property.id),
    );
    html.push_str(&image_link(property, ctx, "property-row__image"));
    html.push_str(r#"<div class="property-row__body">"#);
    html.push_str(&badges(property));
    html.push_str(&title(property));
    html.push_str(&location(property));
    let excerpt = excerpt(&property.description, EXCERPT_CHARS);
    if !excerpt.is_empty() {
        let _ = write!(
            html,
            r#"<p class="property-row__excerpt">{}</p>"#,
            html_escape(&excerpt)
        );
    }
    html.push_str(&specs(property));
    if !property.features.is_empty() {
        html.push_str(r#"<ul class="property-row__features">"#);
        for feature in &property.features {
            let _ = write!(html, "<li>{}</li>", html_escape(feature));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");
    html.push_str(r#"<div class="property-row__aside">"#);
    html.push_str(&price_block(property, ctx));
    html.push_str(&seller_line(property));
    html.push_str(&expiry_note(property, ctx.now));
    html.push_str(&actions(property));
    html.push_str("</div></article>");
    html
}

fn premium_class(property: &Property) -> &'static str {
    match property.tier {
        Tier::Premium => " is-premium",
        Tier::Normal => "",
    }
}

fn detail_href(property: &Property) -> String {
    format!("/properties/{}", html_escape(&property.id))
}

fn image_link(property: &Property, ctx: &CardContext<'_>, class: &str) -> String {
    format!(
        r#"<a class="{class}" href="{href}"><img src="{src}" alt="{alt}" loading="lazy"></a>"#,
        class = class,
        href = detail_href(property),
        src = html_escape(card_image(property, ctx.placeholder_image)),
        alt = html_escape(&property.title),
    )
}

fn badges(property: &Property) -> String {
    let mut html = String::from(r#"<div class="badges">"#);
    let _ = write!(
        html,
        r#"<span class="badge badge--status badge--{}">{}</span><span class="badge badge--type">{}</span>"#,
        property.status.as_str(),
        property.status.label(),
        property.property_type.label(),
    );
    if property.tier == Tier::Premium {
        html.push_str(r#"<span class="badge badge--premium">Premium</span>"#);
    }
    html.push_str("</div>");
    html
}

fn title(property: &Property) -> String {
    format!(
        r#"<h3 class="card-title"><a href="{}">{}</a></h3>"#,
        detail_href(property),
        html_escape(&property.title)
    )
}

fn location(property: &Property) -> String {
    let label = property.location.short_label();
    if label.is_empty() {
        return String::new();
    }
    format!(r#"<p class="card-location">{}</p>"#, html_escape(&label))
}

fn price_block(property: &Property, ctx: &CardContext<'_>) -> String {
    let price = format_price(
        property.price,
        property.currency,
        ctx.currency,
        ctx.rates,
        ctx.alternates,
    );

    let mut html = String::from(r#"<div class="price">"#);
    let _ = write!(
        html,
        r#"<p class="price__primary">{}"#,
        html_escape(&price.primary)
    );
    if let Some(suffix) = property.status.price_suffix() {
        let _ = write!(html, r#"<span class="price__period">{}</span>"#, suffix);
    }
    html.push_str("</p>");
    if !price.alternates.is_empty() {
        html.push_str(r#"<ul class="price__alternates">"#);
        for alternate in &price.alternates {
            let _ = write!(html, "<li>≈ {}</li>", html_escape(alternate));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");
    html
}

fn specs(property: &Property) -> String {
    let spec = &property.specifications;
    let mut items = Vec::new();
    if let Some(beds) = spec.bedrooms {
        items.push(plural(beds, "bed", "beds"));
    }
    if let Some(baths) = spec.bathrooms {
        items.push(plural(baths, "bath", "baths"));
    }
    if let Some(size) = spec.size.filter(|s| s.is_finite() && *s > 0.0) {
        items.push(format!("{} {}", format_size(size), spec.size_unit.label()));
    }
    if items.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<ul class="card-specs">"#);
    for item in items {
        let _ = write!(html, "<li>{}</li>", item);
    }
    html.push_str("</ul>");
    html
}

fn seller_line(property: &Property) -> String {
    let seller = &property.seller;
    if seller.name.trim().is_empty() {
        return String::new();
    }
    let badge = if seller.verified {
        r#" <span class="badge badge--verified">Verified</span>"#
    } else {
        ""
    };
    format!(
        r#"<p class="card-seller">{}{}</p>"#,
        html_escape(seller.name.trim()),
        badge
    )
}

/// Display-only note derived from `expiresAt`
pub fn expiry_label(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if expires_at <= now {
        return "Listing expired".to_string();
    }
    match (expires_at - now).num_days() {
        0 => "Expires today".to_string(),
        1 => "Expires in 1 day".to_string(),
        days => format!("Expires in {} days", days),
    }
}

fn expiry_note(property: &Property, now: DateTime<Utc>) -> String {
    match property.expires_at {
        Some(expires_at) => format!(
            r#"<p class="card-expiry">{}</p>"#,
            expiry_label(expires_at, now)
        ),
        None => String::new(),
    }
}

fn actions(property: &Property) -> String {
    let mut html = String::from(r#"<div class="card-actions">"#);
    for action in [ContactAction::Call, ContactAction::WhatsApp] {
        html.push_str(&contact_control(property, action));
    }
    html.push_str("</div>");
    html
}

fn contact_control(property: &Property, action: ContactAction) -> String {
    match contact(&property.seller, action, &property.title) {
        ContactOutcome::Open(link) => {
            let target = match action {
                ContactAction::WhatsApp => r#" target="_blank" rel="noopener noreferrer""#,
                ContactAction::Call => "",
            };
            format!(
                r#"<a class="contact contact--{}" href="{}"{}>{}</a>"#,
                action.css_modifier(),
                html_escape(&link),
                target,
                action.label()
            )
        }
        ContactOutcome::Warning(message) => format!(
            r#"<button type="button" class="contact contact--{}" data-warning="{}" aria-disabled="true">{}</button>"#,
            action.css_modifier(),
            html_escape(&message),
            action.label()
        ),
    }
}

fn plural(count: u32, one: &str, many: &str) -> String {
    if count == 1 {
        format!("1 {}", one)
    } else {
        format!("{} {}", count, many)
    }
}

fn format_size(size: f64) -> String {
    if size.fract() == 0.0 {
        format!("{}", size as u64)
    } else {
        let formatted = format!("{:.1}", size);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) => &cut[..pos],
        None => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn expiry_labels() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(expiry_label(now - Duration::hours(1), now), "Listing expired");
        assert_eq!(expiry_label(now + Duration::hours(5), now), "Expires today");
        assert_eq!(expiry_label(now + Duration::days(1), now), "Expires in 1 day");
        assert_eq!(expiry_label(now + Duration::days(10), now), "Expires in 10 days");
    }

    #[test]
    fn sizes_drop_trailing_zeroes() {
        assert_eq!(format_size(250.0), "250");
        assert_eq!(format_size(0.5), "0.5");
        assert_eq!(format_size(1.04), "1");
    }

    #[test]
    fn excerpt_cuts_on_word_boundary() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("a quiet gated estate", 12), "a quiet…");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<b>"Tom's" & co</b>"#),
            "&lt;b&gt;&quot;Tom&#x27;s&quot; &amp; co&lt;/b&gt;"
        );
    }
}
