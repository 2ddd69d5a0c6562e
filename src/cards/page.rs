use crate::cards::{html_escape, render_card, CardContext, CardLayout};
use crate::currency::Currency;
use crate::models::{PropertyStatus, PropertyType};
use crate::search::{FilterState, SearchPage, SortOrder};
use std::fmt::Write;

/// Full search results document: filter form, result cards, pagination
pub fn render_search_page(
    results: &SearchPage<'_>,
    state: &FilterState,
    layout: CardLayout,
    ctx: &CardContext<'_>,
) -> String {
    let filters = state.filters();
    let heading = match filters.location.as_deref() {
        Some(location) => format!("Properties in {}", location),
        None => "Find your next property".to_string(),
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Home Market</title>
</head>
<body>
<header><h1>{title}</h1></header>
"#,
        title = html_escape(&heading),
    );

    html.push_str(&search_form(state));

    html.push_str("<main>\n");
    let _ = writeln!(
        html,
        r#"<h2 class="results__count">{}</h2>"#,
        match results.total {
            1 => "1 property found".to_string(),
            n => format!("{} properties found", n),
        }
    );

    if results.items.is_empty() {
        html.push_str(r#"<p class="results__empty">No properties match your search. Try widening the price range or clearing filters.</p>"#);
        html.push('\n');
    } else {
        let class = match layout {
            CardLayout::Grid => "results results--grid",
            CardLayout::List => "results results--list",
        };
        let _ = writeln!(html, r#"<div class="{}">"#, class);
        for property in &results.items {
            html.push_str(&render_card(property, layout, ctx));
            html.push('\n');
        }
        html.push_str("</div>\n");
    }

    html.push_str(&pagination(results, state));
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn search_form(state: &FilterState) -> String {
    let filters = state.filters();
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<form class="search-form" method="get" action="{}" role="search">"#,
        html_escape(state.url().path())
    );

    let _ = write!(
        html,
        r#"<label for="search-q">Location</label><input id="search-q" name="q" type="search" value="{}">"#,
        html_escape(filters.location.as_deref().unwrap_or(""))
    );

    html.push_str("<fieldset><legend>Property type</legend>");
    for kind in PropertyType::ALL {
        let checked = if filters.types.contains(&kind) { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<label><input type="checkbox" name="type" value="{}"{}> {}</label>"#,
            kind.as_str(),
            checked,
            kind.label()
        );
    }
    html.push_str("</fieldset>");

    let statuses = std::iter::once(("", "Any status", filters.status.is_none())).chain(
        PropertyStatus::ALL
            .into_iter()
            .map(|s| (s.as_str(), s.label(), filters.status == Some(s))),
    );
    html.push_str(&select("search-status", "status", "Status", statuses));

    let currencies = Currency::ALL
        .into_iter()
        .map(|c| (c.code(), c.code(), filters.currency == c));
    html.push_str(&select("search-currency", "currency", "Currency", currencies));

    let sorts = SortOrder::ALL
        .into_iter()
        .map(|s| (s.as_str(), s.label(), filters.sort == s));
    html.push_str(&select("search-sort", "sort", "Sort by", sorts));

    html.push_str(&number_input("search-min-price", "min_price", "Min price", filters.min_price));
    html.push_str(&number_input("search-max-price", "max_price", "Max price", filters.max_price));
    html.push_str(&number_input(
        "search-beds",
        "beds",
        "Min bedrooms",
        filters.min_bedrooms.map(f64::from),
    ));

    html.push_str(r#"<button type="submit">Search</button></form>"#);
    html.push('\n');
    html
}

fn select<'a>(
    id: &str,
    name: &str,
    label: &str,
    options: impl Iterator<Item = (&'a str, &'a str, bool)>,
) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<label for="{id}">{label}</label><select id="{id}" name="{name}">"#
    );
    for (value, text, selected) in options {
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            value,
            if selected { " selected" } else { "" },
            text
        );
    }
    html.push_str("</select>");
    html
}

fn number_input(id: &str, name: &str, label: &str, value: Option<f64>) -> String {
    let value = value.map(|v| v.to_string()).unwrap_or_default();
    format!(
        r#"<label for="{id}">{label}</label><input id="{id}" name="{name}" type="number" min="0" value="{value}">"#
    )
}

fn pagination(results: &SearchPage<'_>, state: &FilterState) -> String {
    if results.pages <= 1 {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="pagination" aria-label="Pagination">"#);
    if results.has_previous() {
        let _ = write!(
            html,
            r#"<a rel="prev" href="{}">Previous</a>"#,
            html_escape(&state.page_href(results.page - 1))
        );
    }
    let _ = write!(
        html,
        r#"<span class="pagination__current">Page {} of {}</span>"#,
        results.page, results.pages
    );
    if results.has_next() {
        let _ = write!(
            html,
            r#"<a rel="next" href="{}">Next</a>"#,
            html_escape(&state.page_href(results.page + 1))
        );
    }
    html.push_str("</nav>\n");
    html
}
