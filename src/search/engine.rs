use crate::currency::RateTable;
use crate::models::Property;
use crate::search::filters::{SearchFilters, SortOrder};
use std::cmp::Ordering;
use tracing::debug;

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchPage<'a> {
    pub items: Vec<&'a Property>,
    /// Matches across all pages
    pub total: usize,
    pub page: u32,
    pub pages: u32,
}

impl SearchPage<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// Filter, sort and paginate `properties`. Price bounds are compared in the
/// filters' display currency. A page past the end is clamped to the last page.
pub fn run_search<'a>(
    filters: &SearchFilters,
    properties: &'a [Property],
    rates: &RateTable,
    page_size: usize,
) -> SearchPage<'a> {
    let page_size = page_size.max(1);
    let needle = filters
        .location
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty());

    let mut matches: Vec<&Property> = properties
        .iter()
        .filter(|p| matches_filters(p, filters, needle.as_deref(), rates))
        .collect();

    match filters.sort {
        SortOrder::Newest => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::PriceAsc | SortOrder::PriceDesc => {
            matches.sort_by(|a, b| {
                let left = display_price(a, filters, rates);
                let right = display_price(b, filters, rates);
                let order = left.partial_cmp(&right).unwrap_or(Ordering::Equal);
                if filters.sort == SortOrder::PriceDesc {
                    order.reverse()
                } else {
                    order
                }
            });
        }
    }

    let total = matches.len();
    let pages = total.div_ceil(page_size).max(1) as u32;
    let page = filters.page.clamp(1, pages);
    let start = (page as usize - 1) * page_size;

    debug!(
        "Search matched {} of {} listings, page {}/{}",
        total,
        properties.len(),
        page,
        pages
    );

    SearchPage {
        items: matches.into_iter().skip(start).take(page_size).collect(),
        total,
        page,
        pages,
    }
}

fn display_price(property: &Property, filters: &SearchFilters, rates: &RateTable) -> f64 {
    rates.convert(property.price, property.currency, filters.currency)
}

fn matches_filters(
    property: &Property,
    filters: &SearchFilters,
    needle: Option<&str>,
    rates: &RateTable,
) -> bool {
    if let Some(needle) = needle {
        let location = &property.location;
        let haystacks = [
            property.title.as_str(),
            location.address.as_str(),
            location.city.as_str(),
            location.region.as_str(),
            location.country.as_str(),
        ];
        if !haystacks.iter().any(|h| h.to_lowercase().contains(needle)) {
            return false;
        }
    }

    if !filters.types.is_empty() && !filters.types.contains(&property.property_type) {
        return false;
    }

    if let Some(status) = filters.status {
        if property.status != status {
            return false;
        }
    }

    if filters.min_price.is_some() || filters.max_price.is_some() {
        let price = display_price(property, filters, rates);
        if filters.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if filters.max_price.is_some_and(|max| price > max) {
            return false;
        }
    }

    if let Some(beds) = filters.min_bedrooms {
        if property.specifications.bedrooms.unwrap_or(0) < beds {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::models::{
        Location, PropertyStatus, PropertyType, Seller, Specifications, Tier, Verification,
    };
    use chrono::{TimeZone, Utc};

    fn listing(id: &str, city: &str, kind: PropertyType, price: f64, day: u32) -> Property {
        Property {
            id: id.to_string(),
            title: format!("{} in {}", kind.label(), city),
            description: String::new(),
            price,
            currency: Currency::Ghs,
            status: PropertyStatus::ForSale,
            property_type: kind,
            location: Location {
                city: city.to_string(),
                country: "Ghana".to_string(),
                ..Default::default()
            },
            specifications: Specifications {
                bedrooms: Some(3),
                ..Default::default()
            },
            images: vec![],
            seller: Seller::default(),
            verification: Verification::default(),
            tier: Tier::Normal,
            features: vec![],
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(),
            expires_at: None,
        }
    }

    fn sample() -> Vec<Property> {
        vec![
            listing("a", "Accra", PropertyType::House, 850_000.0, 1),
            listing("b", "Tema", PropertyType::Apartment, 400_000.0, 2),
            listing("c", "Kumasi", PropertyType::Land, 120_000.0, 3),
            listing("d", "Accra", PropertyType::Apartment, 1_500_000.0, 4),
        ]
    }

    fn ids(page: &SearchPage<'_>) -> Vec<String> {
        page.items.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn unfiltered_search_returns_newest_first() {
        let properties = sample();
        let page = run_search(&SearchFilters::default(), &properties, &RateTable::defaults(), 10);
        assert_eq!(ids(&page), vec!["d", "c", "b", "a"]);
        assert_eq!(page.total, 4);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn location_matches_case_insensitively() {
        let properties = sample();
        let filters = SearchFilters {
            location: Some("  accra ".to_string()),
            ..Default::default()
        };
        let page = run_search(&filters, &properties, &RateTable::defaults(), 10);
        assert_eq!(ids(&page), vec!["d", "a"]);
    }

    #[test]
    fn price_bounds_use_display_currency() {
        let properties = sample();
        let rates = RateTable::new().with_rate(Currency::Usd, 0.1);
        let filters = SearchFilters {
            currency: Currency::Usd,
            min_price: Some(30_000.0),
            max_price: Some(100_000.0),
            sort: SortOrder::PriceAsc,
            ..Default::default()
        };
        let page = run_search(&filters, &properties, &rates, 10);
        assert_eq!(ids(&page), vec!["b", "a"]);
    }

    #[test]
    fn type_and_bedroom_filters_combine() {
        let mut properties = sample();
        properties[3].specifications.bedrooms = Some(1);
        let filters = SearchFilters {
            types: vec![PropertyType::Apartment],
            min_bedrooms: Some(2),
            ..Default::default()
        };
        let page = run_search(&filters, &properties, &RateTable::defaults(), 10);
        assert_eq!(ids(&page), vec!["b"]);
    }

    #[test]
    fn pages_are_clamped() {
        let properties = sample();
        let filters = SearchFilters {
            sort: SortOrder::PriceDesc,
            page: 9,
            ..Default::default()
        };
        let page = run_search(&filters, &properties, &RateTable::defaults(), 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(ids(&page), vec!["c"]);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let filters = SearchFilters {
            status: Some(PropertyStatus::Sold),
            ..Default::default()
        };
        let page = run_search(&filters, &[], &RateTable::defaults(), 10);
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 1);
        assert_eq!(page.page, 1);
    }
}
