use crate::currency::Currency;
use crate::models::{PropertyStatus, PropertyType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use url::Url;

/// Query parameters owned by the search filters
pub const FILTER_PARAMS: [&str; 9] = [
    "q",
    "type",
    "status",
    "currency",
    "page",
    "min_price",
    "max_price",
    "beds",
    "sort",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Newest, SortOrder::PriceAsc, SortOrder::PriceDesc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest first",
            SortOrder::PriceAsc => "Price: low to high",
            SortOrder::PriceDesc => "Price: high to low",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == needle)
            .ok_or_else(|| format!("unknown sort order '{}'", s))
    }
}

/// Search filters as selected on the search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free-text location (city, region, street or title words)
    pub location: Option<String>,
    pub types: Vec<PropertyType>,
    pub status: Option<PropertyStatus>,
    /// Display currency; price bounds are expressed in it
    pub currency: Currency,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub sort: SortOrder,
    /// 1-based
    pub page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            location: None,
            types: Vec::new(),
            status: None,
            currency: Currency::default(),
            min_price: None,
            max_price: None,
            min_bedrooms: None,
            sort: SortOrder::default(),
            page: 1,
        }
    }
}

impl SearchFilters {
    /// Decode filters from query pairs. Unknown keys and malformed values are
    /// skipped; a repeated key overwrites the earlier value except `type`,
    /// which accumulates.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut filters = SearchFilters::default();

        for (key, value) in pairs {
            let value = value.trim();
            match &*key {
                "q" => {
                    filters.location = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    };
                }
                "type" => {
                    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        match part.parse::<PropertyType>() {
                            Ok(kind) if !filters.types.contains(&kind) => filters.types.push(kind),
                            Ok(_) => {}
                            Err(e) => debug!("Ignoring type filter: {}", e),
                        }
                    }
                }
                "status" => filters.status = parse_or_skip(&key, value),
                "currency" => {
                    if let Some(currency) = parse_or_skip(&key, value) {
                        filters.currency = currency;
                    }
                }
                "page" => {
                    if let Some(page) = parse_or_skip::<u32>(&key, value).filter(|p| *p > 0) {
                        filters.page = page;
                    }
                }
                "min_price" => filters.min_price = parse_price(&key, value),
                "max_price" => filters.max_price = parse_price(&key, value),
                "beds" => filters.min_bedrooms = parse_or_skip(&key, value),
                "sort" => {
                    if let Some(sort) = parse_or_skip(&key, value) {
                        filters.sort = sort;
                    }
                }
                _ => {}
            }
        }

        filters
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query_pairs(url.query_pairs())
    }

    /// Encode as query pairs; defaults are left out so the URL stays short.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(location) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            pairs.push(("q", location.to_string()));
        }
        if !self.types.is_empty() {
            let joined = self
                .types
                .iter()
                .map(PropertyType::as_str)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("type", joined));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if self.currency != Currency::default() {
            pairs.push(("currency", self.currency.code().to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(beds) = self.min_bedrooms {
            pairs.push(("beds", beds.to_string()));
        }
        if self.sort != SortOrder::default() {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }

        pairs
    }

    /// Write the filters into `url`, replacing the filter parameters and
    /// keeping any other query parameters in their original order.
    pub fn apply_to_url(&self, url: &mut Url) {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !FILTER_PARAMS.contains(&&**key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        let ours = self.to_query_pairs();

        if kept.is_empty() && ours.is_empty() {
            url.set_query(None);
            return;
        }

        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &kept {
            query.append_pair(key, value);
        }
        for (key, value) in &ours {
            query.append_pair(key, value);
        }
    }

    /// True when nothing narrows the result set
    pub fn is_unfiltered(&self) -> bool {
        self.location.is_none()
            && self.types.is_empty()
            && self.status.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_bedrooms.is_none()
    }
}

fn parse_or_skip<T>(key: &str, value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if value.is_empty() {
        return None;
    }
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Ignoring {}={}: {}", key, value, e);
            None
        }
    }
}

fn parse_price(key: &str, value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| *c != ',' && *c != '_').collect();
    parse_or_skip::<f64>(key, &cleaned).filter(|p| p.is_finite() && *p >= 0.0)
}
