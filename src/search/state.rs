use crate::currency::Currency;
use crate::models::{PropertyStatus, PropertyType};
use crate::search::filters::{SearchFilters, SortOrder};
use tracing::debug;
use url::Url;

/// Origin used when the page URL is given as a bare path
const LOCAL_ORIGIN: &str = "http://localhost/";

/// Keeps the selected filters and the address-bar URL in step.
///
/// Every update rewrites the URL from the filters and pushes it onto the
/// history; navigation goes the other way and re-reads the filters from the
/// URL without pushing.
#[derive(Debug, Clone)]
pub struct FilterState {
    url: Url,
    filters: SearchFilters,
    history: Vec<Url>,
    relative: bool,
}

impl FilterState {
    /// Read the initial filters from the page URL. Accepts an absolute URL or
    /// a path such as `/search?q=Accra`.
    pub fn mount(location: &str) -> Result<Self, url::ParseError> {
        let (url, relative) = parse_location(location)?;
        let filters = SearchFilters::from_url(&url);
        debug!("Mounted search state from {}", url);

        Ok(Self {
            url,
            filters,
            history: Vec::new(),
            relative,
        })
    }

    /// Like [`mount`](Self::mount), but a URL that does not name a supported
    /// currency shows prices in `fallback`. The page number and history are
    /// left as mounted.
    pub fn mount_with_currency(location: &str, fallback: Currency) -> Result<Self, url::ParseError> {
        let mut state = Self::mount(location)?;
        let explicit = state
            .url
            .query_pairs()
            .any(|(key, value)| key == "currency" && value.parse::<Currency>().is_ok());
        if !explicit && state.filters.currency != fallback {
            state.filters.currency = fallback;
            state.filters.apply_to_url(&mut state.url);
        }
        Ok(state)
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Current location as it would appear in links on the page
    pub fn href(&self) -> String {
        if self.relative {
            self.path_and_query()
        } else {
            self.url.to_string()
        }
    }

    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// URLs pushed so far, oldest first
    pub fn history(&self) -> &[Url] {
        &self.history
    }

    /// Link to another results page under the current filters
    pub fn page_href(&self, page: u32) -> String {
        let mut filters = self.filters.clone();
        filters.page = page.max(1);
        let mut url = self.url.clone();
        filters.apply_to_url(&mut url);
        self.render(&url)
    }

    /// Apply `change` to the filters and push the resulting URL. Changes that
    /// leave the page number alone send the user back to page 1. Returns
    /// whether anything changed.
    pub fn update<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut SearchFilters),
    {
        let mut next = self.filters.clone();
        change(&mut next);

        if next == self.filters {
            return false;
        }
        if next.page == self.filters.page {
            next.page = 1;
        }

        let mut url = self.url.clone();
        next.apply_to_url(&mut url);
        if url != self.url {
            self.history.push(std::mem::replace(&mut self.url, url));
            debug!("Pushed search URL {}", self.url);
        }
        self.filters = next;
        true
    }

    pub fn set_location(&mut self, location: &str) -> bool {
        let trimmed = location.trim();
        self.update(|f| {
            f.location = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// Add the type when absent, remove it when present
    pub fn toggle_type(&mut self, kind: PropertyType) -> bool {
        self.update(|f| {
            if let Some(pos) = f.types.iter().position(|t| *t == kind) {
                f.types.remove(pos);
            } else {
                f.types.push(kind);
            }
        })
    }

    pub fn set_types(&mut self, types: Vec<PropertyType>) -> bool {
        self.update(|f| f.types = types)
    }

    pub fn set_status(&mut self, status: Option<PropertyStatus>) -> bool {
        self.update(|f| f.status = status)
    }

    pub fn set_currency(&mut self, currency: Currency) -> bool {
        self.update(|f| f.currency = currency)
    }

    /// Negative and non-finite bounds are dropped, the same as when read
    /// from the URL
    pub fn set_price_range(&mut self, min: Option<f64>, max: Option<f64>) -> bool {
        let usable = |bound: Option<f64>| bound.filter(|v| v.is_finite() && *v >= 0.0);
        self.update(|f| {
            f.min_price = usable(min);
            f.max_price = usable(max);
        })
    }

    pub fn set_min_bedrooms(&mut self, beds: Option<u32>) -> bool {
        self.update(|f| f.min_bedrooms = beds)
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> bool {
        self.update(|f| f.sort = sort)
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.filters.page {
            return false;
        }
        self.update(|f| f.page = page)
    }

    /// Reset every filter, keeping the display currency
    pub fn clear(&mut self) -> bool {
        self.update(|f| {
            *f = SearchFilters {
                currency: f.currency,
                ..SearchFilters::default()
            }
        })
    }

    /// Follow an externally changed URL (back/forward, pasted link) without
    /// pushing history.
    pub fn navigate(&mut self, location: &str) -> Result<(), url::ParseError> {
        let (url, relative) = parse_location(location)?;
        self.filters = SearchFilters::from_url(&url);
        self.url = url;
        self.relative = relative;
        Ok(())
    }

    /// Return to the previous URL and re-read the filters from it
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.filters = SearchFilters::from_url(&previous);
                self.url = previous;
                true
            }
            None => false,
        }
    }

    fn render(&self, url: &Url) -> String {
        if self.relative {
            match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            }
        } else {
            url.to_string()
        }
    }
}

fn parse_location(location: &str) -> Result<(Url, bool), url::ParseError> {
    match Url::parse(location) {
        Ok(url) => Ok((url, false)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(LOCAL_ORIGIN)?;
            Ok((base.join(location)?, true))
        }
        Err(e) => Err(e),
    }
}
