use crate::error::Result;
use crate::models::Property;
use async_trait::async_trait;

/// Common trait for anything that can supply listings to the search page.
/// The hosted backend is the live source; a JSON export works offline.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<Property>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
