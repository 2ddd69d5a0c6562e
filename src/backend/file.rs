use crate::backend::traits::ListingSource;
use crate::error::Result;
use crate::models::Property;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Listings read from a JSON array on disk, e.g. an export of the
/// properties table
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for JsonFileSource {
    async fn fetch_listings(&self) -> Result<Vec<Property>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let properties: Vec<Property> = serde_json::from_slice(&bytes)?;
        info!("Loaded {} listings from {}", properties.len(), self.path.display());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "json-file"
    }
}
