use crate::backend::traits::ListingSource;
use crate::backend::types::{AgentProfileUpdate, ListingUpdate, NewListing};
use crate::config::BackendSettings;
use crate::error::{MarketError, Result, ValidationErrors};
use crate::models::{Agent, Property, Verification, VerificationStatus};
use crate::validation::{validate_agent_profile, validate_listing, validate_listing_update};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

/// REST client for the hosted database, following PostgREST conventions
/// (`/rest/v1/<table>`, `column=eq.value` filters, `apikey` header).
pub struct BackendClient {
    client: Client,
    rest_url: Url,
    api_key: Option<String>,
    access_token: Option<String>,
    properties_table: String,
    agents_table: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("home-market/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base = Url::parse(&settings.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base.join("rest/v1/")?;

        Ok(Self {
            client,
            rest_url,
            api_key: settings.api_key.clone(),
            access_token: None,
            properties_table: settings.properties_table.clone(),
            agents_table: settings.agents_table.clone(),
        })
    }

    /// Act as a signed-in user; the token comes from the hosted auth provider
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>> {
        let request = self
            .get(&self.properties_table)?
            .query(&[("select", "*"), ("order", "createdAt.desc")]);
        let rows: Vec<Property> = read_rows(request.send().await?).await?;
        info!("Fetched {} listings from backend", rows.len());
        Ok(rows)
    }

    pub async fn get_property(&self, id: &str) -> Result<Property> {
        let request = self
            .get(&self.properties_table)?
            .query(&[("select", "*".to_string()), ("id", eq(id))]);
        let rows = read_rows(request.send().await?).await?;
        single(rows, "property", id)
    }

    /// Validate and insert a new listing; returns the stored record
    pub async fn create_property(&self, listing: &NewListing) -> Result<Property> {
        validate_listing(listing)?;
        let request = self
            .request(reqwest::Method::POST, &self.properties_table)?
            .header("Prefer", "return=representation")
            .json(listing);
        let rows = read_rows(request.send().await?).await?;
        let created: Property = single(rows, "property", &listing.title)?;
        info!("Created listing {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update_property(&self, id: &str, update: &ListingUpdate) -> Result<Property> {
        validate_listing_update(update)?;
        self.patch_property(id, update).await
    }

    /// Admin approval: mark the listing verified by `reviewer`
    pub async fn approve_property(
        &self,
        id: &str,
        reviewer: &str,
        notes: Option<&str>,
    ) -> Result<Property> {
        let verification = Verification {
            status: VerificationStatus::Approved,
            verified_at: Some(Utc::now()),
            verified_by: Some(reviewer.to_string()),
            notes: notes.map(str::to_string),
        };
        let property = self
            .patch_property(id, &json!({ "verification": verification }))
            .await?;
        info!("Listing {} approved by {}", id, reviewer);
        Ok(property)
    }

    /// Admin rejection; a reason is required so the seller can fix the listing
    pub async fn reject_property(&self, id: &str, reviewer: &str, reason: &str) -> Result<Property> {
        if reason.trim().is_empty() {
            let mut errors = ValidationErrors::default();
            errors.add("notes", "a rejection reason is required");
            return Err(errors.into());
        }
        let verification = Verification {
            status: VerificationStatus::Rejected,
            verified_at: Some(Utc::now()),
            verified_by: Some(reviewer.to_string()),
            notes: Some(reason.trim().to_string()),
        };
        let property = self
            .patch_property(id, &json!({ "verification": verification }))
            .await?;
        warn!("Listing {} rejected by {}: {}", id, reviewer, reason.trim());
        Ok(property)
    }

    pub async fn get_agent(&self, id: &str) -> Result<Agent> {
        let request = self
            .get(&self.agents_table)?
            .query(&[("select", "*".to_string()), ("id", eq(id))]);
        let rows = read_rows(request.send().await?).await?;
        single(rows, "agent", id)
    }

    pub async fn update_agent_profile(&self, id: &str, profile: &AgentProfileUpdate) -> Result<Agent> {
        validate_agent_profile(profile)?;
        let request = self
            .request(reqwest::Method::PATCH, &self.agents_table)?
            .query(&[("id", eq(id))])
            .header("Prefer", "return=representation")
            .json(profile);
        let rows = read_rows(request.send().await?).await?;
        single(rows, "agent", id)
    }

    /// Listings whose seller is the given agent
    pub async fn agent_listings(&self, agent_id: &str) -> Result<Vec<Property>> {
        let request = self.get(&self.properties_table)?.query(&[
            ("select", "*".to_string()),
            ("seller->>id", eq(agent_id)),
            ("order", "createdAt.desc".to_string()),
        ]);
        read_rows(request.send().await?).await
    }

    async fn patch_property<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Property> {
        let request = self
            .request(reqwest::Method::PATCH, &self.properties_table)?
            .query(&[("id", eq(id))])
            .header("Prefer", "return=representation")
            .json(body);
        let rows = read_rows(request.send().await?).await?;
        single(rows, "property", id)
    }

    fn get(&self, table: &str) -> Result<RequestBuilder> {
        self.request(reqwest::Method::GET, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> Result<RequestBuilder> {
        let url = self.rest_url.join(table)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }
        if let Some(token) = self.access_token.as_ref().or(self.api_key.as_ref()) {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }
}

#[async_trait]
impl ListingSource for BackendClient {
    async fn fetch_listings(&self) -> Result<Vec<Property>> {
        self.list_properties().await
    }

    fn source_name(&self) -> &'static str {
        "backend"
    }
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Backend request failed with {}", status);
        return Err(MarketError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

fn single<T>(rows: Vec<T>, kind: &'static str, id: &str) -> Result<T> {
    rows.into_iter().next().ok_or_else(|| MarketError::NotFound {
        kind,
        id: id.to_string(),
    })
}
