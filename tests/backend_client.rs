mod helpers;

use helpers::{MockBackend, PropertyBuilder};
use home_market::backend::{
    AgentProfileUpdate, BackendClient, JsonFileSource, ListingSource, NewListing,
};
use home_market::config::BackendSettings;
use home_market::currency::{load_rates, Currency, HttpRateSource, RateTable};
use home_market::models::{Location, PropertyStatus, PropertyType, Seller, VerificationStatus};
use home_market::MarketError;
use serde_json::json;
use std::io::Write;
use std::time::Duration;

fn settings(base_url: &str) -> BackendSettings {
    BackendSettings {
        base_url: base_url.to_string(),
        api_key: Some("anon-key".to_string()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn property_json(id: &str) -> String {
    serde_json::to_string(&vec![PropertyBuilder::new(id).build()]).unwrap()
}

fn new_listing() -> NewListing {
    NewListing {
        title: "2 bedroom apartment, Osu".to_string(),
        description: "Serviced apartment close to Oxford Street".to_string(),
        price: 1_800.0,
        currency: Currency::Usd,
        status: PropertyStatus::ForRent,
        property_type: PropertyType::Apartment,
        location: Location {
            address: "Oxford St".to_string(),
            city: "Accra".to_string(),
            region: "Greater Accra".to_string(),
            country: "Ghana".to_string(),
            coordinates: None,
        },
        specifications: Default::default(),
        images: vec![],
        seller: Seller {
            id: "agent-2".to_string(),
            name: "Kwame Darko".to_string(),
            phone: String::new(),
            verified: false,
        },
        features: vec![],
        tier: Default::default(),
    }
}

#[tokio::test]
async fn lists_properties_with_api_key() {
    let backend = MockBackend::start(vec![(200, &property_json("p-1"))]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    let listings = client.fetch_listings().await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, "p-1");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert!(requests[0].target.starts_with("/rest/v1/properties?"));
    assert_eq!(requests[0].header("apikey"), Some("anon-key"));
    assert_eq!(requests[0].header("authorization"), Some("Bearer anon-key"));
}

#[tokio::test]
async fn missing_property_is_not_found() {
    let backend = MockBackend::start(vec![(200, "[]")]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    let err = client.get_property("ghost").await.unwrap_err();
    assert!(matches!(err, MarketError::NotFound { kind: "property", .. }));
    assert!(backend.requests()[0].target.contains("id=eq.ghost"));
}

#[tokio::test]
async fn http_failures_surface_status_and_body() {
    let backend = MockBackend::start(vec![(401, r#"{"message":"JWT expired"}"#)]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    match client.list_properties().await {
        Err(MarketError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("JWT expired"));
        }
        other => panic!("expected status error, got {:?}", other.map(|p| p.len())),
    }
}

#[tokio::test]
async fn invalid_listing_is_rejected_before_any_request() {
    let backend = MockBackend::start(vec![]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    let mut listing = new_listing();
    listing.price = 0.0;
    listing.location.city.clear();

    let err = client.create_property(&listing).await.unwrap_err();
    match err {
        MarketError::Validation(errors) => {
            assert!(errors.has("price"));
            assert!(errors.has("location.city"));
        }
        other => panic!("expected validation error, got {}", other),
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn creates_listing_and_returns_stored_row() {
    let backend = MockBackend::start(vec![(201, &property_json("p-new"))]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    let created = client.create_property(&new_listing()).await.unwrap();
    assert_eq!(created.id, "p-new");

    let request = &backend.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.header("prefer"), Some("return=representation"));
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["type"], "apartment");
    assert_eq!(body["status"], "for-rent");
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn approval_patches_verification_with_session_token() {
    let mut approved = PropertyBuilder::new("p-9").build();
    approved.verification.status = VerificationStatus::Approved;
    let row = serde_json::to_string(&vec![approved]).unwrap();

    let backend = MockBackend::start(vec![(200, &row)]).await;
    let client = BackendClient::new(&settings(&backend.base_url))
        .unwrap()
        .with_access_token("admin-session");

    let property = client.approve_property("p-9", "admin@homes", None).await.unwrap();
    assert_eq!(property.verification.status, VerificationStatus::Approved);

    let request = &backend.requests()[0];
    assert_eq!(request.method, "PATCH");
    assert!(request.target.contains("id=eq.p-9"));
    assert_eq!(request.header("authorization"), Some("Bearer admin-session"));
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["verification"]["status"], "approved");
    assert_eq!(body["verification"]["verifiedBy"], "admin@homes");
}

#[tokio::test]
async fn rejection_requires_reason() {
    let backend = MockBackend::start(vec![]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    let err = client.reject_property("p-9", "admin", "  ").await.unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn agent_profile_update_is_validated_then_sent() {
    let agent = json!([{
        "id": "agent-1",
        "name": "Ama Mensah",
        "email": "ama@homes.gh",
        "phone": "0241234567",
        "verified": true
    }])
    .to_string();
    let backend = MockBackend::start(vec![(200, &agent)]).await;
    let client = BackendClient::new(&settings(&backend.base_url)).unwrap();

    let bad = AgentProfileUpdate {
        name: String::new(),
        email: "ama@homes.gh".to_string(),
        ..Default::default()
    };
    assert!(client.update_agent_profile("agent-1", &bad).await.is_err());
    assert!(backend.requests().is_empty());

    let good = AgentProfileUpdate {
        name: "Ama Mensah".to_string(),
        email: "ama@homes.gh".to_string(),
        phone: "0241234567".to_string(),
        bio: Some("Residential sales in Accra since 2015".to_string()),
        ..Default::default()
    };
    let updated = client.update_agent_profile("agent-1", &good).await.unwrap();
    assert!(updated.verified);
    let request = &backend.requests()[0];
    assert_eq!(request.method, "PATCH");
    assert!(request.target.starts_with("/rest/v1/agents?"));
}

#[tokio::test]
async fn base_url_path_is_preserved() {
    let backend = MockBackend::start(vec![(200, "[]")]).await;
    let base = format!("{}/project", backend.base_url);
    let client = BackendClient::new(&settings(&base)).unwrap();

    let listings = client.agent_listings("agent-1").await.unwrap();
    assert!(listings.is_empty());
    let target = &backend.requests()[0].target;
    assert!(target.starts_with("/project/rest/v1/properties?"));
    assert!(target.contains("eq.agent-1"));
}

#[tokio::test]
async fn rates_endpoint_is_rebased_to_cedi() {
    let backend = MockBackend::start(vec![(
        200,
        r#"{"base":"USD","rates":{"GHS":12.5,"GBP":0.8,"JPY":150}}"#,
    )])
    .await;
    let source = HttpRateSource::new(format!("{}/latest", backend.base_url), Duration::from_secs(5)).unwrap();

    let table = load_rates(&source).await;
    assert!((table.rate(Currency::Usd) - 0.08).abs() < 1e-12);
    assert!((table.rate(Currency::Gbp) - 0.064).abs() < 1e-12);
    assert_eq!(table.rate(Currency::Eur), Currency::Eur.default_rate());
}

#[tokio::test]
async fn failed_rate_lookup_falls_back_to_defaults() {
    let backend = MockBackend::start(vec![(500, r#"{"error":"down"}"#)]).await;
    let source = HttpRateSource::new(backend.base_url.clone(), Duration::from_secs(5)).unwrap();

    assert_eq!(load_rates(&source).await, RateTable::defaults());
}

#[tokio::test]
async fn json_file_source_reads_exported_listings() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", property_json("from-file")).unwrap();

    let source = JsonFileSource::new(file.path());
    let listings = source.fetch_listings().await.unwrap();
    assert_eq!(listings[0].id, "from-file");
    assert_eq!(source.source_name(), "json-file");
}
