use crate::currency::Currency;
use crate::models::{Location, PropertyStatus, PropertyType, Seller, Specifications, Tier};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Listing-creation form payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    #[validate(length(min = 5, max = 120, message = "must be 5 to 120 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: String,
    #[validate(range(
        exclusive_min = 0.0,
        max = 10000000000.0,
        message = "must be greater than zero and realistic"
    ))]
    pub price: f64,
    #[serde(default)]
    pub currency: Currency,
    pub status: PropertyStatus,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[validate(nested)]
    pub location: Location,
    #[serde(default)]
    #[validate(nested)]
    pub specifications: Specifications,
    #[serde(default)]
    #[validate(
        length(max = 20, message = "at most 20 images are allowed"),
        custom(function = "crate::validation::validate_image_urls")
    )]
    pub images: Vec<String>,
    #[validate(nested)]
    pub seller: Seller,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tier: Tier,
}

/// Partial update from the listing edit form; absent fields are untouched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 120, message = "must be 5 to 120 characters"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(
        exclusive_min = 0.0,
        max = 10000000000.0,
        message = "must be greater than zero and realistic"
    ))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 20, message = "at most 20 images are allowed"),
        custom(function = "crate::validation::validate_image_urls")
    )]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

/// Agent profile edit form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfileUpdate {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_phone"))]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        url(message = "must be an http(s) URL"),
        custom(function = "crate::validation::validate_http_url")
    )]
    pub avatar_url: Option<String>,
}
