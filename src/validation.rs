//! Client-side form checks run before anything is sent to the backend.
//!
//! Field rules live on the form types as `validator` derives; this module
//! runs them and holds the custom checks they refer to.

use crate::backend::types::{AgentProfileUpdate, ListingUpdate, NewListing};
use crate::cards::contact::normalize_phone;
use crate::error::ValidationErrors;
use crate::models::Coordinates;
use validator::{Validate, ValidationError};

pub fn validate_listing(listing: &NewListing) -> Result<(), ValidationErrors> {
    listing.validate().map_err(ValidationErrors::from)
}

pub fn validate_listing_update(update: &ListingUpdate) -> Result<(), ValidationErrors> {
    update.validate().map_err(ValidationErrors::from)
}

pub fn validate_agent_profile(profile: &AgentProfileUpdate) -> Result<(), ValidationErrors> {
    profile.validate().map_err(ValidationErrors::from)
}

/// An empty phone is allowed; anything else must normalise to a dialable
/// number
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() || normalize_phone(phone).is_some() {
        Ok(())
    } else {
        Err(failure("phone", "is not a valid phone number"))
    }
}

pub fn validate_coordinates(coords: &Coordinates) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&coords.lat) && (-180.0..=180.0).contains(&coords.lng) {
        Ok(())
    } else {
        Err(failure("coordinates", "are out of range"))
    }
}

pub fn validate_image_urls(images: &[String]) -> Result<(), ValidationError> {
    if images.iter().all(|url| is_http_url(url)) {
        Ok(())
    } else {
        Err(failure("http_url", "must be http(s) URLs"))
    }
}

/// The `url` rule accepts any scheme; links shown on cards must be web URLs
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if is_http_url(value) {
        Ok(())
    } else {
        Err(failure("http_url", "must be an http(s) URL"))
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
