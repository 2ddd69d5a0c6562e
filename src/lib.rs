//! Real-estate marketplace core: listings from the hosted backend, diaspora
//! price formatting, URL-synced search filters, property cards and an
//! accessibility audit for the rendered pages.

pub mod a11y;
pub mod backend;
pub mod cards;
pub mod config;
pub mod currency;
pub mod error;
pub mod models;
pub mod search;
pub mod validation;

pub use error::{MarketError, Result};
