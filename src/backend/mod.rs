pub mod client;
pub mod file;
pub mod traits;
pub mod types;

pub use client::BackendClient;
pub use file::JsonFileSource;
pub use traits::ListingSource;
pub use types::{AgentProfileUpdate, ListingUpdate, NewListing};
