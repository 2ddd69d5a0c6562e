pub mod engine;
pub mod filters;
pub mod state;

pub use engine::{run_search, SearchPage};
pub use filters::{SearchFilters, SortOrder};
pub use state::FilterState;
