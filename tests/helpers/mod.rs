#![allow(dead_code)]

pub mod builders;
pub mod mock_backend;

pub use builders::PropertyBuilder;
pub use mock_backend::{MockBackend, RecordedRequest};
