pub mod api;
pub mod calculations;
pub mod catalog;
pub mod dashboard;
pub mod lead_form;
pub mod models;
pub mod search;

pub use api::{ApiConfig, ApiError, MaritimeApi, Session};
pub use catalog::ReferenceCatalog;
pub use models::*;
