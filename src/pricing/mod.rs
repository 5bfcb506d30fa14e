//! Pricing engine for the reservation form.
//!
//! Catalog model, the total calculation and the quote endpoints.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{format_money, round_display};
pub use routes::router;
pub use services::load_catalog;
