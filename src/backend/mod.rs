//! Access to the reservations backend (catalog, records, codes, submissions).

pub mod client;

pub use client::{BackendClient, BackendError, SubmitOutcome};
