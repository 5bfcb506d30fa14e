//! Request DTOs for pricing API endpoints.

use serde::Deserialize;
use serde_json::Value;

use crate::reservations::ledger::AddOnLine;

/// Stateless quote: the same inputs the form holds, priced against the
/// cached catalog.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub modalidad: Option<String>,
    /// Raw guest counts, coerced like form input
    #[serde(default)]
    pub ninos: Value,
    #[serde(default)]
    pub adultos: Value,
    #[serde(default)]
    pub adicionales: Vec<AddOnLine>,
}
