//! Catalog and result models for the reservation pricing engine.
//!
//! The catalog arrives from `GET /api/opciones-reserva` with Spanish keys;
//! the Rust side uses English names and maps them with serde renames.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::calculators::{coerce_amount, coerce_count_value};

/// Modality name of the flat-fee, whole-venue booking.
pub const EXCLUSIVE_MODALITY: &str = "Exclusivo";

/// The only time slot offered for exclusive bookings.
pub const EXCLUSIVE_TIME_SLOT: &str = "9:00 AM - 1:00 PM";

/// Booking modality chosen on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Modality {
    /// Whole venue for a flat fee
    Exclusive,
    /// Per-child package, identified by its catalog name
    Package(String),
}

impl Modality {
    pub fn name(&self) -> &str {
        match self {
            Modality::Exclusive => EXCLUSIVE_MODALITY,
            Modality::Package(name) => name,
        }
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, Modality::Exclusive)
    }
}

impl From<String> for Modality {
    fn from(name: String) -> Self {
        if name == EXCLUSIVE_MODALITY {
            Modality::Exclusive
        } else {
            Modality::Package(name)
        }
    }
}

impl From<&str> for Modality {
    fn from(name: &str) -> Self {
        Modality::from(name.to_string())
    }
}

impl From<Modality> for String {
    fn from(modality: Modality) -> Self {
        match modality {
            Modality::Exclusive => EXCLUSIVE_MODALITY.to_string(),
            Modality::Package(name) => name,
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum guest counts for a room (or for the exclusive modality)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestMinimums {
    #[serde(rename = "ninos", default, deserialize_with = "lenient_count")]
    pub children: u32,
    #[serde(rename = "adultos", default, deserialize_with = "lenient_count")]
    pub adults: u32,
}

impl GuestMinimums {
    pub const NONE: GuestMinimums = GuestMinimums {
        children: 0,
        adults: 0,
    };
}

/// Entry of a dependent dropdown (package or time slot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    #[serde(rename = "texto")]
    pub label: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Price catalog supplied by the server once per form session.
///
/// `base_prices` stays `None` until the server has sent a price table; the
/// engine treats that as "catalog not loaded yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalog {
    #[serde(
        rename = "precios_paquete",
        default,
        deserialize_with = "lenient_price_table",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_prices: Option<BTreeMap<String, Decimal>>,
    #[serde(rename = "minimos", default)]
    pub minimums: BTreeMap<String, GuestMinimums>,
    #[serde(rename = "paquetes", default)]
    pub packages: BTreeMap<String, Vec<SelectOption>>,
    #[serde(rename = "horarios", default)]
    pub time_slots: BTreeMap<String, Vec<SelectOption>>,
}

impl PriceCatalog {
    /// True once a base-price table is available
    pub fn is_loaded(&self) -> bool {
        self.base_prices.is_some()
    }

    /// Base unit price of a modality; unknown modalities price at zero.
    pub fn base_price_of(&self, modality: &Modality) -> Decimal {
        self.base_prices
            .as_ref()
            .and_then(|prices| prices.get(modality.name()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Minimums for a room name or for `Exclusivo`
    pub fn minimums_for(&self, key: &str) -> Option<GuestMinimums> {
        self.minimums.get(key).copied()
    }

    pub fn packages_for(&self, modality: &Modality) -> Vec<SelectOption> {
        self.packages
            .get(modality.name())
            .cloned()
            .unwrap_or_default()
    }

    pub fn time_slots_for(&self, room: &str) -> Vec<SelectOption> {
        self.time_slots.get(room).cloned().unwrap_or_default()
    }
}

/// Derived price breakdown; recomputed on every relevant change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingResult {
    pub base_price: Decimal,
    pub add_ons_total: Decimal,
    pub grand_total: Decimal,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_count_value(&value))
}

fn lenient_price_table<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|table| {
        table
            .into_iter()
            .map(|(name, value)| (name, coerce_amount(&value)))
            .collect()
    }))
}

/// Serde helper for money fields that may arrive as number, string or junk.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Serde helper for count fields that may arrive as number, string or junk.
pub(crate) fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_count(deserializer)
}
