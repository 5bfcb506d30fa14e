//! Reservation records as returned by `GET /api/reservas/{id}`.
//!
//! The server fills empty text columns with placeholders (`-` for contact
//! fields, `Ninguno` for free text) and formats dates as `dd/mm/yyyy`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::models::{lenient_amount, lenient_quantity};

use super::ledger::AddOnLine;

const EMPTY_PLACEHOLDER: &str = "-";
const NONE_PLACEHOLDER: &str = "Ninguno";
const RECORD_DATE_FORMAT: &str = "%d/%m/%Y";

/// Lifecycle state of a reservation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    #[default]
    Reserved,
    Paid,
    Cancelled,
    Other(String),
}

impl ReservationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReservationStatus::Reserved => "Reservado",
            ReservationStatus::Paid => "Abonado",
            ReservationStatus::Cancelled => "Cancelado",
            ReservationStatus::Other(s) => s,
        }
    }

    /// Bootstrap badge classes used by the detail modal
    pub fn badge_class(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "bg-warning text-dark",
            ReservationStatus::Paid => "bg-success",
            _ => "bg-danger",
        }
    }
}

impl From<String> for ReservationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Reservado" => ReservationStatus::Reserved,
            "Abonado" => ReservationStatus::Paid,
            "Cancelado" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Other(s),
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(status: ReservationStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Full reservation record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReservationRecord {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre_padres")]
    pub parent_name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "dni")]
    pub parent_dni: String,
    #[serde(rename = "nombre_cumpleanero")]
    pub birthday_child: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "modalidad")]
    pub modality: String,
    #[serde(rename = "salon")]
    pub room: String,
    #[serde(rename = "paquete")]
    pub package: String,
    #[serde(rename = "horario")]
    pub time_slot: String,
    #[serde(rename = "ninos", deserialize_with = "lenient_quantity")]
    pub child_count: u32,
    #[serde(rename = "adultos", deserialize_with = "lenient_quantity")]
    pub adult_count: u32,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
    #[serde(rename = "accesorios")]
    pub accessories: String,
    #[serde(rename = "comentarios")]
    pub comments: String,
    #[serde(rename = "adicionales", deserialize_with = "lenient_add_ons")]
    pub add_ons: Vec<AddOnLine>,
    #[serde(deserialize_with = "lenient_amount")]
    pub total: Decimal,
    #[serde(rename = "a_cuenta", deserialize_with = "lenient_amount")]
    pub paid: Decimal,
    #[serde(rename = "saldo", deserialize_with = "lenient_amount")]
    pub balance: Decimal,
}

impl ReservationRecord {
    /// Celebration date, if the record carries a parseable one
    pub fn celebration_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        if raw.is_empty() || raw == EMPTY_PLACEHOLDER {
            return None;
        }
        NaiveDate::parse_from_str(raw, RECORD_DATE_FORMAT).ok()
    }

    /// Editable header fields with server placeholders removed
    pub fn details(&self) -> ReservationDetails {
        ReservationDetails {
            parent_name: self.parent_name.clone(),
            email: strip_placeholder(&self.email, EMPTY_PLACEHOLDER),
            phone: self.phone.clone(),
            parent_dni: strip_placeholder(&self.parent_dni, EMPTY_PLACEHOLDER),
            birthday_child: strip_placeholder(&self.birthday_child, EMPTY_PLACEHOLDER),
            celebration_date: self.celebration_date(),
            status: self.status.clone(),
            accessories: strip_placeholder(&self.accessories, NONE_PLACEHOLDER),
            comments: strip_placeholder(&self.comments, NONE_PLACEHOLDER),
        }
    }
}

/// Non-pricing fields of the reservation form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationDetails {
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    pub parent_dni: String,
    pub birthday_child: String,
    pub celebration_date: Option<NaiveDate>,
    pub status: ReservationStatus,
    pub accessories: String,
    pub comments: String,
}

fn strip_placeholder(value: &str, placeholder: &str) -> String {
    if value == placeholder {
        String::new()
    } else {
        value.to_string()
    }
}

fn lenient_add_ons<'de, D>(deserializer: D) -> Result<Vec<AddOnLine>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // `adicionales` may be null, a list, or the raw JSON text column
    let value = serde_json::Value::deserialize(deserializer)?;
    let value = match value {
        serde_json::Value::String(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).map_err(serde::de::Error::custom)?
        }
        serde_json::Value::Array(_) => value,
        _ => return Ok(Vec::new()),
    };
    serde_json::from_value(value).map_err(serde::de::Error::custom)
}
