//! Add-on ledger: the ordered list of extras attached to a reservation.
//!
//! Lines are unique per catalog id; adding an id that is already present
//! bumps its quantity in place. The ledger travels to the server as a JSON
//! array of `{id, nombre, precio, cantidad}` records.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::pricing::calculators::{format_checked_currency, format_currency};
use crate::pricing::models::{lenient_amount, lenient_quantity};

/// Ledger mutation errors. A rejected mutation leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no add-on selected")]
    NoEntrySelected,

    #[error("invalid add-on quantity: {0}")]
    InvalidQuantity(i64),

    #[error("add-on line {index} does not exist (ledger has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("add-on amount out of range")]
    AmountOverflow,
}

/// Catalog entry picked in the add-on selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnEntry {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio", deserialize_with = "lenient_amount")]
    pub price: Decimal,
}

/// One line of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnLine {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(
        rename = "precio",
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "lenient_amount"
    )]
    pub unit_price: Decimal,
    #[serde(rename = "cantidad", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

impl AddOnLine {
    /// Unit price times quantity, `None` when it does not fit in a `Decimal`
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Display row for the add-on table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOnRow {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

/// Ordered add-on lines; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AddOnLine>", into = "Vec<AddOnLine>")]
pub struct AddOnLedger {
    lines: Vec<AddOnLine>,
}

impl AddOnLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from records sent by the server.
    ///
    /// Duplicate ids are merged into the first occurrence and lines with no
    /// quantity are dropped, as is a duplicate whose merged quantity would
    /// not fit.
    pub fn from_records(records: Vec<AddOnLine>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            if record.quantity == 0 {
                continue;
            }
            match ledger.position(&record.id) {
                Some(i) => {
                    let line = &mut ledger.lines[i];
                    match line.quantity.checked_add(record.quantity) {
                        Some(quantity) => line.quantity = quantity,
                        None => warn!(id = %record.id, "Dropping add-on record, merged quantity out of range"),
                    }
                }
                None => ledger.lines.push(record),
            }
        }
        ledger
    }

    pub fn lines(&self) -> &[AddOnLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    /// Add `quantity` units of `entry`, merging with an existing line.
    ///
    /// Returns the index of the affected line. The change is rolled back when
    /// the ledger total would no longer fit in a `Decimal`.
    pub fn add(&mut self, entry: Option<&AddOnEntry>, quantity: i64) -> Result<usize, LedgerError> {
        let entry = entry
            .filter(|e| !e.id.is_empty())
            .ok_or(LedgerError::NoEntrySelected)?;
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| LedgerError::InvalidQuantity(quantity))?;

        match self.position(&entry.id) {
            Some(i) => {
                let previous = self.lines[i].quantity;
                self.lines[i].quantity = previous
                    .checked_add(quantity)
                    .ok_or(LedgerError::InvalidQuantity(i64::from(quantity)))?;
                if self.total().is_none() {
                    self.lines[i].quantity = previous;
                    return Err(LedgerError::AmountOverflow);
                }
                Ok(i)
            }
            None => {
                self.lines.push(AddOnLine {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    unit_price: entry.price,
                    quantity,
                });
                if self.total().is_none() {
                    self.lines.pop();
                    return Err(LedgerError::AmountOverflow);
                }
                Ok(self.lines.len() - 1)
            }
        }
    }

    /// Sum of all line subtotals, `None` on overflow
    pub fn total(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.subtotal()?))
    }

    /// Remove the line at `index`
    pub fn remove(&mut self, index: usize) -> Result<AddOnLine, LedgerError> {
        if index >= self.lines.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Transport payload for the hidden `adicionales` form field
    pub fn to_payload(&self) -> String {
        // a Vec of plain structs with string keys cannot fail to serialize
        serde_json::to_string(&self.lines).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn rows(&self) -> Vec<AddOnRow> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| AddOnRow {
                index,
                id: line.id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: format_currency(line.unit_price),
                subtotal: format_checked_currency(line.subtotal()),
            })
            .collect()
    }
}

impl From<Vec<AddOnLine>> for AddOnLedger {
    fn from(records: Vec<AddOnLine>) -> Self {
        Self::from_records(records)
    }
}

impl From<AddOnLedger> for Vec<AddOnLine> {
    fn from(ledger: AddOnLedger) -> Self {
        ledger.lines
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
