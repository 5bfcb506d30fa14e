//! Read-only reservation detail, as shown in the "ver reserva" modal.

use serde::Serialize;

use crate::pricing::calculators::{format_checked_currency, format_currency};

use super::record::ReservationRecord;

/// Shown in place of the add-on table when a reservation has none
pub const NO_ADD_ONS_LABEL: &str = "Sin adicionales";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOnDetailRow {
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDetailView {
    pub code: String,
    pub status: String,
    pub status_badge: &'static str,
    pub parent_name: String,
    pub parent_dni: String,
    pub phone: String,
    pub email: String,
    pub birthday_child: String,
    pub date: String,
    pub time_slot: String,
    pub room: String,
    pub modality: String,
    pub package: String,
    pub child_count: u32,
    pub adult_count: u32,
    pub total: String,
    pub paid: String,
    pub balance: String,
    pub accessories: String,
    pub comments: String,
    pub add_ons: Vec<AddOnDetailRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_ons_placeholder: Option<&'static str>,
}

impl From<&ReservationRecord> for ReservationDetailView {
    fn from(record: &ReservationRecord) -> Self {
        let add_ons: Vec<AddOnDetailRow> = record
            .add_ons
            .iter()
            .map(|line| AddOnDetailRow {
                name: line.name.clone(),
                unit_price: format!("{} c/u", format_currency(line.unit_price)),
                quantity: line.quantity,
                subtotal: format_checked_currency(line.subtotal()),
            })
            .collect();
        let add_ons_placeholder = add_ons.is_empty().then_some(NO_ADD_ONS_LABEL);

        Self {
            code: record.code.clone(),
            status: record.status.as_str().to_string(),
            status_badge: record.status.badge_class(),
            parent_name: record.parent_name.clone(),
            parent_dni: record.parent_dni.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            birthday_child: record.birthday_child.clone(),
            date: record.date.clone(),
            time_slot: record.time_slot.clone(),
            room: record.room.clone(),
            modality: record.modality.clone(),
            package: record.package.clone(),
            child_count: record.child_count,
            adult_count: record.adult_count,
            total: format_currency(record.total),
            paid: format_currency(record.paid),
            balance: format_currency(record.balance),
            accessories: record.accessories.clone(),
            comments: record.comments.clone(),
            add_ons,
            add_ons_placeholder,
        }
    }
}
