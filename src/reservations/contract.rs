//! Printable reservation contract.

use askama::Template;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::pricing::calculators::format_checked_currency;

use super::detail::{AddOnDetailRow, ReservationDetailView};
use super::record::ReservationRecord;

/// Bilingual contract document, rendered for the browser's print dialog
#[derive(Template)]
#[template(path = "contract.html")]
pub struct ContractTemplate {
    pub code: String,
    pub issued_on: String,
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
    pub add_ons: Vec<AddOnDetailRow>,
    pub has_add_ons: bool,
    pub add_ons_total: String,
    pub total: String,
    pub paid: String,
    pub balance: String,
    pub comments: String,
}

impl ContractTemplate {
    pub fn from_record(record: &ReservationRecord, issued_on: NaiveDate) -> Self {
        let detail = ReservationDetailView::from(record);
        let add_ons_total = record
            .add_ons
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.subtotal()?));

        Self {
            code: detail.code,
            issued_on: issued_on.format("%d/%m/%Y").to_string(),
            parent_name: detail.parent_name,
            parent_dni: detail.parent_dni,
            phone: detail.phone,
            email: detail.email,
            birthday_child: detail.birthday_child,
            date: detail.date,
            time_slot: detail.time_slot,
            room: if detail.room.is_empty() {
                "-".to_string()
            } else {
                detail.room
            },
            modality: detail.modality,
            package: if detail.package.is_empty() {
                "-".to_string()
            } else {
                detail.package
            },
            child_count: detail.child_count,
            adult_count: detail.adult_count,
            has_add_ons: !detail.add_ons.is_empty(),
            add_ons: detail.add_ons,
            add_ons_total: format_checked_currency(add_ons_total),
            total: detail.total,
            paid: detail.paid,
            balance: detail.balance,
            comments: detail.comments,
        }
    }
}
