//! Form session: the single owner of everything the reservation form edits.
//!
//! A session holds the catalog it was opened with, the header fields, the
//! pricing selection, the add-on ledger and a typed view-model describing
//! what the page should show. Every mutation that can move the price ends in
//! [`FormSession::recompute`].

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::pricing::calculators::{self, format_money};
use crate::pricing::models::{
    GuestMinimums, Modality, PriceCatalog, PricingResult, SelectOption, EXCLUSIVE_MODALITY,
    EXCLUSIVE_TIME_SLOT,
};

use super::ledger::{AddOnEntry, AddOnLedger, AddOnLine, LedgerError};
use super::record::{ReservationDetails, ReservationRecord};
use super::selection::SelectionState;

/// Code shown when no site is active
pub const NO_SEDE_CODE: &str = "S/Sede";

const INITIAL_TOTAL: &str = "0.00";

/// Form session errors. Every variant is a rejected user action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("the time slot is fixed for exclusive bookings")]
    TimeSlotLocked,

    #[error("a room can only be chosen after picking a package modality")]
    RoomNotAvailable,

    #[error("unknown {field} option: {value}")]
    UnknownOption { field: &'static str, value: String },

    #[error("reservation form is incomplete: {}", .0.join("; "))]
    Incomplete(Vec<String>),
}

/// Whether the form creates a new reservation or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormMode {
    New,
    Edit { reservation_id: i64 },
}

impl FormMode {
    /// Backend endpoint the form posts to
    pub fn action(&self) -> String {
        match self {
            FormMode::New => "/api/reservas/nueva".to_string(),
            FormMode::Edit { reservation_id } => format!("/api/reservas/editar/{}", reservation_id),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormMode::New => "Nueva Reserva",
            FormMode::Edit { .. } => "Editar Reserva",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::New => "Reservar",
            FormMode::Edit { .. } => "Guardar Cambios",
        }
    }
}

/// Which dependent groups of the form are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupVisibility {
    pub room: bool,
    pub package: bool,
    pub time_slot: bool,
}

/// Typed view-model of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub code: String,
    pub catalog_loaded: bool,
    pub visibility: GroupVisibility,
    pub time_slot_locked: bool,
    pub package_options: Vec<SelectOption>,
    pub time_slot_options: Vec<SelectOption>,
    pub minimums: GuestMinimums,
    /// Bound total field, two decimals
    pub total: String,
}

impl FormView {
    fn new(code: String, catalog_loaded: bool) -> Self {
        Self {
            code,
            catalog_loaded,
            visibility: GroupVisibility::default(),
            time_slot_locked: false,
            package_options: Vec::new(),
            time_slot_options: Vec::new(),
            minimums: GuestMinimums::NONE,
            total: INITIAL_TOTAL.to_string(),
        }
    }

    pub fn children_placeholder(&self) -> String {
        format!("Mín. {}", self.minimums.children)
    }

    pub fn adults_placeholder(&self) -> String {
        format!("Mín. {}", self.minimums.adults)
    }
}

/// Form fields as posted to the backend (`application/x-www-form-urlencoded`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationSubmission {
    #[serde(skip)]
    pub action: String,
    pub nombre_padres: String,
    pub correo: String,
    pub telefono: String,
    pub dni_padres: String,
    pub nombre_cumpleanero: String,
    pub fecha_celebracion: String,
    pub modalidad: String,
    pub salon: String,
    pub paquete: String,
    pub horario: String,
    pub ninos: u32,
    pub adultos: u32,
    pub estado: String,
    pub accesorios: String,
    pub comentarios: String,
    pub total: String,
    pub adicionales: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sede_seleccionada: Option<i64>,
}

impl ReservationSubmission {
    /// Check the fields the backend form rejects, before posting.
    pub fn validate(&self) -> Result<(), SessionError> {
        let mut problems = Vec::new();

        if self.nombre_padres.trim().is_empty() {
            problems.push("nombre_padres is required".to_string());
        }
        let phone_len = self.telefono.trim().chars().count();
        if !(7..=15).contains(&phone_len) {
            problems.push("telefono must have between 7 and 15 characters".to_string());
        }
        let dni_len = self.dni_padres.trim().chars().count();
        if dni_len > 0 && !(8..=15).contains(&dni_len) {
            problems.push("dni_padres must have between 8 and 15 characters".to_string());
        }
        if !self.correo.is_empty() && !self.correo.contains('@') {
            problems.push("correo is not a valid email address".to_string());
        }
        if self.nombre_cumpleanero.trim().is_empty() {
            problems.push("nombre_cumpleanero is required".to_string());
        }
        if self.fecha_celebracion.is_empty() {
            problems.push("fecha_celebracion is required".to_string());
        }
        if self.modalidad.is_empty() {
            problems.push("modalidad is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SessionError::Incomplete(problems))
        }
    }
}

/// Reservation form state for one user
#[derive(Debug, Clone)]
pub struct FormSession {
    id: Uuid,
    catalog: Option<Arc<PriceCatalog>>,
    mode: FormMode,
    new_code: String,
    sede_id: Option<i64>,
    details: ReservationDetails,
    selection: SelectionState,
    ledger: AddOnLedger,
    view: FormView,
}

impl FormSession {
    pub fn new(id: Uuid, catalog: Option<Arc<PriceCatalog>>, new_code: impl Into<String>) -> Self {
        let new_code = new_code.into();
        let catalog_loaded = catalog.as_ref().is_some_and(|c| c.is_loaded());
        let mut session = Self {
            id,
            catalog,
            mode: FormMode::New,
            view: FormView::new(new_code.clone(), catalog_loaded),
            new_code,
            sede_id: None,
            details: ReservationDetails::default(),
            selection: SelectionState::default(),
            ledger: AddOnLedger::new(),
        };
        session.recompute();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn sede_id(&self) -> Option<i64> {
        self.sede_id
    }

    pub fn details(&self) -> &ReservationDetails {
        &self.details
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn ledger(&self) -> &AddOnLedger {
        &self.ledger
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn catalog(&self) -> Option<&PriceCatalog> {
        self.catalog.as_deref()
    }

    /// Current price breakdown, `None` while the catalog is missing
    pub fn pricing(&self) -> Option<PricingResult> {
        calculators::compute(&self.selection, &self.ledger, self.catalog())
    }

    /// Recompute the total and write it into the view.
    ///
    /// Without a loaded catalog this leaves the displayed total untouched.
    pub fn recompute(&mut self) -> Option<PricingResult> {
        let result = self.pricing();
        match result {
            Some(pricing) => {
                self.view.total = format_money(pricing.grand_total);
                debug!(
                    session = %self.id,
                    base = %pricing.base_price,
                    add_ons = %pricing.add_ons_total,
                    total = %self.view.total,
                    "Recomputed reservation total"
                );
            }
            None => debug!(session = %self.id, "No total computed, displayed total left unchanged"),
        }
        result
    }

    /// Attach a catalog that arrived after the session was opened.
    ///
    /// Modality and room picked while the catalog was missing are replayed
    /// so their options, minimums and the exclusive slot lock take effect.
    pub fn attach_catalog(&mut self, catalog: Arc<PriceCatalog>) {
        self.view.catalog_loaded = catalog.is_loaded();
        self.catalog = Some(catalog);

        let Some(modality) = self.selection.modality.clone() else {
            self.recompute();
            return;
        };
        let room = self.selection.room.clone();

        self.change_modality(modality);
        if let Some(room) = room {
            if let Err(e) = self.change_room(room.clone()) {
                warn!(session = %self.id, room = %room, "Could not restore room: {}", e);
            }
        }
    }

    /// Switch the active site and the code shown for new reservations
    pub fn set_sede(&mut self, sede_id: i64, next_code: impl Into<String>) {
        self.sede_id = Some(sede_id);
        self.new_code = next_code.into();
        if self.mode == FormMode::New {
            self.view.code = self.new_code.clone();
        }
    }

    pub fn update_details(&mut self, details: ReservationDetails) {
        self.details = details;
    }

    fn apply_minimums(&mut self, minimums: GuestMinimums) {
        self.view.minimums = minimums;
        self.selection.apply_minimums(minimums);
    }

    /// React to a modality change.
    ///
    /// Clears room, package and time slot, rebuilds the dependent groups,
    /// applies the modality's guest minimums and recomputes.
    pub fn change_modality(&mut self, modality: Modality) {
        self.selection.modality = Some(modality.clone());
        self.selection.room = None;
        self.selection.package = None;
        self.selection.time_slot = None;

        let Some(catalog) = self.catalog.clone() else {
            warn!(session = %self.id, modality = %modality, "Modality changed before catalog loaded");
            return;
        };

        let minimums = if modality.is_exclusive() {
            self.view.visibility = GroupVisibility {
                room: false,
                package: false,
                time_slot: true,
            };
            self.view.package_options.clear();
            self.view.time_slot_options =
                vec![SelectOption::new(EXCLUSIVE_TIME_SLOT, EXCLUSIVE_TIME_SLOT)];
            self.view.time_slot_locked = true;
            self.selection.time_slot = Some(EXCLUSIVE_TIME_SLOT.to_string());
            catalog
                .minimums_for(EXCLUSIVE_MODALITY)
                .unwrap_or(GuestMinimums::NONE)
        } else {
            self.view.visibility = GroupVisibility {
                room: true,
                package: false,
                time_slot: false,
            };
            self.view.time_slot_locked = false;
            self.view.time_slot_options.clear();
            self.view.package_options = catalog.packages_for(&modality);
            // real minimums arrive with the room
            GuestMinimums::NONE
        };

        self.apply_minimums(minimums);
        self.recompute();
    }

    /// React to a room change (package modalities only).
    pub fn change_room(&mut self, room: impl Into<String>) -> Result<(), SessionError> {
        match &self.selection.modality {
            Some(modality) if !modality.is_exclusive() => {}
            _ => return Err(SessionError::RoomNotAvailable),
        }

        let room = room.into();
        self.selection.room = Some(room.clone());
        self.selection.time_slot = None;

        let Some(catalog) = self.catalog.clone() else {
            warn!(session = %self.id, room = %room, "Room changed before catalog loaded");
            return Ok(());
        };

        self.view.visibility.package = true;
        self.view.visibility.time_slot = true;
        if let Some(minimums) = catalog.minimums_for(&room) {
            self.apply_minimums(minimums);
        }
        self.view.time_slot_options = catalog.time_slots_for(&room);

        self.recompute();
        Ok(())
    }

    /// Pick a package; `None` or an empty id clears the selection.
    pub fn select_package(&mut self, package: Option<String>) -> Result<(), SessionError> {
        let package = package.filter(|p| !p.is_empty());
        if let Some(id) = &package {
            if !self.view.package_options.iter().any(|o| &o.id == id) {
                return Err(SessionError::UnknownOption {
                    field: "paquete",
                    value: id.clone(),
                });
            }
        }
        self.selection.package = package;
        self.recompute();
        Ok(())
    }

    /// Pick a time slot; `None` or an empty id clears the selection.
    pub fn select_time_slot(&mut self, time_slot: Option<String>) -> Result<(), SessionError> {
        if self.view.time_slot_locked {
            return Err(SessionError::TimeSlotLocked);
        }
        let time_slot = time_slot.filter(|t| !t.is_empty());
        if let Some(id) = &time_slot {
            if !self.view.time_slot_options.iter().any(|o| &o.id == id) {
                return Err(SessionError::UnknownOption {
                    field: "horario",
                    value: id.clone(),
                });
            }
        }
        self.selection.time_slot = time_slot;
        self.recompute();
        Ok(())
    }

    /// Guest counts typed by the user. Not snapped to the minimums.
    pub fn set_guest_counts(&mut self, children: Option<u32>, adults: Option<u32>) {
        if let Some(children) = children {
            self.selection.child_count = children;
        }
        if let Some(adults) = adults {
            self.selection.adult_count = adults;
        }
        self.recompute();
    }

    pub fn add_add_on(&mut self, entry: Option<&AddOnEntry>, quantity: i64) -> Result<usize, SessionError> {
        let index = self.ledger.add(entry, quantity)?;
        self.recompute();
        Ok(index)
    }

    pub fn remove_add_on(&mut self, index: usize) -> Result<AddOnLine, SessionError> {
        let removed = self.ledger.remove(index)?;
        self.recompute();
        Ok(removed)
    }

    /// Clear everything for a new reservation
    pub fn reset_for_new(&mut self) {
        self.mode = FormMode::New;
        self.details = ReservationDetails::default();
        self.selection = SelectionState::default();
        self.ledger.clear();

        let catalog_loaded = self.view.catalog_loaded;
        self.view = FormView::new(self.new_code.clone(), catalog_loaded);
        self.recompute();
    }

    /// Switch into edit mode for a reservation that is about to be loaded
    pub fn begin_edit(&mut self, reservation_id: i64) {
        self.mode = FormMode::Edit { reservation_id };
    }

    /// Fill the form from a fetched record.
    ///
    /// Runs the same steps the user would: guest counts, modality, room,
    /// then the dependent selects and finally the add-on ledger.
    pub fn populate_from_record(&mut self, record: &ReservationRecord) {
        self.view.code = record.code.clone();
        self.details = record.details();
        self.selection.child_count = record.child_count;
        self.selection.adult_count = record.adult_count;

        if !record.modality.is_empty() {
            self.change_modality(Modality::from(record.modality.as_str()));
        }

        if !self.selection.is_exclusive() {
            if !record.room.is_empty() {
                if let Err(e) = self.change_room(record.room.clone()) {
                    warn!(session = %self.id, room = %record.room, "Could not restore room: {}", e);
                }
            }
            if !record.package.is_empty() {
                if let Err(e) = self.select_package(Some(record.package.clone())) {
                    warn!(session = %self.id, "Could not restore package: {}", e);
                }
            }
            if !record.time_slot.is_empty() {
                if let Err(e) = self.select_time_slot(Some(record.time_slot.clone())) {
                    warn!(session = %self.id, "Could not restore time slot: {}", e);
                }
            }
        }

        self.ledger = AddOnLedger::from_records(record.add_ons.clone());
        self.recompute();
    }

    /// Build the payload the backend form endpoint expects
    pub fn submission(&self) -> ReservationSubmission {
        let details = &self.details;
        ReservationSubmission {
            action: self.mode.action(),
            nombre_padres: details.parent_name.clone(),
            correo: details.email.clone(),
            telefono: details.phone.clone(),
            dni_padres: details.parent_dni.clone(),
            nombre_cumpleanero: details.birthday_child.clone(),
            fecha_celebracion: details
                .celebration_date
                .map(|d: NaiveDate| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            modalidad: self
                .selection
                .modality
                .as_ref()
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
            salon: self.selection.room.clone().unwrap_or_default(),
            paquete: self.selection.package.clone().unwrap_or_default(),
            horario: self.selection.time_slot.clone().unwrap_or_default(),
            ninos: self.selection.child_count,
            adultos: self.selection.adult_count,
            estado: details.status.as_str().to_string(),
            accesorios: details.accessories.clone(),
            comentarios: details.comments.clone(),
            total: self.view.total.clone(),
            adicionales: self.ledger.to_payload(),
            sede_seleccionada: self.sede_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn catalog() -> Arc<PriceCatalog> {
        Arc::new(
            serde_json::from_value(json!({
                "precios_paquete": {"Exclusivo": 3200, "Paquete A": 50},
                "minimos": {
                    "Exclusivo": {"ninos": 0, "adultos": 0},
                    "Salon 1": {"ninos": 15, "adultos": 10}
                },
                "paquetes": {"Paquete A": [{"id": "basico", "texto": "Básico"}]},
                "horarios": {"Salon 1": [{"id": "tarde", "texto": "3:00 PM - 7:00 PM"}]}
            }))
            .unwrap(),
        )
    }

    fn session() -> FormSession {
        FormSession::new(Uuid::new_v4(), Some(catalog()), "TR00006")
    }

    fn torta() -> AddOnEntry {
        AddOnEntry {
            id: "1".to_string(),
            name: "Torta".to_string(),
            price: dec!(20),
        }
    }

    #[test]
    fn test_new_session_starts_hidden_and_priced() {
        let s = session();
        assert_eq!(s.mode(), FormMode::New);
        assert_eq!(s.view().code, "TR00006");
        assert_eq!(s.view().visibility, GroupVisibility::default());
        assert_eq!(s.view().total, "0.00");
    }

    #[test]
    fn test_exclusive_scenario_totals_flat_fee() {
        let mut s = session();
        s.change_modality(Modality::Exclusive);

        assert_eq!(s.view().total, "3200.00");
        assert!(s.view().time_slot_locked);
        assert_eq!(s.selection().time_slot.as_deref(), Some(EXCLUSIVE_TIME_SLOT));
        assert_eq!(
            s.view().visibility,
            GroupVisibility { room: false, package: false, time_slot: true }
        );
    }

    #[test]
    fn test_exclusive_time_slot_cannot_change() {
        let mut s = session();
        s.change_modality(Modality::Exclusive);
        assert_eq!(
            s.select_time_slot(Some("tarde".to_string())),
            Err(SessionError::TimeSlotLocked)
        );
        assert_eq!(s.change_room("Salon 1"), Err(SessionError::RoomNotAvailable));
    }

    #[test]
    fn test_package_cascade_then_room() {
        let mut s = session();
        s.change_modality(Modality::from("Paquete A"));

        assert_eq!(
            s.view().visibility,
            GroupVisibility { room: true, package: false, time_slot: false }
        );
        assert_eq!(s.view().package_options.len(), 1);
        assert_eq!(s.view().minimums, GuestMinimums::NONE);

        s.change_room("Salon 1").unwrap();

        assert_eq!(
            s.view().visibility,
            GroupVisibility { room: true, package: true, time_slot: true }
        );
        assert_eq!(s.view().time_slot_options[0].id, "tarde");
        // 0 guests snap to the room minimums: 15*50 + 10*5
        assert_eq!(s.selection().child_count, 15);
        assert_eq!(s.selection().adult_count, 10);
        assert_eq!(s.view().total, "800.00");
        assert_eq!(s.view().children_placeholder(), "Mín. 15");
    }

    #[test]
    fn test_package_scenario_with_add_on() {
        let mut s = session();
        s.change_modality(Modality::from("Paquete A"));
        s.set_guest_counts(Some(10), Some(4));
        s.add_add_on(Some(&torta()), 2).unwrap();

        let pricing = s.pricing().unwrap();
        assert_eq!(pricing.base_price, dec!(520));
        assert_eq!(pricing.add_ons_total, dec!(40));
        assert_eq!(s.view().total, "560.00");
    }

    #[test]
    fn test_guest_input_is_not_snapped() {
        let mut s = session();
        s.change_modality(Modality::from("Paquete A"));
        s.change_room("Salon 1").unwrap();
        s.set_guest_counts(Some(3), None);
        assert_eq!(s.selection().child_count, 3);
        assert_eq!(s.selection().adult_count, 10);
    }

    #[test]
    fn test_modality_change_clears_room_and_selects() {
        let mut s = session();
        s.change_modality(Modality::from("Paquete A"));
        s.change_room("Salon 1").unwrap();
        s.select_package(Some("basico".to_string())).unwrap();
        s.select_time_slot(Some("tarde".to_string())).unwrap();

        s.change_modality(Modality::from("Paquete A"));

        assert_eq!(s.selection().room, None);
        assert_eq!(s.selection().package, None);
        assert_eq!(s.selection().time_slot, None);
        assert!(!s.view().visibility.package);
    }

    #[test]
    fn test_unknown_options_are_rejected() {
        let mut s = session();
        s.change_modality(Modality::from("Paquete A"));
        s.change_room("Salon 1").unwrap();

        assert!(matches!(
            s.select_package(Some("premium".to_string())),
            Err(SessionError::UnknownOption { field: "paquete", .. })
        ));
        assert!(matches!(
            s.select_time_slot(Some("noche".to_string())),
            Err(SessionError::UnknownOption { field: "horario", .. })
        ));
        assert!(s.select_package(None).is_ok());
    }

    #[test]
    fn test_add_on_rejection_leaves_total() {
        let mut s = session();
        s.change_modality(Modality::Exclusive);
        let err = s.add_add_on(None, 1).unwrap_err();
        assert_eq!(err, SessionError::Ledger(LedgerError::NoEntrySelected));
        assert_eq!(s.view().total, "3200.00");
    }

    #[test]
    fn test_remove_add_on_recomputes() {
        let mut s = session();
        s.change_modality(Modality::Exclusive);
        s.add_add_on(Some(&torta()), 1).unwrap();
        assert_eq!(s.view().total, "3220.00");

        s.remove_add_on(0).unwrap();
        assert_eq!(s.view().total, "3200.00");
        assert_eq!(s.submission().adicionales, "[]");
    }

    #[test]
    fn test_without_catalog_total_is_left_unchanged() {
        let mut s = FormSession::new(Uuid::new_v4(), None, NO_SEDE_CODE);
        s.change_modality(Modality::Exclusive);
        s.add_add_on(Some(&torta()), 2).unwrap();

        assert_eq!(s.view().total, "0.00");
        assert!(s.pricing().is_none());
        assert_eq!(s.ledger().len(), 1);

        s.attach_catalog(catalog());
        assert!(s.view().catalog_loaded);
        assert_eq!(s.view().total, "3240.00");
        assert!(s.view().time_slot_locked);
        assert_eq!(s.selection().time_slot.as_deref(), Some(EXCLUSIVE_TIME_SLOT));
        assert!(s.view().visibility.time_slot);
        assert!(!s.view().visibility.room);
        assert!(s.select_time_slot(Some("4:00 PM - 8:00 PM".to_string())).is_err());
    }

    #[test]
    fn test_attach_catalog_replays_room() {
        let mut s = FormSession::new(Uuid::new_v4(), None, NO_SEDE_CODE);
        s.change_modality(Modality::from("Paquete A"));
        s.change_room("Salon 1").unwrap();
        assert!(s.view().package_options.is_empty());

        s.attach_catalog(catalog());

        assert_eq!(s.selection().room.as_deref(), Some("Salon 1"));
        assert_eq!(s.selection().child_count, 15);
        assert_eq!(s.selection().adult_count, 10);
        assert!(s.view().visibility.package);
        assert!(s.view().visibility.time_slot);
        assert_eq!(s.view().package_options.len(), 1);
        assert!(!s.view().time_slot_options.is_empty());
        assert!(s.select_package(Some("basico".to_string())).is_ok());
    }

    #[test]
    fn test_reset_for_new_restores_code_and_clears() {
        let mut s = session();
        s.begin_edit(5);
        s.populate_from_record(&ReservationRecord {
            code: "TR00005".to_string(),
            modality: "Exclusivo".to_string(),
            ..ReservationRecord::default()
        });
        s.add_add_on(Some(&torta()), 1).unwrap();
        assert_eq!(s.view().code, "TR00005");

        s.reset_for_new();

        assert_eq!(s.mode(), FormMode::New);
        assert_eq!(s.view().code, "TR00006");
        assert!(s.ledger().is_empty());
        assert_eq!(s.selection(), &SelectionState::default());
        assert_eq!(s.view().total, "0.00");
        assert_eq!(s.submission().action, "/api/reservas/nueva");
    }

    #[test]
    fn test_populate_from_record_runs_cascade_in_order() {
        let record: ReservationRecord = serde_json::from_value(json!({
            "codigo": "TR00005",
            "nombre_padres": "Ana Torres",
            "telefono": "987654321",
            "correo": "-",
            "fecha": "14/02/2026",
            "modalidad": "Paquete A",
            "salon": "Salon 1",
            "paquete": "basico",
            "horario": "tarde",
            "ninos": 20,
            "adultos": 4,
            "estado": "Reservado",
            "adicionales": [{"id": "1", "nombre": "Torta", "precio": 20, "cantidad": 2}]
        }))
        .unwrap();

        let mut s = session();
        s.begin_edit(5);
        s.populate_from_record(&record);

        assert_eq!(s.selection().room.as_deref(), Some("Salon 1"));
        assert_eq!(s.selection().package.as_deref(), Some("basico"));
        assert_eq!(s.selection().time_slot.as_deref(), Some("tarde"));
        assert_eq!(s.selection().child_count, 20);
        // 4 adults is below the room minimum and gets raised
        assert_eq!(s.selection().adult_count, 10);
        assert_eq!(s.view().total, "1090.00");

        let submission = s.submission();
        assert_eq!(submission.action, "/api/reservas/editar/5");
        assert_eq!(submission.fecha_celebracion, "2026-02-14");
        assert_eq!(submission.correo, "");
        assert_eq!(submission.total, "1090.00");
    }

    #[test]
    fn test_populate_with_unknown_package_leaves_it_empty() {
        let mut s = session();
        s.begin_edit(9);
        s.populate_from_record(&ReservationRecord {
            modality: "Paquete A".to_string(),
            room: "Salon 1".to_string(),
            package: "retirado".to_string(),
            ..ReservationRecord::default()
        });
        assert_eq!(s.selection().package, None);
        assert_eq!(s.selection().room.as_deref(), Some("Salon 1"));
    }

    #[test]
    fn test_set_sede_updates_code_only_for_new_mode() {
        let mut s = session();
        s.set_sede(2, "CH00003");
        assert_eq!(s.view().code, "CH00003");

        s.begin_edit(1);
        s.view.code = "TR00001".to_string();
        s.set_sede(3, "LM00001");
        assert_eq!(s.view().code, "TR00001");
        assert_eq!(s.submission().sede_seleccionada, Some(3));
    }

    #[test]
    fn test_submission_validation() {
        let mut s = session();
        assert!(matches!(
            s.submission().validate(),
            Err(SessionError::Incomplete(problems)) if problems.len() == 5
        ));

        s.update_details(ReservationDetails {
            parent_name: "Ana Torres".to_string(),
            phone: "987654321".to_string(),
            birthday_child: "Lucía / 6".to_string(),
            celebration_date: NaiveDate::from_ymd_opt(2026, 2, 14),
            ..ReservationDetails::default()
        });
        s.change_modality(Modality::Exclusive);
        assert_eq!(s.submission().validate(), Ok(()));
        assert_eq!(s.pricing().unwrap().grand_total, Decimal::from(3200));
    }
}
