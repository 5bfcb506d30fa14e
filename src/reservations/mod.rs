//! Reservation form: session state, add-on ledger, selection cascade and the
//! read-only detail and contract views.

pub mod contract;
pub mod detail;
pub mod ledger;
pub mod record;
pub mod selection;
pub mod services;
pub mod session;

pub use ledger::{AddOnEntry, AddOnLedger, AddOnLine, LedgerError};
pub use record::{ReservationDetails, ReservationRecord, ReservationStatus};
pub use session::{FormMode, FormSession, FormView, SessionError};
