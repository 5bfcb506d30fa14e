//! Selection state of the reservation form.

use serde::{Deserialize, Serialize};

use crate::pricing::models::{GuestMinimums, Modality};

/// What the user has picked so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub modality: Option<Modality>,
    pub room: Option<String>,
    pub package: Option<String>,
    pub time_slot: Option<String>,
    pub child_count: u32,
    pub adult_count: u32,
}

impl SelectionState {
    /// Raise guest counts to the given minimums.
    ///
    /// A count of zero, or any count below the minimum, is replaced by the
    /// minimum. Larger values are left alone.
    pub fn apply_minimums(&mut self, minimums: GuestMinimums) {
        self.child_count = snap_to_minimum(self.child_count, minimums.children);
        self.adult_count = snap_to_minimum(self.adult_count, minimums.adults);
    }

    pub fn is_exclusive(&self) -> bool {
        self.modality.as_ref().is_some_and(Modality::is_exclusive)
    }
}

fn snap_to_minimum(current: u32, minimum: u32) -> u32 {
    if current == 0 || current < minimum {
        minimum
    } else {
        current
    }
}
