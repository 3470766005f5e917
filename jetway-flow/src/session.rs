use std::collections::HashMap;

use jetway_core::{Booking, Passenger, PassengerExtraDetails, PaxKey};

/// Shared state of one check-in attempt.
///
/// Exactly one instance exists per attempt, owned by the flow
/// controller. The controller is the sole caller of the mutators;
/// everything else reads projections. Cleared only by [`reset`], the
/// single full-session exit.
///
/// [`reset`]: CheckinSession::reset
#[derive(Debug, Default)]
pub struct CheckinSession {
    booking: Option<Booking>,
    selected: Vec<PaxKey>,
    details: HashMap<PaxKey, PassengerExtraDetails>,
}

impl CheckinSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    /// Selected passenger keys in selection order.
    pub fn selected_keys(&self) -> &[PaxKey] {
        &self.selected
    }

    /// Selected passengers resolved against the current booking, in
    /// selection order.
    pub fn selected_passengers(&self) -> Vec<&Passenger> {
        let Some(booking) = self.booking.as_ref() else {
            return Vec::new();
        };
        self.selected
            .iter()
            .filter_map(|key| booking.passenger(key))
            .collect()
    }

    pub fn is_selected(&self, key: &PaxKey) -> bool {
        self.selected.contains(key)
    }

    /// Captured extra details by passenger key.
    pub fn details(&self) -> &HashMap<PaxKey, PassengerExtraDetails> {
        &self.details
    }

    pub fn details_for(&self, key: &PaxKey) -> Option<&PassengerExtraDetails> {
        self.details.get(key)
    }

    /// True when every selected passenger is an infant. False for an
    /// empty selection.
    pub fn all_selected_infants(&self) -> bool {
        let selected = self.selected_passengers();
        !selected.is_empty() && selected.iter().all(|p| !p.pax_type.requires_details())
    }

    /// Replace the booking wholesale. Selection entries whose key still
    /// resolves against the new booking survive; the rest are dropped so
    /// the selection stays a subset of the booking's passengers.
    pub(crate) fn set_booking(&mut self, booking: Booking) {
        self.selected
            .retain(|key| booking.passenger(key).is_some());
        self.booking = Some(booking);
    }

    /// Replace the selection. Keys not present on the current booking
    /// are discarded; duplicates keep their first position.
    pub(crate) fn set_selected_passengers(&mut self, keys: Vec<PaxKey>) {
        let mut next = Vec::with_capacity(keys.len());
        for key in keys {
            let known = self
                .booking
                .as_ref()
                .is_some_and(|b| b.passenger(&key).is_some());
            if known && !next.contains(&key) {
                next.push(key);
            }
        }
        self.selected = next;
    }

    /// Merge captured details into the session. Existing entries for
    /// other keys are kept; entries for the same key are overwritten.
    pub(crate) fn merge_details(&mut self, map: HashMap<PaxKey, PassengerExtraDetails>) {
        self.details.extend(map);
    }

    /// Write service-confirmed passenger data back onto the booking.
    pub(crate) fn apply_passenger_update(&mut self, updated: &Passenger) {
        let Some(booking) = self.booking.as_mut() else {
            return;
        };
        let key = updated.key();
        if let Some(passenger) = booking.passengers.iter_mut().find(|p| p.key() == key) {
            *passenger = updated.clone();
        }
    }

    /// Drop booking, selection and details. Idempotent.
    pub(crate) fn reset(&mut self) {
        self.booking = None;
        self.selected.clear();
        self.details.clear();
    }
}
