use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Passenger;

/// Canonical passenger key used everywhere drafts, touch flags and
/// submissions are keyed.
///
/// Exactly one derivation exists: the issued id when the reservation
/// system provides one, otherwise the `firstName-lastName` pair. Keeping
/// a single derivation point prevents the draft map and the touched map
/// from ever disagreeing about who a passenger is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaxKey(String);

impl PaxKey {
    /// The one derivation rule. Domain values and wire records both
    /// funnel through here when keying passengers.
    pub fn derive(id: Option<uuid::Uuid>, first_name: &str, last_name: &str) -> Self {
        match id {
            Some(id) => PaxKey(id.to_string()),
            None => PaxKey(format!("{first_name}-{last_name}")),
        }
    }

    /// Derive the canonical key for a passenger.
    pub fn of(passenger: &Passenger) -> Self {
        Self::derive(passenger.id, &passenger.first_name, &passenger.last_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
