use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::PaxKey;

/// Passenger type as carried on the reservation (IATA PTC subset).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaxType {
    /// Adult
    Adt,
    /// Child
    Chd,
    /// Infant (no full details record required in this flow)
    Inf,
}

impl PaxType {
    /// Coerce a wire value into the fixed enum. Unknown codes fall back
    /// to adult, the type that imposes the strictest requirements.
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "CHD" => PaxType::Chd,
            "INF" => PaxType::Inf,
            _ => PaxType::Adt,
        }
    }

    /// Whether this passenger type requires an extra-details record.
    pub fn requires_details(self) -> bool {
        !matches!(self, PaxType::Inf)
    }
}

/// Check-in availability of one flight leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentStatus {
    Scheduled,
    CheckinOpen,
    Closed,
}

impl SegmentStatus {
    /// Coerce a wire value into the fixed enum. Anything unrecognized
    /// maps to SCHEDULED so a garbled status can never open check-in.
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "CHECKIN_OPEN" => SegmentStatus::CheckinOpen,
            "CLOSED" => SegmentStatus::Closed,
            _ => SegmentStatus::Scheduled,
        }
    }
}

/// One end of a flight segment. Times keep the airport's own UTC offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentEndpoint {
    pub airport: String,
    pub time: DateTime<FixedOffset>,
    pub terminal: Option<String>,
}

/// A single flight leg of the retrieved journey. Immutable once part of
/// a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightSegment {
    pub flight_number: String,
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub status: SegmentStatus,
    pub marketing_carrier: String,
    pub operating_carrier: String,
    pub gate: Option<String>,
}

/// A passenger on the booking. Selection for the current check-in
/// attempt lives in session state, never here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passenger {
    /// Issued identity when the reservation system provides one; the
    /// canonical key falls back to the name pair otherwise.
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub pax_type: PaxType,
    pub seat: Option<String>,
    pub boarding_zone: Option<String>,
    pub boarding_sequence: Option<String>,
    pub checked_in: bool,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub document_number: Option<String>,
}

impl Passenger {
    /// Canonical key for drafts, touch flags and submissions.
    pub fn key(&self) -> PaxKey {
        PaxKey::of(self)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One retrieved reservation. Replaced wholesale on a new lookup and
/// destroyed when the session resets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    /// Stable key for this check-in session, issued by the lookup.
    pub checkin_key: String,
    pub booking_ref: String,
    pub is_eligible: bool,
    pub segments: Vec<FlightSegment>,
    pub passengers: Vec<Passenger>,
    pub dg_acknowledged: bool,
    pub checkin_completed: bool,
    pub boarding_pass_url: Option<String>,
}

impl Booking {
    /// A booking is open for check-in only when it is eligible and at
    /// least one segment reports CHECKIN_OPEN.
    pub fn is_open_for_checkin(&self) -> bool {
        self.is_eligible
            && self
                .segments
                .iter()
                .any(|segment| segment.status == SegmentStatus::CheckinOpen)
    }

    /// Look up a passenger by canonical key.
    pub fn passenger(&self, key: &PaxKey) -> Option<&Passenger> {
        self.passengers.iter().find(|p| &p.key() == key)
    }
}

/// Draft travel-document data captured per passenger on the details
/// step. Merged into the session on step completion, never deleted
/// mid-session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassengerExtraDetails {
    pub nationality: String,
    pub phone: String,
    pub country_code: String,
}

impl PassengerExtraDetails {
    /// An empty draft seeded with the configured phone country code.
    pub fn empty(country_code: &str) -> Self {
        Self {
            nationality: String::new(),
            phone: String::new(),
            country_code: country_code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(status: SegmentStatus) -> FlightSegment {
        FlightSegment {
            flight_number: "QL123".to_string(),
            departure: SegmentEndpoint {
                airport: "BKK".to_string(),
                time: "2025-11-05T21:03:00+07:00".parse().unwrap(),
                terminal: Some("1".to_string()),
            },
            arrival: SegmentEndpoint {
                airport: "SIN".to_string(),
                time: "2025-11-06T00:02:00+08:00".parse().unwrap(),
                terminal: Some("1".to_string()),
            },
            status,
            marketing_carrier: "QL".to_string(),
            operating_carrier: "QL".to_string(),
            gate: Some("40".to_string()),
        }
    }

    fn booking(is_eligible: bool, status: SegmentStatus) -> Booking {
        Booking {
            checkin_key: "CHK-ABC123-001".to_string(),
            booking_ref: "ABC123".to_string(),
            is_eligible,
            segments: vec![segment(status)],
            passengers: Vec::new(),
            dg_acknowledged: false,
            checkin_completed: false,
            boarding_pass_url: None,
        }
    }

    #[test]
    fn checkin_requires_eligibility_and_an_open_segment() {
        assert!(booking(true, SegmentStatus::CheckinOpen).is_open_for_checkin());
        assert!(!booking(false, SegmentStatus::CheckinOpen).is_open_for_checkin());
        assert!(!booking(true, SegmentStatus::Scheduled).is_open_for_checkin());
        assert!(!booking(true, SegmentStatus::Closed).is_open_for_checkin());
    }

    #[test]
    fn segment_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&SegmentStatus::CheckinOpen).unwrap();
        assert_eq!(json, "\"CHECKIN_OPEN\"");
        let back: SegmentStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(back, SegmentStatus::Closed);
    }

    #[test]
    fn unknown_wire_status_never_opens_checkin() {
        assert_eq!(SegmentStatus::from_wire("BOARDING"), SegmentStatus::Scheduled);
        assert_eq!(SegmentStatus::from_wire(""), SegmentStatus::Scheduled);
        assert_eq!(SegmentStatus::from_wire("CHECKIN_OPEN"), SegmentStatus::CheckinOpen);
    }

    #[test]
    fn infants_do_not_require_details() {
        assert!(PaxType::Adt.requires_details());
        assert!(PaxType::Chd.requires_details());
        assert!(!PaxType::Inf.requires_details());
    }

    #[test]
    fn segment_time_keeps_local_offset() {
        let leg = segment(SegmentStatus::CheckinOpen);
        assert_eq!(leg.departure.time.offset().local_minus_utc(), 7 * 3600);
        assert_eq!(leg.arrival.time.offset().local_minus_utc(), 8 * 3600);
    }
}
