use serde::{Deserialize, Serialize};

/// Failure reported by the booking service collaborator.
///
/// Carries a machine code, an HTTP-analogous status and a fixed
/// user-facing message. The controller converts these into notifications
/// at its boundary; raw errors never reach session or form state.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error, PartialEq, Eq)]
#[error("{code} ({status}): {message}")]
pub struct ServiceError {
    pub code: String,
    pub status: u16,
    /// Internal description, for logs only.
    pub message: String,
    /// Text safe to surface to the traveller.
    pub user_message: String,
}

impl ServiceError {
    pub fn new(code: &str, status: u16, message: &str, user_message: &str) -> Self {
        Self {
            code: code.to_string(),
            status,
            message: message.to_string(),
            user_message: user_message.to_string(),
        }
    }

    /// The canonical lookup failure: reference + name matched nothing.
    pub fn booking_not_found() -> Self {
        Self::new(
            "BOOKING_NOT_FOUND",
            404,
            "Booking not found",
            "We couldn't find your booking. Check your details and try again.",
        )
    }

    /// A passenger referenced by an update does not exist on the booking.
    pub fn passenger_not_found(passenger_id: &str) -> Self {
        Self::new(
            "PASSENGER_NOT_FOUND",
            404,
            &format!("Passenger not found: {passenger_id}"),
            "Something went wrong. Please try again later.",
        )
    }

    /// The batch detail update could not be applied.
    pub fn update_failed() -> Self {
        Self::new(
            "UPDATE_FAILED",
            502,
            "Passenger detail update failed",
            "We couldn't save the passenger details. Please try again.",
        )
    }

    /// The collaborator could not be reached at all.
    pub fn service_unavailable() -> Self {
        Self::new(
            "SERVICE_UNAVAILABLE",
            503,
            "Booking service unreachable",
            "Something went wrong. Please try again later.",
        )
    }

    /// The collaborator answered with something we cannot interpret.
    pub fn invalid_response(detail: &str) -> Self {
        Self::new(
            "INVALID_RESPONSE",
            502,
            &format!("Malformed booking response: {detail}"),
            "Something went wrong. Please try again later.",
        )
    }

    /// Check-in completion was rejected.
    pub fn completion_failed() -> Self {
        Self::new(
            "COMPLETION_FAILED",
            502,
            "Check-in completion failed",
            "We couldn't complete your check-in. Please try again.",
        )
    }
}
