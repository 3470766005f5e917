//! The booking-service boundary: wire DTOs and the async trait the flow
//! controller talks to. No transport is mandated; implementations range
//! from the in-memory mock here to a real reservation-system client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;

/// One end of a segment as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDto {
    pub airport: String,
    /// RFC 3339 timestamp carrying the airport's own UTC offset.
    pub time: String,
    pub terminal: Option<String>,
}

/// A journey segment as returned by the lookup. The status arrives as a
/// free string and is coerced into the fixed enum during normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDto {
    pub flight_number: String,
    pub departure: EndpointDto,
    pub arrival: EndpointDto,
    pub segment_status: String,
    pub marketing_carrier: Option<String>,
    pub operating_carrier: Option<String>,
    pub gate: Option<String>,
}

/// A passenger as returned by the lookup. Optional fields may simply be
/// absent; normalization defaults them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDto {
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub pax_type: String,
    pub seat: Option<String>,
    pub boarding_zone: Option<String>,
    pub boarding_sequence: Option<String>,
    #[serde(default)]
    pub checked_in: bool,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub document_number: Option<String>,
}

/// The full lookup response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub checkin_key: String,
    pub booking_ref: String,
    pub is_eligible: bool,
    pub journeys: Vec<SegmentDto>,
    pub passengers: Vec<PassengerDto>,
    #[serde(default)]
    pub dg_acknowledged: bool,
    #[serde(default)]
    pub checkin_completed: bool,
    pub boarding_pass_url: Option<String>,
}

/// One passenger's entry in the batch detail update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetailsUpdate {
    /// Canonical passenger key (issued id, or the name-pair fallback).
    pub passenger_id: String,
    pub phone_number: String,
    pub nationality: String,
    pub document_number: Option<String>,
}

/// Abstract reservation-system boundary consumed by the flow controller.
///
/// All operations are single requests; retry policy (none) and busy
/// gating live on the controller side.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Look up a booking by reference and last name. Fails with
    /// `BOOKING_NOT_FOUND` when the pair matches no eligible booking.
    async fn start_checkin(
        &self,
        booking_ref: &str,
        last_name: &str,
    ) -> Result<BookingDto, ServiceError>;

    /// Apply travel-document details for several passengers in one call.
    /// The update is atomic from the caller's perspective: any failure
    /// means nothing should be assumed saved.
    async fn update_passenger_details(
        &self,
        booking_ref: &str,
        updates: &[DetailsUpdate],
    ) -> Result<Vec<PassengerDto>, ServiceError>;

    /// Record the dangerous-goods acknowledgement. Best-effort: the flow
    /// proceeds even when this fails.
    async fn acknowledge_dangerous_goods(&self, booking_ref: &str) -> Result<(), ServiceError>;

    /// Complete check-in for the given passengers, assigning seats and
    /// boarding data where missing, and return the updated booking.
    async fn complete_checkin(
        &self,
        booking_ref: &str,
        passenger_ids: &[String],
    ) -> Result<BookingDto, ServiceError>;
}
