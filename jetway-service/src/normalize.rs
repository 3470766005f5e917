//! Normalization of wire responses into domain types.
//!
//! Runs at the controller boundary before anything is stored: segment
//! statuses and passenger types are coerced into their fixed enums,
//! missing optionals are defaulted, and timestamps are parsed keeping
//! the airport's own UTC offset. A response that cannot be interpreted
//! is reported as one `INVALID_RESPONSE` error rather than stored
//! half-parsed.

use chrono::DateTime;
use jetway_core::models::{
    Booking, FlightSegment, Passenger, PaxType, SegmentEndpoint, SegmentStatus,
};

use crate::api::{BookingDto, EndpointDto, PassengerDto, SegmentDto};
use crate::error::ServiceError;

/// Convert a lookup response into the domain booking.
pub fn booking_from_wire(dto: BookingDto) -> Result<Booking, ServiceError> {
    let mut segments = Vec::with_capacity(dto.journeys.len());
    for journey in dto.journeys {
        segments.push(segment_from_wire(journey)?);
    }

    let passengers = dto.passengers.into_iter().map(passenger_from_wire).collect();

    Ok(Booking {
        checkin_key: dto.checkin_key,
        booking_ref: dto.booking_ref,
        is_eligible: dto.is_eligible,
        segments,
        passengers,
        dg_acknowledged: dto.dg_acknowledged,
        checkin_completed: dto.checkin_completed,
        boarding_pass_url: dto.boarding_pass_url,
    })
}

fn segment_from_wire(dto: SegmentDto) -> Result<FlightSegment, ServiceError> {
    Ok(FlightSegment {
        status: SegmentStatus::from_wire(&dto.segment_status),
        departure: endpoint_from_wire(dto.departure)?,
        arrival: endpoint_from_wire(dto.arrival)?,
        flight_number: dto.flight_number,
        marketing_carrier: dto.marketing_carrier.unwrap_or_default(),
        operating_carrier: dto.operating_carrier.unwrap_or_default(),
        gate: dto.gate,
    })
}

fn endpoint_from_wire(dto: EndpointDto) -> Result<SegmentEndpoint, ServiceError> {
    let time = DateTime::parse_from_rfc3339(&dto.time)
        .map_err(|e| ServiceError::invalid_response(&format!("bad segment time {:?}: {e}", dto.time)))?;
    Ok(SegmentEndpoint {
        airport: dto.airport,
        time,
        terminal: dto.terminal,
    })
}

/// Convert a wire passenger, defaulting every missing optional.
pub fn passenger_from_wire(dto: PassengerDto) -> Passenger {
    Passenger {
        id: dto.id,
        first_name: dto.first_name,
        last_name: dto.last_name,
        pax_type: PaxType::from_wire(&dto.pax_type),
        seat: dto.seat,
        boarding_zone: dto.boarding_zone,
        boarding_sequence: dto.boarding_sequence,
        checked_in: dto.checked_in,
        phone_number: dto.phone_number,
        nationality: dto.nationality,
        document_number: dto.document_number,
    }
}
