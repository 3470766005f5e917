//! In-memory booking service used by tests and the kiosk demo.
//!
//! Behaves like the real collaborator seen from the controller: the
//! same latency profile, the same error shapes, and mutable state that
//! survives across calls within one process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use jetway_core::identity::PaxKey;
use jetway_core::models::SegmentStatus;
use rand::Rng;
use uuid::Uuid;

use crate::api::{BookingDto, BookingService, DetailsUpdate, EndpointDto, PassengerDto, SegmentDto};
use crate::error::ServiceError;

pub struct MockBookingService {
    bookings: Mutex<HashMap<String, BookingDto>>,
    latency: Duration,
    fail_updates: AtomicBool,
    fail_acknowledgements: AtomicBool,
    fail_completions: AtomicBool,
}

impl MockBookingService {
    /// An empty service with the given simulated latency.
    pub fn new(latency_ms: u64) -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
            latency: Duration::from_millis(latency_ms),
            fail_updates: AtomicBool::new(false),
            fail_acknowledgements: AtomicBool::new(false),
            fail_completions: AtomicBool::new(false),
        }
    }

    /// A service pre-loaded with the demo booking ABC123 / HUUM.
    pub fn with_seed_data(latency_ms: u64) -> Self {
        let service = Self::new(latency_ms);
        service.insert_booking(seed_booking());
        service
    }

    /// Add or replace a booking, keyed by reference.
    pub fn insert_booking(&self, dto: BookingDto) {
        self.store().insert(dto.booking_ref.clone(), dto);
    }

    /// Make every subsequent batch update fail, simulating an outage.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent dangerous-goods acknowledgement fail.
    pub fn set_fail_acknowledgements(&self, fail: bool) {
        self.fail_acknowledgements.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent check-in completion fail.
    pub fn set_fail_completions(&self, fail: bool) {
        self.fail_completions.store(fail, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    // A poisoned lock still holds usable data; never held across awaits.
    fn store(&self) -> MutexGuard<'_, HashMap<String, BookingDto>> {
        self.bookings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn dto_key(passenger: &PassengerDto) -> PaxKey {
    PaxKey::derive(passenger.id, &passenger.first_name, &passenger.last_name)
}

fn open_for_checkin(dto: &BookingDto) -> bool {
    dto.is_eligible
        && dto
            .journeys
            .iter()
            .any(|j| SegmentStatus::from_wire(&j.segment_status) == SegmentStatus::CheckinOpen)
}

#[async_trait]
impl BookingService for MockBookingService {
    async fn start_checkin(
        &self,
        booking_ref: &str,
        last_name: &str,
    ) -> Result<BookingDto, ServiceError> {
        self.simulate_latency().await;

        let booking = self.store().get(booking_ref).cloned();

        let Some(booking) = booking else {
            tracing::info!("lookup miss for {}", booking_ref);
            return Err(ServiceError::booking_not_found());
        };
        let name_matches = booking
            .passengers
            .iter()
            .any(|p| p.last_name.eq_ignore_ascii_case(last_name));
        if !name_matches || !open_for_checkin(&booking) {
            tracing::info!("lookup rejected for {}", booking_ref);
            return Err(ServiceError::booking_not_found());
        }

        Ok(booking)
    }

    async fn update_passenger_details(
        &self,
        booking_ref: &str,
        updates: &[DetailsUpdate],
    ) -> Result<Vec<PassengerDto>, ServiceError> {
        self.simulate_latency().await;

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ServiceError::update_failed());
        }

        let mut bookings = self.store();
        let booking = bookings
            .get_mut(booking_ref)
            .ok_or_else(ServiceError::booking_not_found)?;

        // Resolve every target before touching anything: the batch is
        // atomic, a single unknown passenger fails the whole call.
        let mut targets = Vec::with_capacity(updates.len());
        for update in updates {
            let index = booking
                .passengers
                .iter()
                .position(|p| dto_key(p).as_str() == update.passenger_id)
                .ok_or_else(|| ServiceError::passenger_not_found(&update.passenger_id))?;
            targets.push(index);
        }

        let mut updated = Vec::with_capacity(updates.len());
        for (update, index) in updates.iter().zip(targets) {
            let passenger = &mut booking.passengers[index];
            passenger.phone_number = Some(update.phone_number.clone());
            passenger.nationality = Some(update.nationality.clone());
            passenger.document_number = update.document_number.clone();
            updated.push(passenger.clone());
        }

        Ok(updated)
    }

    async fn acknowledge_dangerous_goods(&self, booking_ref: &str) -> Result<(), ServiceError> {
        self.simulate_latency().await;

        if self.fail_acknowledgements.load(Ordering::SeqCst) {
            return Err(ServiceError::service_unavailable());
        }

        if let Some(booking) = self.store().get_mut(booking_ref) {
            booking.dg_acknowledged = true;
        }
        Ok(())
    }

    async fn complete_checkin(
        &self,
        booking_ref: &str,
        passenger_ids: &[String],
    ) -> Result<BookingDto, ServiceError> {
        self.simulate_latency().await;

        if self.fail_completions.load(Ordering::SeqCst) {
            return Err(ServiceError::completion_failed());
        }

        let mut bookings = self.store();
        let booking = bookings
            .get_mut(booking_ref)
            .ok_or_else(ServiceError::booking_not_found)?;

        let mut rng = rand::thread_rng();
        for passenger in booking.passengers.iter_mut() {
            if !passenger_ids.iter().any(|id| dto_key(passenger).as_str() == id) {
                continue;
            }
            passenger.checked_in = true;
            if passenger.seat.is_none() {
                let row = rng.gen_range(1..=30);
                let letter = (b'A' + rng.gen_range(0..6)) as char;
                passenger.seat = Some(format!("{row}{letter}"));
                passenger.boarding_zone = Some(rng.gen_range(1..=4).to_string());
                passenger.boarding_sequence = Some(format!("{:03}", rng.gen_range(100..500)));
            }
        }

        booking.checkin_completed = true;
        booking.boarding_pass_url = Some(format!("/api/v1/boarding-pass/{booking_ref}"));

        Ok(booking.clone())
    }
}

fn seed_uuid(text: &str) -> Uuid {
    Uuid::parse_str(text).unwrap_or_else(|_| Uuid::new_v4())
}

/// The demo reservation: ABC123 / HUUM, one open segment BKK -> SIN.
pub fn seed_booking() -> BookingDto {
    BookingDto {
        checkin_key: "CHK-ABC123-001".to_string(),
        booking_ref: "ABC123".to_string(),
        is_eligible: true,
        journeys: vec![SegmentDto {
            flight_number: "QL123".to_string(),
            departure: EndpointDto {
                airport: "BKK".to_string(),
                time: "2025-11-05T21:03:00+07:00".to_string(),
                terminal: Some("1".to_string()),
            },
            arrival: EndpointDto {
                airport: "SIN".to_string(),
                time: "2025-11-06T00:02:00+08:00".to_string(),
                terminal: Some("1".to_string()),
            },
            segment_status: "CHECKIN_OPEN".to_string(),
            marketing_carrier: Some("QL".to_string()),
            operating_carrier: Some("QL".to_string()),
            gate: Some("40".to_string()),
        }],
        passengers: vec![
            PassengerDto {
                id: Some(seed_uuid("123e4567-e89b-12d3-a456-426614174000")),
                first_name: "ALEX".to_string(),
                last_name: "HUUM".to_string(),
                pax_type: "ADT".to_string(),
                seat: Some("12A".to_string()),
                boarding_zone: Some("1".to_string()),
                boarding_sequence: Some("012".to_string()),
                checked_in: false,
                phone_number: None,
                nationality: None,
                document_number: None,
            },
            PassengerDto {
                id: Some(seed_uuid("123e4567-e89b-12d3-a456-426614174001")),
                first_name: "Somsee".to_string(),
                last_name: "Kuum".to_string(),
                pax_type: "ADT".to_string(),
                seat: Some("12B".to_string()),
                boarding_zone: Some("1".to_string()),
                boarding_sequence: Some("013".to_string()),
                checked_in: false,
                phone_number: None,
                nationality: None,
                document_number: None,
            },
        ],
        dg_acknowledged: false,
        checkin_completed: false,
        boarding_pass_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_finds_the_seeded_booking() {
        let service = MockBookingService::with_seed_data(0);
        let booking = service.start_checkin("ABC123", "HUUM").await.unwrap();
        assert_eq!(booking.booking_ref, "ABC123");
        assert_eq!(booking.passengers.len(), 2);
    }

    #[tokio::test]
    async fn lookup_rejects_unknown_pairs() {
        let service = MockBookingService::with_seed_data(0);

        let err = service.start_checkin("ZZZ999", "NOBODY").await.unwrap_err();
        assert_eq!(err.code, "BOOKING_NOT_FOUND");

        let err = service.start_checkin("ABC123", "NOBODY").await.unwrap_err();
        assert_eq!(err.code, "BOOKING_NOT_FOUND");
    }

    #[tokio::test]
    async fn lookup_rejects_closed_bookings() {
        let service = MockBookingService::new(0);
        let mut dto = seed_booking();
        dto.journeys[0].segment_status = "CLOSED".to_string();
        service.insert_booking(dto);

        let err = service.start_checkin("ABC123", "HUUM").await.unwrap_err();
        assert_eq!(err.code, "BOOKING_NOT_FOUND");
    }

    #[tokio::test]
    async fn batch_update_is_atomic() {
        let service = MockBookingService::with_seed_data(0);
        let known = "123e4567-e89b-12d3-a456-426614174000".to_string();

        let updates = vec![
            DetailsUpdate {
                passenger_id: known.clone(),
                phone_number: "812345678".to_string(),
                nationality: "TH".to_string(),
                document_number: None,
            },
            DetailsUpdate {
                passenger_id: "not-a-passenger".to_string(),
                phone_number: "812345678".to_string(),
                nationality: "TH".to_string(),
                document_number: None,
            },
        ];
        let err = service
            .update_passenger_details("ABC123", &updates)
            .await
            .unwrap_err();
        assert_eq!(err.code, "PASSENGER_NOT_FOUND");

        // nothing was applied for the passenger that did exist
        let booking = service.start_checkin("ABC123", "HUUM").await.unwrap();
        assert!(booking.passengers[0].nationality.is_none());
    }

    #[tokio::test]
    async fn completion_assigns_missing_boarding_data() {
        let service = MockBookingService::new(0);
        let mut dto = seed_booking();
        dto.passengers[0].seat = None;
        dto.passengers[0].boarding_zone = None;
        dto.passengers[0].boarding_sequence = None;
        service.insert_booking(dto);

        let ids = vec!["123e4567-e89b-12d3-a456-426614174000".to_string()];
        let booking = service.complete_checkin("ABC123", &ids).await.unwrap();

        let alex = &booking.passengers[0];
        assert!(alex.checked_in);
        let seat = alex.seat.as_deref().unwrap();
        assert!(seat.ends_with(|c: char| ('A'..='F').contains(&c)));
        assert_eq!(alex.boarding_sequence.as_deref().unwrap().len(), 3);
        assert!(booking.checkin_completed);
        assert_eq!(
            booking.boarding_pass_url.as_deref(),
            Some("/api/v1/boarding-pass/ABC123")
        );

        // untargeted passenger untouched
        assert!(!booking.passengers[1].checked_in);
    }

    #[tokio::test]
    async fn simulated_outage_fails_updates() {
        let service = MockBookingService::with_seed_data(0);
        service.set_fail_updates(true);

        let err = service
            .update_passenger_details("ABC123", &[])
            .await
            .unwrap_err();
        assert_eq!(err.code, "UPDATE_FAILED");
    }

    #[tokio::test]
    async fn simulated_outage_fails_acknowledgements_and_completions() {
        let service = MockBookingService::with_seed_data(0);
        service.set_fail_acknowledgements(true);
        service.set_fail_completions(true);

        let err = service
            .acknowledge_dangerous_goods("ABC123")
            .await
            .unwrap_err();
        assert_eq!(err.code, "SERVICE_UNAVAILABLE");

        let err = service.complete_checkin("ABC123", &[]).await.unwrap_err();
        assert_eq!(err.code, "COMPLETION_FAILED");

        // flipping the switches back restores the happy paths
        service.set_fail_acknowledgements(false);
        service.set_fail_completions(false);
        assert!(service.acknowledge_dangerous_goods("ABC123").await.is_ok());
    }

    #[tokio::test]
    async fn lookup_matches_last_names_case_insensitively() {
        let service = MockBookingService::with_seed_data(0);

        // callers normally upper-case, but the match itself ignores case
        let booking = service.start_checkin("ABC123", "KUUM").await.unwrap();
        assert_eq!(booking.booking_ref, "ABC123");
    }
}
