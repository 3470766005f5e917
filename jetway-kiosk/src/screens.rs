//! Read-only view models for the five step screens.
//!
//! Each view is a plain projection of controller state; rendering and
//! input handling stay in the embedding. Nothing here mutates the flow.

use chrono::{DateTime, Duration, FixedOffset};
use jetway_core::models::{Booking, FlightSegment, PaxType, SegmentStatus};
use jetway_core::validation::DetailField;
use jetway_core::PaxKey;
use jetway_flow::FlowController;

/// The find-booking screen: draft inputs plus submit gating.
#[derive(Debug, Clone)]
pub struct FindBookingView {
    pub booking_ref: String,
    pub last_name: String,
    pub can_submit: bool,
    pub busy: bool,
}

impl FindBookingView {
    pub fn project(controller: &FlowController) -> Self {
        Self {
            booking_ref: controller.booking_ref_input().to_string(),
            last_name: controller.last_name_input().to_string(),
            can_submit: controller.can_submit_lookup(),
            busy: controller.lookup_in_flight(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassengerRow {
    pub key: PaxKey,
    pub name: String,
    pub type_label: &'static str,
    pub seat_label: String,
    pub selected: bool,
}

/// The select-passengers screen: one row per passenger on the booking.
#[derive(Debug, Clone)]
pub struct SelectPassengersView {
    pub rows: Vec<PassengerRow>,
    pub can_continue: bool,
}

impl SelectPassengersView {
    pub fn project(controller: &FlowController) -> Self {
        let session = controller.session();
        let rows = session
            .booking()
            .map(|booking| {
                booking
                    .passengers
                    .iter()
                    .map(|p| PassengerRow {
                        key: p.key(),
                        name: p.full_name(),
                        type_label: type_label(p.pax_type),
                        seat_label: p
                            .seat
                            .clone()
                            .unwrap_or_else(|| "Not assigned".to_string()),
                        selected: session.is_selected(&p.key()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            rows,
            can_continue: !session.selected_keys().is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailsFieldView {
    pub value: String,
    /// Inline error, present only once the field has been touched.
    pub error: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct DetailsCard {
    pub key: PaxKey,
    pub name: String,
    pub country_code: String,
    pub nationality: DetailsFieldView,
    pub phone: DetailsFieldView,
}

/// The passenger-details screen: one card per drafted passenger.
#[derive(Debug, Clone)]
pub struct PassengerDetailsView {
    pub cards: Vec<DetailsCard>,
    pub can_continue: bool,
    pub busy: bool,
}

impl PassengerDetailsView {
    pub fn project(controller: &FlowController) -> Self {
        let session = controller.session();
        let form = controller.form();
        let cards = form
            .keys()
            .iter()
            .map(|key| {
                let name = session
                    .booking()
                    .and_then(|b| b.passenger(key))
                    .map(|p| p.full_name())
                    .unwrap_or_else(|| key.to_string());
                DetailsCard {
                    key: key.clone(),
                    name,
                    country_code: form.country_code(key).unwrap_or_default().to_string(),
                    nationality: field_view(controller, key, DetailField::Nationality),
                    phone: field_view(controller, key, DetailField::Phone),
                }
            })
            .collect();
        Self {
            cards,
            can_continue: controller.details_valid(),
            busy: controller.update_in_flight(),
        }
    }
}

fn field_view(controller: &FlowController, key: &PaxKey, field: DetailField) -> DetailsFieldView {
    DetailsFieldView {
        value: controller
            .form()
            .field_value(key, field)
            .unwrap_or_default()
            .to_string(),
        error: controller.form().field_error(key, field),
    }
}

/// The declaration screen.
#[derive(Debug, Clone)]
pub struct DeclarationView {
    pub accepted: bool,
    pub busy: bool,
}

impl DeclarationView {
    pub fn project(controller: &FlowController) -> Self {
        Self {
            accepted: controller.declaration_accepted(),
            busy: controller.completion_in_flight(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardingPassCard {
    pub passenger_name: String,
    pub seat: String,
    pub zone: String,
    pub sequence: String,
}

/// The boarding-pass screen: flight header plus one card per passenger
/// of this attempt. Times render in the segment's own offset.
#[derive(Debug, Clone)]
pub struct BoardingPassView {
    pub flight_number: String,
    pub route: String,
    pub date: String,
    pub weekday: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub boarding_time: String,
    pub terminal: String,
    pub gate: String,
    pub cards: Vec<BoardingPassCard>,
}

impl BoardingPassView {
    /// None until a booking with at least one segment is present.
    pub fn project(controller: &FlowController, boarding_lead_minutes: i64) -> Option<Self> {
        let session = controller.session();
        let booking = session.booking()?;
        let segment = active_segment(booking)?;

        let cards = session
            .selected_passengers()
            .iter()
            .map(|p| BoardingPassCard {
                passenger_name: p.full_name(),
                seat: p.seat.clone().unwrap_or_else(|| "Not assigned".to_string()),
                zone: p.boarding_zone.clone().unwrap_or_else(|| "-".to_string()),
                sequence: p
                    .boarding_sequence
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        let departure = &segment.departure;
        Some(Self {
            flight_number: segment.flight_number.clone(),
            route: format!("{} -> {}", departure.airport, segment.arrival.airport),
            date: departure.time.format("%-d %b").to_string(),
            weekday: departure.time.format("%a").to_string(),
            departure_time: fmt_clock(&departure.time),
            arrival_time: fmt_clock(&segment.arrival.time),
            boarding_time: fmt_clock(&boarding_time(&departure.time, boarding_lead_minutes)),
            terminal: departure.terminal.clone().unwrap_or_else(|| "-".to_string()),
            gate: segment.gate.clone().unwrap_or_else(|| "-".to_string()),
            cards,
        })
    }
}

/// The segment this check-in is for: the first open one, falling back
/// to the first segment of the journey.
fn active_segment(booking: &Booking) -> Option<&FlightSegment> {
    booking
        .segments
        .iter()
        .find(|s| s.status == SegmentStatus::CheckinOpen)
        .or_else(|| booking.segments.first())
}

/// Boarding starts a fixed number of minutes before departure.
pub fn boarding_time(
    departure: &DateTime<FixedOffset>,
    lead_minutes: i64,
) -> DateTime<FixedOffset> {
    *departure - Duration::minutes(lead_minutes)
}

fn fmt_clock(time: &DateTime<FixedOffset>) -> String {
    time.format("%H:%M").to_string()
}

fn type_label(pax_type: PaxType) -> &'static str {
    match pax_type {
        PaxType::Adt => "Adult",
        PaxType::Chd => "Child",
        PaxType::Inf => "Infant",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use jetway_service::api::BookingDto;
    use jetway_service::mock::seed_booking;
    use jetway_service::{MockBookingService, RecordingNotifier};

    fn controller_with(dto: BookingDto) -> FlowController {
        let service = Arc::new(MockBookingService::new(0));
        let notifier = Arc::new(RecordingNotifier::new());
        let mut controller = FlowController::new(service, notifier, "+66");
        controller.set_booking_ref("ABC123");
        controller.set_last_name("HUUM");
        let (token, _) = controller.begin_lookup().unwrap();
        controller.finish_lookup(token, Ok(dto));
        controller
    }

    #[test]
    fn find_booking_view_reports_the_submit_gate() {
        let service = Arc::new(MockBookingService::new(0));
        let notifier = Arc::new(RecordingNotifier::new());
        let mut controller = FlowController::new(service, notifier, "+66");

        let view = FindBookingView::project(&controller);
        assert!(!view.can_submit);
        assert!(!view.busy);

        controller.set_booking_ref("ABC123");
        controller.set_last_name("HUUM");
        assert!(FindBookingView::project(&controller).can_submit);
    }

    #[test]
    fn selection_rows_label_missing_seats() {
        let mut dto = seed_booking();
        dto.passengers[1].seat = None;
        let controller = controller_with(dto);

        let view = SelectPassengersView::project(&controller);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].seat_label, "12A");
        assert_eq!(view.rows[1].seat_label, "Not assigned");
        assert_eq!(view.rows[0].type_label, "Adult");
        assert!(!view.can_continue);
    }

    #[test]
    fn details_cards_surface_touch_gated_errors() {
        let mut controller = controller_with(seed_booking());
        controller.select_all();
        controller.confirm_selection();

        let keys: Vec<_> = controller.form().keys().to_vec();
        let view = PassengerDetailsView::project(&controller);
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].country_code, "+66");
        // untouched, so no inline error yet
        assert!(view.cards[0].phone.error.is_none());
        assert!(!view.can_continue);

        controller.touch_detail(&keys[0], DetailField::Phone);
        let view = PassengerDetailsView::project(&controller);
        assert_eq!(view.cards[0].phone.error, Some("Phone number is required"));
    }

    #[test]
    fn boarding_pass_view_renders_times_in_segment_offsets() {
        let mut controller = controller_with(seed_booking());
        controller.select_all();
        controller.set_declaration_accepted(true);
        let (token, _) = controller.begin_completion().unwrap();
        controller.finish_completion(token, Ok(seed_booking()));

        let view = BoardingPassView::project(&controller, 40).unwrap();
        assert_eq!(view.flight_number, "QL123");
        assert_eq!(view.route, "BKK -> SIN");
        assert_eq!(view.date, "5 Nov");
        assert_eq!(view.weekday, "Wed");
        assert_eq!(view.departure_time, "21:03");
        assert_eq!(view.arrival_time, "00:02");
        assert_eq!(view.boarding_time, "20:23");
        assert_eq!(view.terminal, "1");
        assert_eq!(view.gate, "40");
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].seat, "12A");
    }

    #[test]
    fn boarding_time_subtracts_the_lead() {
        let departure: DateTime<FixedOffset> = "2025-11-05T21:03:00+07:00".parse().unwrap();
        let boarding = boarding_time(&departure, 40);
        assert_eq!(fmt_clock(&boarding), "20:23");
        assert_eq!(boarding.offset().local_minus_utc(), 7 * 3600);
    }
}
