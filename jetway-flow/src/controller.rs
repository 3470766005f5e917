use std::sync::Arc;

use jetway_core::validation::DetailField;
use jetway_core::PaxKey;
use jetway_service::normalize;
use jetway_service::{
    BookingDto, BookingService, DetailsUpdate, Notifier, PassengerDto, ServiceError, Severity,
};

use crate::form::PassengerFormState;
use crate::session::CheckinSession;
use crate::step::{next_step_after_selection, Step};

/// What a controller operation did with the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Navigation landed on the step the operation aimed for.
    Advanced(Step),
    /// Back navigation landed on the given step.
    MovedBack(Step),
    /// A guard sent the user to an earlier step instead.
    Redirected(Step),
    /// Input was rejected or an operation failed; state is unchanged
    /// apart from a possible notification.
    Stayed,
    /// An operation of the same kind is already in flight.
    Busy,
    /// The completion belonged to a session that has since been reset;
    /// nothing was applied.
    Stale,
}

/// Proof that an async operation was begun against the current session.
/// A finish call presenting a token from before a reset is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionToken {
    epoch: u64,
}

/// Payload for one booking lookup, already trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub booking_ref: String,
    pub last_name: String,
}

/// Payload for one batch detail update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsRequest {
    pub booking_ref: String,
    pub updates: Vec<DetailsUpdate>,
}

/// Payload for one check-in completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub booking_ref: String,
    pub passenger_ids: Vec<String>,
}

/// The check-in flow controller.
///
/// Owns the session and form state, maps user events to guarded step
/// transitions and orchestrates the booking-service calls. Service
/// failures become notifications at this boundary; raw errors never
/// reach session or form state.
///
/// The async operations come in two shapes. The `begin_*`/`finish_*`
/// pairs stamp a per-kind busy flag and capture the session epoch in a
/// [`CompletionToken`]; a finish presenting an outdated token is dropped,
/// which is how a completion racing a session reset is neutralized. The
/// `submit_*`/`accept_*` wrappers drive the service call between the two
/// phases for embeddings that just want to await the outcome.
pub struct FlowController {
    session: CheckinSession,
    form: PassengerFormState,
    service: Arc<dyn BookingService>,
    notifier: Arc<dyn Notifier>,
    default_country_code: String,
    current: Step,
    epoch: u64,
    lookup_busy: bool,
    update_busy: bool,
    completion_busy: bool,
    booking_ref_input: String,
    last_name_input: String,
    declaration_accepted: bool,
    cancel_armed: bool,
}

impl FlowController {
    pub fn new(
        service: Arc<dyn BookingService>,
        notifier: Arc<dyn Notifier>,
        default_country_code: &str,
    ) -> Self {
        Self {
            session: CheckinSession::new(),
            form: PassengerFormState::new(),
            service,
            notifier,
            default_country_code: default_country_code.to_string(),
            current: Step::FindBooking,
            epoch: 0,
            lookup_busy: false,
            update_busy: false,
            completion_busy: false,
            booking_ref_input: String::new(),
            last_name_input: String::new(),
            declaration_accepted: false,
            cancel_armed: false,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn progress_percent(&self) -> u8 {
        self.current.progress_percent()
    }

    pub fn session(&self) -> &CheckinSession {
        &self.session
    }

    pub fn form(&self) -> &PassengerFormState {
        &self.form
    }

    // ---- find-booking ----

    pub fn set_booking_ref(&mut self, value: &str) {
        self.booking_ref_input = value.to_string();
    }

    pub fn set_last_name(&mut self, value: &str) {
        self.last_name_input = value.to_string();
    }

    pub fn booking_ref_input(&self) -> &str {
        &self.booking_ref_input
    }

    pub fn last_name_input(&self) -> &str {
        &self.last_name_input
    }

    /// Input gate for the lookup submit control: trimmed last name
    /// longer than one character and a reference of at least six.
    pub fn can_submit_lookup(&self) -> bool {
        self.last_name_input.trim().len() > 1 && self.booking_ref_input.trim().len() >= 6
    }

    pub fn lookup_in_flight(&self) -> bool {
        self.lookup_busy
    }

    /// Start a booking lookup. Rejects a duplicate submit while one is
    /// in flight and inputs that fail the submit gate. Reference and
    /// last name are upper-cased on the way out.
    pub fn begin_lookup(&mut self) -> Result<(CompletionToken, LookupRequest), FlowOutcome> {
        if self.lookup_busy {
            return Err(FlowOutcome::Busy);
        }
        if !self.can_submit_lookup() {
            return Err(FlowOutcome::Stayed);
        }
        self.lookup_busy = true;
        let request = LookupRequest {
            booking_ref: self.booking_ref_input.trim().to_ascii_uppercase(),
            last_name: self.last_name_input.trim().to_ascii_uppercase(),
        };
        tracing::info!("looking up booking {}", request.booking_ref);
        Ok((self.token(), request))
    }

    /// Apply a lookup result. On success the normalized booking replaces
    /// the session's and the flow advances to passenger selection; on
    /// failure one notification is shown and the typed inputs stay.
    pub fn finish_lookup(
        &mut self,
        token: CompletionToken,
        result: Result<BookingDto, ServiceError>,
    ) -> FlowOutcome {
        if !self.token_valid(token, self.lookup_busy) {
            tracing::info!("dropping stale lookup completion");
            return FlowOutcome::Stale;
        }
        self.lookup_busy = false;
        match result.and_then(normalize::booking_from_wire) {
            Ok(booking) => {
                tracing::info!("retrieved booking {}", booking.booking_ref);
                self.session.set_booking(booking);
                self.declaration_accepted = false;
                self.enter(Step::SelectPassengers);
                FlowOutcome::Advanced(Step::SelectPassengers)
            }
            Err(err) => {
                self.notify_failure("Booking lookup", &err);
                FlowOutcome::Stayed
            }
        }
    }

    /// Begin a lookup, drive the service call and finish it.
    pub async fn submit_lookup(&mut self) -> FlowOutcome {
        let (token, request) = match self.begin_lookup() {
            Ok(parts) => parts,
            Err(outcome) => return outcome,
        };
        let service = Arc::clone(&self.service);
        let result = service
            .start_checkin(&request.booking_ref, &request.last_name)
            .await;
        self.finish_lookup(token, result)
    }

    // ---- select-passengers ----

    pub fn toggle_passenger(&mut self, key: &PaxKey) {
        let mut keys = self.session.selected_keys().to_vec();
        match keys.iter().position(|k| k == key) {
            Some(pos) => {
                keys.remove(pos);
            }
            None => keys.push(key.clone()),
        }
        self.session.set_selected_passengers(keys);
    }

    pub fn select_all(&mut self) {
        let keys = self
            .session
            .booking()
            .map(|b| b.passengers.iter().map(|p| p.key()).collect())
            .unwrap_or_default();
        self.session.set_selected_passengers(keys);
    }

    /// Confirm the selection and move on. An empty selection never
    /// advances. An all-infant selection skips the details step; every
    /// other selection gets one form draft per selected passenger.
    pub fn confirm_selection(&mut self) -> FlowOutcome {
        let next = {
            let selected = self.session.selected_passengers();
            if selected.is_empty() {
                return FlowOutcome::Stayed;
            }
            next_step_after_selection(&selected)
        };
        if next == Step::PassengerDetails {
            self.seed_details_form();
        }
        self.enter(next);
        FlowOutcome::Advanced(next)
    }

    // ---- passenger-details ----

    pub fn update_detail(&mut self, key: &PaxKey, field: DetailField, value: &str) {
        self.form.update_field(key, field, value);
    }

    pub fn touch_detail(&mut self, key: &PaxKey, field: DetailField) {
        self.form.set_touched(key, field);
    }

    pub fn set_country_code(&mut self, key: &PaxKey, code: &str) {
        self.form.set_country_code(key, code);
    }

    pub fn detail_error(&self, key: &PaxKey, field: DetailField) -> Option<&'static str> {
        self.form.field_error(key, field)
    }

    /// True when every selected passenger has a draft and every draft
    /// validates. A selected passenger with no draft counts as invalid.
    pub fn details_valid(&self) -> bool {
        self.form.is_valid(self.session.selected_keys())
    }

    pub fn update_in_flight(&self) -> bool {
        self.update_busy
    }

    /// Start the batch detail update covering every selected passenger.
    /// Rejected while any selected passenger is missing a draft or a
    /// draft fails validation; the batch never silently narrows.
    pub fn begin_details_update(
        &mut self,
    ) -> Result<(CompletionToken, DetailsRequest), FlowOutcome> {
        if self.update_busy {
            return Err(FlowOutcome::Busy);
        }
        if !self.form.is_valid(self.session.selected_keys()) {
            return Err(FlowOutcome::Stayed);
        }
        let Some(booking_ref) = self.session.booking().map(|b| b.booking_ref.clone()) else {
            return Err(FlowOutcome::Stayed);
        };
        let keys = self.session.selected_keys();
        let mut updates = Vec::with_capacity(keys.len());
        for key in keys {
            let (Some(nationality), Some(phone)) = (
                self.form.field_value(key, DetailField::Nationality),
                self.form.field_value(key, DetailField::Phone),
            ) else {
                return Err(FlowOutcome::Stayed);
            };
            updates.push(DetailsUpdate {
                passenger_id: key.as_str().to_string(),
                phone_number: phone.trim().to_string(),
                nationality: nationality.trim().to_string(),
                document_number: None,
            });
        }
        if updates.is_empty() {
            return Err(FlowOutcome::Stayed);
        }
        self.update_busy = true;
        tracing::info!("submitting details for {} passengers", updates.len());
        Ok((
            self.token(),
            DetailsRequest {
                booking_ref,
                updates,
            },
        ))
    }

    /// Apply a batch update result. Success merges the drafts into the
    /// session, writes the confirmed passenger data back onto the
    /// booking and advances to the declaration. Failure means nothing
    /// was saved: one notification, drafts kept for retry.
    pub fn finish_details_update(
        &mut self,
        token: CompletionToken,
        result: Result<Vec<PassengerDto>, ServiceError>,
    ) -> FlowOutcome {
        if !self.token_valid(token, self.update_busy) {
            tracing::info!("dropping stale details completion");
            return FlowOutcome::Stale;
        }
        self.update_busy = false;
        match result {
            Ok(updated) => {
                let captured = self.form.captured_details();
                self.session.merge_details(captured);
                for dto in updated {
                    let passenger = normalize::passenger_from_wire(dto);
                    self.session.apply_passenger_update(&passenger);
                }
                self.enter(Step::Declaration);
                FlowOutcome::Advanced(Step::Declaration)
            }
            Err(err) => {
                self.notify_failure("Passenger details", &err);
                FlowOutcome::Stayed
            }
        }
    }

    /// Begin the batch update, drive the service call and finish it.
    pub async fn submit_details(&mut self) -> FlowOutcome {
        let (token, request) = match self.begin_details_update() {
            Ok(parts) => parts,
            Err(outcome) => return outcome,
        };
        let service = Arc::clone(&self.service);
        let result = service
            .update_passenger_details(&request.booking_ref, &request.updates)
            .await;
        self.finish_details_update(token, result)
    }

    // ---- declaration ----

    pub fn set_declaration_accepted(&mut self, accepted: bool) {
        self.declaration_accepted = accepted;
    }

    pub fn declaration_accepted(&self) -> bool {
        self.declaration_accepted
    }

    pub fn completion_in_flight(&self) -> bool {
        self.completion_busy
    }

    /// Start check-in completion for the selected passengers. Requires
    /// the declaration to be accepted first.
    pub fn begin_completion(
        &mut self,
    ) -> Result<(CompletionToken, CompletionRequest), FlowOutcome> {
        if self.completion_busy {
            return Err(FlowOutcome::Busy);
        }
        if !self.declaration_accepted {
            return Err(FlowOutcome::Stayed);
        }
        let Some(booking_ref) = self.session.booking().map(|b| b.booking_ref.clone()) else {
            return Err(FlowOutcome::Stayed);
        };
        let passenger_ids: Vec<String> = self
            .session
            .selected_keys()
            .iter()
            .map(|key| key.as_str().to_string())
            .collect();
        if passenger_ids.is_empty() {
            return Err(FlowOutcome::Stayed);
        }
        self.completion_busy = true;
        tracing::info!("completing check-in for {}", booking_ref);
        Ok((
            self.token(),
            CompletionRequest {
                booking_ref,
                passenger_ids,
            },
        ))
    }

    /// Apply a completion result. Success stores the updated booking
    /// (seats, boarding data, pass URL) and enters the boarding-pass
    /// step; failure stays on the declaration with one notification.
    pub fn finish_completion(
        &mut self,
        token: CompletionToken,
        result: Result<BookingDto, ServiceError>,
    ) -> FlowOutcome {
        if !self.token_valid(token, self.completion_busy) {
            tracing::info!("dropping stale check-in completion");
            return FlowOutcome::Stale;
        }
        self.completion_busy = false;
        match result.and_then(normalize::booking_from_wire) {
            Ok(booking) => {
                self.session.set_booking(booking);
                self.enter(Step::BoardingPass);
                FlowOutcome::Advanced(Step::BoardingPass)
            }
            Err(err) => {
                self.notify_failure("Check-in", &err);
                FlowOutcome::Stayed
            }
        }
    }

    /// Accept the declaration: record the dangerous-goods
    /// acknowledgement (best-effort) and complete check-in.
    pub async fn accept_declaration(&mut self) -> FlowOutcome {
        let (token, request) = match self.begin_completion() {
            Ok(parts) => parts,
            Err(outcome) => return outcome,
        };
        let service = Arc::clone(&self.service);
        if let Err(err) = service.acknowledge_dangerous_goods(&request.booking_ref).await {
            // the flow proceeds regardless
            tracing::warn!("dangerous-goods acknowledgement failed: {}", err);
        }
        let result = service
            .complete_checkin(&request.booking_ref, &request.passenger_ids)
            .await;
        self.finish_completion(token, result)
    }

    // ---- navigation ----

    /// Navigate to a step, honoring the guards. A request the session
    /// does not admit lands on the nearest earlier step instead.
    /// Landing on the details step reseeds the form from the current
    /// selection, whichever route led there.
    pub fn request_step(&mut self, requested: Step) -> FlowOutcome {
        let resolved = requested.resolve(&self.session);
        if resolved == Step::PassengerDetails {
            self.seed_details_form();
        }
        self.enter(resolved);
        if resolved == requested {
            FlowOutcome::Advanced(resolved)
        } else {
            tracing::warn!(
                "redirected {} to {}",
                requested.as_path(),
                resolved.as_path()
            );
            FlowOutcome::Redirected(resolved)
        }
    }

    /// Go one step back. Always succeeds (a no-op on the first step) and
    /// never clears session state; drafts for still-selected passengers
    /// survive a return to the details step. An all-infant flow skips
    /// the details step in this direction too.
    pub fn back(&mut self) -> FlowOutcome {
        let Some(mut previous) = self.current.previous() else {
            return FlowOutcome::Stayed;
        };
        if previous == Step::PassengerDetails && self.session.all_selected_infants() {
            previous = Step::SelectPassengers;
        }
        let resolved = previous.resolve(&self.session);
        if resolved == Step::PassengerDetails {
            self.seed_details_form();
        }
        self.enter(resolved);
        FlowOutcome::MovedBack(resolved)
    }

    // ---- cancel ----

    /// First stage of cancelling: arm the confirmation prompt.
    pub fn request_cancel(&mut self) -> FlowOutcome {
        self.cancel_armed = true;
        FlowOutcome::Stayed
    }

    pub fn dismiss_cancel(&mut self) {
        self.cancel_armed = false;
    }

    pub fn cancel_armed(&self) -> bool {
        self.cancel_armed
    }

    /// Second stage of cancelling: reset the whole session and return to
    /// the entry step. Ignored unless the prompt was armed first.
    pub fn confirm_cancel(&mut self) -> FlowOutcome {
        if !self.cancel_armed {
            return FlowOutcome::Stayed;
        }
        self.reset();
        FlowOutcome::Redirected(Step::FindBooking)
    }

    /// The sole full-session exit. Bumps the epoch so in-flight
    /// completions from before the reset are dropped.
    fn reset(&mut self) {
        tracing::info!("session reset");
        self.session.reset();
        self.form.reset();
        self.epoch += 1;
        self.lookup_busy = false;
        self.update_busy = false;
        self.completion_busy = false;
        self.booking_ref_input.clear();
        self.last_name_input.clear();
        self.declaration_accepted = false;
        self.cancel_armed = false;
        self.enter(Step::FindBooking);
    }

    /// (Re)seed one draft per currently selected passenger. Every route
    /// into the details step passes through here, so the drafts always
    /// track the selection; values already typed for still-selected
    /// passengers are kept.
    fn seed_details_form(&mut self) {
        let selected = self.session.selected_passengers();
        self.form.initialize(&selected, &self.default_country_code);
    }

    fn enter(&mut self, step: Step) {
        if step != self.current {
            tracing::info!("step {} -> {}", self.current.as_path(), step.as_path());
        }
        self.current = step;
    }

    fn token(&self) -> CompletionToken {
        CompletionToken { epoch: self.epoch }
    }

    /// A finish is only applied when its token matches the current epoch
    /// and an operation of that kind is actually in flight.
    fn token_valid(&self, token: CompletionToken, busy: bool) -> bool {
        token.epoch == self.epoch && busy
    }

    fn notify_failure(&self, title: &str, err: &ServiceError) {
        tracing::warn!("{} failed: {}", title, err);
        self.notifier
            .show_message(title, &err.user_message, Severity::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetway_service::mock::seed_booking;
    use jetway_service::{MockBookingService, RecordingNotifier};

    fn controller() -> (FlowController, Arc<RecordingNotifier>) {
        let service = Arc::new(MockBookingService::with_seed_data(0));
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = FlowController::new(service, notifier.clone(), "+66");
        (controller, notifier)
    }

    #[test]
    fn submit_gate_needs_both_inputs() {
        let (mut controller, _) = controller();
        assert!(matches!(controller.begin_lookup(), Err(FlowOutcome::Stayed)));

        controller.set_booking_ref("ABC123");
        controller.set_last_name("H");
        assert!(!controller.can_submit_lookup());

        controller.set_last_name("HUUM");
        assert!(controller.can_submit_lookup());

        controller.set_booking_ref("ABC12");
        assert!(!controller.can_submit_lookup());
    }

    #[test]
    fn lookup_request_is_trimmed_and_upper_cased() {
        let (mut controller, _) = controller();
        controller.set_booking_ref("  abc123 ");
        controller.set_last_name(" huum ");

        let (_, request) = controller.begin_lookup().unwrap();
        assert_eq!(request.booking_ref, "ABC123");
        assert_eq!(request.last_name, "HUUM");
    }

    #[test]
    fn duplicate_lookup_is_rejected_while_in_flight() {
        let (mut controller, _) = controller();
        controller.set_booking_ref("ABC123");
        controller.set_last_name("HUUM");

        let _pending = controller.begin_lookup().unwrap();
        assert!(matches!(controller.begin_lookup(), Err(FlowOutcome::Busy)));
    }

    #[test]
    fn completion_from_before_a_reset_is_dropped() {
        let (mut controller, _) = controller();
        controller.set_booking_ref("ABC123");
        controller.set_last_name("HUUM");
        let (token, _) = controller.begin_lookup().unwrap();

        controller.request_cancel();
        controller.confirm_cancel();

        let outcome = controller.finish_lookup(token, Ok(seed_booking()));
        assert_eq!(outcome, FlowOutcome::Stale);
        assert!(controller.session().booking().is_none());
        assert_eq!(controller.current_step(), Step::FindBooking);
    }

    #[test]
    fn a_finish_without_a_begin_is_dropped() {
        let (mut controller, _) = controller();
        controller.set_booking_ref("ABC123");
        controller.set_last_name("HUUM");
        let (token, _) = controller.begin_lookup().unwrap();

        assert_eq!(
            controller.finish_lookup(token, Ok(seed_booking())),
            FlowOutcome::Advanced(Step::SelectPassengers)
        );
        // same token presented again
        assert_eq!(
            controller.finish_lookup(token, Ok(seed_booking())),
            FlowOutcome::Stale
        );
    }

    #[test]
    fn cancel_needs_the_armed_prompt() {
        let (mut controller, _) = controller();
        assert_eq!(controller.confirm_cancel(), FlowOutcome::Stayed);

        controller.request_cancel();
        assert!(controller.cancel_armed());
        controller.dismiss_cancel();
        assert_eq!(controller.confirm_cancel(), FlowOutcome::Stayed);
    }

    #[test]
    fn empty_selection_never_advances() {
        let (mut controller, _) = controller();
        controller.set_booking_ref("ABC123");
        controller.set_last_name("HUUM");
        let (token, _) = controller.begin_lookup().unwrap();
        controller.finish_lookup(token, Ok(seed_booking()));

        assert_eq!(controller.confirm_selection(), FlowOutcome::Stayed);
        assert_eq!(controller.current_step(), Step::SelectPassengers);
    }
}
