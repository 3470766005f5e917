use jetway_core::Passenger;

use crate::session::CheckinSession;

/// The five check-in steps, in flow order. The route path is a view of
/// this enum, never the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    FindBooking,
    SelectPassengers,
    PassengerDetails,
    Declaration,
    BoardingPass,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::FindBooking,
        Step::SelectPassengers,
        Step::PassengerDetails,
        Step::Declaration,
        Step::BoardingPass,
    ];

    pub fn as_path(self) -> &'static str {
        match self {
            Step::FindBooking => "find-booking",
            Step::SelectPassengers => "select-passengers",
            Step::PassengerDetails => "passenger-details",
            Step::Declaration => "declaration",
            Step::BoardingPass => "boarding-pass",
        }
    }

    pub fn from_path(path: &str) -> Option<Step> {
        Step::ALL.into_iter().find(|step| step.as_path() == path)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::FindBooking => "Find booking",
            Step::SelectPassengers => "Select passengers",
            Step::PassengerDetails => "Passenger details",
            Step::Declaration => "Dangerous goods declaration",
            Step::BoardingPass => "Boarding pass",
        }
    }

    pub fn index(self) -> usize {
        Step::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or(0)
    }

    /// Display-only progress through the five steps, as a percentage.
    pub fn progress_percent(self) -> u8 {
        (((self.index() + 1) * 100) / Step::ALL.len()) as u8
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::ALL[i])
    }

    /// Entry condition for this step against the current session.
    ///
    /// Declaration additionally requires captured details for every
    /// selected passenger, waived when the whole selection is infants.
    pub fn guard_passes(self, session: &CheckinSession) -> bool {
        let booking = session.booking().is_some();
        let selected = !session.selected_keys().is_empty();
        match self {
            Step::FindBooking => true,
            Step::SelectPassengers => booking,
            Step::PassengerDetails => booking && selected,
            Step::Declaration => {
                let details_captured = session
                    .selected_keys()
                    .iter()
                    .all(|key| session.details_for(key).is_some());
                booking && selected && (session.all_selected_infants() || details_captured)
            }
            Step::BoardingPass => booking && selected,
        }
    }

    /// The step actually entered when this one is requested: the first
    /// step at or before it whose guard passes. Walks backward only;
    /// find-booking always passes, so resolution is total.
    pub fn resolve(self, session: &CheckinSession) -> Step {
        Step::ALL[..=self.index()]
            .iter()
            .rev()
            .copied()
            .find(|step| step.guard_passes(session))
            .unwrap_or(Step::FindBooking)
    }
}

/// The step that follows a confirmed passenger selection. The details
/// step is skipped only when every selected passenger is an infant; an
/// empty selection never advances, so it conservatively maps to the
/// details step.
pub fn next_step_after_selection(selection: &[&Passenger]) -> Step {
    let all_infants =
        !selection.is_empty() && selection.iter().all(|p| !p.pax_type.requires_details());
    if all_infants {
        Step::Declaration
    } else {
        Step::PassengerDetails
    }
}
