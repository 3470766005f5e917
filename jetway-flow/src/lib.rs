pub mod controller;
pub mod form;
pub mod session;
pub mod step;

pub use controller::{
    CompletionRequest, CompletionToken, DetailsRequest, FlowController, FlowOutcome, LookupRequest,
};
pub use form::PassengerFormState;
pub use session::CheckinSession;
pub use step::{next_step_after_selection, Step};
