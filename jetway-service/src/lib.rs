pub mod api;
pub mod config;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod notify;

pub use api::{BookingDto, BookingService, DetailsUpdate, PassengerDto, SegmentDto};
pub use config::AppConfig;
pub use error::ServiceError;
pub use mock::MockBookingService;
pub use notify::{Notifier, RecordingNotifier, Severity, TracingNotifier};
