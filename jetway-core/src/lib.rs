pub mod country;
pub mod identity;
pub mod models;
pub mod validation;

pub use country::{country_for_dial, CountryCode, COUNTRY_CODES, DEFAULT_COUNTRY_CODE};
pub use identity::PaxKey;
pub use models::{
    Booking, FlightSegment, Passenger, PassengerExtraDetails, PaxType, SegmentEndpoint,
    SegmentStatus,
};
pub use validation::{validate_nationality, validate_phone, DetailField, ErrorKind};
