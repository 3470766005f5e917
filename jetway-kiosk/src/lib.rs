pub mod screens;

pub use screens::{
    BoardingPassCard, BoardingPassView, DeclarationView, DetailsCard, DetailsFieldView,
    FindBookingView, PassengerDetailsView, PassengerRow, SelectPassengersView,
};
