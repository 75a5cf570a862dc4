//! Route, fare and booking engine for a single sleeper-bus line.
//!
//! The fare lookups in [`route`] never fail: unknown stations fall back to a
//! fixed fare, a zero distance or an empty path. Everything stateful lives in
//! [`booking::Session`].

pub mod booking;
pub mod data;
pub mod error;
pub mod feed;
pub mod prediction;
pub mod pricing;
pub mod route;

pub use booking::{
    Booking, BookingStatus, Contact, Gender, MealSelection, Passenger, PassengerDetails,
    SearchQuery, SeatSelection, Session, Step,
};
pub use data::{Catalog, Deck, Meal, MealKind, MealMenu, Seat, SeatLayout, SeatStatus, Station};
pub use error::{BookingError, LoadError};
pub use prediction::{ConfidenceBand, ConfirmationEstimator, LeadTimeEstimator};
pub use pricing::{meal_cost, seat_cost, Quote};
pub use route::{all_station_names, distance, fare, intermediate_stations, FareConfig, RouteTable};
