use chrono::NaiveDate;
use thiserror::Error;

use crate::booking::Step;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read {path:?}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {path:?}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("The station table is empty")]
    EmptyRoute,

    #[error("Station {name:?} is listed more than once")]
    DuplicateStation { name: String },

    #[error("Station {name:?} at {distance_km} km does not come after {previous:?}")]
    NonIncreasingDistance {
        name: String,
        previous: String,
        distance_km: i64,
    },

    #[error("No such Seat {seat_id:?} in the layout")]
    UnknownSeat { seat_id: String },

    #[error("Meal {meal_id:?} is listed more than once")]
    DuplicateMeal { meal_id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("{action} is not possible while at step {actual:?}")]
    WrongStep { action: &'static str, actual: Step },

    #[error("No such Station {name:?} on the route")]
    UnknownStation { name: String },

    #[error("Origin and destination cannot be the same station")]
    SameStation,

    #[error("Destination {to:?} must come after origin {from:?}")]
    InvalidDirection { from: String, to: String },

    #[error("Passenger count must be between 1 and {max}, got {count}")]
    PassengerCount { count: usize, max: usize },

    #[error("Travel date {date} is before {today}")]
    DateInPast { date: NaiveDate, today: NaiveDate },

    #[error("No such Seat {seat_id:?} on this bus")]
    UnknownSeat { seat_id: String },

    #[error("Seat {seat_id:?} is already booked")]
    SeatUnavailable { seat_id: String },

    #[error("Already selected {limit} seats, deselect one first")]
    SeatLimitReached { limit: usize },

    #[error("Select exactly {expected} seats, {selected} selected")]
    SeatCountMismatch { expected: usize, selected: usize },

    #[error("Seat {seat_id:?} is not part of the selection")]
    SeatNotSelected { seat_id: String },

    #[error("No such Meal {meal_id:?} on the menu")]
    UnknownMeal { meal_id: String },

    #[error("Passenger details are incomplete: {reason}")]
    IncompleteDetails { reason: String },

    #[error("No such Booking {booking_id:?}")]
    BookingNotFound { booking_id: String },

    #[error("Booking {booking_id:?} is already cancelled")]
    AlreadyCancelled { booking_id: String },

    #[error("Booking {booking_id:?} travelled on {date} and can no longer be cancelled")]
    JourneyDeparted { booking_id: String, date: NaiveDate },
}
