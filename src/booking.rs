use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use crate::{
    data::{Catalog, Seat, NO_MEAL},
    error::BookingError,
    prediction::{ConfidenceBand, ConfirmationEstimator, LeadTimeEstimator},
    pricing::{meal_cost, seat_cost},
    route::RouteTable,
};

pub const MAX_PASSENGERS: usize = 6;
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    Search,
    Seats,
    Meals,
    Details,
    Confirmation,
    MyBookings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub passengers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatSelection {
    pub seats: Vec<String>,
    pub total_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealSelection {
    /// Meal id per seat id, `none` for skipped meals.
    pub meals: BTreeMap<String, String>,
    pub total_meal_price: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            other => Err(format!("unknown gender {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passenger {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerDetails {
    pub passengers: Vec<Passenger>,
    pub contact: Contact,
}

impl PassengerDetails {
    fn validate(&self, expected: usize) -> Result<(), BookingError> {
        let incomplete = |reason: String| Err(BookingError::IncompleteDetails { reason });

        if self.passengers.len() != expected {
            return incomplete(format!(
                "expected {} passengers, got {}",
                expected,
                self.passengers.len()
            ));
        }
        for (index, passenger) in self.passengers.iter().enumerate() {
            if passenger.name.trim().is_empty() {
                return incomplete(format!("passenger {} has no name", index + 1));
            }
            if !(1..=MAX_AGE).contains(&passenger.age) {
                return incomplete(format!(
                    "passenger {} has age {} outside 1..={}",
                    index + 1,
                    passenger.age,
                    MAX_AGE
                ));
            }
        }
        if self.contact.email.trim().is_empty() {
            return incomplete("email is missing".to_owned());
        }
        if self.contact.phone.trim().is_empty() {
            return incomplete("phone is missing".to_owned());
        }
        if !self.contact.phone.chars().all(is_phone_char) {
            return incomplete(format!("phone {:?} is not a number", self.contact.phone));
        }
        Ok(())
    }
}

/// Digits, `+`, `-` and whitespace.
fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || c == '+' || c == '-' || c.is_whitespace()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: String,
    pub search: SearchQuery,
    pub seats: SeatSelection,
    pub meals: MealSelection,
    pub details: PassengerDetails,
    pub confirmation_probability: u8,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
}

impl Booking {
    pub fn total_amount(&self) -> i64 {
        self.seats.total_price + self.meals.total_meal_price
    }

    pub fn route(&self, route: &RouteTable) -> Vec<String> {
        route.intermediate_stations(&self.search.from, &self.search.to)
    }

    pub fn distance_km(&self, route: &RouteTable) -> i64 {
        route.distance(&self.search.from, &self.search.to)
    }

    pub fn confidence(&self) -> ConfidenceBand {
        ConfidenceBand::from_probability(self.confirmation_probability)
    }

    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.search.date > today
    }
}

/// One traveller's walk through search, seats, meals and details, plus every
/// booking made so far. Bookings are only ever appended; cancelling flips
/// their status.
pub struct Session<E = LeadTimeEstimator> {
    catalog: Arc<Catalog>,
    estimator: E,
    today: NaiveDate,

    step: Step,
    search: Option<SearchQuery>,
    fare: i64,
    selected_seats: Vec<String>,
    seats: Option<SeatSelection>,
    meal_choices: BTreeMap<String, String>,
    meals: Option<MealSelection>,
    current: Option<usize>,

    bookings: Vec<Booking>,
    last_id_millis: i64,
}

impl Session<LeadTimeEstimator> {
    pub fn new(catalog: Arc<Catalog>, today: NaiveDate) -> Self {
        Self::with_estimator(catalog, today, LeadTimeEstimator::default())
    }
}

impl<E: ConfirmationEstimator> Session<E> {
    pub fn with_estimator(catalog: Arc<Catalog>, today: NaiveDate, estimator: E) -> Self {
        Self {
            catalog,
            estimator,
            today,
            step: Step::Search,
            search: None,
            fare: 0,
            selected_seats: Vec::default(),
            seats: None,
            meal_choices: BTreeMap::default(),
            meals: None,
            current: None,
            bookings: Vec::default(),
            last_id_millis: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn search(&self) -> Option<&SearchQuery> {
        self.search.as_ref()
    }

    /// Per-seat fare of the trip being booked.
    pub fn fare(&self) -> i64 {
        self.fare
    }

    pub fn selected_seats(&self) -> &[String] {
        &self.selected_seats
    }

    pub fn meal_choices(&self) -> &BTreeMap<String, String> {
        &self.meal_choices
    }

    pub fn current_booking(&self) -> Option<&Booking> {
        self.current.and_then(|index| self.bookings.get(index))
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    pub fn is_selected(&self, seat_id: &str) -> bool {
        self.selected_seats.iter().any(|id| id == seat_id)
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), BookingError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(BookingError::WrongStep {
                action,
                actual: self.step,
            })
        }
    }

    fn move_to(&mut self, step: Step) {
        log::debug!("Moving from {:?} to {:?}", self.step, step);
        self.step = step;
    }

    pub fn submit_search(&mut self, query: SearchQuery) -> Result<(), BookingError> {
        self.expect_step(Step::Search, "Searching")?;

        let route = &self.catalog.route;
        for name in [&query.from, &query.to] {
            if route.index(name).is_none() {
                return Err(BookingError::UnknownStation {
                    name: name.to_owned(),
                });
            }
        }
        if query.from == query.to {
            return Err(BookingError::SameStation);
        }
        if !route.is_valid_trip(&query.from, &query.to) {
            return Err(BookingError::InvalidDirection {
                from: query.from,
                to: query.to,
            });
        }
        if !(1..=MAX_PASSENGERS).contains(&query.passengers) {
            return Err(BookingError::PassengerCount {
                count: query.passengers,
                max: MAX_PASSENGERS,
            });
        }
        if query.date < self.today {
            return Err(BookingError::DateInPast {
                date: query.date,
                today: self.today,
            });
        }

        self.fare = route.fare(&self.catalog.fares, &query.from, &query.to);
        log::info!(
            "Searching {} -> {} on {} for {} passengers at {} per seat",
            query.from,
            query.to,
            query.date,
            query.passengers,
            self.fare
        );

        self.search = Some(query);
        self.selected_seats.clear();
        self.move_to(Step::Seats);
        Ok(())
    }

    /// Selects a free seat or releases one already selected. Returns whether
    /// the seat is selected afterwards.
    pub fn toggle_seat(&mut self, seat_id: &str) -> Result<bool, BookingError> {
        self.expect_step(Step::Seats, "Selecting seats")?;

        let seat = self
            .catalog
            .seats
            .seat(seat_id)
            .ok_or_else(|| BookingError::UnknownSeat {
                seat_id: seat_id.to_owned(),
            })?;
        if !seat.status.is_selectable() {
            return Err(BookingError::SeatUnavailable {
                seat_id: seat_id.to_owned(),
            });
        }

        if let Some(position) = self.selected_seats.iter().position(|id| id == seat_id) {
            self.selected_seats.remove(position);
            log::debug!("Released seat {}", seat_id);
            return Ok(false);
        }

        let limit = self.passenger_count();
        if self.selected_seats.len() >= limit {
            return Err(BookingError::SeatLimitReached { limit });
        }
        self.selected_seats.push(seat_id.to_owned());
        log::debug!("Selected seat {}", seat_id);
        Ok(true)
    }

    pub fn confirm_seats(&mut self) -> Result<&SeatSelection, BookingError> {
        self.expect_step(Step::Seats, "Confirming seats")?;

        let expected = self.passenger_count();
        if self.selected_seats.len() != expected {
            return Err(BookingError::SeatCountMismatch {
                expected,
                selected: self.selected_seats.len(),
            });
        }

        self.meal_choices = self
            .selected_seats
            .iter()
            .map(|seat| (seat.to_owned(), NO_MEAL.to_owned()))
            .collect();
        self.move_to(Step::Meals);

        Ok(&*self.seats.insert(SeatSelection {
            seats: self.selected_seats.clone(),
            total_price: seat_cost(self.fare, self.selected_seats.len()),
        }))
    }

    pub fn choose_meal(&mut self, seat_id: &str, meal_id: &str) -> Result<(), BookingError> {
        self.expect_step(Step::Meals, "Choosing meals")?;

        if self.catalog.meals.get(meal_id).is_none() {
            return Err(BookingError::UnknownMeal {
                meal_id: meal_id.to_owned(),
            });
        }
        let choice = self
            .meal_choices
            .get_mut(seat_id)
            .ok_or_else(|| BookingError::SeatNotSelected {
                seat_id: seat_id.to_owned(),
            })?;
        *choice = meal_id.to_owned();
        Ok(())
    }

    pub fn confirm_meals(&mut self) -> Result<&MealSelection, BookingError> {
        self.expect_step(Step::Meals, "Confirming meals")?;

        let total_meal_price = meal_cost(
            &self.catalog.meals,
            self.meal_choices.values().map(String::as_str),
        );
        self.move_to(Step::Details);

        Ok(&*self.meals.insert(MealSelection {
            meals: self.meal_choices.clone(),
            total_meal_price,
        }))
    }

    pub fn submit_details(&mut self, details: PassengerDetails) -> Result<&Booking, BookingError> {
        self.expect_step(Step::Details, "Submitting passenger details")?;

        let (Some(search), Some(seats), Some(meals)) =
            (self.search.clone(), self.seats.clone(), self.meals.clone())
        else {
            return Err(BookingError::WrongStep {
                action: "Submitting passenger details",
                actual: self.step,
            });
        };
        details.validate(search.passengers)?;

        let lead_time_days = (search.date - self.today).num_days();
        let confirmation_probability = self.estimator.estimate(lead_time_days, seats.seats.len());

        let now = Utc::now();
        self.last_id_millis = now.timestamp_millis().max(self.last_id_millis + 1);
        let booking = Booking {
            id: format!("BKG{}", self.last_id_millis),
            search,
            seats,
            meals,
            details,
            confirmation_probability,
            status: BookingStatus::Confirmed,
            booking_date: now,
        };
        log::info!(
            "Booked {} for {} ({}% likely to confirm)",
            booking.id,
            booking.total_amount(),
            confirmation_probability
        );

        self.bookings.push(booking);
        self.current = Some(self.bookings.len() - 1);
        self.move_to(Step::Confirmation);

        Ok(&self.bookings[self.bookings.len() - 1])
    }

    /// Steps back one screen. The screen returned to starts over with its
    /// own selection cleared.
    pub fn back(&mut self) -> Result<Step, BookingError> {
        let previous = match self.step {
            Step::Seats | Step::MyBookings => Step::Search,
            Step::Meals => {
                self.selected_seats.clear();
                self.seats = None;
                Step::Seats
            }
            Step::Details => {
                for choice in self.meal_choices.values_mut() {
                    *choice = NO_MEAL.to_owned();
                }
                self.meals = None;
                Step::Meals
            }
            Step::Search | Step::Confirmation => {
                return Err(BookingError::WrongStep {
                    action: "Going back",
                    actual: self.step,
                })
            }
        };
        self.move_to(previous);
        Ok(previous)
    }

    pub fn view_bookings(&mut self) -> Result<&[Booking], BookingError> {
        match self.step {
            Step::Search | Step::Confirmation | Step::MyBookings => {
                self.move_to(Step::MyBookings);
                Ok(self.bookings.as_slice())
            }
            actual => Err(BookingError::WrongStep {
                action: "Viewing bookings",
                actual,
            }),
        }
    }

    /// Drops the draft and starts again from the search screen. Bookings stay.
    pub fn new_booking(&mut self) {
        self.search = None;
        self.fare = 0;
        self.selected_seats.clear();
        self.seats = None;
        self.meal_choices.clear();
        self.meals = None;
        self.current = None;
        self.move_to(Step::Search);
    }

    /// Only upcoming, confirmed bookings can be cancelled.
    pub fn cancel(&mut self, booking_id: &str) -> Result<&Booking, BookingError> {
        let today = self.today;
        let booking = self
            .bookings
            .iter_mut()
            .find(|booking| booking.id == booking_id)
            .ok_or_else(|| BookingError::BookingNotFound {
                booking_id: booking_id.to_owned(),
            })?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled {
                booking_id: booking_id.to_owned(),
            });
        }
        if !booking.is_upcoming(today) {
            return Err(BookingError::JourneyDeparted {
                booking_id: booking_id.to_owned(),
                date: booking.search.date,
            });
        }

        booking.status = BookingStatus::Cancelled;
        log::info!("Cancelled {}", booking_id);
        Ok(&*booking)
    }

    /// Seats with their catalog status and whether this session holds them.
    pub fn seat_map(&self) -> Vec<(&Seat, bool)> {
        self.catalog
            .seats
            .seats()
            .iter()
            .map(|seat| (seat, self.is_selected(&seat.id)))
            .collect()
    }

    fn passenger_count(&self) -> usize {
        self.search.as_ref().map_or(0, |search| search.passengers)
    }
}
