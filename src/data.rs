use itertools::*;
use serde::Serialize;
use std::{collections::HashMap, fmt};

use crate::{
    error::LoadError,
    feed::{self, Feed, SeatOverride},
    route::{FareConfig, RouteTable},
};

pub const BERTHS_PER_DECK: u32 = 16;
pub const NO_MEAL: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Station {
    pub name: String,
    pub distance_km: i64,
}

impl Station {
    pub fn new(name: &str, distance_km: i64) -> Self {
        Self {
            name: name.to_owned(),
            distance_km,
        }
    }
}

impl From<feed::Station> for Station {
    fn from(value: feed::Station) -> Self {
        Self {
            name: value.name,
            distance_km: value.distance_km,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Deck {
    Lower,
    Upper,
}

impl Deck {
    pub fn prefix(self) -> char {
        match self {
            Deck::Lower => 'L',
            Deck::Upper => 'U',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeatStatus {
    Available,
    Booked,
    FemaleReserved,
}

impl SeatStatus {
    pub fn is_selectable(self) -> bool {
        self != SeatStatus::Booked
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeatStatus::Available => "available",
            SeatStatus::Booked => "booked",
            SeatStatus::FemaleReserved => "female",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub id: String,
    pub deck: Deck,
    pub status: SeatStatus,
}

/// Both decks of berths with their current status.
#[derive(Debug, Clone)]
pub struct SeatLayout {
    seats: Vec<Seat>,
}

impl SeatLayout {
    /// Builds `L1..Ln` and `U1..Un`, then applies the status overrides.
    /// A seat listed as both booked and female-reserved ends up booked.
    pub fn new(berths_per_deck: u32, overrides: &[feed::Seat]) -> Result<Self, LoadError> {
        let mut seats = [Deck::Lower, Deck::Upper]
            .into_iter()
            .cartesian_product(1..=berths_per_deck)
            .map(|(deck, berth)| Seat {
                id: format!("{}{}", deck.prefix(), berth),
                deck,
                status: SeatStatus::Available,
            })
            .collect::<Vec<_>>();

        for seat_override in overrides {
            let seat = seats
                .iter_mut()
                .find(|seat| seat.id == seat_override.seat_id)
                .ok_or_else(|| LoadError::UnknownSeat {
                    seat_id: seat_override.seat_id.to_owned(),
                })?;
            seat.status = match (seat.status, seat_override.status) {
                (_, SeatOverride::Booked) | (SeatStatus::Booked, _) => SeatStatus::Booked,
                (_, SeatOverride::Female) => SeatStatus::FemaleReserved,
            };
        }

        Ok(Self { seats })
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, id: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.id == id)
    }

    pub fn decks(&self) -> HashMap<Deck, Vec<&Seat>> {
        self.seats.iter().map(|seat| (seat.deck, seat)).into_group_map()
    }

    pub fn available_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|seat| seat.status.is_selectable())
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MealKind {
    Veg,
    NonVeg,
}

impl From<feed::MealKind> for MealKind {
    fn from(value: feed::MealKind) -> Self {
        match value {
            feed::MealKind::Veg => MealKind::Veg,
            feed::MealKind::NonVeg => MealKind::NonVeg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub kind: MealKind,
}

impl From<feed::Meal> for Meal {
    fn from(value: feed::Meal) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            kind: value.kind.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MealMenu {
    meals: Vec<Meal>,
}

impl MealMenu {
    pub fn new(meals: Vec<Meal>) -> Result<Self, LoadError> {
        if let Some(meal) = meals.iter().duplicates_by(|meal| &meal.id).next() {
            return Err(LoadError::DuplicateMeal {
                meal_id: meal.id.to_owned(),
            });
        }
        Ok(Self { meals })
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn get(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|meal| meal.id == id)
    }

    /// Unknown ids cost nothing, the same as skipping the meal.
    pub fn price(&self, id: &str) -> i64 {
        self.get(id).map_or(0, |meal| meal.price)
    }
}

/// Everything a booking session needs to know about the bus.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub route: RouteTable,
    pub fares: FareConfig,
    pub seats: SeatLayout,
    pub meals: MealMenu,
}

impl Catalog {
    pub fn builtin() -> Result<Self, LoadError> {
        Self::try_from(Feed::builtin()?)
    }
}

impl TryFrom<Feed> for Catalog {
    type Error = LoadError;

    fn try_from(value: Feed) -> Result<Self, Self::Error> {
        let route = RouteTable::new(value.stations.into_iter().map(Station::from).collect())?;
        let seats = SeatLayout::new(BERTHS_PER_DECK, &value.seats)?;
        let meals = MealMenu::new(value.meals.into_iter().map(Meal::from).collect())?;

        log::info!(
            "Loaded {} stations, {} of {} seats open, {} meals",
            route.stations().len(),
            seats.available_count(),
            seats.seats().len(),
            meals.meals().len()
        );

        Ok(Self {
            route,
            fares: FareConfig::default(),
            seats,
            meals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat_override(seat_id: &str, status: SeatOverride) -> feed::Seat {
        feed::Seat {
            seat_id: seat_id.to_owned(),
            status,
        }
    }

    #[test]
    fn layout_has_two_decks_of_sixteen() {
        let layout = SeatLayout::new(BERTHS_PER_DECK, &[]).unwrap();
        let decks = layout.decks();
        assert_eq!(decks[&Deck::Lower].len(), 16);
        assert_eq!(decks[&Deck::Upper].len(), 16);
        assert_eq!(layout.seats()[0].id, "L1");
        assert_eq!(layout.seats()[31].id, "U16");
    }

    #[test]
    fn overrides_mark_booked_and_female_seats() {
        let layout = SeatLayout::new(
            BERTHS_PER_DECK,
            &[
                seat_override("L1", SeatOverride::Booked),
                seat_override("U4", SeatOverride::Female),
            ],
        )
        .unwrap();
        assert_eq!(layout.seat("L1").unwrap().status, SeatStatus::Booked);
        assert_eq!(layout.seat("U4").unwrap().status, SeatStatus::FemaleReserved);
        assert_eq!(layout.seat("L2").unwrap().status, SeatStatus::Available);
        assert_eq!(layout.available_count(), 31);
    }

    #[test]
    fn booked_wins_over_female_in_either_order() {
        let layout = SeatLayout::new(
            BERTHS_PER_DECK,
            &[
                seat_override("L7", SeatOverride::Booked),
                seat_override("L7", SeatOverride::Female),
                seat_override("U7", SeatOverride::Female),
                seat_override("U7", SeatOverride::Booked),
            ],
        )
        .unwrap();
        assert_eq!(layout.seat("L7").unwrap().status, SeatStatus::Booked);
        assert_eq!(layout.seat("U7").unwrap().status, SeatStatus::Booked);
    }

    #[test]
    fn override_for_missing_seat_is_rejected() {
        let err = SeatLayout::new(4, &[seat_override("L9", SeatOverride::Booked)]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSeat { seat_id } if seat_id == "L9"));
    }

    #[test]
    fn unknown_meal_costs_nothing() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.meals.price("chicken-biryani"), 220);
        assert_eq!(catalog.meals.price(NO_MEAL), 0);
        assert_eq!(catalog.meals.price("lobster"), 0);
    }

    #[test]
    fn duplicate_meal_ids_are_rejected() {
        let meal = Meal {
            id: "veg-thali".to_owned(),
            name: "Vegetarian Thali".to_owned(),
            description: String::new(),
            price: 150,
            kind: MealKind::Veg,
        };
        let err = MealMenu::new(vec![meal.clone(), meal]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateMeal { meal_id } if meal_id == "veg-thali"));
    }

    #[test]
    fn builtin_catalog_matches_the_default_bus() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.route.stations().len(), 8);
        assert_eq!(catalog.seats.available_count(), 26);
        assert_eq!(
            catalog.seats.seat("L3").unwrap().status,
            SeatStatus::FemaleReserved
        );
        assert_eq!(catalog.meals.meals().len(), 6);
    }
}
