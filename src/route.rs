use itertools::*;
use std::sync::LazyLock;

use crate::{data::Station, error::LoadError};

const STANDARD_STATIONS: [(&str, i64); 8] = [
    ("Ahmedabad", 0),
    ("Nadiad", 65),
    ("Anand", 85),
    ("Vadodara", 110),
    ("Bharuch", 180),
    ("Surat", 265),
    ("Vapi", 355),
    ("Mumbai", 525),
];

static STANDARD_ROUTE: LazyLock<RouteTable> = LazyLock::new(|| RouteTable {
    stations: STANDARD_STATIONS
        .iter()
        .map(|&(name, distance_km)| Station::new(name, distance_km))
        .collect(),
});

/// Constants of the distance-proportional fare.
#[derive(Debug, Clone, PartialEq)]
pub struct FareConfig {
    pub base_fare: f64,
    pub per_km: f64,
    pub rounding_step: i64,
    /// Charged when either end of the trip is not on the route.
    pub fallback_fare: i64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare: 200.0,
            per_km: 2.5,
            rounding_step: 50,
            fallback_fare: 1200,
        }
    }
}

impl FareConfig {
    pub fn price_for(&self, distance_km: i64) -> i64 {
        round_half_up(self.base_fare + distance_km as f64 * self.per_km, self.rounding_step)
    }
}

/// Rounds to the nearest multiple of `step`, ties towards positive infinity.
fn round_half_up(value: f64, step: i64) -> i64 {
    (value / step as f64 + 0.5).floor() as i64 * step
}

/// Stations in travel order with their cumulative distance from the first one.
///
/// None of the lookups fail: unknown stations degrade to the fallback fare,
/// a zero distance or an empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    stations: Vec<Station>,
}

impl RouteTable {
    pub fn new(stations: Vec<Station>) -> Result<Self, LoadError> {
        if stations.is_empty() {
            return Err(LoadError::EmptyRoute);
        }

        if let Some(station) = stations.iter().duplicates_by(|station| &station.name).next() {
            return Err(LoadError::DuplicateStation {
                name: station.name.to_owned(),
            });
        }

        if let Some((previous, station)) = stations
            .iter()
            .tuple_windows()
            .find(|(previous, station)| station.distance_km <= previous.distance_km)
        {
            return Err(LoadError::NonIncreasingDistance {
                name: station.name.to_owned(),
                previous: previous.name.to_owned(),
                distance_km: station.distance_km,
            });
        }

        Ok(Self { stations })
    }

    /// Ahmedabad to Mumbai.
    pub fn standard() -> &'static RouteTable {
        &STANDARD_ROUTE
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.stations.iter().position(|station| station.name == name)
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.name == name)
    }

    pub fn fare(&self, fares: &FareConfig, origin: &str, destination: &str) -> i64 {
        match (self.station(origin), self.station(destination)) {
            (Some(from), Some(to)) => fares.price_for(to.distance_km - from.distance_km),
            _ => fares.fallback_fare,
        }
    }

    pub fn intermediate_stations(&self, origin: &str, destination: &str) -> Vec<String> {
        match (self.index(origin), self.index(destination)) {
            (Some(from), Some(to)) if from < to => self.stations[from..=to]
                .iter()
                .map(|station| station.name.to_owned())
                .collect(),
            _ => Vec::default(),
        }
    }

    pub fn distance(&self, origin: &str, destination: &str) -> i64 {
        match (self.station(origin), self.station(destination)) {
            (Some(from), Some(to)) => to.distance_km - from.distance_km,
            _ => 0,
        }
    }

    pub fn all_station_names(&self) -> Vec<String> {
        self.stations
            .iter()
            .map(|station| station.name.to_owned())
            .collect()
    }

    /// Travel only runs forward along the table.
    pub fn is_valid_trip(&self, origin: &str, destination: &str) -> bool {
        matches!(
            (self.index(origin), self.index(destination)),
            (Some(from), Some(to)) if from < to
        )
    }
}

pub fn fare(origin: &str, destination: &str) -> i64 {
    RouteTable::standard().fare(&FareConfig::default(), origin, destination)
}

pub fn intermediate_stations(origin: &str, destination: &str) -> Vec<String> {
    RouteTable::standard().intermediate_stations(origin, destination)
}

pub fn distance(origin: &str, destination: &str) -> i64 {
    RouteTable::standard().distance(origin, destination)
}

pub fn all_station_names() -> Vec<String> {
    RouteTable::standard().all_station_names()
}
