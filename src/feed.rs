use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::LoadError;

const STATIONS_CSV: &str = include_str!("../data/stations.csv");
const SEATS_CSV: &str = include_str!("../data/seats.csv");
const MEALS_CSV: &str = include_str!("../data/meals.csv");

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    pub distance_km: i64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatOverride {
    Booked,
    Female,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub seat_id: String,
    pub status: SeatOverride,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MealKind {
    Veg,
    NonVeg,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub kind: MealKind,
}

/// Raw rows of a route, seat and meal feed, as they appear on disk.
#[derive(Debug, Clone)]
pub struct Feed {
    pub stations: Vec<Station>,
    pub seats: Vec<Seat>,
    pub meals: Vec<Meal>,
}

impl Feed {
    /// The feed compiled into the binary from `data/`.
    pub fn builtin() -> Result<Self, LoadError> {
        Ok(Self {
            stations: deserialize_str("stations.csv", STATIONS_CSV)?,
            seats: deserialize_str("seats.csv", SEATS_CSV)?,
            meals: deserialize_str("meals.csv", MEALS_CSV)?,
        })
    }

    /// Reads `stations.csv`, `seats.csv` and `meals.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        log::info!("Processing stations");
        let stations = deserialize_file(&dir.join("stations.csv"))?;

        log::info!("Processing seats");
        let seats = deserialize_file(&dir.join("seats.csv"))?;

        log::info!("Processing meals");
        let meals = deserialize_file(&dir.join("meals.csv"))?;

        Ok(Self {
            stations,
            seats,
            meals,
        })
    }
}

fn deserialize_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    deserialize_str(&display, &contents)
}

fn deserialize_str<T: serde::de::DeserializeOwned>(
    path: &str,
    contents: &str,
) -> Result<Vec<T>, LoadError> {
    let records = csv::Reader::from_reader(contents.as_bytes())
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Csv {
            path: path.to_owned(),
            source,
        })?;
    log::debug!("Read {} records from {}", records.len(), path);
    Ok(records)
}
