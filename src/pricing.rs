use serde::Serialize;

use crate::data::{Catalog, MealMenu};

pub fn seat_cost(fare: i64, seat_count: usize) -> i64 {
    fare * seat_count as i64
}

pub fn meal_cost<'a>(menu: &MealMenu, meal_ids: impl IntoIterator<Item = &'a str>) -> i64 {
    meal_ids.into_iter().map(|id| menu.price(id)).sum()
}

/// Price breakdown for a trip before any seat is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub from: String,
    pub to: String,
    pub distance_km: i64,
    pub stations: Vec<String>,
    pub fare: i64,
    pub seat_count: usize,
    pub seat_total: i64,
    pub meal_total: i64,
    pub grand_total: i64,
}

impl Quote {
    pub fn new<'a>(
        catalog: &Catalog,
        from: &str,
        to: &str,
        seat_count: usize,
        meal_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let fare = catalog.route.fare(&catalog.fares, from, to);
        let seat_total = seat_cost(fare, seat_count);
        let meal_total = meal_cost(&catalog.meals, meal_ids);

        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            distance_km: catalog.route.distance(from, to),
            stations: catalog.route.intermediate_stations(from, to),
            fare,
            seat_count,
            seat_total,
            meal_total,
            grand_total: seat_total + meal_total,
        }
    }
}
