use std::{fs, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use sleeper::{
    feed::Feed, BookingError, Catalog, LoadError, PassengerDetails, SearchQuery, SeatStatus,
    Session,
};

fn write_feed(name: &str, stations: &str, seats: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sleeper-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stations.csv"), stations).unwrap();
    fs::write(dir.join("seats.csv"), seats).unwrap();
    fs::write(
        dir.join("meals.csv"),
        "id,name,description,price,kind\nnone,No Meal,Skip,0,veg\nkheer,Kheer,Rice pudding,90,veg\n",
    )
    .unwrap();
    dir
}

#[test]
fn catalog_loads_from_a_directory() {
    let dir = write_feed(
        "coast",
        "name,distance_km\nSurat,0\nNavsari,30\nValsad,70\n",
        "seat_id,status\nL2,booked\nU1,female\n",
    );
    let catalog = Catalog::try_from(Feed::from_dir(&dir).unwrap()).unwrap();

    assert_eq!(
        catalog.route.all_station_names(),
        ["Surat", "Navsari", "Valsad"]
    );
    // 200 + 70 * 2.5 = 375, 7.5 steps of 50
    assert_eq!(catalog.route.fare(&catalog.fares, "Surat", "Valsad"), 400);
    assert_eq!(catalog.route.fare(&catalog.fares, "Surat", "Mumbai"), 1200);
    assert_eq!(catalog.seats.seat("L2").unwrap().status, SeatStatus::Booked);
    assert_eq!(
        catalog.seats.seat("U1").unwrap().status,
        SeatStatus::FemaleReserved
    );
    assert_eq!(catalog.meals.price("kheer"), 90);

    let mut session = Session::new(
        Arc::new(catalog),
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
    );
    session
        .submit_search(SearchQuery {
            from: "Navsari".to_owned(),
            to: "Valsad".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            passengers: 1,
        })
        .unwrap();
    assert_eq!(
        session.toggle_seat("L2"),
        Err(BookingError::SeatUnavailable {
            seat_id: "L2".to_owned()
        })
    );
    session.toggle_seat("L3").unwrap();
    session.confirm_seats().unwrap();
    session.choose_meal("L3", "kheer").unwrap();
    assert_eq!(session.confirm_meals().unwrap().total_meal_price, 90);
    assert!(matches!(
        session.submit_details(PassengerDetails {
            passengers: Vec::new(),
            contact: sleeper::Contact {
                email: "a@b.c".to_owned(),
                phone: "1".to_owned(),
            },
        }),
        Err(BookingError::IncompleteDetails { .. })
    ));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn out_of_order_stations_are_rejected() {
    let dir = write_feed(
        "reversed",
        "name,distance_km\nValsad,70\nSurat,0\n",
        "seat_id,status\n",
    );
    let err = Catalog::try_from(Feed::from_dir(&dir).unwrap()).unwrap_err();
    assert!(matches!(err, LoadError::NonIncreasingDistance { .. }));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn seat_overrides_must_exist_on_the_bus() {
    let dir = write_feed(
        "ghost-seat",
        "name,distance_km\nSurat,0\nValsad,70\n",
        "seat_id,status\nL40,booked\n",
    );
    let err = Catalog::try_from(Feed::from_dir(&dir).unwrap()).unwrap_err();
    assert!(matches!(err, LoadError::UnknownSeat { seat_id } if seat_id == "L40"));

    fs::remove_dir_all(dir).unwrap();
}
