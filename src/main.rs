use std::{iter, path::PathBuf, process::ExitCode, sync::Arc};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use itertools::Itertools;

use sleeper::{
    booking::{Contact, Gender, Passenger, PassengerDetails, SearchQuery, Session},
    data::{Catalog, Deck, NO_MEAL},
    feed::Feed,
    pricing::Quote,
};

#[derive(Debug, Parser)]
#[command(name = "sleeper", version)]
#[command(about = "Fares, seats and bookings for the Ahmedabad - Mumbai sleeper bus")]
struct Args {
    /// Directory holding stations.csv, seats.csv and meals.csv (built-in tables if omitted)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stations with their distance from the origin
    Stations,

    /// Price a trip
    Quote {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, default_value_t = 1)]
        seats: usize,
        /// Meal ids, comma-separated
        #[arg(long, value_delimiter = ',')]
        meals: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Show the seat map of the bus
    Seats {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Book seats for a trip
    Book {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Travel date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Seat ids, one per passenger, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        seats: Vec<String>,
        /// Meal ids in seat order, comma-separated
        #[arg(long, value_delimiter = ',')]
        meals: Vec<String>,
        #[arg(long, value_delimiter = ',', required = true)]
        names: Vec<String>,
        #[arg(long, value_delimiter = ',', required = true)]
        ages: Vec<u32>,
        /// Genders in seat order, comma-separated; missing entries default to male
        #[arg(long, value_delimiter = ',')]
        genders: Vec<Gender>,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let feed = match &args.data_dir {
        Some(dir) => Feed::from_dir(dir)?,
        None => Feed::builtin()?,
    };
    let catalog = Arc::new(Catalog::try_from(feed)?);

    match args.command {
        Command::Stations => {
            for station in catalog.route.stations() {
                println!("{:<12}{:>5} km", station.name, station.distance_km);
            }
        }
        Command::Quote {
            from,
            to,
            seats,
            meals,
            json,
        } => {
            let quote = Quote::new(&catalog, &from, &to, seats, meals.iter().map(String::as_str));
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                if quote.stations.is_empty() {
                    log::warn!("{} -> {} is not a bookable trip", from, to);
                }
                println!("{} -> {} ({} km)", quote.from, quote.to, quote.distance_km);
                println!("Route: {}", quote.stations.join(" > "));
                println!("Fare per seat: {}", quote.fare);
                println!("Seats x{}: {}", quote.seat_count, quote.seat_total);
                println!("Meals: {}", quote.meal_total);
                println!("Total: {}", quote.grand_total);
            }
        }
        Command::Seats { from, to } => {
            let fare = catalog.route.fare(&catalog.fares, &from, &to);
            println!("{} -> {}, {} per seat", from, to, fare);
            let decks = catalog.seats.decks();
            for deck in [Deck::Lower, Deck::Upper] {
                let row = decks
                    .get(&deck)
                    .map(|seats| {
                        seats
                            .iter()
                            .map(|seat| format!("{}:{}", seat.id, seat.status))
                            .join(" ")
                    })
                    .unwrap_or_default();
                println!("{:?}: {}", deck, row);
            }
        }
        Command::Book {
            from,
            to,
            date,
            seats,
            meals,
            names,
            ages,
            genders,
            email,
            phone,
            json,
        } => {
            let meal_choices = pair_meals(&seats, &meals)?;
            let today = Local::now().date_naive();
            let mut session = Session::new(Arc::clone(&catalog), today);

            println!("Searching {} -> {}", from, to);
            session.submit_search(SearchQuery {
                from,
                to,
                date,
                passengers: seats.len(),
            })?;

            println!("Selecting seats");
            for seat in &seats {
                session.toggle_seat(seat)?;
            }
            session.confirm_seats()?;

            println!("Selecting meals");
            for (seat, meal) in meal_choices {
                session.choose_meal(seat, meal)?;
            }
            session.confirm_meals()?;

            println!("Submitting passenger details");
            let passengers = names
                .into_iter()
                .zip(ages)
                .zip(genders.into_iter().chain(iter::repeat(Gender::default())))
                .map(|((name, age), gender)| Passenger { name, age, gender })
                .collect();
            let booking = session.submit_details(PassengerDetails {
                passengers,
                contact: Contact { email, phone },
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(booking)?);
            } else {
                println!("Booking {} {}", booking.id, booking.status);
                println!(
                    "{} ({} km)",
                    booking.route(&catalog.route).join(" > "),
                    booking.distance_km(&catalog.route)
                );
                println!("Seats: {}", booking.seats.seats.join(", "));
                println!("Seat total: {}", booking.seats.total_price);
                println!("Meal total: {}", booking.meals.total_meal_price);
                println!("Amount paid: {}", booking.total_amount());
                println!(
                    "Confirmation chance: {}% - {}",
                    booking.confirmation_probability,
                    booking.confidence().message()
                );
            }
        }
    }

    Ok(())
}

/// Pairs `--meals` with `--seats` in order, skipping `none`. Seats past the
/// end of the meal list get no meal; extra meals are an error.
fn pair_meals<'a>(
    seats: &'a [String],
    meals: &'a [String],
) -> Result<Vec<(&'a str, &'a str)>, String> {
    if meals.len() > seats.len() {
        return Err(format!(
            "{} meals given for {} seats",
            meals.len(),
            seats.len()
        ));
    }
    Ok(seats
        .iter()
        .zip(meals)
        .filter(|(_, meal)| meal.as_str() != NO_MEAL)
        .map(|(seat, meal)| (seat.as_str(), meal.as_str()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn meals_pair_with_seats_in_order() {
        let seats = ids(&["L2", "L4", "U1"]);
        let meals = ids(&["veg-thali", "none"]);
        assert_eq!(
            pair_meals(&seats, &meals).unwrap(),
            [("L2", "veg-thali")]
        );
    }

    #[test]
    fn extra_meals_are_rejected() {
        let seats = ids(&["L2"]);
        let meals = ids(&["veg-thali", "chicken-biryani"]);
        assert_eq!(
            pair_meals(&seats, &meals).unwrap_err(),
            "2 meals given for 1 seats"
        );
    }

    #[test]
    fn book_accepts_missing_genders() {
        let args = Args::try_parse_from([
            "sleeper", "book", "--from", "Anand", "--to", "Surat", "--date", "2030-01-01",
            "--seats", "L2", "--names", "Asha", "--ages", "30", "--email", "a@b.c",
            "--phone", "98000",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Book { ref genders, .. } if genders.is_empty()
        ));
    }

    #[test]
    fn genders_parse_other() {
        let args = Args::try_parse_from([
            "sleeper", "book", "--from", "Anand", "--to", "Surat", "--date", "2030-01-01",
            "--seats", "L2,L4", "--names", "Asha,Ravi", "--ages", "30,31", "--genders",
            "other,female", "--email", "a@b.c", "--phone", "98000",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Book { ref genders, .. } if genders == &[Gender::Other, Gender::Female]
        ));
    }
}
