use chrono::{Datelike, NaiveDate};
use eco_dashboard::database::Database;
use eco_dashboard::entries::ConsumptionType;
use eco_dashboard::materials::{BUILTIN_MATERIALS, MaterialFactors};
use eco_dashboard::month::Month;
use rand::Rng;
use rand::seq::SliceRandom;
use std::env;

const SCHOOLS: [&str; 4] = [
    "Escola Estadual Monteiro Lobato",
    "Colégio Rio Verde",
    "Escola Municipal Cecília Meireles",
    "Instituto Sol Nascente",
];
const MONTHS: u32 = 12;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <database_file>", args[0]);
        eprintln!();
        eprintln!("Fills a database with randomized demo schools and entries");
        eprintln!("covering the last {} months.", MONTHS);
        std::process::exit(1);
    }

    let db = match Database::new(&args[1]) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = seed(&db) {
        eprintln!("Error seeding database: {}", e);
        std::process::exit(1);
    }
}

fn seed(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();
    let factors = MaterialFactors::new();
    let today = db.today();
    let first_month = (1..MONTHS).fold(Month::of(today), |month, _| month.previous());

    for name in SCHOOLS {
        let school_id = db.create_school(name)?;
        // Schools differ in size, which drives every quantity below
        let scale: f64 = rng.gen_range(0.5..2.0);
        let mut entries = 0;

        let mut month = first_month;
        for _ in 0..MONTHS {
            for _ in 0..rng.gen_range(2..6) {
                let material = BUILTIN_MATERIALS
                    .choose(&mut rng)
                    .map(|info| info.key)
                    .unwrap_or("papel");
                let quantity = (rng.gen_range(2.0..40.0) * scale * 10.0_f64).round() / 10.0;
                let day = rng.gen_range(1..=28);
                let date = NaiveDate::from_ymd_opt(month.year(), month.month(), day)
                    .unwrap_or_else(|| month.first_day());
                if date > today {
                    continue;
                }
                let co2 = factors.co2_saved(material, quantity)?;
                db.insert_recycling_entry(school_id, material, quantity, co2, date)?;
                entries += 1;
            }

            // June to August is winter here: more energy, less water
            let seasonal = if (6..=8).contains(&month.month()) { 1.2 } else { 1.0 };
            let water = (rng.gen_range(9000.0..15000.0) * scale / seasonal).round();
            let energy = (rng.gen_range(1800.0..3200.0) * scale * seasonal).round();
            db.insert_consumption_entry(
                school_id,
                ConsumptionType::Water,
                month,
                water,
                (water * 0.012 * 100.0).round() / 100.0,
            )?;
            db.insert_consumption_entry(
                school_id,
                ConsumptionType::Energy,
                month,
                energy,
                (energy * 0.85 * 100.0).round() / 100.0,
            )?;

            month = month.next();
        }

        db.upsert_goal(school_id, ConsumptionType::Water, rng.gen_range(5..=20) as f64)?;
        if rng.gen_bool(0.5) {
            db.upsert_goal(school_id, ConsumptionType::Energy, rng.gen_range(5..=15) as f64)?;
        }

        println!(
            "Seeded {} (id {}): {} recycling entries, {} months of readings",
            name, school_id, entries, MONTHS
        );
    }

    println!("Demo data ready (today is {}-{:02})", today.year(), today.month());
    Ok(())
}
