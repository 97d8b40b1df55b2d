use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use zone_patrol::ZonePredictor;
use zone_patrol::config::{PERSISTENCE, ZONE_MODEL};
use zone_patrol::domain::TimeKey;
use zone_patrol::utils::{Clock, FixedClock, LocalClock, weekday_name};

/// Fit the zone model offline and print what the server would serve.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = PERSISTENCE.dataset.citations_path)]
    citations: PathBuf,

    /// Predict for this local time instead of now, e.g. "2024-03-04 08:00:00"
    #[arg(long, value_parser = parse_at)]
    at: Option<NaiveDateTime>,

    /// Also print the predicted zone for every hour of that day
    #[arg(long, default_value_t = false)]
    schedule: bool,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone_id: u32,
    #[tabled(rename = "Latitude")]
    latitude: String,
    #[tabled(rename = "Longitude")]
    longitude: String,
    #[tabled(rename = "Events")]
    events: usize,
    #[tabled(rename = "Training rows")]
    training_rows: usize,
}

#[derive(Tabled)]
struct HourRow {
    #[tabled(rename = "Hour")]
    hour: String,
    #[tabled(rename = "Zone")]
    zone: String,
}

fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM[:SS]\": {}", e))
}

fn main() -> Result<()> {
    // 1. Setup Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // 2. Fit
    let predictor = ZonePredictor::from_csv(&args.citations, &ZONE_MODEL)
        .with_context(|| format!("Failed to build zone model from {}", args.citations.display()))?;
    let summary = predictor.summary();

    // 3. Zone table
    let rows: Vec<ZoneRow> = predictor
        .centroids()
        .iter()
        .map(|c| ZoneRow {
            zone_id: c.zone_id.value(),
            latitude: format!("{:.6}", c.position.lat),
            longitude: format!("{:.6}", c.position.lon),
            events: c.members,
            training_rows: predictor
                .aggregate()
                .iter()
                .filter(|r| r.zone_id == c.zone_id)
                .count(),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!(
        "{} events, {} zones, {} unclustered, {} training rows",
        summary.events, summary.zones, summary.unclustered, summary.training_rows
    );

    // 4. Prediction
    let now = match args.at {
        Some(at) => FixedClock(at).now(),
        None => LocalClock.now(),
    };
    let key = TimeKey::from_datetime(&now);
    let prediction = predictor.predict_key(key)?;
    println!(
        "{} ({} {:02}:00) -> zone {} at ({:.6}, {:.6})",
        now.format("%Y-%m-%d %H:%M"),
        weekday_name(key.day_of_week()),
        key.hour(),
        prediction.zone_id,
        prediction.latitude,
        prediction.longitude
    );

    if args.schedule {
        let hours: Vec<HourRow> = (0..TimeKey::HOURS)
            .filter_map(|h| TimeKey::new(h, key.day_of_week()))
            .map(|k| HourRow {
                hour: format!("{:02}:00", k.hour()),
                zone: match predictor.predict_key(k) {
                    Ok(p) => p.zone_id.to_string(),
                    Err(e) => format!("error: {}", e),
                },
            })
            .collect();
        println!("{}", Table::new(hours));
    }

    Ok(())
}
