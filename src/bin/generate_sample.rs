use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;

/// Seeded SplitMix64 stream with the draws the sample listings need.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p.clamp(0.0, 1.0)
    }

    /// Whole-dollar nightly rate, log-normal around `typical`.
    fn nightly_price(&mut self, typical: f64) -> f64 {
        let u1 = 1.0 - self.unit();
        let u2 = self.unit();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        (typical * (0.35 * z).exp()).max(20.0).round()
    }
}

/// Name, south-west corner (lat, lon) and typical nightly price.
const NEIGHBOURHOODS: [(&str, f64, f64, f64); 6] = [
    ("Back Bay", 42.345, -71.090, 310.0),
    ("Beacon Hill", 42.355, -71.075, 260.0),
    ("Dorchester", 42.295, -71.075, 120.0),
    ("East Boston", 42.365, -71.040, 150.0),
    ("Fenway", 42.335, -71.110, 230.0),
    ("Jamaica Plain", 42.300, -71.125, 140.0),
];
/// Side of each square neighbourhood, in degrees.
const CELL: f64 = 0.02;
const LISTINGS_PER_NEIGHBOURHOOD: u64 = 40;
const CALENDAR_DAYS: i64 = 365;

/// `"$1,234.00"` formatting as found in the source exports.
fn currency(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${grouped}.{:02}", cents % 100)
}

fn gz_writer(path: &Path) -> Result<csv::Writer<GzEncoder<BufWriter<File>>>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(csv::Writer::from_writer(GzEncoder::new(
        BufWriter::new(file),
        Compression::default(),
    )))
}

fn finish_gz(writer: csv::Writer<GzEncoder<BufWriter<File>>>, what: &str) -> Result<()> {
    let encoder = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing {what}: {}", e.error()))?;
    encoder.finish()?.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let out_dir = Path::new(&out_dir);
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("start date")?;

    let mut listings = gz_writer(&out_dir.join("listings.csv.gz"))?;
    listings.write_record([
        "id",
        "name",
        "neighbourhood",
        "latitude",
        "longitude",
        "price",
        "availability_365",
    ])?;
    let mut calendar = gz_writer(&out_dir.join("calendar.csv.gz"))?;
    calendar.write_record(["listing_id", "date", "available", "price"])?;

    let mut id = 1000u64;
    let mut n_calendar = 0usize;
    for &(name, lat0, lon0, typical) in &NEIGHBOURHOODS {
        for _ in 0..LISTINGS_PER_NEIGHBOURHOOD {
            id += 1;
            let price = rng.nightly_price(typical);
            // Busier in summer: availability probability dips mid-year.
            let base_open = rng.uniform(0.2, 0.9);
            let mut open_days = 0u32;
            let mut days = Vec::with_capacity(CALENDAR_DAYS as usize);
            for d in 0..CALENDAR_DAYS {
                let date = start + Duration::days(d);
                let season = (d as f64 / CALENDAR_DAYS as f64 * 2.0 * std::f64::consts::PI).cos();
                let available = rng.chance(base_open + 0.15 * season);
                open_days += u32::from(available);
                days.push((date, available));
            }

            listings.write_record([
                id.to_string(),
                format!("{name} stay #{id}"),
                name.to_string(),
                format!("{:.5}", lat0 + rng.uniform(0.0, CELL)),
                format!("{:.5}", lon0 + rng.uniform(0.0, CELL)),
                currency(price),
                open_days.to_string(),
            ])?;

            for (date, available) in days {
                let nightly = if available { currency(price) } else { String::new() };
                calendar.write_record([
                    id.to_string(),
                    date.format("%Y-%m-%d").to_string(),
                    if available { "t" } else { "f" }.to_string(),
                    nightly,
                ])?;
                n_calendar += 1;
            }
        }
    }
    finish_gz(listings, "listings")?;
    finish_gz(calendar, "calendar")?;

    let mut hoods = csv::Writer::from_path(out_dir.join("neighbourhoods.csv"))?;
    hoods.write_record(["neighbourhood_group", "neighbourhood"])?;
    for &(name, ..) in &NEIGHBOURHOODS {
        hoods.write_record(["", name])?;
    }
    hoods.flush()?;

    let features: Vec<_> = NEIGHBOURHOODS
        .iter()
        .map(|&(name, lat, lon, _)| {
            json!({
                "type": "Feature",
                "properties": { "neighbourhood": name, "neighbourhood_group": null },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[
                        [lon, lat],
                        [lon + CELL, lat],
                        [lon + CELL, lat + CELL],
                        [lon, lat + CELL],
                        [lon, lat]
                    ]]]
                }
            })
        })
        .collect();
    let geojson = json!({ "type": "FeatureCollection", "features": features });
    fs::write(
        out_dir.join("neighbourhoods.geojson"),
        serde_json::to_string_pretty(&geojson)?,
    )?;

    println!(
        "Wrote {} listings and {n_calendar} calendar entries for {} neighbourhoods to {}",
        id - 1000,
        NEIGHBOURHOODS.len(),
        out_dir.display()
    );
    Ok(())
}
