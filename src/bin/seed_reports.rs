//! Fills a running RideAware backend with generated reports.
//!
//! ```text
//! cargo run --bin seed-reports -- [--api-base http://127.0.0.1:8000] [--per-category 8]
//! ```
//!
//! Reports are posted one by one through the public API, so they are
//! classified like any other submission. All of them carry `source = "dummy"`.

use std::ops::Range;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VIENNA_LAT: Range<f64> = 48.15..48.25;
const VIENNA_LON: Range<f64> = 16.30..16.45;
const DUMMY_SOURCE: &str = "dummy";

/// Sample texts, German and English, grouped by the category they are meant to hit
const DUMMY_TEXTS: &[(&str, &[&str])] = &[
    (
        "Obstacle",
        &[
            "Glasscherben auf dem Radweg",
            "Großer Ast blockiert die Fahrbahn",
            "Müllcontainer steht mitten auf dem Radweg",
            "Steinbrocken nach Bauarbeiten liegen rum",
            "Umgestürzter Baum versperrt den Weg",
            "Scherben bei der Kreuzung Mariahilfer Straße",
            "Hindernis: Container auf Radweg seit 3 Tagen",
            "Achtung Glasflaschen auf dem Weg zur Donauinsel",
            "Broken glass near the bike lane",
            "Large branch blocking the path",
            "Construction debris on cycle path",
            "Pothole in the middle of bike lane",
        ],
    ),
    (
        "InfrastructureProblem",
        &[
            "Radweg ist sehr schlecht markiert",
            "Schlagloch auf der Ringstraße beim Burgtheater",
            "Radwegende ist nicht klar ersichtlich",
            "Keine Beschilderung bei der Abzweigung",
            "Radweg total holprig und uneben",
            "Ampelschaltung für Radfahrer zu kurz",
            "Baustelle ohne Umleitung für Radfahrer",
            "Radstreifen zu schmal, wird von Autos befahren",
            "Bike lane markings are fading",
            "Missing sign for cyclists",
            "Road surface is damaged and uneven",
            "No dedicated bike lane here",
        ],
    ),
    (
        "DangerSpot",
        &[
            "Gefährliche Kreuzung ohne Sicht",
            "Autos fahren hier viel zu schnell",
            "Beinahe-Unfall wegen schlechter Sicht",
            "Kreuzung sehr unübersichtlich bei Nacht",
            "Close pass - Auto kam mir sehr nahe",
            "Rechtsabbieger schneiden oft den Radweg",
            "Tür wurde plötzlich aufgemacht - knapp!",
            "Sehr gefährliche Stelle beim Gürtel",
            "Near miss with a car turning right",
            "Dangerous crossing, poor visibility",
            "Car door opened right in front of me",
            "Almost hit at the intersection",
        ],
    ),
    (
        "PositiveFeedback",
        &[
            "Neuer Radweg ist super!",
            "Endlich wurde die Kreuzung verbessert, danke!",
            "Toll, dass hier jetzt Markierungen sind",
            "Gute Ampelschaltung für Radfahrer hier",
            "Perfekter Radweg, mehr davon bitte!",
            "Danke für die neue Beschilderung",
            "Super breiter und sicherer Radweg hier",
            "Love the new bike lane",
            "Great improvement at this crossing",
            "Thanks for fixing the road surface",
            "Nice smooth surface on the bike lane now",
            "Good job on the new markings",
        ],
    ),
    (
        "Spam",
        &[
            "Buy cheap bikes now at www.fakebikes.com",
            "Click here for free cycling gear: http://spam.net",
            "Limited offer: Get 50% discount on everything!",
            "Subscribe to my channel for cycling tips - free money",
            "WIN a FREE bike now!!! click here",
            "Best bike deals!!! http://super-deals.com",
            "Follow me for promo codes!!!",
            "Exclusive discount, click www.sale.net",
        ],
    ),
];

#[derive(Parser)]
#[command(
    name = "seed-reports",
    about = "Post generated cycling reports to a running RideAware backend"
)]
struct Cli {
    /// Base URL of the backend
    #[arg(long, env = "RIDEAWARE_API_BASE", default_value = "http://127.0.0.1:8000")]
    api_base: String,

    /// Number of reports generated per category
    #[arg(long, default_value_t = 8)]
    per_category: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
struct NewReport {
    text: String,
    latitude: f64,
    longitude: f64,
    source: String,
}

#[derive(Debug, Default)]
struct Summary {
    uploaded: usize,
    failed: usize,
}

fn generate_reports<R: Rng>(rng: &mut R, per_category: usize) -> Vec<NewReport> {
    let mut reports = Vec::with_capacity(per_category * DUMMY_TEXTS.len());

    for (_, texts) in DUMMY_TEXTS {
        for _ in 0..per_category {
            let Some(text) = texts.choose(rng) else {
                continue;
            };
            reports.push(NewReport {
                text: text.to_string(),
                latitude: rng.random_range(VIENNA_LAT),
                longitude: rng.random_range(VIENNA_LON),
                source: DUMMY_SOURCE.to_string(),
            });
        }
    }

    // Mix categories so the map fills evenly
    reports.shuffle(rng);
    reports
}

async fn check_health(client: &reqwest::Client, api_base: &str) -> anyhow::Result<()> {
    let response = client.get(format!("{}/health", api_base)).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("backend returned status {}", response.status());
    }
    Ok(())
}

async fn upload(client: &reqwest::Client, api_base: &str, reports: &[NewReport]) -> Summary {
    let url = format!("{}/reports", api_base);
    let total = reports.len();
    let mut summary = Summary::default();

    for (i, report) in reports.iter().enumerate() {
        match client.post(&url).json(report).send().await {
            Ok(response) if response.status().is_success() => {
                summary.uploaded += 1;
                tracing::info!("[{}/{}] Uploaded: {}", i + 1, total, report.text);
            }
            Ok(response) => {
                summary.failed += 1;
                tracing::warn!("[{}/{}] Failed: {}", i + 1, total, response.status());
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!("[{}/{}] Error: {}", i + 1, total, e);
            }
        }
    }

    summary
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let api_base = cli.api_base.trim_end_matches('/').to_string();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    check_health(&client, &api_base)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot reach backend at {}: {}", api_base, e))?;
    tracing::info!("Backend is running at {}", api_base);

    let reports = match cli.seed {
        Some(seed) => generate_reports(&mut StdRng::seed_from_u64(seed), cli.per_category),
        None => generate_reports(&mut rand::rng(), cli.per_category),
    };
    tracing::info!("Generated {} dummy reports", reports.len());

    let summary = upload(&client, &api_base, &reports).await;

    println!(
        "Uploaded {}/{} reports ({} failed), all marked with source='{}'",
        summary.uploaded,
        reports.len(),
        summary.failed,
        DUMMY_SOURCE
    );

    if summary.uploaded == 0 && !reports.is_empty() {
        anyhow::bail!("no report could be uploaded");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_per_category_reports_inside_vienna() {
        let mut rng = StdRng::seed_from_u64(7);
        let reports = generate_reports(&mut rng, 8);

        assert_eq!(reports.len(), 8 * DUMMY_TEXTS.len());
        for report in &reports {
            assert!(VIENNA_LAT.contains(&report.latitude));
            assert!(VIENNA_LON.contains(&report.longitude));
            assert_eq!(report.source, "dummy");
        }
    }

    #[test]
    fn test_same_seed_same_reports() {
        let a = generate_reports(&mut StdRng::seed_from_u64(42), 3);
        let b = generate_reports(&mut StdRng::seed_from_u64(42), 3);
        let texts = |r: &[NewReport]| r.iter().map(|x| x.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts(&a), texts(&b));
    }

    #[test]
    fn test_sample_texts_pass_server_validation() {
        for (_, texts) in DUMMY_TEXTS {
            for text in *texts {
                let len = text.trim().chars().count();
                assert!((5..=150).contains(&len), "{}", text);
                assert!(text.chars().any(char::is_alphanumeric), "{}", text);
            }
        }
    }

    #[test]
    fn test_zero_per_category_generates_nothing() {
        assert!(generate_reports(&mut StdRng::seed_from_u64(1), 0).is_empty());
    }
}
