//! Ideal nutrient profile per crop.
//! Runs the three nutrient models for every crop in the table under one set
//! of growing conditions and prints the predicted ideal N, P and K.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fert_core::config::DEFAULT_MODELS_DIR;
use fert_core::error::RecommendResult;
use fert_core::sample::{check_range, PredictedIdeal, HUMIDITY_MAX};
use fert_core::{Crop, EnvironmentSample, ModelPaths, Predictor, Recommender};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "crop_profiles", about = "Predicted ideal N/P/K for every crop under given conditions")]
struct Args {
    /// Soil temperature (°C).
    #[arg(long, default_value = "25.0")]
    temperature: f64,

    /// Humidity of the air (%), 0-100.
    #[arg(long, default_value = "70.0")]
    humidity: f64,

    /// pH level.
    #[arg(long, default_value = "6.5")]
    ph: f64,

    /// Amount of rainfall/irrigation (mm).
    #[arg(long, default_value = "100.0")]
    rainfall: f64,

    /// Directory holding stacking_model_{N,P,K}.json.
    #[arg(long, default_value = DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,

    /// JSON file naming the three model files; takes precedence over --models-dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CropProfile {
    crop: Crop,
    index: usize,
    ideal: PredictedIdeal,
}

fn profiles<P: Predictor>(
    recommender: &Recommender<P>,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
) -> RecommendResult<Vec<CropProfile>> {
    Crop::ALL
        .iter()
        .map(|&crop| -> RecommendResult<CropProfile> {
            let env = EnvironmentSample::new(temperature, humidity, ph, rainfall, crop);
            let ideal = recommender.predict_ideal(&env)?;
            Ok(CropProfile { crop, index: crop.index(), ideal })
        })
        .collect()
}

fn render_table(rows: &[CropProfile]) -> String {
    let mut out = format!("{:<12} {:>3} {:>9} {:>9} {:>9}\n", "crop", "idx", "N", "P", "K");
    for r in rows {
        out.push_str(&format!(
            "{:<12} {:>3} {:>9.2} {:>9.2} {:>9.2}\n",
            r.crop.label(),
            r.index,
            r.ideal.nitrogen,
            r.ideal.phosphorus,
            r.ideal.potassium,
        ));
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_profiles=info,fert_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    check_range("temperature", args.temperature, 0.0, None)?;
    check_range("humidity", args.humidity, 0.0, Some(HUMIDITY_MAX))?;
    check_range("ph", args.ph, 0.0, None)?;
    check_range("rainfall", args.rainfall, 0.0, None)?;

    let paths = match &args.config {
        Some(path) => ModelPaths::from_file(path).context("loading model config")?,
        None => ModelPaths::in_dir(&args.models_dir),
    };
    let recommender = paths.load_recommender().context("loading nutrient models")?;

    let rows = profiles(&recommender, args.temperature, args.humidity, args.ph, args.rainfall)?;
    info!(
        crops = rows.len(),
        format = if args.json { "json" } else { "table" },
        "profiles computed"
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }
    Ok(())
}
