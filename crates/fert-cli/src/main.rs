//! Fertilizer recommendation form.
//!
//! Any field not given as a flag is prompted for on stdin. The sentence (or
//! `--json` record) goes to stdout; prompts and logs go to stderr.

mod form;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fert_core::config::DEFAULT_MODELS_DIR;
use fert_core::{Crop, ModelPaths};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use form::Answers;

const ABOUT: [&str; 2] = [
    "This is a Machine Learning project made in the",
    "Ethiopian Artificial Intelligence Institute Summer Camp of 2024.",
];

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fert-recommend", about = "Recommend MOP, DAP and Urea for a crop from soil readings")]
struct Args {
    /// N concentration (mg/L) of the soil.
    #[arg(long)]
    n: Option<f64>,

    /// P concentration (mg/L) of the soil.
    #[arg(long)]
    p: Option<f64>,

    /// K concentration (mg/L) of the soil.
    #[arg(long)]
    k: Option<f64>,

    /// Soil temperature (°C).
    #[arg(long)]
    temperature: Option<f64>,

    /// Humidity of the air (%), 0-100.
    #[arg(long)]
    humidity: Option<f64>,

    /// pH level.
    #[arg(long)]
    ph: Option<f64>,

    /// Amount of rainfall/irrigation (mm).
    #[arg(long)]
    rainfall: Option<f64>,

    /// Crop label (e.g. rice) or table index 0-20.
    #[arg(long)]
    crop: Option<String>,

    /// Directory holding stacking_model_{N,P,K}.json.
    #[arg(long, default_value = DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,

    /// JSON file naming the three model files; takes precedence over --models-dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full recommendation record as JSON.
    #[arg(long)]
    json: bool,

    /// Print the crop table and exit.
    #[arg(long)]
    list_crops: bool,

    /// Print project information and exit.
    #[arg(long)]
    about: bool,
}

impl Args {
    fn answers(&self) -> Answers {
        Answers {
            n: self.n,
            p: self.p,
            k: self.k,
            temperature: self.temperature,
            humidity: self.humidity,
            ph: self.ph,
            rainfall: self.rainfall,
            crop: self.crop.clone(),
        }
    }

    fn model_paths(&self) -> Result<ModelPaths> {
        match &self.config {
            Some(path) => ModelPaths::from_file(path).context("loading model config"),
            None => Ok(ModelPaths::in_dir(&self.models_dir)),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fert_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if args.list_crops {
        for crop in Crop::ALL {
            println!("{:>2}  {}", crop.index(), crop);
        }
        return Ok(());
    }

    if args.about {
        for line in ABOUT {
            println!("{line}");
        }
        return Ok(());
    }

    let paths = args.model_paths()?;
    let recommender = paths
        .load_recommender()
        .context("loading nutrient models")?;

    let answers = args.answers();
    if !answers.is_complete() {
        eprintln!("Fertilizer Recommender");
    }
    let request = form::complete(&answers, &mut io::stdin().lock(), &mut io::stderr())?;
    tracing::debug!(?request, "form complete");

    let recommendation = recommender.recommend_request(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        println!("{}", recommendation.message);
    }
    Ok(())
}
