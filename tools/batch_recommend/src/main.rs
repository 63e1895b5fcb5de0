//! Batch recommendations.
//! Reads a JSON array of form requests and writes one result per request.
//! A request that fails (reading out of range, unknown crop, predictor error)
//! is recorded with its error and does not stop the batch.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fert_core::config::DEFAULT_MODELS_DIR;
use fert_core::{ModelPaths, Predictor, RecommendError, Recommendation, Recommender, Request};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "batch_recommend", about = "Run fertilizer recommendations over a JSON file of requests")]
struct Args {
    /// JSON array of requests ({n, p, k, temperature, humidity, ph, rainfall, crop}).
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding stacking_model_{N,P,K}.json.
    #[arg(long, default_value = DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,

    /// JSON file naming the three model files; takes precedence over --models-dir.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// ── Output schema ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BatchResult {
    request: Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BatchResult {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn recommend_checked<P: Predictor>(
    recommender: &Recommender<P>,
    request: &Request,
) -> Result<Recommendation, RecommendError> {
    request.check_ranges()?;
    recommender.recommend_request(request)
}

fn run_batch<P: Predictor>(recommender: &Recommender<P>, requests: Vec<Request>) -> Vec<BatchResult> {
    requests
        .into_iter()
        .enumerate()
        .map(|(i, request)| match recommend_checked(recommender, &request) {
            Ok(rec) => BatchResult { request, recommendation: Some(rec), error: None },
            Err(e) => {
                warn!(index = i, crop = %request.crop, error = %e, "request failed");
                BatchResult { request, recommendation: None, error: Some(e.to_string()) }
            }
        })
        .collect()
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_recommend=info,fert_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let requests: Vec<Request> = serde_json::from_str(&text)
        .with_context(|| format!("Cannot parse requests in {}", args.input.display()))?;

    let paths = match &args.config {
        Some(path) => ModelPaths::from_file(path).context("loading model config")?,
        None => ModelPaths::in_dir(&args.models_dir),
    };
    let recommender = paths.load_recommender().context("loading nutrient models")?;

    let results = run_batch(&recommender, requests);
    let ok = results.iter().filter(|r| r.is_ok()).count();
    info!(total = results.len(), ok, failed = results.len() - ok, "batch complete");

    let json = serde_json::to_string_pretty(&results)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Write failed: {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fert_core::model::{Linear, Model};

    fn constant(value: f64) -> Model {
        Model::Linear(Linear::new(value, vec![0.0; 5]))
    }

    fn request(crop: &str) -> Request {
        Request {
            n: 0.0,
            p: 0.0,
            k: 0.0,
            temperature: 25.0,
            humidity: 70.0,
            ph: 6.5,
            rainfall: 100.0,
            crop: crop.to_string(),
        }
    }

    /// One bad crop is recorded and the rest of the batch still runs.
    #[test]
    fn failed_request_does_not_stop_batch() {
        let recommender = Recommender::new(constant(40.0), constant(0.0), constant(20.0));
        let results = run_batch(&recommender, vec![request("rice"), request("durian"), request("7")]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(
            results[0].recommendation.as_ref().unwrap().message,
            "We recommend you add 33.33 kgs of MOP, 66.67 kgs of Urea."
        );
        assert_eq!(
            results[1].error.as_deref(),
            Some("invalid input: unknown crop 'durian'")
        );
        assert!(results[2].is_ok(), "crop index 7 (grapes) resolves");
    }

    #[test]
    fn out_of_range_readings_are_recorded_as_errors() {
        let recommender = Recommender::new(constant(40.0), constant(0.0), constant(20.0));
        let humid = Request { humidity: 500.0, ..request("rice") };
        let negative = Request { n: -50.0, ..request("rice") };
        let results = run_batch(&recommender, vec![humid, negative, request("rice")]);

        assert!(results[0].recommendation.is_none());
        assert_eq!(
            results[0].error.as_deref(),
            Some("invalid input: humidity must be at most 100, got 500")
        );
        assert_eq!(
            results[1].error.as_deref(),
            Some("invalid input: n must be at least 0, got -50")
        );
        assert!(results[2].is_ok());
    }

    #[test]
    fn result_json_omits_absent_half() {
        let recommender = Recommender::new(constant(0.0), constant(0.0), constant(0.0));
        let results = run_batch(&recommender, vec![request("mango"), request("kale")]);
        let json = serde_json::to_value(&results).unwrap();

        assert!(json[0].get("error").is_none());
        assert_eq!(json[0]["recommendation"]["message"], "No fertilizer recommendation needed.");
        assert!(json[1].get("recommendation").is_none());
        assert_eq!(json[1]["request"]["crop"], "kale");
    }
}
