//! Deficiency → fertilizer conversion.
//!
//! Pipeline per request:
//!   1. Predict the ideal N, P, K for the conditions and crop.
//!   2. Deficiency = max(0, predicted - actual) per nutrient.
//!   3. K shortfall → MOP.
//!   4. P shortfall → DAP, whose nitrogen content is credited against the
//!      N shortfall.
//!   5. Remaining N shortfall → Urea.
//!   6. Render the positive masses in the fixed order MOP, DAP, Urea.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{RecommendError, RecommendResult};
use crate::model::Predictor;
use crate::sample::{EnvironmentSample, Npk, NutrientReading, PredictedIdeal, Request};

// ── Fertilizer grades ─────────────────────────────────────────────────────────

/// Elemental potassium per kg of MOP.
pub const MOP_POTASSIUM_FRACTION: f64 = 0.6;
/// Elemental phosphorus per kg of DAP.
pub const DAP_PHOSPHORUS_FRACTION: f64 = 0.6;
/// Elemental nitrogen per kg of DAP.
pub const DAP_NITROGEN_FRACTION: f64 = 0.18;
/// Elemental nitrogen per kg of Urea. Commercial urea is closer to 0.46;
/// the 0.6 grade is kept for parity with existing recommendations.
pub const UREA_NITROGEN_FRACTION: f64 = 0.6;

/// Message when no nutrient falls short.
pub const NO_RECOMMENDATION: &str = "No fertilizer recommendation needed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fertilizer {
    /// Muriate of Potash.
    Mop,
    /// Diammonium Phosphate.
    Dap,
    Urea,
}

impl Fertilizer {
    /// Order in which fertilizers appear in a recommendation.
    pub const PRIORITY: [Fertilizer; 3] = [Fertilizer::Mop, Fertilizer::Dap, Fertilizer::Urea];

    pub fn name(self) -> &'static str {
        match self {
            Fertilizer::Mop => "MOP",
            Fertilizer::Dap => "DAP",
            Fertilizer::Urea => "Urea",
        }
    }
}

// ── Deficiency and plan ───────────────────────────────────────────────────────

/// Shortfall per nutrient, never negative.
pub type Deficiency = Npk<f64>;

/// Floor-at-zero difference; a surplus in one nutrient never offsets another.
pub fn deficiency(predicted: &PredictedIdeal, actual: &NutrientReading) -> Deficiency {
    predicted.zip(*actual).map(|(p, a)| floor_zero(p - a))
}

/// Nitrogen still missing after the DAP application's nitrogen credit.
pub fn remaining_nitrogen(deficient_n: f64, dap_kg: f64) -> f64 {
    floor_zero(deficient_n - dap_kg * DAP_NITROGEN_FRACTION)
}

// `f64::max` returns the non-NaN operand, so NaN floors to zero as well.
fn floor_zero(v: f64) -> f64 {
    v.max(0.0)
}

/// Kilograms of each fertilizer to apply.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FertilizerPlan {
    pub mop_kg: f64,
    pub dap_kg: f64,
    pub urea_kg: f64,
}

impl FertilizerPlan {
    pub fn from_deficiency(d: &Deficiency) -> Self {
        let mut plan = FertilizerPlan::default();

        if d.potassium > 0.0 {
            plan.mop_kg = d.potassium / MOP_POTASSIUM_FRACTION;
        }

        let remaining_n = if d.phosphorus > 0.0 {
            plan.dap_kg = d.phosphorus / DAP_PHOSPHORUS_FRACTION;
            remaining_nitrogen(d.nitrogen, plan.dap_kg)
        } else {
            d.nitrogen
        };

        if remaining_n > 0.0 {
            plan.urea_kg = remaining_n / UREA_NITROGEN_FRACTION;
        }

        plan
    }

    /// Kilograms of one fertilizer; zero when it is not needed.
    pub fn mass(&self, fertilizer: Fertilizer) -> f64 {
        match fertilizer {
            Fertilizer::Mop => self.mop_kg,
            Fertilizer::Dap => self.dap_kg,
            Fertilizer::Urea => self.urea_kg,
        }
    }

    /// Strictly positive masses in priority order.
    pub fn entries(&self) -> impl Iterator<Item = (Fertilizer, f64)> + '_ {
        Fertilizer::PRIORITY
            .into_iter()
            .map(|f| (f, self.mass(f)))
            .filter(|&(_, kg)| kg > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn message(&self) -> String {
        let clauses: Vec<String> = self
            .entries()
            .map(|(f, kg)| format!("{kg:.2} kgs of {}", f.name()))
            .collect();
        if clauses.is_empty() {
            NO_RECOMMENDATION.to_string()
        } else {
            format!("We recommend you add {}.", clauses.join(", "))
        }
    }
}

impl fmt::Display for FertilizerPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Everything computed for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub environment: EnvironmentSample,
    pub actual: NutrientReading,
    pub predicted: PredictedIdeal,
    pub deficiency: Deficiency,
    pub plan: FertilizerPlan,
    pub message: String,
}

impl Recommendation {
    pub fn new(environment: EnvironmentSample, actual: NutrientReading, predicted: PredictedIdeal) -> Self {
        let deficiency = deficiency(&predicted, &actual);
        let plan = FertilizerPlan::from_deficiency(&deficiency);
        let message = plan.message();
        Self { environment, actual, predicted, deficiency, plan, message }
    }
}

// ── Recommender ───────────────────────────────────────────────────────────────

/// Holds the three per-nutrient predictors. Stateless between calls.
pub struct Recommender<P> {
    predictors: Npk<P>,
}

impl<P: Predictor> Recommender<P> {
    pub fn new(nitrogen: P, phosphorus: P, potassium: P) -> Self {
        Self { predictors: Npk::new(nitrogen, phosphorus, potassium) }
    }

    pub fn predictors(&self) -> &Npk<P> {
        &self.predictors
    }

    /// Query each predictor once, N then P then K.
    pub fn predict_ideal(&self, environment: &EnvironmentSample) -> RecommendResult<PredictedIdeal> {
        let features = environment.features();
        self.predictors.try_map(|nutrient, predictor| {
            predictor
                .predict(&features)
                .map_err(|source| RecommendError::Predictor { nutrient, source })
        })
    }

    pub fn assess(
        &self,
        actual: &NutrientReading,
        environment: &EnvironmentSample,
    ) -> RecommendResult<Recommendation> {
        let predicted = self.predict_ideal(environment)?;
        let rec = Recommendation::new(*environment, *actual, predicted);
        debug!(
            crop = %environment.crop,
            predicted = ?rec.predicted,
            deficiency = ?rec.deficiency,
            "assessed sample"
        );
        Ok(rec)
    }

    pub fn recommend(
        &self,
        actual: &NutrientReading,
        environment: &EnvironmentSample,
    ) -> RecommendResult<String> {
        Ok(self.assess(actual, environment)?.message)
    }

    /// Resolve the crop first; an unknown crop never reaches a predictor.
    pub fn recommend_request(&self, request: &Request) -> RecommendResult<Recommendation> {
        let (actual, environment) = request.resolve()?;
        self.assess(&actual, &environment)
    }
}
