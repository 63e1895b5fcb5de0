//! Per-request inputs: soil readings, growing conditions and the raw form
//! submission they are parsed from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crop::Crop;
use crate::error::InvalidInput;

// ── Nutrients ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    /// Element symbol, also used for model file names.
    pub fn symbol(self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Nutrient::Nitrogen => "nitrogen",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
        };
        f.write_str(name)
    }
}

/// One value per nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Npk<T> {
    pub nitrogen: T,
    pub phosphorus: T,
    pub potassium: T,
}

impl<T> Npk<T> {
    pub fn new(nitrogen: T, phosphorus: T, potassium: T) -> Self {
        Self { nitrogen, phosphorus, potassium }
    }

    pub fn get(&self, nutrient: Nutrient) -> &T {
        match nutrient {
            Nutrient::Nitrogen => &self.nitrogen,
            Nutrient::Phosphorus => &self.phosphorus,
            Nutrient::Potassium => &self.potassium,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Npk<U> {
        Npk {
            nitrogen: f(self.nitrogen),
            phosphorus: f(self.phosphorus),
            potassium: f(self.potassium),
        }
    }

    pub fn zip<U>(self, other: Npk<U>) -> Npk<(T, U)> {
        Npk {
            nitrogen: (self.nitrogen, other.nitrogen),
            phosphorus: (self.phosphorus, other.phosphorus),
            potassium: (self.potassium, other.potassium),
        }
    }

    /// Apply `f` to each nutrient in N, P, K order, stopping at the first error.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(Nutrient, &T) -> Result<U, E>) -> Result<Npk<U>, E> {
        Ok(Npk {
            nitrogen: f(Nutrient::Nitrogen, &self.nitrogen)?,
            phosphorus: f(Nutrient::Phosphorus, &self.phosphorus)?,
            potassium: f(Nutrient::Potassium, &self.potassium)?,
        })
    }
}

/// Measured soil concentrations in mg/L.
pub type NutrientReading = Npk<f64>;

/// Ideal concentrations predicted by the per-nutrient models.
pub type PredictedIdeal = Npk<f64>;

// ── Growing conditions ────────────────────────────────────────────────────────

/// Width of the model feature vector.
pub const FEATURE_COUNT: usize = 5;

/// `[temperature, humidity, ph, rainfall, crop_index]`
pub type Features = [f64; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    /// Soil temperature in °C.
    pub temperature: f64,
    /// Air humidity in percent.
    pub humidity: f64,
    pub ph: f64,
    /// Rainfall or irrigation in mm.
    pub rainfall: f64,
    pub crop: Crop,
}

impl EnvironmentSample {
    pub fn new(temperature: f64, humidity: f64, ph: f64, rainfall: f64, crop: Crop) -> Self {
        Self { temperature, humidity, ph, rainfall, crop }
    }

    /// Feature vector in the column order the models were trained on.
    pub fn features(&self) -> Features {
        [
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
            self.crop.index() as f64,
        ]
    }
}

// ── Field ranges ──────────────────────────────────────────────────────────────

/// Air humidity is a percentage.
pub const HUMIDITY_MAX: f64 = 100.0;

/// Check one numeric input: finite, at least `min`, and at most `max` if
/// given. Returns the value unchanged.
pub fn check_range(field: &'static str, value: f64, min: f64, max: Option<f64>) -> Result<f64, InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NotFinite { field, value });
    }
    if value < min {
        return Err(InvalidInput::BelowMinimum { field, value, min });
    }
    match max {
        Some(max) if value > max => Err(InvalidInput::AboveMaximum { field, value, max }),
        _ => Ok(value),
    }
}

// ── Raw form submission ───────────────────────────────────────────────────────

/// Unresolved request as entered in the form or listed in a batch file.
/// `crop` is a label or a table index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub crop: String,
}

impl Request {
    /// Every reading is non-negative and humidity is at most 100; pH has no
    /// upper bound. `resolve` does not call this.
    pub fn check_ranges(&self) -> Result<(), InvalidInput> {
        let fields = [
            ("n", self.n, None),
            ("p", self.p, None),
            ("k", self.k, None),
            ("temperature", self.temperature, None),
            ("humidity", self.humidity, Some(HUMIDITY_MAX)),
            ("ph", self.ph, None),
            ("rainfall", self.rainfall, None),
        ];
        for (field, value, max) in fields {
            check_range(field, value, 0.0, max)?;
        }
        Ok(())
    }

    pub fn resolve(&self) -> Result<(NutrientReading, EnvironmentSample), InvalidInput> {
        let crop = Crop::resolve(&self.crop)?;
        let actual = Npk::new(self.n, self.p, self.k);
        let environment =
            EnvironmentSample::new(self.temperature, self.humidity, self.ph, self.rainfall, crop);
        Ok((actual, environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_follow_training_column_order() {
        let env = EnvironmentSample::new(21.5, 80.0, 6.4, 200.0, Crop::Rice);
        assert_eq!(env.features(), [21.5, 80.0, 6.4, 200.0, 19.0]);
    }

    #[test]
    fn try_map_visits_nutrients_in_order() {
        let triple = Npk::new(1, 2, 3);
        let mut seen = Vec::new();
        let doubled: Result<Npk<i32>, ()> = triple.try_map(|n, v| {
            seen.push(n);
            Ok(v * 2)
        });
        assert_eq!(doubled.unwrap(), Npk::new(2, 4, 6));
        assert_eq!(seen, Nutrient::ALL.to_vec());
    }

    #[test]
    fn try_map_stops_at_first_error() {
        let triple = Npk::new(1, 2, 3);
        let mut calls = 0;
        let result: Result<Npk<i32>, Nutrient> = triple.try_map(|n, v| {
            calls += 1;
            if n == Nutrient::Phosphorus { Err(n) } else { Ok(*v) }
        });
        assert_eq!(result.unwrap_err(), Nutrient::Phosphorus);
        assert_eq!(calls, 2, "potassium must not be visited after a failure");
    }

    #[test]
    fn request_resolves_label_and_index() {
        let mut req = Request {
            n: 10.0,
            p: 20.0,
            k: 30.0,
            temperature: 25.0,
            humidity: 60.0,
            ph: 6.8,
            rainfall: 120.0,
            crop: "Maize".to_string(),
        };
        let (actual, env) = req.resolve().unwrap();
        assert_eq!(actual, Npk::new(10.0, 20.0, 30.0));
        assert_eq!(env.crop, Crop::Maize);

        req.crop = "4".to_string();
        assert_eq!(req.resolve().unwrap().1.crop, Crop::Coconut);
    }

    #[test]
    fn request_with_unknown_crop_fails() {
        let req: Request = serde_json::from_str(
            r#"{"n":0,"p":0,"k":0,"temperature":20,"humidity":50,"ph":7,"rainfall":90,"crop":"kale"}"#,
        )
        .unwrap();
        assert_eq!(
            req.resolve().unwrap_err(),
            InvalidInput::UnknownCrop("kale".to_string())
        );
    }

    fn valid_request() -> Request {
        Request {
            n: 0.0,
            p: 0.0,
            k: 0.0,
            temperature: 25.0,
            humidity: 100.0,
            ph: 14.5,
            rainfall: 0.0,
            crop: "rice".to_string(),
        }
    }

    #[test]
    fn range_check_accepts_bounds_and_unbounded_ph() {
        assert_eq!(valid_request().check_ranges(), Ok(()));
    }

    #[test]
    fn range_check_names_the_offending_field() {
        let req = Request { humidity: 500.0, ..valid_request() };
        assert_eq!(
            req.check_ranges().unwrap_err(),
            InvalidInput::AboveMaximum { field: "humidity", value: 500.0, max: 100.0 }
        );

        let req = Request { k: -2.0, ..valid_request() };
        let err = req.check_ranges().unwrap_err();
        assert_eq!(err.to_string(), "k must be at least 0, got -2");

        let req = Request { rainfall: f64::INFINITY, ..valid_request() };
        assert!(matches!(
            req.check_ranges(),
            Err(InvalidInput::NotFinite { field: "rainfall", .. })
        ));
    }

    #[test]
    fn nutrient_symbols() {
        let symbols: Vec<&str> = Nutrient::ALL.iter().map(|n| n.symbol()).collect();
        assert_eq!(symbols, ["N", "P", "K"]);
        assert_eq!(Nutrient::Potassium.to_string(), "potassium");
    }
}
