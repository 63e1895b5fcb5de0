//! The recommendation form: field labels, input constraints and the prompt
//! loop used for any field not supplied on the command line.
//!
//! The bounds are enforced here, before a request reaches the recommender;
//! the recommender trusts its caller for numeric validity.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use fert_core::sample::HUMIDITY_MAX;
use fert_core::{check_range, Crop, Request};

// ── Fields ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    N,
    P,
    K,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 7] = [
        Field::N,
        Field::P,
        Field::K,
        Field::Temperature,
        Field::Humidity,
        Field::Ph,
        Field::Rainfall,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::N => "N concentration (mg/L) of the soil",
            Field::P => "P concentration (mg/L) of the soil",
            Field::K => "K concentration (mg/L) of the soil",
            Field::Temperature => "Soil temperature (°C)",
            Field::Humidity => "Humidity of the air (%)",
            Field::Ph => "pH Level",
            Field::Rainfall => "Amount of Rainfall/Irrigation (mm)",
        }
    }

    /// Inclusive `(min, max)`; pH is deliberately unbounded above.
    pub fn bounds(self) -> (f64, Option<f64>) {
        match self {
            Field::Humidity => (0.0, Some(HUMIDITY_MAX)),
            _ => (0.0, None),
        }
    }

    pub fn check(self, value: f64) -> Result<f64> {
        let (min, max) = self.bounds();
        Ok(check_range(self.label(), value, min, max)?)
    }

    pub fn parse(self, input: &str) -> Result<f64> {
        let value: f64 = input
            .trim()
            .parse()
            .with_context(|| format!("{} expects a number, got '{}'", self.label(), input.trim()))?;
        self.check(value)
    }
}

// ── Answers ───────────────────────────────────────────────────────────────────

/// Values already supplied (e.g. from flags); `None` fields get prompted.
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub n: Option<f64>,
    pub p: Option<f64>,
    pub k: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
    pub crop: Option<String>,
}

impl Answers {
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::N => self.n,
            Field::P => self.p,
            Field::K => self.k,
            Field::Temperature => self.temperature,
            Field::Humidity => self.humidity,
            Field::Ph => self.ph,
            Field::Rainfall => self.rainfall,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.crop.is_some() && Field::ALL.iter().all(|&f| self.value(f).is_some())
    }
}

// ── Prompting ─────────────────────────────────────────────────────────────────

fn read_answer<R: BufRead, W: Write>(prompt: &str, input: &mut R, out: &mut W) -> Result<String> {
    write!(out, "{prompt}: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed while waiting for '{prompt}'");
    }
    Ok(line)
}

/// Ask until the answer parses and satisfies the field's bounds.
pub fn prompt_number<R: BufRead, W: Write>(field: Field, input: &mut R, out: &mut W) -> Result<f64> {
    loop {
        let line = read_answer(field.label(), input, out)?;
        match field.parse(&line) {
            Ok(v) => return Ok(v),
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

/// Ask for a crop by label or table index until it resolves.
pub fn prompt_crop<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Crop> {
    loop {
        let line = read_answer("Type of Crop", input, out)?;
        match Crop::resolve(&line) {
            Ok(crop) => return Ok(crop),
            Err(e) => writeln!(out, "{e}; run with --list-crops to see the table")?,
        }
    }
}

/// Validate supplied answers, then prompt for the rest. A crop supplied up
/// front is passed through unresolved so the recommender reports it.
pub fn complete<R: BufRead, W: Write>(answers: &Answers, input: &mut R, out: &mut W) -> Result<Request> {
    for field in Field::ALL {
        if let Some(v) = answers.value(field) {
            field.check(v)?;
        }
    }
    let mut values = [0.0; Field::ALL.len()];
    for (slot, field) in values.iter_mut().zip(Field::ALL) {
        *slot = match answers.value(field) {
            Some(v) => v,
            None => prompt_number(field, input, out)?,
        };
    }
    let crop = match &answers.crop {
        Some(label) => label.clone(),
        None => prompt_crop(input, out)?.label().to_string(),
    };
    let [n, p, k, temperature, humidity, ph, rainfall] = values;
    Ok(Request { n, p, k, temperature, humidity, ph, rainfall, crop })
}
