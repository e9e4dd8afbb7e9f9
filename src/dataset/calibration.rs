//! Axis classification from Nion's `dimensional_calibrations`.

use serde::{Deserialize, Serialize};

use super::dimension::{Dimension, DimensionType};
use crate::util::{Error, Result};

/// Linear calibration of one axis: `value = (index - offset) * scale`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Calibration {
    #[serde(default)]
    pub offset: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    #[serde(default)]
    pub units: String,
}

fn unit_scale() -> f64 {
    1.0
}

impl Calibration {
    pub fn new(offset: f64, scale: f64, units: impl Into<String>) -> Self {
        Self { offset, scale, units: units.into() }
    }

    /// Coordinates for `extent` consecutive indices.
    pub fn values(&self, extent: usize) -> Vec<f64> {
        (0..extent)
            .map(|k| (k as f64 - self.offset) * self.scale)
            .collect()
    }
}

/// Next free axis names for reciprocal and spatial axes.
///
/// Each classified axis of those types takes the current letter and
/// advances it by one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisLetters {
    pub reciprocal: char,
    pub spatial: char,
}

impl Default for AxisLetters {
    fn default() -> Self {
        Self { reciprocal: 'u', spatial: 'x' }
    }
}

fn next_letter(c: char) -> char {
    char::from_u32(c as u32 + 1).unwrap_or(c)
}

/// Classify one axis by its units.
///
/// Rules are tried in order and the first match wins: exactly `eV`, any
/// other unit containing `eV`, reciprocal units (`1/...`, `mrad`, `rad`),
/// then anything containing `nm`. Returns None for units matching no rule.
pub fn classify(
    calibration: &Calibration,
    extent: usize,
    letters: AxisLetters,
) -> (Option<Dimension>, AxisLetters) {
    let units = calibration.units.as_str();
    let values = || calibration.values(extent);

    if units == "eV" {
        let dim = Dimension::new("energy_loss", values(), units, "energy-loss", DimensionType::Spectral);
        (Some(dim), letters)
    } else if units.contains("eV") {
        let dim = Dimension::new("energy", values(), units, "energy", DimensionType::Spectral);
        (Some(dim), letters)
    } else if units.contains("1/") || units == "mrad" || units == "rad" {
        let dim = Dimension::new(
            letters.reciprocal.to_string(),
            values(),
            units,
            "reciprocal distance",
            DimensionType::Reciprocal,
        );
        let letters = AxisLetters { reciprocal: next_letter(letters.reciprocal), ..letters };
        (Some(dim), letters)
    } else if units.contains("nm") {
        let dim = Dimension::new(
            letters.spatial.to_string(),
            values(),
            units,
            "distance",
            DimensionType::Spatial,
        );
        let letters = AxisLetters { spatial: next_letter(letters.spatial), ..letters };
        (Some(dim), letters)
    } else {
        (None, letters)
    }
}

/// Replace the descriptors of every axis whose calibration classifies.
///
/// `dimensions` holds one descriptor per array axis. Axes without a
/// calibration, or with unmatched units, keep their descriptor.
pub fn set_dimensions(dimensions: &mut [Dimension], calibrations: &[Calibration]) -> Result<()> {
    if calibrations.len() > dimensions.len() {
        return Err(Error::metadata(format!(
            "{} dimensional calibrations for {}-dimensional data",
            calibrations.len(),
            dimensions.len()
        )));
    }
    if calibrations.len() < dimensions.len() {
        tracing::warn!(
            calibrations = calibrations.len(),
            ndim = dimensions.len(),
            "fewer calibrations than dimensions"
        );
    }

    let mut letters = AxisLetters::default();
    for (index, (dim, calibration)) in dimensions.iter_mut().zip(calibrations).enumerate() {
        let (classified, next) = classify(calibration, dim.len(), letters);
        letters = next;
        match classified {
            Some(new_dim) => {
                tracing::debug!(
                    index,
                    name = %new_dim.name,
                    units = %new_dim.units,
                    kind = %new_dim.dimension_type,
                    "classified axis"
                );
                *dim = new_dim;
            }
            None => {
                tracing::debug!(index, units = %calibration.units, "axis left unclassified");
            }
        }
    }
    Ok(())
}
