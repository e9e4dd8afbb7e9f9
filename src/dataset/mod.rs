//! Labeled datasets assembled from Nion payloads.
//!
//! [`assemble`] turns a decoded array and its JSON properties into a
//! [`Dataset`]: descriptive fields, calibrated axes and a coarse
//! [`DataType`]. It knows nothing about the container the payloads came from.

mod calibration;
mod data_type;
mod dimension;

pub use calibration::*;
pub use data_type::*;
pub use dimension::*;

use serde_json::{Map, Value};

use crate::array::RawArray;
use crate::util::{Error, Result, Shape};

/// Source label used when the metadata names none.
pub const DEFAULT_SOURCE: &str = "NionReader";

/// Key of the per-axis calibration list in Nion metadata.
pub const CALIBRATIONS_KEY: &str = "dimensional_calibrations";

/// A multidimensional array with calibrated axes and its original metadata.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub data: RawArray,
    pub title: String,
    pub source: String,
    pub quantity: String,
    pub units: String,
    pub modality: String,
    pub data_type: DataType,
    /// One descriptor per array axis, in axis order.
    pub dimensions: Vec<Dimension>,
    pub original_metadata: Map<String, Value>,
}

impl Dataset {
    /// Extent of each axis.
    pub fn shape(&self) -> Shape {
        self.data.shape()
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    /// Check whether any axis is spectral.
    pub fn has_spectral_dimension(&self) -> bool {
        self.dimensions.iter().any(Dimension::is_spectral)
    }

    /// Axes of a given type, with their indices.
    pub fn dimensions_of(&self, ty: DimensionType) -> impl Iterator<Item = (usize, &Dimension)> {
        self.dimensions
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.dimension_type == ty)
    }
}

/// Build a [`Dataset`] from an array and its JSON metadata text.
///
/// `fallback_title` is used when the metadata carries no title, normally the
/// file name without extension.
pub fn assemble(data: RawArray, metadata: &[u8], fallback_title: &str) -> Result<Dataset> {
    let mut original_metadata = match serde_json::from_slice::<Value>(metadata)? {
        Value::Object(map) => map,
        other => {
            return Err(Error::metadata(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
    };
    backfill_pixel_units(&mut original_metadata);

    let title = resolve_title(&original_metadata, fallback_title);
    let source = match original_metadata.get("data_source") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => DEFAULT_SOURCE.to_string(),
    };

    let mut dimensions: Vec<Dimension> = data
        .shape()
        .sizes()
        .iter()
        .enumerate()
        .map(|(i, &n)| Dimension::generic(i, n))
        .collect();

    if let Some(calibrations) = original_metadata.get(CALIBRATIONS_KEY) {
        let calibrations: Vec<Calibration> = serde_json::from_value(calibrations.clone())
            .map_err(|e| Error::metadata(format!("{CALIBRATIONS_KEY}: {e}")))?;
        set_dimensions(&mut dimensions, &calibrations)?;
    }

    let data_type = set_data_type(&mut dimensions)?;

    tracing::debug!(%title, %data_type, shape = %data.shape(), "assembled dataset");

    Ok(Dataset {
        data,
        title,
        source,
        quantity: "intensity".to_string(),
        units: "counts".to_string(),
        modality: "generic".to_string(),
        data_type,
        dimensions,
        original_metadata,
    })
}

/// Rewrite empty calibration units to `"pixels"` in place.
fn backfill_pixel_units(metadata: &mut Map<String, Value>) {
    if let Some(Value::Array(calibrations)) = metadata.get_mut(CALIBRATIONS_KEY) {
        for calibration in calibrations {
            if let Some(units) = calibration.get_mut("units") {
                if units.as_str() == Some("") {
                    *units = Value::from("pixels");
                }
            }
        }
    }
}

/// `description.title`, then `title`, then the fallback.
fn resolve_title(metadata: &Map<String, Value>, fallback: &str) -> String {
    let described = metadata
        .get("description")
        .and_then(|d| d.get("title"))
        .and_then(Value::as_str);
    described
        .or_else(|| metadata.get("title").and_then(Value::as_str))
        .unwrap_or(fallback)
        .to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
