//! Axis descriptors.

use serde::Serialize;
use std::fmt;

/// Semantic role of an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionType {
    /// No calibration matched
    #[default]
    Unknown,
    /// Real-space distance
    Spatial,
    /// Reciprocal space or scattering angle
    Reciprocal,
    /// Energy axis
    Spectral,
    /// Stack index of an image series
    Frame,
}

impl DimensionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Spatial => "spatial",
            Self::Reciprocal => "reciprocal",
            Self::Spectral => "spectral",
            Self::Frame => "frame",
        }
    }
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One axis of a dataset: its name, coordinate values and physical meaning.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dimension {
    pub name: String,
    /// One coordinate per index along the axis.
    pub values: Vec<f64>,
    pub units: String,
    pub quantity: String,
    pub dimension_type: DimensionType,
}

impl Dimension {
    pub fn new(
        name: impl Into<String>,
        values: Vec<f64>,
        units: impl Into<String>,
        quantity: impl Into<String>,
        dimension_type: DimensionType,
    ) -> Self {
        Self {
            name: name.into(),
            values,
            units: units.into(),
            quantity: quantity.into(),
            dimension_type,
        }
    }

    /// Uncalibrated axis: index coordinates, named `a`, `b`, `c`, ... by position.
    pub fn generic(index: usize, extent: usize) -> Self {
        let name = match u8::try_from(index) {
            Ok(i) if i < 26 => char::from(b'a' + i).to_string(),
            _ => format!("dim_{index}"),
        };
        Self::new(
            name,
            (0..extent).map(|k| k as f64).collect(),
            "generic",
            "generic",
            DimensionType::Unknown,
        )
    }

    /// Number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn is_spectral(&self) -> bool {
        self.dimension_type == DimensionType::Spectral
    }
}
