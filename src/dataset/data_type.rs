//! Coarse dataset kinds derived from dimensionality.

use serde::Serialize;
use std::fmt;

use super::dimension::{Dimension, DimensionType};
use crate::util::{Error, Result};

/// What a dataset holds, judged from its axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Spectrum,
    LinePlot,
    SpectrumImage,
    Image,
    ImageStack,
}

impl DataType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spectrum => "spectrum",
            Self::LinePlot => "line_plot",
            Self::SpectrumImage => "spectrum_image",
            Self::Image => "image",
            Self::ImageStack => "image_stack",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Derive the data type from the classified axes.
///
/// A 3-D dataset without a spectral axis is an image stack; its first
/// non-spatial axis becomes the frame axis. Only that one axis is relabeled.
pub fn set_data_type(dimensions: &mut [Dimension]) -> Result<DataType> {
    let spectral = dimensions.iter().any(Dimension::is_spectral);

    let data_type = match (dimensions.len(), spectral) {
        (1, true) => DataType::Spectrum,
        (1, false) => DataType::LinePlot,
        (2, true) | (3, true) => DataType::SpectrumImage,
        (2, false) => DataType::Image,
        (3, false) => {
            if let Some(axis) = dimensions
                .iter_mut()
                .find(|d| d.dimension_type != DimensionType::Spatial)
            {
                let values = std::mem::take(&mut axis.values);
                *axis = Dimension::new("frame", values, "frame", "stack", DimensionType::Frame);
            }
            DataType::ImageStack
        }
        (n, _) => return Err(Error::UnsupportedDimensionality(n)),
    };
    Ok(data_type)
}
