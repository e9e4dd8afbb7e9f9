//! Nion Swift `.h5` containers.
//!
//! The array is the top-level `data` dataset; the JSON properties are its
//! `properties` string attribute.

use std::path::Path;

use half::f16;
use hdf5::types::{FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{h5lock, h5try};
use hdf5_sys::h5a::H5Aread;
use hdf5_sys::h5t::{H5T_class_t, H5Tget_class};

use crate::array::RawArray;
use crate::util::{Error, Result};

/// Name of the array dataset.
pub const DATA_DATASET: &str = "data";

/// Name of the attribute holding the JSON properties.
pub const PROPERTIES_ATTR: &str = "properties";

/// An open `.h5` file known to contain a `data` dataset.
pub struct Hdf5Container {
    file: hdf5::File,
}

impl Hdf5Container {
    /// Open for read/write access and check for the `data` dataset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let file = hdf5::File::open_rw(path)?;
        if !file.link_exists(DATA_DATASET) {
            return Err(Error::MissingEntry(DATA_DATASET.to_string()));
        }
        tracing::debug!(path = %path.display(), "opened hdf5 container");
        Ok(Self { file })
    }

    /// Read the array and the properties text.
    pub fn load(&mut self) -> Result<(RawArray, Vec<u8>)> {
        if !self.file.link_exists(DATA_DATASET) {
            return Err(Error::MissingEntry(DATA_DATASET.to_string()));
        }
        let dataset = self.file.dataset(DATA_DATASET)?;
        let array = read_array(&dataset)?;
        let properties = read_properties(&dataset)?;
        Ok((array, properties))
    }
}

fn read_array(dataset: &hdf5::Dataset) -> Result<RawArray> {
    let dtype = dataset.dtype()?;
    // TypeDescriptor has no 16-bit float; let the library widen it to f32.
    if is_half_float(&dtype) {
        let wide = dataset.read_dyn::<f32>()?;
        return Ok(wide.mapv(f16::from_f32).into());
    }

    let array = match dtype.to_descriptor()? {
        TypeDescriptor::Boolean => dataset.read_dyn::<bool>()?.into(),
        TypeDescriptor::Unsigned(IntSize::U1) => dataset.read_dyn::<u8>()?.into(),
        TypeDescriptor::Unsigned(IntSize::U2) => dataset.read_dyn::<u16>()?.into(),
        TypeDescriptor::Unsigned(IntSize::U4) => dataset.read_dyn::<u32>()?.into(),
        TypeDescriptor::Unsigned(IntSize::U8) => dataset.read_dyn::<u64>()?.into(),
        TypeDescriptor::Integer(IntSize::U1) => dataset.read_dyn::<i8>()?.into(),
        TypeDescriptor::Integer(IntSize::U2) => dataset.read_dyn::<i16>()?.into(),
        TypeDescriptor::Integer(IntSize::U4) => dataset.read_dyn::<i32>()?.into(),
        TypeDescriptor::Integer(IntSize::U8) => dataset.read_dyn::<i64>()?.into(),
        TypeDescriptor::Float(FloatSize::U4) => dataset.read_dyn::<f32>()?.into(),
        TypeDescriptor::Float(FloatSize::U8) => dataset.read_dyn::<f64>()?.into(),
        other => return Err(Error::UnsupportedDtype(format!("{other:?}"))),
    };
    Ok(array)
}

fn is_half_float(dtype: &hdf5::Datatype) -> bool {
    dtype.size() == 2 && matches!(h5lock!(H5Tget_class(dtype.id())), H5T_class_t::H5T_FLOAT)
}

/// The properties attribute as JSON text, empty when the attribute is absent.
fn read_properties(dataset: &hdf5::Dataset) -> Result<Vec<u8>> {
    if !dataset.attr_names()?.iter().any(|name| name == PROPERTIES_ATTR) {
        tracing::warn!("hdf5 dataset has no properties attribute");
        return Ok(Vec::new());
    }

    let attr = dataset.attr(PROPERTIES_ATTR)?;
    let dtype = attr.dtype()?;
    let text = match dtype.to_descriptor()? {
        TypeDescriptor::VarLenUnicode => attr.read_scalar::<VarLenUnicode>()?.as_str().as_bytes().to_vec(),
        TypeDescriptor::VarLenAscii => attr.read_scalar::<VarLenAscii>()?.as_bytes().to_vec(),
        TypeDescriptor::FixedAscii(_) | TypeDescriptor::FixedUnicode(_) => {
            if !attr.is_scalar() {
                return Err(Error::InvalidMetadata(format!(
                    "properties attribute has shape {:?}",
                    attr.shape()
                )));
            }
            let mut buf = read_fixed_string(&attr, &dtype)?;
            let len = buf.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            buf.truncate(len);
            buf
        }
        other => {
            return Err(Error::InvalidMetadata(format!(
                "properties attribute is {other:?}, not a string"
            )))
        }
    };

    tracing::trace!(len = text.len(), "read properties attribute");
    Ok(text)
}

/// Raw bytes of a scalar fixed-length string attribute, padding included.
fn read_fixed_string(attr: &hdf5::Attribute, dtype: &hdf5::Datatype) -> hdf5::Result<Vec<u8>> {
    let mut buf = vec![0u8; dtype.size()];
    h5try!(H5Aread(attr.id(), dtype.id(), buf.as_mut_ptr().cast()));
    Ok(buf)
}
