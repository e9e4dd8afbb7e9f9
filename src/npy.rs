//! NumPy `.npy` payload decoding.
//!
//! Header parsing and byte-order handling come from `npyz`; this module maps
//! the declared dtype onto a [`RawArray`] variant and lays the values out in
//! C or Fortran order.

use half::f16;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use npyz::{DType, NpyFile, Order, TypeChar};

use crate::array::RawArray;
use crate::util::{Error, Result, ScalarType, Shape};

/// Element type of a plain (non-structured) dtype.
fn scalar_type(dtype: &DType) -> Result<ScalarType> {
    let type_str = match dtype {
        DType::Plain(type_str) => type_str,
        other => return Err(Error::UnsupportedDtype(format!("{other:?}"))),
    };
    let scalar_type = match (type_str.type_char(), type_str.size_field()) {
        (TypeChar::Bool, 1) => ScalarType::Bool,
        (TypeChar::Uint, 1) => ScalarType::Uint8,
        (TypeChar::Int, 1) => ScalarType::Int8,
        (TypeChar::Uint, 2) => ScalarType::Uint16,
        (TypeChar::Int, 2) => ScalarType::Int16,
        (TypeChar::Uint, 4) => ScalarType::Uint32,
        (TypeChar::Int, 4) => ScalarType::Int32,
        (TypeChar::Uint, 8) => ScalarType::Uint64,
        (TypeChar::Int, 8) => ScalarType::Int64,
        (TypeChar::Float, 2) => ScalarType::Float16,
        (TypeChar::Float, 4) => ScalarType::Float32,
        (TypeChar::Float, 8) => ScalarType::Float64,
        _ => return Err(Error::UnsupportedDtype(type_str.to_string())),
    };
    Ok(scalar_type)
}

/// Decode a complete `.npy` payload.
pub fn read_npy(bytes: &[u8]) -> Result<RawArray> {
    let npy = NpyFile::new(bytes).map_err(|e| Error::npy(e.to_string()))?;

    let scalar_type = scalar_type(&npy.dtype())?;
    let shape = npy
        .shape()
        .iter()
        .map(|&n| usize::try_from(n))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Shape::from)
        .map_err(|_| Error::npy("shape does not fit in memory"))?;
    let fortran_order = matches!(npy.order(), Order::Fortran);

    // Refuse headers promising more data than the payload could hold before
    // anything is allocated for them.
    let needed = shape
        .checked_num_elements()
        .and_then(|n| n.checked_mul(scalar_type.num_bytes()))
        .ok_or_else(|| Error::npy(format!("shape {shape} is too large")))?;
    if needed > bytes.len() {
        return Err(Error::npy(format!(
            "shape {shape} needs {needed} data bytes, payload has {}",
            bytes.len()
        )));
    }

    tracing::trace!(dtype = %scalar_type, %shape, fortran_order, "decoding npy payload");

    macro_rules! decode {
        ($ty:ty) => {{
            let values = npy
                .into_vec::<$ty>()
                .map_err(|e| Error::npy(format!("{scalar_type} data: {e}")))?;
            build(&shape, fortran_order, values)?.into()
        }};
    }

    let array = match scalar_type {
        ScalarType::Bool => decode!(bool),
        ScalarType::Uint8 => decode!(u8),
        ScalarType::Int8 => decode!(i8),
        ScalarType::Uint16 => decode!(u16),
        ScalarType::Int16 => decode!(i16),
        ScalarType::Uint32 => decode!(u32),
        ScalarType::Int32 => decode!(i32),
        ScalarType::Uint64 => decode!(u64),
        ScalarType::Int64 => decode!(i64),
        ScalarType::Float16 => decode!(f16),
        ScalarType::Float32 => decode!(f32),
        ScalarType::Float64 => decode!(f64),
    };
    Ok(array)
}

fn build<T>(shape: &Shape, fortran_order: bool, values: Vec<T>) -> Result<ArrayD<T>> {
    let dim = IxDyn(shape.sizes());
    let array = if fortran_order {
        ArrayD::from_shape_vec(dim.f(), values)
    } else {
        ArrayD::from_shape_vec(dim, values)
    };
    array.map_err(|e| Error::npy(e.to_string()))
}
