//! Typed n-dimensional array storage.

use std::any::Any;

use half::f16;
use ndarray::ArrayD;

use crate::util::{Element, ScalarType, Shape};

/// An array whose element type is known only at runtime.
///
/// Each variant owns an [`ndarray::ArrayD`] of the matching Rust type.
#[derive(Clone, Debug, PartialEq)]
pub enum RawArray {
    Bool(ArrayD<bool>),
    Uint8(ArrayD<u8>),
    Int8(ArrayD<i8>),
    Uint16(ArrayD<u16>),
    Int16(ArrayD<i16>),
    Uint32(ArrayD<u32>),
    Int32(ArrayD<i32>),
    Uint64(ArrayD<u64>),
    Int64(ArrayD<i64>),
    Float16(ArrayD<f16>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
}

/// Run `$body` with `$arr` bound to the inner array, whatever its type.
macro_rules! with_array {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            RawArray::Bool($arr) => $body,
            RawArray::Uint8($arr) => $body,
            RawArray::Int8($arr) => $body,
            RawArray::Uint16($arr) => $body,
            RawArray::Int16($arr) => $body,
            RawArray::Uint32($arr) => $body,
            RawArray::Int32($arr) => $body,
            RawArray::Uint64($arr) => $body,
            RawArray::Int64($arr) => $body,
            RawArray::Float16($arr) => $body,
            RawArray::Float32($arr) => $body,
            RawArray::Float64($arr) => $body,
        }
    };
}

impl RawArray {
    /// Element type.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Bool(_) => ScalarType::Bool,
            Self::Uint8(_) => ScalarType::Uint8,
            Self::Int8(_) => ScalarType::Int8,
            Self::Uint16(_) => ScalarType::Uint16,
            Self::Int16(_) => ScalarType::Int16,
            Self::Uint32(_) => ScalarType::Uint32,
            Self::Int32(_) => ScalarType::Int32,
            Self::Uint64(_) => ScalarType::Uint64,
            Self::Int64(_) => ScalarType::Int64,
            Self::Float16(_) => ScalarType::Float16,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
        }
    }

    /// Extent of each axis.
    pub fn shape(&self) -> Shape {
        with_array!(self, a => Shape::from_slice(a.shape()))
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        with_array!(self, a => a.ndim())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    /// Check if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the inner array if its element type is `T`.
    pub fn as_array<T: Element>(&self) -> Option<&ArrayD<T>> {
        with_array!(self, a => (a as &dyn Any).downcast_ref::<ArrayD<T>>())
    }

    /// Copy into a `f64` array of the same shape and memory order.
    pub fn to_f64(&self) -> ArrayD<f64> {
        with_array!(self, a => a.mapv(Element::to_f64))
    }

    /// Smallest and largest value, widened to `f64`. NaN values are skipped.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        with_array!(self, a => a.iter().map(|v| v.to_f64()).filter(|v| !v.is_nan()).fold(None, |acc, v| {
            match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            }
        }))
    }
}

macro_rules! impl_from_array {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ArrayD<$ty>> for RawArray {
                fn from(array: ArrayD<$ty>) -> Self {
                    Self::$variant(array)
                }
            }
        )*
    };
}

impl_from_array! {
    bool => Bool,
    u8 => Uint8,
    i8 => Int8,
    u16 => Uint16,
    i16 => Int16,
    u32 => Uint32,
    i32 => Int32,
    u64 => Uint64,
    i64 => Int64,
    f16 => Float16,
    f32 => Float32,
    f64 => Float64,
}
