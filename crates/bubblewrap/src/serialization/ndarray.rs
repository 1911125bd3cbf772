//! Lossless float arrays: `{"__ndarray__": <base64>, "dtype": "float64", "shape": [..]}`.
//!
//! The payload is the little-endian byte image of the values in row-major
//! order, so a stored packing reads back bit for bit.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::SerializationError;

const DTYPES: [&str; 2] = ["float64", "<f8"];

/// An array as stored, before its dtype and payload are checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedArray {
    #[serde(rename = "__ndarray__")]
    data: String,
    dtype: String,
    shape: Vec<usize>,
}

/// Row-major `f64` array with an explicit shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EncodedArray", into = "EncodedArray")]
pub struct Float64Array {
    values: Vec<f64>,
    shape: Vec<usize>,
}

impl Float64Array {
    pub fn from_vec(values: Vec<f64>) -> Self {
        let shape = vec![values.len()];
        Self { values, shape }
    }

    pub fn with_shape(values: Vec<f64>, shape: Vec<usize>) -> Result<Self, SerializationError> {
        if shape.iter().product::<usize>() != values.len() {
            return Err(SerializationError::Shape {
                shape,
                len: values.len(),
            });
        }
        Ok(Self { values, shape })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl EncodedArray {
    pub fn dtype(&self) -> &str {
        &self.dtype
    }

    /// Check the dtype, decode the payload and match it against the shape.
    pub fn decode(self) -> Result<Float64Array, SerializationError> {
        Float64Array::try_from(self)
    }
}

impl From<Float64Array> for EncodedArray {
    fn from(a: Float64Array) -> Self {
        let bytes: Vec<u8> = a.values.iter().flat_map(|v| v.to_le_bytes()).collect();
        EncodedArray {
            data: STANDARD.encode(bytes),
            dtype: DTYPES[0].to_string(),
            shape: a.shape,
        }
    }
}

impl TryFrom<EncodedArray> for Float64Array {
    type Error = SerializationError;

    fn try_from(r: EncodedArray) -> Result<Self, Self::Error> {
        if !DTYPES.contains(&r.dtype.as_str()) {
            return Err(SerializationError::Dtype(r.dtype));
        }
        let bytes = STANDARD.decode(r.data.as_bytes())?;
        if bytes.len() % 8 != 0 {
            return Err(SerializationError::Shape {
                shape: r.shape,
                len: bytes.len() / 8,
            });
        }
        let values = bytes
            .chunks_exact(8)
            .map(|b| {
                let mut le = [0u8; 8];
                le.copy_from_slice(b);
                f64::from_le_bytes(le)
            })
            .collect();
        Self::with_shape(values, r.shape)
    }
}
