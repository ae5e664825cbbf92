// hyperspectrs/src/transforms/normalization.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::{ArrayView2, Zip};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Norm {
    L1,
    L2,
    Inf,
}

impl FromStr for Norm {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "l1" => Ok(Self::L1),
            "l2" => Ok(Self::L2),
            "inf" => Ok(Self::Inf),
            _ => Err(TransformError::InvalidNorm(s.to_string())),
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "l1"),
            Self::L2 => write!(f, "l2"),
            Self::Inf => write!(f, "inf"),
        }
    }
}

/// Divides every row by its L1, L2 or infinity norm.
#[derive(Clone, Debug)]
pub struct Normalization {
    norm: Norm,
}

impl Normalization {
    pub fn new(norm: &str) -> Result<Self, TransformError> {
        Ok(Self {
            norm: norm.parse()?,
        })
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }
}

impl From<Norm> for Normalization {
    fn from(norm: Norm) -> Self {
        Self { norm }
    }
}

impl SignalTransform for Normalization {
    fn name(&self) -> &'static str {
        "Normalization"
    }

    fn short_name(&self) -> &'static str {
        "Norm"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        let norm = self.norm;
        let mut out = x.to_owned();
        Zip::from(out.rows_mut()).par_for_each(|mut row| {
            let value = match norm {
                Norm::L1 => row.fold(0., |acc, v| acc + v.abs()),
                Norm::L2 => libm::sqrt(row.fold(0., |acc, v| acc + v * v)),
                Norm::Inf => row.fold(0., |acc: f64, v| acc.max(v.abs())),
            };
            row.mapv_inplace(|v| v / value);
        });
        Ok(Transformed::new(out))
    }
}
