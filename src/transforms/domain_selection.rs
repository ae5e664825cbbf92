// hyperspectrs/src/transforms/domain_selection.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::{Array1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Columns to keep, either as indices or as a boolean mask over the domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Indices(Vec<usize>),
    Mask(Vec<bool>),
}

/// Keeps a subset of the spectral domain. The transformed output carries the
/// selected domain so callers can relabel their columns.
#[derive(Clone, Debug)]
pub struct DomainSelection {
    indices: Vec<usize>,
    domain: Array1<f64>,
}

impl DomainSelection {
    pub fn new(selection: Selection, domain: Array1<f64>) -> Result<Self, TransformError> {
        let indices = match selection {
            Selection::Indices(indices) => {
                if let Some(&index) = indices.iter().find(|&&index| index >= domain.len()) {
                    return Err(TransformError::InvalidSelection(format!(
                        "index {} is out of bounds for a domain of length {}",
                        index,
                        domain.len()
                    )));
                }
                indices
            }
            Selection::Mask(mask) => {
                if mask.len() != domain.len() {
                    return Err(TransformError::InvalidSelection(format!(
                        "mask of length {} for a domain of length {}",
                        mask.len(),
                        domain.len()
                    )));
                }
                mask.iter()
                    .enumerate()
                    .filter(|(_, keep)| **keep)
                    .map(|(index, _)| index)
                    .collect()
            }
        };
        Ok(Self { indices, domain })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Domain after selection.
    pub fn selected_domain(&self) -> Array1<f64> {
        self.domain.select(Axis(0), &self.indices)
    }
}

impl SignalTransform for DomainSelection {
    fn name(&self) -> &'static str {
        "Domain selection"
    }

    fn short_name(&self) -> &'static str {
        "domain selection"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        if x.ncols() != self.domain.len() {
            return Err(TransformError::ColumnMismatch {
                expected: self.domain.len(),
                got: x.ncols(),
            });
        }
        Ok(Transformed::with_domain(
            x.select(Axis(1), &self.indices),
            self.selected_domain(),
        ))
    }
}
