// hyperspectrs/src/transforms/transforms.rs

use super::domain_selection::{DomainSelection, Selection};
use super::errors::TransformError;
use super::logarithm::LogTransform;
use super::mean_centering::MeanCentering;
use super::msc::MultiplicativeScatterCorrection;
use super::normalization::Normalization;
use super::positive::PositiveShift;
use super::savitzky_golay::{
    SavitzkyGolayFilter, DEFAULT_DERIVATION_ORDER, DEFAULT_POLYNOMIAL_ORDER, DEFAULT_WINDOW_SIZE,
};
use super::snv::StandardNormalVariate;
use super::traits::{SignalTransform, Transformed};
use ndarray::{Array1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_polynomial_order() -> usize {
    DEFAULT_POLYNOMIAL_ORDER
}

fn default_derivation_order() -> usize {
    DEFAULT_DERIVATION_ORDER
}

fn default_norm() -> String {
    "l1".to_string()
}

/// Serializable description of one pipeline stage: a `kind` tag plus the
/// parameters of that kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransformConfig {
    #[serde(alias = "LogTransform")]
    Log,
    #[serde(alias = "PositiveShift")]
    Positive,
    #[serde(alias = "SNV")]
    StandardNormalVariate,
    MeanCentering,
    #[serde(alias = "SavitzkyGolayFilter")]
    SavitzkyGolay {
        #[serde(default = "default_window_size")]
        window_size: usize,
        #[serde(default = "default_polynomial_order")]
        polynomial_order: usize,
        #[serde(default = "default_derivation_order")]
        derivation_order: usize,
    },
    #[serde(alias = "MSC")]
    MultiplicativeScatterCorrection {
        #[serde(default)]
        reference: Option<Vec<f64>>,
    },
    Normalization {
        #[serde(default = "default_norm")]
        norm: String,
    },
    /// Without an explicit `domain` the domain reaching this stage is used.
    DomainSelection {
        selection: Selection,
        #[serde(default)]
        domain: Option<Vec<f64>>,
    },
}

impl TransformConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Log => "Log",
            Self::Positive => "Positive",
            Self::StandardNormalVariate => "StandardNormalVariate",
            Self::MeanCentering => "MeanCentering",
            Self::SavitzkyGolay { .. } => "SavitzkyGolay",
            Self::MultiplicativeScatterCorrection { .. } => "MultiplicativeScatterCorrection",
            Self::Normalization { .. } => "Normalization",
            Self::DomainSelection { .. } => "DomainSelection",
        }
    }

    /// Checks the parameters that can be checked without data.
    pub fn validate(&self) -> Result<(), TransformError> {
        match self {
            Self::SavitzkyGolay {
                window_size,
                polynomial_order,
                derivation_order,
            } => {
                SavitzkyGolayFilter::new(*window_size, *polynomial_order, *derivation_order)?;
            }
            Self::Normalization { norm } => {
                Normalization::new(norm)?;
            }
            Self::DomainSelection {
                selection,
                domain: Some(domain),
            } => {
                DomainSelection::new(selection.clone(), Array1::from(domain.clone()))?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Parses the compact step syntax used on the command line:
/// `log`, `pos`, `snv`, `mc`, `msc`, `sg[:W[:P[:D]]]`, `norm[:KIND]` and
/// `select:i,j,k`.
impl FromStr for TransformConfig {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransformError::InvalidStep(s.to_string());
        let mut parts = s.trim().split(':');
        let kind = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();
        let numeric = |index: usize, default: usize| -> Result<usize, TransformError> {
            match args.get(index) {
                Some(arg) => arg.trim().parse().map_err(|_| invalid()),
                None => Ok(default),
            }
        };
        let config = match kind.as_str() {
            "log" => Self::Log,
            "pos" | "positive" => Self::Positive,
            "snv" => Self::StandardNormalVariate,
            "mc" | "mean-centering" => Self::MeanCentering,
            "msc" => Self::MultiplicativeScatterCorrection { reference: None },
            "sg" | "savitzky-golay" => Self::SavitzkyGolay {
                window_size: numeric(0, DEFAULT_WINDOW_SIZE)?,
                polynomial_order: numeric(1, DEFAULT_POLYNOMIAL_ORDER)?,
                derivation_order: numeric(2, DEFAULT_DERIVATION_ORDER)?,
            },
            "norm" => Self::Normalization {
                norm: args.first().map_or_else(default_norm, |norm| norm.to_string()),
            },
            "select" => {
                let indices = args
                    .first()
                    .ok_or_else(invalid)?
                    .split(',')
                    .map(|index| index.trim().parse::<usize>().map_err(|_| invalid()))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::DomainSelection {
                    selection: Selection::Indices(indices),
                    domain: None,
                }
            }
            _ => return Err(invalid()),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Closed set of transforms a pipeline can run, dispatched by variant.
#[derive(Clone, Debug)]
pub enum Preprocessing {
    Log(LogTransform),
    Positive(PositiveShift),
    StandardNormalVariate(StandardNormalVariate),
    MeanCentering(MeanCentering),
    SavitzkyGolay(SavitzkyGolayFilter),
    MultiplicativeScatterCorrection(MultiplicativeScatterCorrection),
    Normalization(Normalization),
    DomainSelection(DomainSelection),
}

impl Preprocessing {
    /// Instantiates `config`; `domain` is the domain of the data that will
    /// reach this stage.
    pub fn from_config(
        config: &TransformConfig,
        domain: &Array1<f64>,
    ) -> Result<Self, TransformError> {
        let transform = match config {
            TransformConfig::Log => Self::Log(LogTransform::new()),
            TransformConfig::Positive => Self::Positive(PositiveShift::new()),
            TransformConfig::StandardNormalVariate => {
                Self::StandardNormalVariate(StandardNormalVariate::new())
            }
            TransformConfig::MeanCentering => Self::MeanCentering(MeanCentering::new()),
            TransformConfig::SavitzkyGolay {
                window_size,
                polynomial_order,
                derivation_order,
            } => Self::SavitzkyGolay(SavitzkyGolayFilter::new(
                *window_size,
                *polynomial_order,
                *derivation_order,
            )?),
            TransformConfig::MultiplicativeScatterCorrection { reference } => {
                Self::MultiplicativeScatterCorrection(match reference {
                    Some(reference) => MultiplicativeScatterCorrection::with_reference(
                        Array1::from(reference.clone()).insert_axis(Axis(0)),
                    ),
                    None => MultiplicativeScatterCorrection::new(),
                })
            }
            TransformConfig::Normalization { norm } => {
                Self::Normalization(Normalization::new(norm)?)
            }
            TransformConfig::DomainSelection {
                selection,
                domain: explicit,
            } => {
                let domain = match explicit {
                    Some(explicit) => Array1::from(explicit.clone()),
                    None => domain.clone(),
                };
                Self::DomainSelection(DomainSelection::new(selection.clone(), domain)?)
            }
        };
        Ok(transform)
    }
}

macro_rules! dispatch {
    ($self:expr, $transform:ident => $body:expr) => {
        match $self {
            Preprocessing::Log($transform) => $body,
            Preprocessing::Positive($transform) => $body,
            Preprocessing::StandardNormalVariate($transform) => $body,
            Preprocessing::MeanCentering($transform) => $body,
            Preprocessing::SavitzkyGolay($transform) => $body,
            Preprocessing::MultiplicativeScatterCorrection($transform) => $body,
            Preprocessing::Normalization($transform) => $body,
            Preprocessing::DomainSelection($transform) => $body,
        }
    };
}

impl SignalTransform for Preprocessing {
    fn name(&self) -> &'static str {
        dispatch!(self, transform => transform.name())
    }

    fn short_name(&self) -> &'static str {
        dispatch!(self, transform => transform.short_name())
    }

    fn fit(
        &mut self,
        x: ArrayView2<f64>,
        reference: Option<ArrayView2<f64>>,
    ) -> Result<&mut Self, TransformError> {
        dispatch!(self, transform => {
            transform.fit(x, reference)?;
        });
        Ok(self)
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        dispatch!(self, transform => transform.transform(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_config_from_json() {
        let json = r#"[
            {"kind": "SavitzkyGolay", "window_size": 7, "polynomial_order": 2, "derivation_order": 1},
            {"kind": "Normalization", "norm": "l2"},
            {"kind": "SNV"},
            {"kind": "MSC"},
            {"kind": "DomainSelection", "selection": [true, false, true]}
        ]"#;
        let configs: Vec<TransformConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(
            configs,
            vec![
                TransformConfig::SavitzkyGolay {
                    window_size: 7,
                    polynomial_order: 2,
                    derivation_order: 1
                },
                TransformConfig::Normalization {
                    norm: "l2".to_string()
                },
                TransformConfig::StandardNormalVariate,
                TransformConfig::MultiplicativeScatterCorrection { reference: None },
                TransformConfig::DomainSelection {
                    selection: Selection::Mask(vec![true, false, true]),
                    domain: None
                },
            ]
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: TransformConfig = serde_json::from_str(r#"{"kind": "SavitzkyGolay"}"#).unwrap();
        assert_eq!(
            config,
            TransformConfig::SavitzkyGolay {
                window_size: 7,
                polynomial_order: 2,
                derivation_order: 1
            }
        );
        let config: TransformConfig = serde_json::from_str(r#"{"kind": "Normalization"}"#).unwrap();
        assert_eq!(
            config,
            TransformConfig::Normalization {
                norm: "l1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_steps() {
        assert_eq!("log".parse::<TransformConfig>().unwrap(), TransformConfig::Log);
        assert_eq!(
            "sg:5:2:0".parse::<TransformConfig>().unwrap(),
            TransformConfig::SavitzkyGolay {
                window_size: 5,
                polynomial_order: 2,
                derivation_order: 0
            }
        );
        assert_eq!(
            "select:0,2".parse::<TransformConfig>().unwrap(),
            TransformConfig::DomainSelection {
                selection: Selection::Indices(vec![0, 2]),
                domain: None
            }
        );
        assert!(matches!(
            "sg:4".parse::<TransformConfig>().unwrap_err(),
            TransformError::EvenWindowSize(4)
        ));
        assert!(matches!(
            "norm:l3".parse::<TransformConfig>().unwrap_err(),
            TransformError::InvalidNorm(_)
        ));
        assert!(matches!(
            "wavelet".parse::<TransformConfig>().unwrap_err(),
            TransformError::InvalidStep(_)
        ));
    }

    #[test]
    fn test_domain_selection_uses_stage_domain() {
        let config = TransformConfig::DomainSelection {
            selection: Selection::Indices(vec![0, 2]),
            domain: None,
        };
        let transform = Preprocessing::from_config(&config, &array![10., 20., 30.]).unwrap();
        let out = transform.transform(array![[1., 2., 3.]].view()).unwrap();
        assert_eq!(out.domain, Some(array![10., 30.]));
        assert_eq!(transform.name(), "Domain selection");
    }

    #[test]
    fn test_msc_config_with_reference() {
        let config = TransformConfig::MultiplicativeScatterCorrection {
            reference: Some(vec![1., 2., 4.]),
        };
        let mut transform = Preprocessing::from_config(&config, &array![1., 2., 3.]).unwrap();
        let x = array![[2., 4., 8.]];
        let out = transform.fit_transform(x.view(), None).unwrap();
        for (got, want) in out.data.iter().zip([1., 2., 4.].iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
