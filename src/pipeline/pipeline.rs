// hyperspectrs/src/pipeline/pipeline.rs

use super::errors::PipelineError;
use crate::spectral::Spectral;
use crate::transforms::{Preprocessing, SignalTransform, TransformConfig};
use humantime::format_duration;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView2};
use std::time::Instant;

#[derive(Default)]
pub struct PipelineBuilder<'a> {
    steps: Option<&'a Vec<TransformConfig>>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn build(&self) -> Result<Pipeline, PipelineError> {
        let steps = self
            .steps
            .ok_or_else(|| PipelineError::UninitializedFieldError("steps".to_string()))?;
        Self::validate_steps(steps)?;
        Ok(Pipeline {
            steps: steps.clone(),
        })
    }

    fn validate_steps(steps: &[TransformConfig]) -> Result<(), PipelineError> {
        for (index, step) in steps.iter().enumerate() {
            step.validate()
                .map_err(PipelineError::stage(index, step.kind()))?;
        }
        Ok(())
    }

    pub fn steps(&mut self, steps: &'a Vec<TransformConfig>) -> &mut Self {
        self.steps = Some(steps);
        self
    }
}

/// Ordered chain of transforms. Every stage is instantiated, fitted and
/// applied in turn on the output of the previous one.
#[derive(Clone, Debug)]
pub struct Pipeline {
    steps: Vec<TransformConfig>,
}

impl Pipeline {
    pub fn steps(&self) -> &[TransformConfig] {
        &self.steps
    }

    /// Runs the pipeline on `spectral` and returns a new container with the
    /// same spatial geometry and the final domain. Nothing is returned if any
    /// stage fails.
    pub fn run<S: Spectral>(&self, spectral: &S) -> Result<S, PipelineError> {
        let matrix = spectral.get_matrix()?;
        let (data, domain) = self.fit_transform(matrix.view(), spectral.domain())?;
        Ok(spectral.rebuild(data, domain)?)
    }

    /// Matrix level entry point: returns the processed matrix and the domain
    /// labelling its columns.
    pub fn fit_transform(
        &self,
        matrix: ArrayView2<f64>,
        domain: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array1<f64>), PipelineError> {
        info!(
            "Running {} preprocessing stages on {} spectra of length {}",
            self.steps.len(),
            matrix.nrows(),
            matrix.ncols()
        );
        let now = Instant::now();
        let mut data = matrix.to_owned();
        let mut domain = domain.clone();
        for (index, step) in self.steps.iter().enumerate() {
            let stage_start = Instant::now();
            let on_error = PipelineError::stage(index, step.kind());
            let mut transform = Preprocessing::from_config(step, &domain).map_err(&on_error)?;
            let output = transform
                .fit_transform(data.view(), None)
                .map_err(&on_error)?;
            if let Some(new_domain) = output.domain {
                debug!(
                    "{} changed the domain length from {} to {}",
                    transform.name(),
                    domain.len(),
                    new_domain.len()
                );
                domain = new_domain;
            }
            data = output.data;
            debug!(
                "Stage {} ({}) produced {:?} in {}",
                index,
                transform.short_name(),
                data.dim(),
                format_duration(stage_start.elapsed())
            );
        }
        info!(
            "Preprocessing finished in {}",
            format_duration(now.elapsed())
        );
        Ok((data, domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::{SpectralCube, SpectralMat};
    use crate::transforms::{Selection, TransformError};
    use ndarray::{array, Array, Array3};

    fn cube() -> SpectralCube {
        let data = Array::range(1., 19., 1.).into_shape((2, 3, 3)).unwrap();
        SpectralCube::new(data, array![10., 20., 30.]).unwrap()
    }

    fn pipeline(steps: &Vec<TransformConfig>) -> Pipeline {
        PipelineBuilder::default().steps(steps).build().unwrap()
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let cube = cube();
        let steps = vec![];
        let out = pipeline(&steps).run(&cube).unwrap();
        assert_eq!(out, cube);
    }

    #[test]
    fn test_domain_selection_propagates_domain() {
        let cube = cube();
        let steps = vec![TransformConfig::DomainSelection {
            selection: Selection::Indices(vec![0, 2]),
            domain: Some(vec![10., 20., 30.]),
        }];
        let out = pipeline(&steps).run(&cube).unwrap();
        assert_eq!(out.shape(), (2, 3, 2));
        assert_eq!(out.domain(), &array![10., 30.]);
        assert_eq!(out.data()[[0, 1, 0]], 4.);
        assert_eq!(out.data()[[0, 1, 1]], 6.);
    }

    #[test]
    fn test_later_domain_update_wins() {
        let cube = cube();
        let steps = vec![
            TransformConfig::DomainSelection {
                selection: Selection::Indices(vec![0, 1]),
                domain: None,
            },
            TransformConfig::MeanCentering,
            TransformConfig::DomainSelection {
                selection: Selection::Mask(vec![false, true]),
                domain: None,
            },
        ];
        let out = pipeline(&steps).run(&cube).unwrap();
        assert_eq!(out.shape(), (2, 3, 1));
        assert_eq!(out.domain(), &array![20.]);
        assert!(out.data().iter().all(|&value| (value - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_stages_are_fitted_on_previous_output() {
        // MSC sees the normalised rows, not the raw ones
        let mat = SpectralMat::new(
            array![[1., 2., 4.], [2., 4., 8.], [3., 6., 12.]],
            array![1., 2., 3.],
        )
        .unwrap();
        let steps = vec![
            TransformConfig::Normalization {
                norm: "l1".to_string(),
            },
            TransformConfig::MultiplicativeScatterCorrection { reference: None },
        ];
        let out = pipeline(&steps).run(&mat).unwrap();
        let expected = [1. / 7., 2. / 7., 4. / 7.];
        for row in out.data().rows() {
            for (got, want) in row.iter().zip(expected.iter()) {
                assert!((got - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_failing_stage_aborts() {
        let single_pixel =
            SpectralCube::new(Array3::from_elem((1, 1, 3), 1.), array![1., 2., 3.]).unwrap();
        let steps = vec![
            TransformConfig::Log,
            TransformConfig::MultiplicativeScatterCorrection { reference: None },
        ];
        let err = pipeline(&steps).run(&single_pixel).unwrap_err();
        match err {
            PipelineError::Stage {
                index,
                kind,
                source: TransformError::MissingReference,
            } => {
                assert_eq!(index, 1);
                assert_eq!(kind, "MultiplicativeScatterCorrection");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_short_signal_aborts() {
        let steps = vec![TransformConfig::SavitzkyGolay {
            window_size: 7,
            polynomial_order: 2,
            derivation_order: 1,
        }];
        let err = pipeline(&steps).run(&cube()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Stage {
                source: TransformError::SignalTooShort(3, 7),
                ..
            }
        ));
    }

    #[test]
    fn test_explicit_domain_must_match_output() {
        let steps = vec![TransformConfig::DomainSelection {
            selection: Selection::Indices(vec![0]),
            domain: Some(vec![1., 2.]),
        }];
        let err = pipeline(&steps).run(&cube()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Stage {
                source: TransformError::ColumnMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_builder_errors() {
        let err = PipelineBuilder::default().build().unwrap_err();
        assert!(matches!(err, PipelineError::UninitializedFieldError(_)));

        let steps = vec![
            TransformConfig::Log,
            TransformConfig::Normalization {
                norm: "l4".to_string(),
            },
        ];
        let err = PipelineBuilder::default().steps(&steps).build().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Stage {
                index: 1,
                source: TransformError::InvalidNorm(_),
                ..
            }
        ));
    }

    #[test]
    fn test_matrix_round_trip_through_pipeline() {
        let steps = vec![TransformConfig::SavitzkyGolay {
            window_size: 3,
            polynomial_order: 0,
            derivation_order: 0,
        }];
        let mat = SpectralMat::new(array![[1., 2., 3., 4., 5.]], array![1., 2., 3., 4., 5.])
            .unwrap();
        let out = pipeline(&steps).run(&mat).unwrap();
        for (got, want) in out.data().iter().zip(mat.data().iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
