//! Forward transform backends
//!
//! The engine only needs `N real samples -> N/2 + 1 complex bins`; any real
//! FFT satisfies that. Two backends are provided: a dedicated real-input FFT
//! (`realfft`) and a full complex FFT (`rustfft`) whose upper, mirrored half is
//! dropped.

use crate::error::TransformError;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Real-input forward DFT of a fixed length
pub trait Transform: Send {
    /// Transform length N
    fn size(&self) -> usize;

    /// Number of output bins (N/2 + 1)
    fn num_bins(&self) -> usize {
        self.size() / 2 + 1
    }

    /// Transform `input` (length N) into `output` (length N/2 + 1)
    ///
    /// `input` is used as scratch space and is left in an unspecified state.
    fn process(
        &mut self,
        input: &mut [f64],
        output: &mut [Complex64],
    ) -> Result<(), TransformError>;
}

/// Available transform implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformBackend {
    /// Real-input FFT, computes only the non-redundant half
    #[default]
    RealFft,

    /// Full complex FFT
    ComplexFft,
}

impl TransformBackend {
    /// Plan a transform of length `size`
    pub fn plan(&self, size: usize) -> Box<dyn Transform> {
        match self {
            TransformBackend::RealFft => Box::new(RealFftTransform::new(size)),
            TransformBackend::ComplexFft => Box::new(ComplexFftTransform::new(size)),
        }
    }
}

fn check_lengths(input: &[f64], output: &[Complex64], size: usize) -> Result<(), TransformError> {
    if input.len() != size {
        return Err(TransformError::LengthMismatch {
            expected: size,
            actual: input.len(),
        });
    }
    if output.len() != size / 2 + 1 {
        return Err(TransformError::LengthMismatch {
            expected: size / 2 + 1,
            actual: output.len(),
        });
    }
    Ok(())
}

/// Real FFT via `realfft`
pub struct RealFftTransform {
    size: usize,
    r2c: Arc<dyn RealToComplex<f64>>,
    scratch: Vec<Complex64>,
}

impl RealFftTransform {
    pub fn new(size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(size);
        let scratch = r2c.make_scratch_vec();

        Self { size, r2c, scratch }
    }
}

impl Transform for RealFftTransform {
    fn size(&self) -> usize {
        self.size
    }

    fn process(
        &mut self,
        input: &mut [f64],
        output: &mut [Complex64],
    ) -> Result<(), TransformError> {
        check_lengths(input, output, self.size)?;

        self.r2c
            .process_with_scratch(input, output, &mut self.scratch)
            .map_err(|e| TransformError::Backend(e.to_string()))
    }
}

/// Complex FFT via `rustfft`
///
/// Real input is promoted to complex; only bins 0..=N/2 are kept.
pub struct ComplexFftTransform {
    size: usize,
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl ComplexFftTransform {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(size);
        let buffer = vec![Complex64::new(0.0, 0.0); size];
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            size,
            fft,
            buffer,
            scratch,
        }
    }
}

impl Transform for ComplexFftTransform {
    fn size(&self) -> usize {
        self.size
    }

    fn process(
        &mut self,
        input: &mut [f64],
        output: &mut [Complex64],
    ) -> Result<(), TransformError> {
        check_lengths(input, output, self.size)?;

        for (c, &x) in self.buffer.iter_mut().zip(input.iter()) {
            *c = Complex64::new(x, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        output.copy_from_slice(&self.buffer[..output.len()]);

        // Real input: DC and Nyquist carry no imaginary part
        let last = output.len() - 1;
        output[0].im = 0.0;
        output[last].im = 0.0;

        Ok(())
    }
}
