//! Characteristic sample sets.
//!
//! A [`SampleSet`] holds the (x, y) points of a characteristic curve after
//! preprocessing: finite, sorted ascending by x, rounded to single precision,
//! optionally mirrored through the origin, with no two points sharing an x.

use crate::error::{NlindError, Result};

/// Minimum number of points needed to form one segment.
pub const MIN_POINTS: usize = 2;

/// A single point of a characteristic curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest single-precision value.
    fn to_single(self) -> Self {
        Self {
            x: self.x as f32 as f64,
            y: self.y as f32 as f64,
        }
    }

    fn mirrored(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Validated, sorted sample points ready for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Build a sample set from raw (x, y) pairs.
    ///
    /// With `odd` set, every point is mirrored through the origin and an
    /// explicit (0, 0) point is inserted; all supplied x must then be
    /// strictly positive.
    pub fn new(points: &[(f64, f64)], odd: bool) -> Result<Self> {
        for (index, &(x, y)) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(NlindError::NonFiniteSample { index, x, y });
            }
        }

        if odd {
            if points.is_empty() {
                return Err(NlindError::TooFewPoints { count: 0 });
            }
            let min_x = points
                .iter()
                .map(|&(x, _)| x)
                .fold(f64::INFINITY, f64::min);
            if min_x <= 0.0 {
                return Err(NlindError::NonPositiveOddDomain { min_x });
            }
        }

        let mut samples = Vec::with_capacity(points.len());
        for (index, &(x, y)) in points.iter().enumerate() {
            let sample = Sample::new(x, y).to_single();
            if !sample.x.is_finite() || !sample.y.is_finite() {
                return Err(NlindError::SampleOutOfRange { index, x, y });
            }
            samples.push(sample);
        }
        samples.sort_by(|a, b| a.x.total_cmp(&b.x));

        if odd {
            let positive = samples;
            samples = positive
                .iter()
                .rev()
                .map(|s| s.mirrored())
                .chain(std::iter::once(Sample::new(0.0, 0.0)))
                .chain(positive.iter().copied())
                .collect();
        }

        if samples.len() < MIN_POINTS {
            return Err(NlindError::TooFewPoints {
                count: samples.len(),
            });
        }

        if let Some(pair) = samples.windows(2).find(|w| w[0].x == w[1].x) {
            return Err(NlindError::DuplicateBreakpoint { x: pair[0].x });
        }

        Ok(Self { samples })
    }

    /// Build a sample set from separate x and y columns.
    pub fn from_columns(xs: &[f64], ys: &[f64], odd: bool) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(NlindError::table(
                0,
                format!("column lengths differ: {} x values, {} y values", xs.len(), ys.len()),
            ));
        }
        let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        Self::new(&points, odd)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Breakpoint x-coordinates in ascending order.
    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of polynomial segments between the breakpoints.
    pub fn segment_count(&self) -> usize {
        self.samples.len() - 1
    }
}
