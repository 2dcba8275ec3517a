//! Core data types flowing through the pipeline.

use std::ops::Deref;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Subjects × time points matrix of trial-averaged responses.
///
/// Each row is one subject's response curve; each column is one time point.
/// The matrix is validated on construction (at least one subject, at least
/// one time point) and read-only afterwards.
///
/// Storage is nalgebra's column-major layout, so all subjects' values at a
/// single time point are contiguous (see [`InputMatrix::timepoint`]).
#[derive(Debug, Clone, PartialEq)]
pub struct InputMatrix {
    data: DMatrix<f64>,
}

impl InputMatrix {
    /// Build from a slice of subject rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if there are no rows, the rows are
    /// empty, or the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n_subjects = rows.len();
        if n_subjects == 0 {
            return Err(Error::invalid("input matrix has zero rows"));
        }
        let n_timepoints = rows[0].as_ref().len();
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != n_timepoints)
        {
            return Err(Error::invalid(format!(
                "row {} has {} time points, expected {}",
                i,
                row.as_ref().len(),
                n_timepoints
            )));
        }

        let data = DMatrix::from_fn(n_subjects, n_timepoints, |s, t| rows[s].as_ref()[t]);
        Self::from_dmatrix(data)
    }

    /// Build from a row-major buffer of `n_subjects * n_timepoints` values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on a zero dimension or a buffer of the
    /// wrong length.
    pub fn from_row_slice(n_subjects: usize, n_timepoints: usize, values: &[f64]) -> Result<Self> {
        let expected = n_subjects.checked_mul(n_timepoints).ok_or_else(|| {
            Error::invalid(format!(
                "matrix dimensions {n_subjects} x {n_timepoints} overflow"
            ))
        })?;
        if values.len() != expected {
            return Err(Error::invalid(format!(
                "buffer holds {} values, expected {} x {} = {}",
                values.len(),
                n_subjects,
                n_timepoints,
                expected
            )));
        }
        Self::from_dmatrix(DMatrix::from_row_slice(n_subjects, n_timepoints, values))
    }

    /// Wrap an existing nalgebra matrix (rows = subjects, columns = time points).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either dimension is zero.
    pub fn from_dmatrix(data: DMatrix<f64>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(Error::invalid("input matrix has zero rows"));
        }
        if data.ncols() == 0 {
            return Err(Error::invalid("input matrix has zero columns"));
        }
        Ok(Self { data })
    }

    /// Number of subjects (M).
    pub fn n_subjects(&self) -> usize {
        self.data.nrows()
    }

    /// Number of time points (T).
    pub fn n_timepoints(&self) -> usize {
        self.data.ncols()
    }

    /// Value for `subject` at time point `t`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn value(&self, subject: usize, t: usize) -> f64 {
        self.data[(subject, t)]
    }

    /// All subjects' values at time point `t`, indexed by subject.
    ///
    /// # Panics
    ///
    /// Panics if `t >= n_timepoints()`.
    pub fn timepoint(&self, t: usize) -> &[f64] {
        let m = self.n_subjects();
        &self.data.as_slice()[t * m..(t + 1) * m]
    }

    /// Borrow the underlying matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}

/// Null value the confidence interval is tested against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reference {
    /// One value broadcast across every time point.
    Scalar(f64),
    /// One value per time point (e.g. a baseline curve).
    PerTimepoint(Vec<f64>),
}

impl Default for Reference {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl From<f64> for Reference {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Reference {
    fn from(values: Vec<f64>) -> Self {
        Self::PerTimepoint(values)
    }
}

impl Reference {
    /// Reference value at time point `t`.
    ///
    /// # Panics
    ///
    /// Panics if this is a per-time-point reference shorter than `t + 1`.
    pub fn at(&self, t: usize) -> f64 {
        match self {
            Self::Scalar(value) => *value,
            Self::PerTimepoint(values) => values[t],
        }
    }

    /// Check that the reference can be evaluated at `n_timepoints` points.
    pub(crate) fn check_len(&self, n_timepoints: usize) -> Result<()> {
        match self {
            Self::Scalar(_) => Ok(()),
            Self::PerTimepoint(values) if values.len() == n_timepoints => Ok(()),
            Self::PerTimepoint(values) => Err(Error::invalid(format!(
                "reference has {} values, expected {}",
                values.len(),
                n_timepoints
            ))),
        }
    }
}

/// Per-time-point lower and upper confidence bounds.
///
/// `lower[t] <= upper[t]` holds for every `t` whenever the bootstrap values
/// are ordered (always, unless the input contains NaN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl CiBounds {
    /// Pair up precomputed bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the two sequences differ in length.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(Error::invalid(format!(
                "lower bound has {} points but upper bound has {}",
                lower.len(),
                upper.len()
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound per time point.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bound per time point.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Number of time points covered.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether no time points are covered.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Interval width at time point `t`.
    pub fn width(&self, t: usize) -> f64 {
        self.upper[t] - self.lower[t]
    }

    /// Iterate `(lower, upper)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }

    pub(crate) fn bounds_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.lower, &mut self.upper)
    }
}

/// Per-time-point significance flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignificanceMask(Vec<bool>);

impl SignificanceMask {
    /// Number of significant time points.
    pub fn count_significant(&self) -> usize {
        self.0.iter().filter(|&&flag| flag).count()
    }

    /// Consume the mask, returning the flags.
    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }
}

impl From<Vec<bool>> for SignificanceMask {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

impl Deref for SignificanceMask {
    type Target = [bool];

    fn deref(&self) -> &[bool] {
        &self.0
    }
}

/// Inclusive `[start, end]` span of consecutive significant time points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventWindow {
    /// First significant index.
    pub start: usize,
    /// Last significant index (inclusive).
    pub end: usize,
}

impl EventWindow {
    /// Create a window covering `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "window start {start} past end {end}");
        Self { start, end }
    }

    /// Number of time points covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a window covers at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether time point `t` falls inside the window.
    pub fn contains(&self, t: usize) -> bool {
        (self.start..=self.end).contains(&t)
    }
}

/// Event windows split by the sign of the departure from the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalEvents {
    /// Windows where the whole interval lies above the reference.
    pub positive: Vec<EventWindow>,
    /// Windows where the whole interval lies below the reference.
    pub negative: Vec<EventWindow>,
}
