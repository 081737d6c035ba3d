//! Range/band lookup shared by every scoring engine.
//!
//! A band covers the half-open interval `[lower, upper)`. A `None` bound is
//! open-ended, which is only allowed on the first band's lower side and the
//! last band's upper side. Tables are validated once, when built.

use serde::Serialize;

use super::ScoringError;

/// One row of a threshold table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band<T> {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub value: T,
}

impl<T> Band<T> {
    pub fn new(lower: Option<f64>, upper: Option<f64>, value: T) -> Self {
        Self { lower, upper, value }
    }

    fn contains(&self, x: f64) -> bool {
        let above_lower = self.lower.map_or(true, |lo| x >= lo);
        let below_upper = self.upper.map_or(true, |hi| x < hi);
        above_lower && below_upper
    }
}

/// Ordered, contiguous, non-overlapping bands mapping a measurement to a
/// point value or category label.
#[derive(Debug, Clone, Serialize)]
pub struct BandTable<T> {
    name: &'static str,
    bands: Vec<Band<T>>,
}

impl<T> BandTable<T> {
    /// Build a table, rejecting empty, overlapping or gapped band lists.
    pub fn new(name: &'static str, bands: Vec<Band<T>>) -> Result<Self, ScoringError> {
        let malformed = |message: String| ScoringError::Configuration {
            table: name.to_string(),
            message,
        };

        if bands.is_empty() {
            return Err(malformed("table has no bands".into()));
        }

        for (i, band) in bands.iter().enumerate() {
            if band.lower.is_some_and(f64::is_nan) || band.upper.is_some_and(f64::is_nan) {
                return Err(malformed(format!("band {i} has a NaN bound")));
            }
            if let (Some(lo), Some(hi)) = (band.lower, band.upper) {
                if lo >= hi {
                    return Err(malformed(format!(
                        "band {i} is empty or inverted ({lo} .. {hi})"
                    )));
                }
            }
        }

        for (i, pair) in bands.windows(2).enumerate() {
            match (pair[0].upper, pair[1].lower) {
                (Some(hi), Some(lo)) if hi == lo => {}
                (Some(hi), Some(lo)) if hi > lo => {
                    return Err(malformed(format!(
                        "bands {i} and {} overlap ({hi} > {lo})",
                        i + 1
                    )));
                }
                (Some(hi), Some(lo)) => {
                    return Err(malformed(format!(
                        "gap between bands {i} and {} ({hi} .. {lo})",
                        i + 1
                    )));
                }
                _ => {
                    return Err(malformed(format!(
                        "open bound between bands {i} and {}",
                        i + 1
                    )));
                }
            }
        }

        Ok(Self { name, bands })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bands(&self) -> &[Band<T>] {
        &self.bands
    }

    /// Return the value of the band containing `x`.
    ///
    /// Values below the first band, at or above a closed last band, and NaN
    /// are [`ScoringError::OutOfRange`].
    pub fn lookup(&self, x: f64) -> Result<&T, ScoringError> {
        if x.is_nan() {
            return Err(self.out_of_range(x));
        }
        self.bands
            .iter()
            .find(|band| band.contains(x))
            .map(|band| &band.value)
            .ok_or_else(|| self.out_of_range(x))
    }

    fn out_of_range(&self, value: f64) -> ScoringError {
        ScoringError::OutOfRange {
            field: self.name.to_string(),
            value,
        }
    }
}

impl<T: Copy> BandTable<T> {
    /// Copying variant of [`BandTable::lookup`] for point and label tables.
    pub fn points(&self, x: f64) -> Result<T, ScoringError> {
        self.lookup(x).copied()
    }
}
