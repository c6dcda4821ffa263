use crate::error::GridError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Angular unit used in cell size labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    /// `D`, one degree
    Degree,
    /// `M`, one arc-minute
    Minute,
    /// `S`, one arc-second
    Second,
    /// `MS`, one thousandth of an arc-second
    MilliSecond,
    /// `MMS`, one millionth of an arc-second
    MicroSecond,
}

impl Unit {
    /// Number of this unit in one degree.
    pub const fn factor(self) -> f64 {
        match self {
            Unit::Degree => 1.0,
            Unit::Minute => 60.0,
            Unit::Second => 3_600.0,
            Unit::MilliSecond => 3_600_000.0,
            Unit::MicroSecond => 3_600_000_000.0,
        }
    }

    /// Token used in cell identifiers.
    pub const fn token(self) -> &'static str {
        match self {
            Unit::Degree => "D",
            Unit::Minute => "M",
            Unit::Second => "S",
            Unit::MilliSecond => "MS",
            Unit::MicroSecond => "MMS",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Unit {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(Unit::Degree),
            "M" => Ok(Unit::Minute),
            "S" => Ok(Unit::Second),
            "MS" => Ok(Unit::MilliSecond),
            "MMS" => Ok(Unit::MicroSecond),
            other => Err(GridError::UnknownUnit(other.to_string())),
        }
    }
}

/// How many cells of size `magnitude` (in `unit`) fit in `value` degrees.
pub fn degrees_to_cell_count(value: f64, unit: Unit, magnitude: f64) -> f64 {
    value * unit.factor() / magnitude
}

/// Inverse of [`degrees_to_cell_count`].
pub fn cell_count_to_degrees(count: f64, unit: Unit, magnitude: f64) -> f64 {
    count / unit.factor() * magnitude
}

/// Half-open arithmetic progression `start, start + step, ...` below `stop`.
///
/// Values are computed as `start + i * step` so long runs do not accumulate
/// rounding drift. The iterator is `Clone`; cloning a fresh range restarts it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticRange {
    start: f64,
    stop: f64,
    step: f64,
    index: u64,
}

impl ArithmeticRange {
    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    fn remaining(&self) -> usize {
        if self.start >= self.stop {
            return 0;
        }
        let total = ((self.stop - self.start) / self.step).ceil() as u64;
        total.saturating_sub(self.index) as usize
    }
}

/// Builds an [`ArithmeticRange`].
///
/// Returns [`GridError::InvalidStep`] unless `step` is finite and positive.
///
/// # Example
/// ```
/// use geogrid_rs::arithmetic_range;
///
/// let values: Vec<f64> = arithmetic_range(0.0, 1.0, 0.25).unwrap().collect();
/// assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75]);
/// ```
pub fn arithmetic_range(start: f64, stop: f64, step: f64) -> Result<ArithmeticRange, GridError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(GridError::InvalidStep(step));
    }
    if !start.is_finite() || !stop.is_finite() {
        return Err(GridError::InvalidBounds(format!(
            "range [{}, {}) is not finite",
            start, stop
        )));
    }
    Ok(ArithmeticRange {
        start,
        stop,
        step,
        index: 0,
    })
}

impl Iterator for ArithmeticRange {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.start + self.index as f64 * self.step;
        if value < self.stop {
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining.saturating_sub(1), Some(remaining + 1))
    }
}
