use crate::error::GridError;
use crate::index::units::Unit;
use serde::Serialize;
use std::fmt;

/// Geodetic datum written into every cell identifier
pub const DATUM: &str = "ETRS89-GRS80";

/// Maximum resolution level
pub const MAX_LEVEL: u8 = 24;

pub(crate) const ARC_SECONDS_PER_DEGREE: f64 = 3600.0;

/// Nominal ETRS89 coverage area `[[min_lat, min_lon], [max_lat, max_lon]]`
pub const ETRS89_COVERAGE: [[f64; 2]; 2] = [[32.88, -16.1], [84.73, 40.18]];

/// One row of the level table: the north-south cell size in arc-seconds and
/// its canonical `(magnitude, unit)` label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    /// North-south cell size in arc-seconds
    pub spacing: f64,
    /// Magnitude of the label, in `unit`
    pub magnitude: u32,
    /// Unit of the label
    pub unit: Unit,
}

const fn spec(spacing: f64, magnitude: u32, unit: Unit) -> LevelSpec {
    LevelSpec {
        spacing,
        magnitude,
        unit,
    }
}

/// Cell size for each resolution level (0-24)
pub const LEVELS: [LevelSpec; 25] = [
    spec(3600.0, 1, Unit::Degree),
    spec(3000.0, 50, Unit::Minute),
    spec(1800.0, 30, Unit::Minute),
    spec(1200.0, 20, Unit::Minute),
    spec(600.0, 10, Unit::Minute),
    spec(300.0, 5, Unit::Minute),
    spec(120.0, 2, Unit::Minute),
    spec(60.0, 1, Unit::Minute),
    spec(30.0, 30, Unit::Second),
    spec(15.0, 15, Unit::Second),
    spec(5.0, 5, Unit::Second),
    spec(3.0, 3, Unit::Second),
    spec(1.5, 1500, Unit::MilliSecond),
    spec(1.0, 1000, Unit::MilliSecond),
    spec(0.75, 750, Unit::MilliSecond),
    spec(0.5, 500, Unit::MilliSecond),
    spec(0.3, 300, Unit::MilliSecond),
    spec(0.15, 150, Unit::MilliSecond),
    spec(0.1, 100, Unit::MilliSecond),
    spec(0.075, 75, Unit::MilliSecond),
    spec(0.03, 30, Unit::MilliSecond),
    spec(0.015, 15, Unit::MilliSecond),
    spec(0.01, 10, Unit::MilliSecond),
    spec(0.0075, 7500, Unit::MicroSecond),
    spec(0.003, 3000, Unit::MicroSecond),
];

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// A validated resolution level in `0..=MAX_LEVEL`.
///
/// Higher levels select finer cells. The level is the only handle on the
/// level table, so an out-of-range index cannot reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolutionLevel(u8);

impl ResolutionLevel {
    pub fn new(level: u8) -> Result<Self, GridError> {
        if level > MAX_LEVEL {
            return Err(GridError::InvalidLevel(level));
        }
        Ok(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn spec(self) -> &'static LevelSpec {
        &LEVELS[self.0 as usize]
    }

    /// North-south cell size in arc-seconds.
    pub fn spacing_arcsec(self) -> f64 {
        self.spec().spacing
    }

    /// North-south cell size in decimal degrees.
    pub fn spacing_degrees(self) -> f64 {
        self.spec().spacing / ARC_SECONDS_PER_DEGREE
    }

    /// Canonical `(magnitude, unit)` label.
    pub fn label(self) -> (u32, Unit) {
        let spec = self.spec();
        (spec.magnitude, spec.unit)
    }

    /// Finds the level whose label is exactly `(magnitude, unit)`.
    pub fn from_label(magnitude: u32, unit: Unit) -> Option<Self> {
        LEVELS
            .iter()
            .position(|spec| spec.magnitude == magnitude && spec.unit == unit)
            .map(|idx| Self(idx as u8))
    }

    /// All levels, coarsest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_LEVEL).map(Self)
    }
}

impl TryFrom<u8> for ResolutionLevel {
    type Error = GridError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<ResolutionLevel> for u8 {
    fn from(level: ResolutionLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ResolutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
