use crate::error::GridError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Latitude band controlling how much a cell widens in longitude.
///
/// | Zone | `abs(lat)`   | Factor |
/// |------|--------------|--------|
/// | 1    | `[0, 50)`    | 1      |
/// | 2    | `[50, 70]`   | 2      |
/// | 3    | `(70, 75]`   | 3      |
/// | 4    | `(75, 80]`   | 4      |
/// | 5    | `(80, 90]`   | 6      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Zone {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Zone {
    /// Zone number as written in cell identifiers (1-5).
    pub const fn number(self) -> u8 {
        match self {
            Zone::One => 1,
            Zone::Two => 2,
            Zone::Three => 3,
            Zone::Four => 4,
            Zone::Five => 5,
        }
    }

    /// Longitude widening factor relative to the north-south cell size.
    pub const fn factor(self) -> u32 {
        match self {
            Zone::One => 1,
            Zone::Two => 2,
            Zone::Three => 3,
            Zone::Four => 4,
            Zone::Five => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Zone::One),
            2 => Some(Zone::Two),
            3 => Some(Zone::Three),
            4 => Some(Zone::Four),
            5 => Some(Zone::Five),
            _ => None,
        }
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Resolves the zone for a latitude in decimal degrees.
///
/// Only the absolute value matters, so both hemispheres share the same bands.
///
/// # Example
/// ```
/// use geogrid_rs::{Zone, resolve_zone};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let zone = resolve_zone(52.26)?;
/// assert_eq!(zone, Zone::Two);
/// assert_eq!(zone.factor(), 2);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// [`GridError::InvalidLatitude`] if the latitude is not finite or `abs(lat) > 90`.
pub fn resolve_zone(latitude: f64) -> Result<Zone, GridError> {
    let lat = latitude.abs();
    if lat < 50.0 {
        Ok(Zone::One)
    } else if lat <= 70.0 {
        Ok(Zone::Two)
    } else if lat <= 75.0 {
        Ok(Zone::Three)
    } else if lat <= 80.0 {
        Ok(Zone::Four)
    } else if lat <= 90.0 {
        Ok(Zone::Five)
    } else {
        // NaN fails every comparison and ends up here too
        Err(GridError::InvalidLatitude(latitude))
    }
}
