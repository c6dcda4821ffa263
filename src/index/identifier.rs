use crate::coord::{BoundingBox, GeoPoint};
use crate::index::constants::{DATUM, ResolutionLevel};
use crate::index::units::{Unit, cell_count_to_degrees};
use crate::index::zone::Zone;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^Grid_{}_z(\d+)_(\d+)([A-Z]+)_([NS])(\d+)_([EW])(\d+)$",
        regex::escape(DATUM)
    );
    Regex::new(&pattern).expect("cell identifier pattern is a valid regex")
});

/// North or south of the equator. The equator itself counts as north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LatHemisphere {
    North,
    South,
}

impl LatHemisphere {
    pub fn of(lat: f64) -> Self {
        if lat >= 0.0 {
            LatHemisphere::North
        } else {
            LatHemisphere::South
        }
    }

    pub const fn sign(self) -> f64 {
        match self {
            LatHemisphere::North => 1.0,
            LatHemisphere::South => -1.0,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            LatHemisphere::North => 'N',
            LatHemisphere::South => 'S',
        }
    }
}

/// East or west of the prime meridian. The meridian itself counts as east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LonHemisphere {
    East,
    West,
}

impl LonHemisphere {
    pub fn of(lon: f64) -> Self {
        if lon >= 0.0 {
            LonHemisphere::East
        } else {
            LonHemisphere::West
        }
    }

    pub const fn sign(self) -> f64 {
        match self {
            LonHemisphere::East => 1.0,
            LonHemisphere::West => -1.0,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            LonHemisphere::East => 'E',
            LonHemisphere::West => 'W',
        }
    }
}

/// The parsed form of a cell identifier.
///
/// `Display` writes the canonical identifier and [`CellKey::parse`] reads it
/// back, so both directions share one definition of the format:
///
/// ```text
/// Grid_ETRS89-GRS80_z{zone}_{magnitude}{unit}_{N|S}{lat_index}_{E|W}{lon_index}
/// ```
///
/// # Example
/// ```
/// use geogrid_rs::CellKey;
///
/// let key = CellKey::parse("Grid_ETRS89-GRS80_z2_5S_N37627_E3789").unwrap();
/// assert_eq!(key.lat_index, 37627);
/// assert_eq!(key.to_string(), "Grid_ETRS89-GRS80_z2_5S_N37627_E3789");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellKey {
    pub zone: Zone,
    pub level: ResolutionLevel,
    pub lat_hemisphere: LatHemisphere,
    /// Whole cells counted from the equator
    pub lat_index: u64,
    pub lon_hemisphere: LonHemisphere,
    /// Whole (zone-widened) cells counted from the prime meridian
    pub lon_index: u64,
}

impl CellKey {
    /// Parses a canonical identifier.
    ///
    /// Returns `None` for anything that is not a well-formed identifier of a
    /// known zone and resolution: wrong datum or layout, zone outside 1-5, a
    /// unit or `(magnitude, unit)` label missing from the level table, an
    /// index that does not fit in a `u64`, or text that is not the canonical
    /// spelling (leading zeros such as `z02` or `05S`).
    pub fn parse(identifier: &str) -> Option<Self> {
        let caps = IDENTIFIER_PATTERN.captures(identifier)?;

        let zone = Zone::from_number(caps[1].parse().ok()?)?;
        let magnitude: u32 = caps[2].parse().ok()?;
        let unit: Unit = caps[3].parse().ok()?;
        let level = ResolutionLevel::from_label(magnitude, unit)?;
        let lat_hemisphere = match &caps[4] {
            "N" => LatHemisphere::North,
            _ => LatHemisphere::South,
        };
        let lat_index = caps[5].parse().ok()?;
        let lon_hemisphere = match &caps[6] {
            "E" => LonHemisphere::East,
            _ => LonHemisphere::West,
        };
        let lon_index = caps[7].parse().ok()?;

        let key = Self {
            zone,
            level,
            lat_hemisphere,
            lat_index,
            lon_hemisphere,
            lon_index,
        };
        (key.to_string() == identifier).then_some(key)
    }

    /// Reconstructs the cell rectangle.
    ///
    /// The corner nearest the equator and prime meridian is the cell origin;
    /// the opposite corner adds one cell size (zone-widened in longitude) with
    /// the hemisphere sign applied once. The result is normalized so that
    /// `min <= max` on both axes.
    pub fn bounds(&self) -> BoundingBox {
        let spec = self.level.spec();
        let magnitude = f64::from(spec.magnitude);
        let factor = f64::from(self.zone.factor());
        let lat_sign = self.lat_hemisphere.sign();
        let lon_sign = self.lon_hemisphere.sign();

        let origin_lat = cell_count_to_degrees(self.lat_index as f64, spec.unit, magnitude) * lat_sign;
        let origin_lon =
            cell_count_to_degrees(self.lon_index as f64, spec.unit, magnitude) * factor * lon_sign;

        let increment = self.level.spacing_degrees();
        let far_lat = origin_lat + increment * lat_sign;
        let far_lon = origin_lon + increment * factor * lon_sign;

        BoundingBox::from_corners(
            GeoPoint::new(origin_lat, origin_lon),
            GeoPoint::new(far_lat, far_lon),
        )
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grid_{}_z{}_{}_{}{}_{}{}",
            DATUM,
            self.zone,
            self.level.spec(),
            self.lat_hemisphere.letter(),
            self.lat_index,
            self.lon_hemisphere.letter(),
            self.lon_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn key(level: u8) -> Result<CellKey, GridError> {
        Ok(CellKey {
            zone: Zone::Two,
            level: ResolutionLevel::new(level)?,
            lat_hemisphere: LatHemisphere::North,
            lat_index: 37627,
            lon_hemisphere: LonHemisphere::East,
            lon_index: 3789,
        })
    }

    #[test]
    fn test_format() -> Result<(), GridError> {
        assert_eq!(key(10)?.to_string(), "Grid_ETRS89-GRS80_z2_5S_N37627_E3789");
        assert_eq!(
            key(12)?.to_string(),
            "Grid_ETRS89-GRS80_z2_1500MS_N37627_E3789"
        );
        assert_eq!(
            key(24)?.to_string(),
            "Grid_ETRS89-GRS80_z2_3000MMS_N37627_E3789"
        );
        Ok(())
    }

    #[test]
    fn test_format_then_parse_every_level() -> Result<(), GridError> {
        for level in 0..=24 {
            let original = key(level)?;
            let parsed = CellKey::parse(&original.to_string());
            assert_eq!(parsed, Some(original));
        }
        Ok(())
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let rejected = [
            "not-a-cell",
            "",
            "Grid_WGS84_z2_5S_N37627_E3789",
            "Grid_ETRS89-GRS80_z2_5S_N37627",
            "Grid_ETRS89-GRS80_z2_5S_N37627_E3789_extra",
            "Grid_ETRS89-GRS80_z2_5S_X37627_E3789",
            "Grid_ETRS89-GRS80_z2_5S_N37627.5_E3789",
            "Grid_ETRS89-GRS80_z2_5S_N-37627_E3789",
            " Grid_ETRS89-GRS80_z2_5S_N37627_E3789",
        ];
        for identifier in rejected {
            assert_eq!(CellKey::parse(identifier), None, "{}", identifier);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_zone_and_resolution() {
        assert_eq!(CellKey::parse("Grid_ETRS89-GRS80_z0_5S_N1_E1"), None);
        assert_eq!(CellKey::parse("Grid_ETRS89-GRS80_z6_5S_N1_E1"), None);
        // known unit, no level with that magnitude
        assert_eq!(CellKey::parse("Grid_ETRS89-GRS80_z1_7S_N1_E1"), None);
        // unknown unit
        assert_eq!(CellKey::parse("Grid_ETRS89-GRS80_z1_5KM_N1_E1"), None);
        // index overflows u64
        assert_eq!(
            CellKey::parse("Grid_ETRS89-GRS80_z1_5S_N99999999999999999999999_E1"),
            None
        );
    }

    #[test]
    fn test_parse_rejects_non_canonical_numbers() {
        let rejected = [
            "Grid_ETRS89-GRS80_z02_5S_N37627_E3789",
            "Grid_ETRS89-GRS80_z2_05S_N37627_E3789",
            "Grid_ETRS89-GRS80_z2_5S_N037627_E3789",
            "Grid_ETRS89-GRS80_z2_5S_N37627_E03789",
            "Grid_ETRS89-GRS80_z02_05S_N037627_E3789",
        ];
        for identifier in rejected {
            assert_eq!(CellKey::parse(identifier), None, "{}", identifier);
        }
        // zero itself is canonical
        assert!(CellKey::parse("Grid_ETRS89-GRS80_z1_5S_N0_E0").is_some());
    }

    #[test]
    fn test_bounds_north_east() -> Result<(), GridError> {
        let bounds = key(10)?.bounds();
        assert!((bounds.min.lat - 52.259722).abs() < 1e-6);
        assert!((bounds.max.lat - bounds.min.lat - 5.0 / 3600.0).abs() < 1e-12);
        assert!((bounds.max.lon - bounds.min.lon - 10.0 / 3600.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_bounds_south_west_single_sign() -> Result<(), GridError> {
        let mut south_west = key(10)?;
        south_west.lat_hemisphere = LatHemisphere::South;
        south_west.lon_hemisphere = LonHemisphere::West;

        let ne = key(10)?.bounds();
        let sw = south_west.bounds();

        // mirror image of the north-east cell
        assert_eq!(sw.max.lat, -ne.min.lat);
        assert_eq!(sw.min.lon, -ne.max.lon);
        assert!((sw.min.lat + ne.max.lat).abs() < 1e-12);
        assert!((sw.max.lon + ne.min.lon).abs() < 1e-12);
        assert!(sw.min.lat < sw.max.lat);
        assert!(sw.min.lon < sw.max.lon);
        Ok(())
    }
}
