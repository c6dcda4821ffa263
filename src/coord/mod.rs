use crate::error::GridError;
use geo_types::{Coord, Point, Polygon, Rect, coord};
use serde::{Deserialize, Serialize};

/// Trait for types that can provide geographic coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>`,
/// `geo_types::Coord<f64>` and [`GeoPoint`]. Tuples and `geo_types` values
/// follow the GIS axis order `(x, y) = (lon, lat)`.
pub trait Coordinate {
    /// Returns the longitude (x) in decimal degrees.
    fn lon(&self) -> f64;
    /// Returns the latitude (y) in decimal degrees.
    fn lat(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn lon(&self) -> f64 {
        self.0
    }
    fn lat(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn lon(&self) -> f64 {
        self.x()
    }
    fn lat(&self) -> f64 {
        self.y()
    }
}

impl Coordinate for Coord<f64> {
    fn lon(&self) -> f64 {
        self.x
    }
    fn lat(&self) -> f64 {
        self.y
    }
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Copies any [`Coordinate`], checking it is a valid position:
    /// finite, `lat` in [-90, 90] and `lon` in [-180, 180].
    pub fn try_from_coord(coord: &impl Coordinate) -> Result<Self, GridError> {
        let point = Self::new(coord.lat(), coord.lon());
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !self.lat.is_finite() || self.lat.abs() > 90.0 {
            return Err(GridError::InvalidLatitude(self.lat));
        }
        if !self.lon.is_finite() || self.lon.abs() > 180.0 {
            return Err(GridError::InvalidLongitude(self.lon));
        }
        Ok(())
    }
}

impl Coordinate for GeoPoint {
    fn lon(&self) -> f64 {
        self.lon
    }
    fn lat(&self) -> f64 {
        self.lat
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        coord! { x: p.lon, y: p.lat }
    }
}

/// An axis-aligned geographic rectangle with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting inverted or non-finite corners.
    ///
    /// Boxes crossing the antimeridian (`min.lon > max.lon`) are not supported.
    pub fn new(min: GeoPoint, max: GeoPoint) -> Result<Self, GridError> {
        min.validate()?;
        max.validate()?;
        if min.lat > max.lat {
            return Err(GridError::InvalidBounds(format!(
                "min latitude {} is above max latitude {}",
                min.lat, max.lat
            )));
        }
        if min.lon > max.lon {
            return Err(GridError::InvalidBounds(format!(
                "min longitude {} is east of max longitude {}",
                min.lon, max.lon
            )));
        }
        Ok(Self { min, max })
    }

    /// Builds the box spanned by two opposite corners in any order.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            min: GeoPoint::new(a.lat.min(b.lat), a.lon.min(b.lon)),
            max: GeoPoint::new(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }

    /// Same as [`BoundingBox::new`] from `(lat, lon)` pairs, the order map
    /// widgets usually report viewports in.
    pub fn from_lat_lon(min: (f64, f64), max: (f64, f64)) -> Result<Self, GridError> {
        Self::new(GeoPoint::new(min.0, min.1), GeoPoint::new(max.0, max.1))
    }

    pub fn from_rect(rect: &Rect<f64>) -> Result<Self, GridError> {
        Self::new(
            GeoPoint::new(rect.min().y, rect.min().x),
            GeoPoint::new(rect.max().y, rect.max().x),
        )
    }

    pub fn width(&self) -> f64 {
        self.max.lon - self.min.lon
    }

    pub fn height(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lon + self.max.lon) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        coord.lat() >= self.min.lat
            && coord.lat() <= self.max.lat
            && coord.lon() >= self.min.lon
            && coord.lon() <= self.max.lon
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.lat <= other.max.lat
            && other.min.lat <= self.max.lat
            && self.min.lon <= other.max.lon
            && other.min.lon <= self.max.lon
    }

    /// Absolute latitude of the point of the box nearest the equator.
    pub fn lat_nearest_equator(&self) -> f64 {
        if self.min.lat <= 0.0 && self.max.lat >= 0.0 {
            0.0
        } else {
            self.min.lat.abs().min(self.max.lat.abs())
        }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(Coord::from(self.min), Coord::from(self.max))
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (10.525, 52.26);
        assert_eq!(tuple.lon(), 10.525);
        assert_eq!(tuple.lat(), 52.26);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(10.525, 52.26);
        assert_eq!(point.lon(), 10.525);
        assert_eq!(point.lat(), 52.26);
    }

    #[test]
    fn test_same_result_tuple_and_point() -> Result<(), GridError> {
        let from_tuple = GeoPoint::try_from_coord(&(10.525, 52.26))?;
        let from_point = GeoPoint::try_from_coord(&Point::new(10.525, 52.26))?;
        assert_eq!(from_tuple, from_point);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(GeoPoint::new(90.0, 180.0).validate().is_ok());
        assert_eq!(
            GeoPoint::new(90.1, 0.0).validate(),
            Err(GridError::InvalidLatitude(90.1))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.5).validate(),
            Err(GridError::InvalidLongitude(-180.5))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_bounds_rejects_inverted() {
        let result = BoundingBox::from_lat_lon((53.0, 10.0), (52.0, 11.0));
        assert!(matches!(result, Err(GridError::InvalidBounds(_))));

        let result = BoundingBox::from_lat_lon((52.0, 11.0), (53.0, 10.0));
        assert!(matches!(result, Err(GridError::InvalidBounds(_))));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let bounds =
            BoundingBox::from_corners(GeoPoint::new(-52.0, -10.0), GeoPoint::new(-53.0, -11.0));
        assert_eq!(bounds.min, GeoPoint::new(-53.0, -11.0));
        assert_eq!(bounds.max, GeoPoint::new(-52.0, -10.0));
    }

    #[test]
    fn test_rect_round_trip() -> Result<(), GridError> {
        let bounds = BoundingBox::from_lat_lon((52.15, 10.2), (52.5, 10.8))?;
        let rect = bounds.to_rect();
        assert_eq!(rect.min().x, 10.2);
        assert_eq!(rect.max().y, 52.5);
        assert_eq!(BoundingBox::from_rect(&rect)?, bounds);
        Ok(())
    }

    #[test]
    fn test_contains_and_intersects() -> Result<(), GridError> {
        let bounds = BoundingBox::from_lat_lon((52.0, 10.0), (53.0, 11.0))?;
        assert!(bounds.contains(&(10.5, 52.5)));
        assert!(bounds.contains(&(10.0, 52.0)));
        assert!(!bounds.contains(&(11.5, 52.5)));

        let other = BoundingBox::from_lat_lon((52.9, 10.9), (54.0, 12.0))?;
        let far = BoundingBox::from_lat_lon((60.0, 20.0), (61.0, 21.0))?;
        assert!(bounds.intersects(&other));
        assert!(!bounds.intersects(&far));
        Ok(())
    }

    #[test]
    fn test_lat_nearest_equator() -> Result<(), GridError> {
        let north = BoundingBox::from_lat_lon((52.0, 10.0), (53.0, 11.0))?;
        let south = BoundingBox::from_lat_lon((-73.0, 10.0), (-71.0, 11.0))?;
        let straddling = BoundingBox::from_lat_lon((-1.0, 10.0), (1.0, 11.0))?;
        assert_eq!(north.lat_nearest_equator(), 52.0);
        assert_eq!(south.lat_nearest_equator(), 71.0);
        assert_eq!(straddling.lat_nearest_equator(), 0.0);
        Ok(())
    }
}
