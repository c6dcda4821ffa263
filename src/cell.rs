use crate::coord::{BoundingBox, Coordinate, GeoPoint};
use crate::error::GridError;
use crate::index::{
    CellKey, ETRS89_COVERAGE, LatHemisphere, LonHemisphere, ResolutionLevel, Zone,
    degrees_to_cell_count, resolve_zone,
};
use geo::Centroid;
use geo_types::{Geometry, LineString, Point, Polygon};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Tolerance, in cells, absorbing float error when a point sits on a cell edge
const INDEX_EPSILON: f64 = 1e-9;

/// A single cell of the zoned geodetic grid.
///
/// Each `GridCell` carries its canonical identifier, its rectangle in decimal
/// degrees, the latitude zone it belongs to and its resolution level.
///
/// # Example
///
/// ```
/// use geogrid_rs::{GeoPoint, GridCell};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let cell = GridCell::encode(&GeoPoint::new(52.26, 10.525), 10)?;
/// println!("Cell ID: {}", cell.id);
/// println!("Bounds: {:?}", cell.bounds);
///
/// // Convert the cell to a polygon for GIS operations
/// let polygon = cell.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    /// Canonical identifier, e.g. `Grid_ETRS89-GRS80_z2_5S_N37627_E3789`
    pub id: String,
    /// Cell rectangle in decimal degrees
    pub bounds: BoundingBox,
    /// Latitude zone of the cell
    pub zone: Zone,
    /// Resolution level (0-24), where higher values mean smaller cells
    pub level: u8,
    /// Parsed form of `id`
    #[serde(skip)]
    pub key: CellKey,
}

impl GridCell {
    pub(crate) fn from_key(key: CellKey) -> Self {
        Self {
            id: key.to_string(),
            bounds: key.bounds(),
            zone: key.zone,
            level: key.level.value(),
            key,
        }
    }

    /// Finds the cell containing a point at the given resolution level.
    ///
    /// Indices count whole cells from the equator and the prime meridian, so
    /// the point always lies inside the returned bounds. The point is not
    /// checked against the nominal coverage area, see [`GridCell::within_coverage`].
    ///
    /// # Compatibility
    ///
    /// Indices are floored, not rounded to the nearest whole cell. A point in
    /// the half of its cell farther from the equator (or from the prime
    /// meridian) gets an index one lower than an encoder that rounds, so
    /// identifiers stored by such an encoder do not always match re-encoded
    /// ones. Compare stored identifiers by decoding them with [`decode`].
    ///
    /// # Example
    /// ```
    /// use geogrid_rs::GridCell;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), geogrid_rs::GridError> {
    /// // From a (lon, lat) tuple
    /// let cell = GridCell::encode(&(10.525, 52.26), 10)?;
    /// // From Point
    /// let same = GridCell::encode(&Point::new(10.525, 52.26), 10)?;
    /// assert_eq!(cell.id, same.id);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidLevel`] - level above 24
    /// - [`GridError::InvalidLatitude`] / [`GridError::InvalidLongitude`] - point off the globe
    pub fn encode(point: &impl Coordinate, level: u8) -> Result<Self, GridError> {
        let level = ResolutionLevel::new(level)?;
        let point = GeoPoint::try_from_coord(point)?;
        let zone = resolve_zone(point.lat)?;

        let spec = level.spec();
        let magnitude = f64::from(spec.magnitude);
        let factor = f64::from(zone.factor());

        let lat_index = cell_index(degrees_to_cell_count(point.lat.abs(), spec.unit, magnitude));
        let lon_index = cell_index(degrees_to_cell_count(
            point.lon.abs(),
            spec.unit,
            magnitude * factor,
        ));

        Ok(Self::from_key(CellKey {
            zone,
            level,
            lat_hemisphere: LatHemisphere::of(point.lat),
            lat_index,
            lon_hemisphere: LonHemisphere::of(point.lon),
            lon_index,
        }))
    }

    /// Restores a cell from its identifier.
    ///
    /// Returns `None` when the identifier is malformed or names an unknown
    /// zone or resolution; stale or foreign identifiers are expected input.
    ///
    /// # Example
    /// ```
    /// use geogrid_rs::GridCell;
    ///
    /// # fn main() -> Result<(), geogrid_rs::GridError> {
    /// let cell = GridCell::encode(&(10.525, 52.26), 10)?;
    /// let restored = GridCell::from_id(&cell.id).unwrap();
    /// assert_eq!(cell, restored);
    /// assert!(GridCell::from_id("not-a-cell").is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_id(identifier: &str) -> Option<Self> {
        match CellKey::parse(identifier) {
            Some(key) => Some(Self::from_key(key)),
            None => {
                debug!("rejecting cell identifier {:?}", identifier);
                None
            }
        }
    }

    /// Create GridCells along a LineString of (lon, lat) coordinates.
    ///
    /// Samples the line every half cell height and returns each distinct
    /// cell once, in the order the line first enters it.
    pub fn from_line_string(line: &LineString, level: u8) -> Result<Vec<Self>, GridError> {
        let step_size = ResolutionLevel::new(level)?.spacing_degrees() * 0.5;

        let mut seen: HashSet<CellKey> = HashSet::new();
        let mut cells: Vec<GridCell> = Vec::new();

        for window in line.0.windows(2) {
            let start = &window[0];
            let end = &window[1];

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            let steps = (segment_length / step_size).ceil() as usize;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                let cell = Self::encode(&(start.x + t * dx, start.y + t * dy), level)?;

                if seen.insert(cell.key) {
                    cells.push(cell);
                }
            }
        }

        if let [only] = line.0.as_slice() {
            cells.push(Self::encode(only, level)?);
        }

        Ok(cells)
    }

    /// Create GridCells from an arbitrary `geo_types::Geometry` in (lon, lat).
    ///
    /// Points and polygon centroids produce a single cell; lines and
    /// collections may produce many.
    pub fn from_geometry(geom: Geometry<f64>, level: u8) -> Result<Vec<Self>, GridError> {
        match geom {
            Geometry::Point(pt) => Ok(vec![Self::encode(&pt, level)?]),
            Geometry::LineString(line) => Self::from_line_string(&line, level),
            Geometry::MultiLineString(mls) => {
                let mut all_cells = Vec::new();
                for line in mls.0 {
                    all_cells.extend(Self::from_line_string(&line, level)?);
                }
                Ok(all_cells)
            }
            Geometry::Polygon(poly) => match poly.centroid() {
                Some(centroid) => Ok(vec![Self::encode(&centroid, level)?]),
                None => Ok(vec![]),
            },
            Geometry::MultiPolygon(mp) => {
                let mut cells = Vec::new();
                for poly in mp.0 {
                    if let Some(centroid) = poly.centroid() {
                        cells.push(Self::encode(&centroid, level)?);
                    }
                }
                Ok(cells)
            }
            Geometry::MultiPoint(mp) => mp.0.iter().map(|pt| Self::encode(pt, level)).collect(),
            Geometry::GeometryCollection(gc) => {
                let mut all_cells = Vec::new();
                for g in gc.0 {
                    all_cells.extend(Self::from_geometry(g, level)?);
                }
                Ok(all_cells)
            }
            _ => Err(GridError::GeometryParseError(
                "Unsupported geometry type".to_string(),
            )),
        }
    }

    /// Whole cells from the equator to the cell's origin.
    pub fn lat_index(&self) -> u64 {
        self.key.lat_index
    }

    /// Whole zone-widened cells from the prime meridian to the cell's origin.
    pub fn lon_index(&self) -> u64 {
        self.key.lon_index
    }

    pub fn center(&self) -> GeoPoint {
        self.bounds.center()
    }

    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        self.bounds.contains(coord)
    }

    /// Whether the cell's center lies inside the nominal ETRS89 coverage area.
    pub fn within_coverage(&self) -> bool {
        let [[min_lat, min_lon], [max_lat, max_lon]] = ETRS89_COVERAGE;
        let coverage = BoundingBox::from_corners(
            GeoPoint::new(min_lat, min_lon),
            GeoPoint::new(max_lat, max_lon),
        );
        coverage.contains(&self.center())
    }

    /// Converts this cell to a rectangular polygon in (lon, lat).
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }

    pub fn center_point(&self) -> Point<f64> {
        Point::from(self.center())
    }
}

fn cell_index(count: f64) -> u64 {
    (count + INDEX_EPSILON).floor() as u64
}

/// Encodes a point into the cell containing it. See [`GridCell::encode`].
pub fn encode(point: &impl Coordinate, level: u8) -> Result<GridCell, GridError> {
    GridCell::encode(point, level)
}

/// Decodes a cell identifier into the cell's bounds.
///
/// Never fails loudly: malformed or unknown identifiers give `None`.
///
/// # Example
/// ```
/// use geogrid_rs::{GeoPoint, decode, encode};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let cell = encode(&GeoPoint::new(52.26, 10.525), 10)?;
/// assert_eq!(decode(&cell.id), Some(cell.bounds));
/// assert_eq!(decode("not-a-cell"), None);
/// # Ok(())
/// # }
/// ```
pub fn decode(identifier: &str) -> Option<BoundingBox> {
    GridCell::from_id(identifier).map(|cell| cell.bounds)
}

/// Encodes many points in parallel, keeping input order.
pub fn encode_batch<C>(points: &[C], level: u8) -> Vec<Result<GridCell, GridError>>
where
    C: Coordinate + Sync,
{
    points
        .par_iter()
        .map(|point| GridCell::encode(point, level))
        .collect()
}
