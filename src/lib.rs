//! # geogrid-rs
//!
//! A zoned, multi-resolution geodetic grid on ETRS89. The globe is cut into
//! rectangular cells at 25 resolution levels; cells widen east-west towards
//! the poles so they stay roughly square on the ground.
//!
//! There are currently three main entry points.
//!
//! ### 1. `GridCell` - Single Cell Operations
//!
//! ```
//! use geogrid_rs::{GeoPoint, GridCell, decode};
//!
//! # fn main() -> Result<(), geogrid_rs::GridError> {
//! let cell = GridCell::encode(&GeoPoint::new(52.26, 10.525), 10)?;
//! assert!(cell.id.starts_with("Grid_ETRS89-GRS80_z2_5S_N37627_E"));
//!
//! let bounds = decode(&cell.id).unwrap();
//! assert_eq!(bounds, cell.bounds);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `GridLineGenerator` - Map Overlays
//!
//! ```
//! use geogrid_rs::{BoundingBox, GridLineGenerator};
//!
//! # fn main() -> Result<(), geogrid_rs::GridError> {
//! let viewport = BoundingBox::from_lat_lon((52.15, 10.2), (52.5, 10.8))?;
//! let lines = GridLineGenerator::default().generate_for_zoom(&viewport, 14)?;
//! println!("{} parallels", lines.parallels.len());
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `CellGrid` - Collections of Cells
//!
//! ```
//! use geogrid_rs::CellGrid;
//!
//! # fn main() -> Result<(), geogrid_rs::GridError> {
//! let grid = CellGrid::builder()
//!     .level(6)
//!     .extent(52.15, 10.2, 52.5, 10.8)?
//!     .build()?;
//!
//! let counts = grid.count_points(&[(10.525, 52.26), (10.53, 52.261)]);
//! assert_eq!(counts.iter().sum::<usize>(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! Points are passed as anything implementing [`Coordinate`]; tuples and
//! `geo_types` values use `(x, y) = (lon, lat)`.

pub mod cell;
pub mod config;
pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;
pub mod overlay;

pub use cell::{GridCell, decode, encode, encode_batch};
pub use config::{GridConfig, LongitudeSpacing, MeridianTicks, ZoomLevelMapping, ZoomMapping};
pub use coord::{BoundingBox, Coordinate, GeoPoint};
pub use error::GridError;
pub use geom::{CellGeometry, cells_to_geojson, grid_lines_to_geojson, parse_geometry};
pub use grid::{CellGrid, CellGridBuilder};
pub use index::{
    CellKey, DATUM, ETRS89_COVERAGE, LEVELS, LatHemisphere, LevelSpec, LonHemisphere, MAX_LEVEL,
    ResolutionLevel, Unit, Zone, arithmetic_range, cell_count_to_degrees, degrees_to_cell_count,
    resolve_zone,
};
pub use io::{
    CoordinateSource, CsvCellConfig, CsvToCells, GeometryFormat, GridCellsToArrow,
    csv_to_cell_csv,
};
pub use overlay::{GridLineGenerator, GridLines, generate_grid};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_four_quadrants() -> Result<(), GridError> {
        for (lat, lon) in [(52.26, 10.61), (52.26, -10.61), (-52.26, 10.61), (-52.26, -10.61)] {
            let cell = encode(&GeoPoint::new(lat, lon), 10)?;
            let bounds = decode(&cell.id).ok_or_else(|| GridError::InvalidBounds(cell.id.clone()))?;

            assert!(bounds.contains(&GeoPoint::new(lat, lon)));
            assert!(bounds.min.lat < bounds.max.lat);
            assert!(bounds.min.lon < bounds.max.lon);
            assert_eq!(cell.lat_index(), 37627);
        }
        Ok(())
    }

    #[test]
    fn test_overlay_lines_fall_on_cell_edges() -> Result<(), GridError> {
        let viewport = BoundingBox::from_lat_lon((52.15, 10.2), (52.5, 10.8))?;
        let lines = generate_grid(&viewport, 6)?;
        let grid = CellGrid::from_bounds(&viewport, 6)?;

        let lat_edges: Vec<f64> = grid
            .iter()
            .flat_map(|c| [c.bounds.min.lat, c.bounds.max.lat])
            .collect();
        for parallel in &lines.parallels {
            let lat = parallel.0[0].y;
            if viewport.min.lat <= lat && lat <= viewport.max.lat {
                assert!(lat_edges.iter().any(|e| (e - lat).abs() < 1e-9), "{}", lat);
            }
        }
        Ok(())
    }

    #[test]
    fn test_zoom_driven_overlay() -> Result<(), GridError> {
        let viewport = BoundingBox::from_lat_lon((52.15, 10.2), (52.5, 10.8))?;
        let config = GridConfig::default().zoom_mapping(ZoomMapping::detail_view());
        let lines = GridLineGenerator::new(config)?.generate_for_zoom(&viewport, 14)?;

        assert_eq!(lines.level, 10);
        assert!(lines.parallels.iter().all(|p| p.0.len() >= 2));
        Ok(())
    }

    #[test]
    fn test_cell_polygon_matches_bounds() -> Result<(), GridError> {
        use geo::BoundingRect;

        let cell = encode(&(10.525, 52.26), 12)?;
        let rect = cell
            .to_polygon()
            .bounding_rect()
            .ok_or_else(|| GridError::InvalidBounds(cell.id.clone()))?;
        assert_eq!(BoundingBox::from_rect(&rect)?, cell.bounds);
        Ok(())
    }
}
