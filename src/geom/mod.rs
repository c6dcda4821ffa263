pub mod export;
pub mod parse;

pub use export::{
    CellGeometry, cells_to_geojson, grid_lines_to_geojson, polygon_to_geojson, polygon_to_wkt,
};
pub use parse::{parse_geojson, parse_geometry, parse_wkt};
