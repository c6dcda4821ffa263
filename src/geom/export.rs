use crate::cell::GridCell;
use crate::overlay::GridLines;
use geo_types::{LineString, Polygon};
use geojson::{Feature, FeatureCollection};

pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

/// Text renderings of a cell rectangle.
pub trait CellGeometry {
    /// Cell polygon as WKT, e.g. `POLYGON((10.5222 52.2597,...))`.
    fn to_wkt(&self) -> String;
    /// Cell polygon as a GeoJSON geometry object.
    fn to_geojson(&self) -> String;
}

impl CellGeometry for GridCell {
    fn to_wkt(&self) -> String {
        polygon_to_wkt(&self.to_polygon())
    }

    fn to_geojson(&self) -> String {
        polygon_to_geojson(&self.to_polygon())
    }
}

fn cell_feature(cell: &GridCell) -> Feature {
    let mut feature = Feature::from(geojson::Geometry::from(&cell.to_polygon()));
    feature.set_property("id", cell.id.clone());
    feature.set_property("zone", cell.zone.number());
    feature.set_property("level", cell.level);
    feature
}

/// Collects cells into a FeatureCollection of polygons with `id`, `zone` and
/// `level` properties.
pub fn cells_to_geojson(cells: &[GridCell]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: cells.iter().map(cell_feature).collect(),
        foreign_members: None,
    }
}

fn line_feature(line: &LineString<f64>, kind: &str) -> Feature {
    let mut feature = Feature::from(geojson::Geometry::from(line));
    feature.set_property("kind", kind);
    feature
}

/// Renders an overlay as a FeatureCollection of line strings.
///
/// Parallels carry `"kind": "parallel"` and meridian ticks `"kind": "meridian"`,
/// so a map layer can style them apart.
pub fn grid_lines_to_geojson(lines: &GridLines) -> FeatureCollection {
    let parallels = lines
        .parallels
        .iter()
        .map(|parallel| line_feature(parallel, "parallel"));
    let meridians = lines
        .meridian_ticks
        .iter()
        .map(|tick| line_feature(&LineString::from(vec![tick.start, tick.end]), "meridian"));

    FeatureCollection {
        bbox: None,
        features: parallels.chain(meridians).collect(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{BoundingBox, GeoPoint};
    use crate::error::GridError;
    use crate::overlay::generate_grid;

    #[test]
    fn test_cell_to_wkt() -> Result<(), GridError> {
        let cell = GridCell::encode(&GeoPoint::new(52.26, 10.525), 10)?;
        let wkt = cell.to_wkt();
        assert!(wkt.starts_with("POLYGON(("));
        assert!(wkt.contains("52.2597"));
        Ok(())
    }

    #[test]
    fn test_cell_to_geojson() -> Result<(), GridError> {
        let cell = GridCell::encode(&GeoPoint::new(52.26, 10.525), 10)?;
        let json: serde_json::Value = serde_json::from_str(&cell.to_geojson())
            .map_err(|e| GridError::GeometryParseError(e.to_string()))?;
        assert_eq!(json["type"], "Polygon");
        assert_eq!(json["coordinates"][0].as_array().map(Vec::len), Some(5));
        Ok(())
    }

    #[test]
    fn test_cells_to_geojson_properties() -> Result<(), GridError> {
        let cells = vec![
            GridCell::encode(&GeoPoint::new(52.26, 10.525), 10)?,
            GridCell::encode(&GeoPoint::new(72.5, 30.1), 8)?,
        ];
        let collection = cells_to_geojson(&cells);

        assert_eq!(collection.features.len(), 2);
        let second = &collection.features[1];
        assert_eq!(
            second.property("id").and_then(|v| v.as_str()),
            Some(cells[1].id.as_str())
        );
        assert_eq!(second.property("zone").and_then(|v| v.as_u64()), Some(3));
        assert_eq!(second.property("level").and_then(|v| v.as_u64()), Some(8));
        Ok(())
    }

    #[test]
    fn test_grid_lines_to_geojson() -> Result<(), GridError> {
        let bounds = BoundingBox::from_lat_lon((52.0, 10.0), (53.0, 11.0))?;
        let lines = generate_grid(&bounds, 2)?;
        let collection = grid_lines_to_geojson(&lines);

        assert_eq!(
            collection.features.len(),
            lines.parallels.len() + lines.meridian_ticks.len()
        );
        let parallels = collection
            .features
            .iter()
            .filter(|f| f.property("kind").and_then(|v| v.as_str()) == Some("parallel"))
            .count();
        assert_eq!(parallels, 3);
        Ok(())
    }
}
