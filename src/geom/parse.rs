use crate::coord::GeoPoint;
use crate::error::GridError;
use geo::CoordsIter;
use geo_types::{Geometry, GeometryCollection};
use geojson::GeoJson;
use wkt::TryFromWkt;

/// Parses a geometry string in (lon, lat) degrees, auto-detecting WKT or
/// GeoJSON by a leading `{`.
///
/// Every vertex must lie on the globe, so the result can be passed straight
/// to [`crate::GridCell::from_geometry`].
///
/// # Errors
///
/// - [`GridError::GeometryParseError`] - neither valid WKT nor GeoJSON
/// - [`GridError::InvalidLatitude`] / [`GridError::InvalidLongitude`] - a vertex off the globe
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, GridError> {
    let trimmed = s.trim();
    let geometry = if trimmed.starts_with('{') {
        parse_geojson(trimmed)?
    } else {
        parse_wkt(trimmed)?
    };

    for coord in geometry.coords_iter() {
        GeoPoint::try_from_coord(&coord)?;
    }
    Ok(geometry)
}

/// Parses a GeoJSON geometry, feature or feature collection.
///
/// A feature collection becomes a `GeometryCollection` of its features'
/// geometries, in order.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, GridError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| GridError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => feature_geometry(Some(geom)),
        GeoJson::Feature(feature) => feature_geometry(feature.geometry),
        GeoJson::FeatureCollection(collection) => {
            let geometries = collection
                .features
                .into_iter()
                .map(|feature| feature_geometry(feature.geometry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::GeometryCollection(GeometryCollection::from(
                geometries,
            )))
        }
    }
}

fn feature_geometry(geometry: Option<geojson::Geometry>) -> Result<Geometry<f64>, GridError> {
    let geometry = geometry
        .ok_or_else(|| GridError::GeometryParseError("Feature has no geometry".to_string()))?;
    Geometry::try_from(geometry).map_err(|e| GridError::GeometryParseError(e.to_string()))
}

/// Parses a WKT string.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, GridError> {
    Geometry::try_from_wkt_str(s).map_err(|e| GridError::GeometryParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::GridCell;

    #[test]
    fn test_parse_geojson_point() -> Result<(), GridError> {
        let json = r#"{"type":"Point","coordinates":[10.525,52.26]}"#;
        match parse_geometry(json)? {
            Geometry::Point(pt) => {
                assert!((pt.x() - 10.525).abs() < 1e-9);
                assert!((pt.y() - 52.26).abs() < 1e-9);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature() -> Result<(), GridError> {
        let json = r#"{"type":"Feature","properties":{"name":"Braunschweig"},"geometry":{"type":"Point","coordinates":[10.525,52.26]}}"#;
        assert!(matches!(parse_geometry(json)?, Geometry::Point(_)));

        let empty = r#"{"type":"Feature","properties":{},"geometry":null}"#;
        assert!(matches!(
            parse_geometry(empty),
            Err(GridError::GeometryParseError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_parse_geojson_multilinestring() -> Result<(), GridError> {
        let json = r#"{"type":"MultiLineString","coordinates":[[[10.1,52.1],[10.2,52.2]],[[10.3,52.3],[10.4,52.4]]]}"#;
        match parse_geometry(json)? {
            Geometry::MultiLineString(mls) => assert_eq!(mls.0.len(), 2),
            other => panic!("Expected MultiLineString, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_feature_collection_indexes_every_feature() -> Result<(), GridError> {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[10.525,52.26]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[-3.7038,40.4168]}}
        ]}"#;
        let geometry = parse_geometry(json)?;
        match &geometry {
            Geometry::GeometryCollection(gc) => assert_eq!(gc.0.len(), 2),
            other => panic!("Expected GeometryCollection, got {:?}", other),
        }

        let cells = GridCell::from_geometry(geometry, 10)?;
        assert_eq!(cells.len(), 2);

        let empty = r#"{"type":"FeatureCollection","features":[]}"#;
        match parse_geometry(empty)? {
            Geometry::GeometryCollection(gc) => assert!(gc.0.is_empty()),
            other => panic!("Expected GeometryCollection, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_wkt_point() -> Result<(), GridError> {
        match parse_geometry("  POINT(-3.7038 40.4168) ")? {
            Geometry::Point(pt) => {
                assert!((pt.x() + 3.7038).abs() < 1e-9);
                assert!((pt.y() - 40.4168).abs() < 1e-9);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_wkt_polygon() -> Result<(), GridError> {
        let wkt = "POLYGON((10 52, 11 52, 11 53, 10 53, 10 52))";
        match parse_geometry(wkt)? {
            Geometry::Polygon(poly) => assert_eq!(poly.exterior().0.len(), 5),
            other => panic!("Expected Polygon, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_vertices_off_the_globe_rejected() {
        // lat, lon swapped: 52.26 is fine as a longitude, 100.5 is not a latitude
        assert_eq!(
            parse_geometry("POINT(52.26 100.5)"),
            Err(GridError::InvalidLatitude(100.5))
        );
        assert_eq!(
            parse_geometry("LINESTRING(10 52, 190 52)"),
            Err(GridError::InvalidLongitude(190.0))
        );
        assert_eq!(
            parse_geometry(r#"{"type":"Point","coordinates":[-180.5,40.0]}"#),
            Err(GridError::InvalidLongitude(-180.5))
        );
        assert!(parse_geometry("POINT(180 -90)").is_ok());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_geometry("POINT(").is_err());
        assert!(parse_geometry("{not json").is_err());
    }
}
