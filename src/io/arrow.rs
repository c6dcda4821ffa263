use crate::cell::GridCell;
use crate::error::GridError;
use arrow_array::{Float64Array, RecordBatch, StringArray, UInt8Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

/// ETRS89 geographic 2D
fn etrs89_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4258".to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`GridCell`]s to Arrow arrays.
///
/// Implemented for `[GridCell]` and `Vec<GridCell>`.
pub trait GridCellsToArrow {
    /// Converts cell centers to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts cells to an Arrow PolygonArray of cell rectangles.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts cells to a RecordBatch with id, level, zone, the bounds and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, GridError>;
}

impl GridCellsToArrow for [GridCell] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, etrs89_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for cell in self {
            builder.push_point(Some(&cell.center_point()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, etrs89_metadata());
        let polygons: Vec<_> = self.par_iter().map(|c: &GridCell| c.to_polygon()).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, GridError> {
        let polygon_array = self.to_arrow_polygons();
        let ids: StringArray = self.iter().map(|c| Some(c.id.as_str())).collect();
        let levels: UInt8Array = self.iter().map(|c| Some(c.level)).collect();
        let zones: UInt8Array = self.iter().map(|c| Some(c.zone.number())).collect();
        let min_lats: Float64Array = self.iter().map(|c| Some(c.bounds.min.lat)).collect();
        let min_lons: Float64Array = self.iter().map(|c| Some(c.bounds.min.lon)).collect();
        let max_lats: Float64Array = self.iter().map(|c| Some(c.bounds.max.lat)).collect();
        let max_lons: Float64Array = self.iter().map(|c| Some(c.bounds.max.lon)).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("level", DataType::UInt8, false),
            Field::new("zone", DataType::UInt8, false),
            Field::new("min_lat", DataType::Float64, false),
            Field::new("min_lon", DataType::Float64, false),
            Field::new("max_lat", DataType::Float64, false),
            Field::new("max_lon", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(ids),
                Arc::new(levels),
                Arc::new(zones),
                Arc::new(min_lats),
                Arc::new(min_lons),
                Arc::new(max_lats),
                Arc::new(max_lons),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| GridError::IoError(e.to_string()))
    }
}

impl GridCellsToArrow for Vec<GridCell> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, GridError> {
        self.as_slice().to_record_batch()
    }
}
