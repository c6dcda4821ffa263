use crate::cell::GridCell;
use crate::error::GridError;
use crate::geom::{parse_geometry, polygon_to_geojson, polygon_to_wkt};
use log::info;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

enum SourceIndices {
    Geometry(usize),
    Coordinates { lon_idx: usize, lat_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry in (lon, lat)
    GeometryColumn(String),
    /// Separate longitude and latitude columns in decimal degrees
    CoordinateColumns {
        lon_column: String,
        lat_column: String,
    },
}

#[derive(Debug, Clone)]
pub struct CsvCellConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub level: u8,
    pub include_cell_geometry: Option<GeometryFormat>,
}

impl CsvCellConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use geogrid_rs::CsvCellConfig;
    ///
    /// let config = CsvCellConfig::new("geometry", 10);
    /// ```
    pub fn new(geometry_column: impl Into<String>, level: u8) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            level,
            include_cell_geometry: None,
        }
    }

    /// Create config for a CSV with separate longitude/latitude columns.
    ///
    /// # Example
    /// ```
    /// use geogrid_rs::CsvCellConfig;
    ///
    /// let config = CsvCellConfig::from_coords("Longitude", "Latitude", 10);
    /// ```
    pub fn from_coords(
        lon_column: impl Into<String>,
        lat_column: impl Into<String>,
        level: u8,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                lon_column: lon_column.into(),
                lat_column: lat_column.into(),
            },
            exclude_columns: Vec::new(),
            level,
            include_cell_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    /// Include the cell rectangle in the output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }
}

pub trait CsvToCells {
    fn to_cell_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvCellConfig,
    ) -> Result<(), GridError>;
}

impl<P: AsRef<Path>> CsvToCells for P {
    fn to_cell_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvCellConfig,
    ) -> Result<(), GridError> {
        csv_to_cell_csv(self, output_path, config)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, role: &str) -> Result<usize, GridError> {
    if name.is_empty() {
        return Err(GridError::CsvError(format!(
            "{} column name cannot be empty",
            role
        )));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GridError::CsvError(format!("{} column '{}' not found", role, name)))
}

fn parse_degrees(record: &csv::StringRecord, idx: usize, role: &str) -> Result<f64, GridError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| GridError::CsvError(format!("Missing {} column at index {}", role, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| GridError::CsvError(format!("Invalid {}: '{}'", role, raw)))
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file with
/// cell identifiers.
///
/// Each output row starts with `cell_id` (and `cell_geometry` when requested),
/// followed by the input columns minus the source and excluded columns. A
/// line geometry yields one row per cell it crosses. Output is streamed.
///
/// # Example with geometry column (WKT or GeoJSON)
///
/// ```no_run
/// use geogrid_rs::{csv_to_cell_csv, CsvCellConfig, GeometryFormat};
///
/// let config = CsvCellConfig::new("geometry", 10)
///     .exclude(vec!["Notes".into()])
///     .with_cell_geometry(GeometryFormat::Wkt);
///
/// csv_to_cell_csv("stations.csv", "output.csv", &config).unwrap();
/// ```
///
/// # Example with coordinate columns
///
/// ```no_run
/// use geogrid_rs::{csv_to_cell_csv, CsvCellConfig};
///
/// let config = CsvCellConfig::from_coords("Longitude", "Latitude", 10);
/// csv_to_cell_csv("stations.csv", "output.csv", &config).unwrap();
/// ```
pub fn csv_to_cell_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvCellConfig,
) -> Result<(), GridError> {
    let file = File::open(csv_path.as_ref()).map_err(|e| GridError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GridError::CsvError(e.to_string()))?
        .clone();

    // Source columns never reach the output
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns {
            lon_column,
            lat_column,
        } => {
            let lon_idx = column_index(&headers, lon_column, "Longitude")?;
            let lat_idx = column_index(&headers, lat_column, "Latitude")?;
            (
                SourceIndices::Coordinates { lon_idx, lat_idx },
                HashSet::from([lon_idx, lat_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file =
        File::create(output_path.as_ref()).map_err(|e| GridError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["cell_id"];
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| GridError::CsvError(e.to_string()))?;

    let mut rows_written = 0usize;
    for result in reader.records() {
        let record = result.map_err(|e| GridError::CsvError(e.to_string()))?;

        let cells = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    GridError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                let geom = parse_geometry(geom_str)?;
                GridCell::from_geometry(geom, config.level)?
            }
            SourceIndices::Coordinates { lon_idx, lat_idx } => {
                let lon = parse_degrees(&record, *lon_idx, "longitude")?;
                let lat = parse_degrees(&record, *lat_idx, "latitude")?;
                vec![GridCell::encode(&(lon, lat), config.level)?]
            }
        };

        for cell in cells {
            let mut row: Vec<String> = vec![cell.id.clone()];

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| GridError::CsvError(e.to_string()))?;
            rows_written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| GridError::CsvError(e.to_string()))?;

    info!(
        "Wrote {} cell rows at level {} to {}",
        rows_written,
        config.level,
        output_path.as_ref().display()
    );

    Ok(())
}
