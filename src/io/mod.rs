pub mod arrow;
pub mod csv;

pub use self::arrow::GridCellsToArrow;
pub use self::csv::{CoordinateSource, CsvCellConfig, CsvToCells, GeometryFormat, csv_to_cell_csv};
