/// Error type for geogrid-rs operations.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Latitude is not finite or lies outside [-90, 90].
    InvalidLatitude(f64),
    /// Longitude is not finite or lies outside [-180, 180].
    InvalidLongitude(f64),
    /// The resolution level is outside the valid range (0-24).
    InvalidLevel(u8),
    /// An angular unit token is not one of `D`, `M`, `S`, `MS`, `MMS`.
    UnknownUnit(String),
    /// A range step is zero, negative or not finite.
    InvalidStep(f64),
    /// Grid lines cannot be generated for a viewport touching a pole.
    PoleOutOfDomain(f64),
    /// A bounding box violates `min <= max`.
    InvalidBounds(String),
    /// The requested overlay would produce more lines than allowed.
    TooManyLines { estimated: usize, limit: usize },
    /// The requested cell grid would produce more cells than allowed.
    TooManyCells { estimated: usize, limit: usize },
    /// A map zoom level falls outside the window of a zoom mapping.
    ZoomOutOfRange(u8),
    /// A configuration value is missing or invalid.
    InvalidConfig(String),
    /// File I/O or serialization error.
    IoError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidLatitude(lat) => write!(f, "Invalid latitude: {}", lat),
            GridError::InvalidLongitude(lon) => write!(f, "Invalid longitude: {}", lon),
            GridError::InvalidLevel(level) => write!(f, "Invalid resolution level: {}", level),
            GridError::UnknownUnit(token) => write!(f, "Unknown angular unit: {}", token),
            GridError::InvalidStep(step) => write!(f, "Invalid range step: {}", step),
            GridError::PoleOutOfDomain(lat) => {
                write!(f, "Latitude {} reaches a pole, grid lines are undefined", lat)
            }
            GridError::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
            GridError::TooManyLines { estimated, limit } => write!(
                f,
                "Overlay would produce {} lines, limit is {}",
                estimated, limit
            ),
            GridError::TooManyCells { estimated, limit } => write!(
                f,
                "Grid would produce {} cells, limit is {}",
                estimated, limit
            ),
            GridError::ZoomOutOfRange(zoom) => write!(f, "Zoom level out of range: {}", zoom),
            GridError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            GridError::IoError(msg) => write!(f, "IO error: {}", msg),
            GridError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            GridError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}
