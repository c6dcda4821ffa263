pub mod constants;
mod identifier;
pub mod units;
mod zone;

pub use constants::{DATUM, ETRS89_COVERAGE, LEVELS, LevelSpec, MAX_LEVEL, ResolutionLevel};
pub use identifier::{CellKey, LatHemisphere, LonHemisphere};
pub use units::{ArithmeticRange, Unit, arithmetic_range, cell_count_to_degrees, degrees_to_cell_count};
pub use zone::{Zone, resolve_zone};
