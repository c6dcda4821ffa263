use crate::config::{GridConfig, LongitudeSpacing, MeridianTicks, ZoomLevelMapping};
use crate::coord::BoundingBox;
use crate::error::GridError;
use crate::index::{ResolutionLevel, arithmetic_range, resolve_zone};
use geo_types::{Line, LineString, MultiLineString, coord};
use log::debug;
use rayon::prelude::*;

/// Tolerance, in steps, for values that sit on a grid line up to float error
const SNAP_EPSILON: f64 = 1e-9;

fn snap_down(value: f64, step: f64) -> f64 {
    (value / step + SNAP_EPSILON).floor() * step
}

fn snap_up(value: f64, step: f64) -> f64 {
    (value / step - SNAP_EPSILON).ceil() * step
}

/// Lines to draw over a map viewport.
///
/// Coordinates are `x = lon`, `y = lat`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLines {
    pub level: u8,
    /// One line of constant latitude per grid row, spanning the viewport
    pub parallels: Vec<LineString<f64>>,
    /// Short north-south segments marking cell boundaries, one row tall
    pub meridian_ticks: Vec<Line<f64>>,
}

impl GridLines {
    pub fn len(&self) -> usize {
        self.parallels.len() + self.meridian_ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parallels.is_empty() && self.meridian_ticks.is_empty()
    }

    /// All parallels followed by all ticks as a single multi-line.
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        let ticks = self
            .meridian_ticks
            .iter()
            .map(|tick| LineString::from(vec![tick.start, tick.end]));
        MultiLineString::new(self.parallels.iter().cloned().chain(ticks).collect())
    }
}

/// Builds grid overlays for map viewports.
///
/// # Example
/// ```
/// use geogrid_rs::{BoundingBox, GridConfig, GridLineGenerator};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let viewport = BoundingBox::from_lat_lon((52.0, 10.0), (53.0, 11.0))?;
///
/// let generator = GridLineGenerator::new(GridConfig::regional(2))?;
/// let lines = generator.generate(&viewport, 2)?;
/// assert_eq!(lines.parallels.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridLineGenerator {
    config: GridConfig,
}

impl GridLineGenerator {
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Generates parallels and meridian ticks covering `bounds` at `level`.
    ///
    /// The viewport is snapped outward to whole grid steps, so the lines
    /// extend past the visible area by up to one step on each side.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidLevel`] - level above 24
    /// - [`GridError::PoleOutOfDomain`] - the viewport, once snapped, reaches a pole
    /// - [`GridError::TooManyLines`] - the overlay would exceed `max_lines`
    pub fn generate(&self, bounds: &BoundingBox, level: u8) -> Result<GridLines, GridError> {
        let level = ResolutionLevel::new(level)?;
        for lat in [bounds.min.lat, bounds.max.lat] {
            if lat.abs() >= 90.0 {
                return Err(GridError::PoleOutOfDomain(lat));
            }
        }

        let lat_step = level.spacing_degrees();
        let nearest_zone = resolve_zone(bounds.lat_nearest_equator())?;
        let lon_factor = match self.config.longitude_spacing {
            LongitudeSpacing::ZoneAware => nearest_zone.factor(),
            LongitudeSpacing::Regional { factor } => factor,
        };
        let lon_step = lat_step * f64::from(lon_factor);

        let lat_min = snap_down(bounds.min.lat, lat_step);
        let lat_max = snap_down(bounds.max.lat, lat_step);
        // a parallel on the south pole is a single point
        if lat_min <= -90.0 {
            return Err(GridError::PoleOutOfDomain(lat_min));
        }
        let lon_min = snap_down(bounds.min.lon, lon_step);
        let lon_max = snap_down(bounds.max.lon, lon_step) + lon_step;

        let narrowest_tick = match self.config.meridian_ticks {
            MeridianTicks::Equatorial => lat_step,
            MeridianTicks::ZoneAware => lat_step * f64::from(nearest_zone.factor()),
        };
        if let Some(limit) = self.config.max_lines {
            let rows = ((lat_max - lat_min) / lat_step).round() + 1.0;
            let ticks_per_row = ((lon_max - lon_min) / narrowest_tick).ceil() + 1.0;
            let estimated = (rows * (1.0 + ticks_per_row)) as usize;
            if estimated > limit {
                return Err(GridError::TooManyLines { estimated, limit });
            }
        }

        let mut parallels = Vec::new();
        let mut meridian_ticks = Vec::new();

        for lat in arithmetic_range(lat_min, lat_max + lat_step * 0.5, lat_step)? {
            let row_factor = match self.config.longitude_spacing {
                LongitudeSpacing::ZoneAware => resolve_zone(lat)?.factor(),
                LongitudeSpacing::Regional { factor } => factor,
            };
            let row_step = lat_step * f64::from(row_factor);

            let mut points: Vec<_> =
                arithmetic_range(lon_min, lon_max - row_step * SNAP_EPSILON, row_step)?
                    .map(|lon| coord! { x: lon, y: lat })
                    .collect();
            points.push(coord! { x: lon_max, y: lat });
            parallels.push(LineString::from(points));

            let tick_step = match self.config.meridian_ticks {
                MeridianTicks::Equatorial => lat_step,
                MeridianTicks::ZoneAware => {
                    lat_step * f64::from(resolve_zone(lat + lat_step * 0.5)?.factor())
                }
            };
            let first_tick = snap_up(lon_min, tick_step);
            for lon in arithmetic_range(first_tick, lon_max + tick_step * 0.5, tick_step)? {
                meridian_ticks.push(Line::new(
                    coord! { x: lon, y: lat },
                    coord! { x: lon, y: lat + lat_step },
                ));
            }
        }

        debug!(
            "Generated {} parallels and {} meridian ticks at level {} for {:?}",
            parallels.len(),
            meridian_ticks.len(),
            level,
            bounds
        );

        Ok(GridLines {
            level: level.value(),
            parallels,
            meridian_ticks,
        })
    }

    /// Same as [`GridLineGenerator::generate`], choosing the level from a map
    /// zoom through the configured [`crate::ZoomMapping`].
    pub fn generate_for_zoom(&self, bounds: &BoundingBox, zoom: u8) -> Result<GridLines, GridError> {
        let level = self.config.zoom_mapping.level_for_zoom(zoom)?;
        self.generate(bounds, level.value())
    }

    /// Generates overlays for many viewports in parallel, keeping input order.
    pub fn generate_many(
        &self,
        viewports: &[BoundingBox],
        level: u8,
    ) -> Vec<Result<GridLines, GridError>> {
        viewports
            .par_iter()
            .map(|bounds| self.generate(bounds, level))
            .collect()
    }
}

/// Generates an overlay with the default configuration.
///
/// # Example
/// ```
/// use geogrid_rs::{BoundingBox, generate_grid};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let viewport = BoundingBox::from_lat_lon((52.15, 10.2), (52.5, 10.8))?;
/// let lines = generate_grid(&viewport, 8)?;
/// assert!(lines.parallels.iter().all(|p| p.0.len() >= 2));
/// # Ok(())
/// # }
/// ```
pub fn generate_grid(bounds: &BoundingBox, level: u8) -> Result<GridLines, GridError> {
    GridLineGenerator::default().generate(bounds, level)
}
