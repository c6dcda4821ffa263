use crate::error::GridError;
use crate::index::{MAX_LEVEL, ResolutionLevel};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How the overlay picks the east-west spacing of its longitude grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LongitudeSpacing {
    /// Widen by the factor of the zone nearest the equator inside the viewport.
    #[default]
    ZoneAware,
    /// Widen by a fixed factor everywhere, e.g. 2 for a map centred on
    /// mid-latitude Europe.
    Regional { factor: u32 },
}

/// Where meridian tick marks are placed along each parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeridianTicks {
    /// On the true cell boundaries of each row, i.e. multiples of the row's
    /// zone-widened spacing.
    #[default]
    ZoneAware,
    /// On multiples of the north-south spacing, ignoring the zone factor.
    Equatorial,
}

/// Maps a web-map zoom level onto a grid resolution level.
pub trait ZoomLevelMapping {
    fn level_for_zoom(&self, zoom: u8) -> Result<ResolutionLevel, GridError>;
}

/// Linear zoom to level mapping over a closed zoom window, rounded to the
/// nearest level.
///
/// # Example
/// ```
/// use geogrid_rs::{ZoomLevelMapping, ZoomMapping};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let mapping = ZoomMapping::map_view();
/// assert_eq!(mapping.level_for_zoom(13)?.value(), 8);
/// assert_eq!(mapping.level_for_zoom(14)?.value(), 9);
/// assert!(mapping.level_for_zoom(12).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ZoomMapping {
    pub zoom_min: u8,
    pub zoom_max: u8,
    pub level_min: u8,
    pub level_max: u8,
}

impl ZoomMapping {
    /// Zoom 13..=18 onto level 8..=12, used by the full map layer.
    pub const fn map_view() -> Self {
        Self {
            zoom_min: 13,
            zoom_max: 18,
            level_min: 8,
            level_max: 12,
        }
    }

    /// Zoom 14..=18 onto level 10..=14, for close-up views.
    pub const fn detail_view() -> Self {
        Self {
            zoom_min: 14,
            zoom_max: 18,
            level_min: 10,
            level_max: 14,
        }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.zoom_min >= self.zoom_max {
            return Err(GridError::InvalidConfig(format!(
                "zoom window {}..={} is empty",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.level_min > self.level_max || self.level_max > MAX_LEVEL {
            return Err(GridError::InvalidConfig(format!(
                "level window {}..={} must lie within 0..={}",
                self.level_min, self.level_max, MAX_LEVEL
            )));
        }
        Ok(())
    }
}

impl Default for ZoomMapping {
    fn default() -> Self {
        Self::map_view()
    }
}

impl ZoomLevelMapping for ZoomMapping {
    fn level_for_zoom(&self, zoom: u8) -> Result<ResolutionLevel, GridError> {
        if zoom < self.zoom_min || zoom > self.zoom_max {
            return Err(GridError::ZoomOutOfRange(zoom));
        }
        let t = f64::from(zoom - self.zoom_min) / f64::from(self.zoom_max - self.zoom_min);
        let span = f64::from(self.level_max) - f64::from(self.level_min);
        let level = (f64::from(self.level_min) + t * span).round() as u8;
        ResolutionLevel::new(level)
    }
}

/// Overlay settings.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use geogrid_rs::{GridConfig, LongitudeSpacing, MeridianTicks};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let config = GridConfig::from_json(
///     r#"{ "longitude_spacing": { "mode": "regional", "factor": 2 },
///          "meridian_ticks": "equatorial" }"#,
/// )?;
/// assert_eq!(config.longitude_spacing, LongitudeSpacing::Regional { factor: 2 });
/// assert_eq!(config.meridian_ticks, MeridianTicks::Equatorial);
/// assert_eq!(config.max_lines, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub longitude_spacing: LongitudeSpacing,
    pub meridian_ticks: MeridianTicks,
    /// Refuse viewports that would produce more lines than this
    pub max_lines: Option<usize>,
    pub zoom_mapping: ZoomMapping,
}

impl GridConfig {
    /// Fixed longitude widening with equatorial ticks, the layout of a map
    /// tuned for a single region.
    pub fn regional(factor: u32) -> Self {
        Self {
            longitude_spacing: LongitudeSpacing::Regional { factor },
            meridian_ticks: MeridianTicks::Equatorial,
            ..Self::default()
        }
    }

    pub fn max_lines(mut self, limit: usize) -> Self {
        self.max_lines = Some(limit);
        self
    }

    pub fn zoom_mapping(mut self, mapping: ZoomMapping) -> Self {
        self.zoom_mapping = mapping;
        self
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if let LongitudeSpacing::Regional { factor: 0 } = self.longitude_spacing {
            return Err(GridError::InvalidConfig(
                "regional longitude factor must be positive".to_string(),
            ));
        }
        if self.max_lines == Some(0) {
            return Err(GridError::InvalidConfig(
                "max_lines must be positive".to_string(),
            ));
        }
        self.zoom_mapping.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let config: GridConfig =
            serde_json::from_str(json).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        info!("Reading grid configuration from {}", path.display());
        let json = fs::read_to_string(path).map_err(|e| GridError::IoError(e.to_string()))?;
        Self::from_json(&json)
    }
}
