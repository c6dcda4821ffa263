use crate::cell::GridCell;
use crate::coord::{BoundingBox, Coordinate, GeoPoint};
use crate::error::GridError;
use crate::index::{CellKey, ResolutionLevel, arithmetic_range, resolve_zone};
use geo_types::{Polygon, Rect};
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

const SNAP_EPSILON: f64 = 1e-9;

fn snap_down(value: f64, step: f64) -> f64 {
    (value / step + SNAP_EPSILON).floor() * step
}

/// Every cell at one level intersecting a bounding box.
///
/// Rows follow the north-south spacing; within a row cells are as wide as the
/// row's zone dictates, so the column layout changes at zone boundaries.
///
/// # Example
/// ```
/// use geogrid_rs::{BoundingBox, CellGrid};
///
/// # fn main() -> Result<(), geogrid_rs::GridError> {
/// let grid = CellGrid::builder()
///     .level(4)
///     .bounds(BoundingBox::from_lat_lon((52.0, 10.0), (53.0, 11.0))?)
///     .build()?;
///
/// if let Some(cell) = grid.get_cell_at(&(10.525, 52.26)) {
///     println!("{}", cell.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CellGrid {
    cells: Vec<GridCell>,
    level: u8,
}

impl CellGrid {
    pub fn builder() -> CellGridBuilder {
        CellGridBuilder::new()
    }

    pub fn from_bounds(bounds: &BoundingBox, level: u8) -> Result<Self, GridError> {
        Self::with_limit(bounds, level, None)
    }

    pub fn from_rect(rect: &Rect<f64>, level: u8) -> Result<Self, GridError> {
        Self::from_bounds(&BoundingBox::from_rect(rect)?, level)
    }

    fn with_limit(
        bounds: &BoundingBox,
        level: u8,
        max_cells: Option<usize>,
    ) -> Result<Self, GridError> {
        let level = ResolutionLevel::new(level)?;
        let cells = generate_cells_for_bounds(bounds, level, max_cells)?;
        debug!(
            "Built {} cells at level {} for {:?}",
            cells.len(),
            level,
            bounds
        );
        Ok(Self {
            cells,
            level: level.value(),
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    pub fn get_cell_at(&self, point: &impl Coordinate) -> Option<&GridCell> {
        let key = GridCell::encode(point, self.level).ok()?.key;
        self.cells.iter().find(|cell| cell.key == key)
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&GridCell>
    where
        F: Fn(&GridCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }

    /// Counts how many points fall in each cell, for heat maps.
    ///
    /// The result is aligned with [`CellGrid::cells`]. Points outside the
    /// grid or with invalid coordinates are ignored.
    pub fn count_points<C>(&self, points: &[C]) -> Vec<usize>
    where
        C: Coordinate + Sync,
    {
        let positions: HashMap<CellKey, usize> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.key, i))
            .collect();
        let n = self.cells.len();

        points
            .par_iter()
            .filter_map(|point| {
                let key = GridCell::encode(point, self.level).ok()?.key;
                positions.get(&key).copied()
            })
            .fold(
                || vec![0usize; n],
                |mut counts, i| {
                    counts[i] += 1;
                    counts
                },
            )
            .reduce(
                || vec![0usize; n],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
    }
}

#[derive(Debug, Default)]
pub struct CellGridBuilder {
    level: Option<u8>,
    bounds: Option<BoundingBox>,
    max_cells: Option<usize>,
}

impl CellGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sets the extent from `(lat, lon)` corners.
    pub fn extent(
        mut self,
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    ) -> Result<Self, GridError> {
        self.bounds = Some(BoundingBox::from_lat_lon(
            (min_lat, min_lon),
            (max_lat, max_lon),
        )?);
        Ok(self)
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Result<Self, GridError> {
        self.bounds = Some(BoundingBox::from_rect(rect)?);
        Ok(self)
    }

    /// Fail with [`GridError::TooManyCells`] instead of building more cells.
    pub fn max_cells(mut self, limit: usize) -> Self {
        self.max_cells = Some(limit);
        self
    }

    pub fn build(self) -> Result<CellGrid, GridError> {
        let level = self
            .level
            .ok_or_else(|| GridError::InvalidConfig("level must be set".to_string()))?;
        let bounds = self
            .bounds
            .ok_or_else(|| GridError::InvalidConfig("bounds must be set".to_string()))?;

        CellGrid::with_limit(&bounds, level, self.max_cells)
    }
}

fn generate_cells_for_bounds(
    bounds: &BoundingBox,
    level: ResolutionLevel,
    max_cells: Option<usize>,
) -> Result<Vec<GridCell>, GridError> {
    let lat_step = level.spacing_degrees();
    let lat_start = snap_down(bounds.min.lat, lat_step).max(-90.0);
    // a zero-height box still selects the row it lies on
    let lat_stop = bounds.max.lat.max(lat_start + lat_step * 0.5).min(90.0);

    if let Some(limit) = max_cells {
        let narrowest = lat_step * f64::from(resolve_zone(bounds.lat_nearest_equator())?.factor());
        let rows = ((lat_stop - lat_start) / lat_step).ceil();
        let cols = ((bounds.max.lon - snap_down(bounds.min.lon, narrowest)) / narrowest).ceil() + 1.0;
        let estimated = (rows * cols) as usize;
        if estimated > limit {
            return Err(GridError::TooManyCells { estimated, limit });
        }
    }

    let mut cells = Vec::new();

    // cells only touching the far edge are left out
    for lat in arithmetic_range(lat_start, lat_stop - lat_step * SNAP_EPSILON, lat_step)? {
        let center_lat = lat + lat_step * 0.5;
        let lon_step = lat_step * f64::from(resolve_zone(center_lat)?.factor());
        let lon_start = snap_down(bounds.min.lon, lon_step);
        let lon_stop = bounds.max.lon.max(lon_start + lon_step * 0.5);

        for lon in arithmetic_range(lon_start, lon_stop - lon_step * SNAP_EPSILON, lon_step)? {
            let center = GeoPoint::new(center_lat, lon + lon_step * 0.5);
            if center.lon.abs() > 180.0 {
                continue;
            }
            cells.push(GridCell::encode(&center, level.value())?);
        }
    }

    Ok(cells)
}
