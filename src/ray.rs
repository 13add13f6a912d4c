use crate::angle::{self, Direction, Sign};
use crate::config::Config;
use crate::map::{Grid, TileId, EMPTY};
use crate::player::ObserverState;
use crate::point::{CellIndex, WorldPoint};
use crate::Error;
use glam::DVec2;

/// Which family of gridlines the nearest crossing lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// A line of constant `y`.
    Horizontal,
    /// A line of constant `x`.
    Vertical,
}

/// Result of casting a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Absolute angle of the ray in degrees, before normalization.
    pub angle: f64,
    /// Nearest stop on a horizontal gridline, `None` for rays at 0 or 180 degrees.
    pub horizontal_hit: Option<WorldPoint>,
    /// Nearest stop on a vertical gridline, `None` for rays at 90 or 270 degrees.
    pub vertical_hit: Option<WorldPoint>,
    pub distance: f64,
    pub closest: Side,
    /// Cell looked up for the chosen stop.
    pub cell: CellIndex,
    /// Wall material, or `None` when the ray left the grid.
    pub tile: Option<TileId>,
}

impl RayHit {
    pub fn hit_point(&self) -> WorldPoint {
        let point = match self.closest {
            Side::Horizontal => self.horizontal_hit,
            Side::Vertical => self.vertical_hit,
        };
        // the chosen side always has a finite distance, so it always has a point
        point.unwrap_or_default()
    }

    pub fn is_boundary_exit(&self) -> bool {
        self.tile.is_none()
    }

    /// Offset along the wall face, used to pick a texture column.
    pub fn texture_offset(&self, cell_size: f64) -> f64 {
        let point = self.hit_point();
        match self.closest {
            Side::Horizontal => point.x().rem_euclid(cell_size),
            Side::Vertical => point.y().rem_euclid(cell_size),
        }
    }
}

/// Where a traversal stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Stop {
    point: WorldPoint,
    cell: CellIndex,
    tile: Option<TileId>,
}

/// Per-ray values shared by both traversals.
#[derive(Clone, Copy, Debug)]
struct Ray {
    direction: Direction,
    /// `None` when the ray is vertical.
    tan: Option<f64>,
    /// `None` when the ray is horizontal.
    cot: Option<f64>,
}

impl Ray {
    fn new(angle: f64) -> Self {
        let direction = angle::quadrant_direction(angle);
        let angle = angle::normalize(angle);

        let (tan, cot) = if angle % 180. == 0. {
            (Some(0.), None)
        } else if angle % 90. == 0. {
            (None, Some(0.))
        } else {
            let tan = angle::to_radians(angle).tan();
            (Some(tan), Some(tan.recip()))
        };

        Self {
            direction,
            tan,
            cot,
        }
    }
}

/// Grid DDA ray caster over a fixed field of view.
#[derive(Clone, Copy, Debug)]
pub struct Caster<'grid> {
    grid: &'grid Grid,
    config: Config,
    field_of_view: f64,
}

impl<'grid> Caster<'grid> {
    pub fn new(grid: &'grid Grid, config: Config, field_of_view: f64) -> Result<Self, Error> {
        if !(field_of_view > 0. && field_of_view < 180.) {
            return Err(Error::InvalidFieldOfView(field_of_view));
        }

        log::debug!(
            "caster ready: fov {field_of_view}, cell size {}, fisheye correction {}",
            config.cell_size(),
            config.fisheye_correction
        );
        Ok(Self {
            grid,
            config,
            field_of_view,
        })
    }

    pub fn fisheye_correction(&self) -> bool {
        self.config.fisheye_correction
    }

    pub fn set_fisheye_correction(&mut self, enabled: bool) {
        if self.config.fisheye_correction != enabled {
            log::debug!("fisheye correction {}", if enabled { "on" } else { "off" });
        }
        self.config.fisheye_correction = enabled;
    }

    /// A copy of this caster with fisheye correction set to `enabled`.
    pub fn with_fisheye_correction(mut self, enabled: bool) -> Self {
        self.config.fisheye_correction = enabled;
        self
    }

    /// Absolute angle of ray `ray_index` out of `total_rays`, leftmost first.
    pub fn ray_angle(&self, observer_angle: f64, ray_index: usize, total_rays: usize) -> f64 {
        let total_rays = total_rays.max(1) as f64;
        observer_angle - self.field_of_view / 2. + self.field_of_view * ray_index as f64 / total_rays
    }

    /// Casts one ray of the fan and returns the nearer gridline stop.
    pub fn cast(
        &self,
        observer_angle: f64,
        position: WorldPoint,
        ray_index: usize,
        total_rays: usize,
    ) -> RayHit {
        let angle = self.ray_angle(observer_angle, ray_index, total_rays);
        let ray = Ray::new(angle);

        let horizontal = self.horizontal_stop(position, &ray);
        let vertical = self.vertical_stop(position, &ray);

        let distance_to = |stop: Option<Stop>| {
            stop.map_or(f64::INFINITY, |stop| position.distance(stop.point))
        };
        let horizontal_distance = distance_to(horizontal);
        let vertical_distance = distance_to(vertical);

        // ties go to the horizontal side
        let (closest, distance, stop) = match (horizontal, vertical) {
            (Some(h), Some(v)) => {
                if vertical_distance < horizontal_distance {
                    (Side::Vertical, vertical_distance, v)
                } else {
                    (Side::Horizontal, horizontal_distance, h)
                }
            }
            (Some(h), None) => (Side::Horizontal, horizontal_distance, h),
            (None, Some(v)) => (Side::Vertical, vertical_distance, v),
            (None, None) => unreachable!("every ray crosses at least one family of gridlines"),
        };

        let distance = if self.config.fisheye_correction {
            distance * angle::to_radians(observer_angle - angle).cos()
        } else {
            distance
        };

        RayHit {
            angle,
            horizontal_hit: horizontal.map(|stop| stop.point),
            vertical_hit: vertical.map(|stop| stop.point),
            distance,
            closest,
            cell: stop.cell,
            tile: stop.tile,
        }
    }

    /// Casts `total_rays` rays across the observer's view, left to right.
    ///
    /// The fan spans `observer.field_of_view`, not the caster's own.
    pub fn fan(
        &self,
        observer: &ObserverState,
        total_rays: usize,
    ) -> impl Iterator<Item = RayHit> + 'grid {
        let caster = self.spanning(observer);
        let (angle, position) = (observer.facing_angle, observer.position);
        (0..total_rays).map(move |idx| caster.cast(angle, position, idx, total_rays))
    }

    /// Same result as [`Caster::fan`], with rays split across threads.
    #[cfg(feature = "parallel")]
    pub fn par_fan(&self, observer: &ObserverState, total_rays: usize) -> Vec<RayHit> {
        use rayon::prelude::*;

        let caster = self.spanning(observer);
        let (angle, position) = (observer.facing_angle, observer.position);
        (0..total_rays)
            .into_par_iter()
            .map(|idx| caster.cast(angle, position, idx, total_rays))
            .collect()
    }

    fn spanning(&self, observer: &ObserverState) -> Self {
        Self {
            field_of_view: observer.field_of_view,
            ..*self
        }
    }

    /// Walks the lines of constant `y`, starting with the one the ray meets first.
    fn horizontal_stop(&self, origin: WorldPoint, ray: &Ray) -> Option<Stop> {
        // horizontal rays never cross a horizontal gridline
        let cot = ray.cot?;
        let size = self.config.cell_size();
        let dir = ray.direction;

        // index of the gridline being crossed; the cell past it is `row + look`
        let mut row = origin.cell(size).row + i32::from(dir.y.is_positive());
        let look = if dir.y.is_positive() { 0 } else { -1 };

        let y = row as f64 * size;
        let mut point = WorldPoint::new(origin.x() + (y - origin.y()) * cot, y);
        let step = DVec2::new((size * cot).abs() * dir.x.as_f64(), size * dir.y.as_f64());

        loop {
            let cell = CellIndex::new((point.x() / size).floor() as i32, row + look);

            if self.grid.is_out_of_bounds(cell) {
                let point = match ray.tan {
                    Some(tan) => {
                        let x = self.edge(dir.x, self.grid.width());
                        WorldPoint::new(x, origin.y() + tan * (x - origin.x()))
                    }
                    None => WorldPoint::new(origin.x(), self.edge(dir.y, self.grid.height())),
                };
                log::trace!("horizontal traversal left the grid at {cell}, clamped to {point}");
                return Some(Stop {
                    point,
                    cell,
                    tile: None,
                });
            }

            if let Some(tile) = self.grid.tile_at(cell).filter(|tile| *tile > EMPTY) {
                return Some(Stop {
                    point,
                    cell,
                    tile: Some(tile),
                });
            }

            point += step;
            row += dir.y.as_i32();
        }
    }

    /// Walks the lines of constant `x`, starting with the one the ray meets first.
    fn vertical_stop(&self, origin: WorldPoint, ray: &Ray) -> Option<Stop> {
        // vertical rays never cross a vertical gridline
        let tan = ray.tan?;
        let size = self.config.cell_size();
        let dir = ray.direction;

        let mut column = origin.cell(size).column + i32::from(dir.x.is_positive());
        let look = if dir.x.is_positive() { 0 } else { -1 };

        let x = column as f64 * size;
        let mut point = WorldPoint::new(x, origin.y() + tan * (x - origin.x()));
        let step = DVec2::new(size * dir.x.as_f64(), (size * tan).abs() * dir.y.as_f64());

        loop {
            let cell = CellIndex::new(column + look, (point.y() / size).floor() as i32);

            if self.grid.is_out_of_bounds(cell) {
                let point = match ray.cot {
                    Some(cot) => {
                        let y = self.edge(dir.y, self.grid.height());
                        WorldPoint::new(origin.x() + (y - origin.y()) * cot, y)
                    }
                    None => WorldPoint::new(self.edge(dir.x, self.grid.width()), origin.y()),
                };
                log::trace!("vertical traversal left the grid at {cell}, clamped to {point}");
                return Some(Stop {
                    point,
                    cell,
                    tile: None,
                });
            }

            if let Some(tile) = self.grid.tile_at(cell).filter(|tile| *tile > EMPTY) {
                return Some(Stop {
                    point,
                    cell,
                    tile: Some(tile),
                });
            }

            point += step;
            column += dir.x.as_i32();
        }
    }

    /// World coordinate of the grid edge faced along one axis.
    fn edge(&self, sign: Sign, cells: usize) -> f64 {
        match sign {
            Sign::Positive => cells as f64 * self.config.cell_size(),
            Sign::Negative => 0.,
        }
    }
}
