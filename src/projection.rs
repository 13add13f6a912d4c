//! Screen-space helpers for turning ray hits into wall columns.

use crate::angle;
use crate::map::TileId;
use crate::ray::{RayHit, Side};

/// One vertical strip of wall, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    pub column: usize,
    /// First row of the wall. Ceiling fills everything above, floor everything below.
    pub top: f64,
    pub height: f64,
    pub texture_offset: f64,
    pub side: Side,
    pub tile: Option<TileId>,
}

impl WallSlice {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A flat view plane `width` pixels across.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    height: usize,
    cell_size: f64,
    plane_distance: f64,
}

impl Projection {
    pub fn new(width: usize, height: usize, field_of_view: f64, cell_size: f64) -> Self {
        let plane_distance =
            (width as f64 / 2.) / angle::to_radians(field_of_view / 2.).tan();

        Self {
            height,
            cell_size,
            plane_distance,
        }
    }

    /// Distance from the eye to the view plane, in pixels.
    pub fn plane_distance(&self) -> f64 {
        self.plane_distance
    }

    pub fn wall_height(&self, distance: f64) -> f64 {
        self.cell_size / distance * self.plane_distance
    }

    pub fn slice(&self, column: usize, hit: &RayHit) -> WallSlice {
        let height = self.wall_height(hit.distance);
        WallSlice {
            column,
            top: self.height as f64 / 2. - height / 2.,
            height,
            texture_offset: hit.texture_offset(self.cell_size),
            side: hit.closest,
            tile: hit.tile,
        }
    }

    /// Slices for a whole fan, one per screen column.
    pub fn slices<'a>(
        &'a self,
        hits: impl IntoIterator<Item = RayHit> + 'a,
    ) -> impl Iterator<Item = WallSlice> + 'a {
        hits.into_iter()
            .enumerate()
            .map(move |(column, hit)| self.slice(column, &hit))
    }
}
