use glam::DVec2;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Continuous position in world units (cells scaled by the cell size).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint(DVec2);

impl WorldPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn x(self) -> f64 {
        self.0.x
    }

    pub fn y(self) -> f64 {
        self.0.y
    }

    pub fn distance(self, other: WorldPoint) -> f64 {
        self.0.distance(other.0)
    }

    /// The cell containing this point, flooring each axis.
    pub fn cell(self, cell_size: f64) -> CellIndex {
        let cell = (self.0 / cell_size).floor().as_ivec2();
        CellIndex::new(cell.x, cell.y)
    }
}

impl Add<DVec2> for WorldPoint {
    type Output = WorldPoint;

    fn add(self, rhs: DVec2) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<DVec2> for WorldPoint {
    fn add_assign(&mut self, rhs: DVec2) {
        self.0 += rhs;
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.0.x, self.0.y)
    }
}

/// Discrete grid coordinate. May lie outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub column: i32,
    pub row: i32,
}

impl CellIndex {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    pub fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Top-left corner of the cell in world units.
    pub fn origin(self, cell_size: f64) -> WorldPoint {
        WorldPoint::new(self.column as f64 * cell_size, self.row as f64 * cell_size)
    }

    pub fn center(self, cell_size: f64) -> WorldPoint {
        self.origin(cell_size) + DVec2::splat(cell_size / 2.)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_floors_each_axis() {
        assert_eq!(WorldPoint::new(32., 32.).cell(64.), CellIndex::new(0, 0));
        assert_eq!(WorldPoint::new(64., 127.9).cell(64.), CellIndex::new(1, 1));
        assert_eq!(WorldPoint::new(-0.5, 10.).cell(64.), CellIndex::new(-1, 0));
    }

    #[test]
    fn center_is_inside_cell() {
        let cell = CellIndex::new(5, 2);
        assert_eq!(cell.center(64.), WorldPoint::new(352., 160.));
        assert_eq!(cell.center(64.).cell(64.), cell);
        assert_eq!(cell.origin(64.), WorldPoint::new(320., 128.));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = WorldPoint::new(0., 0.);
        let b = WorldPoint::new(3., 4.);
        assert_eq!(a.distance(b), 5.);
    }
}
