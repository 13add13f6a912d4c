use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("grid has no tiles")]
    EmptyGrid,
    #[error("malformed grid: row {row} has {found} columns, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    #[error("angle must be finite, got {0}")]
    InvalidAngle(f64),
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),
}
