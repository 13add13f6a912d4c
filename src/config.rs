use crate::Error;

/// Side length of one grid cell in world units.
pub const CELL_SIZE: f64 = 64.;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    cell_size: f64,
    /// Scale distances onto the view plane instead of reporting radial length.
    pub fisheye_correction: bool,
}

impl Config {
    pub fn new(cell_size: f64, fisheye_correction: bool) -> Result<Self, Error> {
        if !cell_size.is_finite() || cell_size <= 0. {
            return Err(Error::InvalidCellSize(cell_size));
        }

        Ok(Self {
            cell_size,
            fisheye_correction,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            fisheye_correction: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_cell_sizes() {
        assert_eq!(Config::new(0., true), Err(Error::InvalidCellSize(0.)));
        assert_eq!(Config::new(-64., false), Err(Error::InvalidCellSize(-64.)));
        assert!(Config::new(f64::INFINITY, true).is_err());
        assert!(Config::new(f64::NAN, true).is_err());
    }

    #[test]
    fn default_matches_reference_setup() {
        let config = Config::default();
        assert_eq!(config.cell_size(), 64.);
        assert!(config.fisheye_correction);
    }
}
