/// One full turn, in degrees.
pub const FULL_TURN: f64 = 360.;

/// Which way a coordinate moves along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn as_f64(self) -> f64 {
        match self {
            Sign::Positive => 1.,
            Sign::Negative => -1.,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }
}

/// Quadrant sign pair of an angle. Never has a zero component.
///
/// Angles grow clockwise on screen: `y` points down, so 90 degrees faces `+y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    pub x: Sign,
    pub y: Sign,
}

impl Direction {
    pub const fn new(x: Sign, y: Sign) -> Self {
        Self { x, y }
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    debug_assert!(angle.is_finite(), "angle must be finite, got {angle}");

    // `%` keeps the loops below to a single pass for far-off angles
    let mut angle = angle % FULL_TURN;
    while angle < 0. {
        angle += FULL_TURN;
    }
    // tiny negative inputs round up to exactly 360
    while angle >= FULL_TURN {
        angle -= FULL_TURN;
    }

    angle
}

pub fn to_radians(angle: f64) -> f64 {
    angle.to_radians()
}

/// Resolves the quadrant of an angle in degrees.
///
/// Each quadrant includes its upper boundary: 0 and 90 are both `(+, +)`,
/// 180 is `(-, +)` and 270 is `(-, -)`. 360 normalizes to 0.
pub fn quadrant_direction(angle: f64) -> Direction {
    use Sign::*;

    let angle = normalize(angle);
    if angle <= 90. {
        Direction::new(Positive, Positive)
    } else if angle <= 180. {
        Direction::new(Negative, Positive)
    } else if angle <= 270. {
        Direction::new(Negative, Negative)
    } else {
        Direction::new(Positive, Negative)
    }
}
