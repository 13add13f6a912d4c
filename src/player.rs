use crate::angle::{self, Direction};
use crate::config::Config;
use crate::map::Grid;
use crate::point::{CellIndex, WorldPoint};
use crate::Error;
use glam::DVec2;

/// Degrees turned per tick while a turn key is held.
pub const TURN_RATE: f64 = 2.;

/// Observer pose and movement parameters, advanced once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverState {
    pub position: WorldPoint,
    /// Degrees in `[0, 360)`.
    pub facing_angle: f64,
    pub field_of_view: f64,
    pub movement_speed: f64,
    /// Quadrant of `facing_angle` as of the last update.
    pub facing_direction: Direction,
}

impl ObserverState {
    pub fn new(
        position: WorldPoint,
        facing_angle: f64,
        field_of_view: f64,
        movement_speed: f64,
    ) -> Result<Self, Error> {
        if !facing_angle.is_finite() {
            return Err(Error::InvalidAngle(facing_angle));
        }
        if !(field_of_view > 0. && field_of_view < 180.) {
            return Err(Error::InvalidFieldOfView(field_of_view));
        }

        let facing_angle = angle::normalize(facing_angle);
        Ok(Self {
            position,
            facing_angle,
            field_of_view,
            movement_speed,
            facing_direction: angle::quadrant_direction(facing_angle),
        })
    }

    pub fn cell(&self, cell_size: f64) -> CellIndex {
        self.position.cell(cell_size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    Forward,
    Backward,
}

impl Walk {
    fn sign(self) -> i32 {
        match self {
            Walk::Forward => 1,
            Walk::Backward => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// Held controls for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntents {
    pub move_forward: bool,
    pub move_backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl MovementIntents {
    /// Forward wins over backward when both are held.
    pub fn walk(&self) -> Option<Walk> {
        if self.move_forward {
            Some(Walk::Forward)
        } else if self.move_backward {
            Some(Walk::Backward)
        } else {
            None
        }
    }

    /// Right wins over left when both are held.
    pub fn turn(&self) -> Option<Turn> {
        if self.turn_right {
            Some(Turn::Right)
        } else if self.turn_left {
            Some(Turn::Left)
        } else {
            None
        }
    }
}

/// Advances an [`ObserverState`] against a grid, one axis at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementController {
    cell_size: f64,
    turn_rate: f64,
}

impl MovementController {
    pub fn new(config: &Config) -> Self {
        Self {
            cell_size: config.cell_size(),
            turn_rate: TURN_RATE,
        }
    }

    pub fn with_turn_rate(mut self, turn_rate: f64) -> Self {
        self.turn_rate = turn_rate;
        self
    }

    /// Returns the state after one tick of `intents`.
    ///
    /// Each axis is checked against the neighbouring cell on that axis only, so a
    /// wall ahead on one axis still lets the observer slide along the other.
    pub fn update(
        &self,
        state: &ObserverState,
        grid: &Grid,
        intents: MovementIntents,
    ) -> ObserverState {
        let mut next = *state;
        next.facing_direction = angle::quadrant_direction(state.facing_angle);

        if let Some(walk) = intents.walk() {
            let cell = state.cell(self.cell_size);
            let sign = walk.sign();
            let direction = next.facing_direction;
            let step = DVec2::from_angle(angle::to_radians(state.facing_angle))
                * state.movement_speed
                * sign as f64;

            let beside = cell.offset(direction.x.as_i32() * sign, 0);
            if grid.is_passable(beside) {
                next.position += DVec2::new(step.x, 0.);
            } else {
                log::trace!("x movement blocked by {beside}");
            }

            let ahead = cell.offset(0, direction.y.as_i32() * sign);
            if grid.is_passable(ahead) {
                next.position += DVec2::new(0., step.y);
            } else {
                log::trace!("y movement blocked by {ahead}");
            }
        }

        match intents.turn() {
            Some(Turn::Right) => next.facing_angle += self.turn_rate,
            Some(Turn::Left) => next.facing_angle -= self.turn_rate,
            None => {}
        }
        next.facing_angle = angle::normalize(next.facing_angle);

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Sign;
    use crate::map::TileId;

    const FORWARD: MovementIntents = MovementIntents {
        move_forward: true,
        move_backward: false,
        turn_left: false,
        turn_right: false,
    };

    fn grid() -> Grid {
        let rows: [[TileId; 5]; 5] = [
            [1, 1, 1, 1, 1],
            [1, 0, 1, 0, 1],
            [1, 0, 0, 0, 1],
            [1, 0, 0, 0, 1],
            [1, 1, 1, 1, 1],
        ];
        Grid::new(&rows).expect("grid should build")
    }

    fn observer(x: f64, y: f64, angle: f64) -> ObserverState {
        ObserverState::new(WorldPoint::new(x, y), angle, 60., 4.).expect("observer should build")
    }

    fn controller() -> MovementController {
        MovementController::new(&Config::default())
    }

    #[test]
    fn precedence() {
        let both = MovementIntents {
            move_forward: true,
            move_backward: true,
            turn_left: true,
            turn_right: true,
        };
        assert_eq!(both.walk(), Some(Walk::Forward));
        assert_eq!(both.turn(), Some(Turn::Right));
        assert_eq!(MovementIntents::default().walk(), None);
        assert_eq!(MovementIntents::default().turn(), None);
    }

    #[test]
    fn walks_forward_in_open_space() {
        let state = observer(160., 160., 0.);
        let next = controller().update(&state, &grid(), FORWARD);
        assert!((next.position.x() - 164.).abs() < 1e-9);
        assert!((next.position.y() - 160.).abs() < 1e-9);
    }

    #[test]
    fn walks_backward() {
        let state = observer(160., 160., 0.);
        let intents = MovementIntents {
            move_backward: true,
            ..Default::default()
        };
        let next = controller().update(&state, &grid(), intents);
        assert!((next.position.x() - 156.).abs() < 1e-9);
    }

    #[test]
    fn slides_along_blocked_axis() {
        // wall at column 2 of row 1, open cell below
        let state = observer(96., 96., 45.);
        let next = controller().update(&state, &grid(), FORWARD);
        assert_eq!(next.position.x(), 96.);
        assert!((next.position.y() - (96. + 4. * 45f64.to_radians().sin())).abs() < 1e-9);
        assert_eq!(next.cell(64.), CellIndex::new(1, 1));
    }

    #[test]
    fn backs_into_a_wall_and_slides() {
        // facing up and left from [3, 1], so backing up heads for the right wall
        let state = observer(224., 96., 225.);
        let intents = MovementIntents {
            move_backward: true,
            ..Default::default()
        };
        let next = controller().update(&state, &grid(), intents);
        assert_eq!(next.position.x(), 224.);
        assert!((next.position.y() - (96. - 4. * 225f64.to_radians().sin())).abs() < 1e-9);
        assert!(next.position.y() > 96.);
    }

    #[test]
    fn blocked_on_both_axes_is_a_no_op() {
        // top-left corner facing up and left
        let state = observer(96., 96., 225.);
        let next = controller().update(&state, &grid(), FORWARD);
        assert_eq!(next.position, state.position);
    }

    #[test]
    fn turning_wraps() {
        let right = MovementIntents {
            turn_right: true,
            ..Default::default()
        };
        let left = MovementIntents {
            turn_left: true,
            ..Default::default()
        };

        let next = controller().update(&observer(160., 160., 359.), &grid(), right);
        assert!((next.facing_angle - 1.).abs() < 1e-9);

        let next = controller().update(&observer(160., 160., 1.), &grid(), left);
        assert!((next.facing_angle - 359.).abs() < 1e-9);

        let fast = controller().with_turn_rate(10.);
        assert_eq!(fast.update(&observer(160., 160., 0.), &grid(), right).facing_angle, 10.);
    }

    #[test]
    fn direction_follows_angle_before_turning() {
        let mut state = observer(160., 160., 10.);
        state.facing_angle = 135.;
        let next = controller().update(&state, &grid(), MovementIntents::default());
        assert_eq!(next.facing_direction, Direction::new(Sign::Negative, Sign::Positive));
    }

    #[test]
    fn rejects_bad_field_of_view() {
        let position = WorldPoint::new(0., 0.);
        assert_eq!(
            ObserverState::new(position, 0., 0., 4.),
            Err(Error::InvalidFieldOfView(0.))
        );
        assert!(ObserverState::new(position, 0., 180., 4.).is_err());
        assert_eq!(
            ObserverState::new(position, f64::INFINITY, 60., 4.),
            Err(Error::InvalidAngle(f64::INFINITY))
        );
        assert_eq!(ObserverState::new(position, -90., 60., 4.).map(|s| s.facing_angle), Ok(270.));
    }
}
