//! Grid ray casting for pseudo-3D views of a 2D tile map.

pub mod angle;
pub mod config;
mod error;
pub mod map;
pub mod player;
pub mod point;
pub mod projection;
pub mod ray;

pub use config::{Config, CELL_SIZE};
pub use error::Error;
pub use map::{Grid, Level, TileId};
pub use player::{MovementController, MovementIntents, ObserverState};
pub use point::{CellIndex, WorldPoint};
pub use projection::{Projection, WallSlice};
pub use ray::{Caster, RayHit, Side};
