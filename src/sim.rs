use anyhow::Context;
use gridcast::{
    Caster, CellIndex, Level, MovementController, MovementIntents, ObserverState, Projection,
    RayHit, Side,
};
use std::fmt;

/// Controls held for one tick of a script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tick {
    pub intents: MovementIntents,
    pub toggle_fisheye: bool,
}

/// Parses a script of space separated ticks.
///
/// Each tick lists its held keys: `w` forward, `s` backward, `a` left, `d` right,
/// `f` toggles fisheye correction and `.` holds nothing.
pub(crate) fn parse_script(script: &str) -> anyhow::Result<Vec<Tick>> {
    script
        .split_whitespace()
        .map(|token| {
            let mut tick = Tick::default();
            for key in token.chars() {
                match key {
                    'w' => tick.intents.move_forward = true,
                    's' => tick.intents.move_backward = true,
                    'a' => tick.intents.turn_left = true,
                    'd' => tick.intents.turn_right = true,
                    'f' => tick.toggle_fisheye = true,
                    '.' => {}
                    other => anyhow::bail!("unrecognized key in script: {other}"),
                }
            }
            Ok(tick)
        })
        .collect()
}

/// What one tick produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Report {
    pub tick: usize,
    pub observer: ObserverState,
    pub cell: CellIndex,
    pub fisheye_correction: bool,
    pub centre: RayHit,
    pub centre_height: f64,
    /// Shortest radial distance of the overview fan.
    pub nearest: f64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.centre.closest {
            Side::Horizontal => "horizontal",
            Side::Vertical => "vertical",
        };
        let tile = self
            .centre
            .tile
            .map_or_else(|| "edge".to_owned(), |tile| tile.to_string());

        write!(
            f,
            "tick {:>3}: pos {} cell {} angle {:>5.1} fisheye {} | centre {:.1} {side} tile {tile} wall {:.0}px | nearest {:.1}",
            self.tick,
            self.observer.position,
            self.cell,
            self.observer.facing_angle,
            if self.fisheye_correction { "on" } else { "off" },
            self.centre.distance,
            self.centre_height,
            self.nearest,
        )
    }
}

pub(crate) struct Simulation<'level> {
    level: &'level Level,
    observer: ObserverState,
    caster: Caster<'level>,
    movement: MovementController,
    projection: Projection,
    ticks: usize,
}

impl<'level> Simulation<'level> {
    /// Places the observer on the level's spawn cell.
    pub fn new(level: &'level Level, view_height: usize) -> anyhow::Result<Self> {
        let settings = level.observer;
        let position = level.spawn_point().context("no spawn in level")?;
        let observer = ObserverState::new(
            position,
            settings.angle,
            settings.field_of_view,
            settings.speed,
        )?;
        let caster = Caster::new(&level.grid, level.config, settings.field_of_view)?;
        let projection = Projection::new(
            level.fan.rays,
            view_height,
            settings.field_of_view,
            level.config.cell_size(),
        );

        Ok(Self {
            level,
            observer,
            caster,
            movement: MovementController::new(&level.config),
            projection,
            ticks: 0,
        })
    }

    pub fn observer(&self) -> &ObserverState {
        &self.observer
    }

    pub fn tick(&mut self, input: Tick) -> anyhow::Result<Report> {
        if input.toggle_fisheye {
            let enabled = !self.caster.fisheye_correction();
            self.caster.set_fisheye_correction(enabled);
        }

        self.observer = self
            .movement
            .update(&self.observer, &self.level.grid, input.intents);

        let rays = self.level.fan.rays;
        let centre = self
            .caster
            .fan(&self.observer, rays)
            .nth(rays / 2)
            .context("fan produced no rays")?;
        let centre_height = self.projection.slice(rays / 2, &centre).height;

        // the overview shows radial distances, so it flips the correction
        let overview = self
            .caster
            .with_fisheye_correction(!self.caster.fisheye_correction());
        let nearest = overview
            .fan(&self.observer, self.level.fan.overview_rays)
            .map(|hit| hit.distance)
            .fold(f64::INFINITY, f64::min);

        let report = Report {
            tick: self.ticks,
            observer: self.observer,
            cell: self.observer.cell(self.level.config.cell_size()),
            fisheye_correction: self.caster.fisheye_correction(),
            centre,
            centre_height,
            nearest,
        };
        self.ticks += 1;

        log::debug!("{report}");
        Ok(report)
    }
}
