use crate::config::{Config, CELL_SIZE};
use crate::point::{CellIndex, WorldPoint};
use crate::Error;
use anyhow::Context;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

/// Wall material of a cell. `0` is passable.
pub type TileId = u32;

pub const EMPTY: TileId = 0;

/// Read-only rectangular tile map, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
}

impl Grid {
    /// Builds a grid from rows of tiles. Every row must have the same length.
    pub fn new<R: AsRef<[TileId]>>(rows: &[R]) -> Result<Self, Error> {
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::MalformedGrid {
                    row: idx,
                    expected: width,
                    found: row.len(),
                });
            }
            tiles.extend_from_slice(row);
        }

        log::debug!("built {width}x{} grid", rows.len());
        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    /// A grid with no walls at all.
    pub fn empty(width: usize, height: usize) -> Result<Self, Error> {
        Self::new(&vec![vec![EMPTY; width]; height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_out_of_bounds(&self, cell: CellIndex) -> bool {
        cell.column < 0
            || cell.row < 0
            || cell.column as usize >= self.width
            || cell.row as usize >= self.height
    }

    /// Tile at `cell`, or `None` outside the grid.
    pub fn tile_at(&self, cell: CellIndex) -> Option<TileId> {
        if self.is_out_of_bounds(cell) {
            return None;
        }
        self.tiles
            .get(cell.row as usize * self.width + cell.column as usize)
            .copied()
    }

    pub fn is_occupied(&self, cell: CellIndex) -> bool {
        self.tile_at(cell).is_some_and(|tile| tile > EMPTY)
    }

    /// In bounds and free of walls.
    pub fn is_passable(&self, cell: CellIndex) -> bool {
        self.tile_at(cell) == Some(EMPTY)
    }
}

/// Observer parameters declared by a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverSettings {
    pub angle: f64,
    pub field_of_view: f64,
    pub speed: f64,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            angle: 133.,
            field_of_view: 60.,
            speed: 4.,
        }
    }
}

/// Ray budget of a level: the main view fan and the overview fan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FanSettings {
    pub rays: usize,
    pub overview_rays: usize,
}

impl Default for FanSettings {
    fn default() -> Self {
        Self {
            rays: 1024,
            overview_rays: 60,
        }
    }
}

/// A grid plus everything a level file declares about how to play it.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    pub spawn: Option<CellIndex>,
    pub observer: ObserverSettings,
    pub fan: FanSettings,
    pub config: Config,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("loading level at {}", path.display());
        let file = read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&file)
    }

    pub fn parse(source: &str) -> anyhow::Result<Self> {
        let mut lines = source.lines();
        let mut observer = ObserverSettings::default();
        let mut fan = FanSettings::default();
        let mut fisheye_correction = Config::default().fisheye_correction;
        let mut main = None;

        while let Some(line) = lines.by_ref().next() {
            match line.trim_end() {
                "" => continue,
                "!!!!META" => {
                    parse_meta(&mut lines, &mut observer, &mut fan, &mut fisheye_correction)?
                }
                "!!!!MAIN" => main = Some(parse_main(&mut lines)?),
                other => anyhow::bail!("unrecognized directive: {other}"),
            }
        }

        anyhow::ensure!(fan.rays > 0, "a level needs at least one ray");
        let (grid, spawn) = main.context("level has no !!!!MAIN section")?;
        let config = Config::new(CELL_SIZE, fisheye_correction)?;
        log::info!(
            "level is {}x{} cells, spawn {}",
            grid.width(),
            grid.height(),
            spawn.map_or_else(|| "unset".to_owned(), |cell| cell.to_string())
        );

        Ok(Self {
            grid,
            spawn,
            observer,
            fan,
            config,
        })
    }

    /// Centre of the spawn cell.
    pub fn spawn_point(&self) -> Option<WorldPoint> {
        Some(self.spawn?.center(self.config.cell_size()))
    }
}

fn param<T: FromStr>(params: &HashMap<&str, &str>, key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match params.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}

fn parse_meta<'lines>(
    mut lines: impl Iterator<Item = &'lines str>,
    observer: &mut ObserverSettings,
    fan: &mut FanSettings,
    fisheye_correction: &mut bool,
) -> anyhow::Result<()> {
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }

        let mut chunks = line.split(',');
        let directive = chunks.by_ref().next().unwrap_or_default().trim();
        let params = chunks
            .map(|param| param.split_once('='))
            .collect::<Option<HashMap<_, _>>>()
            .context("incorrectly formatted meta")?;
        match directive {
            "observer" => {
                observer.angle = param(&params, "angle", observer.angle)?;
                observer.field_of_view = param(&params, "fov", observer.field_of_view)?;
                observer.speed = param(&params, "speed", observer.speed)?;
            }
            "cast" => {
                *fisheye_correction = param(&params, "fisheye", *fisheye_correction)?;
                fan.rays = param(&params, "rays", fan.rays)?;
                fan.overview_rays = param(&params, "overview", fan.overview_rays)?;
            }
            other => anyhow::bail!("unrecognized meta directive: {other}"),
        }
    }

    Ok(())
}

fn parse_main<'lines>(
    mut lines: impl Iterator<Item = &'lines str>,
) -> anyhow::Result<(Grid, Option<CellIndex>)> {
    let mut legend = HashMap::new();
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }

        let mut chars = line.chars();
        let id = chars.by_ref().next().context("empty legend entry")?;
        if id == ' ' || id == '*' {
            anyhow::bail!("reserved legend character: {id:?}");
        }
        let tile = chars
            .as_str()
            .trim()
            .parse::<TileId>()
            .ok()
            .filter(|tile| *tile > EMPTY)
            .with_context(|| format!("invalid legend entry: {line}"))?;
        legend.insert(id, tile);
    }

    let mut spawn = None;
    let mut rows = vec![];
    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }

        let row = rows.len() as i32;
        let mut tiles = vec![];
        for (column, tile) in line.chars().enumerate() {
            tiles.push(match tile {
                ' ' => EMPTY,
                '*' => {
                    if spawn.is_some() {
                        anyhow::bail!("more than one spawn in level");
                    }
                    spawn = Some(CellIndex::new(column as i32, row));
                    EMPTY
                }
                tile => *legend
                    .get(&tile)
                    .with_context(|| format!("invalid tile in map: {tile}"))?,
            });
        }
        rows.push(tiles);
    }

    Ok((Grid::new(&rows)?, spawn))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        let rows: [[TileId; 3]; 3] = [[1, 1, 1], [1, 0, 2], [1, 1, 1]];
        Grid::new(&rows).expect("grid should build")
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows: Vec<Vec<TileId>> = vec![vec![1, 1, 1], vec![1, 0], vec![1, 1, 1]];
        assert_eq!(
            Grid::new(&rows),
            Err(Error::MalformedGrid {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn rejects_empty() {
        let rows: Vec<Vec<TileId>> = vec![];
        assert_eq!(Grid::new(&rows), Err(Error::EmptyGrid));
        assert_eq!(Grid::empty(0, 4), Err(Error::EmptyGrid));
    }

    #[test]
    fn bounds() {
        let grid = sample();
        assert!(!grid.is_out_of_bounds(CellIndex::new(0, 0)));
        assert!(!grid.is_out_of_bounds(CellIndex::new(2, 2)));
        assert!(grid.is_out_of_bounds(CellIndex::new(3, 0)));
        assert!(grid.is_out_of_bounds(CellIndex::new(0, 3)));
        assert!(grid.is_out_of_bounds(CellIndex::new(-1, 1)));
        assert!(grid.is_out_of_bounds(CellIndex::new(1, -1)));
    }

    #[test]
    fn occupancy() {
        let grid = sample();
        assert_eq!(grid.tile_at(CellIndex::new(2, 1)), Some(2));
        assert_eq!(grid.tile_at(CellIndex::new(5, 5)), None);
        assert!(grid.is_occupied(CellIndex::new(0, 0)));
        assert!(!grid.is_occupied(CellIndex::new(1, 1)));
        assert!(!grid.is_occupied(CellIndex::new(-1, 0)));
        assert!(grid.is_passable(CellIndex::new(1, 1)));
        assert!(!grid.is_passable(CellIndex::new(-1, 0)));
    }

    #[test]
    fn parses_level() {
        let level = Level::parse(
            "!!!!META\n\
             observer,angle=90,fov=66\n\
             cast,fisheye=false,rays=320\n\
             \n\
             !!!!MAIN\n\
             #1\n\
             E2\n\
             \n\
             ####\n\
             #* E\n\
             ####\n",
        )
        .expect("level should parse");

        assert_eq!(level.grid.width(), 4);
        assert_eq!(level.grid.height(), 3);
        assert_eq!(level.grid.tile_at(CellIndex::new(3, 1)), Some(2));
        assert_eq!(level.spawn, Some(CellIndex::new(1, 1)));
        assert_eq!(level.observer.angle, 90.);
        assert_eq!(level.observer.field_of_view, 66.);
        assert_eq!(level.observer.speed, 4.);
        assert_eq!(level.fan.rays, 320);
        assert_eq!(level.fan.overview_rays, 60);
        assert!(!level.config.fisheye_correction);
        assert_eq!(level.spawn_point(), Some(WorldPoint::new(96., 96.)));
    }

    #[test]
    fn level_errors() {
        assert!(Level::parse("!!!!BOGUS\n").is_err());
        assert!(Level::parse("!!!!META\nobserver,angle=90\n").is_err());
        assert!(Level::parse("!!!!META\nsky,color=blue\n").is_err());
        assert!(Level::parse("!!!!MAIN\n#1\n\n##\n#x\n").is_err());
        assert!(Level::parse("!!!!MAIN\n#0\n\n##\n").is_err());
        assert!(Level::parse("!!!!MAIN\n#1\n\n*#\n*#\n").is_err());
        assert!(Level::parse("!!!!META\ncast,rays=0\n\n!!!!MAIN\n#1\n\n##\n").is_err());

        let ragged = Level::parse("!!!!MAIN\n#1\n\n###\n#\n").unwrap_err();
        assert!(ragged.downcast_ref::<Error>().is_some());
    }
}
