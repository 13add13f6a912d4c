use sim::{parse_script, Simulation};
use std::env;

mod sim;

// level used when no map file is given
const DEFAULT_LEVEL: &str = include_str!("../maps/default.map");

// walk into the room, turn, back off and compare with the correction disabled
const DEFAULT_SCRIPT: &str = "w w w wd wd wd d d d . s s sa sa f . w w";

// height of the view the wall slices are sized for
const HEIGHT: usize = 768;

fn run() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);

    let level = match args.next() {
        Some(path) => gridcast::Level::load(path)?,
        None => {
            log::info!("no level given, using the built-in one");
            gridcast::Level::parse(DEFAULT_LEVEL)?
        }
    };
    let script = parse_script(&args.next().unwrap_or_else(|| DEFAULT_SCRIPT.to_owned()))?;

    log::info!("initializing simulation");
    let mut sim = Simulation::new(&level, HEIGHT)?;
    log::info!(
        "observer at {} facing {}, casting {} rays per tick",
        sim.observer().position,
        sim.observer().facing_angle,
        level.fan.rays
    );

    for tick in script {
        println!("{}", sim.tick(tick)?);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRIDCAST_LOG");

    if let Err(err) = run() {
        log::error!("simulation failed: {err:#}");
        Err(err)?;
    }

    Ok(())
}
