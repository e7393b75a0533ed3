//! Estimate dominant motion between two frames from tracked feature correspondences.

use anyhow::{anyhow, Result};
use clap::*;
use mode_seek_estimator::ModeSeekEstimator;
use polarflow::prelude::v1::{
    Estimator, EstimatorConfig, FrameCamera, Margins, StatusFilter, Strategy, WrapRule,
};
use refine_estimator::RefineEstimator;
use std::str::FromStr;

fn command() -> Command<'static> {
    Command::new("shift-estimate")
        .version(crate_version!())
        .about(crate_description!())
        .arg(
            Arg::new("input")
                .help("Correspondence file (.csv or .pairs), tcp:// stream, or - for stdin")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON estimator configuration")
                .takes_value(true),
        )
        .arg(
            Arg::new("angle-margin")
                .long("angle-margin")
                .help("Angular cluster tolerance, in radians")
                .takes_value(true),
        )
        .arg(
            Arg::new("size-margin")
                .long("size-margin")
                .help("Magnitude cluster tolerance, in pixels")
                .takes_value(true),
        )
        .arg(
            Arg::new("wrap")
                .long("wrap")
                .takes_value(true)
                .possible_values(["shifted", "circular"]),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .short('s')
                .takes_value(true)
                .possible_values(["mode", "mode_seek", "refine"]),
        )
        .arg(
            Arg::new("iterations")
                .long("iterations")
                .help("Refinement steps")
                .takes_value(true),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Scan cluster centers on all cores"),
        )
        .arg(
            Arg::new("tracked-only")
                .long("tracked-only")
                .help("Drop correspondences the tracker lost"),
        )
        .arg(Arg::new("width").long("width").takes_value(true))
        .arg(Arg::new("height").long("height").takes_value(true))
        .arg(
            Arg::new("fov-x")
                .long("fov-x")
                .help("Horizontal field of view, in degrees")
                .takes_value(true),
        )
        .arg(
            Arg::new("fov-y")
                .long("fov-y")
                .help("Vertical field of view, in degrees")
                .takes_value(true),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .help("Assumed scene depth")
                .takes_value(true),
        )
}

fn parsed<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    matches
        .value_of(name)
        .map(|v| v.parse().map_err(|e| anyhow!("Invalid {name} \"{v}\": {e}")))
        .transpose()
}

/// Apply command line overrides on top of a base configuration.
fn apply_overrides(matches: &ArgMatches, mut config: EstimatorConfig) -> Result<EstimatorConfig> {
    let Margins {
        angle_margin,
        size_margin,
        wrap,
    } = config.margins;

    config.margins = Margins {
        angle_margin: parsed(matches, "angle-margin")?.unwrap_or(angle_margin),
        size_margin: parsed(matches, "size-margin")?.unwrap_or(size_margin),
        wrap: match matches.value_of("wrap") {
            Some("shifted") => WrapRule::ShiftedTurns,
            Some("circular") => WrapRule::Circular,
            _ => wrap,
        },
    };

    if let Some(strategy) = parsed::<Strategy>(matches, "strategy")? {
        config.strategy = strategy;
    }

    if let Some(iterations) = parsed(matches, "iterations")? {
        config.iterations = iterations;
    }

    if matches.is_present("parallel") {
        config.parallel = true;
    }

    if matches.is_present("tracked-only") {
        config.status_filter = StatusFilter::TrackedOnly;
    }

    Ok(config)
}

fn load_config(matches: &ArgMatches) -> Result<EstimatorConfig> {
    let base = match matches.value_of("config") {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            serde_json::from_reader(std::io::BufReader::new(file))?
        }
        None => EstimatorConfig::default(),
    };

    apply_overrides(matches, base)
}

/// Build the camera and depth for shift conversion, if requested.
fn load_camera(matches: &ArgMatches) -> Result<Option<(FrameCamera, f32)>> {
    let values = ["width", "height", "fov-x", "fov-y", "depth"]
        .into_iter()
        .map(|name| parsed::<f32>(matches, name))
        .collect::<Result<Vec<_>>>()?;

    match values[..] {
        [Some(width), Some(height), Some(fov_x), Some(fov_y), Some(depth)] => Ok(Some((
            FrameCamera::new(width, height, fov_x, fov_y),
            depth,
        ))),
        [None, None, None, None, None] => Ok(None),
        _ => Err(anyhow!(
            "Shift conversion needs all of width, height, fov-x, fov-y and depth"
        )),
    }
}

fn create_estimator(config: &EstimatorConfig) -> Box<dyn Estimator> {
    match config.strategy {
        Strategy::ModeSeek => Box::new(ModeSeekEstimator::from(config)),
        Strategy::Refine => Box::new(RefineEstimator::from(config)),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = command().get_matches();

    let input = matches
        .value_of("input")
        .ok_or_else(|| anyhow!("Please supply an input file!"))?;

    let config = load_config(&matches)?;
    let camera = load_camera(&matches)?;

    log::debug!("{:?}", config);

    let pairs = pair_loader::load(input)?;
    let samples = pairs.to_polar(config.status_filter)?;

    let mut estimator = create_estimator(&config);
    let result = estimator.estimate(&samples)?;

    println!("{}\t\t{}", result.angle, result.magnitude);

    if let Some((camera, depth)) = camera {
        let shift = camera.shift(result, depth);
        println!("shift: {} {}", shift.x, shift.y);
    }

    Ok(())
}
