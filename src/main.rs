mod errors;

use crate::errors::{report, ErrorKind, Result};
use clap::{value_t, App, AppSettings, Arg};
use failchain::ResultExt;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use world::{FaceKind, Level, World, WorldConfig};

pub enum RunMode {
    Inspect(PathBuf),
    Level(PathBuf),
    Check(PathBuf),
}

pub struct Options {
    mode: RunMode,
    config: WorldConfig,
}

impl Options {
    pub fn from_args() -> Result<Options> {
        let matches = App::new("Blade World")
            .version(env!("CARGO_PKG_VERSION"))
            .author("Cristi Cobzarenco <cristi.cobzarenco@gmail.com>")
            .about("Decodes Blade of Darkness world geometry and reports what it finds.")
            .settings(&[AppSettings::ColoredHelp, AppSettings::ArgRequiredElseHelp])
            .arg(
                Arg::with_name("world")
                    .long("world")
                    .short("w")
                    .help("decode a .bw world file and print statistics")
                    .value_name("FILE")
                    .conflicts_with_all(&["level", "check"]),
            )
            .arg(
                Arg::with_name("level")
                    .long("level")
                    .short("l")
                    .help("resolve a .lvl manifest and decode the world it names")
                    .value_name("FILE")
                    .conflicts_with("check"),
            )
            .arg(
                Arg::with_name("check")
                    .long("check")
                    .help("decode every .bw file under a directory, then exit")
                    .value_name("DIR"),
            )
            .arg(
                Arg::with_name("config")
                    .long("config")
                    .short("c")
                    .help("path to TOML decoder configuration")
                    .value_name("FILE"),
            )
            .arg(
                Arg::with_name("dump")
                    .long("dump")
                    .help("trace every field read from world files"),
            )
            .get_matches();

        let mut config = match matches.value_of("config") {
            Some(path) => {
                WorldConfig::from_file(&path).chain_err(|| ErrorKind::config(Path::new(path)))?
            }
            None => WorldConfig::default(),
        };
        if matches.is_present("dump") {
            config.decoder.dump_log = true;
        }

        let path = |name: &str| -> Result<PathBuf> {
            Ok(value_t!(matches, name, String)
                .chain_err(|| ErrorKind::Arguments)?
                .into())
        };
        let mode = if matches.is_present("world") {
            RunMode::Inspect(path("world")?)
        } else if matches.is_present("level") {
            RunMode::Level(path("level")?)
        } else if matches.is_present("check") {
            RunMode::Check(path("check")?)
        } else {
            return Err(ErrorKind::NoInput.into());
        };
        Ok(Options { mode, config })
    }
}

fn print_statistics(world: &World) {
    let mut counts = [0usize; 6];
    for face in &world.faces {
        let slot = match face.kind {
            FaceKind::Simple { .. } => 0,
            FaceKind::Portal { .. } => 1,
            FaceKind::WithHole { .. } => 2,
            FaceKind::Bsp { .. } => 3,
            FaceKind::Skydome { .. } => 4,
            FaceKind::SubFace { .. } => 5,
        };
        counts[slot] += 1;
    }
    println!("sectors      {:8}", world.sectors.len());
    println!("vertices     {:8}", world.vertices.len());
    println!("faces        {:8}", world.faces.len());
    println!("  simple     {:8}", counts[0]);
    println!("  portal     {:8}", counts[1]);
    println!("  with hole  {:8}", counts[2]);
    println!("  bsp        {:8}", counts[3]);
    println!("  skydome    {:8}", counts[4]);
    println!("  sub-face   {:8}", counts[5]);
    println!("portals      {:8}", world.portals.len());
    println!("bsp nodes    {:8}", world.nodes.len());
    println!("triangles    {:8}", world.mesh_indices.len() / 3);
    println!("casters      {:8}", world.num_shadow_casters());
    println!("has sky      {:>8}", world.has_sky);
    println!(
        "bounds       {:?} .. {:?}",
        world.bounds.mins, world.bounds.maxs
    );
    if let Some(ref kind) = world.truncated_by {
        println!("truncated    {}", kind);
    }
}

fn find_worlds(directory: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(directory).chain_err(|| ErrorKind::list_directory(directory))?;
    for entry in entries {
        let path = entry
            .chain_err(|| ErrorKind::list_directory(directory))?
            .path();
        if path.is_dir() {
            find_worlds(&path, found)?;
        } else if path
            .extension()
            .map_or(false, |extension| extension.eq_ignore_ascii_case("bw"))
        {
            found.push(path);
        }
    }
    Ok(())
}

fn check(directory: &Path, config: &WorldConfig) -> Result<()> {
    let mut paths = Vec::new();
    find_worlds(directory, &mut paths)?;
    paths.sort();

    info!("Loading {} worlds...", paths.len());
    let t0 = time::precise_time_s();
    let mut failures = 0;
    for path in &paths {
        let t_world = time::precise_time_s();
        match World::load(path, config) {
            Ok(world) => println!(
                "{:8.4}s {:6} sectors {:8} triangles {}{}",
                time::precise_time_s() - t_world,
                world.sectors.len(),
                world.mesh_indices.len() / 3,
                path.display(),
                if world.truncated_by.is_some() {
                    " (truncated)"
                } else {
                    ""
                }
            ),
            Err(e) => {
                failures += 1;
                error!("Reading world {:?} failed: {}", path, e);
            }
        }
    }
    info!(
        "Done loading {} worlds ({} failed) in {:.4}s.",
        paths.len(),
        failures,
        time::precise_time_s() - t0
    );
    if failures > 0 {
        return Err(ErrorKind::CheckFailed {
            failed: failures,
            total: paths.len(),
        }
        .into());
    }
    Ok(())
}

fn run() -> Result<()> {
    env_logger::init();

    let Options { mode, config } = Options::from_args()?;
    match mode {
        RunMode::Inspect(path) => {
            let world = World::load(&path, &config).chain_err(|| ErrorKind::load(&path))?;
            print_statistics(&world);
        }
        RunMode::Level(path) => {
            let level = Level::from_file(&path).chain_err(|| ErrorKind::load(&path))?;
            for bitmaps in &level.bitmaps {
                println!("bitmaps      {}", bitmaps.display());
            }
            println!("dome         {}", level.dome.display());
            let world = level
                .load_world(&config)
                .chain_err(|| ErrorKind::load(&path))?;
            print_statistics(&world);
        }
        RunMode::Check(directory) => check(&directory, &config)?,
    }
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {}", report(&error));
        process::exit(1);
    }
}
