use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use wavefront::{plan, util, Cell, Point};

/// Plans a path to the goal of a level and prints the value map and trajectory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level file (.json or an image), or "mini" for the built-in maze
    level: PathBuf,

    /// Start cell as ROW,COL
    start: Point,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = Args::parse();

    let (name, map) = if args.level.as_os_str() == "mini" {
        ("mini".to_owned(), util::mini_maze().into_map()?)
    } else {
        util::load_level(&args.level)?
    };
    let mut start = args.start;

    // a start on a wall is moved to a free neighbor instead of failing
    if map.is_valid(start) && map.get(start) == Cell::Wall {
        if let Some(walkable) = map.adjacent_walkable(start) {
            warn!("start {} is on a wall, using {} instead", start, walkable);
            start = walkable;
        }
    }

    info!("planning on '{}' ({}x{}) from {}", name, map.columns, map.rows, start);
    let plan = plan(&map, start)?;

    if args.json {
        let report = serde_json::json!({
            "level": name,
            "map": map.to_codes(),
            "value_map": plan.flood.field.to_legacy_values(),
            "visit_order": plan.flood.visit_order,
            "trajectory": plan.trajectory,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{} Value Map {}", "=".repeat(50), "=".repeat(50));
    print!("{}", plan.flood.field);

    println!("\n{} Trajectory {}", "=".repeat(50), "=".repeat(50));
    for (i, step) in plan.trajectory.cells.iter().enumerate() {
        println!("Step {}: {}", i + 1, step);
    }
    if !plan.trajectory.reached_goal() {
        warn!("no path found ({:?})", plan.trajectory.outcome);
    }

    Ok(())
}
