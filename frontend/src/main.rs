use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::Parser;
use log::{error, warn};
use wavefront::{util, Cell, GridMap, Point};

use app::App;
use context::Context;
use event::{ButtonId, Event};
use settings::Settings;

mod app;
mod context;
mod event;
mod playback;
mod render;
mod settings;
mod wizard;

/// Console front end for the wavefront planner.
///
/// Without --start it reads wizard commands from stdin, type help for a list.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Level file (.json or an image), the built-in maze when left out
    level: Option<PathBuf>,

    /// Plan once from this cell (ROW,COL) instead of reading commands
    #[arg(long)]
    start: Option<Point>,

    /// Destination for --start, defaults to the goal of the level
    #[arg(long, requires = "start")]
    goal: Option<Point>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Play back the flood fill and the path frame by frame
    #[arg(long)]
    animate: bool,
}

/// A start on a wall is moved next to it, the way large obstacle maps are
/// usually clicked slightly off.
fn walkable_start(map: &GridMap, start: Point) -> Point {
    if map.is_valid(start) && map.get(start) == Cell::Wall {
        if let Some(walkable) = map.adjacent_walkable(start) {
            warn!("start {} is on a wall, using {} instead", start, walkable);
            return walkable;
        }
    }
    start
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.animate |= args.animate;

    let (name, map) = match &args.level {
        Some(path) => util::load_level(path)?,
        None => ("mini".to_owned(), util::mini_maze().into_map()?),
    };

    let stdout = io::stdout();
    let mut context = Context::new(stdout.lock());

    // batch mode: go through the wizard once with the given cells
    if let Some(start) = args.start {
        let start = walkable_start(&map, start);
        let goal = match args.goal {
            Some(goal) => goal,
            None => map.goal().context("the level has no goal, pass --goal")?,
        };

        let mut app = App::new(name, map, settings);
        app.announce(&mut context);
        app.preselect(start, goal, &mut context)
            .with_context(|| format!("cannot plan from {} to {}", start, goal))?;
        context.push_event(Event::ButtonPressed(ButtonId::Run));
        app.process_events(&mut context);
        return match app.last_run() {
            Some(stats) if stats.reached_goal => Ok(()),
            Some(_) => Err(anyhow!("no path from {} to {}", start, goal)),
            None => Err(anyhow!("planning failed, see the messages above")),
        };
    }

    let mut app = App::new(name, map, settings);
    app.announce(&mut context);
    context.log("SYSTEM READY. WAITING FOR INPUT. (type help)");

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Event::parse(&line) {
            Ok(event) => context.push_event(event),
            Err(e) => {
                error!("{:#}", e);
                context.log_error(&e.to_string());
                continue;
            }
        }
        app.process_events(&mut context);
        if context.is_quit_requested() {
            break;
        }
    }

    Ok(())
}
