use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use wavefront::{plan, util::load_level, GridMap, Plan, Point};

use crate::context::Context;
use crate::event::{ButtonId, Event, HELP};
use crate::playback::Playback;
use crate::render::{render_map, render_value_map, Canvas};
use crate::settings::Settings;
use crate::wizard::{Phase, Selection, Wizard, WizardError};

/// Figures from the last run
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub elapsed: Duration,
    pub cells_flooded: usize,
    pub trajectory_len: usize,
    pub reached_goal: bool,
}

pub struct App {
    level_name: String,
    map: GridMap,
    wizard: Wizard,
    settings: Settings,
    last_run: Option<RunStats>,
}

impl App {
    pub fn new(level_name: String, map: GridMap, settings: Settings) -> Self {
        let wizard = Wizard::new(&map);
        Self {
            level_name,
            map,
            wizard,
            settings,
            last_run: None,
        }
    }

    pub fn last_run(&self) -> Option<&RunStats> {
        self.last_run.as_ref()
    }

    /// Greets the user with the level and the first phase
    pub fn announce<W: Write>(&self, context: &mut Context<W>) {
        context.log(&format!(
            "SECTOR LOADED: {} ({} x {})",
            self.level_name, self.map.columns, self.map.rows
        ));
        if let Some(goal) = self.wizard.goal() {
            context.log(&format!("TARGET DETECTED AT {}", goal));
        }
        context.log(self.wizard.phase().status());
    }

    /// Handles every pending event, stopping early if a quit was requested.
    pub fn process_events<W: Write>(&mut self, context: &mut Context<W>) {
        while let Some(event) = context.pop_event() {
            self.handle_event(event, context);
            if context.is_quit_requested() {
                break;
            }
        }
    }

    fn handle_event<W: Write>(&mut self, event: Event, context: &mut Context<W>) {
        debug!("event: {:?}", event);
        match event {
            Event::ButtonPressed(ButtonId::Quit) => context.request_quit(),
            Event::ButtonPressed(ButtonId::Help) => context.print(HELP),
            Event::ButtonPressed(ButtonId::Show) => {
                if self.settings.can_render(self.map.len()) {
                    context.print(&render_map(&self.map, self.wizard.start(), &[]));
                } else {
                    context.log(&format!(
                        "MAP OF {} x {} CELLS TOO LARGE TO DRAW",
                        self.map.columns, self.map.rows
                    ));
                }
            }
            Event::ButtonPressed(ButtonId::Reset) => {
                self.wizard.reset(&mut self.map);
                self.last_run = None;
                context.log("SYSTEM RESET TO INITIAL STATE");
                context.log(self.wizard.phase().status());
            }
            Event::ButtonPressed(ButtonId::Run) => self.run_simulation(context),
            Event::CellSelected(point) => {
                // rejections are reported on the console, the phase stays put
                let _ = self.select(point, context);
            }
            Event::PhaseSelected(phase) => {
                if self.wizard.rollback(&mut self.map, phase) {
                    match phase {
                        Phase::SelectStart => context.log("ROLLBACK: SYSTEM RESET TO INITIAL STATE"),
                        _ => context.log("ROLLBACK: DESTINATION CLEARED"),
                    }
                    self.last_run = None;
                }
                context.log(self.wizard.phase().status());
            }
            Event::LoadLevel(path) => self.load(&path, context),
        }
    }

    /// Selects the start and then the goal, stopping at the first cell the
    /// wizard rejects.
    pub fn preselect<W: Write>(
        &mut self,
        start: Point,
        goal: Point,
        context: &mut Context<W>,
    ) -> Result<(), WizardError> {
        self.select(start, context)?;
        self.select(goal, context)?;
        Ok(())
    }

    fn select<W: Write>(
        &mut self,
        point: Point,
        context: &mut Context<W>,
    ) -> Result<Selection, WizardError> {
        match self.wizard.select(&mut self.map, point) {
            Ok(selection) => {
                match selection {
                    Selection::Start(p) => context.log(&format!("INSERTION POINT SET: {}", p)),
                    Selection::Goal(p) => {
                        context.log(&format!("DESTINATION COORDINATES UPDATED: {}", p))
                    }
                }
                context.log(self.wizard.phase().status());
                Ok(selection)
            }
            Err(e) => {
                context.log_error(&e.to_string());
                Err(e)
            }
        }
    }

    fn load<W: Write>(&mut self, path: &Path, context: &mut Context<W>) {
        match load_level(path) {
            Ok((name, map)) => {
                *self = App::new(name, map, self.settings.clone());
                self.announce(context);
            }
            Err(e) => context.log_error(&format!("LOAD FAILED: {:#}", e)),
        }
    }

    fn run_simulation<W: Write>(&mut self, context: &mut Context<W>) {
        let (start, goal) = match self.wizard.ready() {
            Ok(selection) => selection,
            Err(_) => {
                context.log_error("INCOMPLETE DATA SET. CANNOT INITIATE.");
                return;
            }
        };

        context.log("INITIATING WAVEFRONT ALGORITHM...");
        let started = Instant::now();
        let plan = match plan(&self.map, start) {
            Ok(plan) => plan,
            Err(e) => {
                context.log_error(&format!("CRITICAL FAILURE: {}", e));
                return;
            }
        };
        let elapsed = started.elapsed();

        let stats = RunStats {
            elapsed,
            cells_flooded: plan.flood.visit_order.len(),
            trajectory_len: plan.trajectory.len(),
            reached_goal: plan.trajectory.reached_goal(),
        };
        info!(
            "planned {} -> {} in {:.2}ms, {} cells flooded",
            start,
            goal,
            elapsed.as_secs_f64() * 1000.0,
            stats.cells_flooded
        );
        context.log(&format!(
            "PATH CALCULATED IN {:.2}ms. LENGTH: {}",
            elapsed.as_secs_f64() * 1000.0,
            stats.trajectory_len
        ));

        if self.settings.can_render(self.map.len()) {
            if self.settings.animate {
                self.animate(&plan, start, context);
            } else {
                context.print(&render_map(&self.map, Some(start), &plan.trajectory.cells));
            }
        }
        if self.settings.show_value_map {
            context.print(&render_value_map(
                &plan.flood.field,
                self.settings.max_render_cells,
            ));
        }

        if stats.reached_goal {
            context.log("TARGET ACQUIRED. MISSION COMPLETE.");
        } else {
            warn!("no path from {} ({:?})", start, plan.trajectory.outcome);
            context.log_error(&format!(
                "NO PATH FOUND. STOPPED AT {}",
                plan.trajectory
                    .end()
                    .map_or_else(|| start.to_string(), |p| p.to_string())
            ));
        }
        self.last_run = Some(stats);
    }

    /// Plays back the flood fill and then the path, one frame at a time
    fn animate<W: Write>(&self, plan: &Plan, start: Point, context: &mut Context<W>) {
        let delay = Duration::from_millis(self.settings.frame_delay_ms);
        let mut canvas = Canvas::from_map(&self.map);

        let speed = self.settings.flood_speed(self.map.len());
        let flood = Playback::new(&plan.flood.visit_order, speed);
        debug!("flood playback: {} frames of {} cells", flood.frame_count(), speed);
        for frame in flood {
            canvas.draw_flood(frame);
            context.print(&canvas.to_string());
            thread::sleep(delay);
        }
        context.log("DATA MAP COMPLETE. TRACING PATH...");

        for step in Playback::new(&plan.trajectory.cells, 1) {
            canvas.draw_path(step);
            canvas.draw_cell(start, 'S');
            context.print(&canvas.to_string());
            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
impl App {
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use wavefront::util::mini_maze;

    fn create_app(settings: Settings) -> App {
        App::new("mini".to_owned(), mini_maze().into_map().unwrap(), settings)
    }

    fn output(context: Context<Vec<u8>>) -> String {
        String::from_utf8(context.into_output()).unwrap()
    }

    #[test]
    fn test_run_through_wizard() {
        let mut app = create_app(Settings::default());
        let mut context = Context::new(Vec::new());

        context.push_event(Event::CellSelected(Point::new(12, 1)));
        context.push_event(Event::CellSelected(Point::new(2, 17)));
        context.push_event(Event::ButtonPressed(ButtonId::Run));
        app.process_events(&mut context);

        let stats = app.last_run().unwrap();
        assert!(stats.reached_goal);
        assert!(stats.trajectory_len > 2);

        let text = output(context);
        assert!(text.contains("INSERTION POINT SET: (12, 1)"));
        assert!(text.contains("TARGET ACQUIRED"));
    }

    #[test]
    fn test_run_refused_without_goal() {
        let mut app = create_app(Settings::default());
        let mut context = Context::new(Vec::new());

        context.push_event(Event::CellSelected(Point::new(12, 1)));
        context.push_event(Event::ButtonPressed(ButtonId::Run));
        app.process_events(&mut context);

        assert!(app.last_run().is_none());
        assert!(output(context).contains("INCOMPLETE DATA SET"));
    }

    #[test]
    fn test_wall_selection_is_reported() {
        let mut app = create_app(Settings::default());
        let mut context = Context::new(Vec::new());

        context.push_event(Event::CellSelected(Point::new(0, 0)));
        app.process_events(&mut context);

        assert_eq!(app.wizard().phase(), Phase::SelectStart);
        assert!(output(context).contains("ERROR: cannot select (0, 0), it is a wall"));
    }

    #[test]
    fn test_no_path_is_reported() {
        // wall in the bottom left corner
        let mut map = mini_maze().into_map().unwrap();
        for point in [Point::new(11, 1), Point::new(11, 2), Point::new(12, 2)] {
            map.set(point, wavefront::Cell::Wall);
        }
        let mut app = App::new("boxed".to_owned(), map, Settings::default());
        let mut context = Context::new(Vec::new());

        context.push_event(Event::CellSelected(Point::new(12, 1)));
        context.push_event(Event::CellSelected(Point::new(2, 17)));
        context.push_event(Event::ButtonPressed(ButtonId::Run));
        app.process_events(&mut context);

        assert!(!app.last_run().unwrap().reached_goal);
        assert!(output(context).contains("NO PATH FOUND. STOPPED AT (12, 1)"));
    }

    #[test]
    fn test_animated_run() {
        let settings = Settings {
            animate: true,
            frame_delay_ms: 0,
            cells_per_frame: 50,
            show_value_map: false,
            ..Settings::default()
        };
        let mut app = create_app(settings);
        let mut context = Context::new(Vec::new());

        context.push_event(Event::CellSelected(Point::new(12, 1)));
        context.push_event(Event::CellSelected(Point::new(2, 17)));
        context.push_event(Event::ButtonPressed(ButtonId::Run));
        app.process_events(&mut context);

        let text = output(context);
        assert!(text.contains("DATA MAP COMPLETE"));
        assert!(text.contains("TARGET ACQUIRED"));
    }

    #[test]
    fn test_rollback_and_quit() {
        let mut app = create_app(Settings::default());
        let mut context = Context::new(Vec::new());

        context.push_event(Event::CellSelected(Point::new(12, 1)));
        context.push_event(Event::CellSelected(Point::new(2, 17)));
        context.push_event(Event::PhaseSelected(Phase::SelectGoal));
        context.push_event(Event::ButtonPressed(ButtonId::Quit));
        // never handled
        context.push_event(Event::ButtonPressed(ButtonId::Reset));
        app.process_events(&mut context);

        assert!(context.is_quit_requested());
        assert_eq!(app.wizard().phase(), Phase::SelectGoal);
        assert_eq!(app.wizard().start(), Some(Point::new(12, 1)));
        assert!(app.map().goal().is_err());
        assert!(output(context).contains("ROLLBACK: DESTINATION CLEARED"));
    }

    #[test]
    fn test_preselect_stops_on_rejected_start() {
        let mut app = create_app(Settings::default());
        let mut context = Context::new(Vec::new());

        // a wall start must not let the goal slip into the start slot
        assert_eq!(
            app.preselect(Point::new(0, 0), Point::new(2, 17), &mut context),
            Err(WizardError::OnWall(Point::new(0, 0)))
        );
        assert_eq!(app.wizard().phase(), Phase::SelectStart);
        assert_eq!(app.wizard().start(), None);

        assert_eq!(
            app.preselect(Point::new(12, 1), Point::new(2, 17), &mut context),
            Ok(())
        );
        assert_eq!(app.wizard().ready(), Ok((Point::new(12, 1), Point::new(2, 17))));
        assert!(output(context).contains("ERROR: cannot select (0, 0), it is a wall"));
    }

    #[test]
    fn test_failed_load_keeps_level() {
        let mut app = create_app(Settings::default());
        let mut context = Context::new(Vec::new());

        context.push_event(Event::LoadLevel("no/such/level.json".into()));
        app.process_events(&mut context);

        assert_eq!(app.map().rows, 14);
        assert!(output(context).contains("LOAD FAILED"));
    }
}
