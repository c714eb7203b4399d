//! The three phase selection flow: pick a start, pick a destination, run.

use log::debug;
use thiserror::Error;
use wavefront::{Cell, GridMap, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    SelectStart = 1,
    SelectGoal = 2,
    Ready = 3,
}

impl Phase {
    pub fn from_number(n: u8) -> Option<Phase> {
        match n {
            1 => Some(Phase::SelectStart),
            2 => Some(Phase::SelectGoal),
            3 => Some(Phase::Ready),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Phase::SelectStart => "SELECT START",
            Phase::SelectGoal => "SELECT DESTINATION",
            Phase::Ready => "READY TO INITIATE",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardError {
    #[error("{0} is outside of the map")]
    OutOfBounds(Point),
    #[error("cannot select {0}, it is a wall")]
    OnWall(Point),
    /// Run was requested before both start and goal were selected
    #[error("start and destination must both be selected")]
    Incomplete,
}

/// What a selection did, so the caller can report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Start(Point),
    Goal(Point),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    phase: Phase,
    start: Option<Point>,
    goal: Option<Point>,
}

impl Wizard {
    /// Starts in the first phase, keeping a goal that the level already has.
    pub fn new(map: &GridMap) -> Self {
        Self {
            phase: Phase::SelectStart,
            start: None,
            goal: map.goal().ok(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Selects a cell: the start in the first phase, the goal afterwards.
    /// Moving the goal rewrites the goal cell of `map`.
    pub fn select(&mut self, map: &mut GridMap, point: Point) -> Result<Selection, WizardError> {
        if !map.is_valid(point) {
            return Err(WizardError::OutOfBounds(point));
        }
        if map.get(point) == Cell::Wall {
            return Err(WizardError::OnWall(point));
        }

        let selection = match self.phase {
            Phase::SelectStart => {
                self.start = Some(point);
                self.phase = Phase::SelectGoal;
                Selection::Start(point)
            }
            Phase::SelectGoal | Phase::Ready => {
                map.set_goal(point)
                    .map_err(|_| WizardError::OnWall(point))?;
                self.goal = Some(point);
                self.phase = Phase::Ready;
                Selection::Goal(point)
            }
        };
        debug!("{:?} -> phase {:?}", selection, self.phase);
        Ok(selection)
    }

    /// Goes back to an earlier phase, undoing every selection made since.
    /// Returns false if there was nothing to undo.
    pub fn rollback(&mut self, map: &mut GridMap, target: Phase) -> bool {
        if target >= self.phase {
            return false;
        }
        match target {
            Phase::SelectStart => self.reset(map),
            Phase::SelectGoal => {
                map.clear_goal();
                self.goal = None;
                self.phase = Phase::SelectGoal;
            }
            Phase::Ready => return false,
        }
        true
    }

    /// Forgets the start and the goal, also removing the goal from `map`.
    pub fn reset(&mut self, map: &mut GridMap) {
        map.clear_goal();
        self.start = None;
        self.goal = None;
        self.phase = Phase::SelectStart;
    }

    /// The start and goal to plan with, once both are selected.
    pub fn ready(&self) -> Result<(Point, Point), WizardError> {
        match (self.phase, self.start, self.goal) {
            (Phase::Ready, Some(start), Some(goal)) => Ok((start, goal)),
            _ => Err(WizardError::Incomplete),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use wavefront::util::mini_maze;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn test_full_flow() {
        let mut map = mini_maze().into_map().unwrap();
        let mut wizard = Wizard::new(&map);
        assert_eq!(wizard.phase(), Phase::SelectStart);
        assert_eq!(wizard.goal(), Some(p(2, 17)));
        assert_eq!(wizard.ready(), Err(WizardError::Incomplete));

        assert_eq!(wizard.select(&mut map, p(12, 1)), Ok(Selection::Start(p(12, 1))));
        assert_eq!(wizard.phase(), Phase::SelectGoal);
        // the level goal is known but still has to be confirmed
        assert_eq!(wizard.ready(), Err(WizardError::Incomplete));

        assert_eq!(wizard.select(&mut map, p(1, 1)), Ok(Selection::Goal(p(1, 1))));
        assert_eq!(wizard.phase(), Phase::Ready);
        assert_eq!(map.goal(), Ok(p(1, 1)));
        assert_eq!(wizard.ready(), Ok((p(12, 1), p(1, 1))));

        // selecting again in the last phase moves the goal
        wizard.select(&mut map, p(3, 3)).unwrap();
        assert_eq!(map.goal(), Ok(p(3, 3)));
        assert_eq!(wizard.ready(), Ok((p(12, 1), p(3, 3))));
    }

    #[test]
    fn test_walls_are_rejected() {
        let mut map = mini_maze().into_map().unwrap();
        let mut wizard = Wizard::new(&map);
        assert_eq!(
            wizard.select(&mut map, p(0, 0)),
            Err(WizardError::OnWall(p(0, 0)))
        );
        assert_eq!(
            wizard.select(&mut map, p(20, 0)),
            Err(WizardError::OutOfBounds(p(20, 0)))
        );
        assert_eq!(wizard.phase(), Phase::SelectStart);
    }

    #[test]
    fn test_rollback_to_goal_keeps_start() {
        let mut map = mini_maze().into_map().unwrap();
        let mut wizard = Wizard::new(&map);
        wizard.select(&mut map, p(12, 1)).unwrap();
        wizard.select(&mut map, p(1, 1)).unwrap();

        assert!(wizard.rollback(&mut map, Phase::SelectGoal));
        assert_eq!(wizard.phase(), Phase::SelectGoal);
        assert_eq!(wizard.start(), Some(p(12, 1)));
        assert_eq!(wizard.goal(), None);
        assert!(map.goal().is_err());

        // already there
        assert!(!wizard.rollback(&mut map, Phase::SelectGoal));
        assert!(!wizard.rollback(&mut map, Phase::Ready));
    }

    #[test]
    fn test_rollback_to_start_resets() {
        let mut map = mini_maze().into_map().unwrap();
        let mut wizard = Wizard::new(&map);
        wizard.select(&mut map, p(12, 1)).unwrap();

        assert!(wizard.rollback(&mut map, Phase::SelectStart));
        assert_eq!(wizard.phase(), Phase::SelectStart);
        assert_eq!(wizard.start(), None);
        assert_eq!(wizard.goal(), None);
        assert!(map.goal().is_err());
    }

    #[test]
    fn test_phase_numbers() {
        assert_eq!(Phase::from_number(2), Some(Phase::SelectGoal));
        assert_eq!(Phase::from_number(4), None);
        assert!(Phase::SelectStart < Phase::Ready);
    }
}
