use std::{collections::VecDeque, fmt::Display};

use log::debug;
use serde::Serialize;

use crate::error::{GridError, PlanError, StartError};
use crate::grid::{Cell, CellStorage, Direction, GridMap, Point};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + 'static {}

impl NodeReference for Point {}

/// Per-node storage created by a map, see [`GridMap::create_storage`]
pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// Distance of a cell from the goal, in steps.
///
/// Unlike the integer encoding used by level files, an unreached cell can
/// never be confused with the goal itself.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Distance {
    Wall,
    #[default]
    Unreached,
    Steps(usize),
}

impl Distance {
    pub fn steps(&self) -> Option<usize> {
        match self {
            Distance::Steps(d) => Some(*d),
            _ => None,
        }
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distance::Wall => write!(f, "{:>4}", "#"),
            Distance::Unreached => write!(f, "{:>4}", "."),
            Distance::Steps(d) => write!(f, "{:4}", d),
        }
    }
}

/// The value map produced by the flood fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    distances: CellStorage<Distance>,
    goal: Point,
    rows: usize,
    columns: usize,
}

impl DistanceField {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn is_valid(&self, point: Point) -> bool {
        self.distances.is_valid(point)
    }

    pub fn get(&self, point: Point) -> Distance {
        self.distances.get(point)
    }

    /// The goal is known by its position, never by its distance value.
    pub fn is_goal(&self, point: Point) -> bool {
        point == self.goal
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the in-bounds neighbors of `point` in [`Direction::ALL`] order.
    fn neighbors_of(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::ALL
            .iter()
            .filter_map(move |d| point.step(*d))
            .filter(move |p| self.is_valid(*p))
    }

    /// The neighbor with the strictly smallest distance, first one wins on
    /// ties. Walls and unreached cells are never chosen.
    fn descend(&self, point: Point) -> Option<Point> {
        let mut best: Option<(usize, Point)> = None;
        for neighbor in self.neighbors_of(point) {
            if let Distance::Steps(d) = self.get(neighbor) {
                if best.map_or(true, |(min, _)| d < min) {
                    best = Some((d, neighbor));
                }
            }
        }
        best.map(|(_, p)| p)
    }

    /// The integer encoding of the value map: unreached cells are 0, walls
    /// are -1 and every other cell holds its distance.
    pub fn to_legacy_values(&self) -> Vec<Vec<i64>> {
        self.distances
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|d| match d {
                        Distance::Wall => -1,
                        Distance::Unreached => 0,
                        Distance::Steps(d) => *d as i64,
                    })
                    .collect()
            })
            .collect()
    }
}

impl Display for DistanceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.distances.rows() {
            let line: Vec<String> = row.iter().map(|d| d.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// A cell as it was finalized by the flood fill
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VisitedItem {
    pub point: Point,
    pub distance: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloodFill {
    pub field: DistanceField,
    /// Every reached cell in the order it was expanded, starting with the goal.
    pub visit_order: Vec<VisitedItem>,
}

/// Breadth-first flood fill from the goal over the 8-connected grid.
///
/// Fails before doing any work if the map is not rectangular or does not have
/// exactly one goal.
pub fn compute_distance_field(map: &GridMap) -> Result<FloodFill, GridError> {
    map.check_shape()?;
    let goal = map.goal()?;

    let mut distances: CellStorage<Distance> = map.create_storage();
    for point in map.points() {
        if map.get(point).is_wall() {
            *distances.get_mut(point) = Distance::Wall;
        }
    }

    let mut visited: CellStorage<bool> = map.create_storage();
    let mut visit_order = Vec::new();
    let mut queue = VecDeque::from([(goal, 0)]);

    *visited.get_mut(goal) = true;
    *distances.get_mut(goal) = Distance::Steps(0);

    while let Some((current, distance)) = queue.pop_front() {
        visit_order.push(VisitedItem {
            point: current,
            distance,
        });

        for neighbor in map.neighbors_of(current) {
            if map.get(neighbor) != Cell::Empty || visited.get(neighbor) {
                continue;
            }
            *visited.get_mut(neighbor) = true;
            *distances.get_mut(neighbor) = Distance::Steps(distance + 1);
            queue.push_back((neighbor, distance + 1));
        }
    }

    debug!(
        "flood fill from {} reached {} of {} cells, max distance {}",
        goal,
        visit_order.len(),
        map.len(),
        visit_order.last().map_or(0, |v| v.distance)
    );

    Ok(FloodFill {
        field: DistanceField {
            distances,
            goal,
            rows: map.rows,
            columns: map.columns,
        },
        visit_order,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceOutcome {
    /// The trajectory ends on the goal.
    Reached,
    /// No neighbor leads towards the goal, the start is cut off from it.
    DeadEnd,
    /// The tracer took as many steps as there are cells without reaching the
    /// goal. Only happens on a malformed distance field.
    StepBudgetExhausted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trajectory {
    /// From the start to the last cell reached, both included
    pub cells: Vec<Point>,
    pub outcome: TraceOutcome,
}

impl Trajectory {
    pub fn reached_goal(&self) -> bool {
        self.outcome == TraceOutcome::Reached
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.cells.last().copied()
    }

    /// The direction of every step along the trajectory
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.cells
            .windows(2)
            .filter_map(|w| Direction::between(w[0], w[1]))
    }
}

fn check_start(
    start: Point,
    in_bounds: bool,
    on_wall: impl FnOnce() -> bool,
) -> Result<(), StartError> {
    if !in_bounds {
        return Err(StartError::OutOfBounds(start));
    }
    if on_wall() {
        return Err(StartError::OnWall(start));
    }
    Ok(())
}

/// Follows the distance field downhill from `start` to the goal.
///
/// A start that cannot reach the goal is not an error: the returned
/// trajectory then has a [`TraceOutcome`] other than `Reached` and ends on the
/// last cell the tracer could get to.
///
/// The dead-end cell appears once, as the final cell. Older tooling emitted
/// it twice (`[.., c, c]`), so compare against its output with that in mind.
pub fn trace_path(field: &DistanceField, start: Point) -> Result<Trajectory, StartError> {
    check_start(start, field.is_valid(start), || {
        field.get(start) == Distance::Wall
    })?;

    let budget = field.len();
    let mut cells = Vec::new();
    let mut current = start;
    let mut steps = 0;

    let outcome = loop {
        if field.is_goal(current) {
            break TraceOutcome::Reached;
        }
        if steps >= budget {
            break TraceOutcome::StepBudgetExhausted;
        }
        match field.descend(current) {
            Some(next) => {
                cells.push(current);
                current = next;
                steps += 1;
            }
            None => break TraceOutcome::DeadEnd,
        }
    };
    cells.push(current);

    debug!(
        "traced {} cells from {} to {} ({:?})",
        cells.len(),
        start,
        current,
        outcome
    );

    Ok(Trajectory { cells, outcome })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub flood: FloodFill,
    pub trajectory: Trajectory,
}

/// Runs the flood fill and traces the path from `start`.
///
/// Both the map and the start are checked before the flood fill begins.
pub fn plan(map: &GridMap, start: Point) -> Result<Plan, PlanError> {
    map.check_shape()?;
    check_start(start, map.is_valid(start), || map.get(start).is_wall())?;

    let flood = compute_distance_field(map)?;
    let trajectory = trace_path(&flood.field, start)?;

    Ok(Plan { flood, trajectory })
}
