use std::collections::HashSet;

use proptest::prelude::*;
use wavefront::{compute_distance_field, trace_path, Cell, Distance, GridMap, Point, StartError};

/// Random maps up to 12x12 with roughly a third of the cells walled and the
/// goal placed anywhere.
fn arb_map() -> impl Strategy<Value = GridMap> {
    (1usize..12, 1usize..12)
        .prop_flat_map(|(rows, columns)| {
            (
                prop::collection::vec(
                    prop::collection::vec(prop::bool::weighted(0.3), columns),
                    rows,
                ),
                0..rows,
                0..columns,
            )
        })
        .prop_map(|(walls, goal_row, goal_col)| {
            let cells = walls
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|wall| if wall { Cell::Wall } else { Cell::Empty })
                        .collect()
                })
                .collect();
            let mut map = GridMap::from_cells(cells).unwrap();
            map.set(Point::new(goal_row, goal_col), Cell::Empty);
            map.set_goal(Point::new(goal_row, goal_col)).unwrap();
            map
        })
}

/// Cells reachable from the goal, found with a plain depth-first search.
fn reachable(map: &GridMap) -> HashSet<Point> {
    let goal = map.goal().unwrap();
    let mut seen = HashSet::from([goal]);
    let mut stack = vec![goal];
    while let Some(current) = stack.pop() {
        for n in map.neighbors_of(current) {
            if map.get(n) == Cell::Empty && seen.insert(n) {
                stack.push(n);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn flood_fill_is_deterministic(map in arb_map()) {
        let a = compute_distance_field(&map).unwrap();
        let b = compute_distance_field(&map).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn goal_comes_first(map in arb_map()) {
        let flood = compute_distance_field(&map).unwrap();
        let goal = map.goal().unwrap();
        prop_assert_eq!(flood.visit_order[0].point, goal);
        prop_assert_eq!(flood.visit_order[0].distance, 0);
        prop_assert_eq!(flood.field.get(goal), Distance::Steps(0));
    }

    #[test]
    fn distances_are_layered(map in arb_map()) {
        let flood = compute_distance_field(&map).unwrap();
        for point in map.points() {
            let Distance::Steps(d) = flood.field.get(point) else { continue };
            if d == 0 {
                continue;
            }
            let around: Vec<usize> = map
                .neighbors_of(point)
                .filter_map(|n| flood.field.get(n).steps())
                .collect();
            prop_assert!(around.contains(&(d - 1)));
            prop_assert!(around.iter().all(|&n| n + 1 >= d));
        }
    }

    #[test]
    fn visit_order_is_non_decreasing(map in arb_map()) {
        let flood = compute_distance_field(&map).unwrap();
        for w in flood.visit_order.windows(2) {
            prop_assert!(w[0].distance <= w[1].distance);
        }
    }

    #[test]
    fn flood_fill_is_complete(map in arb_map()) {
        let flood = compute_distance_field(&map).unwrap();
        let reached = reachable(&map);
        let visited: HashSet<Point> = flood.visit_order.iter().map(|v| v.point).collect();

        prop_assert_eq!(flood.visit_order.len(), visited.len());
        prop_assert_eq!(&visited, &reached);
        for point in map.points() {
            let expected_unreached = !reached.contains(&point) && map.get(point) == Cell::Empty;
            prop_assert_eq!(flood.field.get(point) == Distance::Unreached, expected_unreached);
        }
    }

    #[test]
    fn trajectories_descend_to_goal(map in arb_map()) {
        let flood = compute_distance_field(&map).unwrap();
        let goal = map.goal().unwrap();

        for start in map.points() {
            let result = trace_path(&flood.field, start);
            if map.get(start) == Cell::Wall {
                prop_assert_eq!(result, Err(StartError::OnWall(start)));
                continue;
            }
            let trajectory = result.unwrap();
            prop_assert_eq!(trajectory.start(), Some(start));

            match flood.field.get(start) {
                Distance::Steps(d) => {
                    prop_assert!(trajectory.reached_goal());
                    prop_assert_eq!(trajectory.end(), Some(goal));
                    prop_assert_eq!(trajectory.len(), d + 1);
                    for w in trajectory.cells.windows(2) {
                        prop_assert!(w[0].is_adjacent(&w[1]));
                        prop_assert!(flood.field.get(w[1]).steps() < flood.field.get(w[0]).steps());
                    }
                }
                _ => {
                    prop_assert!(!trajectory.reached_goal());
                    prop_assert_ne!(map.get(trajectory.end().unwrap()), Cell::Goal);
                }
            }
        }
    }
}
