use std::fmt::Display;

use wavefront::{Cell, DistanceField, GridMap, Point, VisitedItem};

/// A character per cell, drawn on incrementally while playing back a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    pub fn from_map(map: &GridMap) -> Self {
        let cells = map
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => '.',
                        Cell::Wall => '#',
                        Cell::Goal => 'G',
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn draw_cell(&mut self, point: Point, c: char) {
        if let Some(cell) = self
            .cells
            .get_mut(point.row)
            .and_then(|row| row.get_mut(point.col))
        {
            *cell = c;
        }
    }

    /// Draws flood fill cells as the last digit of their distance, the goal
    /// keeps its own marker.
    pub fn draw_flood(&mut self, items: &[VisitedItem]) {
        for item in items {
            if item.distance == 0 {
                continue;
            }
            let digit = char::from_digit((item.distance % 10) as u32, 10).unwrap_or('?');
            self.draw_cell(item.point, digit);
        }
    }

    pub fn draw_path(&mut self, path: &[Point]) {
        for point in path {
            let current = self.cells.get(point.row).and_then(|row| row.get(point.col));
            if current != Some(&'G') {
                self.draw_cell(*point, '*');
            }
        }
    }
}

impl Display for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            writeln!(f, "{}", row.iter().collect::<String>())?;
        }
        Ok(())
    }
}

/// Draws the map with the start, the goal and an optional path on top.
pub fn render_map(map: &GridMap, start: Option<Point>, path: &[Point]) -> String {
    let mut canvas = Canvas::from_map(map);
    canvas.draw_path(path);
    if let Some(start) = start {
        canvas.draw_cell(start, 'S');
    }
    canvas.to_string()
}

/// The value map as a table, or a one line summary when it is too big to read.
pub fn render_value_map(field: &DistanceField, max_cells: usize) -> String {
    if field.len() > max_cells {
        return format!(
            "value map of {}x{} cells not shown\n",
            field.columns(),
            field.rows()
        );
    }
    field.to_string()
}
