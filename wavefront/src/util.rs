use std::{fs, path::Path};

use anyhow::Context;
use image::{DynamicImage, GenericImageView};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Cell, GridMap};

/// Reads an obstacle map from an image: dark pixels are walls, strongly red
/// pixels mark the goal and everything else is free space.
pub fn parse_img(img: &DynamicImage) -> Result<GridMap, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut cells = vec![vec![Cell::Empty; width]; height];

    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            let [r, g, b, _] = img.get_pixel(col as u32, row as u32).0;

            *cell = if r < 128 {
                Cell::Wall
            } else if g < 64 && b < 64 {
                Cell::Goal
            } else {
                Cell::Empty
            }
        }
    }

    Ok(GridMap::from_cells(cells)?)
}

/// A level as stored on disk: a name and a matrix of cell codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: Option<String>,
    pub map: Vec<Vec<u8>>,
}

impl Level {
    pub fn into_map(self) -> Result<GridMap, anyhow::Error> {
        let name = self.name.unwrap_or_default();
        GridMap::from_codes(self.map).with_context(|| format!("invalid level '{name}'"))
    }
}

pub fn parse_level_json(json: &str) -> Result<Level, anyhow::Error> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a map from a `.json` level file or from any image format the
/// `image` crate understands.
pub fn load_level(path: impl AsRef<Path>) -> Result<(String, GridMap), anyhow::Error> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let (name, map) = if is_json {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?;
        let level = parse_level_json(&json)
            .with_context(|| format!("failed to parse level {}", path.display()))?;
        let name = level
            .name
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        (name, level.into_map()?)
    } else {
        let img = image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?;
        (path.display().to_string(), parse_img(&img)?)
    };

    debug!("loaded level '{}' ({}x{})", name, map.columns, map.rows);
    Ok((name, map))
}

/// The built-in demonstration level.
pub fn mini_maze() -> Level {
    let map = vec![
        vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        vec![1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 2, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1],
        vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];
    Level {
        name: Some("mini".to_owned()),
        map,
    }
}
