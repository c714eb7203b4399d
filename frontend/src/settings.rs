use std::{fs, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// We derive Deserialize/Serialize so the settings can be kept in a json file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old files
pub struct Settings {
    /// Play back the flood fill and the path frame by frame
    pub animate: bool,
    pub frame_delay_ms: u64,
    pub cells_per_frame: usize,
    /// Used instead of `cells_per_frame` on maps with more than `large_map_cells` cells
    pub cells_per_frame_large: usize,
    pub large_map_cells: usize,
    /// Maps with more cells than this are summarized instead of drawn
    pub max_render_cells: usize,
    pub show_value_map: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animate: false,
            frame_delay_ms: 16,
            cells_per_frame: 10,
            cells_per_frame_large: 500,
            large_map_cells: 5000,
            max_render_cells: 10_000,
            show_value_map: true,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("failed to parse settings {}", path.display()))
    }

    /// How many flood fill cells to reveal per frame, larger maps go faster
    pub fn flood_speed(&self, total_cells: usize) -> usize {
        let speed = if total_cells > self.large_map_cells {
            self.cells_per_frame_large
        } else {
            self.cells_per_frame
        };
        speed.max(1)
    }

    pub fn can_render(&self, total_cells: usize) -> bool {
        total_cells <= self.max_render_cells
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"animate": true}"#).unwrap();
        assert!(settings.animate);
        assert_eq!(settings.cells_per_frame, 10);
        assert_eq!(settings.max_render_cells, 10_000);
    }

    #[test]
    fn test_flood_speed() {
        let settings = Settings::default();
        assert_eq!(settings.flood_speed(14 * 20), 10);
        assert_eq!(settings.flood_speed(5000), 10);
        assert_eq!(settings.flood_speed(5001), 500);

        let settings = Settings {
            cells_per_frame: 0,
            ..Settings::default()
        };
        assert_eq!(settings.flood_speed(1), 1);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Settings::load("no/such/settings.json").is_err());
    }
}
