use std::path::PathBuf;

use anyhow::{anyhow, bail};
use wavefront::Point;

use crate::wizard::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ButtonPressed(ButtonId),
    /// A cell was picked, what it means depends on the wizard phase
    CellSelected(Point),
    /// One of the phase indicators was clicked
    PhaseSelected(Phase),
    LoadLevel(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Run,
    Reset,
    Show,
    Help,
    Quit,
}

impl ButtonId {
    /// The command word that presses the button
    pub fn id_str(&self) -> &str {
        match self {
            ButtonId::Run => "run",
            ButtonId::Reset => "reset",
            ButtonId::Show => "show",
            ButtonId::Help => "help",
            ButtonId::Quit => "quit",
        }
    }

    /// iterates over all button ids
    pub fn iterate() -> impl Iterator<Item = ButtonId> {
        [
            ButtonId::Run,
            ButtonId::Reset,
            ButtonId::Show,
            ButtonId::Help,
            ButtonId::Quit,
        ]
        .iter()
        .copied()
    }

    pub fn from_key_code(key: &str) -> Option<ButtonId> {
        match key {
            "r" => Some(ButtonId::Run),
            "x" => Some(ButtonId::Reset),
            "s" => Some(ButtonId::Show),
            "h" | "?" => Some(ButtonId::Help),
            "q" => Some(ButtonId::Quit),
            _ => None,
        }
    }
}

impl Event {
    /// Parses one line of console input.
    ///
    /// `select ROW COL` (or `ROW,COL`), `phase N`, `load PATH` and the button
    /// words or their single key shortcuts.
    pub fn parse(line: &str) -> Result<Event, anyhow::Error> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let rest: Vec<&str> = words.collect();

        if let Some(button) = ButtonId::iterate()
            .find(|b| b.id_str() == command)
            .or_else(|| ButtonId::from_key_code(command))
        {
            return Ok(Event::ButtonPressed(button));
        }

        match (command, rest.as_slice()) {
            ("select", [row, col]) => Ok(Event::CellSelected(Point::new(
                row.parse()?,
                col.parse()?,
            ))),
            ("select", [point]) => Ok(Event::CellSelected(point.parse()?)),
            ("phase", [n]) => {
                let phase = Phase::from_number(n.parse()?)
                    .ok_or_else(|| anyhow!("there is no phase {}", n))?;
                Ok(Event::PhaseSelected(phase))
            }
            ("load", [path]) => Ok(Event::LoadLevel(PathBuf::from(path))),
            _ => bail!("unknown command: {}", line.trim()),
        }
    }
}

pub const HELP: &str = "\
commands:
  select ROW COL   pick the start, then the destination
  phase 1|2        go back to selecting the start or the destination
  run (r)          flood the map and trace the path
  reset (x)        forget start and destination
  show (s)         draw the map
  load PATH        load a .json level or an image
  help (h)         this text
  quit (q)";
