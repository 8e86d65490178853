use std::str::FromStr;

use anyhow::{Context, bail};
use mineboard_core::{CellEvent, Coord, Coord2, PointerButton};

pub const HELP: &str = "\
commands:
  r ROW COL          reveal a cell
  f ROW COL          toggle a flag
  c X Y [left|right] click at pixel position
  n                  start a new game
  ?                  show this help
  q                  quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Click(CellEvent),
    Restart,
    Help,
    Quit,
}

fn parse_number(word: Option<&str>, what: &str) -> anyhow::Result<Coord> {
    let word = word.with_context(|| format!("missing {what}"))?;
    word.parse()
        .with_context(|| format!("{what} must be a whole number, got {word:?}"))
}

fn parse_button(word: Option<&str>) -> anyhow::Result<PointerButton> {
    Ok(match word {
        None | Some("left" | "l") => PointerButton::Primary,
        Some("right" | "r") => PointerButton::Secondary,
        Some(other) => bail!("unknown button {other:?}, use left or right"),
    })
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal((
                parse_number(words.next(), "row")?,
                parse_number(words.next(), "column")?,
            )),
            "f" | "flag" => Self::Flag((
                parse_number(words.next(), "row")?,
                parse_number(words.next(), "column")?,
            )),
            "c" | "click" => Self::Click(CellEvent {
                x: parse_number(words.next(), "x")?,
                y: parse_number(words.next(), "y")?,
                button: parse_button(words.next())?,
            }),
            "n" | "new" | "restart" => Self::Restart,
            "?" | "h" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}, type ? for help"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected {extra:?} after command");
        }
        Ok(command)
    }
}
