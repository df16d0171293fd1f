use log::warn;

use crate::config::{Difficulty, DIFFICULTIES};
use crate::error::Result;
use crate::grid::Position;
use crate::input::{Input, Key};
use crate::render::{Render, RenderDelta, Role, INVALID_OPTION};

fn screen(lines: &[String]) -> Vec<RenderDelta> {
    let mut deltas = vec![RenderDelta::ClearScreen];
    for (y, line) in lines.iter().enumerate() {
        deltas.push(RenderDelta::text(Position::new(0, y as i32), line.as_str(), Role::Message));
    }
    deltas
}

fn main_menu() -> Vec<RenderDelta> {
    screen(&[
        "===== SNAKE GAME =====".to_string(),
        "1. Play Game".to_string(),
        "2. Quit".to_string(),
        "======================".to_string(),
        "Please select an option: ".to_string(),
    ])
}

fn difficulty_menu() -> Vec<RenderDelta> {
    let mut lines = vec!["===== SELECT DIFFICULTY =====".to_string()];
    for (i, (_, name, _)) in DIFFICULTIES.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, name));
    }
    lines.push("=============================".to_string());
    lines.push("Please select a difficulty: ".to_string());

    screen(&lines)
}

fn reject<T: Render>(term: &mut T, key: Key, row: usize) -> Result<()> {
    warn!("invalid menu key {:?}", key);
    term.apply(&[RenderDelta::text(Position::new(0, row as i32), INVALID_OPTION, Role::Alert)])
}

/// Walks the player through the main and difficulty menus. `None` means they
/// chose to quit.
pub fn choose_difficulty<T: Render + Input>(term: &mut T) -> Result<Option<Difficulty>> {
    let menu = main_menu();
    term.apply(&menu)?;

    loop {
        match term.read_key()? {
            Key::Menu(1) => break,
            Key::Menu(2) | Key::Interrupt => return Ok(None),
            key => reject(term, key, menu.len())?,
        }
    }

    let menu = difficulty_menu();
    term.apply(&menu)?;

    loop {
        match term.read_key()? {
            Key::Interrupt => return Ok(None),
            Key::Menu(n) => match Difficulty::from_option(n) {
                Some(difficulty) => return Ok(Some(difficulty)),
                None => reject(term, Key::Menu(n), menu.len())?,
            },
            key => reject(term, key, menu.len())?,
        }
    }
}
