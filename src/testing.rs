use std::collections::VecDeque;
use std::io;

use crate::error::{Error, Result};
use crate::grid::Position;
use crate::input::{Input, Key};
use crate::render::{Render, RenderDelta, Role};

/// In-memory terminal: keys are scripted up front, everything drawn is kept.
#[derive(Default)]
pub struct ScriptedTerminal {
    pending: VecDeque<Key>,
    answers: VecDeque<Key>,
    pub drawn: Vec<RenderDelta>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key for the non-blocking reads of the game loop.
    pub fn press(mut self, key: Key) -> Self {
        self.pending.push_back(key);
        self
    }

    /// Queue a key for blocking reads (menus, pause, end screen).
    pub fn answer(mut self, key: Key) -> Self {
        self.answers.push_back(key);
        self
    }

    pub fn texts(&self) -> Vec<&str> {
        self.drawn.iter()
            .filter_map(|delta| match delta {
                RenderDelta::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Input for ScriptedTerminal {
    fn try_read_key(&mut self) -> Result<Option<Key>> {
        Ok(self.pending.pop_front())
    }

    fn read_key(&mut self) -> Result<Key> {
        self.answers.pop_front().ok_or_else(|| {
            Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted key left"))
        })
    }
}

impl Render for ScriptedTerminal {
    fn draw_cell(&mut self, pos: Position, glyph: char, role: Role) -> Result<()> {
        self.drawn.push(RenderDelta::cell(pos, glyph, role));
        Ok(())
    }

    fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.drawn.push(RenderDelta::ClearCell(pos));
        Ok(())
    }

    fn draw_text(&mut self, pos: Position, text: &str, role: Role) -> Result<()> {
        self.drawn.push(RenderDelta::text(pos, text, role));
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        self.drawn.push(RenderDelta::ClearScreen);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
