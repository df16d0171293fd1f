use crate::error::Result;
use crate::grid::Position;

pub const SNAKE_BODY_CHAR: char = 'o';
pub const FOOD_CHAR: char = '@';
pub const BORDER_CHAR: char = '#';
pub const DEAD_SNAKE_CHAR: char = 'X';

pub const INVALID_OPTION: &str = "Invalid option. Please select again.";

/// What a drawn thing is. The terminal picks colors from this.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    SnakeHead,
    SnakeBody,
    Food,
    Border,
    ScoreText,
    Message,
    Alert,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderDelta {
    ClearScreen,
    ClearCell(Position),
    DrawCell { pos: Position, glyph: char, role: Role },
    DrawText { pos: Position, text: String, role: Role },
}

impl RenderDelta {
    pub fn cell(pos: Position, glyph: char, role: Role) -> Self {
        RenderDelta::DrawCell { pos, glyph, role }
    }

    pub fn text<S: Into<String>>(pos: Position, text: S, role: Role) -> Self {
        RenderDelta::DrawText { pos, text: text.into(), role }
    }
}

pub trait Render {
    fn draw_cell(&mut self, pos: Position, glyph: char, role: Role) -> Result<()>;
    fn clear_cell(&mut self, pos: Position) -> Result<()>;
    fn draw_text(&mut self, pos: Position, text: &str, role: Role) -> Result<()>;
    fn clear_screen(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    fn apply(&mut self, deltas: &[RenderDelta]) -> Result<()> {
        for delta in deltas {
            match delta {
                RenderDelta::ClearScreen => self.clear_screen()?,
                RenderDelta::ClearCell(pos) => self.clear_cell(*pos)?,
                RenderDelta::DrawCell { pos, glyph, role } => self.draw_cell(*pos, *glyph, *role)?,
                RenderDelta::DrawText { pos, text, role } => self.draw_text(*pos, text, *role)?,
            }
        }

        self.flush()
    }
}
