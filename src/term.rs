use std::{fmt::Display, io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal, QueueableCommand};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, poll, read};
use crossterm::style::{Color, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::error::{Error, Result};
use crate::grid::Position;
use crate::input::{Input, Key};
use crate::render::{Render, Role};
use crate::snake::Direction::*;

/// Rows below the board used for the score line and prompts.
const STATUS_ROWS: u16 = 3;

pub struct TermManager {
    stdout: Stdout,
}

/// Switches the foreground color for as long as it lives and resets it to
/// the terminal default when dropped, whichever way the scope is left.
struct ColorScope<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> ColorScope<'a, W> {
    fn enter(out: &'a mut W, color: Color) -> Result<Self> {
        out.queue(SetForegroundColor(color))?;
        Ok(ColorScope { out })
    }
}

impl<W: Write> Drop for ColorScope<'_, W> {
    fn drop(&mut self) {
        // Nothing sensible to do with a failure while unwinding the scope.
        let _ = self.out.queue(SetForegroundColor(Color::Reset));
    }
}

impl<W: Write> Write for ColorScope<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn get_terminal_size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// The board spans columns 0..=width and rows 0..=height, with the status
    /// rows underneath.
    pub fn ensure_fits(&self, width: i32, height: i32) -> Result<()> {
        let (cols, rows) = self.get_terminal_size()?;
        let need_cols = (width + 1).max(0) as u16;
        let need_rows = (height + 1).max(0) as u16 + STATUS_ROWS;

        if cols < need_cols || rows < need_rows {
            return Err(Error::TerminalTooSmall { cols, rows, need_cols, need_rows });
        }

        Ok(())
    }

    fn print_at<T: Display>(&mut self, pos: Position, role: Role, content: T) -> Result<()> {
        let (x, y) = to_cell(pos);
        let mut out = ColorScope::enter(&mut self.stdout, color_of(role))?;
        queue!(out, cursor::MoveTo(x, y), style::Print(content))?;
        Ok(())
    }
}

impl Render for TermManager {
    fn draw_cell(&mut self, pos: Position, glyph: char, role: Role) -> Result<()> {
        self.print_at(pos, role, glyph)
    }

    fn clear_cell(&mut self, pos: Position) -> Result<()> {
        let (x, y) = to_cell(pos);
        queue!(self.stdout, cursor::MoveTo(x, y), style::Print(' '))?;
        Ok(())
    }

    fn draw_text(&mut self, pos: Position, text: &str, role: Role) -> Result<()> {
        let (x, y) = to_cell(pos);
        queue!(self.stdout, cursor::MoveTo(x, y), terminal::Clear(ClearType::UntilNewLine))?;
        self.print_at(pos, role, text)
    }

    fn clear_screen(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Input for TermManager {
    fn try_read_key(&mut self) -> Result<Option<Key>> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(to_key(&ev)));
            }
        }

        Ok(None)
    }

    fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(to_key(&ev));
            }
        }
    }
}

fn to_cell(pos: Position) -> (u16, u16) {
    (pos.x.max(0) as u16, pos.y.max(0) as u16)
}

fn color_of(role: Role) -> Color {
    match role {
        Role::SnakeHead | Role::SnakeBody => Color::Green,
        Role::Food | Role::ScoreText | Role::Message => Color::Yellow,
        Role::Border => Color::Reset,
        Role::Alert => Color::Red,
    }
}

fn to_key(ev: &KeyEvent) -> Key {
    match ev {
        ev if is_ctrl_c(ev) => Key::Interrupt,
        KeyEvent { code, modifiers: _ } => match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Key::Move(Up),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Key::Move(Left),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Key::Move(Down),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Key::Move(Right),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Key::Pause,
            KeyCode::Char(c @ '1'..='9') => Key::Menu(*c as u8 - b'0'),
            _ => Key::Other,
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
