use crate::error::{Error, Result};

/// Smallest accepted board side. Anything below leaves the spawn area with
/// a single cell, which the head can sit on forever.
pub const MIN_BOARD_SIDE: i32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn shifted(self, dx: i32, dy: i32) -> Self {
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// The playing field. Walls sit on x = 0, x = width, y = 0 and y = height;
/// everything strictly between them is the interior.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width < MIN_BOARD_SIDE || height < MIN_BOARD_SIDE {
            return Err(Error::BoardTooSmall { width, height, min: MIN_BOARD_SIDE });
        }

        Ok(Board { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        pos.x <= 0 || pos.x >= self.width || pos.y <= 0 || pos.y >= self.height
    }

    /// Cells food may appear on: the interior minus the column and row
    /// next to the right and bottom walls.
    pub fn spawn_area(&self) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width, self.height);
        (1..height - 1).flat_map(move |y| (1..width - 1).map(move |x| Position::new(x, y)))
    }

    /// Every cell of the boundary ring, corners included.
    pub fn border(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity(2 * (self.width + self.height) as usize);

        for x in 0..=self.width {
            cells.push(Position::new(x, 0));
            cells.push(Position::new(x, self.height));
        }

        for y in 1..self.height {
            cells.push(Position::new(0, y));
            cells.push(Position::new(self.width, y));
        }

        cells
    }
}
