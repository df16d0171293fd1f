use std::collections::VecDeque;

use crate::grid::Position;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }

    fn offset(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Body is stored head-first. Collision with walls is the caller's business,
/// the snake only knows how to move and whether it bit itself.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    committed: Direction,
    previous_tail: Option<Position>,
}

impl Snake {
    pub fn new(pos: Position, direction: Direction) -> Self {
        Snake {
            body: VecDeque::from(vec![pos]),
            direction,
            committed: direction,
            previous_tail: None,
        }
    }

    #[cfg(test)]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        Snake {
            body: segments.into(),
            direction,
            committed: direction,
            previous_tail: None,
        }
    }

    pub fn body(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Segment right behind the head, if any.
    pub fn neck(&self) -> Option<Position> {
        self.body.get(1).copied()
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn previous_tail(&self) -> Option<Position> {
        self.previous_tail
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Queue the direction for the next step. Reversing onto the committed
    /// direction is ignored; later calls overwrite earlier ones.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction != self.committed.opposite() {
            self.direction = new_direction;
        }
    }

    pub fn move_step(&mut self) -> Direction {
        let (dx, dy) = self.direction.offset();
        let new_head = self.head().shifted(dx, dy);

        self.previous_tail = Some(self.tail());
        self.body.push_front(new_head);
        self.body.pop_back();
        self.committed = self.direction;

        self.committed
    }

    /// Duplicates the tail so the next step leaves the length unchanged.
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push_back(tail);
    }

    pub fn has_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    pub fn head_char(&self) -> char {
        match self.committed {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
