use rand::Rng;
use rand::seq::IteratorRandom;

use crate::grid::{Board, Position};
use crate::snake::Snake;

/// Which cells a freshly spawned food has to stay clear of.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoodPolicy {
    /// Only the snake's head is excluded; food may land on the body.
    AvoidHead,
    /// No segment of the snake may be covered.
    AvoidBody,
}

impl Default for FoodPolicy {
    fn default() -> Self {
        FoodPolicy::AvoidHead
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    position: Position,
}

impl Food {
    pub fn new(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns `None` only under `AvoidBody` when the snake covers the whole
    /// spawn area.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        board: &Board,
        snake: &Snake,
        policy: FoodPolicy,
    ) -> Option<Food> {
        match policy {
            FoodPolicy::AvoidHead => Some(Food::new(spawn_avoiding_head(rng, board, snake))),
            FoodPolicy::AvoidBody => board
                .spawn_area()
                .filter(|pos| !snake.occupies(*pos))
                .choose(rng)
                .map(Food::new),
        }
    }
}

/// Rejection sampling over the spawn area. Halts almost surely since the
/// smallest board still leaves four cells to pick from.
fn spawn_avoiding_head<R: Rng + ?Sized>(rng: &mut R, board: &Board, snake: &Snake) -> Position {
    let head = snake.head();

    loop {
        let pos = Position::new(
            rng.gen_range(1..board.width() - 1),
            rng.gen_range(1..board.height() - 1),
        );
        if pos != head {
            return pos;
        }
    }
}
