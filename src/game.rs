use std::{cmp::max, thread::sleep, time::Duration};

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::food::{Food, FoodPolicy};
use crate::grid::{Board, Position};
use crate::input::{Input, Key};
use crate::render::{
    Render, RenderDelta, Role, BORDER_CHAR, DEAD_SNAKE_CHAR, FOOD_CHAR, INVALID_OPTION, SNAKE_BODY_CHAR,
};
use crate::snake::{Direction, Snake};

const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    GameOver,
    /// Only reachable with `FoodPolicy::AvoidBody`: no free cell left for food.
    Won,
}

/// Tick interval in milliseconds, shrinking as the score climbs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Speed {
    current_ms: u64,
    floor_ms: u64,
}

impl Speed {
    pub fn new(base_ms: u64, floor_ms: u64) -> Self {
        Speed { current_ms: max(base_ms, floor_ms), floor_ms }
    }

    pub fn ms(&self) -> u64 {
        self.current_ms
    }

    /// Called once per score change. Every positive even score shaves a
    /// millisecond off, down to the floor. Returns whether the speed changed.
    fn on_score(&mut self, score: u32) -> bool {
        if score == 0 || score % 2 != 0 || self.current_ms <= self.floor_ms {
            return false;
        }

        self.current_ms -= 1;
        true
    }

    /// Vertical steps cover more screen per cell, so they get an extra quarter.
    pub fn delay(&self, direction: Direction) -> Duration {
        let extra = if direction.is_vertical() { self.current_ms / 4 } else { 0 };
        Duration::from_millis(self.current_ms + extra)
    }
}

/// What one tick asks of the screen and the pacer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub deltas: Vec<RenderDelta>,
    pub delay: Duration,
}

#[derive(Clone, Debug)]
pub struct SessionState {
    board: Board,
    snake: Snake,
    food: Option<Food>,
    score: u32,
    speed: Speed,
    status: Status,
    policy: FoodPolicy,
    rng: StdRng,
}

impl SessionState {
    pub fn new(config: &GameConfig) -> Result<Self> {
        if config.base_speed_ms == 0 {
            return Err(Error::ZeroSpeed);
        }

        let board = Board::new(config.width, config.height)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let snake = Snake::new(board.center(), INITIAL_DIRECTION);
        let food = Food::spawn(&mut rng, &board, &snake, config.food_policy);

        Ok(SessionState {
            board,
            snake,
            food,
            score: 0,
            speed: Speed::new(config.base_speed_ms, config.min_speed_ms),
            status: Status::Running,
            policy: config.food_policy,
            rng,
        })
    }

    #[cfg(test)]
    fn place(mut self, snake: Snake, food: Option<Food>) -> Self {
        self.snake = snake;
        self.food = food;
        self
    }

    /// Advances the simulation by one step and returns the next state along
    /// with what changed on screen. Does nothing once the session has ended.
    pub fn tick(&self, intent: Option<Direction>) -> (SessionState, Frame) {
        let mut next = self.clone();
        let mut frame = Frame { deltas: vec![], delay: Duration::from_millis(0) };

        if next.status != Status::Running {
            return (next, frame);
        }

        if let Some(dir) = intent {
            next.snake.set_direction(dir);
        }

        let direction = next.snake.move_step();
        let head = next.snake.head();

        if let Some(tail) = next.snake.previous_tail() {
            if !next.snake.occupies(tail) {
                frame.deltas.push(RenderDelta::ClearCell(tail));
            }
        }

        if next.board.is_wall(head) || next.snake.has_self_collision() {
            info!(
                "snake of length {} crashed at ({}, {}) with score {}",
                next.snake.len(), head.x, head.y, next.score
            );
            next.status = Status::GameOver;
            return (next, frame);
        }

        let ate = next.food.map(|food| food.position()) == Some(head);
        if ate {
            next.score += 1;
            next.snake.grow();
            debug!("food eaten at ({}, {}), score {}", head.x, head.y, next.score);

            if next.speed.on_score(next.score) {
                debug!("speed now {} ms", next.speed.ms());
            }

            next.food = Food::spawn(&mut next.rng, &next.board, &next.snake, next.policy);
            if next.food.is_none() {
                info!("board filled with score {}", next.score);
                next.status = Status::Won;
            }
        }

        frame.deltas.push(RenderDelta::cell(head, next.snake.head_char(), Role::SnakeHead));
        if let Some(neck) = next.snake.neck() {
            frame.deltas.push(RenderDelta::cell(neck, SNAKE_BODY_CHAR, Role::SnakeBody));
        }

        if let Some(food) = next.food {
            frame.deltas.push(RenderDelta::cell(food.position(), FOOD_CHAR, Role::Food));
        }

        if ate {
            frame.deltas.push(next.score_delta());
        }

        frame.delay = next.speed.delay(direction);
        (next, frame)
    }

    /// Everything needed to paint the board from a blank screen.
    pub fn full_frame(&self) -> Vec<RenderDelta> {
        let mut deltas = vec![RenderDelta::ClearScreen];

        for pos in self.board.border() {
            deltas.push(RenderDelta::cell(pos, BORDER_CHAR, Role::Border));
        }

        for pos in self.snake.body().skip(1) {
            deltas.push(RenderDelta::cell(*pos, SNAKE_BODY_CHAR, Role::SnakeBody));
        }
        deltas.push(RenderDelta::cell(self.snake.head(), self.snake.head_char(), Role::SnakeHead));

        if let Some(food) = self.food {
            deltas.push(RenderDelta::cell(food.position(), FOOD_CHAR, Role::Food));
        }

        deltas.push(self.score_delta());
        deltas
    }

    fn score_delta(&self) -> RenderDelta {
        let pos = Position::new(0, self.board.height() + 1);
        RenderDelta::text(pos, format!("Score: {}", self.score), Role::ScoreText)
    }

    fn prompt_pos(&self) -> Position {
        Position::new(0, self.board.height() + 2)
    }

    fn pause_menu(&self) -> Vec<RenderDelta> {
        let lines = [
            "======= SNAKE GAME PAUSED =======".to_string(),
            "        1. Resume Game".to_string(),
            "        2. Quit".to_string(),
            format!("  ==== CURRENT SCORE: {} ====  ", self.score),
        ];

        let widest = lines.iter().map(|line| line.len()).max().unwrap_or(0) as i32;
        let left = max(0, (self.board.width() - widest) / 2);
        let top = max(0, self.board.height() / 2 - 1);

        lines.iter()
            .enumerate()
            .map(|(i, line)| RenderDelta::text(Position::new(left, top + i as i32), line.as_str(), Role::Message))
            .collect()
    }

    fn end_screen(&self) -> Vec<RenderDelta> {
        let mut deltas = vec![];

        let message = if self.status == Status::Won {
            format!("You won! Score: {}", self.score)
        } else {
            for pos in self.snake.body() {
                deltas.push(RenderDelta::cell(*pos, DEAD_SNAKE_CHAR, Role::Alert));
            }
            format!("Game Over! Score: {}", self.score)
        };

        let left = max(0, (self.board.width() - message.len() as i32) / 2);
        deltas.push(RenderDelta::text(Position::new(left, self.board.height() / 2), message, Role::Alert));
        deltas.push(RenderDelta::text(self.prompt_pos(), "Press any key to continue", Role::Message));
        deltas
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    GameOver,
    Won,
    /// Left through the pause menu or Ctrl+C; no end screen was shown.
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub score: u32,
    pub ending: Ending,
}

enum Control {
    Continue(Option<Direction>),
    Quit,
}

pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new(config: &GameConfig) -> Result<Self> {
        Ok(Session { state: SessionState::new(config)? })
    }

    pub fn run<T: Render + Input>(mut self, term: &mut T) -> Result<Outcome> {
        info!(
            "session started on {}x{} board at {} ms",
            self.state.board.width(), self.state.board.height(), self.state.speed.ms()
        );
        term.apply(&self.state.full_frame())?;

        while self.state.status == Status::Running {
            let intent = match self.read_input(term)? {
                Control::Continue(intent) => intent,
                Control::Quit => {
                    info!("session quit with score {}", self.state.score);
                    return Ok(Outcome { score: self.state.score, ending: Ending::Quit });
                }
            };

            let (next, frame) = self.state.tick(intent);
            self.state = next;
            term.apply(&frame.deltas)?;

            if self.state.status == Status::Running {
                sleep(frame.delay);
            }
        }

        term.apply(&self.state.end_screen())?;
        term.read_key()?;

        let ending = if self.state.status == Status::Won { Ending::Won } else { Ending::GameOver };
        Ok(Outcome { score: self.state.score, ending })
    }

    /// Reads at most one pending key. A pause blocks here until the player
    /// picks an option.
    fn read_input<T: Render + Input>(&self, term: &mut T) -> Result<Control> {
        let control = match term.try_read_key()? {
            Some(Key::Move(dir)) => Control::Continue(Some(dir)),
            Some(Key::Pause) => self.pause(term)?,
            Some(Key::Interrupt) => Control::Quit,
            Some(Key::Menu(_)) | Some(Key::Other) | None => Control::Continue(None),
        };

        Ok(control)
    }

    fn pause<T: Render + Input>(&self, term: &mut T) -> Result<Control> {
        debug!("paused with score {}", self.state.score);
        term.apply(&self.state.pause_menu())?;

        loop {
            match term.read_key()? {
                Key::Menu(1) => {
                    debug!("resumed");
                    term.apply(&self.state.full_frame())?;
                    return Ok(Control::Continue(None));
                }
                Key::Menu(2) | Key::Interrupt => return Ok(Control::Quit),
                key => {
                    warn!("invalid pause menu key {:?}", key);
                    term.apply(&[RenderDelta::text(self.state.prompt_pos(), INVALID_OPTION, Role::Alert)])?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use crate::testing::ScriptedTerminal;

    fn at(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn config(width: i32, height: i32) -> GameConfig {
        GameConfig::default()
            .with_size(width, height)
            .with_speed(100, 10)
            .with_seed(42)
    }

    fn snapshot(state: &SessionState) -> (u32, Vec<Position>, Option<Food>) {
        (state.score, state.snake.body().copied().collect(), state.food)
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(SessionState::new(&config(0, 10)), Err(Error::BoardTooSmall { .. })));
        assert!(matches!(SessionState::new(&config(10, -1)), Err(Error::BoardTooSmall { .. })));
        assert!(matches!(
            SessionState::new(&config(10, 10).with_speed(0, 0)),
            Err(Error::ZeroSpeed)
        ));
    }

    #[test]
    fn base_speed_is_clamped_to_floor() {
        let state = SessionState::new(&config(10, 10).with_speed(5, 10)).unwrap();
        assert_eq!(state.speed.ms(), 10);
    }

    #[test]
    fn starts_centered_with_food_off_head() {
        let state = SessionState::new(&config(10, 10)).unwrap();

        assert_eq!(state.snake.head(), at(5, 5));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.status, Status::Running);
        assert_ne!(state.food.map(|f| f.position()), Some(at(5, 5)));
    }

    #[test]
    fn right_wall_ends_game_after_nine_moves_from_left_edge() {
        let mut state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(Snake::new(at(1, 5), Right), Some(Food::new(at(1, 1))));

        for _ in 0..8 {
            state = state.tick(None).0;
            assert_eq!(state.status, Status::Running);
        }

        state = state.tick(None).0;
        assert_eq!(state.status, Status::GameOver);
        assert_eq!(state.snake.head().x, 10);
    }

    #[test]
    fn right_wall_ends_game_from_center() {
        let mut state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(Snake::new(at(5, 5), Right), Some(Food::new(at(1, 1))));

        for _ in 0..4 {
            state = state.tick(None).0;
            assert_eq!(state.status, Status::Running);
        }

        state = state.tick(None).0;
        assert_eq!(state.status, Status::GameOver);
        assert_eq!(state.snake.head(), at(10, 5));
    }

    #[test]
    fn ticks_after_game_over_are_inert() {
        let state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(Snake::new(at(9, 5), Right), None);

        let (state, _) = state.tick(None);
        assert_eq!(state.status, Status::GameOver);

        let (after, frame) = state.tick(Some(Up));
        assert_eq!(snapshot(&after), snapshot(&state));
        assert!(frame.deltas.is_empty());
    }

    #[test]
    fn eating_scores_one_and_grows_one() {
        let state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(Snake::new(at(5, 5), Right), Some(Food::new(at(6, 5))));

        let (mut state, frame) = state.tick(None);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2);
        assert_ne!(state.food.map(|f| f.position()), Some(at(6, 5)));
        assert!(frame.deltas.contains(&RenderDelta::text(at(0, 11), "Score: 1", Role::ScoreText)));
        state.food = Some(Food::new(at(1, 1)));

        let (state, _) = state.tick(None);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2);
        let body: Vec<_> = state.snake.body().copied().collect();
        assert_eq!(body, vec![at(7, 5), at(6, 5)]);
    }

    #[test]
    fn crashing_into_self_ends_game() {
        let snake = Snake::from_segments(
            vec![at(5, 5), at(6, 5), at(6, 6), at(5, 6), at(4, 6)],
            Left,
        );
        let state = SessionState::new(&config(10, 10)).unwrap().place(snake, None);

        let (state, frame) = state.tick(Some(Down));
        assert_eq!(state.status, Status::GameOver);
        assert_eq!(frame.deltas, vec![RenderDelta::ClearCell(at(4, 6))]);
    }

    #[test]
    fn crash_still_erases_vacated_tail() {
        let snake = Snake::from_segments(vec![at(9, 5), at(8, 5), at(7, 5)], Right);
        let state = SessionState::new(&config(10, 10)).unwrap().place(snake, None);

        let (state, frame) = state.tick(None);
        assert_eq!(state.status, Status::GameOver);
        assert_eq!(frame.deltas, vec![RenderDelta::ClearCell(at(7, 5))]);

        // The end screen repaints only what is left of the body.
        assert!(!state.end_screen().contains(&RenderDelta::cell(at(7, 5), DEAD_SNAKE_CHAR, Role::Alert)));
    }

    #[test]
    fn pause_menu_is_centered() {
        let state = SessionState::new(&config(60, 20)).unwrap();
        let menu = state.pause_menu();

        assert_eq!(menu.len(), 4);
        for (i, delta) in menu.iter().enumerate() {
            match delta {
                RenderDelta::DrawText { pos, .. } => assert_eq!(*pos, at(13, 9 + i as i32)),
                other => panic!("unexpected delta {:?}", other),
            }
        }
    }

    #[test]
    fn reversal_intent_is_ignored() {
        let state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(Snake::new(at(5, 5), Right), None);

        let (state, _) = state.tick(None);
        let (state, _) = state.tick(Some(Left));
        assert_eq!(state.snake.head(), at(7, 5));
        assert_eq!(state.snake.head_char(), '>');
    }

    #[test]
    fn frame_erases_vacated_tail_only() {
        let snake = Snake::from_segments(vec![at(5, 5), at(4, 5)], Right);
        let state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(snake, Some(Food::new(at(6, 5))));

        let (mut state, frame) = state.tick(None);
        assert_eq!(frame.deltas[0], RenderDelta::ClearCell(at(4, 5)));
        state.food = Some(Food::new(at(1, 1)));

        // The duplicated tail keeps its cell for one more step.
        let (state, frame) = state.tick(None);
        assert!(!frame.deltas.iter().any(|d| matches!(d, RenderDelta::ClearCell(_))));
        assert!(frame.deltas.contains(&RenderDelta::cell(at(7, 5), '>', Role::SnakeHead)));
        assert!(frame.deltas.contains(&RenderDelta::cell(at(6, 5), SNAKE_BODY_CHAR, Role::SnakeBody)));
        assert!(frame.deltas.contains(&RenderDelta::cell(at(1, 1), FOOD_CHAR, Role::Food)));
        assert!(!frame.deltas.iter().any(|d| matches!(d, RenderDelta::DrawText { .. })));

        let (_, frame) = state.tick(None);
        assert_eq!(frame.deltas[0], RenderDelta::ClearCell(at(5, 5)));
    }

    #[test]
    fn vertical_moves_wait_a_quarter_longer() {
        let state = SessionState::new(&config(10, 10))
            .unwrap()
            .place(Snake::new(at(5, 5), Right), None);

        let (state, frame) = state.tick(None);
        assert_eq!(frame.delay, Duration::from_millis(100));

        let (_, frame) = state.tick(Some(Up));
        assert_eq!(frame.delay, Duration::from_millis(125));
    }

    #[test]
    fn speeds_up_on_even_scores() {
        let mut state = SessionState::new(&config(20, 10))
            .unwrap()
            .place(Snake::new(at(2, 5), Right), None);

        let mut speeds = vec![];
        for x in 3..8 {
            state.food = Some(Food::new(at(x, 5)));
            state = state.tick(None).0;
            speeds.push(state.speed.ms());
        }

        assert_eq!(state.score, 5);
        assert_eq!(speeds, vec![100, 99, 99, 98, 98]);
    }

    #[test]
    fn speed_never_drops_below_floor() {
        let mut speed = Speed::new(11, 10);

        assert!(speed.on_score(2));
        assert!(!speed.on_score(4));
        assert!(!speed.on_score(3));
        assert_eq!(speed.ms(), 10);
    }

    #[test]
    fn filling_the_board_wins() {
        // 4x4 board: four spawnable cells, three taken by the snake.
        let snake = Snake::from_segments(vec![at(1, 2), at(1, 1), at(2, 1)], Down);
        let mut state = SessionState::new(&config(4, 4).with_food_policy(FoodPolicy::AvoidBody))
            .unwrap()
            .place(snake, Some(Food::new(at(2, 2))));

        state = state.tick(Some(Right)).0;
        assert_eq!(state.status, Status::Running);
        assert_eq!(state.food, Some(Food::new(at(2, 1))));

        state = state.tick(Some(Up)).0;
        assert_eq!(state.status, Status::Won);
        assert_eq!(state.score, 2);
        assert_eq!(state.food, None);
    }

    #[test]
    fn full_frame_paints_everything() {
        let snake = Snake::from_segments(vec![at(3, 2), at(2, 2)], Right);
        let state = SessionState::new(&config(6, 4))
            .unwrap()
            .place(snake, Some(Food::new(at(4, 3))));

        let deltas = state.full_frame();
        assert_eq!(deltas[0], RenderDelta::ClearScreen);
        assert!(deltas.contains(&RenderDelta::cell(at(0, 0), BORDER_CHAR, Role::Border)));
        assert!(deltas.contains(&RenderDelta::cell(at(6, 4), BORDER_CHAR, Role::Border)));
        assert!(deltas.contains(&RenderDelta::cell(at(3, 2), '>', Role::SnakeHead)));
        assert!(deltas.contains(&RenderDelta::cell(at(2, 2), SNAKE_BODY_CHAR, Role::SnakeBody)));
        assert!(deltas.contains(&RenderDelta::cell(at(4, 3), FOOD_CHAR, Role::Food)));
        assert_eq!(deltas.last(), Some(&RenderDelta::text(at(0, 5), "Score: 0", Role::ScoreText)));
    }

    #[test]
    fn pause_then_resume_leaves_state_untouched() {
        let mut session = Session::new(&config(20, 10)).unwrap();
        session.state = session.state.tick(Some(Down)).0;
        let before = snapshot(&session.state);

        let mut term = ScriptedTerminal::new()
            .press(Key::Pause)
            .answer(Key::Other)
            .answer(Key::Menu(3))
            .answer(Key::Menu(1));

        assert!(matches!(session.read_input(&mut term).unwrap(), Control::Continue(None)));
        assert_eq!(snapshot(&session.state), before);

        assert!(term.texts().iter().any(|t| t.contains("SNAKE GAME PAUSED")));
        assert_eq!(term.texts().iter().filter(|t| **t == INVALID_OPTION).count(), 2);
        assert_eq!(term.drawn.iter().filter(|d| **d == RenderDelta::ClearScreen).count(), 1);
    }

    #[test]
    fn quit_from_pause_skips_end_screen() {
        let session = Session::new(&config(20, 10)).unwrap();
        let mut term = ScriptedTerminal::new().press(Key::Pause).answer(Key::Menu(2));

        let outcome = session.run(&mut term).unwrap();
        assert_eq!(outcome, Outcome { score: 0, ending: Ending::Quit });
        assert!(!term.texts().iter().any(|t| t.starts_with("Game Over")));
    }

    #[test]
    fn interrupt_quits() {
        let session = Session::new(&config(20, 10)).unwrap();
        let mut term = ScriptedTerminal::new().press(Key::Interrupt);

        assert_eq!(session.run(&mut term).unwrap().ending, Ending::Quit);
    }

    #[test]
    fn run_until_wall_shows_game_over() {
        let session = Session::new(&config(10, 10).with_speed(1, 1)).unwrap();
        let mut term = ScriptedTerminal::new()
            .press(Key::Other)
            .press(Key::Move(Up))
            .answer(Key::Other);

        let outcome = session.run(&mut term).unwrap();
        assert_eq!(outcome.ending, Ending::GameOver);

        let message = format!("Game Over! Score: {}", outcome.score);
        assert!(term.texts().contains(&message.as_str()));
        assert!(term.drawn.iter().any(|d| matches!(d, RenderDelta::DrawCell { glyph: DEAD_SNAKE_CHAR, .. })));
    }
}
