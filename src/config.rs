use std::{env, fmt};

use log::warn;

use crate::food::FoodPolicy;

pub const DEFAULT_WIDTH: i32 = 60;
pub const DEFAULT_HEIGHT: i32 = 20;

/// The tick interval never drops below this, however high the score.
pub const MIN_SPEED_MS: u64 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Base tick interval per difficulty, in the order the menu lists them.
pub const DIFFICULTIES: [(Difficulty, &str, u64); 3] = [
    (Difficulty::Easy, "Easy", 100),
    (Difficulty::Medium, "Medium", 50),
    (Difficulty::Hard, "Hard", 15),
];

impl Difficulty {
    pub fn base_speed_ms(self) -> u64 {
        DIFFICULTIES.iter()
            .find(|(d, _, _)| *d == self)
            .map(|(_, _, ms)| *ms)
            .unwrap_or(DIFFICULTIES[0].2)
    }

    /// Menu options are numbered from 1.
    pub fn from_option(n: u8) -> Option<Difficulty> {
        DIFFICULTIES.get((n as usize).checked_sub(1)?).map(|(d, _, _)| *d)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = DIFFICULTIES.iter()
            .find(|(d, _, _)| d == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("?");
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub base_speed_ms: u64,
    pub min_speed_ms: u64,
    pub food_policy: FoodPolicy,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::for_difficulty(Difficulty::Easy)
    }
}

impl GameConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            base_speed_ms: difficulty.base_speed_ms(),
            min_speed_ms: MIN_SPEED_MS,
            food_policy: FoodPolicy::default(),
            seed: None,
        }
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[cfg(test)]
    pub fn with_speed(mut self, base_speed_ms: u64, min_speed_ms: u64) -> Self {
        self.base_speed_ms = base_speed_ms;
        self.min_speed_ms = min_speed_ms;
        self
    }

    pub fn with_food_policy(mut self, food_policy: FoodPolicy) -> Self {
        self.food_policy = food_policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Applies `SNAKE_BOARD=WxH`, `SNAKE_SEED=n` and `SNAKE_FOOD=head|body`
    /// when set. Malformed values are logged and skipped.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides<F: Fn(&str) -> Option<String>>(mut self, lookup: F) -> Self {
        if let Some(board) = lookup("SNAKE_BOARD") {
            match parse_board(&board) {
                Some((width, height)) => self = self.with_size(width, height),
                None => warn!("ignoring SNAKE_BOARD={:?}, expected WIDTHxHEIGHT", board),
            }
        }

        if let Some(seed) = lookup("SNAKE_SEED") {
            match seed.trim().parse() {
                Ok(seed) => self = self.with_seed(seed),
                Err(_) => warn!("ignoring SNAKE_SEED={:?}", seed),
            }
        }

        if let Some(policy) = lookup("SNAKE_FOOD") {
            match policy.trim() {
                "head" => self = self.with_food_policy(FoodPolicy::AvoidHead),
                "body" => self = self.with_food_policy(FoodPolicy::AvoidBody),
                other => warn!("ignoring SNAKE_FOOD={:?}, expected head or body", other),
            }
        }

        self
    }
}

fn parse_board(value: &str) -> Option<(i32, i32)> {
    let mut parts = value.trim().splitn(2, 'x');
    let width = parts.next()?.trim().parse().ok()?;
    let height = parts.next()?.trim().parse().ok()?;
    Some((width, height))
}
