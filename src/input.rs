use crate::error::Result;
use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Pause,
    /// A numbered menu option, 1..=9.
    Menu(u8),
    /// Ctrl+C. Raw mode eats the signal, so it arrives as a key.
    Interrupt,
    Other,
}

pub trait Input {
    /// Never blocks; `None` when nothing is pending.
    fn try_read_key(&mut self) -> Result<Option<Key>>;

    fn read_key(&mut self) -> Result<Key>;
}
