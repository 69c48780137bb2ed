//! Command-line options for the terminal game.

use clap::{Parser, ValueEnum};
use std::time::Duration;

use fifteen_puzzle::RepeatGuard;

#[derive(Parser, Debug)]
#[command(version, about = "Sliding-tile puzzle in the terminal", long_about = None)]
pub struct Options {
    /// Number of tiles on each side of the board
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=10))]
    pub size: u8,

    /// Minimum number of legal moves per shuffle [default: size³]
    #[arg(short = 'm', long)]
    pub shuffle_moves: Option<usize>,

    /// Seed for reproducible shuffles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between completing the puzzle and the next shuffle, in milliseconds
    #[arg(short = 'd', long, default_value_t = 500)]
    pub reshuffle_delay_ms: u64,

    /// Which index a shuffle compares new random candidates against
    #[arg(long, value_enum, default_value_t = GuardArg::PreviousCandidate)]
    pub repeat_guard: GuardArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardArg {
    PreviousCandidate,
    PreviousEmpty,
    Off,
}

impl From<GuardArg> for RepeatGuard {
    fn from(arg: GuardArg) -> Self {
        match arg {
            GuardArg::PreviousCandidate => RepeatGuard::PreviousCandidate,
            GuardArg::PreviousEmpty => RepeatGuard::PreviousEmpty,
            GuardArg::Off => RepeatGuard::Off,
        }
    }
}

impl Options {
    pub fn size(&self) -> usize {
        usize::from(self.size)
    }

    pub fn reshuffle_delay(&self) -> Duration {
        Duration::from_millis(self.reshuffle_delay_ms)
    }
}
