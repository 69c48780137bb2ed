mod cli;
mod terminal;

use anyhow::Result;
use clap::Parser;
use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use cli::Options;
use fifteen_puzzle::Puzzle;
use terminal::Game;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = Options::parse();
    debug!("{options:?}");

    let puzzle = Puzzle::new(options.size())?;
    let shuffle_moves = options
        .shuffle_moves
        .unwrap_or_else(|| puzzle.default_shuffle_moves());
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let game = Game::new(
        puzzle,
        rng,
        shuffle_moves,
        options.repeat_guard.into(),
        options.reshuffle_delay(),
    );
    terminal::run(game)
}
