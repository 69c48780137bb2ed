//! Terminal front-end: draws the board with crossterm and feeds clicks and
//! arrow keys to the puzzle.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{style, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::{debug, info};
use rand::rngs::StdRng;

use fifteen_puzzle::{Direction, Puzzle, RepeatGuard};

/// Screen columns per board cell, including the gap to the next cell.
pub const CELL_WIDTH: u16 = 6;
/// Screen rows per board cell, including the gap to the next cell.
pub const CELL_HEIGHT: u16 = 3;
const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game {
    puzzle: Puzzle,
    rng: StdRng,
    shuffle_moves: usize,
    guard: RepeatGuard,
    reshuffle_delay: Duration,
    moves: usize,
}

impl Game {
    pub fn new(
        puzzle: Puzzle,
        rng: StdRng,
        shuffle_moves: usize,
        guard: RepeatGuard,
        reshuffle_delay: Duration,
    ) -> Self {
        Self {
            puzzle,
            rng,
            shuffle_moves,
            guard,
            reshuffle_delay,
            moves: 0,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn reshuffle(&mut self) {
        let made = self
            .puzzle
            .shuffle_with(&mut self.rng, self.shuffle_moves, self.guard);
        self.moves = 0;
        info!("New game shuffled with {made} moves");
    }

    /// Apply one input event to the board.
    pub fn handle(&mut self, event: Event) -> Result<Flow> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Quit),
                KeyCode::Char('r') => self.reshuffle(),
                code => {
                    if let Some((position, direction)) = key_target(code, &self.puzzle) {
                        if self.puzzle.try_move(position, direction)? {
                            self.moves += 1;
                        }
                    }
                }
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some(position) = position_at(column, row, self.puzzle.size()) {
                    if self.puzzle.select(position)?.is_some() {
                        self.moves += 1;
                    }
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    pub fn draw<W: Write>(&self, out: &mut W, status: &str) -> Result<()> {
        queue!(out, Clear(ClearType::All))?;

        let size = self.puzzle.size();
        let empty_tile = self.puzzle.empty_tile();
        let block = usize::from(CELL_WIDTH - 1);
        for (position, &tile) in self.puzzle.tiles().iter().enumerate() {
            let x = ORIGIN_X + (position % size) as u16 * CELL_WIDTH;
            let y = ORIGIN_Y + (position / size) as u16 * CELL_HEIGHT;
            if tile == empty_tile {
                continue;
            }
            let label = format!("{:^block$}", tile + 1);
            queue!(out, MoveTo(x, y), PrintStyledContent(style(label).reverse()))?;
            for line in 1..CELL_HEIGHT - 1 {
                let filler = " ".repeat(block);
                queue!(out, MoveTo(x, y + line), PrintStyledContent(style(filler).reverse()))?;
            }
        }

        let status_y = ORIGIN_Y + size as u16 * CELL_HEIGHT;
        queue!(
            out,
            MoveTo(ORIGIN_X, status_y),
            Print(format!("{status}  moves: {}", self.moves)),
            MoveTo(ORIGIN_X, status_y + 1),
            Print("click a tile or use the arrow keys, r: reshuffle, q: quit"),
        )?;
        out.flush()?;
        Ok(())
    }

    fn event_loop<W: Write>(&mut self, out: &mut W) -> Result<()> {
        loop {
            if self.puzzle.is_solved() {
                self.draw(out, "Solved!")?;
                thread::sleep(self.reshuffle_delay);
                self.reshuffle();
            }

            self.draw(out, "Playing")?;
            let event = event::read().context("reading terminal event")?;
            if self.handle(event)? == Flow::Quit {
                debug!("Quit after {} moves", self.moves);
                return Ok(());
            }
        }
    }
}

/// Board position under the screen cell at `column`, `row`.
pub fn position_at(column: u16, row: u16, size: usize) -> Option<usize> {
    let col = usize::from(column.checked_sub(ORIGIN_X)? / CELL_WIDTH);
    let row = usize::from(row.checked_sub(ORIGIN_Y)? / CELL_HEIGHT);
    if col >= size || row >= size {
        return None;
    }
    Some(row * size + col)
}

/// Tile that an arrow key slides into the empty slot, and the direction it slides.
pub fn key_target(code: KeyCode, puzzle: &Puzzle) -> Option<(usize, Direction)> {
    let size = puzzle.size();
    let empty = puzzle.empty_location();
    match code {
        KeyCode::Up if empty + size < puzzle.len() => Some((empty + size, Direction::Up)),
        KeyCode::Down if empty >= size => Some((empty - size, Direction::Down)),
        KeyCode::Left if empty % size != size - 1 => Some((empty + 1, Direction::Left)),
        KeyCode::Right if empty % size != 0 => Some((empty - 1, Direction::Right)),
        _ => None,
    }
}

/// Restores the terminal when dropped, also on early return.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)
            .context("preparing the terminal")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = std::io::stdout();
        let _ = execute!(out, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

pub fn run(mut game: Game) -> Result<()> {
    let (columns, rows) = terminal::size().context("reading terminal size")?;
    let size = game.puzzle().size() as u16;
    if columns < ORIGIN_X + size * CELL_WIDTH || rows < ORIGIN_Y + size * CELL_HEIGHT + 2 {
        anyhow::bail!("terminal is too small for a {size}x{size} board ({columns}x{rows})");
    }

    let mut out = std::io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;
    game.event_loop(&mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;

    fn game(size: usize) -> Game {
        Game::new(
            Puzzle::new(size).unwrap(),
            StdRng::seed_from_u64(3),
            size * size * size,
            RepeatGuard::default(),
            Duration::ZERO,
        )
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Screen coordinates inside the cell at `position`.
    fn cell(position: usize, size: usize) -> (u16, u16) {
        (
            ORIGIN_X + (position % size) as u16 * CELL_WIDTH + 1,
            ORIGIN_Y + (position / size) as u16 * CELL_HEIGHT,
        )
    }

    #[test]
    fn position_at_maps_cells() {
        assert_eq!(position_at(ORIGIN_X, ORIGIN_Y, 4), Some(0));
        let (x, y) = cell(11, 4);
        assert_eq!(position_at(x, y, 4), Some(11));
        assert_eq!(position_at(0, ORIGIN_Y, 4), None);
        assert_eq!(position_at(ORIGIN_X + 4 * CELL_WIDTH, ORIGIN_Y, 4), None);
        assert_eq!(position_at(ORIGIN_X, ORIGIN_Y + 4 * CELL_HEIGHT, 4), None);
    }

    #[test]
    fn key_target_picks_neighbour_of_empty_slot() {
        let puzzle = Puzzle::new(4).unwrap();
        assert_eq!(key_target(KeyCode::Up, &puzzle), None);
        assert_eq!(key_target(KeyCode::Left, &puzzle), None);
        assert_eq!(key_target(KeyCode::Down, &puzzle), Some((11, Direction::Down)));
        assert_eq!(key_target(KeyCode::Right, &puzzle), Some((14, Direction::Right)));
        assert_eq!(key_target(KeyCode::Enter, &puzzle), None);
    }

    #[test]
    fn click_next_to_empty_slot_moves_tile() {
        let mut game = game(4);
        let (x, y) = cell(11, 4);
        assert_eq!(game.handle(click(x, y)).unwrap(), Flow::Continue);
        assert_eq!(game.puzzle().empty_location(), 11);
        assert_eq!(game.moves(), 1);

        let (x, y) = cell(0, 4);
        game.handle(click(x, y)).unwrap();
        assert_eq!(game.puzzle().empty_location(), 11);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn arrow_keys_slide_tiles() {
        let mut game = game(3);
        game.handle(key(KeyCode::Right)).unwrap();
        assert_eq!(game.puzzle().empty_location(), 7);
        game.handle(key(KeyCode::Left)).unwrap();
        assert!(game.puzzle().is_solved());
        assert_eq!(game.moves(), 2);
    }

    #[test]
    fn quit_and_reshuffle_keys() {
        let mut game = game(4);
        game.handle(key(KeyCode::Down)).unwrap();
        game.handle(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(game.moves(), 0);
        assert!(game.puzzle().is_solvable());

        assert_eq!(game.handle(key(KeyCode::Char('q'))).unwrap(), Flow::Quit);
        assert_eq!(game.handle(key(KeyCode::Esc)).unwrap(), Flow::Quit);
    }

    #[test]
    fn draw_prints_tiles_and_status() {
        let game = game(2);
        let mut out = Vec::new();
        game.draw(&mut out, "Playing").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Playing  moves: 0"));
        assert!(text.contains("  3  "));
        assert!(!text.contains("  4  "));
    }
}
