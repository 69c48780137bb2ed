use log::{debug, trace, warn};
use rand::{thread_rng, Rng};
use std::fmt;

use crate::error::{PuzzleError, Result};

/// Upper bound on random draws per requested shuffle move, per board cell.
const SHUFFLE_DRAW_FACTOR: usize = 64;

/// Direction in which the selected tile slides into the empty slot.
///
/// `Up` on position `p` succeeds when the empty slot is directly above `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Priority in which a single selection tries the four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Flat-index offset of the neighbour in this direction on a board of side `size`.
    pub fn offset(&self, size: usize) -> isize {
        let row = size as isize;
        match self {
            Direction::Up => -row,
            Direction::Down => row,
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True when the neighbour in this direction would wrap onto another row.
    fn wraps(&self, position: usize, size: usize) -> bool {
        match self {
            Direction::Left => position % size == 0,
            Direction::Right => position % size == size - 1,
            Direction::Up | Direction::Down => false,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Which index a shuffle compares each new random candidate against.
///
/// A candidate equal to the remembered index is discarded and redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatGuard {
    /// The previous random draw.
    #[default]
    PreviousCandidate,
    /// The empty slot as it was when the previous draw was evaluated. This
    /// keeps the shuffle from sliding back the tile it just moved.
    PreviousEmpty,
    Off,
}

/// An NxN sliding-tile board.
///
/// Tiles are identified by their solved position, so the board is solved when
/// `tiles[i] == i` everywhere. The highest identifier, `N² - 1`, is the empty
/// slot. Every mutation goes through `&mut self`; share a board across threads
/// behind your own lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    size: usize,
    tiles: Vec<usize>,
    empty: usize,
}

impl Puzzle {
    /// Create a solved board of side `size`.
    pub fn new(size: usize) -> Result<Self> {
        let len = Self::checked_len(size)?;
        Ok(Self {
            size,
            tiles: (0..len).collect(),
            empty: len - 1,
        })
    }

    /// Restore a board from an explicit arrangement, position to tile identifier.
    ///
    /// The arrangement must be a permutation of `0..size²`. It does not have to
    /// be solvable; see [`Puzzle::is_solvable`].
    pub fn from_tiles(size: usize, tiles: Vec<usize>) -> Result<Self> {
        let len = Self::checked_len(size)?;
        if tiles.len() != len {
            return Err(PuzzleError::InvalidConfiguration(format!(
                "a board of size {size} needs {len} tiles, got {}",
                tiles.len()
            )));
        }

        let mut seen = vec![false; len];
        for &tile in &tiles {
            if tile >= len || seen[tile] {
                return Err(PuzzleError::InvalidConfiguration(format!(
                    "tiles must be a permutation of 0..{len}, found {tile} out of place"
                )));
            }
            seen[tile] = true;
        }

        let empty_tile = len - 1;
        let empty = tiles
            .iter()
            .position(|&tile| tile == empty_tile)
            .ok_or_else(|| {
                PuzzleError::InvalidConfiguration(format!("no empty tile ({empty_tile})"))
            })?;

        Ok(Self { size, tiles, empty })
    }

    /// Replace the board with a solved one of side `size`.
    ///
    /// The board is left untouched when `size` is rejected.
    pub fn initialize(&mut self, size: usize) -> Result<()> {
        *self = Self::new(size)?;
        debug!("Initialized a {size}x{size} board");
        Ok(())
    }

    fn checked_len(size: usize) -> Result<usize> {
        if size < 2 {
            return Err(PuzzleError::InvalidConfiguration(format!(
                "size must be at least 2, got {size}"
            )));
        }
        size.checked_mul(size).ok_or_else(|| {
            PuzzleError::InvalidConfiguration(format!("size {size} is too large"))
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of positions on the board, `size²`.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Identifier of the tile that marks the empty slot.
    pub fn empty_tile(&self) -> usize {
        self.tiles.len() - 1
    }

    pub fn empty_location(&self) -> usize {
        self.empty
    }

    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    pub fn tile_at(&self, position: usize) -> Result<usize> {
        self.check_position(position)?;
        Ok(self.tiles[position])
    }

    /// Move count used by the reference game for one shuffle, `size³`.
    pub fn default_shuffle_moves(&self) -> usize {
        self.size.saturating_mul(self.size).saturating_mul(self.size)
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.len() {
            return Err(PuzzleError::IndexOutOfRange {
                position,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Slide the tile at `position` in `direction` if that neighbour is the empty slot.
    ///
    /// Returns `Ok(false)` without touching the board when the move is illegal.
    pub fn try_move(&mut self, position: usize, direction: Direction) -> Result<bool> {
        self.check_position(position)?;
        let moved = self.swap_if_valid(position, direction);
        if moved {
            debug!("Moved tile at {position} {direction}, empty slot now at {position}");
        }
        Ok(moved)
    }

    /// Try every direction on `position` in [`Direction::ALL`] order and stop at
    /// the first one that succeeds.
    pub fn select(&mut self, position: usize) -> Result<Option<Direction>> {
        self.check_position(position)?;
        let moved = self.slide(position);
        match moved {
            Some(direction) => debug!("Selected tile at {position}, moved {direction}"),
            None => trace!("Selected tile at {position}, no legal move"),
        }
        Ok(moved)
    }

    fn slide(&mut self, position: usize) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.swap_if_valid(position, direction))
    }

    fn swap_if_valid(&mut self, position: usize, direction: Direction) -> bool {
        if direction.wraps(position, self.size) {
            return false;
        }
        match position.checked_add_signed(direction.offset(self.size)) {
            Some(target) if target == self.empty => {
                self.tiles.swap(position, target);
                self.empty = position;
                true
            }
            _ => false,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.tiles
            .iter()
            .enumerate()
            .all(|(position, &tile)| position == tile)
    }

    /// Whether the solved arrangement can be reached from this one with legal moves.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.count_inversions();
        let empty_row = self.empty / self.size;

        if self.size % 2 == 1 {
            // Odd width: any move keeps the inversion parity
            inversions % 2 == 0
        } else {
            // Even width: a vertical move changes the inversion parity and the empty row together
            (inversions + empty_row) % 2 == 1
        }
    }

    fn count_inversions(&self) -> usize {
        let empty_tile = self.empty_tile();
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != empty_tile)
            .map(|(i, &tile)| {
                self.tiles[i + 1..]
                    .iter()
                    .filter(|&&next| next != empty_tile && next < tile)
                    .count()
            })
            .sum()
    }

    /// Shuffle with the thread RNG and the default [`RepeatGuard`].
    pub fn shuffle(&mut self, minimum_moves: usize) -> usize {
        let mut rng = thread_rng();
        self.shuffle_with(&mut rng, minimum_moves, RepeatGuard::default())
    }

    /// Select random positions until `minimum_moves` of them produced a legal move.
    ///
    /// Only legal moves are applied, so the result is always solvable. Gives up
    /// after `max(minimum_moves, 1) * size² * 64` draws and returns the number of
    /// moves actually made.
    pub fn shuffle_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        minimum_moves: usize,
        guard: RepeatGuard,
    ) -> usize {
        let len = self.len();
        let max_draws = minimum_moves
            .max(1)
            .saturating_mul(len)
            .saturating_mul(SHUFFLE_DRAW_FACTOR);

        let mut last: Option<usize> = None;
        let mut moves = 0;
        let mut draws = 0;

        while moves < minimum_moves {
            if draws >= max_draws {
                warn!("Shuffle stopped after {draws} draws with {moves}/{minimum_moves} moves");
                break;
            }
            draws += 1;

            let candidate = rng.gen_range(0..len);
            if last == Some(candidate) {
                trace!("Shuffle discarded repeated candidate {candidate}");
                continue;
            }
            last = match guard {
                RepeatGuard::PreviousCandidate => Some(candidate),
                RepeatGuard::PreviousEmpty => Some(self.empty),
                RepeatGuard::Off => None,
            };

            if self.slide(candidate).is_some() {
                moves += 1;
            }
        }

        debug!("Shuffled with {moves} moves in {draws} draws, empty slot at {}", self.empty);
        moves
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.len().to_string().len();
        let empty_tile = self.empty_tile();
        for row in self.tiles.chunks(self.size) {
            for &tile in row {
                if tile == empty_tile {
                    write!(f, "{:>width$} ", "")?;
                } else {
                    write!(f, "{:>width$} ", tile + 1)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
