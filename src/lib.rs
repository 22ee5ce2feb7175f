
pub mod error;
pub mod lexicon;
pub mod rack;
pub mod score_rules;
pub mod solver;

use std::fmt;

pub const BOARD_SIZE: usize = 15;
pub const RACK_SIZE: usize = 7;
pub const CENTER: Position = Position { row: 7, col: 7 };

pub use error::RackError;
pub use lexicon::Lexicon;
pub use rack::Rack;
pub use score_rules::{BoardBonus, Bonus, LetterScoring, ScoreRules};
pub use solver::{Move, RowView, Run, Solver};

// letters are lowercase ascii; the rest of the crate relies on it
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(pub u8);

impl Letter {
    /// 0..26, the bit this letter occupies in a cross-check mask
    pub fn index(self) -> usize {
        (self.0 - b'a') as usize
    }

    pub fn from_index(i: usize) -> Self {
        Letter(b'a' + i as u8)
    }

    /// Lowercases an ascii letter, None for anything else
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Letter(c.to_ascii_lowercase() as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}
impl fmt::Debug for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A physical tile. A blank starts unassigned on the rack and takes a
/// letter when it is played; it keeps scoring zero either way.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tile {
    Natural(Letter),
    Blank(Option<Letter>),
}

impl Tile {
    pub fn letter(&self) -> Option<Letter> {
        match self {
            Tile::Natural(l) => Some(*l),
            Tile::Blank(assigned) => *assigned,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Tile::Blank(_) => true,
            Tile::Natural(_) => false,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tile::Natural(l) => write!(f, "{}", l),
            Tile::Blank(Some(l)) => write!(f, "{}", (l.0 as char).to_ascii_uppercase()),
            Tile::Blank(None) => write!(f, "*"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Square {
    Empty,
    Filled(Tile),
}

impl Square {
    pub fn tile(&self) -> Option<&Tile> {
        match self {
            Square::Filled(tile) => Some(tile),
            Square::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Square::Empty => true,
            Square::Filled(_) => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn perp(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl std::ops::Index<Direction> for Position {
    type Output = usize;
    /// The coordinate that changes in that direction
    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Vertical => &self.row,
            Direction::Horizontal => &self.col,
        }
    }
}

impl std::ops::IndexMut<Direction> for Position {
    /// The coordinate that changes in that direction
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Vertical => &mut self.row,
            Direction::Horizontal => &mut self.col,
        }
    }
}

/// The square at offset `index` of line `rank` running in `direction`
pub fn line_position(rank: usize, direction: Direction, index: usize) -> Position {
    match direction {
        Direction::Horizontal => Position { row: rank, col: index },
        Direction::Vertical => Position { row: index, col: rank },
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Placement(pub Position, pub Direction);

impl Placement {
    pub fn next(mut self) -> Self {
        self.0[self.1] = self.0[self.1].saturating_add(1);
        self
    }

    pub fn back(mut self) -> Self {
        self.0[self.1] = self.0[self.1].wrapping_sub(1);
        self
    }

    /// A placement at the same position, but different direction
    pub fn perp(self) -> Self {
        Self(self.0, self.1.perp())
    }
}

#[derive(Debug, Clone)]
pub struct Table<T> {
    squares: Vec<Vec<T>>,
}

impl<T> Table<T> {
    pub fn fill_with(el: T) -> Self
    where
        T: Clone,
    {
        Self {
            squares: vec![vec![el; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.squares.get(pos.row)?.get(pos.col)
    }
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.squares.get_mut(pos.row)?.get_mut(pos.col)
    }
    pub fn set(&mut self, pos: Position, val: T) {
        self.squares[pos.row][pos.col] = val
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    squares: Table<Square>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: Table::fill_with(Square::Empty),
        }
    }

    /// One line of text per row; lowercase letter = natural tile,
    /// uppercase = a blank playing that letter, `_`, `.` or space = empty.
    pub fn parse(text: &str) -> Self {
        let mut board = Board::empty();
        for (row, line) in text.lines().enumerate().take(BOARD_SIZE) {
            for (col, c) in line.chars().enumerate().take(BOARD_SIZE) {
                let tile = if c.is_ascii_lowercase() {
                    Tile::Natural(Letter(c as u8))
                } else if c.is_ascii_uppercase() {
                    Tile::Blank(Some(Letter(c.to_ascii_lowercase() as u8)))
                } else if c == ' ' || c == '_' || c == '.' {
                    continue;
                } else {
                    log::warn!("unrecognized board character {:?}, leaving square empty", c);
                    continue;
                };
                board.squares.set(Position { row, col }, Square::Filled(tile));
            }
        }
        board
    }

    pub fn square(&self, pos: Position) -> Square {
        *self.squares.get(pos).unwrap_or(&Square::Empty)
    }

    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares.set(pos, square)
    }

    pub fn is_empty(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if let Square::Filled(_) = self.square(Position { row, col }) {
                    return false;
                }
            }
        }
        true
    }

    /// A square where a placed tile would touch what is already on the
    /// board; these are the anchors the search starts from. On an empty
    /// board only the center qualifies.
    pub fn is_hook(&self, pos: Position) -> bool {
        if !self.square(pos).is_empty() {
            return false;
        }
        if self.is_empty() {
            return pos == CENTER;
        }
        let neighbors = [
            Position { row: pos.row.wrapping_sub(1), col: pos.col },
            Position { row: pos.row + 1, col: pos.col },
            Position { row: pos.row, col: pos.col.wrapping_sub(1) },
            Position { row: pos.row, col: pos.col + 1 },
        ];
        neighbors.iter().any(|&n| !self.square(n).is_empty())
    }

    pub fn line_has_hooks(&self, rank: usize, direction: Direction) -> bool {
        (0..BOARD_SIZE).any(|i| self.is_hook(line_position(rank, direction, i)))
    }

    /// Write a chosen move's tiles onto the board, skipping over the
    /// letters that were already there. Pass/exchange moves leave the
    /// board untouched.
    pub fn commit(&mut self, mov: &Move) {
        let run = match &mov.run {
            Some(run) => *run,
            None => return,
        };
        let mut index = run.start;
        for &tile in &mov.tiles {
            loop {
                if index >= BOARD_SIZE {
                    log::warn!("move runs off the board, dropping remaining tiles");
                    return;
                }
                let pos = line_position(run.rank, run.direction, index);
                index += 1;
                if self.square(pos).is_empty() {
                    self.set(pos, Square::Filled(tile));
                    break;
                }
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.square(Position { row, col }) {
                    Square::Empty => write!(f, "_")?,
                    Square::Filled(tile) => write!(f, "{}", tile)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[test]
fn parse_and_print_round_trip() {
    let text = "_______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                ______caT______\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n\
                _______________\n";
    let board = Board::parse(text);
    assert_eq!(
        board.square(Position { row: 7, col: 6 }),
        Square::Filled(Tile::Natural(Letter(b'c')))
    );
    assert_eq!(
        board.square(Position { row: 7, col: 8 }),
        Square::Filled(Tile::Blank(Some(Letter(b't'))))
    );
    assert_eq!(board.to_string(), text);
}

#[test]
fn hooks_around_existing_tiles() {
    let mut board = Board::empty();
    assert!(board.is_hook(CENTER));
    assert!(!board.is_hook(Position { row: 0, col: 0 }));

    board.set(CENTER, Square::Filled(Tile::Natural(Letter(b'a'))));
    assert!(!board.is_hook(CENTER));
    assert!(board.is_hook(Position { row: 6, col: 7 }));
    assert!(board.is_hook(Position { row: 8, col: 7 }));
    assert!(board.is_hook(Position { row: 7, col: 6 }));
    assert!(board.is_hook(Position { row: 7, col: 8 }));
    assert!(!board.is_hook(Position { row: 6, col: 6 }));

    assert!(board.line_has_hooks(7, Direction::Horizontal));
    assert!(board.line_has_hooks(7, Direction::Vertical));
    assert!(board.line_has_hooks(6, Direction::Horizontal));
    assert!(!board.line_has_hooks(0, Direction::Horizontal));
}

#[test]
fn commit_skips_existing_letters() {
    let mut board = Board::empty();
    board.set(Position { row: 7, col: 7 }, Square::Filled(Tile::Natural(Letter(b'a'))));

    // t_t around the existing a, played squares are 6 and 8
    board.commit(&Move {
        run: Some(Run { rank: 7, direction: Direction::Horizontal, start: 6 }),
        tiles: vec![Tile::Natural(Letter(b't')), Tile::Natural(Letter(b't'))],
        score: 0,
    });
    assert_eq!(
        board.square(Position { row: 7, col: 6 }),
        Square::Filled(Tile::Natural(Letter(b't')))
    );
    assert_eq!(
        board.square(Position { row: 7, col: 7 }),
        Square::Filled(Tile::Natural(Letter(b'a')))
    );
    assert_eq!(
        board.square(Position { row: 7, col: 8 }),
        Square::Filled(Tile::Natural(Letter(b't')))
    );
}
