
pub mod crosschecks;
pub mod letter_mask;
pub mod row_search;
pub mod score;

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use dashmap::DashMap;
use rayon::prelude::*;

use crate::error::RackError;
use crate::rack::Rack;
use crate::score_rules::ScoreRules;
use crate::{
    line_position, Board, BoardBonus, Direction, LetterScoring, Lexicon, Placement, Square, Tile,
    BOARD_SIZE, CENTER,
};

use letter_mask::LetterMask;
use row_search::RowSearch;

/// Where a placement sits: the line it was searched in and the leftmost
/// index of the contiguous word, played or pre-existing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    pub rank: usize,
    pub direction: Direction,
    pub start: usize,
}

/// A candidate move. `run: None` marks a pass (no tiles) or an exchange
/// (the tiles to swap out). `tiles` holds only what the move itself
/// puts down, in line order, skipping letters already on the board.
#[derive(Debug, Clone)]
pub struct Move {
    pub run: Option<Run>,
    pub tiles: Vec<Tile>,
    pub score: u32,
}

impl Move {
    pub fn pass() -> Self {
        Move { run: None, tiles: Vec::new(), score: 0 }
    }

    pub fn is_pass(&self) -> bool {
        self.run.is_none() && self.tiles.is_empty()
    }

    /// The full word this move spells on `board` (which must not
    /// contain the move yet), None for pass/exchange moves.
    pub fn word_on(&self, board: &Board) -> Option<String> {
        let run = self.run?;
        let mut word = String::new();
        let mut remaining = self.tiles.iter();
        let mut pending = remaining.next();
        let mut index = run.start;
        while index < BOARD_SIZE {
            let pos = line_position(run.rank, run.direction, index);
            match board.square(pos) {
                Square::Filled(tile) => word.push(tile.letter().map_or('?', |l| l.0 as char)),
                Square::Empty => match pending {
                    Some(tile) => {
                        word.push(tile.letter().map_or('?', |l| l.0 as char));
                        pending = remaining.next();
                    }
                    None => break,
                },
            }
            index += 1;
        }
        Some(word)
    }
}

// identity is where the tiles go, not what they happen to score; the
// candidate set collapses duplicates found by different branches
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.run == other.run && self.tiles == other.tiles
    }
}
impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.run.hash(state);
        self.tiles.hash(state);
    }
}

/// One row or column, copied out of the board for a single search
/// worker to scribble on: the letter buffer, the per-square legality
/// masks from the perpendicular words, and the anchor flags.
#[derive(Clone)]
pub struct RowView {
    pub rank: usize,
    pub direction: Direction,
    pub letters: [Option<Tile>; BOARD_SIZE],
    pub crosschecks: [LetterMask; BOARD_SIZE],
    pub hooks: [bool; BOARD_SIZE],
}

impl RowView {
    pub fn build<D: AsRef<[u8]>>(
        board: &Board,
        rank: usize,
        direction: Direction,
        lexicon: &Lexicon<D>,
    ) -> Self {
        let mut letters = [None; BOARD_SIZE];
        let mut crosschecks = [LetterMask::empty(); BOARD_SIZE];
        let mut hooks = [false; BOARD_SIZE];

        let perp = direction.perp();
        let mut prefix = Vec::new();
        let mut suffix = Vec::new();

        for index in 0..BOARD_SIZE {
            let pos = line_position(rank, direction, index);
            match board.square(pos) {
                Square::Filled(tile) => letters[index] = Some(tile),
                Square::Empty => {
                    hooks[index] = board.is_hook(pos);

                    prefix.clear();
                    let mut place = Placement(pos, perp);
                    loop {
                        place = place.back();
                        match board.square(place.0).tile().and_then(|t| t.letter()) {
                            Some(letter) => prefix.insert(0, letter),
                            None => break,
                        }
                    }
                    suffix.clear();
                    let mut place = Placement(pos, perp);
                    loop {
                        place = place.next();
                        match board.square(place.0).tile().and_then(|t| t.letter()) {
                            Some(letter) => suffix.push(letter),
                            None => break,
                        }
                    }
                    crosschecks[index] = crosschecks::legal_letters(lexicon, &prefix, &suffix);
                }
            }
        }

        RowView { rank, direction, letters, crosschecks, hooks }
    }

    pub fn hook_indices(&self) -> Vec<usize> {
        (0..BOARD_SIZE).filter(|&i| self.hooks[i]).collect()
    }

    /// Bounds of the maximal contiguous run of letters through `index`
    pub fn word_span(&self, index: usize) -> (usize, usize) {
        let mut start = index;
        while start > 0 && self.letters[start - 1].is_some() {
            start -= 1;
        }
        let mut end = index;
        while end + 1 < BOARD_SIZE && self.letters[end + 1].is_some() {
            end += 1;
        }
        (start, end)
    }

    pub fn word_at(&self, index: usize) -> String {
        let (start, end) = self.word_span(index);
        (start..=end)
            .filter_map(|i| self.letters[i].and_then(|t| t.letter()))
            .map(|l| l.0 as char)
            .collect()
    }

    pub fn next_empty(&self, from: usize) -> Option<usize> {
        (from..BOARD_SIZE).find(|&i| self.letters[i].is_none())
    }

    pub fn prev_empty(&self, before: usize) -> Option<usize> {
        (0..before).rev().find(|&i| self.letters[i].is_none())
    }
}

/// Move generation over a fixed board, lexicon and scoring. The board
/// and rack it is given stay untouched during generation; only
/// `best_move` mutates the rack it is handed, after all workers have
/// joined.
pub struct Solver<'a, S: LetterScoring, B: BoardBonus, D: AsRef<[u8]>> {
    board: &'a Board,
    lexicon: &'a Lexicon<D>,
    rules: &'a ScoreRules<S, B>,
}

impl<'a, S: LetterScoring, B: BoardBonus, D: AsRef<[u8]> + Sync> Solver<'a, S, B, D> {
    pub fn new(board: &'a Board, lexicon: &'a Lexicon<D>, rules: &'a ScoreRules<S, B>) -> Self {
        Solver { board, lexicon, rules }
    }

    /// Every legal placement anywhere on the board, plus one exchange
    /// candidate per subset of the rack (the empty subset is the pass).
    pub fn generate_all_moves(&self, rack: &Rack) -> HashSet<Move> {
        let mut lines = Vec::new();
        for &direction in &[Direction::Horizontal, Direction::Vertical] {
            for rank in 0..BOARD_SIZE {
                if self.board.line_has_hooks(rank, direction) {
                    lines.push((rank, direction));
                }
            }
        }
        log::debug!("searching {} lines", lines.len());

        // lines only share read-only state, so each worker gets its own
        // view and rack and they all drain into one map
        let found: DashMap<Move, ()> = DashMap::new();
        lines.into_par_iter().for_each(|(rank, direction)| {
            let mut row = RowView::build(self.board, rank, direction, self.lexicon);
            let mut work_rack = rack.clone();
            let mut search = RowSearch::new(self.board, self.lexicon, self.rules);
            for hook in row.hook_indices() {
                let mut played = [None; BOARD_SIZE];
                search.play_on_square(&mut row, hook, &mut played, &mut work_rack);
            }
            for mov in search.into_moves() {
                found.insert(mov, ());
            }
        });

        let mut moves: HashSet<Move> = found.into_iter().map(|(mov, ())| mov).collect();

        let tiles = rack.tiles();
        for picks in 0u32..(1 << tiles.len()) {
            let subset: Vec<Tile> = tiles
                .iter()
                .enumerate()
                .filter(|(i, _)| picks & (1 << i) != 0)
                .map(|(_, &tile)| tile)
                .collect();
            moves.insert(Move { run: None, tiles: subset, score: 0 });
        }

        log::debug!("{} candidate moves", moves.len());
        moves
    }

    /// First move of a game: only the central row needs searching, a
    /// column would just be its transpose. Picks and plays the best
    /// candidate, removing its tiles from `rack`.
    pub fn starting_move(&self, rack: &mut Rack) -> Result<Move, RackError> {
        let mut row = RowView::build(self.board, CENTER.row, Direction::Horizontal, self.lexicon);
        let mut work_rack = rack.clone();
        let mut played = [None; BOARD_SIZE];
        let mut search = RowSearch::new(self.board, self.lexicon, self.rules);
        search.play_on_square(&mut row, CENTER.col, &mut played, &mut work_rack);
        self.best_move(search.into_moves(), rack)
    }

    /// Highest score wins, ties broken arbitrarily; an empty candidate
    /// list degenerates to a pass. The winner's tiles leave the live
    /// rack; a rack that cannot supply them is a fatal inconsistency
    /// and surfaces as the error.
    pub fn best_move(
        &self,
        candidates: impl IntoIterator<Item = Move>,
        rack: &mut Rack,
    ) -> Result<Move, RackError> {
        let best = candidates
            .into_iter()
            .max_by_key(|m| m.score)
            .unwrap_or_else(Move::pass);
        rack.remove_tiles(&best.tiles)?;
        Ok(best)
    }
}

#[cfg(test)]
use crate::score_rules::{ClassicBonus, EnglishScoring};

#[cfg(test)]
fn test_rules() -> ScoreRules<EnglishScoring, ClassicBonus> {
    ScoreRules { scoring: EnglishScoring, bonuses: ClassicBonus, extra_bonus: 50 }
}

#[cfg(test)]
fn cat_board() -> Board {
    use crate::{Letter, Position};
    let mut board = Board::empty();
    for (i, l) in b"cat".iter().enumerate() {
        board.set(Position { row: 7, col: 6 + i }, Square::Filled(Tile::Natural(Letter(*l))));
    }
    board
}

#[test]
fn row_view_words_and_empties() {
    let lexicon = Lexicon::from_words(vec!["cat"]);
    let row = RowView::build(&cat_board(), 7, Direction::Horizontal, &lexicon);

    assert_eq!(row.word_at(7), "cat");
    assert_eq!(row.word_span(6), (6, 8));
    assert_eq!(row.next_empty(6), Some(9));
    assert_eq!(row.prev_empty(6), Some(5));
    assert_eq!(row.hook_indices(), vec![5, 9]);
}

#[test]
fn move_identity_ignores_score() {
    use crate::Letter;
    let run = Some(Run { rank: 7, direction: Direction::Horizontal, start: 5 });
    let a = Move { run, tiles: vec![Tile::Natural(Letter(b's'))], score: 6 };
    let b = Move { run, tiles: vec![Tile::Natural(Letter(b's'))], score: 99 };
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    set.insert(b);
    assert_eq!(set.len(), 1);
}

#[test]
fn generates_every_placement_and_exchange() {
    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);
    let rack = Rack::parse("sa").unwrap();

    let moves = solver.generate_all_moves(&rack);

    let mut placements: Vec<(String, u32)> = moves
        .iter()
        .filter(|m| m.run.is_some())
        .map(|m| (m.word_on(&board).unwrap(), m.score))
        .collect();
    placements.sort();
    assert_eq!(
        placements,
        vec![
            ("at".to_string(), 3),
            ("cats".to_string(), 6),
            ("scat".to_string(), 6),
            ("ta".to_string(), 3),
        ]
    );

    // all four subsets of the rack, pass included
    let exchanges = moves.iter().filter(|m| m.run.is_none()).count();
    assert_eq!(exchanges, 4);
    assert!(moves.contains(&Move::pass()));
}

#[test]
fn every_generated_placement_reads_as_words() {
    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);
    let rack = Rack::parse("sa").unwrap();

    for mov in solver.generate_all_moves(&rack) {
        let run = match mov.run {
            Some(run) => run,
            None => continue,
        };
        let mut played = board.clone();
        played.commit(&mov);

        // the word along the run is in the lexicon
        let view = RowView::build(&played, run.rank, run.direction, &lexicon);
        assert!(lexicon.contains(&view.word_at(run.start)));

        // and so is every perpendicular word a new tile completes
        for index in run.start..BOARD_SIZE {
            let pos = line_position(run.rank, run.direction, index);
            if !board.square(pos).is_empty() || played.square(pos).is_empty() {
                continue;
            }
            let perp_rank = pos[run.direction];
            let perp_index = pos[run.direction.perp()];
            let view = RowView::build(&played, perp_rank, run.direction.perp(), &lexicon);
            let word = view.word_at(perp_index);
            if word.len() > 1 {
                assert!(lexicon.contains(&word), "bad cross word {:?}", word);
            }
            // the fresh tile must also be allowed by the mask that was
            // on that square before the move
            let before = RowView::build(&board, run.rank, run.direction, &lexicon);
            let letter = played.square(pos).tile().and_then(|t| t.letter()).unwrap();
            assert!(before.crosschecks[index].contains(letter));
        }
    }
}

#[test]
fn regenerating_is_idempotent() {
    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);
    let rack = Rack::parse("sa").unwrap();

    assert_eq!(solver.generate_all_moves(&rack), solver.generate_all_moves(&rack));
}

#[test]
fn best_move_takes_the_top_score_and_spends_the_tiles() {
    use crate::Letter;
    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["cat"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);

    let run = |start| Some(Run { rank: 7, direction: Direction::Horizontal, start });
    let candidates = vec![
        Move { run: run(0), tiles: vec![Tile::Natural(Letter(b'a'))], score: 12 },
        Move { run: run(1), tiles: vec![Tile::Natural(Letter(b'b'))], score: 30 },
        Move { run: run(2), tiles: vec![Tile::Natural(Letter(b'c'))], score: 5 },
    ];

    let mut rack = Rack::parse("abc").unwrap();
    let best = solver.best_move(candidates.clone(), &mut rack).unwrap();
    assert_eq!(best.score, 30);
    assert_eq!(rack, Rack::parse("ac").unwrap());

    // a rack that cannot supply the winning tiles is a fatal turn error
    let mut bare = Rack::parse("xyz").unwrap();
    assert_eq!(solver.best_move(candidates, &mut bare), Err(RackError::NotFound('b')));
}

#[test]
fn no_playable_tiles_still_leaves_a_pass() {
    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);
    let rack = Rack::parse("q").unwrap();

    let moves = solver.generate_all_moves(&rack);
    assert!(moves.iter().all(|m| m.run.is_none()));
    assert!(moves.contains(&Move::pass()));

    let mut rack = rack;
    let best = solver.best_move(moves, &mut rack).unwrap();
    assert_eq!(best.score, 0);
    assert!(best.run.is_none());
}

#[test]
fn starting_move_goes_through_the_center() {
    let board = Board::empty();
    let lexicon = Lexicon::from_words(vec!["cat", "at", "ta", "act"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);

    let mut rack = Rack::parse("cat").unwrap();
    let best = solver.starting_move(&mut rack).unwrap();

    let run = best.run.expect("a placement, not a pass");
    assert_eq!(run.rank, CENTER.row);
    assert_eq!(run.direction, Direction::Horizontal);
    assert!(run.start <= CENTER.col && CENTER.col < run.start + best.tiles.len());

    // three letters through the doubled center square
    assert_eq!(best.score, 10);
    let word = best.word_on(&board).unwrap();
    assert!(word == "cat" || word == "act");
    assert!(rack.is_empty());
}

#[test]
fn exchange_subsets_collapse_for_duplicate_letters() {
    let board = Board::empty();
    let lexicon = Lexicon::from_words(vec!["zz"]);
    let rules = test_rules();
    let solver = Solver::new(&board, &lexicon, &rules);
    let rack = Rack::parse("aa").unwrap();

    // no placements possible; the four index subsets of [a, a] fold
    // into pass, exchange-one and exchange-both
    let moves = solver.generate_all_moves(&rack);
    assert_eq!(moves.len(), 3);
}
