
use super::score;
use super::{Move, RowView, Run};
use crate::rack::Rack;
use crate::score_rules::ScoreRules;
use crate::{Board, BoardBonus, Letter, LetterScoring, Lexicon, Tile, BOARD_SIZE};

/// The recursive anchor search over one row or column. Accumulates
/// candidates across anchors; the row buffer, the `played` record and
/// the rack are mutated in place and restored before every return, so
/// one set of them serves a whole line.
pub struct RowSearch<'a, S: LetterScoring, B: BoardBonus, D: AsRef<[u8]>> {
    board: &'a Board,
    lexicon: &'a Lexicon<D>,
    rules: &'a ScoreRules<S, B>,
    moves: Vec<Move>,
}

impl<'a, S: LetterScoring, B: BoardBonus, D: AsRef<[u8]>> RowSearch<'a, S, B, D> {
    pub fn new(board: &'a Board, lexicon: &'a Lexicon<D>, rules: &'a ScoreRules<S, B>) -> Self {
        RowSearch { board, lexicon, rules, moves: Vec::new() }
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }

    /// Tries every rack letter legal on `row[index]`, records each
    /// resulting dictionary word as a candidate, and grows the
    /// placement leftward/rightward while the word could still be part
    /// of a longer one.
    pub fn play_on_square(
        &mut self,
        row: &mut RowView,
        index: usize,
        played: &mut [Option<Tile>; BOARD_SIZE],
        rack: &mut Rack,
    ) {
        // what the perpendicular word allows here, narrowed to what the
        // rack can actually supply; a blank supplies anything
        let allowed = row.crosschecks[index];
        let candidates: Vec<Letter> = if rack.has_blank() {
            allowed.letters().collect()
        } else {
            allowed.letters().filter(|&l| rack.has_letter(l)).collect()
        };

        for letter in candidates {
            let tile = match rack.remove(letter) {
                Ok(tile) => tile,
                Err(_) => unreachable!("candidate letters are backed by the rack"),
            };
            row.letters[index] = Some(tile);
            played[index] = Some(tile);

            let word = row.word_at(index);
            if self.lexicon.contains(&word) {
                let (start, _) = row.word_span(index);
                let tiles: Vec<Tile> = played.iter().filter_map(|t| *t).collect();
                let score = score::calculate(
                    self.board,
                    self.rules,
                    row.rank,
                    row.direction,
                    start,
                    &tiles,
                );
                self.moves.push(Move {
                    run: Some(Run { rank: row.rank, direction: row.direction, start }),
                    tiles,
                    score,
                });
            }

            if !rack.is_empty() {
                if self.lexicon.contains_infix(&word) {
                    if let Some(next) = row.prev_empty(index) {
                        // a hook further left was already searched as
                        // its own anchor, descending again would redo
                        // that work
                        if !row.hooks[next] {
                            self.play_on_square(row, next, played, rack);
                        }
                    }
                }
                if self.lexicon.contains_prefix(&word) {
                    if let Some(next) = row.next_empty(index + 1) {
                        self.play_on_square(row, next, played, rack);
                    }
                }
            }

            // undo before the next candidate; sibling branches and the
            // caller see the state they handed in
            rack.add(tile).expect("a slot was just freed");
            row.letters[index] = None;
            played[index] = None;
        }
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
    use crate::{Position, Square};
    let mut board = Board::empty();
    for (i, l) in b"cat".iter().enumerate() {
        board.set(Position { row: 7, col: 6 + i }, Square::Filled(Tile::Natural(Letter(*l))));
    }
    board
}

#[test]
fn finds_extensions_on_both_sides() {
    use crate::Direction;

    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();

    let mut row = RowView::build(&board, 7, Direction::Horizontal, &lexicon);
    let mut rack = Rack::parse("s").unwrap();
    let mut search = RowSearch::new(&board, &lexicon, &rules);
    for hook in row.hook_indices() {
        let mut played = [None; BOARD_SIZE];
        search.play_on_square(&mut row, hook, &mut played, &mut rack);
    }

    let mut found: Vec<(usize, String)> = search
        .into_moves()
        .iter()
        .map(|m| (m.run.unwrap().start, m.word_on(&board).unwrap()))
        .collect();
    found.sort();
    assert_eq!(found, vec![(5, "scat".to_string()), (6, "cats".to_string())]);
}

#[test]
fn blank_stands_in_for_any_legal_letter() {
    use crate::Direction;

    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();

    let mut row = RowView::build(&board, 7, Direction::Horizontal, &lexicon);
    let mut rack = Rack::parse("*").unwrap();
    let mut search = RowSearch::new(&board, &lexicon, &rules);
    let mut played = [None; BOARD_SIZE];
    search.play_on_square(&mut row, 9, &mut played, &mut rack);

    let moves = search.into_moves();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].tiles, vec![Tile::Blank(Some(Letter(b's')))]);
    assert_eq!(moves[0].word_on(&board).unwrap(), "cats");
    // the blank adds nothing to the word's value
    assert_eq!(moves[0].score, 3 + 1 + 1 + 0);
}

#[test]
fn search_restores_row_and_rack() {
    use crate::Direction;

    let board = cat_board();
    let lexicon = Lexicon::from_words(vec!["at", "cat", "cats", "scat", "act", "ta"]);
    let rules = test_rules();

    let mut row = RowView::build(&board, 7, Direction::Horizontal, &lexicon);
    let letters_before = row.letters;
    let mut rack = Rack::parse("sa*").unwrap();
    let rack_before = rack.clone();
    let mut played = [None; BOARD_SIZE];

    let mut search = RowSearch::new(&board, &lexicon, &rules);
    for hook in row.hook_indices() {
        search.play_on_square(&mut row, hook, &mut played, &mut rack);
    }

    assert_eq!(row.letters, letters_before);
    assert_eq!(rack, rack_before);
    assert_eq!(rack.len(), 3);
    assert!(played.iter().all(|t| t.is_none()));
}
