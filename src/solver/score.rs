
use crate::score_rules::ScoreRules;
use crate::{line_position, Board, BoardBonus, Direction, LetterScoring, Placement, Position, Square, Tile, BOARD_SIZE, RACK_SIZE};

/// Score of a finished placement: the word along the run (letter and
/// word bonuses count only under freshly placed tiles), plus every
/// perpendicular word a placed tile completes, plus the full-rack
/// bonus. The board passed in is the live one, without the move.
pub fn calculate<S: LetterScoring, B: BoardBonus>(
    board: &Board,
    rules: &ScoreRules<S, B>,
    rank: usize,
    direction: Direction,
    start: usize,
    tiles: &[Tile],
) -> u32 {
    let mut word_score = 0;
    let mut word_multiplier = 1;
    let mut cross_score = 0;

    let mut remaining = tiles.iter();
    let mut pending = remaining.next();
    let mut index = start;
    while index < BOARD_SIZE {
        let pos = line_position(rank, direction, index);
        match board.square(pos) {
            Square::Filled(tile) => {
                word_score += rules.scoring.score_for(&tile);
            }
            Square::Empty => {
                let tile = match pending {
                    // past the trailing end of the word
                    None => break,
                    Some(tile) => *tile,
                };
                pending = remaining.next();
                let bonus = rules.bonuses.bonus_at(pos);
                let letter_score = rules.scoring.score_for(&tile) * bonus.letter;
                word_score += letter_score;
                word_multiplier *= bonus.word;
                if let Some(others) = cross_letters(board, &rules.scoring, pos, direction.perp()) {
                    cross_score += (others + letter_score) * bonus.word;
                }
            }
        }
        index += 1;
    }

    let mut total = word_score * word_multiplier + cross_score;
    if tiles.len() == RACK_SIZE {
        total += rules.extra_bonus;
    }
    total
}

/// Sum of the existing letters touching `pos` in the `perp` direction,
/// None when the placed tile completes no perpendicular word.
fn cross_letters<S: LetterScoring>(
    board: &Board,
    scoring: &S,
    pos: Position,
    perp: Direction,
) -> Option<u32> {
    let mut sum = 0;
    let mut any = false;

    let mut place = Placement(pos, perp);
    loop {
        place = place.back();
        match board.square(place.0) {
            Square::Filled(tile) => {
                sum += scoring.score_for(&tile);
                any = true;
            }
            // out of the board, or no more letters
            Square::Empty => break,
        }
    }
    let mut place = Placement(pos, perp);
    loop {
        place = place.next();
        match board.square(place.0) {
            Square::Filled(tile) => {
                sum += scoring.score_for(&tile);
                any = true;
            }
            Square::Empty => break,
        }
    }

    if any {
        Some(sum)
    } else {
        None
    }
}

#[cfg(test)]
fn cat_board() -> Board {
    let mut board = Board::empty();
    for (i, l) in b"cat".iter().enumerate() {
        board.set(
            Position { row: 7, col: 6 + i },
            Square::Filled(Tile::Natural(crate::Letter(*l))),
        );
    }
    board
}

#[cfg(test)]
fn rules() -> ScoreRules<crate::score_rules::EnglishScoring, crate::score_rules::ClassicBonus> {
    ScoreRules {
        scoring: crate::score_rules::EnglishScoring,
        bonuses: crate::score_rules::ClassicBonus,
        extra_bonus: 50,
    }
}

#[test]
fn scores_word_extension() {
    use crate::Letter;
    // c a t s : one tile on a plain square
    let score = calculate(
        &cat_board(),
        &rules(),
        7,
        Direction::Horizontal,
        6,
        &[Tile::Natural(Letter(b's'))],
    );
    assert_eq!(score, 3 + 1 + 1 + 1);
}

#[test]
fn blank_scores_zero() {
    use crate::Letter;
    let score = calculate(
        &cat_board(),
        &rules(),
        7,
        Direction::Horizontal,
        6,
        &[Tile::Blank(Some(Letter(b's')))],
    );
    assert_eq!(score, 3 + 1 + 1 + 0);
}

#[test]
fn hanging_tile_hits_double_letter() {
    use crate::Letter;
    // a over the t of cat; (6, 8) doubles the letter
    let score = calculate(
        &cat_board(),
        &rules(),
        8,
        Direction::Vertical,
        6,
        &[Tile::Natural(Letter(b'a'))],
    );
    assert_eq!(score, 2 + 1);
}

#[test]
fn perpendicular_word_adds_to_the_score() {
    use crate::Letter;
    let mut board = cat_board();
    board.set(Position { row: 6, col: 9 }, Square::Filled(Tile::Natural(Letter(b'a'))));
    // the s extends cat to cats and completes the vertical a-s
    let score = calculate(
        &board,
        &rules(),
        7,
        Direction::Horizontal,
        6,
        &[Tile::Natural(Letter(b's'))],
    );
    assert_eq!(score, (3 + 1 + 1 + 1) + (1 + 1));
}

#[test]
fn playing_the_whole_rack_earns_the_extra_bonus() {
    use crate::Letter;
    let board = Board::empty();
    let tiles = vec![Tile::Natural(Letter(b'a')); RACK_SIZE];
    let score = calculate(&board, &rules(), 7, Direction::Horizontal, 4, &tiles);
    // seven ones through the doubled center, plus the bonus
    assert_eq!(score, 7 * 2 + 50);
}
