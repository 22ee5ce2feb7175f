
use super::{Position, Tile, BOARD_SIZE};

/// Rules that influence the score
pub struct ScoreRules<Scoring: LetterScoring, Bonuses: BoardBonus> {
    pub scoring: Scoring,
    pub bonuses: Bonuses,
    /// Bonus points for playing the whole rack in one move
    pub extra_bonus: u32,
}

pub trait LetterScoring: Sync {
    fn score_for(&self, tile: &Tile) -> u32;
}

pub trait BoardBonus: Sync {
    fn bonus_at(&self, position: Position) -> Bonus;
}

pub struct Bonus {
    pub letter: u32,
    pub word: u32,
}

pub struct EnglishScoring;

// a..z
const ENGLISH_VALUES: [u32; 26] = [
    1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, 1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10,
];

impl LetterScoring for EnglishScoring {
    fn score_for(&self, tile: &Tile) -> u32 {
        match tile {
            // a blank is worth nothing whatever letter it plays
            Tile::Blank(_) => 0,
            Tile::Natural(letter) => ENGLISH_VALUES[letter.index()],
        }
    }
}

pub struct ClassicBonus;

impl BoardBonus for ClassicBonus {
    fn bonus_at(&self, position: Position) -> Bonus {
        let Position { row, col } = position;

        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            log::error!("bonus lookup outside the board at {:?}", position);
            return Bonus { letter: 1, word: 1 };
        }

        assert_eq!(BOARD_SIZE, 15);

        // the layout repeats in every quadrant, fold onto one
        fn fold_half(a: usize) -> usize {
            if a >= 7 {
                a - 7
            } else {
                7 - a
            }
        }

        let row = fold_half(row);
        let col = fold_half(col);

        match (row, col) {
            | (7, 0) | (0, 7)
            | (7, 7) => Bonus { letter: 1, word: 3 },

            | (1, 1)
            | (4, 0) | (0, 4)
            | (5, 1) | (1, 5)
            | (7, 4) | (4, 7) => Bonus { letter: 2, word: 1 },

            | (2, 2)
            | (6, 2) | (2, 6) => Bonus { letter: 3, word: 1 },

            (row, col) if row == col => Bonus { letter: 1, word: 2 },

            _ => Bonus { letter: 1, word: 1 },
        }
    }
}

#[test]
fn letter_values() {
    use super::Letter;
    let scoring = EnglishScoring;
    assert_eq!(scoring.score_for(&Tile::Natural(Letter(b'a'))), 1);
    assert_eq!(scoring.score_for(&Tile::Natural(Letter(b'q'))), 10);
    assert_eq!(scoring.score_for(&Tile::Blank(Some(Letter(b'q')))), 0);
    assert_eq!(scoring.score_for(&Tile::Blank(None)), 0);
}

#[test]
fn bonus_layout() {
    let bonuses = ClassicBonus;
    // center doubles the word
    let b = bonuses.bonus_at(Position { row: 7, col: 7 });
    assert_eq!((b.letter, b.word), (1, 2));
    // corners triple the word
    let b = bonuses.bonus_at(Position { row: 0, col: 0 });
    assert_eq!((b.letter, b.word), (1, 3));
    let b = bonuses.bonus_at(Position { row: 14, col: 0 });
    assert_eq!((b.letter, b.word), (1, 3));
    // double letter next to the center
    let b = bonuses.bonus_at(Position { row: 6, col: 8 });
    assert_eq!((b.letter, b.word), (2, 1));
    // plain square
    let b = bonuses.bonus_at(Position { row: 7, col: 9 });
    assert_eq!((b.letter, b.word), (1, 1));
}
