
use fst::{Automaton, IntoStreamer, Streamer};

use super::letter_mask::LetterMask;
use crate::{Letter, Lexicon};

/// Matches dictionary words of the exact shape `prefix + x + suffix`
/// and remembers `x`, the letter that would sit on the square being
/// checked.
struct CrossSection<'a> {
    prefix: &'a [Letter],
    suffix: &'a [Letter],
}

#[derive(Clone, Debug)]
enum CrossSectionState {
    Prefix(usize),
    Mid,
    Suffix(usize, Letter),
    Done(Letter),
}

impl<'a> Automaton for CrossSection<'a> {
    type State = Option<CrossSectionState>;

    fn start(&self) -> Self::State {
        if self.prefix.is_empty() {
            Some(CrossSectionState::Mid)
        } else {
            Some(CrossSectionState::Prefix(0))
        }
    }

    fn is_match(&self, state: &Self::State) -> bool {
        match state {
            Some(CrossSectionState::Done(_)) => true,
            _ => false,
        }
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        state.as_ref().and_then(|state| match state {
            &CrossSectionState::Prefix(i) => {
                if self.prefix[i] == Letter(byte) {
                    Some(if i + 1 == self.prefix.len() {
                        CrossSectionState::Mid
                    } else {
                        CrossSectionState::Prefix(i + 1)
                    })
                } else {
                    None
                }
            }
            CrossSectionState::Mid => Some(if self.suffix.is_empty() {
                CrossSectionState::Done(Letter(byte))
            } else {
                CrossSectionState::Suffix(0, Letter(byte))
            }),
            &CrossSectionState::Suffix(i, mid) => {
                if self.suffix[i] == Letter(byte) {
                    Some(if i + 1 == self.suffix.len() {
                        CrossSectionState::Done(mid)
                    } else {
                        CrossSectionState::Suffix(i + 1, mid)
                    })
                } else {
                    None
                }
            }
            // a longer word would overrun the run on the board
            CrossSectionState::Done(_) => None,
        })
    }

    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }
}

/// The letters that can go on a square given the perpendicular word
/// already around it. Unconstrained squares accept anything.
pub fn legal_letters<D: AsRef<[u8]>>(
    lexicon: &Lexicon<D>,
    prefix: &[Letter],
    suffix: &[Letter],
) -> LetterMask {
    if prefix.is_empty() && suffix.is_empty() {
        return LetterMask::any();
    }

    let automaton = CrossSection { prefix, suffix };
    let mut matches = lexicon.set().search_with_state(automaton).into_stream();
    let mut mask = LetterMask::empty();
    while let Some((_, state)) = matches.next() {
        match state {
            Some(CrossSectionState::Done(letter)) => {
                if (b'a'..=b'z').contains(&letter.0) {
                    mask.insert(letter);
                }
            }
            _ => unreachable!("match stopped before the final state"),
        }
    }
    mask
}

#[test]
fn masks_from_perpendicular_words() {
    use std::iter::FromIterator;

    let lexicon = Lexicon::from_words(vec!["at", "ta", "cat", "scat"]);

    // nothing around the square: anything goes
    assert!(legal_letters(&lexicon, &[], &[]).is_any());

    // _t : only "at" fits
    let mask = legal_letters(&lexicon, &[], &[Letter(b't')]);
    assert_eq!(mask, LetterMask::from_iter(vec![Letter(b'a')]));

    // t_ : only "ta" fits
    let mask = legal_letters(&lexicon, &[Letter(b't')], &[]);
    assert_eq!(mask, LetterMask::from_iter(vec![Letter(b'a')]));

    // c_t : only "cat" fits, "scat" is too long for the gap
    let mask = legal_letters(&lexicon, &[Letter(b'c')], &[Letter(b't')]);
    assert_eq!(mask, LetterMask::from_iter(vec![Letter(b'a')]));

    // x_ : nothing fits
    assert!(legal_letters(&lexicon, &[Letter(b'x')], &[]).is_empty());

    // _cat : only "scat" fits
    let mask = legal_letters(&lexicon, &[], &[Letter(b'c'), Letter(b'a'), Letter(b't')]);
    assert_eq!(mask, LetterMask::from_iter(vec![Letter(b's')]));
}
