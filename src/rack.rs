
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::RackError;
use crate::{Letter, Tile, RACK_SIZE};

/// The player's tiles. Bounded by `RACK_SIZE`; insertion order only
/// matters for picking between duplicate letters, never for semantics.
#[derive(Debug, Clone)]
pub struct Rack {
    tiles: Vec<Tile>,
}

impl Rack {
    pub fn new() -> Self {
        Rack { tiles: Vec::with_capacity(RACK_SIZE) }
    }

    /// Letters become natural tiles, `*` a blank; anything else is
    /// dropped with a warning.
    pub fn parse(text: &str) -> Result<Self, RackError> {
        let mut rack = Rack::new();
        for c in text.chars() {
            if let Some(letter) = Letter::from_char(c) {
                rack.add(Tile::Natural(letter))?;
            } else if c == '*' {
                rack.add(Tile::Blank(None))?;
            } else {
                log::warn!("unrecognized rack character {:?}, skipping", c);
            }
        }
        Ok(rack)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn has_letter(&self, letter: Letter) -> bool {
        self.tiles.iter().any(|t| *t == Tile::Natural(letter))
    }

    pub fn has_blank(&self) -> bool {
        self.tiles.iter().any(|t| t.is_blank())
    }

    /// A blank coming (back) to the rack is unassigned again; this is
    /// what restores blank state when the search rolls a branch back.
    pub fn add(&mut self, tile: Tile) -> Result<(), RackError> {
        if self.tiles.len() >= RACK_SIZE {
            return Err(RackError::Capacity);
        }
        let tile = if tile.is_blank() { Tile::Blank(None) } else { tile };
        self.tiles.push(tile);
        Ok(())
    }

    /// Removes one tile for `letter`: the first natural match, or a
    /// blank assigned to that letter when no natural tile is left.
    pub fn remove(&mut self, letter: Letter) -> Result<Tile, RackError> {
        if let Some(i) = self.tiles.iter().position(|t| *t == Tile::Natural(letter)) {
            return Ok(self.tiles.remove(i));
        }
        if let Some(i) = self.tiles.iter().position(|t| t.is_blank()) {
            self.tiles.remove(i);
            return Ok(Tile::Blank(Some(letter)));
        }
        Err(RackError::NotFound(letter.0 as char))
    }

    pub fn remove_blank(&mut self) -> Result<Tile, RackError> {
        match self.tiles.iter().position(|t| t.is_blank()) {
            Some(i) => Ok(self.tiles.remove(i)),
            None => Err(RackError::NotFound('*')),
        }
    }

    /// Removes each letter in sequence; fails on the first letter that
    /// cannot be supplied. Callers that need atomicity check
    /// availability first.
    pub fn remove_all(&mut self, letters: &str) -> Result<Vec<Tile>, RackError> {
        let mut removed = Vec::with_capacity(letters.len());
        for c in letters.chars() {
            let letter = Letter::from_char(c).ok_or(RackError::NotFound(c))?;
            removed.push(self.remove(letter)?);
        }
        Ok(removed)
    }

    /// Removal keyed by the tiles of a chosen move: a blank in the move
    /// consumes a blank here no matter which letter it was assigned.
    pub fn remove_tiles(&mut self, tiles: &[Tile]) -> Result<(), RackError> {
        for tile in tiles {
            match tile {
                Tile::Natural(letter) => {
                    self.remove(*letter)?;
                }
                Tile::Blank(_) => {
                    self.remove_blank()?;
                }
            }
        }
        Ok(())
    }

    /// Whether the rack can supply every letter of `pattern`, spending
    /// at most one blank per missing letter. Each blank strips one
    /// candidate letter from the pattern and the check recurses on the
    /// remainder, so two blanks can cover two different letters.
    pub fn contains(&self, pattern: &str) -> bool {
        let mut needed = [0u8; 26];
        for c in pattern.chars() {
            match Letter::from_char(c) {
                Some(letter) => needed[letter.index()] += 1,
                None => return false,
            }
        }
        let mut have = [0u8; 26];
        let mut blanks = 0u8;
        for tile in &self.tiles {
            match tile {
                Tile::Natural(letter) => have[letter.index()] += 1,
                Tile::Blank(_) => blanks += 1,
            }
        }
        can_cover(&needed, &have, blanks)
    }

    fn sorted_chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.tiles.iter().map(|t| t.to_string().chars().next().unwrap()).collect();
        chars.sort_unstable();
        chars
    }
}

fn can_cover(needed: &[u8; 26], have: &[u8; 26], blanks: u8) -> bool {
    if needed.iter().zip(have.iter()).all(|(n, h)| n <= h) {
        return true;
    }
    if blanks == 0 {
        return false;
    }
    for i in 0..26 {
        if needed[i] > have[i] {
            let mut rest = *needed;
            rest[i] -= 1;
            if can_cover(&rest, have, blanks - 1) {
                return true;
            }
        }
    }
    false
}

impl Default for Rack {
    fn default() -> Self {
        Rack::new()
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for tile in &self.tiles {
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

// two racks are the same when they hold the same multiset of tiles
impl PartialEq for Rack {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_chars() == other.sorted_chars()
    }
}
impl Eq for Rack {}

impl Hash for Rack {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_chars().hash(state)
    }
}

#[test]
fn add_respects_capacity() {
    let mut rack = Rack::new();
    for _ in 0..RACK_SIZE {
        rack.add(Tile::Natural(Letter(b'e'))).unwrap();
    }
    assert_eq!(rack.add(Tile::Natural(Letter(b'e'))), Err(RackError::Capacity));
    assert_eq!(rack.len(), RACK_SIZE);
}

#[test]
fn remove_prefers_natural_over_blank() {
    let mut rack = Rack::parse("a*").unwrap();
    assert_eq!(rack.remove(Letter(b'a')), Ok(Tile::Natural(Letter(b'a'))));
    assert_eq!(rack.remove(Letter(b'a')), Ok(Tile::Blank(Some(Letter(b'a')))));
    assert_eq!(rack.remove(Letter(b'a')), Err(RackError::NotFound('a')));
}

#[test]
fn returned_blank_is_unassigned_again() {
    let mut rack = Rack::parse("*").unwrap();
    let tile = rack.remove(Letter(b'q')).unwrap();
    assert_eq!(tile, Tile::Blank(Some(Letter(b'q'))));
    rack.add(tile).unwrap();
    assert_eq!(rack.tiles(), &[Tile::Blank(None)]);
}

#[test]
fn remove_all_stops_at_first_missing_letter() {
    let mut rack = Rack::parse("cat").unwrap();
    let removed = rack.remove_all("ta").unwrap();
    assert_eq!(removed.len(), 2);
    assert_eq!(rack.len(), 1);

    let mut rack = Rack::parse("cat").unwrap();
    assert_eq!(rack.remove_all("cq"), Err(RackError::NotFound('q')));
}

#[test]
fn remove_tiles_spends_blanks_as_blanks() {
    let mut rack = Rack::parse("ca*").unwrap();
    rack.remove_tiles(&[
        Tile::Natural(Letter(b'c')),
        Tile::Natural(Letter(b'a')),
        Tile::Blank(Some(Letter(b't'))),
    ])
    .unwrap();
    assert!(rack.is_empty());

    let mut rack = Rack::parse("cat").unwrap();
    assert_eq!(
        rack.remove_tiles(&[Tile::Blank(Some(Letter(b't')))]),
        Err(RackError::NotFound('*'))
    );
}

#[test]
fn contains_uses_blanks_for_missing_letters() {
    assert!(Rack::parse("cat").unwrap().contains("cat"));
    assert!(Rack::parse("ca*").unwrap().contains("cat"));
    assert!(!Rack::parse("ca").unwrap().contains("cat"));
    // each blank covers a different missing letter
    assert!(Rack::parse("c**").unwrap().contains("cat"));
    assert!(!Rack::parse("c*").unwrap().contains("cat"));
    assert!(Rack::parse("aa*").unwrap().contains("aaa"));
    assert!(!Rack::parse("aa*").unwrap().contains("aaaa"));
}

#[test]
fn equality_ignores_order() {
    assert_eq!(Rack::parse("tac").unwrap(), Rack::parse("cat").unwrap());
    assert_ne!(Rack::parse("ca*").unwrap(), Rack::parse("cat").unwrap());
}
