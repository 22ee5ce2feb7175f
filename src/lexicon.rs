
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};

/// The words that can be played, kept as an fst set so membership,
/// prefix and infix queries all run against the same compressed
/// structure.
pub struct Lexicon<D: AsRef<[u8]>> {
    words: Set<D>,
}

impl Lexicon<Vec<u8>> {
    /// Builds an in-memory lexicon; words are lowercased first.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut words: Vec<String> = words.into_iter().map(|w| w.trim().to_lowercase()).collect();
        words.sort_unstable();
        words.dedup();
        let mut build = SetBuilder::memory();
        build.extend_iter(words).unwrap();
        Lexicon::new(build.into_set())
    }

    /// Loads a `.fst` file produced by `compile_word_list`, or a word
    /// list with one word per line for any other extension.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("fst") => {
                let data = std::fs::read(path)?;
                Ok(Lexicon::new(Set::new(data)?))
            }
            _ => {
                let words = read_word_list(path)?;
                Ok(Lexicon::from_words(words.iter().map(|w| w.as_str())))
            }
        }
    }
}

impl<D: AsRef<[u8]>> Lexicon<D> {
    pub fn new(words: Set<D>) -> Self {
        Lexicon { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub(crate) fn set(&self) -> &Set<D> {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Whether some word starts with `prefix` (a word counts as its own
    /// prefix). Gates rightward extension of the search.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        let automaton = Str::new(prefix).starts_with();
        self.words.search(automaton).into_stream().next().is_some()
    }

    /// Whether `infix` appears inside some word, edge positions
    /// included. Gates leftward extension of the search; being
    /// permissive here only costs exploration, never correctness.
    pub fn contains_infix(&self, infix: &str) -> bool {
        let automaton = SubwordScan::new(infix.as_bytes());
        self.words.search(automaton).into_stream().next().is_some()
    }
}

fn read_word_list(path: &Path) -> std::io::Result<Vec<String>> {
    let file = BufReader::new(File::open(path)?);
    file.lines()
        .map(|l| l.map(|l| l.trim().to_lowercase()))
        .collect()
}

/// Compiles a one-word-per-line list into a `.fst` file for faster
/// loading.
pub fn compile_word_list(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut words = read_word_list(input)?;
    log::info!("{} words loaded in {:?}", words.len(), Instant::now() - start);

    let start = Instant::now();
    words.sort_unstable();
    words.dedup();
    log::info!("words sorted in {:?}", Instant::now() - start);

    let start = Instant::now();
    let wtr = BufWriter::new(File::create(output)?);
    let mut build = SetBuilder::new(wtr)?;
    build.extend_iter(words)?;
    build.finish()?;
    log::info!("dictionary written in {:?}", Instant::now() - start);
    Ok(())
}

/// Substring scan as an fst automaton: the state is how much of the
/// needle the current suffix of the consumed input matches, advanced
/// with the usual failure table; the full-match state is sticky.
struct SubwordScan<'a> {
    needle: &'a [u8],
    fallback: Vec<usize>,
}

impl<'a> SubwordScan<'a> {
    fn new(needle: &'a [u8]) -> Self {
        let mut fallback = vec![0; needle.len()];
        let mut k = 0;
        for i in 1..needle.len() {
            while k > 0 && needle[i] != needle[k] {
                k = fallback[k - 1];
            }
            if needle[i] == needle[k] {
                k += 1;
            }
            fallback[i] = k;
        }
        SubwordScan { needle, fallback }
    }
}

impl<'a> Automaton for SubwordScan<'a> {
    type State = usize;

    fn start(&self) -> usize {
        0
    }

    fn is_match(&self, &state: &usize) -> bool {
        state == self.needle.len()
    }

    fn accept(&self, &state: &usize, byte: u8) -> usize {
        if state == self.needle.len() {
            return state;
        }
        let mut k = state;
        loop {
            if self.needle[k] == byte {
                return k + 1;
            }
            if k == 0 {
                return 0;
            }
            k = self.fallback[k - 1];
        }
    }

    fn can_match(&self, _state: &usize) -> bool {
        true
    }

    fn will_always_match(&self, &state: &usize) -> bool {
        state == self.needle.len()
    }
}

#[test]
fn membership_queries() {
    let lexicon = Lexicon::from_words(vec!["cat", "cats", "scat", "act", "at", "ta"]);

    assert!(lexicon.contains("cat"));
    assert!(lexicon.contains("ta"));
    assert!(!lexicon.contains("ca"));
    assert!(!lexicon.contains("tac"));

    assert!(lexicon.contains_prefix("c"));
    assert!(lexicon.contains_prefix("ca"));
    assert!(lexicon.contains_prefix("cat"));
    assert!(lexicon.contains_prefix("cats"));
    assert!(!lexicon.contains_prefix("catsa"));
    assert!(!lexicon.contains_prefix("b"));

    assert!(lexicon.contains_infix("at"));
    assert!(lexicon.contains_infix("ca"));
    assert!(lexicon.contains_infix("sc"));
    assert!(lexicon.contains_infix("cat"));
    assert!(lexicon.contains_infix("cats"));
    assert!(!lexicon.contains_infix("tc"));
    assert!(!lexicon.contains_infix("x"));
}

#[test]
fn repeated_needle_bytes_fall_back_correctly() {
    let lexicon = Lexicon::from_words(vec!["banana"]);
    assert!(lexicon.contains_infix("anana"));
    assert!(lexicon.contains_infix("nan"));
    assert!(!lexicon.contains_infix("nn"));
}
