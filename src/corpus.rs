//! Word lists and derived frequency tables
//!
//! The corpus holds two immutable lists: the answer words (candidate secrets)
//! and the larger allowed-guess vocabulary. Everything else in the crate reads
//! the corpus by shared reference; it is loaded once per process and never
//! mutated.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufRead, BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of letters in a puzzle word. Constant across a run.
pub const WORD_LEN: usize = 5;

/// Number of letters in the alphabet.
pub const ALPHABET: usize = 26;

/// A fixed-length puzzle word of ASCII lowercase letters.
///
/// Construction is validated, so every instance is a well-formed word of
/// exactly [`WORD_LEN`] letters. Words are cheap to copy and order
/// lexicographically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Word([u8; WORD_LEN]);

impl Word {
    /// Parse a word from a string, lowercasing ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWord`] if the input is not exactly
    /// [`WORD_LEN`] ASCII letters.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.len() != WORD_LEN || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidWord {
                word: s.to_string(),
                expected: WORD_LEN,
            });
        }
        let mut letters = [0u8; WORD_LEN];
        for (slot, c) in letters.iter_mut().zip(trimmed.bytes()) {
            *slot = c.to_ascii_lowercase();
        }
        Ok(Word(letters))
    }

    /// The raw letter bytes (`b'a'..=b'z'`).
    pub fn letters(&self) -> [u8; WORD_LEN] {
        self.0
    }

    /// Letter at `position` as an alphabet index in `0..26`.
    pub fn letter_index(&self, position: usize) -> usize {
        (self.0[position] - b'a') as usize
    }

    /// Whether the word contains `letter` (a byte in `b'a'..=b'z'`).
    pub fn contains(&self, letter: u8) -> bool {
        self.0.contains(&letter)
    }

    /// Number of occurrences of `letter` in the word.
    pub fn count(&self, letter: u8) -> usize {
        self.0.iter().filter(|&&c| c == letter).count()
    }

    /// Number of distinct letters in the word.
    ///
    /// Used by selection heuristics that prefer information-rich guesses.
    pub fn unique_letters(&self) -> usize {
        let mut seen = 0u32;
        for &c in &self.0 {
            seen |= 1 << (c - b'a');
        }
        seen.count_ones() as usize
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.0 {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(\"{self}\")")
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

impl TryFrom<String> for Word {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Word::parse(&value)
    }
}

/// Immutable vocabulary: answer words plus the allowed-guess superset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCorpus {
    answers: Vec<Word>,
    allowed: Vec<Word>,
}

impl WordCorpus {
    /// Build a corpus from explicit lists.
    ///
    /// The allowed list is extended with any answers missing from it, so the
    /// allowed vocabulary is always a superset of the answers. Both lists are
    /// deduplicated and the allowed list is sorted for reproducible iteration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the answer list is empty.
    pub fn from_lists(answers: Vec<Word>, allowed: Vec<Word>) -> Result<Self> {
        if answers.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "answer list is empty".to_string(),
            });
        }

        let mut answers = answers;
        answers.dedup();

        let mut allowed = allowed;
        allowed.extend(answers.iter().copied());
        allowed.sort_unstable();
        allowed.dedup();

        Ok(Self { answers, allowed })
    }

    /// Load a corpus from two plain-text files, one word per line.
    pub fn from_files<P: AsRef<Path>>(answers: P, allowed: P) -> Result<Self> {
        let answer_words = read_word_file(answers.as_ref())?;
        let allowed_words = read_word_file(allowed.as_ref())?;
        Self::from_lists(answer_words, allowed_words)
    }

    /// A small built-in corpus for tests and demos.
    pub fn sample() -> Self {
        let answers = SAMPLE_ANSWERS
            .iter()
            .map(|w| Word::parse(w))
            .collect::<Result<Vec<_>>>()
            .unwrap_or_default();
        let allowed = SAMPLE_EXTRA_GUESSES
            .iter()
            .map(|w| Word::parse(w))
            .collect::<Result<Vec<_>>>()
            .unwrap_or_default();
        // The embedded lists are well-formed, so this cannot fail.
        Self::from_lists(answers, allowed).unwrap_or(Self {
            answers: Vec::new(),
            allowed: Vec::new(),
        })
    }

    /// The answer words, in list order.
    pub fn answers(&self) -> &[Word] {
        &self.answers
    }

    /// The allowed-guess vocabulary, sorted.
    pub fn allowed(&self) -> &[Word] {
        &self.allowed
    }

    /// Whether `word` may be used as a guess.
    pub fn is_allowed(&self, word: Word) -> bool {
        self.allowed.binary_search(&word).is_ok()
    }

    /// Whether `word` is a possible secret.
    pub fn is_answer(&self, word: Word) -> bool {
        self.answers.contains(&word)
    }

    /// Split the answer list into training and testing partitions.
    ///
    /// The first `train_fraction` of the list (in order) becomes the training
    /// partition; the remainder is held out for testing. Fractions are
    /// clamped so that each partition keeps at least the words the rounding
    /// gives it; emptiness is the caller's concern.
    pub fn split(&self, train_fraction: f64) -> (Vec<Word>, Vec<Word>) {
        let cut = ((self.answers.len() as f64) * train_fraction).round() as usize;
        let cut = cut.min(self.answers.len());
        let train = self.answers[..cut].to_vec();
        let test = self.answers[cut..].to_vec();
        (train, test)
    }
}

fn read_word_file(path: &Path) -> Result<Vec<Word>> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open word list {}", path.display()),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| Error::Io {
            operation: format!("read word list {}", path.display()),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        words.push(Word::parse(line)?);
    }
    Ok(words)
}

/// Precomputed frequency tables used by selection strategies.
///
/// `letter_pos` holds, for each letter and position, the probability that an
/// answer word has that letter in that position. The green-probability score
/// of a word is the sum of its letters' positional probabilities, a proxy for
/// the expected number of exact matches against an unknown answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyTables {
    letter_pos: Vec<Vec<f64>>,
    green_scores: HashMap<Word, f64>,
}

impl FrequencyTables {
    /// Derive the tables from a corpus: positional letter probabilities over
    /// the answer list, then a green-probability score for every allowed word.
    pub fn from_corpus(corpus: &WordCorpus) -> Self {
        let letter_pos = letter_position_probs(corpus.answers());

        let mut green_scores = HashMap::with_capacity(corpus.allowed().len());
        for &word in corpus.allowed() {
            green_scores.insert(word, expected_greens(word, &letter_pos));
        }

        Self {
            letter_pos,
            green_scores,
        }
    }

    /// Probability that an answer has `letter` (alphabet index) at `position`.
    pub fn letter_position_prob(&self, letter: usize, position: usize) -> f64 {
        self.letter_pos[letter][position]
    }

    /// Green-probability score for a word; zero for out-of-vocabulary words.
    pub fn green_score(&self, word: Word) -> f64 {
        self.green_scores.get(&word).copied().unwrap_or(0.0)
    }

    /// Save the tables as JSON (human-readable artifact).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create {}", path.as_ref().display()),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load tables previously written by [`FrequencyTables::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("open {}", path.as_ref().display()),
            source,
        })?;
        let tables = serde_json::from_reader(BufReader::new(file))?;
        Ok(tables)
    }
}

/// Positional letter probabilities over a word list.
pub fn letter_position_probs(words: &[Word]) -> Vec<Vec<f64>> {
    let mut counts = vec![vec![0usize; WORD_LEN]; ALPHABET];
    for word in words {
        for position in 0..WORD_LEN {
            counts[word.letter_index(position)][position] += 1;
        }
    }

    let total = words.len().max(1) as f64;
    counts
        .into_iter()
        .map(|row| row.into_iter().map(|c| c as f64 / total).collect())
        .collect()
}

/// Expected number of exact-position matches for `word` under `letter_pos`.
pub fn expected_greens(word: Word, letter_pos: &[Vec<f64>]) -> f64 {
    (0..WORD_LEN)
        .map(|position| letter_pos[word.letter_index(position)][position])
        .sum()
}

const SAMPLE_ANSWERS: &[&str] = &[
    "crane", "trace", "robot", "slate", "crate", "stare", "raise", "arise", "least", "steal",
    "tales", "stone", "notes", "onset", "audio", "house", "mouse", "about", "train", "brain",
    "grain", "plant", "plane", "bread", "break", "dream", "cream", "clean", "clear", "learn",
    "earth", "heart", "water", "power", "pound", "round", "sound", "light", "night", "might",
];

const SAMPLE_EXTRA_GUESSES: &[&str] = &[
    "adieu", "ratio", "tears", "rates", "snare", "scare", "share", "shire", "shore", "chore",
    "score", "store", "spore", "sport", "short", "shirt", "blank", "flank", "frank", "prank",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Word::parse("cran").is_err());
        assert!(Word::parse("cranes").is_err());
        assert!(Word::parse("cr4ne").is_err());
    }

    #[test]
    fn parse_lowercases() {
        let word = Word::parse("CRANE").unwrap();
        assert_eq!(word.to_string(), "crane");
    }

    #[test]
    fn unique_letters_counts_distinct() {
        assert_eq!(Word::parse("crane").unwrap().unique_letters(), 5);
        assert_eq!(Word::parse("robot").unwrap().unique_letters(), 4);
    }

    #[test]
    fn allowed_is_superset_of_answers() {
        let corpus = WordCorpus::sample();
        for &answer in corpus.answers() {
            assert!(corpus.is_allowed(answer), "{answer} missing from allowed");
        }
    }

    #[test]
    fn split_partitions_answers() {
        let corpus = WordCorpus::sample();
        let (train, test) = corpus.split(0.75);
        assert_eq!(train.len() + test.len(), corpus.answers().len());
        assert!(!train.is_empty());
        assert!(!test.is_empty());
    }

    #[test]
    fn positional_probs_sum_to_one_per_position() {
        let corpus = WordCorpus::sample();
        let probs = letter_position_probs(corpus.answers());
        for position in 0..WORD_LEN {
            let sum: f64 = (0..ALPHABET).map(|l| probs[l][position]).sum();
            assert!((sum - 1.0).abs() < 1e-9, "position {position} sums to {sum}");
        }
    }

    #[test]
    fn green_score_matches_manual_sum() {
        let corpus = WordCorpus::sample();
        let tables = FrequencyTables::from_corpus(&corpus);
        let word = Word::parse("crane").unwrap();

        let manual: f64 = (0..WORD_LEN)
            .map(|p| tables.letter_position_prob(word.letter_index(p), p))
            .sum();
        assert!((tables.green_score(word) - manual).abs() < 1e-12);
    }
}
