//! State abstraction over accumulated feedback
//!
//! An episode's guess history is compressed into a set of constraints: which
//! letter each position is known to hold, which letters each position has
//! ruled out, lower bounds on how many copies of a letter the secret holds,
//! and which letters are confirmed absent. Two histories that pin down the
//! same constraints map to the same [`StateKey`]; this compression is what
//! keeps the tabular value representation tractable.
//!
//! Constraints only ever tighten: folding in another observation unions the
//! exclusions, maxes the count bounds, and never forgets a placed letter. The
//! final constraint set is therefore independent of the order the guesses
//! were made.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    corpus::{ALPHABET, WORD_LEN, Word},
    game::{GuessResult, LetterFeedback},
};

/// A set of letters, packed as a 26-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterSet(u32);

impl LetterSet {
    pub fn insert(&mut self, letter: usize) {
        self.0 |= 1 << letter;
    }

    pub fn contains(&self, letter: usize) -> bool {
        self.0 & (1 << letter) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Letters in the set, as alphabet indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..ALPHABET).filter(|&l| self.contains(l))
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{}", (letter as u8 + b'a') as char)?;
        }
        Ok(())
    }
}

/// Accumulated knowledge about the secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Known-correct letter per position, as alphabet index.
    placed: [Option<u8>; WORD_LEN],
    /// Letters ruled out per position.
    excluded: [LetterSet; WORD_LEN],
    /// Lower bound on the number of copies of each letter in the secret.
    min_counts: [u8; ALPHABET],
    /// Letters confirmed to not occur in the secret at all.
    absent: LetterSet,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a full history into a constraint set.
    pub fn from_history(history: &[(Word, GuessResult)]) -> Self {
        let mut constraints = Self::new();
        for &(guess, result) in history {
            constraints.observe(guess, result);
        }
        constraints
    }

    /// Tighten the constraints with one guess/feedback observation.
    pub fn observe(&mut self, guess: Word, result: GuessResult) {
        // Copies of each guess letter tagged Correct or Present; these are
        // lower bounds on the letter's multiplicity in the secret.
        let mut marked = [0u8; ALPHABET];
        let mut guessed = [false; ALPHABET];

        for position in 0..WORD_LEN {
            let letter = guess.letter_index(position);
            guessed[letter] = true;

            match result.at(position) {
                LetterFeedback::Correct => {
                    self.placed[position] = Some(letter as u8);
                    marked[letter] += 1;
                }
                LetterFeedback::Present => {
                    // Present but misplaced: this position cannot hold it.
                    self.excluded[position].insert(letter);
                    marked[letter] += 1;
                }
                LetterFeedback::Absent => {
                    self.excluded[position].insert(letter);
                }
            }
        }

        for letter in 0..ALPHABET {
            if !guessed[letter] {
                continue;
            }
            if marked[letter] == 0 {
                // No copy of this letter scored Correct or Present anywhere
                // in the guess, so the secret holds none of it.
                self.absent.insert(letter);
            } else {
                self.min_counts[letter] = self.min_counts[letter].max(marked[letter]);
            }
        }
    }

    /// Whether `word` is still consistent with everything observed.
    pub fn allows(&self, word: Word) -> bool {
        for position in 0..WORD_LEN {
            let letter = word.letter_index(position);
            if let Some(placed) = self.placed[position]
                && placed as usize != letter
            {
                return false;
            }
            if self.excluded[position].contains(letter) {
                return false;
            }
        }

        for letter in self.absent.iter() {
            if word.contains(letter as u8 + b'a') {
                return false;
            }
        }

        for letter in 0..ALPHABET {
            let min = self.min_counts[letter] as usize;
            if min > 0 && word.count(letter as u8 + b'a') < min {
                return false;
            }
        }

        true
    }

    /// Filter a candidate list down to the consistent subset.
    pub fn filter_candidates(&self, candidates: &[Word]) -> Vec<Word> {
        candidates
            .iter()
            .copied()
            .filter(|&word| self.allows(word))
            .collect()
    }

    /// Known-correct letter at `position`, if any.
    pub fn placed_at(&self, position: usize) -> Option<u8> {
        self.placed[position]
    }

    /// Number of positions whose letter is pinned down.
    pub fn placed_count(&self) -> usize {
        self.placed.iter().filter(|p| p.is_some()).count()
    }

    /// Derive the canonical, hashable key for this constraint set.
    ///
    /// The encoding is a pure function of the constraints: positions render
    /// their placed letter or `.`, then the per-position exclusion sets, then
    /// the minimum-count bounds, then the absent set. Identical constraints
    /// always produce identical keys regardless of observation order.
    pub fn key(&self) -> StateKey {
        let mut encoded = String::with_capacity(64);

        for position in 0..WORD_LEN {
            match self.placed[position] {
                Some(letter) => encoded.push((letter + b'a') as char),
                None => encoded.push('.'),
            }
        }

        encoded.push('|');
        for position in 0..WORD_LEN {
            if position > 0 {
                encoded.push(',');
            }
            encoded.push_str(&self.excluded[position].to_string());
        }

        encoded.push('|');
        for letter in 0..ALPHABET {
            match self.min_counts[letter] {
                0 => {}
                1 => encoded.push((letter as u8 + b'a') as char),
                count => {
                    encoded.push((letter as u8 + b'a') as char);
                    encoded.push_str(&count.to_string());
                }
            }
        }

        encoded.push('|');
        encoded.push_str(&self.absent.to_string());

        StateKey(encoded)
    }
}

/// Hashable abstraction of an episode's accumulated constraints.
///
/// Used as the state half of the value-table key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// The key for the empty (episode-start) constraint set.
    pub fn initial() -> Self {
        Constraints::new().key()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StateKey {
    fn from(value: String) -> Self {
        StateKey(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::score_guess;

    fn word(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn observe_all(pairs: &[(&str, &str)]) -> Constraints {
        let history: Vec<(Word, GuessResult)> = pairs
            .iter()
            .map(|&(secret, guess)| {
                let guess = word(guess);
                (guess, score_guess(word(secret), guess))
            })
            .collect();
        Constraints::from_history(&history)
    }

    #[test]
    fn correct_letters_are_placed() {
        let constraints = observe_all(&[("crane", "trace")]);
        assert_eq!(constraints.placed_at(1), Some(b'r' - b'a'));
        assert_eq!(constraints.placed_at(2), Some(b'a' - b'a'));
        assert_eq!(constraints.placed_at(4), Some(b'e' - b'a'));
        assert_eq!(constraints.placed_count(), 3);
    }

    #[test]
    fn secret_always_remains_consistent() {
        let constraints = observe_all(&[("crane", "trace"), ("crane", "slate")]);
        assert!(constraints.allows(word("crane")));
    }

    #[test]
    fn absent_letter_excludes_words_containing_it() {
        // 't' scores Absent against "crane".
        let constraints = observe_all(&[("crane", "trace")]);
        assert!(!constraints.allows(word("toast")));
    }

    #[test]
    fn present_letter_excludes_same_position() {
        // 'c' is present-but-misplaced at position 3 of "trace".
        let constraints = observe_all(&[("crane", "trace")]);
        assert!(!constraints.allows(word("brace")));
        // ...but words with 'c' elsewhere survive, given the other constraints.
        assert!(constraints.allows(word("crane")));
    }

    #[test]
    fn key_is_order_independent() {
        let forward = observe_all(&[("crane", "trace"), ("crane", "slate"), ("crane", "raise")]);
        let backward = observe_all(&[("crane", "raise"), ("crane", "slate"), ("crane", "trace")]);
        assert_eq!(forward.key(), backward.key());
    }

    #[test]
    fn constraints_narrow_monotonically() {
        let corpus = crate::corpus::WordCorpus::sample();
        let secret = word("crane");
        let guesses = ["slate", "raise", "trace"];

        let mut constraints = Constraints::new();
        let mut previous = constraints.filter_candidates(corpus.allowed());

        for guess in guesses {
            let guess = word(guess);
            constraints.observe(guess, score_guess(secret, guess));
            let current = constraints.filter_candidates(corpus.allowed());

            assert!(current.len() <= previous.len());
            for candidate in &current {
                assert!(previous.contains(candidate));
            }
            previous = current;
        }
    }

    #[test]
    fn duplicate_semantics_do_not_mark_letter_absent() {
        // Secret "crane": "geese" has one Correct 'e' and two Absent 'e's.
        // The letter must not land in the global absent set.
        let constraints = observe_all(&[("crane", "geese")]);
        assert!(constraints.allows(word("crane")));
    }

    #[test]
    fn initial_key_is_stable() {
        assert_eq!(StateKey::initial(), Constraints::new().key());
    }
}
