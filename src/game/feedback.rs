//! Per-letter feedback and guess scoring

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::{ALPHABET, WORD_LEN, Word};

/// Classification of one guess letter against the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterFeedback {
    /// Right letter, right position.
    Correct,
    /// Letter occurs in the secret, but not at this position.
    Present,
    /// Letter does not occur in the secret (beyond already-matched copies).
    Absent,
}

/// Ordered per-position feedback for a full guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuessResult(pub [LetterFeedback; WORD_LEN]);

impl GuessResult {
    /// Whether every position is [`LetterFeedback::Correct`].
    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|&f| f == LetterFeedback::Correct)
    }

    /// Number of exact-position matches.
    pub fn correct_count(&self) -> usize {
        self.0
            .iter()
            .filter(|&&f| f == LetterFeedback::Correct)
            .count()
    }

    /// Feedback at `position`.
    pub fn at(&self, position: usize) -> LetterFeedback {
        self.0[position]
    }
}

impl fmt::Display for GuessResult {
    /// Compact rendering: `G` correct, `Y` present, `-` absent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for feedback in &self.0 {
            let c = match feedback {
                LetterFeedback::Correct => 'G',
                LetterFeedback::Present => 'Y',
                LetterFeedback::Absent => '-',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Score a guess against the secret, per Wordle rules.
///
/// Exact matches are marked first and consume their copy of the letter in the
/// secret. Remaining guess letters are then scanned left to right: each is
/// [`LetterFeedback::Present`] only while unmatched copies of that letter
/// remain in the secret, and [`LetterFeedback::Absent`] afterwards. This is
/// the duplicate-letter disambiguation rule: a letter guessed twice against a
/// secret holding it once yields one Correct-or-Present and one Absent.
pub fn score_guess(secret: Word, guess: Word) -> GuessResult {
    let secret_letters = secret.letters();
    let guess_letters = guess.letters();

    let mut result = [LetterFeedback::Absent; WORD_LEN];
    let mut unmatched = [0u8; ALPHABET];

    for position in 0..WORD_LEN {
        if guess_letters[position] == secret_letters[position] {
            result[position] = LetterFeedback::Correct;
        } else {
            unmatched[(secret_letters[position] - b'a') as usize] += 1;
        }
    }

    for position in 0..WORD_LEN {
        if result[position] == LetterFeedback::Correct {
            continue;
        }
        let letter = (guess_letters[position] - b'a') as usize;
        if unmatched[letter] > 0 {
            result[position] = LetterFeedback::Present;
            unmatched[letter] -= 1;
        }
    }

    GuessResult(result)
}
