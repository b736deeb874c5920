//! Properties of the feedback-constraint abstraction

use wordle_rl::{Constraints, Word, WordCorpus, game::score_guess};

fn word(s: &str) -> Word {
    Word::parse(s).unwrap()
}

fn history_for(secret: &str, guesses: &[&str]) -> Vec<(Word, wordle_rl::GuessResult)> {
    let secret = word(secret);
    guesses
        .iter()
        .map(|g| {
            let guess = word(g);
            (guess, score_guess(secret, guess))
        })
        .collect()
}

#[test]
fn every_history_permutation_yields_the_same_key() {
    let history = history_for("crane", &["slate", "raise", "trace", "adieu"]);

    // All 24 orderings of a fixed 4-guess history.
    let mut keys = std::collections::HashSet::new();
    let indices = [0usize, 1, 2, 3];
    for a in indices {
        for b in indices {
            for c in indices {
                for d in indices {
                    let mut picked = [a, b, c, d];
                    picked.sort_unstable();
                    if picked != indices {
                        continue;
                    }
                    let permuted: Vec<_> =
                        [a, b, c, d].iter().map(|&i| history[i]).collect();
                    keys.insert(Constraints::from_history(&permuted).key());
                }
            }
        }
    }
    assert_eq!(keys.len(), 1);
}

#[test]
fn candidate_sets_narrow_monotonically_across_an_episode() {
    let corpus = WordCorpus::sample();
    let secret = word("stare");
    let guesses = ["crane", "slate", "raise", "stare"];

    let mut constraints = Constraints::new();
    let mut previous = constraints.filter_candidates(corpus.allowed());

    for guess in guesses {
        let guess = word(guess);
        constraints.observe(guess, score_guess(secret, guess));
        let current = constraints.filter_candidates(corpus.allowed());

        assert!(
            current.len() <= previous.len(),
            "candidates grew after guessing {guess}"
        );
        for candidate in &current {
            assert!(
                previous.contains(candidate),
                "{candidate} appeared from nowhere after {guess}"
            );
        }
        previous = current;
    }
}

#[test]
fn the_secret_survives_every_filter() {
    let corpus = WordCorpus::sample();

    for &secret in corpus.answers().iter().take(10) {
        let mut constraints = Constraints::new();
        for &guess in corpus.allowed().iter().take(15) {
            constraints.observe(guess, score_guess(secret, guess));
            assert!(
                constraints.allows(secret),
                "constraints from honest feedback excluded the secret {secret}"
            );
        }
    }
}

#[test]
fn identical_constraints_from_different_guess_sets_share_a_key() {
    // Guessing the secret itself pins every position; the derived key must
    // not depend on which solved history produced it.
    let direct = Constraints::from_history(&history_for("crane", &["crane"]));
    let indirect = Constraints::from_history(&history_for("crane", &["crane", "crane"]));
    assert_eq!(direct.key(), indirect.key());
}
