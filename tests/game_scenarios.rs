//! End-to-end environment scenarios

use std::sync::Arc;

use wordle_rl::{
    Error, GameRules, LetterFeedback, Outcome, Word, WordCorpus, WordleEnvironment,
    game::score_guess,
};

fn word(s: &str) -> Word {
    Word::parse(s).unwrap()
}

fn environment() -> WordleEnvironment {
    WordleEnvironment::new(Arc::new(WordCorpus::sample()), GameRules::default()).with_seed(11)
}

#[test]
fn trace_against_crane_matches_expected_tags() {
    let mut env = environment();
    env.reset(Some(word("crane"))).unwrap();

    let step = env.step(word("trace")).unwrap();
    assert_eq!(
        step.feedback.0,
        [
            LetterFeedback::Absent,  // t
            LetterFeedback::Correct, // r
            LetterFeedback::Correct, // a
            LetterFeedback::Present, // c - single c in the secret, misplaced
            LetterFeedback::Correct, // e
        ]
    );
    assert!(!step.done);
    assert_eq!(env.guesses_remaining(), 5);
}

#[test]
fn robot_guessed_first_solves_in_one() {
    let mut env = environment();
    env.reset(Some(word("robot"))).unwrap();

    let step = env.step(word("robot")).unwrap();
    assert!(step.feedback.is_solved());
    assert_eq!(step.outcome, Some(Outcome::Solved));
    assert_eq!(env.guesses_used(), 1);
}

#[test]
fn six_misses_exhaust_the_episode_and_block_a_seventh() {
    let mut env = environment();
    env.reset(Some(word("crane"))).unwrap();

    for _ in 0..5 {
        let step = env.step(word("pound")).unwrap();
        assert!(!step.done);
    }
    let last = env.step(word("pound")).unwrap();
    assert!(last.done);
    assert_eq!(last.outcome, Some(Outcome::Exhausted));

    assert!(matches!(
        env.step(word("pound")),
        Err(Error::EpisodeTerminated)
    ));
    assert_eq!(env.guesses_used(), 6);
}

#[test]
fn guessing_the_secret_is_always_all_correct() {
    let corpus = WordCorpus::sample();
    for &secret in corpus.answers() {
        let result = score_guess(secret, secret);
        assert!(result.is_solved(), "{secret} did not score all-correct");
    }
}

#[test]
fn letters_missing_from_the_secret_score_absent_everywhere() {
    let corpus = WordCorpus::sample();
    for &secret in corpus.answers() {
        for &guess in corpus.allowed().iter().take(20) {
            let result = score_guess(secret, guess);
            for position in 0..5 {
                let letter = guess.letters()[position];
                if !secret.contains(letter) {
                    assert_eq!(
                        result.at(position),
                        LetterFeedback::Absent,
                        "secret {secret}, guess {guess}, position {position}"
                    );
                }
            }
        }
    }
}

#[test]
fn duplicate_letter_disambiguation_against_single_copy() {
    // "tales" holds one 'e'; "eerie" guesses three, none position-aligned.
    // Exactly one occurrence scores Present, the rest are Absent.
    let result = score_guess(word("tales"), word("eerie"));
    let e_positions = [0usize, 1, 4];
    let present = e_positions
        .iter()
        .filter(|&&p| result.at(p) == LetterFeedback::Present)
        .count();
    let absent = e_positions
        .iter()
        .filter(|&&p| result.at(p) == LetterFeedback::Absent)
        .count();
    assert_eq!(present, 1);
    assert_eq!(absent, 2);
}

#[test]
fn environment_is_deterministic_given_secret_and_guesses() {
    let guesses = ["slate", "raise", "crane"];

    let run = || {
        let mut env = environment();
        env.reset(Some(word("crane"))).unwrap();
        guesses
            .iter()
            .map(|g| env.step(word(g)).unwrap().feedback.to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
