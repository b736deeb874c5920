//! Command-line interface
//!
//! The CLI is a thin consumer of the core: it parses arguments, loads word
//! lists, wires observers, and prints summaries. All training and evaluation
//! logic lives in the library.

use std::path::Path;

use anyhow::{Result, bail};

use crate::corpus::WordCorpus;

pub mod commands;
pub mod output;

/// Load a corpus from answer/allowed word list files, falling back to the
/// built-in sample corpus when neither is given.
pub fn load_corpus(answers: Option<&Path>, words: Option<&Path>) -> Result<WordCorpus> {
    match (answers, words) {
        (Some(answers), Some(words)) => Ok(WordCorpus::from_files(answers, words)?),
        (None, None) => Ok(WordCorpus::sample()),
        _ => bail!("--answers and --words must be given together"),
    }
}
