//! Serialization support for trained agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
    sync::Arc,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    agent::tabular::{TabularAgent, TabularAgentState},
    corpus::{FrequencyTables, WordCorpus},
};

/// Versioned on-disk representation of a trained agent.
///
/// The corpus and frequency tables are not embedded; a loaded agent is
/// re-attached to the corpus the caller provides, which must match the one
/// used for training for the learned values to be meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    state: TabularAgentState,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &TabularAgent) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
        }
    }

    /// Reconstruct the agent over the given corpus.
    pub fn into_agent(
        self,
        corpus: Arc<WordCorpus>,
        tables: Arc<FrequencyTables>,
    ) -> Result<TabularAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported agent save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(TabularAgent::from_state(self.state, corpus, tables))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agent::tabular::{ActionSpace, Hyperparameters, RewardScheme, UpdateRule},
        corpus::Word,
        game::{GameRules, WordleEnvironment},
        strategy::Strategy,
    };

    fn trained_agent() -> (TabularAgent, Arc<WordCorpus>, Arc<FrequencyTables>) {
        let corpus = Arc::new(WordCorpus::sample());
        let tables = Arc::new(FrequencyTables::from_corpus(&corpus));

        let mut agent = TabularAgent::new(
            UpdateRule::QLearning,
            Hyperparameters::default(),
            RewardScheme::shaped(),
            Strategy::Educated,
            ActionSpace::default_strategy_table(),
            corpus.clone(),
            tables.clone(),
        )
        .unwrap()
        .with_seed(21);

        let mut env = WordleEnvironment::new(corpus.clone(), GameRules::default()).with_seed(21);
        env.reset(Some(Word::parse("crane").unwrap())).unwrap();
        agent.play_episode(&mut env, true).unwrap();

        (agent, corpus, tables)
    }

    #[test]
    fn roundtrip_preserves_table() {
        let (agent, corpus, tables) = trained_agent();
        assert!(!agent.table().is_empty());

        let saved = SavedAgent::from_agent(&agent);
        let bytes = rmp_serde::to_vec(&saved).unwrap();
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes).unwrap();
        let restored = loaded.into_agent(corpus, tables).unwrap();

        assert_eq!(restored.table().len(), agent.table().len());
        assert_eq!(restored.rule(), agent.rule());
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let (agent, corpus, tables) = trained_agent();
        let mut saved = SavedAgent::from_agent(&agent);
        saved.version = SavedAgent::VERSION + 1;
        assert!(saved.into_agent(corpus, tables).is_err());
    }
}
