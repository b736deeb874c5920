//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{corpus::Word, state::StateKey};

/// The action half of a value-table key.
///
/// Two representations are supported, chosen per agent: the literal guessed
/// word (tractable once candidates are pre-filtered to consistent words), or
/// the index of the selection heuristic that produced the guess (a coarse,
/// fixed-size action space). The representation materially affects table size
/// and convergence, so it is explicit rather than implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    /// The guess itself.
    Word(Word),
    /// Index into the agent's strategy table.
    Strategy(u8),
}

/// Q-table mapping (state, action) pairs to value estimates
///
/// Unseen pairs read as 0.0. The table only ever grows during training; it is
/// never pruned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QTable {
    /// Value estimates: (state key, action key) -> Q-value
    values: HashMap<(StateKey, ActionKey), f64>,
    /// Visit counts per state, tracked during training
    visits: HashMap<StateKey, u64>,
}

/// Aggregate table statistics reported after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStats {
    pub entries: usize,
    pub states_visited: usize,
    pub total_visits: u64,
    pub avg_visits_per_state: f64,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from an external key-value representation.
    ///
    /// The serialization format is the collaborator's concern; the core only
    /// consumes the decoded entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((StateKey, ActionKey), f64)>,
    {
        Self {
            values: entries.into_iter().collect(),
            visits: HashMap::new(),
        }
    }

    /// Get the value estimate for a state-action pair
    pub fn get(&self, state: &StateKey, action: ActionKey) -> f64 {
        self.values
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set the value estimate for a state-action pair
    pub fn set(&mut self, state: StateKey, action: ActionKey, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Maximum value estimate over the given actions in a state
    ///
    /// Unseen actions contribute their 0.0 default. An empty action set
    /// yields 0.0, matching the terminal-state bootstrap.
    pub fn max_q(&self, state: &StateKey, actions: impl IntoIterator<Item = ActionKey>) -> f64 {
        let mut max: Option<f64> = None;
        for action in actions {
            let value = self.get(state, action);
            max = Some(max.map_or(value, |m: f64| m.max(value)));
        }
        max.unwrap_or(0.0)
    }

    /// Apply one temporal difference update and return the applied delta.
    ///
    /// `bootstrap` is the successor value term: `max_a' Q(s',a')` for
    /// Q-learning, `Q(s',a')` of the actually-selected next action for SARSA,
    /// and 0.0 on terminal transitions.
    ///
    /// Q(s,a) <- Q(s,a) + alpha * (r + gamma * bootstrap - Q(s,a))
    pub fn td_update(
        &mut self,
        state: StateKey,
        action: ActionKey,
        reward: f64,
        bootstrap: f64,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let current = self.get(&state, action);
        let td_target = reward + gamma * bootstrap;
        let td_error = td_target - current;
        let delta = alpha * td_error;
        self.set(state, action, current + delta);
        delta
    }

    /// Increment the visit count of a state
    pub fn visit(&mut self, state: &StateKey) {
        *self.visits.entry(state.clone()).or_insert(0) += 1;
    }

    /// Number of stored (state, action) values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored entries
    pub fn entries(&self) -> impl Iterator<Item = (&(StateKey, ActionKey), &f64)> {
        self.values.iter()
    }

    /// Deep copy of the current values, for convergence measurement
    pub fn snapshot(&self) -> HashMap<(StateKey, ActionKey), f64> {
        self.values.clone()
    }

    /// Root-mean-square change against an earlier snapshot.
    ///
    /// The comparison runs over the union of keys; entries missing on either
    /// side read as 0.0, matching the table's default.
    pub fn rms_delta(&self, snapshot: &HashMap<(StateKey, ActionKey), f64>) -> f64 {
        let mut sum_squares = 0.0;
        let mut count = 0usize;

        for (key, &value) in &self.values {
            let previous = snapshot.get(key).copied().unwrap_or(0.0);
            sum_squares += (value - previous) * (value - previous);
            count += 1;
        }
        for (key, &previous) in snapshot {
            if !self.values.contains_key(key) {
                sum_squares += previous * previous;
                count += 1;
            }
        }

        if count == 0 {
            0.0
        } else {
            (sum_squares / count as f64).sqrt()
        }
    }

    /// Aggregate statistics over the table
    pub fn stats(&self) -> TableStats {
        let total_visits: u64 = self.visits.values().sum();
        let states_visited = self.visits.len();
        TableStats {
            entries: self.values.len(),
            states_visited,
            total_visits,
            avg_visits_per_state: if states_visited == 0 {
                0.0
            } else {
                total_visits as f64 / states_visited as f64
            },
        }
    }

    /// Reset all values and visit counts
    pub fn reset(&mut self) {
        self.values.clear();
        self.visits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(tag: &str) -> StateKey {
        StateKey::from(tag.to_string())
    }

    fn action(index: u8) -> ActionKey {
        ActionKey::Strategy(index)
    }

    #[test]
    fn unseen_pairs_default_to_zero() {
        let table = QTable::new();
        assert_eq!(table.get(&state("s0"), action(0)), 0.0);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut table = QTable::new();
        table.set(state("s0"), action(2), 1.5);
        assert_eq!(table.get(&state("s0"), action(2)), 1.5);
    }

    #[test]
    fn max_q_over_actions() {
        let mut table = QTable::new();
        table.set(state("s0"), action(0), 0.5);
        table.set(state("s0"), action(1), 1.5);
        table.set(state("s0"), action(2), 0.8);

        let max = table.max_q(&state("s0"), (0..3).map(action));
        assert_eq!(max, 1.5);
    }

    #[test]
    fn td_update_moves_toward_target() {
        let mut table = QTable::new();
        // Q(s,a) = 0 + 0.5 * (1.0 + 0.9 * 2.0 - 0.0) = 1.4
        let delta = table.td_update(state("s0"), action(0), 1.0, 2.0, 0.5, 0.9);
        assert!((delta - 1.4).abs() < 1e-12);
        assert!((table.get(&state("s0"), action(0)) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn rms_delta_against_snapshot() {
        let mut table = QTable::new();
        table.set(state("s0"), action(0), 1.0);
        let snapshot = table.snapshot();

        table.set(state("s0"), action(0), 2.0);
        table.set(state("s1"), action(0), 1.0);

        // Deltas: 1.0 (changed) and 1.0 (new entry) -> rms = 1.0
        assert!((table.rms_delta(&snapshot) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stats_track_visits() {
        let mut table = QTable::new();
        table.visit(&state("s0"));
        table.visit(&state("s0"));
        table.visit(&state("s1"));

        let stats = table.stats();
        assert_eq!(stats.states_visited, 2);
        assert_eq!(stats.total_visits, 3);
        assert!((stats.avg_visits_per_state - 1.5).abs() < 1e-12);
    }

    #[test]
    fn from_entries_rebuilds_values() {
        let entries = vec![((state("s0"), action(0)), 0.25)];
        let table = QTable::from_entries(entries);
        assert_eq!(table.get(&state("s0"), action(0)), 0.25);
        assert_eq!(table.len(), 1);
    }
}
