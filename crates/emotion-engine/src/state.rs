//! Emotional state enumeration

use serde::{Deserialize, Serialize};

/// Detected emotional state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmotionalState {
    Calm,
    Excited,
    Stressed,
    Focused,
    Relaxed,
    #[default]
    Unknown,
}

impl EmotionalState {
    /// All states in declaration order (tie-break order for voting)
    pub const ALL: [EmotionalState; 6] = [
        EmotionalState::Calm,
        EmotionalState::Excited,
        EmotionalState::Stressed,
        EmotionalState::Focused,
        EmotionalState::Relaxed,
        EmotionalState::Unknown,
    ];

    /// Position in declaration order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Most frequent state in `states`, first in declaration order on ties.
    /// `Unknown` when `states` is empty.
    pub fn most_common<I>(states: I) -> EmotionalState
    where
        I: IntoIterator<Item = EmotionalState>,
    {
        let mut counts = [0usize; 6];
        for state in states {
            counts[state.index()] += 1;
        }

        let mut best = EmotionalState::Unknown;
        let mut best_count = 0;
        for state in Self::ALL {
            if counts[state.index()] > best_count {
                best = state;
                best_count = counts[state.index()];
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_declaration_order() {
        for (i, state) in EmotionalState::ALL.iter().enumerate() {
            assert_eq!(state.index(), i);
        }
    }

    #[test]
    fn test_most_common() {
        use EmotionalState::*;
        assert_eq!(EmotionalState::most_common([Relaxed, Calm, Relaxed]), Relaxed);
        // Tie goes to the earlier declared state
        assert_eq!(EmotionalState::most_common([Focused, Excited]), Excited);
        assert_eq!(EmotionalState::most_common(Vec::new()), Unknown);
    }
}
