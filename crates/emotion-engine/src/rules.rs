//! Rule evaluators and voting
//!
//! Three independent heuristics each map one window's spectral features to an
//! emotional state. The state with the most votes wins; ties go to the state
//! declared first.

use crate::state::EmotionalState;
use feature_engine::SpectralFeatures;
use serde::{Deserialize, Serialize};

/// Number of rule evaluators taking part in a vote
pub const VOTER_COUNT: usize = 3;

/// Breathing-band heuristic on the fundamental frequency and volume
pub fn breathing_band_vote(features: &SpectralFeatures) -> EmotionalState {
    if features.fundamental_frequency < 0.5 {
        EmotionalState::Relaxed
    } else if features.fundamental_frequency > 2.0 {
        EmotionalState::Excited
    } else if features.volume_level > 0.7 {
        EmotionalState::Stressed
    } else {
        EmotionalState::Calm
    }
}

/// Rhythmic heuristic on tempo and zero-crossing rate
pub fn rhythmic_vote(features: &SpectralFeatures) -> EmotionalState {
    if features.tempo > 120.0 {
        EmotionalState::Excited
    } else if features.tempo < 80.0 {
        EmotionalState::Relaxed
    } else if features.zero_crossing_rate > 0.3 {
        EmotionalState::Focused
    } else {
        EmotionalState::Calm
    }
}

/// Spectral-shape heuristic on centroid and rolloff
pub fn spectral_vote(features: &SpectralFeatures) -> EmotionalState {
    if features.spectral_centroid > 2000.0 {
        EmotionalState::Focused
    } else if features.spectral_centroid < 500.0 {
        EmotionalState::Relaxed
    } else if features.spectral_rolloff > 4000.0 {
        EmotionalState::Excited
    } else {
        EmotionalState::Calm
    }
}

/// Outcome of one vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmotionVotes {
    pub breathing_band: EmotionalState,
    pub rhythmic: EmotionalState,
    pub spectral: EmotionalState,
}

impl EmotionVotes {
    /// Run all three evaluators
    pub fn evaluate(features: &SpectralFeatures) -> Self {
        Self {
            breathing_band: breathing_band_vote(features),
            rhythmic: rhythmic_vote(features),
            spectral: spectral_vote(features),
        }
    }

    /// Votes per state, indexed by declaration order
    pub fn tally(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for state in [self.breathing_band, self.rhythmic, self.spectral] {
            counts[state.index()] += 1;
        }
        counts
    }

    /// Votes cast for `state`
    pub fn votes_for(&self, state: EmotionalState) -> usize {
        self.tally()[state.index()]
    }

    /// State with the most votes, first in declaration order on ties
    pub fn winner(&self) -> EmotionalState {
        let counts = self.tally();
        let mut best = EmotionalState::Unknown;
        let mut best_count = 0;
        for state in EmotionalState::ALL {
            if counts[state.index()] > best_count {
                best = state;
                best_count = counts[state.index()];
            }
        }
        best
    }

    /// Vote margin: `(top - runner_up) / VOTER_COUNT`.
    ///
    /// Unanimous votes give 1.0, a 2-1 split gives 1/3 and a three-way split gives 0.
    pub fn confidence(&self) -> f64 {
        let mut counts = self.tally();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        (counts[0] - counts[1]) as f64 / VOTER_COUNT as f64
    }
}
