//! Breathing state and pattern enumerations

use serde::{Deserialize, Serialize};

/// Instantaneous breathing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BreathingState {
    Normal,
    Deep,
    Shallow,
    Rapid,
    Irregular,
    Holding,
    #[default]
    Unknown,
}

impl BreathingState {
    /// All states in declaration order
    pub const ALL: [BreathingState; 7] = [
        BreathingState::Normal,
        BreathingState::Deep,
        BreathingState::Shallow,
        BreathingState::Rapid,
        BreathingState::Irregular,
        BreathingState::Holding,
        BreathingState::Unknown,
    ];
}

/// Breathing pattern inferred from the rate history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BreathingPattern {
    Regular,
    Irregular,
    Cyclical,
    Stressed,
    Exercise,
    Relaxed,
    #[default]
    Unknown,
}

impl BreathingPattern {
    /// All patterns in declaration order
    pub const ALL: [BreathingPattern; 7] = [
        BreathingPattern::Regular,
        BreathingPattern::Irregular,
        BreathingPattern::Cyclical,
        BreathingPattern::Stressed,
        BreathingPattern::Exercise,
        BreathingPattern::Relaxed,
        BreathingPattern::Unknown,
    ];
}

/// Most frequent value of `items`, first in `order` on ties; `None` when empty
pub(crate) fn most_common<T, I>(order: &[T], items: I) -> Option<T>
where
    T: Copy + PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut counts = vec![0usize; order.len()];
    for item in items {
        if let Some(slot) = order.iter().position(|candidate| *candidate == item) {
            counts[slot] += 1;
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (candidate, &count) in order.iter().zip(counts.iter()) {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((*candidate, count));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unknown() {
        assert_eq!(BreathingState::default(), BreathingState::Unknown);
        assert_eq!(BreathingPattern::default(), BreathingPattern::Unknown);
    }

    #[test]
    fn test_most_common_tie_break() {
        use BreathingState::*;
        assert_eq!(most_common(&BreathingState::ALL, [Rapid, Deep, Rapid]), Some(Rapid));
        assert_eq!(most_common(&BreathingState::ALL, [Holding, Shallow]), Some(Shallow));
        assert_eq!(most_common(&BreathingState::ALL, Vec::new()), None);
    }
}
