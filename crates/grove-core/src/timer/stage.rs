//! Growth stage mapping.
//!
//! A session's progress is shown as a tree growing through a fixed sequence
//! of stages. The mapping is a pure function of the countdown; nothing here
//! is stored or persisted.

use serde::{Deserialize, Serialize};

/// Labels of the growth sequence, from freshly planted to fully grown.
pub const GROWTH_STAGES: [&str; 5] = ["seed", "sapling", "plant", "bigger plant", "tree"];

/// Number of growth stages (N).
pub const STAGE_COUNT: usize = GROWTH_STAGES.len();

const WILTED_LABEL: &str = "wilted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Index into [`GROWTH_STAGES`], always in `0..STAGE_COUNT`.
    Growth(usize),
    /// Terminal marker shown after an abandoned session.
    Wilted,
}

impl Stage {
    pub fn seed() -> Self {
        Stage::Growth(0)
    }

    pub fn fully_grown() -> Self {
        Stage::Growth(STAGE_COUNT - 1)
    }

    /// Growth index, or `None` for the wilted marker.
    pub fn index(self) -> Option<usize> {
        match self {
            Stage::Growth(i) => Some(i),
            Stage::Wilted => None,
        }
    }

    pub fn is_wilted(self) -> bool {
        self == Stage::Wilted
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Growth(i) => GROWTH_STAGES[i.min(STAGE_COUNT - 1)],
            Stage::Wilted => WILTED_LABEL,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::seed()
    }
}

/// Fraction of the session already elapsed, clamped to `0.0 ..= 1.0`.
///
/// A zero duration counts as fully elapsed.
pub fn progress(remaining_secs: u64, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return 1.0;
    }
    let remaining = remaining_secs.min(duration_secs);
    (1.0 - remaining as f64 / duration_secs as f64).clamp(0.0, 1.0)
}

/// Map the countdown onto a growth stage.
///
/// `index = floor(progress * (N - 1))`, computed in integers so that stage
/// boundaries always round down. The last stage is reached only when
/// `remaining_secs == 0`.
pub fn stage_for(remaining_secs: u64, duration_secs: u64) -> Stage {
    if duration_secs == 0 {
        return Stage::fully_grown();
    }
    let remaining = remaining_secs.min(duration_secs);
    let elapsed = u128::from(duration_secs - remaining);
    let steps = (STAGE_COUNT - 1) as u128;
    let index = (elapsed * steps / u128::from(duration_secs)) as usize;
    Stage::Growth(index.min(STAGE_COUNT - 1))
}

/// The stage shown after an abort.
pub fn wilted_stage() -> Stage {
    Stage::Wilted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_session_is_a_seed() {
        assert_eq!(stage_for(1500, 1500), Stage::seed());
    }

    #[test]
    fn final_stage_only_at_zero() {
        assert_eq!(stage_for(0, 1500), Stage::fully_grown());
        assert_eq!(stage_for(1, 1500), Stage::Growth(STAGE_COUNT - 2));
    }

    #[test]
    fn boundaries_round_down() {
        // 1500s over 4 steps: a new stage every 375s.
        assert_eq!(stage_for(1500 - 374, 1500), Stage::Growth(0));
        assert_eq!(stage_for(1500 - 375, 1500), Stage::Growth(1));
        assert_eq!(stage_for(750, 1500), Stage::Growth(2));
        assert_eq!(stage_for(376, 1500), Stage::Growth(2));
        assert_eq!(stage_for(375, 1500), Stage::Growth(3));
    }

    #[test]
    fn zero_duration_counts_as_done() {
        assert_eq!(stage_for(0, 0), Stage::fully_grown());
        assert_eq!(progress(10, 0), 1.0);
    }

    #[test]
    fn remaining_above_duration_is_clamped() {
        assert_eq!(stage_for(9000, 60), Stage::seed());
        assert_eq!(progress(9000, 60), 0.0);
    }

    #[test]
    fn labels() {
        assert_eq!(Stage::seed().label(), "seed");
        assert_eq!(Stage::fully_grown().label(), "tree");
        assert_eq!(wilted_stage().label(), "wilted");
        assert!(wilted_stage().index().is_none());
    }

    #[test]
    fn serializes_as_tagged_value() {
        assert_eq!(serde_json::to_string(&Stage::Growth(2)).unwrap(), r#"{"growth":2}"#);
        assert_eq!(serde_json::to_string(&Stage::Wilted).unwrap(), r#""wilted""#);
    }

    proptest! {
        #[test]
        fn monotonic_in_progress(duration in 1u64..100_000, a in 0u64..100_000, b in 0u64..100_000) {
            let (lo, hi) = (a.min(b).min(duration), a.max(b).min(duration));
            // Less remaining time means at least as much growth.
            let later = stage_for(lo, duration).index().unwrap();
            let earlier = stage_for(hi, duration).index().unwrap();
            prop_assert!(earlier <= later);
        }

        #[test]
        fn always_in_range(duration in 0u64..u64::MAX, remaining in 0u64..u64::MAX) {
            let index = stage_for(remaining, duration).index().unwrap();
            prop_assert!(index < STAGE_COUNT);
        }

        #[test]
        fn done_is_fully_grown(duration in 1u64..u64::MAX) {
            prop_assert_eq!(stage_for(0, duration), Stage::fully_grown());
        }
    }
}
