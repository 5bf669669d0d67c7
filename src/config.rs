use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::DECK_SIZE;
use crate::error::{LeducError, LeducResult};
use crate::game_state::Seat;
use crate::learner::FeatureSet;
use crate::policy::PolicyKind;

/// Community cards on the table once `round_count` reveals have happened:
/// three on the first reveal, one on each after.
pub fn board_cards(round_count: usize) -> usize {
    match round_count {
        0 => 0,
        n => 3 + (n - 1),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub round_count: usize,
    pub hand_size: usize,
    pub starting_stacks: [u32; 2],
    /// Carry stacks from hand to hand instead of resetting them.
    pub carry_stacks: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            round_count: 2,
            hand_size: 1,
            starting_stacks: [100, 100],
            carry_stacks: false,
        }
    }
}

impl GameConfig {
    /// Cards a full hand consumes: both hands plus every reveal.
    pub fn cards_needed(&self) -> usize {
        2 * self.hand_size + board_cards(self.round_count)
    }

    pub fn validate(&self) -> LeducResult<()> {
        if self.round_count < 1 {
            return Err(LeducError::InvalidConfig("round_count must be at least 1".into()));
        }
        if self.hand_size < 1 {
            return Err(LeducError::InvalidConfig("hand_size must be at least 1".into()));
        }
        let total = u64::from(self.starting_stacks[0]) + u64::from(self.starting_stacks[1]);
        if total > i32::MAX as u64 {
            return Err(LeducError::InvalidConfig(format!(
                "starting stacks total {} chips, at most {} allowed",
                total,
                i32::MAX
            )));
        }
        let showdown = self.hand_size + board_cards(self.round_count);
        if showdown < 5 {
            return Err(LeducError::InvalidConfig(format!(
                "showdown needs 5 cards, hand_size {} with {} round(s) gives {}",
                self.hand_size, self.round_count, showdown
            )));
        }
        if self.cards_needed() > DECK_SIZE {
            return Err(LeducError::InvalidConfig(format!(
                "a hand needs {} cards but the deck holds {}",
                self.cards_needed(),
                DECK_SIZE
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub episodes: usize,
    pub eval_episodes: usize,
    pub exploration: f64,
    pub features: FeatureSet,
    pub buckets: u8,
    pub opponent: PolicyKind,
    pub learner_seat: Seat,
    pub seed: u64,
    /// Training episodes between running-mean log lines.
    pub log_every: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            game: GameConfig::default(),
            episodes: 5000,
            eval_episodes: 2000,
            exploration: 0.1,
            features: FeatureSet::Strength,
            buckets: 10,
            opponent: PolicyKind::Random,
            learner_seat: Seat::One,
            seed: 7,
            log_every: 1000,
        }
    }
}

impl SessionConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> LeducResult<SessionConfig> {
        let text = fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> LeducResult<()> {
        self.game.validate()?;
        if self.episodes < 1 {
            return Err(LeducError::InvalidConfig("episodes must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.exploration) {
            return Err(LeducError::InvalidConfig(format!(
                "exploration must be in [0, 1], got {}",
                self.exploration
            )));
        }
        if self.buckets < 1 {
            return Err(LeducError::InvalidConfig("buckets must be at least 1".into()));
        }
        Ok(())
    }
}
