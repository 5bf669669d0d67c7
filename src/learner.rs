//! Linear action-value approximation over sparse indicator features.
//!
//! `Q(s, a) = Σ w[f] · v_f` for the features the extractor emits for
//! `(s, a)`. Weights default to zero and are updated by TD(0) with an
//! undiscounted target and a `1 / sqrt(n + 10)` step size, where `n` counts
//! the decisions the learner has been asked for.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{LeducError, LeducResult};
use crate::game_state::Action;
use crate::policy::{Observation, Policy, Transition};

/// Which state attributes the features are keyed on. Each set includes the
/// ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// Discretised hand strength.
    Strength,
    /// Strength and pot size.
    Pot,
    /// Strength, pot size and betting round.
    Round,
}

impl FeatureSet {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureSet::Strength => "strength",
            FeatureSet::Pot => "strength+pot",
            FeatureSet::Round => "strength+pot+round",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature {
    pub strength: u8,
    pub pot: Option<u32>,
    pub round: Option<usize>,
    pub action: Action,
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    set: FeatureSet,
    buckets: u8,
}

impl FeatureExtractor {
    pub fn new(set: FeatureSet, buckets: u8) -> FeatureExtractor {
        FeatureExtractor {
            set,
            buckets: buckets.max(1),
        }
    }

    pub fn set(&self) -> FeatureSet {
        self.set
    }

    /// Percentile rounded to the nearest of `buckets` steps.
    pub fn bucket(&self, strength: f64) -> u8 {
        (strength.clamp(0.0, 1.0) * self.buckets as f64).round() as u8
    }

    pub fn extract(&self, observation: &Observation, action: Action) -> Vec<(Feature, f64)> {
        let with_pot = matches!(self.set, FeatureSet::Pot | FeatureSet::Round);
        let with_round = self.set == FeatureSet::Round;
        let feature = Feature {
            strength: self.bucket(observation.strength),
            pot: with_pot.then_some(observation.pot),
            round: with_round.then_some(observation.round),
            action,
        };
        vec![(feature, 1.0)]
    }
}

#[derive(Debug, Clone)]
pub struct QLearner {
    extractor: FeatureExtractor,
    weights: HashMap<Feature, f64>,
    exploration: f64,
    decisions: u64,
}

impl QLearner {
    pub fn new(extractor: FeatureExtractor, exploration: f64) -> QLearner {
        QLearner {
            extractor,
            weights: HashMap::new(),
            exploration,
            decisions: 0,
        }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn weights(&self) -> &HashMap<Feature, f64> {
        &self.weights
    }

    pub fn weight(&self, feature: &Feature) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    pub fn set_exploration(&mut self, exploration: f64) {
        self.exploration = exploration.clamp(0.0, 1.0);
    }

    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    pub fn step_size(&self) -> f64 {
        1.0 / (self.decisions as f64 + 10.0).sqrt()
    }

    pub fn q_value(&self, observation: &Observation, action: Action) -> f64 {
        self.extractor
            .extract(observation, action)
            .iter()
            .map(|(f, v)| self.weight(f) * v)
            .sum()
    }

    /// `max_a Q(s, a)` over the legal actions, 0 when there are none.
    pub fn max_q(&self, observation: &Observation) -> f64 {
        observation
            .legal
            .iter()
            .map(|&a| self.q_value(observation, a))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Greedy action; ties go to whichever comes first in a shuffled order.
    pub fn best_action(&self, observation: &Observation, rng: &mut dyn RngCore) -> LeducResult<Action> {
        let mut order = observation.legal.clone();
        order.shuffle(rng);
        let mut best: Option<(Action, f64)> = None;
        for action in order {
            let q = self.q_value(observation, action);
            if best.map_or(true, |(_, b)| q > b) {
                best = Some((action, q));
            }
        }
        best.map(|(a, _)| a).ok_or(LeducError::NoLegalActions)
    }

    pub fn update(&mut self, transition: &Transition) {
        let future = transition.next.as_ref().map_or(0.0, |next| self.max_q(next));
        let target = transition.reward + future;
        let delta = target - self.q_value(&transition.state, transition.action);
        let eta = self.step_size();

        for (feature, value) in self.extractor.extract(&transition.state, transition.action) {
            *self.weights.entry(feature).or_insert(0.0) += eta * delta * value;
        }
        log::trace!(
            "td update {:<6} reward {:>6.2} delta {:>8.4} eta {:.4}",
            transition.action.as_str(),
            transition.reward,
            delta,
            eta
        );
    }
}

impl Policy for QLearner {
    fn name(&self) -> &str {
        "q-learner"
    }

    fn decide(&mut self, observation: &Observation, rng: &mut dyn RngCore) -> LeducResult<Action> {
        self.decisions += 1;
        if rng.gen::<f64>() < self.exploration {
            return observation
                .legal
                .choose(rng)
                .copied()
                .ok_or(LeducError::NoLegalActions);
        }
        self.best_action(observation, rng)
    }

    fn learn(&mut self, transition: &Transition) {
        self.update(transition);
    }
}
