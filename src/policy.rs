use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::equity::hand_strength;
use crate::error::{LeducError, LeducResult};
use crate::game_state::{Action, GameState, Seat};
use crate::hand_evaluator::evaluate;

/// What a seat can see when it is asked to act.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub seat: Seat,
    pub hand: Vec<Card>,
    pub community: Vec<Card>,
    /// Index of the current betting round (completed reveals).
    pub round: usize,
    pub pot: u32,
    pub to_call: u32,
    /// Percentile strength of `hand` on `community`.
    pub strength: f64,
    pub legal: Vec<Action>,
    pub foresight: Option<Foresight>,
}

/// Hidden information handed only to policies that ask for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Foresight {
    pub opponent_hand: Vec<Card>,
    pub final_board: Vec<Card>,
}

impl Observation {
    pub fn new(state: &GameState, seat: Seat, legal: Vec<Action>) -> LeducResult<Observation> {
        let hand = state.hand(seat).to_vec();
        let community = state.community_cards().to_vec();
        let strength = hand_strength(&hand, &community)?;
        Ok(Observation {
            seat,
            hand,
            community,
            round: state.reveals(),
            pot: state.pot(),
            to_call: state.to_call(seat),
            strength,
            legal,
            foresight: None,
        })
    }

    pub fn with_foresight(mut self, foresight: Foresight) -> Observation {
        self.foresight = Some(foresight);
        self
    }

    pub fn is_legal(&self, action: Action) -> bool {
        self.legal.contains(&action)
    }
}

/// One learner decision with its delayed consequence. `next` is `None` when
/// the hand ended before the learner acted again.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Observation,
    pub action: Action,
    pub reward: f64,
    pub next: Option<Observation>,
}

pub trait Policy {
    fn name(&self) -> &str;

    fn decide(&mut self, observation: &Observation, rng: &mut dyn RngCore) -> LeducResult<Action>;

    /// Whether the driver should attach `Foresight` to observations.
    fn wants_foresight(&self) -> bool {
        false
    }

    fn learn(&mut self, _transition: &Transition) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    Threshold,
    Oracle,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy),
            PolicyKind::Threshold => Box::new(ThresholdPolicy::default()),
            PolicyKind::Oracle => Box::new(OraclePolicy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Threshold => "threshold",
            PolicyKind::Oracle => "oracle",
        }
    }
}

/// First action in `preferences` that is legal, else the first legal action.
pub fn first_legal(preferences: &[Action], legal: &[Action]) -> LeducResult<Action> {
    preferences
        .iter()
        .find(|a| legal.contains(a))
        .or_else(|| legal.first())
        .copied()
        .ok_or(LeducError::NoLegalActions)
}

const AGGRESSIVE: [Action; 5] = [Action::Raise, Action::Bet, Action::Call, Action::Check, Action::Fold];
const CAUTIOUS: [Action; 5] = [Action::Check, Action::Call, Action::Bet, Action::Raise, Action::Fold];
const PASSIVE: [Action; 5] = [Action::Check, Action::Fold, Action::Call, Action::Bet, Action::Raise];

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, observation: &Observation, rng: &mut dyn RngCore) -> LeducResult<Action> {
        observation
            .legal
            .choose(rng)
            .copied()
            .ok_or(LeducError::NoLegalActions)
    }
}

/// Plays by percentile bands: aggressive above `high`, passive below `low`.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    pub low: f64,
    pub high: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy { low: 0.4, high: 0.7 }
    }
}

impl ThresholdPolicy {
    pub fn preferences(&self, strength: f64) -> &'static [Action] {
        if strength >= self.high {
            &AGGRESSIVE
        } else if strength >= self.low {
            &CAUTIOUS
        } else {
            &PASSIVE
        }
    }
}

impl Policy for ThresholdPolicy {
    fn name(&self) -> &str {
        "threshold"
    }

    fn decide(&mut self, observation: &Observation, _rng: &mut dyn RngCore) -> LeducResult<Action> {
        first_legal(self.preferences(observation.strength), &observation.legal)
    }
}

/// Sees the opponent's cards and the final board. Folds when it will lose
/// the showdown and otherwise plays as aggressively as allowed; only useful
/// as a ceiling to measure other policies against.
#[derive(Debug, Clone, Copy, Default)]
pub struct OraclePolicy;

impl Policy for OraclePolicy {
    fn name(&self) -> &str {
        "oracle"
    }

    fn wants_foresight(&self) -> bool {
        true
    }

    fn decide(&mut self, observation: &Observation, _rng: &mut dyn RngCore) -> LeducResult<Action> {
        let foresight = observation
            .foresight
            .as_ref()
            .ok_or(LeducError::MissingForesight)?;
        let mine = evaluate(&observation.hand, &foresight.final_board)?;
        let theirs = evaluate(&foresight.opponent_hand, &foresight.final_board)?;
        if mine > theirs {
            first_legal(&[Action::Fold, Action::Check, Action::Call], &observation.legal)
        } else {
            first_legal(&AGGRESSIVE, &observation.legal)
        }
    }
}
