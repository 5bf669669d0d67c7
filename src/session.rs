use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use crate::config::{GameConfig, SessionConfig};
use crate::engine::GameEngine;
use crate::error::LeducResult;
use crate::game_state::{Resolution, Seat};
use crate::learner::{FeatureExtractor, QLearner};
use crate::play::{run_episode, EpisodeOutcome};
use crate::policy::{Policy, RandomPolicy};

/// Stacks each new hand starts from.
#[derive(Debug, Clone)]
pub struct StackBook {
    initial: [u32; 2],
    current: [u32; 2],
    carry: bool,
}

impl StackBook {
    pub fn new(config: &GameConfig) -> StackBook {
        StackBook {
            initial: config.starting_stacks,
            current: config.starting_stacks,
            carry: config.carry_stacks,
        }
    }

    pub fn current(&self) -> [u32; 2] {
        self.current
    }

    /// Records a finished hand. A seat left with nothing rebuys.
    pub fn settle(&mut self, outcome: &EpisodeOutcome) {
        if !self.carry {
            return;
        }
        self.current = outcome.settled_stacks;
        for seat in Seat::ALL {
            let i = seat.index();
            if self.current[i] == 0 {
                log::debug!("{} busted, rebuying for {}", seat, self.initial[i]);
                self.current[i] = self.initial[i];
            }
        }
    }
}

pub fn running_mean(payoffs: &[i32]) -> Vec<f64> {
    payoffs
        .iter()
        .scan(0i64, |total, &p| {
            *total += p as i64;
            Some(*total)
        })
        .enumerate()
        .map(|(i, total)| total as f64 / (i + 1) as f64)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PayoffSummary {
    pub episodes: usize,
    pub mean: f64,
    pub total: i64,
    pub wins: usize,
    pub losses: usize,
    /// Hands that ended in a fold by either seat.
    pub folds: usize,
}

impl PayoffSummary {
    pub fn from_outcomes(outcomes: &[EpisodeOutcome], seat: Seat) -> PayoffSummary {
        let payoffs: Vec<i32> = outcomes.iter().map(|o| o.payoff_for(seat)).collect();
        let total: i64 = payoffs.iter().map(|&p| p as i64).sum();
        PayoffSummary {
            episodes: payoffs.len(),
            mean: if payoffs.is_empty() { 0.0 } else { total as f64 / payoffs.len() as f64 },
            total,
            wins: payoffs.iter().filter(|&&p| p > 0).count(),
            losses: payoffs.iter().filter(|&&p| p < 0).count(),
            folds: outcomes
                .iter()
                .filter(|o| !matches!(o.resolution, Resolution::Showdown { .. }))
                .count(),
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub config: SessionConfig,
    pub training: PayoffSummary,
    pub evaluation: PayoffSummary,
    pub baseline: PayoffSummary,
    /// Learner payoffs per training episode.
    pub training_payoffs: Vec<i32>,
    pub evaluation_payoffs: Vec<i32>,
    pub weights: usize,
}

impl SessionReport {
    /// Evaluation mean minus the random-policy baseline mean.
    pub fn edge(&self) -> f64 {
        self.evaluation.mean - self.baseline.mean
    }
}

/// Plays `hands` hands between two fixed policies and returns the outcomes.
pub fn play_match(
    engine: &GameEngine,
    seat1: &mut dyn Policy,
    seat2: &mut dyn Policy,
    hands: usize,
    rng: &mut dyn RngCore,
) -> LeducResult<Vec<EpisodeOutcome>> {
    let mut stacks = StackBook::new(engine.config());
    let mut outcomes = Vec::with_capacity(hands);
    for _ in 0..hands {
        let state = engine.new_hand(stacks.current(), rng)?;
        let outcome = run_episode(engine, state, [&mut *seat1, &mut *seat2], None, rng)?;
        stacks.settle(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// A learner seated against a fixed opponent, sharing one seeded RNG.
pub struct Session {
    config: SessionConfig,
    engine: GameEngine,
    learner: QLearner,
    opponent: Box<dyn Policy>,
    rng: StdRng,
    stacks: StackBook,
}

impl Session {
    pub fn new(config: SessionConfig) -> LeducResult<Session> {
        config.validate()?;
        let engine = GameEngine::new(config.game.clone())?;
        let extractor = FeatureExtractor::new(config.features, config.buckets);
        Ok(Session {
            learner: QLearner::new(extractor, config.exploration),
            opponent: config.opponent.build(),
            rng: StdRng::seed_from_u64(config.seed),
            stacks: StackBook::new(&config.game),
            engine,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn learner(&self) -> &QLearner {
        &self.learner
    }

    fn learner_episode(&mut self, learning: bool) -> LeducResult<EpisodeOutcome> {
        let seat = self.config.learner_seat;
        let state = self.engine.new_hand(self.stacks.current(), &mut self.rng)?;
        let learner: &mut dyn Policy = &mut self.learner;
        let opponent: &mut dyn Policy = self.opponent.as_mut();
        let players = match seat {
            Seat::One => [learner, opponent],
            Seat::Two => [opponent, learner],
        };
        let outcome = run_episode(
            &self.engine,
            state,
            players,
            learning.then_some(seat),
            &mut self.rng,
        )?;
        self.stacks.settle(&outcome);
        Ok(outcome)
    }

    pub fn train(&mut self, episodes: usize) -> LeducResult<Vec<EpisodeOutcome>> {
        let seat = self.config.learner_seat;
        log::info!(
            "training {} episodes as {} vs {} (epsilon {:.2}, features {})",
            episodes,
            seat,
            self.opponent.name(),
            self.learner.exploration(),
            self.learner.extractor().set().as_str()
        );
        let mut outcomes = Vec::with_capacity(episodes);
        let mut total = 0i64;
        for i in 1..=episodes {
            let outcome = self.learner_episode(true)?;
            total += outcome.payoff_for(seat) as i64;
            outcomes.push(outcome);
            if self.config.log_every > 0 && i % self.config.log_every == 0 {
                log::debug!(
                    "{:>8} episodes  running mean {:>8.4}  weights {}",
                    i,
                    total as f64 / i as f64,
                    self.learner.weights().len()
                );
            }
        }
        Ok(outcomes)
    }

    /// Greedy rollouts; exploration is turned off and stays off.
    pub fn evaluate(&mut self, episodes: usize) -> LeducResult<Vec<EpisodeOutcome>> {
        self.learner.set_exploration(0.0);
        log::info!("evaluating {} episodes with exploration off", episodes);
        (0..episodes).map(|_| self.learner_episode(false)).collect()
    }

    /// A uniform-random player in the learner's seat against the same opponent.
    pub fn baseline(&mut self, episodes: usize) -> LeducResult<Vec<EpisodeOutcome>> {
        let mut random = RandomPolicy;
        let outcomes = match self.config.learner_seat {
            Seat::One => play_match(&self.engine, &mut random, self.opponent.as_mut(), episodes, &mut self.rng),
            Seat::Two => play_match(&self.engine, self.opponent.as_mut(), &mut random, episodes, &mut self.rng),
        }?;
        Ok(outcomes)
    }

    pub fn run(&mut self) -> LeducResult<SessionReport> {
        let seat = self.config.learner_seat;
        let training = self.train(self.config.episodes)?;
        let evaluation = self.evaluate(self.config.eval_episodes)?;
        let baseline = self.baseline(self.config.eval_episodes)?;

        let report = SessionReport {
            config: self.config.clone(),
            training: PayoffSummary::from_outcomes(&training, seat),
            evaluation: PayoffSummary::from_outcomes(&evaluation, seat),
            baseline: PayoffSummary::from_outcomes(&baseline, seat),
            training_payoffs: training.iter().map(|o| o.payoff_for(seat)).collect(),
            evaluation_payoffs: evaluation.iter().map(|o| o.payoff_for(seat)).collect(),
            weights: self.learner.weights().len(),
        };
        log::info!(
            "evaluation mean {:.4} vs baseline {:.4} ({} weights)",
            report.evaluation.mean,
            report.baseline.mean,
            report.weights
        );
        Ok(report)
    }
}
