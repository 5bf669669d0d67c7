//! Plays one hand between two policies and feeds the learning seat.
//!
//! The learning seat only sees its own decisions, but the other seat and the
//! dealer act in between. Its last `(observation, action)` is held until
//! either control comes back to it, completing the transition with reward 0
//! and the new observation, or the hand ends, completing it with the hand's
//! payoff and no successor.

use rand::RngCore;
use serde::Serialize;

use crate::cards::Card;
use crate::error::LeducResult;
use crate::engine::GameEngine;
use crate::game_state::{Action, Actor, GameState, Resolution, Seat};
use crate::policy::{Foresight, Observation, Policy, Transition};

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeOutcome {
    /// Seat 1's chip delta.
    pub payoff: i32,
    /// The learning seat's terminal reward, if a seat was learning.
    pub reward: Option<f64>,
    pub resolution: Resolution,
    pub hands: [Vec<Card>; 2],
    pub board: Vec<Card>,
    pub log: Vec<(Actor, Action)>,
    /// Stacks after the pot is awarded.
    pub settled_stacks: [u32; 2],
}

impl EpisodeOutcome {
    /// Payoff from `seat`'s point of view.
    pub fn payoff_for(&self, seat: Seat) -> i32 {
        match seat {
            Seat::One => self.payoff,
            Seat::Two => -self.payoff,
        }
    }
}

struct PendingTransition {
    observation: Observation,
    action: Action,
}

impl PendingTransition {
    fn complete(self, reward: f64, next: Option<Observation>) -> Transition {
        Transition {
            state: self.observation,
            action: self.action,
            reward,
            next,
        }
    }
}

fn observe(
    engine: &GameEngine,
    state: &mut GameState,
    seat: Seat,
    legal: Vec<Action>,
    foresight: bool,
) -> LeducResult<Observation> {
    let observation = Observation::new(state, seat, legal)?;
    if !foresight {
        return Ok(observation);
    }
    let final_board = engine.peek_future_board(state)?;
    Ok(observation.with_foresight(Foresight {
        opponent_hand: state.hand(seat.other()).to_vec(),
        final_board,
    }))
}

/// Runs `state` to the end of the hand. `players` is indexed by seat.
///
/// An illegal action from either player aborts the hand with
/// `LeducError::InvalidAction`.
pub fn run_episode(
    engine: &GameEngine,
    mut state: GameState,
    mut players: [&mut dyn Policy; 2],
    learner: Option<Seat>,
    rng: &mut dyn RngCore,
) -> LeducResult<EpisodeOutcome> {
    let mut pending: Option<PendingTransition> = None;
    let mut log = Vec::new();

    while !engine.is_terminal(&state) {
        let actor = state.actor();
        let legal = engine.legal_actions(&state)?;

        let action = match actor {
            Actor::Dealer => Action::RevealCards,
            Actor::Seat(seat) => {
                let player = &mut players[seat.index()];
                let observation = observe(engine, &mut state, seat, legal, player.wants_foresight())?;

                let learning = learner == Some(seat);
                if learning {
                    if let Some(previous) = pending.take() {
                        player.learn(&previous.complete(0.0, Some(observation.clone())));
                    }
                }

                let action = player.decide(&observation, rng)?;
                if learning {
                    pending = Some(PendingTransition { observation, action });
                }
                action
            }
        };

        engine.step(&mut state, action)?;
        log.push((actor, action));
    }

    let payoff = engine.payoff(&state)?;
    let resolution = engine.resolution(&state)?;
    let reward = learner.map(|seat| match seat {
        Seat::One => payoff as f64,
        Seat::Two => -payoff as f64,
    });

    if let (Some(seat), Some(reward)) = (learner, reward) {
        if let Some(last) = pending.take() {
            players[seat.index()].learn(&last.complete(reward, None));
        }
    }

    let start = [state.starting_stack(Seat::One), state.starting_stack(Seat::Two)];
    let settled_stacks = [
        (start[0] as i64 + payoff as i64).max(0) as u32,
        (start[1] as i64 - payoff as i64).max(0) as u32,
    ];

    Ok(EpisodeOutcome {
        payoff,
        reward,
        resolution,
        hands: [
            state.hand(Seat::One).to_vec(),
            state.hand(Seat::Two).to_vec(),
        ],
        board: state.community_cards().to_vec(),
        log,
        settled_stacks,
    })
}
