//! Fixed-limit two-seat betting engine.
//!
//! One hand moves through `Seat1ToAct -> Seat2ToAct -> DealerToAct` rounds
//! until either seat folds or the configured number of reveals has happened.
//! Hands start with an empty board: the first betting round is played blind,
//! the first dealer turn reveals three cards and each later one reveals one.

use std::cmp::Ordering;

use rand::RngCore;

use crate::cards::{Card, Deck};
use crate::config::{board_cards, GameConfig};
use crate::error::{LeducError, LeducResult};
use crate::game_state::{Action, Actor, GameState, Resolution, Seat};
use crate::hand_evaluator::compare_hands;

pub const BET_SIZE: u32 = 1;
/// Raise stake when seat 1 opened the round with a bet.
pub const RAISE_OVER_BET: u32 = 2;
pub const RAISE_OVER_CHECK: u32 = 1;

#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> LeducResult<GameEngine> {
        config.validate()?;
        Ok(GameEngine { config })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn new_hand(&self, stacks: [u32; 2], rng: &mut dyn RngCore) -> LeducResult<GameState> {
        self.new_hand_with_deck(Deck::shuffled(rng), stacks)
    }

    /// Deals from `deck` as given: seat 1's hand, seat 2's hand, then the reveals.
    pub fn new_hand_with_deck(&self, mut deck: Deck, stacks: [u32; 2]) -> LeducResult<GameState> {
        let needed = self.config.cards_needed();
        if deck.len() < needed {
            return Err(LeducError::NotEnoughDeck {
                requested: needed,
                available: deck.len(),
            });
        }
        let seat1 = deck.draw(self.config.hand_size)?;
        let seat2 = deck.draw(self.config.hand_size)?;
        Ok(GameState::new([seat1, seat2], stacks, deck))
    }

    pub fn is_terminal(&self, state: &GameState) -> bool {
        state.reveals() == self.config.round_count
            || state.folded(Seat::One)
            || state.folded(Seat::Two)
    }

    fn raise_stake(&self, state: &GameState) -> u32 {
        match state.seat1_round_actions().first() {
            Some(Action::Bet) => RAISE_OVER_BET,
            _ => RAISE_OVER_CHECK,
        }
    }

    fn raise_affordable(&self, state: &GameState) -> bool {
        let stake = self.raise_stake(state);
        let seat1_owes = (state.contributed(Seat::Two) + stake)
            .saturating_sub(state.contributed(Seat::One));
        state.stack(Seat::Two) >= stake && state.stack(Seat::One) >= seat1_owes
    }

    pub fn legal_actions(&self, state: &GameState) -> LeducResult<Vec<Action>> {
        if self.is_terminal(state) {
            return Err(LeducError::TerminalState);
        }

        let actions = match state.actor() {
            Actor::Dealer => vec![Action::RevealCards],
            Actor::Seat(Seat::One) => {
                if !state.seat1_round_actions().is_empty() {
                    // Seat 1 only acts twice in a round after being raised.
                    vec![Action::Fold, Action::Call]
                } else if state.stack(Seat::One) >= BET_SIZE && state.stack(Seat::Two) >= BET_SIZE {
                    vec![Action::Check, Action::Fold, Action::Bet]
                } else {
                    vec![Action::Check, Action::Fold]
                }
            }
            Actor::Seat(Seat::Two) => {
                let facing_bet = state.contributed(Seat::One) > state.contributed(Seat::Two);
                let mut actions = if facing_bet {
                    vec![Action::Fold, Action::Call]
                } else {
                    vec![Action::Check]
                };
                if self.raise_affordable(state) {
                    actions.push(Action::Raise);
                }
                actions
            }
        };
        Ok(actions)
    }

    /// Applies `action` in place. Anything outside `legal_actions` is rejected
    /// and leaves the state untouched.
    pub fn step(&self, state: &mut GameState, action: Action) -> LeducResult<()> {
        let actor = state.actor();
        if !self.legal_actions(state)?.contains(&action) {
            return Err(LeducError::InvalidAction { actor, action });
        }

        match actor {
            Actor::Dealer => {
                let n = if state.community_cards().is_empty() { 3 } else { 1 };
                let cards = state.deck_mut().draw(n)?;
                state.reveal(cards);
            }
            Actor::Seat(seat) => {
                if seat == Seat::One {
                    state.record_seat1_action(action);
                }
                match action {
                    Action::Check => {
                        let next = match seat {
                            Seat::One => Actor::Seat(Seat::Two),
                            Seat::Two => Actor::Dealer,
                        };
                        state.set_actor(next);
                    }
                    Action::Bet => {
                        state.contribute(seat, BET_SIZE);
                        state.set_actor(Actor::Seat(seat.other()));
                    }
                    Action::Call => {
                        let owed = state.to_call(seat);
                        state.contribute(seat, owed);
                        state.set_actor(Actor::Dealer);
                    }
                    Action::Raise => {
                        let stake = self.raise_stake(state);
                        state.contribute(seat, stake);
                        state.set_actor(Actor::Seat(seat.other()));
                    }
                    Action::Fold => {
                        state.fold(seat);
                        state.set_actor(Actor::Dealer);
                    }
                    Action::RevealCards => {
                        return Err(LeducError::InvalidAction { actor, action });
                    }
                }
            }
        }

        log::trace!(
            "{:<8} {:<8} pot {:>4}  board {}",
            actor.to_string(),
            action.as_str(),
            state.pot(),
            state.community_cards().len()
        );
        Ok(())
    }

    pub fn resolution(&self, state: &GameState) -> LeducResult<Resolution> {
        if !self.is_terminal(state) {
            return Err(LeducError::NotTerminal);
        }
        if state.folded(Seat::One) {
            return Ok(Resolution::Seat1Folded);
        }
        if state.folded(Seat::Two) {
            return Ok(Resolution::Seat2Folded);
        }
        let winner = match compare_hands(
            state.hand(Seat::One),
            state.hand(Seat::Two),
            state.community_cards(),
        )? {
            Ordering::Greater => Some(Seat::One),
            Ordering::Less => Some(Seat::Two),
            Ordering::Equal => None,
        };
        Ok(Resolution::Showdown { winner })
    }

    /// Seat 1's chip delta for the hand, measured against its starting stack.
    pub fn payoff(&self, state: &GameState) -> LeducResult<i32> {
        let resolution = self.resolution(state)?;
        let stack = i64::from(state.stack(Seat::One));
        let start = i64::from(state.starting_stack(Seat::One));
        let pot = i64::from(state.pot());

        let delta = match resolution {
            Resolution::Seat2Folded | Resolution::Showdown { winner: Some(Seat::One) } => {
                stack + pot - start
            }
            Resolution::Seat1Folded | Resolution::Showdown { winner: Some(Seat::Two) } => {
                stack - start
            }
            Resolution::Showdown { winner: None } => {
                stack + i64::from(state.contributed(Seat::One)) - start
            }
        };
        i32::try_from(delta).map_err(|_| LeducError::PayoffOverflow(delta))
    }

    /// The full final board, drawn ahead and returned to the deck so the
    /// cards the dealer will actually reveal are unchanged.
    pub fn peek_future_board(&self, state: &mut GameState) -> LeducResult<Vec<Card>> {
        let missing = board_cards(self.config.round_count)
            .saturating_sub(state.community_cards().len());
        let future = state.deck_mut().draw(missing)?;
        state.deck_mut().put_back(&future);

        let mut board = state.community_cards().to_vec();
        board.extend(future);
        Ok(board)
    }
}
