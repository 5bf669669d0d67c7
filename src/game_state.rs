use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    #[serde(rename = "seat1")]
    One,
    #[serde(rename = "seat2")]
    Two,
}

impl Seat {
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn from_number(n: u8) -> Option<Seat> {
        match n {
            1 => Some(Seat::One),
            2 => Some(Seat::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seat {}", self.index() + 1)
    }
}

/// Whose turn it is. The dealer is a pseudo-actor that reveals cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Seat(Seat),
    Dealer,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Seat(seat) => write!(f, "{}", seat),
            Actor::Dealer => write!(f, "Dealer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Check,
    Bet,
    Call,
    Raise,
    Fold,
    RevealCards,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Check => "CHECK",
            Action::Bet => "BET",
            Action::Call => "CALL",
            Action::Raise => "RAISE",
            Action::Fold => "FOLD",
            Action::RevealCards => "REVEAL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a finished hand was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Seat1Folded,
    Seat2Folded,
    /// `None` is a split pot.
    Showdown { winner: Option<Seat> },
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Seat1Folded => write!(f, "Seat 1 folded"),
            Resolution::Seat2Folded => write!(f, "Seat 2 folded"),
            Resolution::Showdown { winner: Some(seat) } => write!(f, "{} wins at showdown", seat),
            Resolution::Showdown { winner: None } => write!(f, "Split pot"),
        }
    }
}

/// Public and private state of one hand.
///
/// Fields are only readable from outside the crate; every mutation goes
/// through `GameEngine::step`, which keeps the chip and fold invariants.
#[derive(Debug, Clone)]
pub struct GameState {
    actor: Actor,
    hands: [Vec<Card>; 2],
    community: Vec<Card>,
    reveals: usize,
    contributions: [Vec<u32>; 2],
    stacks: [u32; 2],
    starting_stacks: [u32; 2],
    folded: [bool; 2],
    seat1_round_actions: Vec<Action>,
    deck: Deck,
}

impl GameState {
    pub(crate) fn new(hands: [Vec<Card>; 2], stacks: [u32; 2], deck: Deck) -> GameState {
        GameState {
            actor: Actor::Seat(Seat::One),
            hands,
            community: Vec::new(),
            reveals: 0,
            contributions: [Vec::new(), Vec::new()],
            stacks,
            starting_stacks: stacks,
            folded: [false, false],
            seat1_round_actions: Vec::new(),
            deck,
        }
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }

    /// Completed dealer reveals, which is also the index of the current betting round.
    pub fn reveals(&self) -> usize {
        self.reveals
    }

    pub fn contributions(&self, seat: Seat) -> &[u32] {
        &self.contributions[seat.index()]
    }

    pub fn contributed(&self, seat: Seat) -> u32 {
        self.contributions[seat.index()].iter().sum()
    }

    pub fn pot(&self) -> u32 {
        self.contributed(Seat::One) + self.contributed(Seat::Two)
    }

    pub fn stack(&self, seat: Seat) -> u32 {
        self.stacks[seat.index()]
    }

    pub fn starting_stack(&self, seat: Seat) -> u32 {
        self.starting_stacks[seat.index()]
    }

    pub fn folded(&self, seat: Seat) -> bool {
        self.folded[seat.index()]
    }

    pub fn seat1_round_actions(&self) -> &[Action] {
        &self.seat1_round_actions
    }

    /// Chips `seat` still owes to match the other seat this hand.
    pub fn to_call(&self, seat: Seat) -> u32 {
        self.contributed(seat.other())
            .saturating_sub(self.contributed(seat))
    }

    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub(crate) fn set_actor(&mut self, actor: Actor) {
        self.actor = actor;
    }

    pub(crate) fn contribute(&mut self, seat: Seat, amount: u32) {
        debug_assert!(amount <= self.stacks[seat.index()]);
        self.contributions[seat.index()].push(amount);
        self.stacks[seat.index()] -= amount;
    }

    pub(crate) fn fold(&mut self, seat: Seat) {
        debug_assert!(!self.folded[seat.other().index()]);
        self.folded[seat.index()] = true;
    }

    pub(crate) fn record_seat1_action(&mut self, action: Action) {
        self.seat1_round_actions.push(action);
    }

    pub(crate) fn reveal(&mut self, cards: Vec<Card>) {
        self.community.extend(cards);
        self.reveals += 1;
        self.seat1_round_actions.clear();
        self.actor = Actor::Seat(Seat::One);
    }
}
