use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{LeducError, LeducResult};

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> LeducResult<Rank> {
        match c {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(LeducError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> LeducResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(LeducError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    /// Stable identity in `0..52`.
    pub fn index(&self) -> u8 {
        (self.rank.value() - 2) * 4 + self.suit as u8
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

pub fn full_deck() -> Vec<Card> {
    ALL_RANKS
        .iter()
        .flat_map(|&r| ALL_SUITS.iter().map(move |&s| Card::new(r, s)))
        .collect()
}

/// Cards not in `dead`, in canonical order.
pub fn remaining_cards(dead: &[Card]) -> Vec<Card> {
    let dead: HashSet<Card> = dead.iter().copied().collect();
    full_deck().into_iter().filter(|c| !dead.contains(c)).collect()
}

/// Draw pile for a single hand. Cards come off the top in order; `put_back`
/// restores them to the top so a peek never changes what is dealt next.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn shuffled(rng: &mut dyn RngCore) -> Deck {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// A deck that deals `cards` in exactly the given order.
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards }
    }

    pub fn draw(&mut self, n: usize) -> LeducResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(LeducError::NotEnoughDeck {
                requested: n,
                available: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..n).collect())
    }

    pub fn put_back(&mut self, cards: &[Card]) {
        self.cards.splice(0..0, cards.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn parse_card(notation: &str) -> LeducResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(LeducError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0].to_ascii_uppercase())?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

pub fn parse_board(notation: &str) -> LeducResult<Vec<Card>> {
    let notation = notation.trim().replace([' ', ','], "");
    if notation.len() % 2 != 0 {
        return Err(LeducError::InvalidBoardNotation(notation));
    }
    let chars: Vec<char> = notation.chars().collect();
    chars
        .chunks(2)
        .map(|pair| parse_card(&pair.iter().collect::<String>()))
        .collect()
}
