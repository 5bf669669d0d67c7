use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::cards::{Card, Suit, ALL_RANKS, ALL_SUITS};
use crate::error::{LeducError, LeducResult};

/// Number of distinct five-card hand classes; ranks run `1..=MAX_RANK`.
pub const MAX_RANK: u32 = 7462;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
            HandCategory::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandResult {
    pub category: HandCategory,
    pub kickers: Vec<u8>,
}

impl HandResult {
    pub fn new(category: HandCategory, kickers: Vec<u8>) -> Self {
        HandResult { category, kickers }
    }

    /// Packs category and kickers into one integer that orders like the hand.
    pub fn key(&self) -> u32 {
        let mut key = (self.category as u32) << 20;
        for (i, &k) in self.kickers.iter().take(5).enumerate() {
            key |= (k as u32) << (16 - 4 * i);
        }
        key
    }

    /// 1 for a royal flush, `MAX_RANK` for 7-5-4-3-2 offsuit.
    pub fn rank(&self) -> u32 {
        let key = self.key();
        let idx = RANK_TABLE
            .binary_search_by(|probe| key.cmp(probe))
            .unwrap_or_else(|i| i);
        idx as u32 + 1
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

impl PartialEq for HandResult {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HandResult {}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

// Every distinct five-card class, strongest first.
static RANK_TABLE: Lazy<Vec<u32>> = Lazy::new(|| {
    let mut keys: Vec<u32> = Vec::with_capacity(MAX_RANK as usize);
    for ranks in ALL_RANKS.iter().copied().combinations_with_replacement(5) {
        if ranks.iter().any(|r| ranks.iter().filter(|&x| x == r).count() > 4) {
            continue;
        }
        // Sorted ranks cycle through the suits, so repeated ranks never share one.
        let offsuit: [Card; 5] = std::array::from_fn(|i| Card::new(ranks[i], ALL_SUITS[i % 4]));
        keys.push(evaluate_five(&offsuit).key());
        if ranks.iter().all_unique() {
            let suited: [Card; 5] = std::array::from_fn(|i| Card::new(ranks[i], Suit::Spades));
            keys.push(evaluate_five(&suited).key());
        }
    }
    keys.sort_unstable_by(|a, b| b.cmp(a));
    keys.dedup();
    keys
});

fn is_flush(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].suit == w[1].suit)
}

fn straight_high(values: &[u8]) -> Option<u8> {
    let unique: Vec<u8> = values.iter().copied().sorted_unstable_by(|a, b| b.cmp(a)).dedup().collect();
    if unique.len() != 5 {
        return None;
    }
    if unique[0] - unique[4] == 4 {
        return Some(unique[0]);
    }
    // Wheel: A-2-3-4-5
    if unique == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: &[Card; 5]) -> HandResult {
    let mut values: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = is_flush(cards);
    let straight = straight_high(&values);

    if flush {
        match straight {
            Some(14) => return HandResult::new(HandCategory::RoyalFlush, vec![14]),
            Some(high) => return HandResult::new(HandCategory::StraightFlush, vec![high]),
            None => {}
        }
    }

    // (count, value), by count desc then value desc
    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }
    let freq: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .sorted_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)))
        .collect();
    let grouped: Vec<u8> = freq.iter().map(|&(_, v)| v).collect();

    match (freq[0].0, freq.get(1).map(|f| f.0)) {
        (4, _) => HandResult::new(HandCategory::FourOfAKind, grouped),
        (3, Some(2)) => HandResult::new(HandCategory::FullHouse, grouped),
        _ if flush => HandResult::new(HandCategory::Flush, values),
        _ if straight.is_some() => {
            HandResult::new(HandCategory::Straight, straight.into_iter().collect())
        }
        (3, _) => HandResult::new(HandCategory::ThreeOfAKind, grouped),
        (2, Some(2)) => HandResult::new(HandCategory::TwoPair, grouped),
        (2, _) => HandResult::new(HandCategory::OnePair, grouped),
        _ => HandResult::new(HandCategory::HighCard, values),
    }
}

/// Best five-card hand out of the hole cards plus the board.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> LeducResult<HandResult> {
    let all_cards: Vec<Card> = hole_cards.iter().chain(board.iter()).copied().collect();
    if all_cards.len() < 5 {
        return Err(LeducError::NotEnoughCards {
            need: 5,
            got: all_cards.len(),
        });
    }

    all_cards
        .iter()
        .combinations(5)
        .map(|combo| evaluate_five(&[*combo[0], *combo[1], *combo[2], *combo[3], *combo[4]]))
        .max()
        .ok_or(LeducError::NotEnoughCards {
            need: 5,
            got: all_cards.len(),
        })
}

/// Rank of the best hand; lower is stronger.
pub fn evaluate(hand: &[Card], board: &[Card]) -> LeducResult<u32> {
    Ok(evaluate_hand(hand, board)?.rank())
}

/// Share of hand classes this rank beats, in `[0, 1]`.
pub fn rank_to_percentile(rank: u32) -> f64 {
    let rank = rank.clamp(1, MAX_RANK);
    1.0 - (rank - 1) as f64 / (MAX_RANK - 1) as f64
}

/// `Greater` when `hand1` wins the showdown.
pub fn compare_hands(hand1: &[Card], hand2: &[Card], board: &[Card]) -> LeducResult<Ordering> {
    let r1 = evaluate(hand1, board)?;
    let r2 = evaluate(hand2, board)?;
    Ok(r2.cmp(&r1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table_covers_every_class() {
        assert_eq!(RANK_TABLE.len(), MAX_RANK as usize);
        assert!(RANK_TABLE.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = HandResult::new(HandCategory::Straight, vec![5]);
        let six_high = HandResult::new(HandCategory::Straight, vec![6]);
        assert!(wheel < six_high);
        assert_eq!(wheel.rank(), six_high.rank() + 1);
    }
}
