use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::cards::{remaining_cards, Card};
use crate::error::{LeducError, LeducResult};
use crate::hand_evaluator::{evaluate, rank_to_percentile};

/// Runouts sampled when fewer than five cards are known.
pub const STRENGTH_SAMPLES: usize = 32;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn card_seed(hand: &[Card], board: &[Card]) -> u64 {
    let ids = hand
        .iter()
        .map(|c| c.index() as u64)
        .chain(std::iter::once(u64::from(u8::MAX)))
        .chain(board.iter().map(|c| c.index() as u64));
    ids.fold(FNV_OFFSET, |h, id| (h ^ id).wrapping_mul(FNV_PRIME))
}

/// Percentile strength of `hand` on `board`.
///
/// With five or more cards known this is exact. Otherwise the board is
/// completed from the unseen cards and the percentile averaged over
/// `STRENGTH_SAMPLES` runouts. The sampler is seeded from the cards
/// themselves, so the same inputs always give the same answer.
pub fn hand_strength(hand: &[Card], board: &[Card]) -> LeducResult<f64> {
    let known = hand.len() + board.len();
    if known >= 5 {
        return Ok(rank_to_percentile(evaluate(hand, board)?));
    }

    let dead: Vec<Card> = hand.iter().chain(board.iter()).copied().collect();
    let unseen = remaining_cards(&dead);
    let needed = 5 - known;
    if unseen.len() < needed {
        return Err(LeducError::NotEnoughDeck {
            requested: needed,
            available: unseen.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(card_seed(hand, board));
    let mut total = 0.0;
    for _ in 0..STRENGTH_SAMPLES {
        let mut runout = board.to_vec();
        runout.extend(unseen.choose_multiple(&mut rng, needed).copied());
        total += rank_to_percentile(evaluate(hand, &runout)?);
    }
    Ok(total / STRENGTH_SAMPLES as f64)
}
