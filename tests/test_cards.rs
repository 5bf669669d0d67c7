use std::collections::HashSet;

use leduc_rl::cards::*;
use leduc_rl::error::LeducError;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

// ---------------------------------------------------------------------------
// Notation
// ---------------------------------------------------------------------------

#[test]
fn test_notation_round_trips_through_display() {
    for card in full_deck() {
        assert_eq!(c(&card.to_string()), card);
    }
}

#[test]
fn test_parse_card_errors() {
    assert!(matches!(parse_card("Xs"), Err(LeducError::InvalidRank('X'))));
    assert!(matches!(parse_card("Ax"), Err(LeducError::InvalidSuit('x'))));
    assert!(matches!(parse_card("AsK"), Err(LeducError::InvalidCardNotation(_))));
}

#[test]
fn test_parse_board_separators_and_case() {
    assert_eq!(
        parse_board("as, KD 7c").unwrap(),
        vec![c("As"), c("Kd"), c("7c")]
    );
    assert!(matches!(parse_board("AsK"), Err(LeducError::InvalidBoardNotation(_))));
}

#[test]
fn test_card_index_orders_by_rank() {
    assert_eq!(c("2s").index(), 0);
    assert_eq!(c("Ac").index(), 51);
    assert!(c("3s").index() > c("2c").index());
}

#[test]
fn test_remaining_cards_skips_dead() {
    let dead = parse_board("AsKh").unwrap();
    let rest = remaining_cards(&dead);
    assert_eq!(rest.len(), DECK_SIZE - 2);
    assert!(dead.iter().all(|d| !rest.contains(d)));
}

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

#[test]
fn test_from_cards_deals_in_given_order() {
    let cards = parse_board("7h2cKsAd9d").unwrap();
    let mut deck = Deck::from_cards(cards.clone());
    assert_eq!(deck.len(), 5);

    let mut dealt = Vec::new();
    while !deck.is_empty() {
        dealt.extend(deck.draw(1).unwrap());
    }
    assert_eq!(dealt, cards);
}

#[test]
fn test_draw_splits_the_pile() {
    let mut deck = Deck::from_cards(parse_board("7h2cKsAd9d").unwrap());
    assert_eq!(deck.draw(2).unwrap(), vec![c("7h"), c("2c")]);
    assert_eq!(deck.draw(0).unwrap(), Vec::<Card>::new());
    assert_eq!(deck.draw(3).unwrap(), vec![c("Ks"), c("Ad"), c("9d")]);
    assert!(deck.is_empty());
}

#[test]
fn test_draw_past_the_end_is_error() {
    let mut deck = Deck::from_cards(parse_board("7h2cKs").unwrap());
    deck.draw(2).unwrap();
    let err = deck.draw(2).unwrap_err();
    assert!(matches!(
        err,
        LeducError::NotEnoughDeck { requested: 2, available: 1 }
    ));
    // A failed draw takes nothing.
    assert_eq!(deck.draw(1).unwrap(), vec![c("Ks")]);
    assert!(matches!(
        deck.draw(1),
        Err(LeducError::NotEnoughDeck { requested: 1, available: 0 })
    ));
}

#[test]
fn test_shuffled_deck_is_a_permutation() {
    let mut deck = Deck::shuffled(&mut StdRng::seed_from_u64(9));
    assert_eq!(deck.len(), DECK_SIZE);
    let all: HashSet<Card> = deck.draw(DECK_SIZE).unwrap().into_iter().collect();
    assert_eq!(all.len(), DECK_SIZE);
}

#[test]
fn test_shuffle_follows_seed() {
    let mut a = Deck::shuffled(&mut StdRng::seed_from_u64(42));
    let mut b = Deck::shuffled(&mut StdRng::seed_from_u64(42));
    let mut other = Deck::shuffled(&mut StdRng::seed_from_u64(43));
    let first = a.draw(10).unwrap();
    assert_eq!(first, b.draw(10).unwrap());
    assert_ne!(first, other.draw(10).unwrap());
}

#[test]
fn test_put_back_preserves_next_draw() {
    let mut peeked = Deck::shuffled(&mut StdRng::seed_from_u64(5));
    let mut untouched = peeked.clone();

    let future = peeked.draw(4).unwrap();
    peeked.put_back(&future);

    assert_eq!(peeked.len(), DECK_SIZE);
    assert_eq!(peeked.draw(6).unwrap(), untouched.draw(6).unwrap());
}

#[test]
fn test_put_back_onto_empty_deck() {
    let mut deck = Deck::from_cards(parse_board("Qc").unwrap());
    let last = deck.draw(1).unwrap();
    assert!(deck.is_empty());
    deck.put_back(&last);
    assert_eq!(deck.draw(1).unwrap(), vec![c("Qc")]);
}
