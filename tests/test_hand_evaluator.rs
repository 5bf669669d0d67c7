use std::cmp::Ordering;

use approx::assert_relative_eq;
use leduc_rl::cards::*;
use leduc_rl::hand_evaluator::*;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

#[test]
fn test_royal_flush() {
    let hole = vec![c("As"), c("Ks")];
    let board = parse_board("QsTsJs2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::RoyalFlush);
    assert_eq!(result.rank(), 1);
}

#[test]
fn test_straight_flush() {
    let hole = vec![c("9h"), c("8h")];
    let board = parse_board("7h6h5hAcKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::StraightFlush);
}

#[test]
fn test_four_of_a_kind() {
    let hole = vec![c("Ks"), c("Kh")];
    let board = parse_board("KdKc5s2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FourOfAKind);
}

#[test]
fn test_full_house() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_board("AdKsKh2c3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FullHouse);
    assert_eq!(result.kickers, vec![14, 13]);
}

#[test]
fn test_flush() {
    let hole = vec![c("As"), c("Ts")];
    let board = parse_board("8s5s2sKdQh").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Flush);
}

#[test]
fn test_straight() {
    let hole = vec![c("9s"), c("8h")];
    let board = parse_board("7d6c5sAhKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![9]);
}

#[test]
fn test_wheel() {
    let hole = vec![c("As"), c("2h")];
    let board = parse_board("3d4c5sKhQd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![5]);
}

#[test]
fn test_two_pair() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_board("AdKs5c2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::TwoPair);
    assert_eq!(result.kickers, vec![14, 13, 5]);
}

#[test]
fn test_one_pair() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_board("Kd7s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::OnePair);
    assert_eq!(result.kickers, vec![14, 13, 7, 5]);
}

#[test]
fn test_single_hole_card_on_four_card_board() {
    let result = evaluate_hand(&[c("Ac")], &parse_board("AhKd7s3h").unwrap()).unwrap();
    assert_eq!(result.category, HandCategory::OnePair);
}

#[test]
fn test_not_enough_cards() {
    assert!(evaluate_hand(&[c("As"), c("Kh")], &[c("Qd")]).is_err());
    assert!(evaluate(&[c("As")], &parse_board("KhQd2c").unwrap()).is_err());
}

#[test]
fn test_worst_hand_has_max_rank() {
    let rank = evaluate(&[c("7s"), c("5h")], &parse_board("4d3c2s").unwrap()).unwrap();
    assert_eq!(rank, MAX_RANK);
}

#[test]
fn test_lower_rank_is_stronger() {
    let board = parse_board("2s5d8cTh3d").unwrap();
    let aces = evaluate(&[c("As"), c("Ah")], &board).unwrap();
    let kings = evaluate(&[c("Ks"), c("Kh")], &board).unwrap();
    assert!(aces < kings);
}

#[test]
fn test_percentile_bounds() {
    assert_relative_eq!(rank_to_percentile(1), 1.0);
    assert_relative_eq!(rank_to_percentile(MAX_RANK), 0.0);
    let mid = rank_to_percentile(MAX_RANK / 2);
    assert!(mid > 0.4 && mid < 0.6);
}

#[test]
fn test_percentile_is_monotonic() {
    let board = parse_board("Kd7s3c2h").unwrap();
    let pair = rank_to_percentile(evaluate(&[c("Kh")], &board).unwrap());
    let high = rank_to_percentile(evaluate(&[c("9h")], &board).unwrap());
    assert!(pair > high);
}

#[test]
fn test_flush_beats_straight() {
    let board = parse_board("7s6s5s4dAh").unwrap();
    assert_eq!(
        compare_hands(&[c("As"), c("2s")], &[c("8h"), c("9h")], &board).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_kicker_decides() {
    let board = parse_board("As5d8cTh3d").unwrap();
    assert_eq!(
        compare_hands(&[c("Ad"), c("Kh")], &[c("Ah"), c("Qd")], &board).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_tie() {
    let board = parse_board("AsKdQhJsTs").unwrap();
    assert_eq!(
        compare_hands(&[c("2h"), c("3d")], &[c("4h"), c("5d")], &board).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn test_hand_result_ordering() {
    let high = HandResult::new(HandCategory::HighCard, vec![14, 13, 12, 11, 9]);
    let pair = HandResult::new(HandCategory::OnePair, vec![2, 5, 4, 3]);
    assert!(pair > high);
    assert!(pair.rank() < high.rank());
}

#[test]
fn test_hand_result_kicker() {
    let h1 = HandResult::new(HandCategory::OnePair, vec![14, 13, 12, 11]);
    let h2 = HandResult::new(HandCategory::OnePair, vec![14, 13, 12, 10]);
    assert!(h1 > h2);
}
