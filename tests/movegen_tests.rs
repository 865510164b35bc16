use std::str::FromStr;
use tundra::board::Board;
use tundra::moves::movegen::{self, movetype};

/// Positions that historically shake out generator bugs: evasions, pins,
/// en passant discoveries, promotions into check. Expected counts are the
/// agreed reference values for depth 1.
const TRICKY: &[(&str, u64)] = &[
    // in check, both castles still encoded in the FEN
    ("r6r/1b2k1bq/8/8/7B/8/8/R3K2R b KQ - 3 2", 8),
    // exd6 e.p. would clear the c3-g7 diagonal onto the own king, and the
    // diagonally pinned e5 pawn cannot push either: king moves only
    ("8/6q1/8/3pP3/8/2K5/8/7k w - d6 0 1", 8),
    // quiet opening position
    ("r1bqkbnr/pppppppp/n7/8/8/P7/1PPPPPPP/RNBQKBNR w KQkq - 2 2", 19),
    // queen contact check, few evasions
    ("r3k2r/p1pp1pb1/bn2Qnp1/2qPN3/1p2P3/2N5/PPPBBPPP/R3K2R b KQkq - 3 2", 5),
    // same middlegame, no check
    ("2kr3r/p1ppqpb1/bn2Qnp1/3PN3/1p2P3/2N5/PPPBBPPP/R3K2R b - - 3 2", 44),
    // promotion-square tactics
    ("rnb2k1r/pp1Pbppp/2p5/q7/2B5/8/PPPQNnPP/RNB1K2R w KQ - 3 9", 39),
    // pawn endgame with a pinned-file flavor
    ("2r5/3pk3/8/2P5/8/2K5/8/8 w - - 5 4", 9),
];

#[test]
fn tricky_positions_produce_reference_counts() {
    for &(fen, expected) in TRICKY {
        let board = Board::from_str(fen).expect("valid fen");
        let generated = movegen::generate(&board, movetype::LEGAL);
        assert_eq!(
            generated.len() as u64,
            expected,
            "stack mode count wrong for {fen}: got {:?}",
            generated.iter().map(|m| m.to_uci()).collect::<Vec<_>>()
        );
        assert_eq!(
            movegen::count(&board, movetype::LEGAL),
            expected,
            "count mode wrong for {fen}"
        );
    }
}

#[test]
fn tricky_positions_keep_the_bucket_partition() {
    for &(fen, _) in TRICKY {
        let board = Board::from_str(fen).unwrap();
        let legal = movegen::count(&board, movetype::LEGAL);
        let split = movegen::count(&board, movetype::QUIET)
            + movegen::count(&board, movetype::CHECK)
            + movegen::count(&board, movetype::CAPTURE);
        assert_eq!(legal, split, "partition broke for {fen}");
    }
}

#[test]
fn every_generated_move_is_unique() {
    for &(fen, _) in TRICKY {
        let board = Board::from_str(fen).unwrap();
        let moves = movegen::generate(&board, movetype::LEGAL);
        let mut encodings: Vec<u16> = moves.iter().map(|m| m.encoding()).collect();
        encodings.sort_unstable();
        encodings.dedup();
        assert_eq!(encodings.len(), moves.len(), "duplicates in {fen}");
    }
}

#[test]
fn capture_bucket_moves_all_carry_a_victim() {
    for &(fen, _) in TRICKY {
        let board = Board::from_str(fen).unwrap();
        let captures = movegen::generate(&board, movetype::CAPTURE);
        for &mv in captures.iter() {
            assert!(mv.is_capture(), "{mv} in capture bucket of {fen}");
            assert!(mv.captured().is_some(), "{mv} missing victim tag in {fen}");
        }
    }
}
