use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;
use tundra::board::Board;
use tundra::moves::movegen::{self, movetype};

const FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    // en passant immediately available
    "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
    // promotion one push away
    "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
];

/// Random playouts: after every make the incremental hash must equal a full
/// recompute, and every unmake must restore the previous board byte for
/// byte, hash and history included.
#[test]
fn incremental_hash_tracks_full_recompute_through_playouts() {
    let mut rng = StdRng::seed_from_u64(0xF0E1_D2C3);

    for &fen in FENS {
        let mut board = Board::from_str(fen).expect("valid fen");
        for _ply in 0..200 {
            assert_eq!(board.zobrist, board.compute_zobrist_full());

            let moves = movegen::generate(&board, movetype::LEGAL);
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.random_range(0..moves.len())];

            let snapshot = board.clone();
            board.make(mv);
            assert_eq!(
                board.zobrist,
                board.compute_zobrist_full(),
                "incremental hash diverged after {mv}"
            );
            board.unmake();
            assert_eq!(board, snapshot, "unmake did not restore state after {mv}");

            // now actually play the move and continue the walk
            board.make(mv);
        }
    }
}

/// Transpositions must collide: different move orders reaching the same
/// position produce the same hash.
#[test]
fn transpositions_hash_equal() {
    let mut a = Board::new();
    for mv in ["g1f3", "g8f6", "b1c3"] {
        a.push_uci(mv).unwrap();
    }
    let mut b = Board::new();
    for mv in ["b1c3", "g8f6", "g1f3"] {
        b.push_uci(mv).unwrap();
    }
    assert_eq!(a.zobrist, b.zobrist);
    assert_eq!(a.to_fen(), b.to_fen());
}

/// Pawn double pushes only hash the en passant file while a capture is
/// actually on; the pair of positions must diverge exactly then.
#[test]
fn ep_file_hash_requires_a_capturer() {
    // No black pawn can take on e3: hash equals the ep-less twin.
    let mut idle = Board::new();
    idle.push_uci("e2e4").unwrap();
    let mut twin = Board::from_str(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
    )
    .unwrap();
    assert_eq!(idle.zobrist, twin.zobrist);

    // With a black pawn on d4 the capture exists and the hashes split.
    let live = Board::from_str(
        "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
    )
    .unwrap();
    twin.set_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
        .unwrap();
    assert_ne!(live.zobrist, twin.zobrist);
}

/// Castling rights, the moved rook and the turn all feed the hash; undoing
/// a castle restores the exact prior hash.
#[test]
fn castling_round_trips_the_hash() {
    let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = board.zobrist;
    board.push_uci("e1g1").unwrap();
    assert_ne!(board.zobrist, before);
    assert_eq!(board.zobrist, board.compute_zobrist_full());
    board.unmake();
    assert_eq!(board.zobrist, before);
}

/// Occupancy invariants hold through deep random walks.
#[test]
fn occupancy_invariants_hold_through_walks() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut board = Board::new();

    for _ in 0..300 {
        assert_eq!(board.occ_white & board.occ_black, 0);
        assert_eq!(board.occ_white | board.occ_black, board.occ_all);
        board.validate().expect("no overlapping bitboards");
        for color in [tundra::board::Color::White, tundra::board::Color::Black] {
            assert_eq!(
                board
                    .pieces(tundra::board::Piece::King, color)
                    .count_ones(),
                1
            );
        }

        let moves = movegen::generate(&board, movetype::LEGAL);
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.random_range(0..moves.len())];
        board.make(mv);
    }
}
