use std::str::FromStr;
use tundra::board::{Board, Color, Piece};
use tundra::moves::movegen::{self, movetype};
use tundra::square::Square;

#[test]
fn a_full_opening_line_round_trips() {
    let mut board = Board::new();
    let line = [
        "e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6", "b1c3", "a7a6",
    ];
    for mv in line {
        board.push_uci(mv).unwrap();
    }
    assert_eq!(
        board.to_fen(),
        "rnbqkb1r/1p2pppp/p2p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R w KQkq - 0 6"
    );
    for _ in 0..line.len() {
        board.unmake();
    }
    assert_eq!(board, Board::new());
}

#[test]
fn every_legal_move_leaves_own_king_safe() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ] {
        let mut board = Board::from_str(fen).unwrap();
        let mover = board.side_to_move;
        let moves = movegen::generate(&board, movetype::LEGAL);
        for &mv in moves.iter() {
            board.make(mv);
            assert!(
                !tundra::moves::square_control::in_check(&board, mover),
                "{mv} leaves the king in check in {fen}"
            );
            board.unmake();
        }
    }
}

#[test]
fn promotions_offer_all_four_pieces() {
    let board = Board::from_str("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let moves = movegen::generate(&board, movetype::LEGAL);
    let promos: Vec<_> = moves.iter().filter(|m| m.is_promotion()).collect();
    assert_eq!(promos.len(), 4);
    let pieces: Vec<_> = promos.iter().filter_map(|m| m.promotion()).collect();
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        assert!(pieces.contains(&piece));
    }
}

#[test]
fn underpromotion_applies_and_reverts() {
    let mut board = Board::from_str("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    board.push_uci("a7a8n").unwrap();
    assert_eq!(
        board.piece_at(Square::from_index(56)),
        Some((Color::White, Piece::Knight))
    );
    board.unmake();
    assert_eq!(board.pieces(Piece::Knight, Color::White), 0);
}

#[test]
fn double_push_sets_and_clears_en_passant() {
    let mut board = Board::new();
    board.push_uci("e2e4").unwrap();
    assert_eq!(board.en_passant, Some(Square::from_index(20))); // e3
    board.push_uci("g8f6").unwrap();
    assert_eq!(board.en_passant, None);
}

#[test]
fn rook_moves_drop_only_their_own_right() {
    let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    board.push_uci("h1g1").unwrap();
    assert!(!board.has_kingside_castle(Color::White));
    assert!(board.has_queenside_castle(Color::White));
    assert!(board.has_kingside_castle(Color::Black));
    board.unmake();
    assert!(board.has_kingside_castle(Color::White));
}

#[test]
fn queenside_castle_relocates_the_a_rook() {
    let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    board.push_uci("e8c8").unwrap();
    assert_eq!(
        board.piece_at(Square::from_index(58)),
        Some((Color::Black, Piece::King))
    );
    assert_eq!(
        board.piece_at(Square::from_index(59)),
        Some((Color::Black, Piece::Rook))
    );
    assert_eq!(board.piece_at(Square::from_index(56)), None);
}

#[test]
fn fullmove_number_advances_after_black() {
    let mut board = Board::new();
    assert_eq!(board.fullmove_number, 1);
    board.push_uci("e2e4").unwrap();
    assert_eq!(board.fullmove_number, 1);
    board.push_uci("e7e5").unwrap();
    assert_eq!(board.fullmove_number, 2);
    board.unmake();
    assert_eq!(board.fullmove_number, 1);
}

#[test]
fn stopping_at_an_illegal_move_keeps_prior_moves_applied() {
    // mirrors the UCI `position ... moves` recovery rule
    let mut board = Board::new();
    board.push_uci("e2e4").unwrap();
    assert!(board.push_uci("e7e6x").is_err());
    assert!(board.push_uci("a1a5").is_err());
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}
