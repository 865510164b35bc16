use crate::board::Board;
use crate::moves::types::Move;

const PV_SCORE: i32 = 2_000_000;
const TT_SCORE: i32 = 1_000_000;
const PROMOTION_BASE: i32 = 20_000;
const CAPTURE_BASE: i32 = 10_000;
const CHECK_BONUS: i32 = 50;

/// Most valuable victim, least valuable attacker. The victim rides the
/// move's out-of-band capture tag; the attacker is read off the board.
pub fn mvv_lva(board: &Board, mv: Move) -> i32 {
    match mv.captured() {
        Some(victim) => {
            let attacker = board
                .piece_type_at(mv.from())
                .map_or(0, |p| p.attacker_value());
            victim.value() * 10 - attacker
        }
        None => 0,
    }
}

/// Ordering key for the main search: the previous iteration's PV move
/// first, then the table move, then promotions and captures, then quiets
/// with a nudge for checking moves.
pub fn order_key(board: &Board, mv: Move, pv_move: Option<Move>, tt_move: Option<Move>) -> i32 {
    if pv_move == Some(mv) {
        return PV_SCORE;
    }
    if tt_move == Some(mv) {
        return TT_SCORE;
    }
    if let Some(promo) = mv.promotion() {
        return PROMOTION_BASE + promo.value() + mvv_lva(board, mv);
    }
    if mv.is_capture() {
        return CAPTURE_BASE + mvv_lva(board, mv);
    }
    if mv.gives_check() { CHECK_BONUS } else { 0 }
}

/// Ordering key for quiescence, which only ever sees checks and captures.
pub fn noisy_key(board: &Board, mv: Move) -> i32 {
    if let Some(promo) = mv.promotion() {
        return PROMOTION_BASE + promo.value() + mvv_lva(board, mv);
    }
    if mv.is_capture() {
        return CAPTURE_BASE + mvv_lva(board, mv);
    }
    if mv.gives_check() { CHECK_BONUS } else { 0 }
}
