//! Legal move generation.
//!
//! The generator is keyed by side to move, a movetype bitmask and an output
//! mode. Targets for every piece are assembled from the same three buckets:
//!
//! ```text
//! quiet   → empty squares that do not check
//! check   → empty squares that do check
//! capture → opponent-occupied squares
//! ```
//!
//! intersected with the evasion targets and the side's own occupancy
//! complement. The buckets partition legal moves, so `LEGAL` emits each move
//! exactly once and per-bucket runs are disjoint. Pins are enforced with the
//! static pin bitboards from `Detail`; the one case those cannot express,
//! en passant exposing the king along the capture rank, is decided by
//! occupancy simulation.

use crate::bitboard::{BitboardExt, bit, pop_lsb};
use crate::board::{Board, Color, Piece};
use crate::moves::attacks::{
    BISHOP_RAY, FILE_A, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS, RANK_1, RANK_2, RANK_7,
    RANK_8, ROOK_RAY,
};
use crate::moves::detail::Detail;
use crate::moves::magic::sliding;
use crate::moves::square_control::square_attacked;
use crate::moves::types::{
    CAPTURE, DOUBLE_PAWN_PUSH, EN_PASSANT, KINGSIDE_CASTLE, Move, MoveStack, QUEENSIDE_CASTLE,
    QUIET_MOVE,
};
use crate::square::Square;

/// Movetype bitmask. `LEGAL` is the union of the three disjoint buckets.
pub mod movetype {
    pub const QUIET: u8 = 0b001;
    pub const CHECK: u8 = 0b010;
    pub const CAPTURE: u8 = 0b100;
    pub const LEGAL: u8 = QUIET | CHECK | CAPTURE;
}

// Squares that must be empty between king and rook.
const WHITE_KINGSIDE_BETWEEN: u64 = 0x0000_0000_0000_0060;
const WHITE_QUEENSIDE_BETWEEN: u64 = 0x0000_0000_0000_000E;
const BLACK_KINGSIDE_BETWEEN: u64 = 0x6000_0000_0000_0000;
const BLACK_QUEENSIDE_BETWEEN: u64 = 0x0E00_0000_0000_0000;

const PROMOS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// Output mode of the generator: either encode moves onto a stack or tally
/// counts without materializing anything.
trait MoveSink {
    const COUNT_ONLY: bool;
    fn emit(&mut self, mv: Move);
    fn tally(&mut self, n: u32);
}

struct Emit<'a>(&'a mut MoveStack);

impl MoveSink for Emit<'_> {
    const COUNT_ONLY: bool = false;

    #[inline(always)]
    fn emit(&mut self, mv: Move) {
        self.0.push(mv);
    }

    #[inline(always)]
    fn tally(&mut self, _n: u32) {
        unreachable!("tally in emit mode");
    }
}

struct Tally(u64);

impl MoveSink for Tally {
    const COUNT_ONLY: bool = true;

    #[inline(always)]
    fn emit(&mut self, _mv: Move) {
        // paths that must enumerate (king safety, en passant) land here
        self.0 += 1;
    }

    #[inline(always)]
    fn tally(&mut self, n: u32) {
        self.0 += n as u64;
    }
}

/// Generate moves of the requested types onto a fresh stack.
pub fn generate(board: &Board, movetype: u8) -> MoveStack {
    let mut moves = MoveStack::new();
    let mut sink = Emit(&mut moves);
    generate_into(board, movetype, &mut sink);
    moves
}

/// Count moves of the requested types without encoding them.
pub fn count(board: &Board, movetype: u8) -> u64 {
    let mut sink = Tally(0);
    generate_into(board, movetype, &mut sink);
    sink.0
}

fn generate_into<S: MoveSink>(board: &Board, movetype: u8, sink: &mut S) {
    let us = board.side_to_move;
    let detail = Detail::new(board, us);

    pawn_moves(board, &detail, us, movetype, sink);
    knight_moves(board, &detail, us, movetype, sink);
    slider_moves(board, &detail, us, movetype, Piece::Bishop, sink);
    slider_moves(board, &detail, us, movetype, Piece::Rook, sink);
    slider_moves(board, &detail, us, movetype, Piece::Queen, sink);
    king_moves(board, &detail, us, movetype, sink);
}

/// The shared target-construction pattern of §movetype buckets.
#[inline(always)]
fn bucket_targets(movetype: u8, checking: u64, opp_occ: u64, detail: &Detail, own_occ: u64) -> u64 {
    let mut targets = 0u64;
    if movetype & movetype::QUIET != 0 {
        targets |= !(checking | opp_occ);
    }
    if movetype & movetype::CHECK != 0 {
        targets |= checking;
    }
    if movetype & movetype::CAPTURE != 0 {
        targets |= opp_occ;
    }
    targets & detail.evasion_targets & !own_occ
}

#[inline(always)]
fn occupant(board: &Board, sq: u8) -> Option<Piece> {
    board.piece_type_at(Square::from_index(sq))
}

/// Encode (or bulk-count) every target square for one source square.
#[inline(always)]
fn flush_targets<S: MoveSink>(
    sink: &mut S,
    board: &Board,
    from: u8,
    mut targets: u64,
    checking: u64,
) {
    if S::COUNT_ONLY {
        sink.tally(targets.count_ones());
        return;
    }
    while targets != 0 {
        let to = pop_lsb(&mut targets);
        let captured = occupant(board, to);
        let flags = if captured.is_some() { CAPTURE } else { QUIET_MOVE };
        sink.emit(Move::tagged(from, to, flags, captured, checking.has(to)));
    }
}

fn knight_moves<S: MoveSink>(
    board: &Board,
    detail: &Detail,
    us: Color,
    movetype: u8,
    sink: &mut S,
) {
    // A pinned knight never has a legal move.
    let mut knights = board.pieces(Piece::Knight, us) & !(detail.bishop_pinned | detail.rook_pinned);
    let targets = bucket_targets(
        movetype,
        detail.knight_checking,
        board.opponent_occupancy(us),
        detail,
        board.occupancy(us),
    );
    while knights != 0 {
        let from = pop_lsb(&mut knights);
        flush_targets(
            sink,
            board,
            from,
            KNIGHT_ATTACKS[from as usize] & targets,
            detail.knight_checking,
        );
    }
}

/// Bishop, rook and queen generation share one body: a pinned slider keeps
/// only the attack component matching its pin ray, further clipped to the
/// ray through the king.
fn slider_moves<S: MoveSink>(
    board: &Board,
    detail: &Detail,
    us: Color,
    movetype: u8,
    piece: Piece,
    sink: &mut S,
) {
    let checking = match piece {
        Piece::Bishop => detail.bishop_checking,
        Piece::Rook => detail.rook_checking,
        _ => detail.bishop_checking | detail.rook_checking,
    };
    let targets = bucket_targets(
        movetype,
        checking,
        board.opponent_occupancy(us),
        detail,
        board.occupancy(us),
    );
    let occ = board.occupied();
    let ksq = detail.king_square as usize;
    let t = sliding();

    let mut sliders = board.pieces(piece, us);
    while sliders != 0 {
        let from = pop_lsb(&mut sliders);
        let fbit = bit(from);

        let attacks = if fbit & detail.rook_pinned != 0 {
            if piece == Piece::Bishop {
                continue;
            }
            t.rook(from as usize, occ) & ROOK_RAY[ksq]
        } else if fbit & detail.bishop_pinned != 0 {
            if piece == Piece::Rook {
                continue;
            }
            t.bishop(from as usize, occ) & BISHOP_RAY[ksq]
        } else {
            match piece {
                Piece::Bishop => t.bishop(from as usize, occ),
                Piece::Rook => t.rook(from as usize, occ),
                _ => t.queen(from as usize, occ),
            }
        };

        flush_targets(sink, board, from, attacks & targets, checking);
    }
}

fn pawn_moves<S: MoveSink>(board: &Board, detail: &Detail, us: Color, movetype: u8, sink: &mut S) {
    let them = us.opposite();
    let occ = board.occupied();
    let empty = !occ;
    let opp_occ = board.occupancy(them);
    let pawns = board.pieces(Piece::Pawn, us);
    let ksq = detail.king_square;

    let (promo_to, dpp_from, up) = match us {
        Color::White => (RANK_8, RANK_2, 8i8),
        Color::Black => (RANK_1, RANK_7, -8i8),
    };
    let shift_up = |bb: u64| match us {
        Color::White => bb << 8,
        Color::Black => bb >> 8,
    };

    // ---- pushes ----
    // A bishop-pinned pawn can never push; a rook-pinned pawn may push only
    // along the king's file.
    let king_file = FILE_A << (ksq % 8);
    let push_eligible = (pawns & !detail.bishop_pinned & !detail.rook_pinned)
        | (pawns & detail.rook_pinned & king_file);

    let push_mask = {
        let mut m = 0u64;
        if movetype & movetype::QUIET != 0 {
            m |= !detail.pawn_checking;
        }
        if movetype & movetype::CHECK != 0 {
            m |= detail.pawn_checking;
        }
        m & empty & detail.evasion_targets
    };

    let single_all = shift_up(push_eligible) & empty;

    let mut singles = single_all & push_mask & !promo_to;
    if S::COUNT_ONLY {
        sink.tally(singles.count_ones());
    } else {
        while singles != 0 {
            let to = pop_lsb(&mut singles);
            let from = (to as i8 - up) as u8;
            sink.emit(Move::tagged(
                from,
                to,
                QUIET_MOVE,
                None,
                detail.pawn_checking.has(to),
            ));
        }
    }

    let mut doubles = shift_up(shift_up(push_eligible & dpp_from) & empty) & push_mask;
    if S::COUNT_ONLY {
        sink.tally(doubles.count_ones());
    } else {
        while doubles != 0 {
            let to = pop_lsb(&mut doubles);
            let from = (to as i8 - 2 * up) as u8;
            sink.emit(Move::tagged(
                from,
                to,
                DOUBLE_PAWN_PUSH,
                None,
                detail.pawn_checking.has(to),
            ));
        }
    }

    // Promotion pushes live in the quiet bucket; the checking-square
    // partition does not apply because the arriving piece is not a pawn.
    if movetype & movetype::QUIET != 0 {
        let mut promo_pushes = single_all & promo_to & detail.evasion_targets;
        if S::COUNT_ONLY {
            sink.tally(4 * promo_pushes.count_ones());
        } else {
            while promo_pushes != 0 {
                let to = pop_lsb(&mut promo_pushes);
                let from = (to as i8 - up) as u8;
                for promo in PROMOS {
                    sink.emit(Move::tagged(
                        from,
                        to,
                        Move::promo_flags(promo, false),
                        None,
                        promo_checking(detail, promo).has(to),
                    ));
                }
            }
        }
    }

    // ---- captures ----
    if movetype & movetype::CAPTURE != 0 {
        let cap_mask = opp_occ & detail.evasion_targets;

        // Diagonal captures break an orthogonal pin outright; a
        // bishop-pinned pawn may capture only along its pin ray.
        let mut attackers = pawns & !detail.rook_pinned;
        while attackers != 0 {
            let from = pop_lsb(&mut attackers);
            let mut attacks = PAWN_ATTACKS[us as usize][from as usize] & cap_mask;
            if bit(from) & detail.bishop_pinned != 0 {
                attacks &= BISHOP_RAY[ksq as usize];
            }

            let mut normal = attacks & !promo_to;
            let mut promos = attacks & promo_to;
            if S::COUNT_ONLY {
                sink.tally(normal.count_ones() + 4 * promos.count_ones());
            } else {
                while normal != 0 {
                    let to = pop_lsb(&mut normal);
                    sink.emit(Move::tagged(from, to, CAPTURE, occupant(board, to), false));
                }
                while promos != 0 {
                    let to = pop_lsb(&mut promos);
                    let captured = occupant(board, to);
                    for promo in PROMOS {
                        sink.emit(Move::tagged(
                            from,
                            to,
                            Move::promo_flags(promo, true),
                            captured,
                            false,
                        ));
                    }
                }
            }
        }

        // En passant. The static pin bitboards cannot express the rank ray
        // opened by removing both pawns at once, so legality is decided by
        // simulating the resulting occupancy.
        if let Some(ep) = board.en_passant {
            let to = ep.index();
            let cap_sq = (to as i8 - up) as u8;
            let mut candidates = PAWN_ATTACKS[them as usize][to as usize] & pawns;
            while candidates != 0 {
                let from = pop_lsb(&mut candidates);
                if ep_is_legal(board, us, from, to, cap_sq) {
                    sink.emit(Move::tagged(
                        from,
                        to,
                        EN_PASSANT,
                        Some(Piece::Pawn),
                        detail.pawn_checking.has(to),
                    ));
                }
            }
        }
    }
}

#[inline(always)]
fn promo_checking(detail: &Detail, promo: Piece) -> u64 {
    match promo {
        Piece::Knight => detail.knight_checking,
        Piece::Bishop => detail.bishop_checking,
        Piece::Rook => detail.rook_checking,
        _ => detail.bishop_checking | detail.rook_checking,
    }
}

/// Full king-safety simulation for an en passant capture: remove both pawns,
/// place the capturer, and test every attack kind against the king.
fn ep_is_legal(board: &Board, us: Color, from: u8, to: u8, cap_sq: u8) -> bool {
    let them = us.opposite();
    let occ = board.occupied() ^ bit(from) ^ bit(cap_sq) | bit(to);
    let ksq = board.king_square(us).index() as usize;
    let t = sliding();
    let queens = board.pieces(Piece::Queen, them);

    if t.rook(ksq, occ) & (board.pieces(Piece::Rook, them) | queens) != 0 {
        return false;
    }
    if t.bishop(ksq, occ) & (board.pieces(Piece::Bishop, them) | queens) != 0 {
        return false;
    }
    if KNIGHT_ATTACKS[ksq] & board.pieces(Piece::Knight, them) != 0 {
        return false;
    }
    // The captured pawn may have been the checker.
    let pawn_sources = PAWN_ATTACKS[us as usize][ksq];
    pawn_sources & (board.pieces(Piece::Pawn, them) & !bit(cap_sq)) == 0
}

fn king_moves<S: MoveSink>(board: &Board, detail: &Detail, us: Color, movetype: u8, sink: &mut S) {
    let them = us.opposite();
    let from = detail.king_square;
    let occ = board.occupied();
    let opp_occ = board.occupancy(them);

    // King moves ignore evasion targets: the king escapes by stepping off
    // the checking ray, verified with itself removed from the occupancy.
    let mut kmask = 0u64;
    if movetype & movetype::QUIET != 0 {
        kmask |= !occ;
    }
    if movetype & movetype::CAPTURE != 0 {
        kmask |= opp_occ;
    }

    let mut candidates = KING_ATTACKS[from as usize] & kmask;
    let occ_no_king = occ ^ bit(from);
    while candidates != 0 {
        let to = pop_lsb(&mut candidates);
        if square_attacked(board, to, them, occ_no_king) {
            continue;
        }
        let captured = occupant(board, to);
        let flags = if captured.is_some() { CAPTURE } else { QUIET_MOVE };
        sink.emit(Move::tagged(from, to, flags, captured, false));
    }

    // Castling: rights intact, path empty, and the king's from, transit and
    // destination squares unattacked. Never available while in check.
    if movetype & movetype::QUIET != 0 && detail.checkers == 0 {
        let (ks_between, qs_between) = match us {
            Color::White => (WHITE_KINGSIDE_BETWEEN, WHITE_QUEENSIDE_BETWEEN),
            Color::Black => (BLACK_KINGSIDE_BETWEEN, BLACK_QUEENSIDE_BETWEEN),
        };
        if board.has_kingside_castle(us)
            && occ & ks_between == 0
            && !square_attacked(board, from + 1, them, occ)
            && !square_attacked(board, from + 2, them, occ)
        {
            sink.emit(Move::tagged(from, from + 2, KINGSIDE_CASTLE, None, false));
        }
        if board.has_queenside_castle(us)
            && occ & qs_between == 0
            && !square_attacked(board, from - 1, them, occ)
            && !square_attacked(board, from - 2, them, occ)
        {
            sink.emit(Move::tagged(from, from - 2, QUEENSIDE_CASTLE, None, false));
        }
    }
}
