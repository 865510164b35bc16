use crate::bitboard::BitboardExt;
use crate::board::{Board, Color, Piece};
use crate::moves::attacks::{BETWEEN, BISHOP_RAY, KNIGHT_ATTACKS, PAWN_ATTACKS, ROOK_RAY};
use crate::moves::magic::sliding;
use crate::moves::square_control::attackers_to;

/// Per-ply derived state the generator works from: where the king is, who
/// checks it, which own pieces are pinned and along which ray kind, which
/// squares block or capture a lone checker, and from which squares each of
/// our piece types would check the opposing king.
///
/// Checking squares are pre-masked to empty squares, which makes the
/// quiet / check / capture target buckets a true partition of legal moves:
/// a capture that also checks is classified as a capture.
pub struct Detail {
    pub king_square: u8,
    pub checkers: u64,
    /// All squares when not in check; block-or-capture squares against a
    /// single checker; empty under double check (king moves only).
    pub evasion_targets: u64,
    /// Own pieces pinned along a diagonal from the king.
    pub bishop_pinned: u64,
    /// Own pieces pinned along a rank or file from the king.
    pub rook_pinned: u64,
    pub pawn_checking: u64,
    pub knight_checking: u64,
    pub bishop_checking: u64,
    pub rook_checking: u64,
}

impl Detail {
    pub fn new(board: &Board, us: Color) -> Self {
        let them = us.opposite();
        let occ = board.occupied();
        let own = board.occupancy(us);
        let ksq = board.king_square(us).index();

        let checkers = attackers_to(board, ksq, them, occ);
        let evasion_targets = match checkers.count_ones() {
            0 => !0u64,
            1 => checkers | BETWEEN[ksq as usize][checkers.lsb() as usize],
            _ => 0,
        };

        let queens = board.pieces(Piece::Queen, them);
        let mut bishop_pinned = 0u64;
        let mut rook_pinned = 0u64;

        // A slider aligned with the king pins the single own piece standing
        // between them. Two blockers of any color mean no pin on this ray.
        let mut snipers = ROOK_RAY[ksq as usize] & (board.pieces(Piece::Rook, them) | queens);
        while snipers != 0 {
            let sniper = snipers.lsb();
            snipers &= snipers - 1;
            let blockers = BETWEEN[ksq as usize][sniper as usize] & occ;
            if blockers.count_ones() == 1 && blockers & own != 0 {
                rook_pinned |= blockers;
            }
        }
        let mut snipers = BISHOP_RAY[ksq as usize] & (board.pieces(Piece::Bishop, them) | queens);
        while snipers != 0 {
            let sniper = snipers.lsb();
            snipers &= snipers - 1;
            let blockers = BETWEEN[ksq as usize][sniper as usize] & occ;
            if blockers.count_ones() == 1 && blockers & own != 0 {
                bishop_pinned |= blockers;
            }
        }

        let osq = board.king_square(them).index() as usize;
        let empty = !occ;
        let t = sliding();

        Detail {
            king_square: ksq,
            checkers,
            evasion_targets,
            bishop_pinned,
            rook_pinned,
            // Squares from which one of our pawns attacks their king are the
            // squares one of their pawns on the king square would attack.
            pawn_checking: PAWN_ATTACKS[them as usize][osq] & empty,
            knight_checking: KNIGHT_ATTACKS[osq] & empty,
            bishop_checking: t.bishop(osq, occ) & empty,
            rook_checking: t.rook(osq, occ) & empty,
        }
    }
}
