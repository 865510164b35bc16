use crate::board::castle_bits::*;
use crate::board::{Board, Piece};
use crate::moves::attacks::PAWN_ATTACKS;
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Fixed seed: the whole engine must be reproducible run to run, so the key
/// table is never derived from entropy.
const ZOBRIST_SEED: u64 = 0xB5AD_4ECE_DA1C_E2A9;

pub struct ZobristKeys {
    /// [color][piece][square] with {White=0, Black=1} and {P,N,B,R,Q,K}={0..5}.
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// [0]=K, [1]=Q, [2]=k, [3]=q.
    pub castling: [u64; 4],
    /// Files a..h => 0..7.
    pub ep_file: [u64; 8],
}

/// Global keys, generated on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // zero keys would make distinct states collide trivially
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };

    for c in 0..2 {
        for p in 0..6 {
            for sq in 0..64 {
                keys.piece[c][p][sq] = non_zero(&mut rng);
            }
        }
    }
    for i in 0..4 {
        keys.castling[i] = non_zero(&mut rng);
    }
    for f in 0..8 {
        keys.ep_file[f] = non_zero(&mut rng);
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}

/// XOR in the castling keys whose bits differ between `old` and `new`.
#[inline]
pub fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old: u8, new: u8) {
    let d = old ^ new;
    if d & CASTLE_WK != 0 {
        *hash ^= keys.castling[0];
    }
    if d & CASTLE_WQ != 0 {
        *hash ^= keys.castling[1];
    }
    if d & CASTLE_BK != 0 {
        *hash ^= keys.castling[2];
    }
    if d & CASTLE_BQ != 0 {
        *hash ^= keys.castling[3];
    }
}

/// File (0..7) of the en passant square if it should contribute to the hash
/// this ply, else None.
///
/// The file is hashed only when a side-to-move pawn could pseudo-legally
/// capture onto the square: two positions that admit the same play-outs must
/// hash equally, and a dead en passant right changes nothing.
pub fn ep_file_to_hash(board: &Board) -> Option<u8> {
    let ep = board.en_passant?;
    let sq = ep.index();

    let rank = sq / 8;
    if rank != 2 && rank != 5 {
        return None;
    }

    // Squares from which a side-to-move pawn attacks `sq` are exactly the
    // squares an opposing pawn on `sq` would attack.
    let us = board.side_to_move;
    let sources = PAWN_ATTACKS[us.opposite() as usize][sq as usize];
    if sources & board.pieces(Piece::Pawn, us) != 0 {
        Some(sq % 8)
    } else {
        None
    }
}
