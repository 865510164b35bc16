use crate::board::Board;
use crate::moves::movegen::{self, movetype};
use std::time::Instant;
use tracing::{debug, instrument};

/// Outcome of a perft run: leaf count, wall time in seconds, and millions
/// of nodes per second.
#[derive(Debug, Clone, Copy)]
pub struct PerftResult {
    pub nodes: u64,
    pub time: f64,
    pub mnps: f64,
}

/// Recursive node counter. Depth 1 uses the generator's count mode, and the
/// last make/unmake level is unrolled so the hot path counts the opponent's
/// replies without encoding them.
fn perft_inner(board: &mut Board, depth: u32, mt: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return movegen::count(board, mt);
    }
    if depth == 2 {
        let legal = movegen::generate(board, movetype::LEGAL);
        let mut nodes = 0;
        for &mv in legal.iter() {
            board.make(mv);
            nodes += movegen::count(board, mt);
            board.unmake();
        }
        return nodes;
    }

    let legal = movegen::generate(board, movetype::LEGAL);
    let mut nodes = 0;
    for &mv in legal.iter() {
        board.make(mv);
        nodes += perft_inner(board, depth - 1, mt);
        board.unmake();
    }
    nodes
}

/// Count leaf nodes of the move tree to `depth`, optionally restricted to a
/// movetype at the leaves. With `print`, emits a divide (per root move
/// subtree counts) and a totals block.
#[instrument(skip(board), fields(depth, mt))]
pub fn perft(board: &mut Board, depth: u32, mt: u8, print: bool) -> PerftResult {
    if depth == 0 {
        return PerftResult {
            nodes: 0,
            time: 0.0,
            mnps: 0.0,
        };
    }

    let start = Instant::now();
    let legal = movegen::generate(board, movetype::LEGAL);
    let filtered = movegen::generate(board, mt);

    let mut nodes = 0u64;
    for &mv in legal.iter() {
        let local = if depth == 1 {
            u64::from(filtered.contains(&mv))
        } else {
            board.make(mv);
            let n = perft_inner(board, depth - 1, mt);
            board.unmake();
            n
        };
        nodes += local;
        if print {
            println!("{}: {}", mv, local);
        }
    }

    let time = start.elapsed().as_secs_f64();
    let mnps = if time > 0.0 {
        nodes as f64 / time * 1e-6
    } else {
        0.0
    };
    debug!(depth, nodes, time, mnps, "perft finished");

    if print {
        println!();
        println!("Nodes searched: {}", nodes);
        println!("Total time: {:.3} s", time);
        println!("MNps: {:.1}", mnps);
    }

    PerftResult { nodes, time, mnps }
}
