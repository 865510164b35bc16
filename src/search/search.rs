//! Iterative-deepening negamax with quiescence and a transposition table.

use crate::board::Board;
use crate::moves::movegen::{self, movetype};
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::eval::evaluate;
use crate::search::ordering::{noisy_key, order_key};
use crate::search::tt::{Bound, TranspositionTable};
use std::time::Instant;

pub const INF: i32 = 32_000;
pub const MATE: i32 = 31_000;
/// Scores beyond this are mate-in-N; they shift by one per ply so nearer
/// mates stay preferred.
pub const MATE_THRESHOLD: i32 = 30_000;
const DRAW: i32 = 0;
const MAX_QSEARCH_DEPTH: i32 = 32;

/// A finished (sub)search: principal variation and its score. Interior
/// nodes keep the PV leaf-first and the root reverses it once.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub pv: Vec<Move>,
    pub score: i32,
}

#[derive(Default)]
struct Counters {
    nodes: u64,
    tbhits: u64,
}

/// Pull a child's mate score one ply toward zero so "mate in N" compares
/// correctly across depths; everything else passes through.
#[inline(always)]
fn add_depth(score: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score - 1
    } else if score < -MATE_THRESHOLD {
        score + 1
    } else {
        score
    }
}

/// Quiescence: stand pat on the static eval, then extend only checks and
/// captures, best captures first.
fn q_search(
    board: &mut Board,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    counters: &mut Counters,
) -> i32 {
    counters.nodes += 1;
    if depth == 0 {
        return evaluate(board);
    }

    let stand_pat = evaluate(board);
    if stand_pat >= beta {
        return beta;
    }
    if alpha < stand_pat {
        alpha = stand_pat;
    }

    let mut moves = movegen::generate(board, movetype::CHECK | movetype::CAPTURE);
    moves.sort_by_score(|m| noisy_key(board, *m));

    for &mv in moves.iter() {
        board.make(mv);
        let score = -add_depth(q_search(board, depth - 1, -beta, -alpha, counters));
        board.unmake();

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }
    alpha
}

fn negamax(
    board: &mut Board,
    tt: &mut TranspositionTable,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    hint: &[Move],
    counters: &mut Counters,
) -> SearchResult {
    if depth == 0 {
        return SearchResult {
            pv: Vec::new(),
            score: q_search(board, MAX_QSEARCH_DEPTH, alpha, beta, counters),
        };
    }

    // Any repetition of an ancestor is scored as an immediate draw.
    if board.position_existed() {
        counters.nodes += 1;
        return SearchResult {
            pv: Vec::new(),
            score: DRAW,
        };
    }
    counters.nodes += 1;

    let hash = board.zobrist;
    let mut tt_move = None;
    {
        let entry = tt.entry(hash);
        if entry.matches(hash) && !entry.mv.is_null() {
            tt_move = Some(entry.mv);
        }
        if entry.is_valid(hash, depth) {
            counters.tbhits += 1;
            let score = i32::from(entry.score);
            match entry.bound {
                Bound::Exact => {
                    return SearchResult {
                        pv: tt_move.into_iter().collect(),
                        score,
                    };
                }
                Bound::Upper => beta = beta.min(score),
                Bound::Lower => alpha = alpha.max(score),
            }
            if alpha >= beta {
                return SearchResult {
                    pv: tt_move.into_iter().collect(),
                    score,
                };
            }
        }
    }

    let mut moves = movegen::generate(board, movetype::LEGAL);
    if moves.is_empty() {
        let score = if in_check(board, board.side_to_move) {
            -MATE
        } else {
            DRAW
        };
        return SearchResult {
            pv: Vec::new(),
            score,
        };
    }

    let pv_move = hint.first().copied();
    moves.sort_by_score(|m| order_key(board, *m, pv_move, tt_move));

    let mut pv: Vec<Move> = Vec::new();
    let mut bound = Bound::Upper;
    for &mv in moves.iter() {
        board.make(mv);
        let child_hint = if pv_move == Some(mv) { &hint[1..] } else { &[][..] };
        let child = negamax(board, tt, depth - 1, -beta, -alpha, child_hint, counters);
        board.unmake();
        let score = -add_depth(child.score);

        if score > alpha {
            pv = child.pv;
            pv.push(mv);
            if score >= beta {
                tt.entry_mut(hash).set(hash, mv, score, depth, Bound::Lower);
                return SearchResult { pv, score: beta };
            }
            alpha = score;
            bound = Bound::Exact;
        }
    }

    let best = pv.last().copied().unwrap_or(Move::NULL);
    tt.entry_mut(hash).set(hash, best, alpha, depth, bound);
    SearchResult { pv, score: alpha }
}

/// Iterative deepening to `depth`, reusing each iteration's PV to order the
/// next. Prints one UCI info line per completed iteration and stops early
/// once a mate score is found, at which point the PV is stable.
pub fn search(board: &mut Board, tt: &mut TranspositionTable, depth: i32) -> SearchResult {
    let mut result = SearchResult::default();
    let mut hint: Vec<Move> = Vec::new();

    for d in 1..=depth {
        let mut counters = Counters::default();
        let start = Instant::now();

        let mut iter = negamax(board, tt, d, -INF, INF, &hint, &mut counters);
        iter.pv.reverse();

        let time = start.elapsed().as_millis() as u64;
        let nps = counters.nodes * 1000 / time.max(1);
        if let Some(first) = iter.pv.first() {
            println!(
                "info depth {} score cp {} time {} tbhits {} nodes {} nps {} string current bestmove {}",
                d, iter.score, time, counters.tbhits, counters.nodes, nps, first
            );
        }

        hint = iter.pv.clone();
        result = iter;
        if result.score.abs() > MATE_THRESHOLD {
            break;
        }
    }

    result
}
