//! UCI front end: a line-oriented loop over stdin/stdout that owns the
//! board and the transposition table.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::time::Instant;

use tracing::warn;
use tundra::board::Board;
use tundra::logger::init_logging;
use tundra::moves::movegen::movetype;
use tundra::moves::perft::perft;
use tundra::search::search::search;
use tundra::search::tt::TranspositionTable;

const ENGINE_NAME: &str = "Tundra";
const AUTHOR: &str = "the Tundra authors";
/// 256 MiB transposition table, allocated once at startup.
const TT_BYTES: usize = 1 << 28;
const DEFAULT_DEPTH: i32 = 8;

fn main() {
    init_logging("logs/tundra.log", "info");

    let mut board = Board::new();
    let mut tt = TranspositionTable::new(TT_BYTES);

    println!("{} v{}", ENGINE_NAME, env!("CARGO_PKG_VERSION"));
    println!(
        "info string transposition table size {} MiB",
        tt.size_bytes() >> 20
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            continue;
        };

        match command {
            "uci" => {
                println!("id name {} v{}", ENGINE_NAME, env!("CARGO_PKG_VERSION"));
                println!("id author {}", AUTHOR);
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                board = Board::new();
                tt.clear();
            }
            "position" => handle_position(&mut board, &tokens[1..]),
            "go" => handle_go(&mut board, &mut tt, &tokens[1..]),
            "d" => println!("{}", board.ascii()),
            "fen" => println!("{}", board.to_fen()),
            "test" => handle_test(&mut board, &tokens[1..]),
            "quit" | "exit" => break,
            other => {
                warn!(command = other, "unknown command ignored");
            }
        }
    }
}

/// `position [startpos | fen <FEN>] [moves <m1> <m2> …]`
fn handle_position(board: &mut Board, args: &[&str]) {
    let moves_at = args.iter().position(|&t| t == "moves");
    let setup = &args[..moves_at.unwrap_or(args.len())];

    match setup.first() {
        Some(&"startpos") => *board = Board::new(),
        Some(&"fen") => {
            let fen = setup[1..].join(" ");
            if let Err(err) = board.set_fen(&fen) {
                warn!(%err, "bad fen in position command");
                eprintln!("info string bad fen: {}", err);
                return;
            }
        }
        _ => {
            warn!("position without startpos/fen ignored");
            return;
        }
    }

    if let Some(at) = moves_at {
        for text in &args[at + 1..] {
            if let Err(err) = board.push_uci(text) {
                // stop applying the rest of the list; the position would
                // drift further from what the GUI meant
                warn!(%err, "stopping move application");
                eprintln!("info string {}", err);
                break;
            }
        }
    }
}

/// `go [perft <depth> [quiet|check|capture|legal]] [depth <n>]`
fn handle_go(board: &mut Board, tt: &mut TranspositionTable, args: &[&str]) {
    let mut depth = DEFAULT_DEPTH;
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "perft" => {
                let perft_depth = args
                    .get(i + 1)
                    .and_then(|t| t.parse::<u32>().ok())
                    .unwrap_or(1);
                let mt = match args.get(i + 2).copied() {
                    Some("quiet") => movetype::QUIET,
                    Some("check") => movetype::CHECK,
                    Some("capture") => movetype::CAPTURE,
                    _ => movetype::LEGAL,
                };
                perft(board, perft_depth, mt, true);
                return;
            }
            "depth" => {
                if let Some(n) = args.get(i + 1).and_then(|t| t.parse::<i32>().ok()) {
                    depth = n;
                }
                i += 2;
                continue;
            }
            _ => i += 1,
        }
    }

    let result = search(board, tt, depth);
    match result.pv.first() {
        Some(mv) => println!("bestmove {}", mv),
        None => println!("bestmove 0000"),
    }
}

/// `test perft <path>`: run an EPD perft suite.
fn handle_test(board: &mut Board, args: &[&str]) {
    match args {
        ["perft", path] => run_perft_suite(board, path),
        _ => eprintln!("info string usage: test perft <path>"),
    }
}

/// Each suite line reads `<FEN> ;D1 n1 ;D2 n2 …`. Every depth is checked;
/// mismatches are flagged and counted and the suite keeps going.
fn run_perft_suite(board: &mut Board, path: &str) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => match File::open(format!("suites/{}", path)) {
            Ok(f) => f,
            Err(err) => {
                eprintln!("info string could not open {}: {}", path, err);
                return;
            }
        },
    };

    let original_fen = board.to_fen();
    let start = Instant::now();
    let mut correct = 0u32;
    let mut total = 0u32;
    let mut total_nodes = 0u64;
    let mut max_mnps = 0.0f64;

    for line in BufReader::new(file).lines() {
        let line = line.unwrap_or_default();
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split(';');
        let fen = parts.next().unwrap_or("").trim();
        if let Err(err) = board.set_fen(fen) {
            warn!(%err, fen, "skipping suite line");
            continue;
        }
        println!("Fen: {}", board.to_fen());

        for field in parts {
            let mut tokens = field.split_whitespace();
            let (Some(depth_token), Some(nodes_token)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            let Ok(depth) = depth_token.trim_start_matches('D').parse::<u32>() else {
                warn!(depth_token, "bad depth token in suite");
                continue;
            };
            let Ok(expected) = nodes_token.parse::<u64>() else {
                warn!(nodes_token, "bad node count in suite");
                continue;
            };

            let result = perft(board, depth, movetype::LEGAL, false);
            let ok = result.nodes == expected;
            println!(
                "{}  Depth: {}  Result: {}  Expected: {}",
                if ok { "      " } else { "FAILED" },
                depth,
                result.nodes,
                expected
            );
            correct += u32::from(ok);
            total += 1;
            total_nodes += result.nodes;
            max_mnps = max_mnps.max(result.mnps);
        }
    }

    let time = start.elapsed().as_secs_f64();
    println!("Correct: {}/{}", correct, total);
    println!("Total time: {:.3} s", time);
    if time > 0.0 {
        println!("Mean MNps: {:.1}", total_nodes as f64 / time * 1e-6);
    }
    println!("Max MNps: {:.1}", max_mnps);

    if let Err(err) = board.set_fen(&original_fen) {
        warn!(%err, "could not restore position after suite");
    }
}
