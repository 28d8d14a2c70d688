//! UCI protocol front end: reads commands from stdin, drives the engine,
//! prints `info` and `bestmove` lines to stdout.

use crate::board::Board;
use crate::perft;
use crate::search::{is_mate_score, Engine, SearchLimits, SearchReport, MATE};
use std::io::{self, BufRead, Write};

const ENGINE_NAME: &str = "Corvid";
const ENGINE_AUTHOR: &str = "the Corvid authors";

pub fn uci_loop(engine: &mut Engine) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let Ok(input) = line else { break };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts[0] {
            "uci" => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => engine.new_game(),
            "position" => {
                if let Err(error) = handle_position(engine, &parts) {
                    eprintln!("error parsing position: {error}");
                }
            }
            "go" => handle_go(engine, &parts),
            "d" | "display" => print!("{}", engine.board),
            "stop" => {} // searches here are synchronous
            "quit" => break,
            _ => {} // unknown commands are ignored per the UCI spec
        }

        stdout.flush().ok();
    }
}

/// `position startpos [moves ...]` or `position fen <fen> [moves ...]`.
fn handle_position(engine: &mut Engine, parts: &[&str]) -> Result<(), String> {
    let mut index = 1;

    match parts.get(index) {
        Some(&"startpos") => {
            engine.board.reset();
            index += 1;
        }
        Some(&"fen") => {
            index += 1;
            let fen_end = parts[index..]
                .iter()
                .position(|&token| token == "moves")
                .map_or(parts.len(), |offset| index + offset);

            let fen = parts[index..fen_end].join(" ");
            engine.board = Board::from_fen(&fen).map_err(|error| error.to_string())?;
            index = fen_end;
        }
        _ => return Err("expected 'startpos' or 'fen'".to_string()),
    }

    if parts.get(index) == Some(&"moves") {
        for token in &parts[index + 1..] {
            let mv = engine
                .board
                .move_from_uci(token)
                .map_err(|error| format!("move '{token}': {error}"))?;
            engine.board.do_move(mv);
        }
    }

    Ok(())
}

fn handle_go(engine: &mut Engine, parts: &[&str]) {
    let mut limits = SearchLimits::default();
    let mut tokens = parts[1..].iter();

    while let Some(&token) = tokens.next() {
        let mut value = || tokens.next().and_then(|v| v.parse::<u64>().ok());

        match token {
            "perft" => {
                if let Some(depth) = value() {
                    run_perft(engine, depth as u32);
                }
                return;
            }
            "depth" => limits.depth = value().map(|d| d as u16),
            "movetime" => limits.movetime = value(),
            "wtime" => limits.wtime = value(),
            "btime" => limits.btime = value(),
            "winc" => limits.winc = value(),
            "binc" => limits.binc = value(),
            "infinite" => limits = SearchLimits::default(),
            _ => {}
        }
    }

    // Plain "go" with no limits would never return; cap the depth.
    if limits.depth.is_none()
        && limits.movetime.is_none()
        && limits.wtime.is_none()
        && limits.btime.is_none()
    {
        limits.depth = Some(12);
    }

    let result = engine.think(&limits, &mut print_info);

    match result.best_move {
        Some(mv) => println!("bestmove {}", mv.to_uci()),
        None => println!("bestmove 0000"),
    }
}

fn print_info(report: &SearchReport) {
    let elapsed = report.elapsed_millis.max(1) as u64;
    let nps = report.nodes * 1000 / elapsed;
    let pv: Vec<String> = report.pv.iter().map(|mv| mv.to_uci()).collect();

    println!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        report.depth,
        format_score(report.score),
        report.nodes,
        nps,
        elapsed,
        pv.join(" ")
    );
}

/// Centipawns, or `mate N` in full moves once the score is forced.
fn format_score(score: i32) -> String {
    if is_mate_score(score) {
        let plies = MATE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {score}")
    }
}

fn run_perft(engine: &mut Engine, depth: u32) {
    let start = std::time::Instant::now();
    let divide = perft::perft_divide(&mut engine.board, depth);
    let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();

    for (mv, nodes) in &divide {
        println!("{mv}: {nodes}");
    }
    println!();
    println!(
        "nodes {} time {} ms",
        total,
        start.elapsed().as_millis()
    );
}
