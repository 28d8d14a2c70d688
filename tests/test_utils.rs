#![allow(dead_code)]

//! Shared helpers for the integration tests.

use corvid::attacks;
use corvid::board::Board;

/// Positions that between them exercise castling, en passant, promotions,
/// pins and discovered checks.
pub const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
pub const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
pub const PROMOTION: &str = "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1";

pub fn board_from(fen: &str) -> Board {
    attacks::init();
    Board::from_fen(fen).unwrap_or_else(|error| panic!("bad test FEN {fen:?}: {error}"))
}

pub fn start_board() -> Board {
    attacks::init();
    Board::new()
}

/// Plays out every legal move to `depth` plies, asserting board consistency
/// at each node and that unmake restores the position exactly.
pub fn walk_move_tree(board: &mut Board, depth: u32) {
    if depth == 0 {
        return;
    }

    let fen = board.to_fen();
    let hash = board.hash();

    for mv in board.legal_moves() {
        board.do_move(mv);
        board
            .validate()
            .unwrap_or_else(|error| panic!("after {mv}: {error}"));
        walk_move_tree(board, depth - 1);
        board.undo_move();

        assert_eq!(board.to_fen(), fen, "unmake of {mv} changed the position");
        assert_eq!(board.hash(), hash, "unmake of {mv} changed the hash");
    }
}
