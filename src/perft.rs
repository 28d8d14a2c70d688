//! Move-generator node counting. The numbers for the standard positions
//! are well known, which makes perft the regression test for the whole
//! make/unmake and generation pipeline.

use crate::board::Board;

/// Counts leaf nodes of the legal move tree to `depth`.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves();

    // Every legal move is one leaf; skip the make/unmake round.
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.do_move(mv);
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

/// Per-root-move node counts, in the order the generator produced them.
/// This is the usual way to bisect a generation bug against a known-good
/// engine's `divide` output.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let mut results = Vec::new();

    for mv in board.legal_moves() {
        board.do_move(mv);
        let nodes = if depth > 1 {
            perft(board, depth - 1)
        } else {
            1
        };
        board.undo_move();
        results.push((mv.to_uci(), nodes));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_shallow_counts() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 0), 1);
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::new();
        let divide = perft_divide(&mut board, 3);

        assert_eq!(divide.len(), 20);
        let total: u64 = divide.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&mut board, 3));
    }
}
