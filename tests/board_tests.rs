mod test_utils;

use corvid::board::Board;
use corvid::types::{
    Piece, Side, CASTLE_ALL, CASTLE_BLACK_LONG, CASTLE_BLACK_SHORT, CASTLE_WHITE_LONG,
    CASTLE_WHITE_SHORT,
};
use test_utils::{board_from, start_board, walk_move_tree, KIWIPETE};

fn play(board: &mut Board, moves: &[&str]) {
    for text in moves {
        let mv = board
            .move_from_uci(text)
            .unwrap_or_else(|error| panic!("move {text}: {error}"));
        board.do_move(mv);
    }
}

#[test]
fn starting_position_layout() {
    let board = start_board();

    assert_eq!(board.occupancy(Side::White).count(), 16);
    assert_eq!(board.occupancy(Side::Black).count(), 16);

    assert_eq!(board.piece_at(corvid::types::sq::A1), Some((Side::White, Piece::Rook)));
    assert_eq!(board.piece_at(corvid::types::sq::E1), Some((Side::White, Piece::King)));
    assert_eq!(board.piece_at(corvid::types::sq::E8), Some((Side::Black, Piece::King)));
    assert_eq!(board.piece_at(corvid::types::sq::A8), Some((Side::Black, Piece::Rook)));

    for square in 16u8..48 {
        assert_eq!(board.piece_on(square), Piece::None);
    }

    assert_eq!(board.side_to_move(), Side::White);
    assert_eq!(board.castle_flags(), CASTLE_ALL);
    board.validate().unwrap();
}

#[test]
fn make_unmake_restores_everything_from_startpos() {
    let mut board = start_board();
    walk_move_tree(&mut board, 3);
}

#[test]
fn make_unmake_restores_everything_from_kiwipete() {
    let mut board = board_from(KIWIPETE);
    walk_move_tree(&mut board, 2);
}

#[test]
fn castling_moves_the_rook() {
    let mut board = board_from("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
    play(&mut board, &["e1g1"]);

    assert_eq!(board.piece_on(corvid::types::sq::G1), Piece::King);
    assert_eq!(board.piece_on(corvid::types::sq::F1), Piece::Rook);
    assert_eq!(board.piece_on(corvid::types::sq::H1), Piece::None);
    assert_eq!(board.castle_flags() & (CASTLE_WHITE_SHORT | CASTLE_WHITE_LONG), 0);

    board.undo_move();
    assert_eq!(board.castle_flags(), CASTLE_ALL);
    assert_eq!(board.piece_on(corvid::types::sq::H1), Piece::Rook);
}

#[test]
fn rook_moves_and_captures_drop_castling_rights() {
    let mut board = board_from("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");

    play(&mut board, &["a1b1"]);
    assert_eq!(board.castle_flags() & CASTLE_WHITE_LONG, 0);
    assert_ne!(board.castle_flags() & CASTLE_WHITE_SHORT, 0);

    // A capture on h8 strips Black's kingside right even though Black
    // never moved.
    let mut board = board_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play(&mut board, &["h1h8"]);
    assert_eq!(board.castle_flags() & CASTLE_BLACK_SHORT, 0);
    assert_ne!(board.castle_flags() & CASTLE_BLACK_LONG, 0);
}

#[test]
fn en_passant_capture_removes_the_pawn() {
    let mut board = start_board();
    play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(board.en_passant_square(), Some(corvid::types::sq::D6));

    play(&mut board, &["e5d6"]);
    assert_eq!(board.piece_on(corvid::types::sq::D5), Piece::None);
    assert_eq!(board.piece_on(corvid::types::sq::D6), Piece::Pawn);

    board.undo_move();
    assert_eq!(board.piece_on(corvid::types::sq::D5), Piece::Pawn);
    assert_eq!(board.en_passant_square(), Some(corvid::types::sq::D6));
}

#[test]
fn en_passant_square_is_cleared_after_one_ply() {
    let mut board = start_board();
    play(&mut board, &["e2e4"]);
    assert_eq!(board.en_passant_square(), Some(corvid::types::sq::E3));

    play(&mut board, &["g8f6"]);
    assert_eq!(board.en_passant_square(), None);
}

#[test]
fn promotion_swaps_the_piece_and_unmake_restores_the_pawn() {
    let mut board = board_from("8/P6k/8/8/8/8/7K/8 w - - 0 1");
    play(&mut board, &["a7a8q"]);

    assert_eq!(board.piece_on(corvid::types::sq::A8), Piece::Queen);
    assert!(board.bitboard(Side::White, Piece::Pawn).is_empty());

    board.undo_move();
    assert_eq!(board.piece_on(corvid::types::sq::A7), Piece::Pawn);
    assert!(board.bitboard(Side::White, Piece::Queen).is_empty());
    board.validate().unwrap();
}

#[test]
fn halfmove_clock_resets_on_pawn_moves_and_captures() {
    let mut board = start_board();
    play(&mut board, &["g1f3", "b8c6"]);
    assert_eq!(board.halfmove_clock(), 2);

    play(&mut board, &["e2e4"]);
    assert_eq!(board.halfmove_clock(), 0);

    play(&mut board, &["c6d4", "f3d4"]);
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn fullmove_number_increments_after_black() {
    let mut board = start_board();
    assert_eq!(board.fullmove_number(), 1);
    play(&mut board, &["e2e4"]);
    assert_eq!(board.fullmove_number(), 1);
    play(&mut board, &["e7e5"]);
    assert_eq!(board.fullmove_number(), 2);
}

#[test]
fn threefold_repetition_is_detected() {
    let mut board = start_board();
    // Shuffle the knights back and forth twice.
    play(
        &mut board,
        &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"],
    );
    assert!(board.is_threefold());
}

#[test]
fn fifty_move_rule_uses_halfmove_clock() {
    let mut board = board_from("4k3/8/8/8/8/8/8/4K2R w - - 99 80");
    assert!(!board.is_fifty_move_draw());
    play(&mut board, &["h1h2"]);
    assert!(board.is_fifty_move_draw());
}

#[test]
fn null_move_flips_side_and_clears_en_passant() {
    let mut board = start_board();
    play(&mut board, &["e2e4"]);
    let hash = board.hash();

    board.do_null_move();
    assert_eq!(board.side_to_move(), Side::White);
    assert_eq!(board.en_passant_square(), None);
    assert_ne!(board.hash(), hash);

    board.undo_move();
    assert_eq!(board.side_to_move(), Side::Black);
    assert_eq!(board.en_passant_square(), Some(corvid::types::sq::E3));
    assert_eq!(board.hash(), hash);
}

#[test]
fn pinned_pieces_cannot_expose_the_king() {
    // The e4 knight is pinned against the white king by the e8 rook.
    let mut board = board_from("4r2k/8/8/8/4N3/8/8/4K3 w - - 0 1");
    let moves = board.legal_moves();
    assert!(moves.iter().all(|mv| mv.piece() != Piece::Knight));
}

#[test]
fn check_must_be_resolved() {
    let mut board = board_from("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1");
    assert!(board.is_check());

    for mv in board.legal_moves() {
        board.do_move(mv);
        assert!(!board.is_side_in_check(Side::White));
        board.undo_move();
    }
}
