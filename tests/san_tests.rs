mod test_utils;

use corvid::types::MoveParseError;
use test_utils::{board_from, start_board, KIWIPETE};

#[test]
fn uci_round_trip_over_all_legal_moves() {
    let mut board = board_from(KIWIPETE);
    for mv in board.legal_moves() {
        let text = mv.to_uci();
        let parsed = board
            .move_from_uci(&text)
            .unwrap_or_else(|error| panic!("{text}: {error}"));
        assert_eq!(parsed, mv);
    }
}

#[test]
fn san_round_trip_over_all_legal_moves() {
    for fen in [
        KIWIPETE,
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N w - - 0 1",
    ] {
        let mut board = board_from(fen);
        for mv in board.legal_moves() {
            let san = board.san_from_move(mv);
            let parsed = board
                .move_from_san(&san)
                .unwrap_or_else(|error| panic!("{san} in {fen}: {error}"));
            assert_eq!(parsed, mv, "round trip of {san} in {fen}");
        }
    }
}

#[test]
fn simple_san_from_startpos() {
    let mut board = start_board();
    assert_eq!(board.move_from_san("e4").unwrap().to_uci(), "e2e4");
    assert_eq!(board.move_from_san("Nf3").unwrap().to_uci(), "g1f3");
    assert_eq!(board.move_from_san("a3").unwrap().to_uci(), "a2a3");
}

#[test]
fn castling_tokens() {
    let mut board = board_from("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");

    assert_eq!(board.move_from_san("O-O").unwrap().to_uci(), "e1g1");
    assert_eq!(board.move_from_san("0-0").unwrap().to_uci(), "e1g1");
    assert_eq!(board.move_from_san("O-O-O").unwrap().to_uci(), "e1c1");

    let short = board.move_from_san("O-O").unwrap();
    assert_eq!(board.san_from_move(short), "O-O");
}

#[test]
fn castling_is_rejected_when_illegal() {
    // The f1 transit square is attacked by the a6 bishop.
    let mut board = board_from("4k3/8/b7/8/8/8/8/4K2R w K - 0 1");
    assert!(matches!(
        board.move_from_san("O-O"),
        Err(MoveParseError::NoMatch(_))
    ));

    // Castling out of check is also illegal.
    let mut board = board_from("4k3/8/8/8/8/8/4r3/4K2R w K - 0 1");
    assert!(matches!(
        board.move_from_san("O-O"),
        Err(MoveParseError::NoMatch(_))
    ));

    // Castling into check (g1 covered by the b6 bishop).
    let mut board = board_from("4k3/8/1b6/8/8/8/8/4K2R w K - 0 1");
    assert!(matches!(
        board.move_from_san("O-O"),
        Err(MoveParseError::NoMatch(_))
    ));

    // A piece on f1 blocks the short castle entirely.
    let mut board = board_from("4k3/8/8/8/8/8/8/4KB1R w K - 0 1");
    assert!(matches!(
        board.move_from_san("O-O"),
        Err(MoveParseError::NoMatch(_))
    ));
}

#[test]
fn disambiguation_is_required_and_produced() {
    // Knights on b1 and f3 can both reach d2.
    let mut board = board_from("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1");

    assert!(matches!(
        board.move_from_san("Nd2"),
        Err(MoveParseError::Ambiguous(_))
    ));

    let from_b1 = board.move_from_san("Nbd2").unwrap();
    assert_eq!(from_b1.to_uci(), "b1d2");
    assert_eq!(board.san_from_move(from_b1), "Nbd2");

    let from_f3 = board.move_from_san("Nfd2").unwrap();
    assert_eq!(from_f3.to_uci(), "f3d2");
}

#[test]
fn rank_disambiguation_when_files_match() {
    // Rooks on a1 and a5 can both reach a3.
    let mut board = board_from("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");

    let from_a1 = board.move_from_san("R1a3").unwrap();
    assert_eq!(from_a1.to_uci(), "a1a3");
    assert_eq!(board.san_from_move(from_a1), "R1a3");
}

#[test]
fn promotion_and_capture_notation() {
    let mut board = board_from("1n6/P6k/8/8/8/8/7K/8 w - - 0 1");

    let push = board.move_from_san("a8=Q").unwrap();
    assert_eq!(push.to_uci(), "a7a8q");
    assert_eq!(board.san_from_move(push), "a8=Q");

    let capture = board.move_from_san("axb8=N").unwrap();
    assert_eq!(capture.to_uci(), "a7b8n");
    assert_eq!(board.san_from_move(capture), "axb8=N");
}

#[test]
fn check_and_mate_suffixes() {
    let mut board = board_from("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1");
    let mate = board.move_from_uci("e1e8").unwrap();
    assert_eq!(board.san_from_move(mate), "Re8#");

    let mut board = board_from("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    let check = board.move_from_uci("a1a8").unwrap();
    assert_eq!(board.san_from_move(check), "Ra8+");

    // Suffixes in the input are tolerated.
    assert_eq!(board.move_from_san("Ra8+").unwrap(), check);
}

#[test]
fn en_passant_uses_plain_capture_notation() {
    let mut board = start_board();
    for text in ["e2e4", "a7a6", "e4e5", "d7d5"] {
        let mv = board.move_from_uci(text).unwrap();
        board.do_move(mv);
    }

    let ep = board.move_from_san("exd6").unwrap();
    assert!(ep.is_en_passant());
    assert_eq!(board.san_from_move(ep), "exd6");
}

#[test]
fn malformed_input_is_rejected() {
    let mut board = start_board();

    assert!(matches!(
        board.move_from_uci("e2"),
        Err(MoveParseError::Malformed(_))
    ));
    assert!(matches!(
        board.move_from_uci("e2e4x"),
        Err(MoveParseError::Malformed(_))
    ));
    assert!(matches!(
        board.move_from_uci("e2e5"),
        Err(MoveParseError::NoMatch(_))
    ));

    assert!(matches!(
        board.move_from_san(""),
        Err(MoveParseError::Malformed(_))
    ));
    assert!(matches!(
        board.move_from_san("e9"),
        Err(MoveParseError::Malformed(_))
    ));
    assert!(matches!(
        board.move_from_san("Ke2"),
        Err(MoveParseError::NoMatch(_))
    ));
}
