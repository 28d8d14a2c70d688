use std::fmt;

use crate::attacks;
use crate::bitboard::BitBoard;
use crate::moves::Move;
use crate::types::{
    sq, FenError, MoveParseError, Piece, Side, CASTLE_BLACK_LONG, CASTLE_BLACK_SHORT,
    CASTLE_WHITE_LONG, CASTLE_WHITE_SHORT,
};
use crate::zobrist;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castle rights kept after a move touches each square. Moves from *or to*
/// a king or rook home square strip the matching rights, which covers rook
/// captures as well as rook moves.
const CASTLE_MASKS: [u8; 64] = {
    let mut masks = [0b1111u8; 64];
    masks[sq::A1 as usize] = !CASTLE_WHITE_LONG;
    masks[sq::E1 as usize] = !(CASTLE_WHITE_SHORT | CASTLE_WHITE_LONG);
    masks[sq::H1 as usize] = !CASTLE_WHITE_SHORT;
    masks[sq::A8 as usize] = !CASTLE_BLACK_LONG;
    masks[sq::E8 as usize] = !(CASTLE_BLACK_SHORT | CASTLE_BLACK_LONG);
    masks[sq::H8 as usize] = !CASTLE_BLACK_SHORT;
    masks
};

const WHITE_SHORT_PATH: u64 = (1 << sq::F1) | (1 << sq::G1);
const WHITE_LONG_PATH: u64 = (1 << sq::B1) | (1 << sq::C1) | (1 << sq::D1);
const BLACK_SHORT_PATH: u64 = WHITE_SHORT_PATH << 56;
const BLACK_LONG_PATH: u64 = WHITE_LONG_PATH << 56;

/// Everything needed to reverse one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardState {
    hash: u64,
    ep_square: i8,
    castle_flags: u8,
    mv: Move,
    half_move: u16,
}

pub struct Board {
    /// `boards[side][piece]`, with index 0 holding the side's occupancy.
    boards: [[BitBoard; 7]; 2],
    /// What stands on each square, for O(1) lookups.
    piece_board: [Piece; 64],
    us: Side,
    castle_flags: u8,
    /// Target square of a possible en-passant capture, or -1.
    ep_square: i8,
    half_move: u16,
    full_move: u16,
    /// Moves made since this board was loaded.
    ply: u16,
    hash: u64,
    state_stack: Vec<BoardState>,
}

impl Board {
    pub fn new() -> Board {
        Board::from_fen(START_FEN).expect("start position FEN is valid")
    }

    fn empty() -> Board {
        Board {
            boards: [[BitBoard::EMPTY; 7]; 2],
            piece_board: [Piece::None; 64],
            us: Side::White,
            castle_flags: 0,
            ep_square: -1,
            half_move: 0,
            full_move: 1,
            ply: 0,
            hash: 0,
            state_stack: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Board::new();
    }

    // --- accessors ---

    pub fn side_to_move(&self) -> Side {
        self.us
    }

    pub fn castle_flags(&self) -> u8 {
        self.castle_flags
    }

    pub fn en_passant_square(&self) -> Option<u8> {
        (self.ep_square >= 0).then_some(self.ep_square as u8)
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.half_move
    }

    pub fn fullmove_number(&self) -> u16 {
        self.full_move
    }

    pub fn ply(&self) -> u16 {
        self.ply
    }

    pub fn bitboard(&self, side: Side, piece: Piece) -> BitBoard {
        self.boards[side as usize][piece as usize]
    }

    pub fn occupancy(&self, side: Side) -> BitBoard {
        self.boards[side as usize][0]
    }

    pub fn all_occupancy(&self) -> u64 {
        self.boards[0][0].0 | self.boards[1][0].0
    }

    pub fn piece_on(&self, square: u8) -> Piece {
        self.piece_board[square as usize]
    }

    pub fn piece_at(&self, square: u8) -> Option<(Side, Piece)> {
        let piece = self.piece_board[square as usize];
        if piece == Piece::None {
            return None;
        }

        let side = if self.boards[Side::White as usize][0].is_set(square) {
            Side::White
        } else {
            Side::Black
        };
        Some((side, piece))
    }

    pub fn king_square(&self, side: Side) -> u8 {
        self.boards[side as usize][Piece::King as usize].lsb()
    }

    // --- piece placement primitives, keeping the hash in sync ---

    fn set_piece(&mut self, square: u8, side: Side, piece: Piece) {
        self.boards[side as usize][piece as usize].set_bit(square);
        self.boards[side as usize][0].set_bit(square);
        self.piece_board[square as usize] = piece;
        self.hash ^= zobrist::keys().piece[side as usize][piece as usize][square as usize];
    }

    fn remove_piece(&mut self, square: u8) {
        if let Some((side, piece)) = self.piece_at(square) {
            self.boards[side as usize][piece as usize].clear_bit(square);
            self.boards[side as usize][0].clear_bit(square);
            self.piece_board[square as usize] = Piece::None;
            self.hash ^= zobrist::keys().piece[side as usize][piece as usize][square as usize];
        }
    }

    fn move_piece(&mut self, from: u8, to: u8) {
        self.remove_piece(to);

        if let Some((side, piece)) = self.piece_at(from) {
            let keys = zobrist::keys();
            self.boards[side as usize][piece as usize].clear_bit(from);
            self.boards[side as usize][0].clear_bit(from);
            self.boards[side as usize][piece as usize].set_bit(to);
            self.boards[side as usize][0].set_bit(to);
            self.piece_board[from as usize] = Piece::None;
            self.piece_board[to as usize] = piece;
            self.hash ^= keys.piece[side as usize][piece as usize][from as usize]
                ^ keys.piece[side as usize][piece as usize][to as usize];
        }
    }

    // --- make / unmake ---

    pub fn do_move(&mut self, mv: Move) {
        let keys = zobrist::keys();

        self.state_stack.push(BoardState {
            hash: self.hash,
            ep_square: self.ep_square,
            castle_flags: self.castle_flags,
            mv,
            half_move: self.half_move,
        });

        self.hash ^= keys.castle_rights[self.castle_flags as usize];
        if self.ep_square >= 0 {
            self.hash ^= keys.en_passant_file[(self.ep_square & 7) as usize];
        }

        if mv.is_null() {
            self.ep_square = -1;
            self.half_move += 1;
        } else {
            let us = self.us;
            let from = mv.from();
            let to = mv.to();
            let piece = mv.piece();

            if piece == Piece::Pawn || mv.is_capture() {
                self.half_move = 0;
            } else {
                self.half_move += 1;
            }

            self.move_piece(from, to);

            if mv.is_promotion() {
                self.remove_piece(to);
                self.set_piece(to, us, mv.promotion());
            }

            if mv.is_en_passant() {
                let capture_square = if us == Side::White { to - 8 } else { to + 8 };
                self.remove_piece(capture_square);
            }

            if mv.is_castle() {
                match to {
                    sq::G1 => self.move_piece(sq::H1, sq::F1),
                    sq::C1 => self.move_piece(sq::A1, sq::D1),
                    sq::G8 => self.move_piece(sq::H8, sq::F8),
                    sq::C8 => self.move_piece(sq::A8, sq::D8),
                    _ => debug_assert!(false, "castle move to a non-castle square"),
                }
            }

            self.castle_flags &= CASTLE_MASKS[from as usize] & CASTLE_MASKS[to as usize];

            if piece == Piece::Pawn && from.abs_diff(to) == 16 {
                self.ep_square = ((from + to) / 2) as i8;
            } else {
                self.ep_square = -1;
            }

            if us == Side::Black {
                self.full_move += 1;
            }
        }

        self.hash ^= keys.castle_rights[self.castle_flags as usize];
        if self.ep_square >= 0 {
            self.hash ^= keys.en_passant_file[(self.ep_square & 7) as usize];
        }
        self.hash ^= keys.side_to_move;

        self.us = self.us.opponent();
        self.ply += 1;

        #[cfg(debug_assertions)]
        self.assert_consistent();
    }

    pub fn undo_move(&mut self) {
        let Some(state) = self.state_stack.pop() else {
            return;
        };

        self.us = self.us.opponent();
        self.ply -= 1;

        let mv = state.mv;
        if !mv.is_null() {
            let us = self.us;
            let from = mv.from();
            let to = mv.to();

            if us == Side::Black {
                self.full_move -= 1;
            }

            if mv.is_castle() {
                match to {
                    sq::G1 => self.move_piece(sq::F1, sq::H1),
                    sq::C1 => self.move_piece(sq::D1, sq::A1),
                    sq::G8 => self.move_piece(sq::F8, sq::H8),
                    sq::C8 => self.move_piece(sq::D8, sq::A8),
                    _ => debug_assert!(false, "castle move to a non-castle square"),
                }
            }

            self.remove_piece(to);
            self.set_piece(from, us, if mv.is_promotion() { Piece::Pawn } else { mv.piece() });

            if mv.is_en_passant() {
                let capture_square = if us == Side::White { to - 8 } else { to + 8 };
                self.set_piece(capture_square, us.opponent(), Piece::Pawn);
            } else if mv.captured() != Piece::None {
                self.set_piece(to, us.opponent(), mv.captured());
            }
        }

        self.ep_square = state.ep_square;
        self.castle_flags = state.castle_flags;
        self.half_move = state.half_move;
        // Restoring the stored hash undoes the piece-toggle updates above.
        self.hash = state.hash;

        #[cfg(debug_assertions)]
        self.assert_consistent();
    }

    /// Pass the move without touching any pieces. Used by null-move search.
    pub fn do_null_move(&mut self) {
        self.do_move(Move::NULL);
    }

    // --- attacks and checks ---

    /// Bitboard of `by`-side pieces attacking `square`.
    pub fn attackers_to(&self, square: u8, by: Side) -> u64 {
        let t = attacks::tables();
        let occupancy = self.all_occupancy();
        let them = by as usize;

        let mut attackers =
            t.pawn_attacks(by.opponent(), square) & self.boards[them][Piece::Pawn as usize].0;
        attackers |= t.knight_attacks(square) & self.boards[them][Piece::Knight as usize].0;
        attackers |= t.bishop_attacks(square, occupancy)
            & (self.boards[them][Piece::Bishop as usize].0
                | self.boards[them][Piece::Queen as usize].0);
        attackers |= t.rook_attacks(square, occupancy)
            & (self.boards[them][Piece::Rook as usize].0
                | self.boards[them][Piece::Queen as usize].0);
        attackers |= t.king_attacks(square) & self.boards[them][Piece::King as usize].0;

        attackers
    }

    /// Is the side to move in check?
    pub fn is_check(&self) -> bool {
        self.attackers_to(self.king_square(self.us), self.us.opponent()) != 0
    }

    pub fn is_side_in_check(&self, side: Side) -> bool {
        self.attackers_to(self.king_square(side), side.opponent()) != 0
    }

    // --- draw state ---

    pub fn is_fifty_move_draw(&self) -> bool {
        self.half_move >= 100
    }

    /// Has the current position occurred at least twice before since the
    /// last irreversible move?
    pub fn is_threefold(&self) -> bool {
        self.repetition_count() >= 2
    }

    /// Times the current position occurred earlier within the
    /// halfmove-clock window.
    pub fn repetition_count(&self) -> usize {
        let window = (self.half_move as usize).min(self.state_stack.len());
        self.state_stack[self.state_stack.len() - window..]
            .iter()
            .filter(|state| state.hash == self.hash)
            .count()
    }

    // --- move generation ---

    /// All pseudo-legal captures, including en passant and capture
    /// promotions. Used on its own by quiescence search.
    pub fn gen_pseudo_legal_captures(&self, moves: &mut Vec<Move>) {
        let t = attacks::tables();
        let us = self.us as usize;
        let them = self.us.opponent() as usize;
        let our_occ = self.boards[us][0].0;
        let their_occ = self.boards[them][0].0;
        let all_occ = our_occ | their_occ;

        let pawns = self.boards[us][Piece::Pawn as usize].0;
        let promo_rank = if self.us == Side::White { 6 } else { 1 };

        let left_captures = if self.us == Side::White {
            (pawns & !t.files[0]) << 7
        } else {
            (pawns & !t.files[0]) >> 9
        } & their_occ;

        let right_captures = if self.us == Side::White {
            (pawns & !t.files[7]) << 9
        } else {
            (pawns & !t.files[7]) >> 7
        } & their_occ;

        for (targets, offset) in [
            (left_captures, if self.us == Side::White { 7i8 } else { -9 }),
            (right_captures, if self.us == Side::White { 9i8 } else { -7 }),
        ] {
            for to in BitBoard(targets).squares() {
                let from = (to as i8 - offset) as u8;
                let captured = self.piece_board[to as usize];
                if sq::rank(from) == promo_rank {
                    for promo in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                        moves.push(Move::new_promotion(from, to, captured, promo));
                    }
                } else {
                    moves.push(Move::new(from, to, Piece::Pawn, captured));
                }
            }
        }

        if self.ep_square >= 0 {
            let ep = self.ep_square as u8;
            let ep_from = if self.us == Side::White { ep - 8 } else { ep + 8 };
            if sq::file(ep) > 0 && pawns & (1u64 << (ep_from - 1)) != 0 {
                moves.push(Move::new_en_passant(ep_from - 1, ep));
            }
            if sq::file(ep) < 7 && pawns & (1u64 << (ep_from + 1)) != 0 {
                moves.push(Move::new_en_passant(ep_from + 1, ep));
            }
        }

        for from in self.boards[us][Piece::Knight as usize].squares() {
            for to in BitBoard(t.knight_attacks(from) & their_occ).squares() {
                moves.push(Move::new(from, to, Piece::Knight, self.piece_board[to as usize]));
            }
        }

        for from in self.boards[us][Piece::Bishop as usize].squares() {
            for to in BitBoard(t.bishop_attacks(from, all_occ) & their_occ).squares() {
                moves.push(Move::new(from, to, Piece::Bishop, self.piece_board[to as usize]));
            }
        }

        for from in self.boards[us][Piece::Rook as usize].squares() {
            for to in BitBoard(t.rook_attacks(from, all_occ) & their_occ).squares() {
                moves.push(Move::new(from, to, Piece::Rook, self.piece_board[to as usize]));
            }
        }

        for from in self.boards[us][Piece::Queen as usize].squares() {
            for to in BitBoard(t.queen_attacks(from, all_occ) & their_occ).squares() {
                moves.push(Move::new(from, to, Piece::Queen, self.piece_board[to as usize]));
            }
        }

        let king = self.king_square(self.us);
        for to in BitBoard(t.king_attacks(king) & their_occ).squares() {
            moves.push(Move::new(king, to, Piece::King, self.piece_board[to as usize]));
        }
    }

    /// All pseudo-legal moves: every capture, then quiet pawn pushes,
    /// quiet piece moves and castling.
    pub fn gen_pseudo_legal_moves(&self, moves: &mut Vec<Move>) {
        self.gen_pseudo_legal_captures(moves);

        let t = attacks::tables();
        let us = self.us as usize;
        let all_occ = self.all_occupancy();
        let free = !all_occ;

        let pawns = self.boards[us][Piece::Pawn as usize].0;
        let promo_rank = if self.us == Side::White { 6 } else { 1 };
        let forward: i8 = if self.us == Side::White { 8 } else { -8 };

        let single_push = if self.us == Side::White {
            pawns << 8
        } else {
            pawns >> 8
        } & free;

        for to in BitBoard(single_push).squares() {
            let from = (to as i8 - forward) as u8;
            if sq::rank(from) == promo_rank {
                for promo in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                    moves.push(Move::new_promotion(from, to, Piece::None, promo));
                }
            } else {
                moves.push(Move::new(from, to, Piece::Pawn, Piece::None));
            }
        }

        // Double pushes only from pawns whose single push landed on the
        // third (resp. sixth) rank.
        let double_push = if self.us == Side::White {
            (single_push & t.ranks[2]) << 8
        } else {
            (single_push & t.ranks[5]) >> 8
        } & free;

        for to in BitBoard(double_push).squares() {
            let from = (to as i8 - 2 * forward) as u8;
            moves.push(Move::new(from, to, Piece::Pawn, Piece::None));
        }

        for from in self.boards[us][Piece::Knight as usize].squares() {
            for to in BitBoard(t.knight_attacks(from) & free).squares() {
                moves.push(Move::new(from, to, Piece::Knight, Piece::None));
            }
        }

        for from in self.boards[us][Piece::Bishop as usize].squares() {
            for to in BitBoard(t.bishop_attacks(from, all_occ) & free).squares() {
                moves.push(Move::new(from, to, Piece::Bishop, Piece::None));
            }
        }

        for from in self.boards[us][Piece::Rook as usize].squares() {
            for to in BitBoard(t.rook_attacks(from, all_occ) & free).squares() {
                moves.push(Move::new(from, to, Piece::Rook, Piece::None));
            }
        }

        for from in self.boards[us][Piece::Queen as usize].squares() {
            for to in BitBoard(t.queen_attacks(from, all_occ) & free).squares() {
                moves.push(Move::new(from, to, Piece::Queen, Piece::None));
            }
        }

        let king = self.king_square(self.us);
        for to in BitBoard(t.king_attacks(king) & free).squares() {
            moves.push(Move::new(king, to, Piece::King, Piece::None));
        }

        // Castling: rights intact and the squares between king and rook
        // empty. Attack constraints are checked in filter_to_legal.
        if self.us == Side::White {
            if self.castle_flags & CASTLE_WHITE_SHORT != 0 && WHITE_SHORT_PATH & all_occ == 0 {
                moves.push(Move::new(sq::E1, sq::G1, Piece::King, Piece::None));
            }
            if self.castle_flags & CASTLE_WHITE_LONG != 0 && WHITE_LONG_PATH & all_occ == 0 {
                moves.push(Move::new(sq::E1, sq::C1, Piece::King, Piece::None));
            }
        } else {
            if self.castle_flags & CASTLE_BLACK_SHORT != 0 && BLACK_SHORT_PATH & all_occ == 0 {
                moves.push(Move::new(sq::E8, sq::G8, Piece::King, Piece::None));
            }
            if self.castle_flags & CASTLE_BLACK_LONG != 0 && BLACK_LONG_PATH & all_occ == 0 {
                moves.push(Move::new(sq::E8, sq::C8, Piece::King, Piece::None));
            }
        }
    }

    /// Removes moves that leave the mover's king attacked. Castling also
    /// requires the start and transit squares to be safe.
    pub fn filter_to_legal(&mut self, moves: &mut Vec<Move>) {
        let us = self.us;
        let them = us.opponent();

        let mut i = 0;
        while i < moves.len() {
            let mv = moves[i];

            if mv.is_castle() {
                let transit = (mv.from() + mv.to()) / 2;
                if self.attackers_to(mv.from(), them) != 0
                    || self.attackers_to(transit, them) != 0
                {
                    moves.remove(i);
                    continue;
                }
            }

            self.do_move(mv);
            let in_check = self.is_side_in_check(us);
            self.undo_move();

            if in_check {
                moves.remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn legal_moves(&mut self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.gen_pseudo_legal_moves(&mut moves);
        self.filter_to_legal(&mut moves);
        moves
    }

    // --- FEN ---

    /// Parses a FEN string into a new board. Accepts 4 to 6 fields; a
    /// parse error never touches any existing board.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut board = Board::empty();

        let mut square: i16 = 56;
        for c in fields[0].chars() {
            match c {
                '/' => square -= 16,
                '1'..='8' => square += c as i16 - '0' as i16,
                _ => {
                    let (side, piece) = Piece::from_fen_char(c)
                        .ok_or_else(|| FenError::Placement(format!("bad piece char '{c}'")))?;
                    if !(0..64).contains(&square) {
                        return Err(FenError::Placement(fields[0].to_string()));
                    }
                    board.boards[side as usize][piece as usize].set_bit(square as u8);
                    board.boards[side as usize][0].set_bit(square as u8);
                    board.piece_board[square as usize] = piece;
                    square += 1;
                }
            }
        }

        for side in [Side::White, Side::Black] {
            if board.boards[side as usize][Piece::King as usize].count() != 1 {
                return Err(FenError::Placement(format!("side {side} needs exactly one king")));
            }
        }

        board.us = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if fields[2] != "-" {
            for c in fields[2].chars() {
                board.castle_flags |= match c {
                    'K' => CASTLE_WHITE_SHORT,
                    'Q' => CASTLE_WHITE_LONG,
                    'k' => CASTLE_BLACK_SHORT,
                    'q' => CASTLE_BLACK_LONG,
                    _ => return Err(FenError::CastlingRights(fields[2].to_string())),
                };
            }
        }

        board.ep_square = if fields[3] == "-" {
            -1
        } else {
            sq::parse(fields[3])
                .map(|s| s as i8)
                .ok_or_else(|| FenError::EnPassant(fields[3].to_string()))?
        };

        if let Some(halfmove) = fields.get(4) {
            board.half_move = halfmove
                .parse()
                .map_err(|_| FenError::Counter(halfmove.to_string()))?;
        }

        if let Some(fullmove) = fields.get(5) {
            board.full_move = fullmove
                .parse()
                .map_err(|_| FenError::Counter(fullmove.to_string()))?;
            board.full_move = board.full_move.max(1);
        }

        board.hash = zobrist::calc_hash(&board);

        #[cfg(debug_assertions)]
        board.assert_consistent();

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let square = sq::make(file, rank);
                match self.piece_at(square) {
                    Some((side, piece)) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(piece.to_char(side));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let castling = if self.castle_flags == 0 {
            "-".to_string()
        } else {
            let mut text = String::new();
            if self.castle_flags & CASTLE_WHITE_SHORT != 0 {
                text.push('K');
            }
            if self.castle_flags & CASTLE_WHITE_LONG != 0 {
                text.push('Q');
            }
            if self.castle_flags & CASTLE_BLACK_SHORT != 0 {
                text.push('k');
            }
            if self.castle_flags & CASTLE_BLACK_LONG != 0 {
                text.push('q');
            }
            text
        };

        let ep = match self.en_passant_square() {
            Some(square) => sq::name(square),
            None => "-".to_string(),
        };

        format!(
            "{fen} {} {castling} {ep} {} {}",
            self.us, self.half_move, self.full_move
        )
    }

    // --- move text ---

    /// Finds the legal move written in long algebraic (UCI) form.
    pub fn move_from_uci(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(MoveParseError::Malformed(text.to_string()));
        }

        let from = sq::parse(&text[0..2])
            .ok_or_else(|| MoveParseError::Malformed(text.to_string()))?;
        let to = sq::parse(&text[2..4])
            .ok_or_else(|| MoveParseError::Malformed(text.to_string()))?;

        let promotion = match text.as_bytes().get(4) {
            None => Piece::None,
            Some(b'n') => Piece::Knight,
            Some(b'b') => Piece::Bishop,
            Some(b'r') => Piece::Rook,
            Some(b'q') => Piece::Queen,
            Some(_) => return Err(MoveParseError::Malformed(text.to_string())),
        };

        self.legal_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion() == promotion)
            .ok_or_else(|| MoveParseError::NoMatch(text.to_string()))
    }

    /// Finds the legal move written in standard algebraic notation.
    /// Check and mate suffixes are ignored; input matching more than one
    /// legal move is rejected.
    pub fn move_from_san(&mut self, san: &str) -> Result<Move, MoveParseError> {
        if !san.is_ascii() {
            return Err(MoveParseError::Malformed(san.to_string()));
        }

        let moves = self.legal_moves();

        let mut text = san.trim_end_matches(['+', '#']);

        if text == "O-O" || text == "0-0" {
            return moves
                .iter()
                .copied()
                .find(|mv| mv.is_castle() && mv.to() > mv.from())
                .ok_or_else(|| MoveParseError::NoMatch(san.to_string()));
        }
        if text == "O-O-O" || text == "0-0-0" {
            return moves
                .iter()
                .copied()
                .find(|mv| mv.is_castle() && mv.to() < mv.from())
                .ok_or_else(|| MoveParseError::NoMatch(san.to_string()));
        }

        let mut promotion = Piece::None;
        if let Some(eq) = text.find('=') {
            promotion = match text.as_bytes().get(eq + 1) {
                Some(b'N') => Piece::Knight,
                Some(b'B') => Piece::Bishop,
                Some(b'R') => Piece::Rook,
                Some(b'Q') => Piece::Queen,
                _ => return Err(MoveParseError::Malformed(san.to_string())),
            };
            text = &text[..eq];
        }

        let bytes = text.as_bytes();
        let (piece, body_start) = match bytes.first() {
            Some(b'N') => (Piece::Knight, 1),
            Some(b'B') => (Piece::Bishop, 1),
            Some(b'R') => (Piece::Rook, 1),
            Some(b'Q') => (Piece::Queen, 1),
            Some(b'K') => (Piece::King, 1),
            Some(_) => (Piece::Pawn, 0),
            None => return Err(MoveParseError::Malformed(san.to_string())),
        };

        if text.len() < body_start + 2 {
            return Err(MoveParseError::Malformed(san.to_string()));
        }

        let to = sq::parse(&text[text.len() - 2..])
            .ok_or_else(|| MoveParseError::Malformed(san.to_string()))?;

        let mut from_file: Option<u8> = None;
        let mut from_rank: Option<u8> = None;
        let mut is_capture = false;
        for &b in &bytes[body_start..text.len() - 2] {
            match b {
                b'x' => is_capture = true,
                b'a'..=b'h' => from_file = Some(b - b'a'),
                b'1'..=b'8' => from_rank = Some(b - b'1'),
                _ => return Err(MoveParseError::Malformed(san.to_string())),
            }
        }

        let matches: Vec<Move> = moves
            .into_iter()
            .filter(|mv| {
                mv.to() == to
                    && mv.piece() == piece
                    && mv.promotion() == promotion
                    && mv.is_capture() == is_capture
                    && from_file.map_or(true, |f| sq::file(mv.from()) == f)
                    && from_rank.map_or(true, |r| sq::rank(mv.from()) == r)
            })
            .collect();

        match matches.len() {
            0 => Err(MoveParseError::NoMatch(san.to_string())),
            1 => Ok(matches[0]),
            _ => Err(MoveParseError::Ambiguous(san.to_string())),
        }
    }

    /// Renders a legal move in standard algebraic notation, including
    /// disambiguation and check/mate suffixes.
    pub fn san_from_move(&mut self, mv: Move) -> String {
        let mut san = String::new();

        if mv.is_castle() {
            san = if mv.to() > mv.from() {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            };
        } else {
            let piece = mv.piece();

            if piece == Piece::Pawn {
                if mv.is_capture() {
                    san.push((b'a' + sq::file(mv.from())) as char);
                }
            } else {
                san.push(piece.to_char(Side::White));

                // Disambiguate against other legal moves of the same piece
                // kind to the same square.
                let mut file_clash = false;
                let mut rank_clash = false;
                let mut any_clash = false;
                for other in self.legal_moves() {
                    if other.to() == mv.to()
                        && other.piece() == piece
                        && other.from() != mv.from()
                    {
                        any_clash = true;
                        if sq::file(other.from()) == sq::file(mv.from()) {
                            file_clash = true;
                        }
                        if sq::rank(other.from()) == sq::rank(mv.from()) {
                            rank_clash = true;
                        }
                    }
                }

                if file_clash && rank_clash {
                    san.push((b'a' + sq::file(mv.from())) as char);
                    san.push((b'1' + sq::rank(mv.from())) as char);
                } else if file_clash {
                    san.push((b'1' + sq::rank(mv.from())) as char);
                } else if any_clash {
                    san.push((b'a' + sq::file(mv.from())) as char);
                }
            }

            if mv.is_capture() {
                san.push('x');
            }

            san.push_str(&sq::name(mv.to()));

            if mv.is_promotion() {
                san.push('=');
                san.push(mv.promotion().to_char(Side::White));
            }
        }

        self.do_move(mv);
        if self.is_check() {
            san.push(if self.legal_moves().is_empty() { '#' } else { '+' });
        }
        self.undo_move();

        san
    }

    // --- consistency ---

    /// Structural invariants: occupancy is the union of the piece boards,
    /// the square lookup mirrors the bitboards, pawn counts are sane and
    /// both kings exist.
    pub fn validate(&self) -> Result<(), String> {
        for side in [Side::White, Side::Black] {
            let s = side as usize;

            let union = (1..7).fold(0u64, |acc, p| acc | self.boards[s][p].0);
            if union != self.boards[s][0].0 {
                return Err(format!("{side} occupancy does not match piece boards"));
            }

            if self.boards[s][Piece::Pawn as usize].count() > 8 {
                return Err(format!("{side} has more than eight pawns"));
            }

            if self.boards[s][Piece::King as usize].count() != 1 {
                return Err(format!("{side} must have exactly one king"));
            }
        }

        if self.boards[0][0].0 & self.boards[1][0].0 != 0 {
            return Err("white and black occupancy overlap".to_string());
        }

        for square in 0u8..64 {
            let piece = self.piece_board[square as usize];
            let on_board = match self.piece_at(square) {
                Some((side, p)) => {
                    self.boards[side as usize][p as usize].is_set(square) && p == piece
                }
                None => piece == Piece::None && self.all_occupancy() & (1u64 << square) == 0,
            };
            if !on_board {
                return Err(format!("square {} lookup mismatch", sq::name(square)));
            }
        }

        Ok(())
    }

    #[cfg(debug_assertions)]
    fn assert_consistent(&self) {
        if let Err(problem) = self.validate() {
            panic!("board inconsistent: {problem}\n{self}");
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(sq::make(file, rank)) {
                    Some((side, piece)) => write!(f, " {}", piece.to_char(side))?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        writeln!(f, "fen: {}", self.to_fen())
    }
}
