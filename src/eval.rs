//! Static evaluation: tapered PeSTO material/placement plus pawn
//! structure, bishop pair, mobility and king safety terms.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::attacks;
use crate::board::Board;
use crate::psqt;
use crate::types::{sq, Piece, Side};

/// Bonus for having the move.
const TEMPO: i32 = 18;

/// A midgame/endgame score pair, blended by game phase at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub mg: i32,
    pub eg: i32,
}

pub const fn s(mg: i32, eg: i32) -> Score {
    Score { mg, eg }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score {
        s(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl Sub for Score {
    type Output = Score;
    fn sub(self, rhs: Score) -> Score {
        s(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl Neg for Score {
    type Output = Score;
    fn neg(self) -> Score {
        s(-self.mg, -self.eg)
    }
}

impl Mul<i32> for Score {
    type Output = Score;
    fn mul(self, rhs: i32) -> Score {
        s(self.mg * rhs, self.eg * rhs)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

const DOUBLED_PAWNS: Score = s(-11, -48);
const ISOLATED_PAWN: Score = s(-5, -15);
const PAWN_DEFENDED: Score = s(22, 17);
const BISHOP_PAIR: Score = s(33, 110);
const MOBILITY: Score = s(2, 2);
const PAWN_SHIELD: Score = s(31, -12);

/// Danger score by accumulated attack units on the king zone.
const SAFETY_TABLE: [i32; 100] = [
    0, 0, 1, 2, 3, 5, 7, 9, 12, 15, //
    18, 22, 26, 30, 35, 39, 44, 50, 56, 62, //
    68, 75, 82, 85, 89, 97, 105, 113, 122, 131, //
    140, 150, 169, 180, 191, 202, 213, 225, 237, 248, //
    260, 272, 283, 295, 307, 319, 330, 342, 354, 366, //
    377, 389, 401, 412, 424, 436, 448, 459, 471, 483, //
    494, 500, 500, 500, 500, 500, 500, 500, 500, 500, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
];

const ATTACK_UNITS: [i32; 7] = [0, 0, 2, 2, 3, 5, 0];

/// Pawn shield zones in front of a castled king.
const SHIELD_WHITE_SHORT: u64 = bits(&[sq::F2, sq::G2, sq::H2, sq::F3, sq::G3, sq::H3]);
const SHIELD_WHITE_LONG: u64 = bits(&[sq::A2, sq::B2, sq::C2, sq::A3, sq::B3, sq::C3]);
const SHIELD_BLACK_SHORT: u64 = bits(&[sq::F7, sq::G7, sq::H7, sq::F6, sq::G6, sq::H6]);
const SHIELD_BLACK_LONG: u64 = bits(&[sq::A7, sq::B7, sq::C7, sq::A6, sq::B6, sq::C6]);

const fn bits(squares: &[u8]) -> u64 {
    let mut mask = 0u64;
    let mut i = 0;
    while i < squares.len() {
        mask |= 1u64 << squares[i];
        i += 1;
    }
    mask
}

/// Phase 0 is the full-material midgame, 24 a bare-kings endgame.
pub fn game_phase(board: &Board) -> i32 {
    let count = |side: Side, piece: Piece| board.bitboard(side, piece).count() as i32;

    let phase = 24
        - count(Side::White, Piece::Knight)
        - count(Side::White, Piece::Bishop)
        - count(Side::White, Piece::Rook) * 2
        - count(Side::White, Piece::Queen) * 4
        - count(Side::Black, Piece::Knight)
        - count(Side::Black, Piece::Bishop)
        - count(Side::Black, Piece::Rook) * 2
        - count(Side::Black, Piece::Queen) * 4;

    phase.clamp(0, 24)
}

impl Board {
    /// Static evaluation from the side to move's point of view.
    pub fn eval(&self) -> i32 {
        evaluate(self)
    }
}

/// Full evaluation from the side to move's point of view, in centipawns.
pub fn evaluate(board: &Board) -> i32 {
    let white_score = evaluate_white(board);
    let relative = match board.side_to_move() {
        Side::White => white_score,
        Side::Black => -white_score,
    };
    relative + TEMPO
}

/// White-positive evaluation, blended across game phase.
fn evaluate_white(board: &Board) -> i32 {
    let t = attacks::tables();
    let mut score = Score::default();

    // Material and placement.
    for square in board.occupancy(Side::White).squares() {
        let piece = board.piece_on(square) as usize;
        let index = (square ^ 56) as usize;
        score += s(
            psqt::MG_VALUE[piece] + psqt::mg_table(piece)[index],
            psqt::EG_VALUE[piece] + psqt::eg_table(piece)[index],
        );
    }
    for square in board.occupancy(Side::Black).squares() {
        let piece = board.piece_on(square) as usize;
        let index = square as usize;
        score -= s(
            psqt::MG_VALUE[piece] + psqt::mg_table(piece)[index],
            psqt::EG_VALUE[piece] + psqt::eg_table(piece)[index],
        );
    }

    let white_pawns = board.bitboard(Side::White, Piece::Pawn).0;
    let black_pawns = board.bitboard(Side::Black, Piece::Pawn).0;

    // Doubled and isolated pawns, per file.
    for file in 0..8 {
        let neighbours = match file {
            0 => t.files[1],
            7 => t.files[6],
            _ => t.files[file - 1] | t.files[file + 1],
        };

        let white_on_file = (white_pawns & t.files[file]).count_ones() as i32;
        let black_on_file = (black_pawns & t.files[file]).count_ones() as i32;

        score += DOUBLED_PAWNS
            * ((white_on_file >= 2) as i32 - (black_on_file >= 2) as i32);

        if white_pawns & neighbours == 0 {
            score += ISOLATED_PAWN * white_on_file;
        }
        if black_pawns & neighbours == 0 {
            score -= ISOLATED_PAWN * black_on_file;
        }
    }

    // Pawns defended by a pawn.
    let white_defended = ((white_pawns & !t.files[0]) << 7 | (white_pawns & !t.files[7]) << 9)
        & white_pawns;
    let black_defended = ((black_pawns & !t.files[7]) >> 7 | (black_pawns & !t.files[0]) >> 9)
        & black_pawns;
    score += PAWN_DEFENDED
        * (white_defended.count_ones() as i32 - black_defended.count_ones() as i32);

    // Bishop pair.
    let white_pair = board.bitboard(Side::White, Piece::Bishop).count() == 2;
    let black_pair = board.bitboard(Side::Black, Piece::Bishop).count() == 2;
    score += BISHOP_PAIR * (white_pair as i32 - black_pair as i32);

    // Mobility of minor and major pieces.
    score += MOBILITY * (mobility(board, Side::White) - mobility(board, Side::Black));

    // King safety: danger grows with attack units on the zone around and
    // in front of the king.
    score -= s(1, 1) * king_danger(board, Side::White);
    score += s(1, 1) * king_danger(board, Side::Black);

    // Pawn shield in front of a castled king.
    let white_king = board.king_square(Side::White);
    let black_king = board.king_square(Side::Black);
    let shielded = |zone: u64, pawns: u64| (zone & pawns).count_ones() >= 3;

    if white_king == sq::G1 && shielded(SHIELD_WHITE_SHORT, white_pawns) {
        score += PAWN_SHIELD;
    }
    if white_king == sq::B1 && shielded(SHIELD_WHITE_LONG, white_pawns) {
        score += PAWN_SHIELD;
    }
    if black_king == sq::G8 && shielded(SHIELD_BLACK_SHORT, black_pawns) {
        score -= PAWN_SHIELD;
    }
    if black_king == sq::B8 && shielded(SHIELD_BLACK_LONG, black_pawns) {
        score -= PAWN_SHIELD;
    }

    let phase = game_phase(board);
    (score.mg * (24 - phase) + score.eg * phase) / 24
}

/// Squares reachable by a side's knights, bishops, rooks and queens,
/// not counting its own pieces.
fn mobility(board: &Board, side: Side) -> i32 {
    let t = attacks::tables();
    let occupancy = board.all_occupancy();
    let own = board.occupancy(side).0;
    let mut mobile = 0i32;

    for from in board.bitboard(side, Piece::Knight).squares() {
        mobile += (t.knight_attacks(from) & !own).count_ones() as i32;
    }
    for from in board.bitboard(side, Piece::Bishop).squares() {
        mobile += (t.bishop_attacks(from, occupancy) & !own).count_ones() as i32;
    }
    for from in board.bitboard(side, Piece::Rook).squares() {
        mobile += (t.rook_attacks(from, occupancy) & !own).count_ones() as i32;
    }
    for from in board.bitboard(side, Piece::Queen).squares() {
        mobile += (t.queen_attacks(from, occupancy) & !own).count_ones() as i32;
    }

    mobile
}

/// Danger score for `side`'s king from the enemy pieces attacking its zone.
fn king_danger(board: &Board, side: Side) -> i32 {
    let t = attacks::tables();
    let them = side.opponent();
    let occupancy = board.all_occupancy();
    let own = board.occupancy(side).0;

    let king = board.king_square(side);
    let ring = t.king_attacks(king);
    // Ring plus the rank in front of it, toward the enemy.
    let zone = match side {
        Side::White => ring | ring << 8,
        Side::Black => ring | ring >> 8,
    } & !own;

    let mut units = 0i32;
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        for from in board.bitboard(them, piece).squares() {
            let attacks = match piece {
                Piece::Knight => t.knight_attacks(from),
                Piece::Bishop => t.bishop_attacks(from, occupancy),
                Piece::Rook => t.rook_attacks(from, occupancy),
                _ => t.queen_attacks(from, occupancy),
            };
            units += ATTACK_UNITS[piece as usize] * (attacks & zone).count_ones() as i32;
        }
    }

    SAFETY_TABLE[(units as usize).min(99)]
}
