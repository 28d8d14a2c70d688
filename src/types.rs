use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "w"),
            Side::Black => write!(f, "b"),
        }
    }
}

/// Piece kinds, with `None` at 0 so `piece_board` entries and the
/// occupancy slot of the per-side bitboard array line up by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Piece {
    None = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

pub const PIECE_VALUES: [i32; 7] = [0, 100, 320, 330, 500, 900, 99_999];

impl Piece {
    pub fn value(&self) -> i32 {
        PIECE_VALUES[*self as usize]
    }

    /// Piece letter as used in FEN, lowercase for black.
    pub fn to_char(&self, side: Side) -> char {
        let c = match self {
            Piece::None => ' ',
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        };

        match side {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<(Side, Piece)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };

        let piece = match c.to_ascii_uppercase() {
            'P' => Piece::Pawn,
            'N' => Piece::Knight,
            'B' => Piece::Bishop,
            'R' => Piece::Rook,
            'Q' => Piece::Queen,
            'K' => Piece::King,
            _ => return None,
        };

        Some((side, piece))
    }
}

impl TryFrom<u8> for Piece {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Piece::None),
            1 => Ok(Piece::Pawn),
            2 => Ok(Piece::Knight),
            3 => Ok(Piece::Bishop),
            4 => Ok(Piece::Rook),
            5 => Ok(Piece::Queen),
            6 => Ok(Piece::King),
            _ => Err(()),
        }
    }
}

pub const CASTLE_WHITE_SHORT: u8 = 0b0001;
pub const CASTLE_WHITE_LONG: u8 = 0b0010;
pub const CASTLE_BLACK_SHORT: u8 = 0b0100;
pub const CASTLE_BLACK_LONG: u8 = 0b1000;
pub const CASTLE_ALL: u8 = 0b1111;

/// Named square indices, a1 = 0 through h8 = 63, rank-major.
#[allow(dead_code)]
pub mod sq {
    pub const A1: u8 = 0;
    pub const B1: u8 = 1;
    pub const C1: u8 = 2;
    pub const D1: u8 = 3;
    pub const E1: u8 = 4;
    pub const F1: u8 = 5;
    pub const G1: u8 = 6;
    pub const H1: u8 = 7;
    pub const A2: u8 = 8;
    pub const B2: u8 = 9;
    pub const C2: u8 = 10;
    pub const D2: u8 = 11;
    pub const E2: u8 = 12;
    pub const F2: u8 = 13;
    pub const G2: u8 = 14;
    pub const H2: u8 = 15;
    pub const A3: u8 = 16;
    pub const B3: u8 = 17;
    pub const C3: u8 = 18;
    pub const D3: u8 = 19;
    pub const E3: u8 = 20;
    pub const F3: u8 = 21;
    pub const G3: u8 = 22;
    pub const H3: u8 = 23;
    pub const A4: u8 = 24;
    pub const B4: u8 = 25;
    pub const C4: u8 = 26;
    pub const D4: u8 = 27;
    pub const E4: u8 = 28;
    pub const F4: u8 = 29;
    pub const G4: u8 = 30;
    pub const H4: u8 = 31;
    pub const A5: u8 = 32;
    pub const B5: u8 = 33;
    pub const C5: u8 = 34;
    pub const D5: u8 = 35;
    pub const E5: u8 = 36;
    pub const F5: u8 = 37;
    pub const G5: u8 = 38;
    pub const H5: u8 = 39;
    pub const A6: u8 = 40;
    pub const B6: u8 = 41;
    pub const C6: u8 = 42;
    pub const D6: u8 = 43;
    pub const E6: u8 = 44;
    pub const F6: u8 = 45;
    pub const G6: u8 = 46;
    pub const H6: u8 = 47;
    pub const A7: u8 = 48;
    pub const B7: u8 = 49;
    pub const C7: u8 = 50;
    pub const D7: u8 = 51;
    pub const E7: u8 = 52;
    pub const F7: u8 = 53;
    pub const G7: u8 = 54;
    pub const H7: u8 = 55;
    pub const A8: u8 = 56;
    pub const B8: u8 = 57;
    pub const C8: u8 = 58;
    pub const D8: u8 = 59;
    pub const E8: u8 = 60;
    pub const F8: u8 = 61;
    pub const G8: u8 = 62;
    pub const H8: u8 = 63;

    pub fn file(square: u8) -> u8 {
        square & 7
    }

    pub fn rank(square: u8) -> u8 {
        square >> 3
    }

    pub fn make(file: u8, rank: u8) -> u8 {
        (rank << 3) | file
    }

    /// Algebraic name, e.g. `e4`.
    pub fn name(square: u8) -> String {
        format!(
            "{}{}",
            (b'a' + file(square)) as char,
            (b'1' + rank(square)) as char
        )
    }

    /// Parse an algebraic square name. Returns `None` for anything that
    /// is not exactly two characters in `a1`..`h8`.
    pub fn parse(text: &str) -> Option<u8> {
        let bytes = text.as_bytes();

        if bytes.len() != 2 {
            return None;
        }

        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');

        if file > 7 || rank > 7 {
            return None;
        }

        Some(make(file, rank))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 4 to 6 FEN fields, got {0}")]
    FieldCount(usize),
    #[error("invalid piece placement: {0}")]
    Placement(String),
    #[error("invalid side to move: {0}")]
    SideToMove(String),
    #[error("invalid castling rights: {0}")]
    CastlingRights(String),
    #[error("invalid en passant square: {0}")]
    EnPassant(String),
    #[error("invalid move counter: {0}")]
    Counter(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("malformed move: {0}")]
    Malformed(String),
    #[error("ambiguous move: {0}")]
    Ambiguous(String),
    #[error("no legal move matches: {0}")]
    NoMatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_fen_chars_round_trip() {
        for piece in [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ] {
            for side in [Side::White, Side::Black] {
                let c = piece.to_char(side);
                assert_eq!(Piece::from_fen_char(c), Some((side, piece)));
            }
        }

        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn square_names_and_parsing() {
        assert_eq!(sq::name(sq::A1), "a1");
        assert_eq!(sq::name(sq::H8), "h8");
        assert_eq!(sq::name(sq::E4), "e4");
        assert_eq!(sq::parse("e4"), Some(sq::E4));
        assert_eq!(sq::parse("i1"), None);
        assert_eq!(sq::parse("a9"), None);
        assert_eq!(sq::parse("e"), None);
    }

    #[test]
    fn square_file_rank_decomposition() {
        for square in 0u8..64 {
            assert_eq!(sq::make(sq::file(square), sq::rank(square)), square);
        }
    }
}
