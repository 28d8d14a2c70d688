use std::fmt;

use crate::types::{sq, Piece, Side};

/// A move packed into 32 bits:
///
/// ```text
/// bits  0-5   from square
/// bits  6-11  to square
/// bits 12-14  moving piece
/// bits 15-17  captured piece (None when quiet)
/// bits 18-20  promotion piece (None when not a promotion)
/// bit  21     en passant capture
/// ```
///
/// The null move is all zeroes (`from == to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    pub const NULL: Move = Move(0);

    pub fn new(from: u8, to: u8, piece: Piece, captured: Piece) -> Move {
        Move(
            from as u32
                | (to as u32) << 6
                | (piece as u32) << 12
                | (captured as u32) << 15,
        )
    }

    pub fn new_promotion(from: u8, to: u8, captured: Piece, promotion: Piece) -> Move {
        Move(
            from as u32
                | (to as u32) << 6
                | (Piece::Pawn as u32) << 12
                | (captured as u32) << 15
                | (promotion as u32) << 18,
        )
    }

    pub fn new_en_passant(from: u8, to: u8) -> Move {
        Move(
            from as u32
                | (to as u32) << 6
                | (Piece::Pawn as u32) << 12
                | (Piece::Pawn as u32) << 15
                | 1 << 21,
        )
    }

    pub fn from(&self) -> u8 {
        (self.0 & 0x3F) as u8
    }

    pub fn to(&self) -> u8 {
        (self.0 >> 6 & 0x3F) as u8
    }

    pub fn piece(&self) -> Piece {
        Piece::try_from((self.0 >> 12 & 0x7) as u8).unwrap_or(Piece::None)
    }

    pub fn captured(&self) -> Piece {
        Piece::try_from((self.0 >> 15 & 0x7) as u8).unwrap_or(Piece::None)
    }

    pub fn promotion(&self) -> Piece {
        Piece::try_from((self.0 >> 18 & 0x7) as u8).unwrap_or(Piece::None)
    }

    pub fn is_en_passant(&self) -> bool {
        self.0 & 1 << 21 != 0
    }

    pub fn is_null(&self) -> bool {
        self.from() == self.to()
    }

    pub fn is_capture(&self) -> bool {
        self.captured() != Piece::None || self.is_en_passant()
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion() != Piece::None
    }

    /// Castling is encoded as the king moving two files.
    pub fn is_castle(&self) -> bool {
        self.piece() == Piece::King && self.from().abs_diff(self.to()) == 2
    }

    /// Long algebraic form, e.g. `e2e4` or `e7e8q`. The null move prints
    /// as `0000` per the UCI convention.
    pub fn to_uci(&self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }

        let mut text = format!("{}{}", sq::name(self.from()), sq::name(self.to()));
        if self.is_promotion() {
            text.push(self.promotion().to_char(Side::Black));
        }
        text
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_unpacks_fields() {
        let mv = Move::new(sq::E2, sq::E4, Piece::Pawn, Piece::None);
        assert_eq!(mv.from(), sq::E2);
        assert_eq!(mv.to(), sq::E4);
        assert_eq!(mv.piece(), Piece::Pawn);
        assert_eq!(mv.captured(), Piece::None);
        assert!(!mv.is_capture());
        assert!(!mv.is_promotion());
        assert!(!mv.is_en_passant());
        assert_eq!(mv.to_uci(), "e2e4");
    }

    #[test]
    fn captures_and_promotions() {
        let mv = Move::new(sq::D4, sq::E5, Piece::Knight, Piece::Rook);
        assert_eq!(mv.captured(), Piece::Rook);
        assert!(mv.is_capture());

        let promo = Move::new_promotion(sq::E7, sq::D8, Piece::Queen, Piece::Knight);
        assert_eq!(promo.piece(), Piece::Pawn);
        assert_eq!(promo.captured(), Piece::Queen);
        assert_eq!(promo.promotion(), Piece::Knight);
        assert_eq!(promo.to_uci(), "e7d8n");
    }

    #[test]
    fn en_passant_is_a_pawn_capture() {
        let mv = Move::new_en_passant(sq::E5, sq::D6);
        assert!(mv.is_en_passant());
        assert!(mv.is_capture());
        assert_eq!(mv.captured(), Piece::Pawn);
    }

    #[test]
    fn null_move() {
        assert!(Move::NULL.is_null());
        assert_eq!(Move::NULL.to_uci(), "0000");
        assert!(!Move::new(sq::G1, sq::F3, Piece::Knight, Piece::None).is_null());
    }

    #[test]
    fn castle_detection() {
        let short = Move::new(sq::E1, sq::G1, Piece::King, Piece::None);
        let long = Move::new(sq::E8, sq::C8, Piece::King, Piece::None);
        let step = Move::new(sq::E1, sq::F1, Piece::King, Piece::None);
        assert!(short.is_castle());
        assert!(long.is_castle());
        assert!(!step.is_castle());
    }
}
