use std::fmt;

/// A set of squares, one bit per square with a1 = bit 0 and h8 = bit 63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitBoard(pub u64);

impl BitBoard {
    pub const EMPTY: BitBoard = BitBoard(0);

    pub fn from_square(square: u8) -> BitBoard {
        BitBoard(1u64 << square)
    }

    pub fn set_bit(&mut self, square: u8) {
        self.0 |= 1u64 << square;
    }

    pub fn clear_bit(&mut self, square: u8) {
        self.0 &= !(1u64 << square);
    }

    pub fn is_set(&self, square: u8) -> bool {
        self.0 & (1u64 << square) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Index of the lowest set bit. Must not be called on an empty board.
    pub fn lsb(&self) -> u8 {
        debug_assert!(self.0 != 0);
        self.0.trailing_zeros() as u8
    }

    /// Removes and returns the lowest set bit, or `None` when empty.
    pub fn pop_lsb(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }

        let square = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(square)
    }

    pub fn squares(self) -> Squares {
        Squares(self.0)
    }
}

/// Iterator over the set squares of a bitboard, low bit first.
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }

        let square = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(square)
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let square = rank * 8 + file;
                write!(f, "{} ", if self.is_set(square) { '1' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_test_bits() {
        let mut bb = BitBoard::EMPTY;
        bb.set_bit(0);
        bb.set_bit(63);
        assert!(bb.is_set(0));
        assert!(bb.is_set(63));
        assert!(!bb.is_set(31));
        assert_eq!(bb.count(), 2);

        bb.clear_bit(0);
        assert!(!bb.is_set(0));
        assert_eq!(bb.count(), 1);
    }

    #[test]
    fn pop_lsb_drains_in_order() {
        let mut bb = BitBoard(0);
        bb.set_bit(5);
        bb.set_bit(17);
        bb.set_bit(60);

        assert_eq!(bb.pop_lsb(), Some(5));
        assert_eq!(bb.pop_lsb(), Some(17));
        assert_eq!(bb.pop_lsb(), Some(60));
        assert_eq!(bb.pop_lsb(), None);
    }

    #[test]
    fn squares_iterator_matches_bits() {
        let bb = BitBoard(0b1010_0110);
        let squares: Vec<u8> = bb.squares().collect();
        assert_eq!(squares, vec![1, 2, 5, 7]);
    }
}
