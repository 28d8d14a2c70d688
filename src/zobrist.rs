//! Zobrist hashing. Keys are generated once from a fixed seed so hashes are
//! identical across runs and platforms.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::types::{Piece, Side};

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct ZobristKeys {
    /// `[side][piece][square]`; the `Piece::None` row stays zero so a
    /// toggle with an empty square is a no-op.
    pub piece: [[[u64; 64]; 7]; 2],
    pub side_to_move: u64,
    pub castle_rights: [u64; 16],
    pub en_passant_file: [u64; 8],
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece = [[[0u64; 64]; 7]; 2];
        for side in piece.iter_mut() {
            for kind in side.iter_mut().skip(1) {
                for square in kind.iter_mut() {
                    *square = rng.gen();
                }
            }
        }

        let mut castle_rights = [0u64; 16];
        for key in castle_rights.iter_mut() {
            *key = rng.gen();
        }

        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = rng.gen();
        }

        ZobristKeys {
            piece,
            side_to_move: rng.gen(),
            castle_rights,
            en_passant_file,
        }
    })
}

/// Recomputes the hash of a position from scratch. The incrementally
/// maintained hash must always equal this.
pub fn calc_hash(board: &Board) -> u64 {
    let keys = keys();
    let mut hash = 0u64;

    for square in 0u8..64 {
        if let Some((side, piece)) = board.piece_at(square) {
            if piece != Piece::None {
                hash ^= keys.piece[side as usize][piece as usize][square as usize];
            }
        }
    }

    if board.side_to_move() == Side::Black {
        hash ^= keys.side_to_move;
    }

    hash ^= keys.castle_rights[board.castle_flags() as usize];

    if let Some(ep) = board.en_passant_square() {
        hash ^= keys.en_passant_file[(ep & 7) as usize];
    }

    hash
}
