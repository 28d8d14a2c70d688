//! Precomputed attack tables: leaper lookups plus magic-indexed slider
//! attacks stored in one shared table.

use std::sync::OnceLock;

use crate::magics::{ATTACK_TABLE_SIZE, BISHOP_MAGICS, BISHOP_SHIFT, ROOK_MAGICS, ROOK_SHIFT};
use crate::types::Side;

const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub struct AttackTables {
    pub knight: [u64; 64],
    pub king: [u64; 64],
    /// Squares a pawn of the indexed side attacks from each square.
    pub pawn: [[u64; 64]; 2],
    pub files: [u64; 8],
    pub ranks: [u64; 8],
    rook_masks: [u64; 64],
    bishop_masks: [u64; 64],
    slider_db: Vec<u64>,
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Builds every table. Call once at startup; the move generator assumes the
/// tables exist. Idempotent, so tests may call it freely.
pub fn init() {
    TABLES.get_or_init(AttackTables::build);
}

pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::build)
}

fn on_board(file: i8, rank: i8) -> bool {
    (0..8).contains(&file) && (0..8).contains(&rank)
}

fn square_at(file: i8, rank: i8) -> u8 {
    ((rank as u8) << 3) | file as u8
}

/// Ray squares from `square`, excluding the last square of each ray. Only
/// these squares can change the attack set, so only they feed the magic
/// index.
fn blocker_mask(square: u8, dirs: &[(i8, i8); 4]) -> u64 {
    let mut mask = 0u64;
    let (file, rank) = ((square & 7) as i8, (square >> 3) as i8);

    for &(df, dr) in dirs {
        let (mut f, mut r) = (file + df, rank + dr);
        while on_board(f + df, r + dr) {
            mask |= 1u64 << square_at(f, r);
            f += df;
            r += dr;
        }
    }

    mask
}

/// Ray attacks from `square` given a blocker set: each ray runs to the first
/// occupied square inclusive.
fn ray_attacks(square: u8, blockers: u64, dirs: &[(i8, i8); 4]) -> u64 {
    let mut attacks = 0u64;
    let (file, rank) = ((square & 7) as i8, (square >> 3) as i8);

    for &(df, dr) in dirs {
        let (mut f, mut r) = (file + df, rank + dr);
        while on_board(f, r) {
            let bit = 1u64 << square_at(f, r);
            attacks |= bit;
            if blockers & bit != 0 {
                break;
            }
            f += df;
            r += dr;
        }
    }

    attacks
}

impl AttackTables {
    fn build() -> AttackTables {
        let mut tables = AttackTables {
            knight: [0; 64],
            king: [0; 64],
            pawn: [[0; 64]; 2],
            files: [0; 8],
            ranks: [0; 8],
            rook_masks: [0; 64],
            bishop_masks: [0; 64],
            slider_db: vec![0; ATTACK_TABLE_SIZE],
        };

        const KNIGHT_HOPS: [(i8, i8); 8] = [
            (2, 1),
            (2, -1),
            (-2, 1),
            (-2, -1),
            (1, 2),
            (1, -2),
            (-1, 2),
            (-1, -2),
        ];
        const KING_STEPS: [(i8, i8); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];

        for square in 0u8..64 {
            let (file, rank) = ((square & 7) as i8, (square >> 3) as i8);
            let i = square as usize;

            for (df, dr) in KNIGHT_HOPS {
                if on_board(file + df, rank + dr) {
                    tables.knight[i] |= 1u64 << square_at(file + df, rank + dr);
                }
            }

            for (df, dr) in KING_STEPS {
                if on_board(file + df, rank + dr) {
                    tables.king[i] |= 1u64 << square_at(file + df, rank + dr);
                }
            }

            for (df, dr) in [(-1i8, 1i8), (1, 1)] {
                if on_board(file + df, rank + dr) {
                    tables.pawn[Side::White as usize][i] |=
                        1u64 << square_at(file + df, rank + dr);
                }
            }

            for (df, dr) in [(-1i8, -1i8), (1, -1)] {
                if on_board(file + df, rank + dr) {
                    tables.pawn[Side::Black as usize][i] |=
                        1u64 << square_at(file + df, rank + dr);
                }
            }

            tables.rook_masks[i] = blocker_mask(square, &ROOK_DIRS);
            tables.bishop_masks[i] = blocker_mask(square, &BISHOP_DIRS);
        }

        for file in 0..8 {
            tables.files[file] = 0x0101_0101_0101_0101 << file;
        }
        for rank in 0..8 {
            tables.ranks[rank] = 0xFF << (rank * 8);
        }

        // Fill the shared slider table: every blocker subset of each mask,
        // stored at the square's offset plus its magic index. Squares are
        // allowed to share table ranges when the stored attacks agree.
        for square in 0u8..64 {
            let i = square as usize;

            let mask = tables.rook_masks[i];
            let magic = ROOK_MAGICS[i];
            let mut subset = 0u64;
            loop {
                let index = (subset.wrapping_mul(magic.factor) >> ROOK_SHIFT) as usize;
                tables.slider_db[magic.offset + index] =
                    ray_attacks(square, subset, &ROOK_DIRS);

                subset = subset.wrapping_sub(mask) & mask;
                if subset == 0 {
                    break;
                }
            }

            let mask = tables.bishop_masks[i];
            let magic = BISHOP_MAGICS[i];
            let mut subset = 0u64;
            loop {
                let index = (subset.wrapping_mul(magic.factor) >> BISHOP_SHIFT) as usize;
                tables.slider_db[magic.offset + index] =
                    ray_attacks(square, subset, &BISHOP_DIRS);

                subset = subset.wrapping_sub(mask) & mask;
                if subset == 0 {
                    break;
                }
            }
        }

        tables
    }

    pub fn rook_attacks(&self, square: u8, occupancy: u64) -> u64 {
        let i = square as usize;
        let magic = ROOK_MAGICS[i];
        let index =
            ((occupancy & self.rook_masks[i]).wrapping_mul(magic.factor) >> ROOK_SHIFT) as usize;
        self.slider_db[magic.offset + index]
    }

    pub fn bishop_attacks(&self, square: u8, occupancy: u64) -> u64 {
        let i = square as usize;
        let magic = BISHOP_MAGICS[i];
        let index = ((occupancy & self.bishop_masks[i]).wrapping_mul(magic.factor)
            >> BISHOP_SHIFT) as usize;
        self.slider_db[magic.offset + index]
    }

    pub fn queen_attacks(&self, square: u8, occupancy: u64) -> u64 {
        self.rook_attacks(square, occupancy) | self.bishop_attacks(square, occupancy)
    }

    pub fn knight_attacks(&self, square: u8) -> u64 {
        self.knight[square as usize]
    }

    pub fn king_attacks(&self, square: u8) -> u64 {
        self.king[square as usize]
    }

    pub fn pawn_attacks(&self, side: Side, square: u8) -> u64 {
        self.pawn[side as usize][square as usize]
    }
}
