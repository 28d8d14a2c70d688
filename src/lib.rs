pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod eval;
pub mod magics;
pub mod moves;
pub mod perft;
pub mod psqt;
pub mod search;
pub mod time;
pub mod tt;
pub mod types;
pub mod uci;
pub mod zobrist;
