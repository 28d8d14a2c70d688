//! Fixed magic factors for the slider attack tables.
//!
//! These constants come from Grant Osborne's shared-table magic set
//! (open-aurec.com/wbforum/viewtopic.php?f=4&t=51162). Attack sets for
//! both sliders on every square live in one 97,264-entry table; each
//! square stores a multiplier and an offset into that table.

/// Multiplier and table offset for one square.
#[derive(Debug, Clone, Copy)]
pub struct Magic {
    pub factor: u64,
    pub offset: usize,
}

/// Number of entries in the shared slider attack table.
pub const ATTACK_TABLE_SIZE: usize = 97_264;

/// Index shift for rook lookups (64 - 12 relevant bits).
pub const ROOK_SHIFT: u32 = 52;

/// Index shift for bishop lookups (64 - 9 relevant bits).
pub const BISHOP_SHIFT: u32 = 55;

pub const BISHOP_MAGICS: [Magic; 64] = [
    Magic { factor: 0x007bfeffbfeffbff, offset: 16530 }, Magic { factor: 0x003effbfeffbfe08, offset: 9162 },
    Magic { factor: 0x0000401020200000, offset: 9674 }, Magic { factor: 0x0000200810000000, offset: 18532 },
    Magic { factor: 0x0000110080000000, offset: 19172 }, Magic { factor: 0x0000080100800000, offset: 17700 },
    Magic { factor: 0x0007efe0bfff8000, offset: 5730 }, Magic { factor: 0x00000fb0203fff80, offset: 19661 },
    Magic { factor: 0x00007dff7fdff7fd, offset: 17065 }, Magic { factor: 0x0000011fdff7efff, offset: 12921 },
    Magic { factor: 0x0000004010202000, offset: 15683 }, Magic { factor: 0x0000002008100000, offset: 17764 },
    Magic { factor: 0x0000001100800000, offset: 19684 }, Magic { factor: 0x0000000801008000, offset: 18724 },
    Magic { factor: 0x000007efe0bfff80, offset: 4108 }, Magic { factor: 0x000000080f9fffc0, offset: 12936 },
    Magic { factor: 0x0000400080808080, offset: 15747 }, Magic { factor: 0x0000200040404040, offset: 4066 },
    Magic { factor: 0x0000400080808080, offset: 14359 }, Magic { factor: 0x0000200200801000, offset: 36039 },
    Magic { factor: 0x0000240080840000, offset: 20457 }, Magic { factor: 0x0000080080840080, offset: 43291 },
    Magic { factor: 0x0000040010410040, offset: 5606 }, Magic { factor: 0x0000020008208020, offset: 9497 },
    Magic { factor: 0x0000804000810100, offset: 15715 }, Magic { factor: 0x0000402000408080, offset: 13388 },
    Magic { factor: 0x0000804000810100, offset: 5986 }, Magic { factor: 0x0000404004010200, offset: 11814 },
    Magic { factor: 0x0000404004010040, offset: 92656 }, Magic { factor: 0x0000101000804400, offset: 9529 },
    Magic { factor: 0x0000080800104100, offset: 18118 }, Magic { factor: 0x0000040400082080, offset: 5826 },
    Magic { factor: 0x0000410040008200, offset: 4620 }, Magic { factor: 0x0000208020004100, offset: 12958 },
    Magic { factor: 0x0000110080040008, offset: 55229 }, Magic { factor: 0x0000020080080080, offset: 9892 },
    Magic { factor: 0x0000404040040100, offset: 33767 }, Magic { factor: 0x0000202040008040, offset: 20023 },
    Magic { factor: 0x0000101010002080, offset: 6515 }, Magic { factor: 0x0000080808001040, offset: 6483 },
    Magic { factor: 0x0000208200400080, offset: 19622 }, Magic { factor: 0x0000104100200040, offset: 6274 },
    Magic { factor: 0x0000208200400080, offset: 18404 }, Magic { factor: 0x0000008840200040, offset: 14226 },
    Magic { factor: 0x0000020040100100, offset: 17990 }, Magic { factor: 0x007fff80c0280050, offset: 18920 },
    Magic { factor: 0x0000202020200040, offset: 13862 }, Magic { factor: 0x0000101010100020, offset: 19590 },
    Magic { factor: 0x0007ffdfc17f8000, offset: 5884 }, Magic { factor: 0x0003ffefe0bfc000, offset: 12946 },
    Magic { factor: 0x0000000820806000, offset: 5570 }, Magic { factor: 0x00000003ff004000, offset: 18740 },
    Magic { factor: 0x0000000100202000, offset: 6242 }, Magic { factor: 0x0000004040802000, offset: 12326 },
    Magic { factor: 0x007ffeffbfeff820, offset: 4156 }, Magic { factor: 0x003fff7fdff7fc10, offset: 12876 },
    Magic { factor: 0x0003ffdfdfc27f80, offset: 17047 }, Magic { factor: 0x000003ffefe0bfc0, offset: 17780 },
    Magic { factor: 0x0000000008208060, offset: 2494 }, Magic { factor: 0x0000000003ff0040, offset: 17716 },
    Magic { factor: 0x0000000001002020, offset: 17067 }, Magic { factor: 0x0000000040408020, offset: 9465 },
    Magic { factor: 0x00007ffeffbfeff9, offset: 16196 }, Magic { factor: 0x007ffdff7fdff7fd, offset: 6166 },
];

pub const ROOK_MAGICS: [Magic; 64] = [
    Magic { factor: 0x00a801f7fbfeffff, offset: 85487 }, Magic { factor: 0x00180012000bffff, offset: 43101 },
    Magic { factor: 0x0040080010004004, offset: 0 }, Magic { factor: 0x0040040008004002, offset: 49085 },
    Magic { factor: 0x0040020004004001, offset: 93168 }, Magic { factor: 0x0020008020010202, offset: 78956 },
    Magic { factor: 0x0040004000800100, offset: 60703 }, Magic { factor: 0x0810020990202010, offset: 64799 },
    Magic { factor: 0x000028020a13fffe, offset: 30640 }, Magic { factor: 0x003fec008104ffff, offset: 9256 },
    Magic { factor: 0x00001800043fffe8, offset: 28647 }, Magic { factor: 0x00001800217fffe8, offset: 10404 },
    Magic { factor: 0x0000200100020020, offset: 63775 }, Magic { factor: 0x0000200080010020, offset: 14500 },
    Magic { factor: 0x0000300043ffff40, offset: 52819 }, Magic { factor: 0x000038010843fffd, offset: 2048 },
    Magic { factor: 0x00d00018010bfff8, offset: 52037 }, Magic { factor: 0x0009000c000efffc, offset: 16435 },
    Magic { factor: 0x0004000801020008, offset: 29104 }, Magic { factor: 0x0002002004002002, offset: 83439 },
    Magic { factor: 0x0001002002002001, offset: 86842 }, Magic { factor: 0x0001001000801040, offset: 27623 },
    Magic { factor: 0x0000004040008001, offset: 26599 }, Magic { factor: 0x0000802000200040, offset: 89583 },
    Magic { factor: 0x0040200010080010, offset: 7042 }, Magic { factor: 0x0000080010040010, offset: 84463 },
    Magic { factor: 0x0004010008020008, offset: 82415 }, Magic { factor: 0x0000020020040020, offset: 95216 },
    Magic { factor: 0x0000010020020020, offset: 35015 }, Magic { factor: 0x0000008020010020, offset: 10790 },
    Magic { factor: 0x0000008020200040, offset: 53279 }, Magic { factor: 0x0000200020004081, offset: 70684 },
    Magic { factor: 0x0040001000200020, offset: 38640 }, Magic { factor: 0x0000080400100010, offset: 32743 },
    Magic { factor: 0x0004010200080008, offset: 68894 }, Magic { factor: 0x0000200200200400, offset: 62751 },
    Magic { factor: 0x0000200100200200, offset: 41670 }, Magic { factor: 0x0000200080200100, offset: 25575 },
    Magic { factor: 0x0000008000404001, offset: 3042 }, Magic { factor: 0x0000802000200040, offset: 36591 },
    Magic { factor: 0x00ffffb50c001800, offset: 69918 }, Magic { factor: 0x007fff98ff7fec00, offset: 9092 },
    Magic { factor: 0x003ffff919400800, offset: 17401 }, Magic { factor: 0x001ffff01fc03000, offset: 40688 },
    Magic { factor: 0x0000010002002020, offset: 96240 }, Magic { factor: 0x0000008001002020, offset: 91632 },
    Magic { factor: 0x0003fff673ffa802, offset: 32495 }, Magic { factor: 0x0001fffe6fff9001, offset: 51133 },
    Magic { factor: 0x00ffffd800140028, offset: 78319 }, Magic { factor: 0x007fffe87ff7ffec, offset: 12595 },
    Magic { factor: 0x003fffd800408028, offset: 5152 }, Magic { factor: 0x001ffff111018010, offset: 32110 },
    Magic { factor: 0x000ffff810280028, offset: 13894 }, Magic { factor: 0x0007fffeb7ff7fd8, offset: 2546 },
    Magic { factor: 0x0003fffc0c480048, offset: 41052 }, Magic { factor: 0x0001ffffa2280028, offset: 77676 },
    Magic { factor: 0x00ffffe4ffdfa3ba, offset: 73580 }, Magic { factor: 0x007ffb7fbfdfeff6, offset: 44947 },
    Magic { factor: 0x003fffbfdfeff7fa, offset: 73565 }, Magic { factor: 0x001fffeff7fbfc22, offset: 17682 },
    Magic { factor: 0x000ffffbf7fc2ffe, offset: 56607 }, Magic { factor: 0x0007fffdfa03ffff, offset: 56135 },
    Magic { factor: 0x0003ffdeff7fbdec, offset: 44989 }, Magic { factor: 0x0001ffff99ffab2f, offset: 21479 },
];
