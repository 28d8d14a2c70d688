//! Iterative-deepening alpha-beta search with aspiration windows,
//! transposition table, null-move pruning, late-move reductions, futility
//! pruning and a capture-only quiescence.

use crate::attacks;
use crate::board::Board;
use crate::eval;
use crate::moves::Move;
use crate::time::TimeManager;
use crate::tt::{Bound, TranspositionTable, DEFAULT_TT_ENTRIES};
use crate::types::{Piece, Side};

pub const MATE: i32 = 99_999;
pub const INFINITY: i32 = 100_000;
pub const MAX_PLY: usize = 64;

const ASPIRATION_WINDOW: i32 = 50;
const FUTILITY_MARGIN_PER_PLY: i32 = 120;
const DELTA_MARGIN: i32 = 950;
/// The clock is polled every this many nodes (power of two minus one).
const CLOCK_CHECK_MASK: u64 = 1023;

/// A score is "mate-ish" when no eval term could produce it.
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE - 1000
}

#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub depth: Option<u16>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: u16) -> SearchLimits {
        SearchLimits {
            depth: Some(depth),
            ..SearchLimits::default()
        }
    }

    pub fn movetime(millis: u64) -> SearchLimits {
        SearchLimits {
            movetime: Some(millis),
            ..SearchLimits::default()
        }
    }

    fn time_manager(&self, side: Side) -> TimeManager {
        if let Some(movetime) = self.movetime {
            return TimeManager::fixed(movetime);
        }

        let (time, increment) = match side {
            Side::White => (self.wtime, self.winc),
            Side::Black => (self.btime, self.binc),
        };

        match time {
            Some(remaining) => TimeManager::from_clock(remaining, increment.unwrap_or(0)),
            None => TimeManager::infinite(),
        }
    }
}

/// Per-node search state carried down the tree.
#[derive(Debug, Clone, Copy)]
struct NodeContext {
    ply: u16,
    is_pv: bool,
    allow_null: bool,
}

impl NodeContext {
    fn child(&self) -> NodeContext {
        NodeContext {
            ply: self.ply + 1,
            is_pv: false,
            allow_null: true,
        }
    }
}

/// Emitted after every completed iteration.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub depth: u16,
    pub score: i32,
    pub nodes: u64,
    pub elapsed_millis: u128,
    pub pv: Vec<Move>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u16,
    pub nodes: u64,
}

pub struct Engine {
    pub board: Board,
    tt: TranspositionTable,
    killers: [[Move; 2]; MAX_PLY],
    history: [[[u32; 64]; 64]; 2],
    pv_table: Box<[[Move; MAX_PLY]; MAX_PLY]>,
    pv_length: [usize; MAX_PLY],
    saved_pv: Vec<Move>,
    lmr: [[i32; 64]; 64],
    nodes: u64,
    age: u16,
    tm: TimeManager,
}

impl Engine {
    pub fn new() -> Engine {
        Engine::with_table_size(DEFAULT_TT_ENTRIES)
    }

    pub fn with_table_size(tt_entries: usize) -> Engine {
        attacks::init();

        let mut lmr = [[0i32; 64]; 64];
        for (depth, row) in lmr.iter_mut().enumerate().skip(1) {
            for (index, slot) in row.iter_mut().enumerate().skip(1) {
                *slot = ((depth as f64).ln() * (index as f64).ln() / 2.0) as i32;
            }
        }

        Engine {
            board: Board::new(),
            tt: TranspositionTable::new(tt_entries),
            killers: [[Move::NULL; 2]; MAX_PLY],
            history: [[[0; 64]; 64]; 2],
            pv_table: Box::new([[Move::NULL; MAX_PLY]; MAX_PLY]),
            pv_length: [0; MAX_PLY],
            saved_pv: Vec::new(),
            lmr,
            nodes: 0,
            age: 0,
            tm: TimeManager::infinite(),
        }
    }

    pub fn new_game(&mut self) {
        self.board.reset();
        self.tt.clear();
        self.age = 0;
        self.saved_pv.clear();
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Best line found by the last completed iteration.
    pub fn principal_variation(&self) -> &[Move] {
        &self.saved_pv
    }

    /// Finds the best move under the given limits. `None` means the side
    /// to move has no legal move.
    pub fn search(&mut self, limits: &SearchLimits) -> Option<Move> {
        self.think(limits, &mut |_| {}).best_move
    }

    /// Iterative deepening driver. `on_depth` runs after every completed
    /// iteration, which is where the UCI layer prints its `info` lines.
    pub fn think(
        &mut self,
        limits: &SearchLimits,
        on_depth: &mut dyn FnMut(&SearchReport),
    ) -> SearchResult {
        self.tm = limits.time_manager(self.board.side_to_move());
        self.nodes = 0;
        self.age = self.age.wrapping_add(1);
        self.killers = [[Move::NULL; 2]; MAX_PLY];
        self.history = [[[0; 64]; 64]; 2];
        self.saved_pv.clear();

        let root_moves = self.board.legal_moves();

        if root_moves.is_empty() {
            let score = if self.board.is_check() { -MATE } else { 0 };
            return SearchResult {
                best_move: None,
                score,
                depth: 0,
                nodes: 0,
            };
        }

        // Only one reply: play it without burning the clock.
        if root_moves.len() == 1 {
            self.saved_pv = vec![root_moves[0]];
            return SearchResult {
                best_move: Some(root_moves[0]),
                score: eval::evaluate(&self.board),
                depth: 0,
                nodes: 0,
            };
        }

        let max_depth = limits
            .depth
            .unwrap_or(MAX_PLY as u16 - 1)
            .min(MAX_PLY as u16 - 1);

        let mut best_move = root_moves[0];
        let mut best_score = -INFINITY;
        let mut completed_depth = 0;

        for depth in 1..=max_depth {
            let Some(score) = self.search_with_aspiration(depth, best_score) else {
                break; // out of time; keep the previous iteration's move
            };

            best_score = score;
            best_move = self.pv_table[0][0];
            completed_depth = depth;
            self.saved_pv = self.pv_table[0][..self.pv_length[0]].to_vec();

            on_depth(&SearchReport {
                depth,
                score,
                nodes: self.nodes,
                elapsed_millis: self.tm.elapsed().as_millis(),
                pv: self.saved_pv.clone(),
            });

            if is_mate_score(score) || self.tm.soft_limit_reached() {
                break;
            }
        }

        SearchResult {
            best_move: Some(best_move),
            score: best_score,
            depth: completed_depth,
            nodes: self.nodes,
        }
    }

    /// Searches the root with a window around the previous score, widening
    /// on failure until the score fits.
    fn search_with_aspiration(&mut self, depth: u16, previous: i32) -> Option<i32> {
        let root = NodeContext {
            ply: 0,
            is_pv: true,
            allow_null: true,
        };

        let mut delta = ASPIRATION_WINDOW;
        let (mut alpha, mut beta) = if depth >= 3 {
            (previous - delta, previous + delta)
        } else {
            (-INFINITY, INFINITY)
        };

        loop {
            let score = self.alpha_beta(alpha, beta, depth as i32, root)?;

            if score <= alpha {
                alpha = (score - delta).max(-INFINITY);
                delta *= 2;
            } else if score >= beta {
                beta = (score + delta).min(INFINITY);
                delta *= 2;
            } else {
                return Some(score);
            }
        }
    }

    fn out_of_time(&self) -> bool {
        self.nodes & CLOCK_CHECK_MASK == 0 && self.tm.hard_limit_reached()
    }

    fn alpha_beta(
        &mut self,
        mut alpha: i32,
        beta: i32,
        mut depth: i32,
        ctx: NodeContext,
    ) -> Option<i32> {
        if self.out_of_time() {
            return None;
        }
        self.nodes += 1;

        let ply = ctx.ply as usize;
        self.pv_length[ply] = ply;

        if ctx.ply > 0 && (self.board.is_fifty_move_draw() || self.board.is_threefold()) {
            return Some(0);
        }

        let in_check = self.board.is_check();
        if in_check {
            depth += 1;
        }

        if depth <= 0 {
            return self.quiesce(alpha, beta, ctx.ply);
        }

        if ply >= MAX_PLY - 1 {
            return Some(eval::evaluate(&self.board));
        }

        let mut tt_move = Move::NULL;
        if let Some(entry) = self.tt.probe(self.board.hash(), ctx.ply) {
            tt_move = entry.best_move;
            if !ctx.is_pv && entry.depth as i32 >= depth {
                match entry.bound {
                    Bound::Exact => return Some(entry.score),
                    Bound::Lower if entry.score >= beta => return Some(entry.score),
                    Bound::Upper if entry.score <= alpha => return Some(entry.score),
                    _ => {}
                }
            }
        }

        let static_eval = eval::evaluate(&self.board);

        if can_null_move(&ctx, in_check, depth, static_eval, beta)
            && self.has_non_pawn_material()
        {
            let reduction = 2 + depth / 4;
            self.board.do_null_move();
            let value = self.alpha_beta(
                -beta,
                -beta + 1,
                depth - 1 - reduction,
                NodeContext {
                    allow_null: false,
                    ..ctx.child()
                },
            );
            self.board.undo_move();

            if -value? >= beta {
                return Some(beta);
            }
        }

        let mut moves = Vec::with_capacity(64);
        self.board.gen_pseudo_legal_moves(&mut moves);
        self.board.filter_to_legal(&mut moves);

        if moves.is_empty() {
            return Some(if in_check { -(MATE - ctx.ply as i32) } else { 0 });
        }

        self.order_moves(&mut moves, tt_move, ply);

        let futile = is_futile(&ctx, in_check, depth, static_eval, alpha);

        let mut best_score = -INFINITY;
        let mut best_move = moves[0];
        let mut bound = Bound::Upper;
        let mut searched = 0usize;

        for mv in moves {
            let quiet = !mv.is_capture() && !mv.is_promotion();

            // Futile nodes only bother with tactical moves.
            if futile && quiet {
                continue;
            }

            self.board.do_move(mv);
            let gives_check = self.board.is_check();

            let value = if searched == 0 {
                self.alpha_beta(
                    -beta,
                    -alpha,
                    depth - 1,
                    NodeContext {
                        is_pv: ctx.is_pv,
                        ..ctx.child()
                    },
                )
            } else {
                let reduction =
                    self.reduction_for(depth, searched, quiet, in_check, gives_check);

                let mut value =
                    self.alpha_beta(-alpha - 1, -alpha, depth - 1 - reduction, ctx.child());

                // A reduced search that beats alpha must be re-run at full
                // depth before we trust it.
                if reduction > 0 && value.map_or(false, |v| -v > alpha) {
                    value = self.alpha_beta(-alpha - 1, -alpha, depth - 1, ctx.child());
                }

                if ctx.is_pv
                    && value.map_or(false, |v| -v > alpha && -v < beta)
                {
                    value = self.alpha_beta(
                        -beta,
                        -alpha,
                        depth - 1,
                        NodeContext {
                            is_pv: true,
                            ..ctx.child()
                        },
                    );
                }

                value
            };

            self.board.undo_move();
            let score = -value?;
            searched += 1;

            if score > best_score {
                best_score = score;
                best_move = mv;

                if score > alpha {
                    alpha = score;
                    bound = Bound::Exact;
                    self.update_pv(ply, mv);

                    if alpha >= beta {
                        bound = Bound::Lower;
                        if quiet {
                            self.record_quiet_cutoff(mv, ply, depth);
                        }
                        break;
                    }
                }
            }
        }

        if searched == 0 {
            // Everything was pruned as futile; fail low on the static
            // bound instead of inventing a mate score.
            return Some(alpha);
        }

        self.tt.store(
            self.board.hash(),
            best_move,
            best_score,
            depth as i16,
            bound,
            self.age,
            ctx.ply,
        );

        Some(best_score)
    }

    fn quiesce(&mut self, mut alpha: i32, beta: i32, ply: u16) -> Option<i32> {
        if self.out_of_time() {
            return None;
        }
        self.nodes += 1;

        let stand_pat = eval::evaluate(&self.board);

        if ply as usize >= MAX_PLY - 1 {
            return Some(stand_pat);
        }

        let in_check = self.board.is_check();

        if !in_check {
            if stand_pat >= beta {
                return Some(stand_pat);
            }
            // Even the best capture cannot recover from this deficit.
            if stand_pat < alpha - DELTA_MARGIN {
                return Some(alpha);
            }
            alpha = alpha.max(stand_pat);
        }

        let mut moves = Vec::with_capacity(32);
        if in_check {
            // Evade with any legal move; finding none is mate.
            self.board.gen_pseudo_legal_moves(&mut moves);
        } else {
            self.board.gen_pseudo_legal_captures(&mut moves);
        }
        self.board.filter_to_legal(&mut moves);

        if moves.is_empty() {
            if in_check {
                return Some(-(MATE - ply as i32));
            }
            return Some(stand_pat);
        }

        moves.sort_by_cached_key(|mv| -capture_score(*mv));

        let mut best = if in_check { -INFINITY } else { stand_pat };

        for mv in moves {
            self.board.do_move(mv);
            let value = self.quiesce(-beta, -alpha, ply + 1);
            self.board.undo_move();
            let score = -value?;

            if score > best {
                best = score;
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }

        Some(best)
    }

    // --- move ordering ---

    fn order_moves(&self, moves: &mut [Move], tt_move: Move, ply: usize) {
        let side = self.board.side_to_move() as usize;

        moves.sort_by_cached_key(|mv| {
            let score = if *mv == tt_move {
                1_000_000
            } else if mv.is_capture() || mv.is_promotion() {
                100_000 + capture_score(*mv)
            } else if *mv == self.killers[ply][0] {
                90_000
            } else if *mv == self.killers[ply][1] {
                80_000
            } else {
                self.history[side][mv.from() as usize][mv.to() as usize] as i32
            };
            -score
        });
    }

    fn record_quiet_cutoff(&mut self, mv: Move, ply: usize, depth: i32) {
        if self.killers[ply][0] != mv {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = mv;
        }

        let side = self.board.side_to_move() as usize;
        let slot = &mut self.history[side][mv.from() as usize][mv.to() as usize];
        *slot = slot.saturating_add((depth * depth) as u32);
    }

    fn update_pv(&mut self, ply: usize, mv: Move) {
        self.pv_table[ply][ply] = mv;
        let child_len = self.pv_length[ply + 1];
        for i in ply + 1..child_len {
            self.pv_table[ply][i] = self.pv_table[ply + 1][i];
        }
        self.pv_length[ply] = child_len.max(ply + 1);
    }

    // --- pruning helpers ---

    fn reduction_for(
        &self,
        depth: i32,
        move_index: usize,
        quiet: bool,
        in_check: bool,
        gives_check: bool,
    ) -> i32 {
        if depth >= 3 && move_index >= 4 && quiet && !in_check && !gives_check {
            self.lmr[(depth as usize).min(63)][move_index.min(63)].min(depth - 2)
        } else {
            0
        }
    }

    fn has_non_pawn_material(&self) -> bool {
        let us = self.board.side_to_move();
        [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .any(|&p| !self.board.bitboard(us, p).is_empty())
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

/// Null move is sound only with material to spare and a position already
/// standing above beta; in check or near zugzwang it is off.
fn can_null_move(
    ctx: &NodeContext,
    in_check: bool,
    depth: i32,
    static_eval: i32,
    beta: i32,
) -> bool {
    ctx.allow_null && !ctx.is_pv && !in_check && depth >= 3 && static_eval >= beta
}

/// Shallow node whose static eval is hopelessly below alpha: skip quiet
/// moves entirely.
fn is_futile(ctx: &NodeContext, in_check: bool, depth: i32, static_eval: i32, alpha: i32) -> bool {
    !ctx.is_pv
        && !in_check
        && depth <= 3
        && !is_mate_score(alpha)
        && static_eval + FUTILITY_MARGIN_PER_PLY * depth <= alpha
}

/// Most-valuable-victim / least-valuable-attacker, promotions counted as
/// their promoted piece.
fn capture_score(mv: Move) -> i32 {
    let mut score = 10 * mv.captured().value() - mv.piece().value();
    if mv.is_promotion() {
        score += 10 * mv.promotion().value();
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_at(fen: &str) -> Engine {
        let mut engine = Engine::with_table_size(1 << 14);
        engine.board = Board::from_fen(fen).expect("test FEN is valid");
        engine
    }

    #[test]
    fn named_pruning_predicates() {
        let pv = NodeContext {
            ply: 3,
            is_pv: true,
            allow_null: true,
        };
        let cut = NodeContext {
            is_pv: false,
            ..pv
        };

        assert!(!can_null_move(&pv, false, 5, 100, 50));
        assert!(can_null_move(&cut, false, 5, 100, 50));
        assert!(!can_null_move(&cut, true, 5, 100, 50));
        assert!(!can_null_move(&cut, false, 2, 100, 50));
        assert!(!can_null_move(&cut, false, 5, 10, 50));

        assert!(is_futile(&cut, false, 2, -500, 0));
        assert!(!is_futile(&cut, false, 2, -100, 0));
        assert!(!is_futile(&pv, false, 2, -500, 0));
        assert!(!is_futile(&cut, true, 2, -500, 0));
        assert!(!is_futile(&cut, false, 5, -1000, 0));
    }

    #[test]
    fn mvv_lva_prefers_big_victims_and_small_attackers() {
        use crate::types::sq;
        let pawn_takes_queen = Move::new(sq::E4, sq::D5, Piece::Pawn, Piece::Queen);
        let queen_takes_pawn = Move::new(sq::D1, sq::D5, Piece::Queen, Piece::Pawn);
        let rook_takes_rook = Move::new(sq::A1, sq::A8, Piece::Rook, Piece::Rook);

        assert!(capture_score(pawn_takes_queen) > capture_score(rook_takes_rook));
        assert!(capture_score(rook_takes_rook) > capture_score(queen_takes_pawn));
    }

    #[test]
    fn finds_mate_in_one() {
        let mut engine = engine_at("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1");
        let result = engine.think(&SearchLimits::depth(3), &mut |_| {});

        let best = result.best_move.expect("a move must be found");
        assert_eq!(best.to_uci(), "e1e8");
        assert!(is_mate_score(result.score));
        assert!(result.score > 0);
    }

    #[test]
    fn single_legal_move_is_returned_immediately() {
        // Only Kxb2 is legal.
        let mut engine = engine_at("k7/8/8/8/8/8/1q6/K7 w - - 0 1");
        let result = engine.think(&SearchLimits::depth(20), &mut |_| {});

        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("a1b2".to_string()));
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn checkmated_position_returns_no_move() {
        // Back-rank mate already delivered.
        let mut engine = engine_at("6k1/5ppp/8/8/8/8/5PPP/4r1K1 w - - 0 1");
        let result = engine.think(&SearchLimits::depth(3), &mut |_| {});
        assert!(result.best_move.is_none());
        assert_eq!(result.score, -MATE);
    }

    #[test]
    fn hopeless_quiet_position_fails_low_without_a_false_mate() {
        // Black is a queen down with nothing but king shuffles, so shallow
        // nodes prune every quiet move; the fallback must fail low on the
        // static bound rather than report a mate that is not there.
        let mut engine = engine_at("k7/8/8/8/8/8/8/K5Q1 b - - 0 1");
        let result = engine.think(&SearchLimits::depth(5), &mut |_| {});

        let best = result.best_move.expect("black still has legal moves");
        assert!(engine.board.legal_moves().contains(&best));
        assert!(result.score < 0);
        assert!(!is_mate_score(result.score));
    }

    #[test]
    fn returned_move_is_always_legal() {
        let fens = [
            crate::board::START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];

        for fen in fens {
            let mut engine = engine_at(fen);
            let best = engine
                .search(&SearchLimits::depth(4))
                .expect("positions have legal moves");
            assert!(
                engine.board.legal_moves().contains(&best),
                "illegal best move {best} for {fen}"
            );
        }
    }

    #[test]
    fn search_leaves_board_unchanged() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
        let mut engine = engine_at(fen);
        let before = engine.board.to_fen();
        let hash_before = engine.board.hash();

        engine.search(&SearchLimits::depth(4));

        assert_eq!(engine.board.to_fen(), before);
        assert_eq!(engine.board.hash(), hash_before);
    }

    #[test]
    fn pv_starts_with_best_move() {
        let mut engine = engine_at("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1");
        let result = engine.think(&SearchLimits::depth(3), &mut |_| {});
        let pv = engine.principal_variation();

        assert!(!pv.is_empty());
        assert_eq!(Some(pv[0]), result.best_move);
    }
}
