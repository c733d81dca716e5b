// Iterative deepening negamax with alpha-beta pruning, quiescence search,
// a transposition table and killer moves.
use std::time::{Duration, Instant};

use chess_core::{gives_check, is_king_in_check, legal_moves, Board, Move, MoveKey};

use crate::config::SearchConfig;
use crate::evaluation::evaluate_position;
use crate::killers::KillerTable;
use crate::ordering::{order_moves, order_tactical};
use crate::tt::{EntryType, TTEntry, TranspositionTable};

// Core search algorithm parameters
pub const MATE_SCORE: i32 = 100_000;              // Value representing checkmate
pub const INFINITY: i32 = MATE_SCORE + 1;         // Full search window
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000; // Anything beyond this is a forced mate
pub const MAX_QUIESCENCE_PLY: u8 = 6;             // Capture plies searched past the horizon

pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}

/// A root move with the score it received in the last completed iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootCandidate {
    pub mv: Move,
    pub score: i32,
    /// The deadline hit while this move was being searched.
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationSummary {
    pub depth: u8,
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Outcome of one search. Scores are from the point of view of the side to move.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    /// The move actually played, which differs from `best_move` only when
    /// creative selection picked an alternative.
    pub chosen_move: Option<Move>,
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub target_depth: u8,
    /// Deepest ply reached, quiescence included.
    pub seldepth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub candidates: Vec<RootCandidate>,
    pub iterations: Vec<IterationSummary>,
    /// The root position is already a dead draw (fifty-move rule or insufficient material).
    pub forced_draw: bool,
    pub generation: u64,
}

impl SearchReport {
    fn new(target_depth: u8, forced_draw: bool) -> Self {
        Self {
            best_move: None,
            chosen_move: None,
            score: 0,
            depth: 0,
            target_depth,
            seldepth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            candidates: Vec::new(),
            iterations: Vec::new(),
            forced_draw,
            generation: 0,
        }
    }
}

/// Tactical features of the root position, gathered once per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootPressure {
    pub captures: usize,
    pub checks: usize,
    pub promotions: usize,
    pub branching: usize,
}

impl RootPressure {
    pub fn analyze(board: &Board, moves: &[Move]) -> Self {
        let mut pressure = RootPressure { branching: moves.len(), ..Self::default() };
        for mv in moves {
            if mv.is_capture() {
                pressure.captures += 1;
            }
            if mv.is_promotion() {
                pressure.promotions += 1;
            }
            if gives_check(board, mv) {
                pressure.checks += 1;
            }
        }
        pressure
    }

    pub fn tactical(&self) -> usize {
        self.captures + self.promotions
    }
}

/// How deep and how long to search, after extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPlan {
    pub target_depth: u8,
    pub time_bonus_ms: u64,
}

impl SearchPlan {
    pub fn new(config: &SearchConfig, pressure: &RootPressure) -> Self {
        let ext = &config.extensions;
        let tactical = pressure.tactical() > ext.tactical_move_threshold;

        let mut bonus = 0u8;
        if tactical {
            bonus = bonus.saturating_add(ext.capture_depth_bonus);
        }
        if pressure.checks > 0 {
            bonus = bonus.saturating_add(ext.check_depth_bonus);
        }
        let target_depth = config.depth.saturating_add(bonus).min(config.extension_ceiling());

        let time_bonus_ms = if pressure.branching > ext.branching_threshold || tactical {
            ext.time_bonus_ms
        } else {
            0
        };

        Self { target_depth, time_bonus_ms }
    }
}

/// Result of searching one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    pub score: i32,
    pub best_move: Option<Move>,
    pub aborted: bool,
}

impl SearchNode {
    fn leaf(score: i32) -> Self {
        Self { score, best_move: None, aborted: false }
    }

    fn aborted(score: i32) -> Self {
        Self { score, best_move: None, aborted: true }
    }
}

/// Mutable state shared by every node of one search.
pub struct SearchContext<'a> {
    pub tt: &'a mut TranspositionTable,
    pub killers: KillerTable,
    pub deadline: Instant,
    pub nodes: u64,
    pub seldepth: u8,
    /// Searched first at the root: the caller's hint, then each completed iteration's best move.
    pub root_hint: Option<MoveKey>,
    /// Root moves within this many centipawns of the best get exact scores.
    pub root_margin: i32,
    pub root_candidates: Vec<RootCandidate>,
}

impl<'a> SearchContext<'a> {
    pub fn new(tt: &'a mut TranspositionTable, deadline: Instant) -> Self {
        Self {
            tt,
            killers: KillerTable::new(),
            deadline,
            nodes: 0,
            seldepth: 0,
            root_hint: None,
            root_margin: 0,
            root_candidates: Vec::new(),
        }
    }

    fn out_of_time(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

// Main function that finds the best move in a given position
pub fn search(
    board: &Board,
    config: &SearchConfig,
    tt: &mut TranspositionTable,
    hint: Option<MoveKey>,
) -> SearchReport {
    let start = Instant::now();
    let sign = board.current_turn().sign();

    let root_moves = legal_moves(board);
    let pressure = RootPressure::analyze(board, &root_moves);
    let plan = SearchPlan::new(config, &pressure);
    let deadline = start + Duration::from_millis(config.time_limit_ms.saturating_add(plan.time_bonus_ms));
    let forced_draw = board.is_fifty_move_draw() || board.has_insufficient_material();

    let mut report = SearchReport::new(plan.target_depth, forced_draw);

    if root_moves.is_empty() {
        report.score = if is_king_in_check(board, board.current_turn()) { -MATE_SCORE } else { 0 };
        report.elapsed = start.elapsed();
        log::info!("no legal moves at the root, nothing to search");
        return report;
    }

    log::debug!(
        "searching to depth {} ({} moves, {} tactical, {} checks, +{}ms)",
        plan.target_depth,
        pressure.branching,
        pressure.tactical(),
        pressure.checks,
        plan.time_bonus_ms
    );

    let mut ctx = SearchContext::new(tt, deadline);
    ctx.root_hint = hint;
    if config.creativity.enabled {
        ctx.root_margin = config.creativity.threshold_centipawns;
    }

    for depth in 1..=plan.target_depth {
        if ctx.out_of_time() {
            log::debug!("deadline reached before depth {}", depth);
            break;
        }

        ctx.root_candidates.clear();
        let node = negamax(board, depth, -INFINITY, INFINITY, sign, &mut ctx, 0);
        if node.aborted {
            log::debug!("depth {} aborted after {} nodes, keeping previous result", depth, ctx.nodes);
            break;
        }

        report.best_move = node.best_move;
        report.score = node.score;
        report.depth = depth;
        report.candidates = std::mem::take(&mut ctx.root_candidates);
        report.iterations.push(IterationSummary {
            depth,
            best_move: node.best_move,
            score: node.score,
            nodes: ctx.nodes,
            elapsed: start.elapsed(),
        });
        ctx.root_hint = node.best_move.map(|mv| mv.key());

        log::debug!(
            "depth {} complete: best {} score {} nodes {} in {:?}",
            depth,
            node.best_move.map_or_else(|| "-".to_string(), |mv| mv.to_coordinate()),
            node.score,
            ctx.nodes,
            start.elapsed()
        );

        // Early exit if we found a forced mate
        if is_mate_score(node.score) {
            break;
        }
    }

    if report.best_move.is_none() {
        log::warn!("no search iteration completed in time, playing the first legal move");
        report.best_move = root_moves.first().copied();
        report.score = sign * evaluate_position(board);
    }

    report.chosen_move = report.best_move;
    report.nodes = ctx.nodes;
    report.seldepth = ctx.seldepth;
    report.elapsed = start.elapsed();

    log::info!(
        "search finished: {} score {} depth {}/{} seldepth {} nodes {} in {:?}",
        report.best_move.map_or_else(|| "-".to_string(), |mv| mv.to_coordinate()),
        report.score,
        report.depth,
        report.target_depth,
        report.seldepth,
        report.nodes,
        report.elapsed
    );
    report
}

/// Negamax alpha-beta search. `sign` is +1 when White is to move and -1 for Black,
/// and turns the White-positive evaluation into the mover's point of view.
pub fn negamax(
    board: &Board,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    sign: i32,
    ctx: &mut SearchContext,
    ply: u8,
) -> SearchNode {
    ctx.nodes += 1;
    if ctx.out_of_time() {
        return SearchNode::aborted(sign * evaluate_position(board));
    }

    if depth == 0 {
        return quiescence(board, alpha, beta, sign, ctx, ply);
    }

    if ply > 0 && (board.is_fifty_move_draw() || board.has_insufficient_material()) {
        return SearchNode::leaf(0);
    }

    // Try to use cached result if we have one. The root always searches so
    // that it produces a move and candidate scores.
    let key = board.key();
    let probe = ctx.tt.probe(&key, depth, alpha, beta, ply);
    let hint = if ply == 0 {
        ctx.root_hint.or(probe.hint)
    } else {
        if let Some(score) = probe.cutoff {
            return SearchNode::leaf(score);
        }
        alpha = probe.alpha;
        beta = probe.beta;
        probe.hint
    };
    let window_alpha = alpha;

    let mut moves = legal_moves(board);
    if moves.is_empty() {
        let score = if is_king_in_check(board, board.current_turn()) {
            -MATE_SCORE + ply as i32
        } else {
            0
        };
        return SearchNode::leaf(score);
    }
    order_moves(&mut moves, hint.as_ref(), &ctx.killers, ply as usize);

    let mut best = SearchNode { score: -INFINITY, best_move: None, aborted: false };
    for mv in moves {
        let child = board.apply_move(&mv);
        let child_alpha = if ply == 0 { alpha - ctx.root_margin } else { alpha };
        let reply = negamax(&child, depth - 1, -beta, -child_alpha, -sign, ctx, ply + 1);
        let score = -reply.score;

        if ply == 0 {
            ctx.root_candidates.push(RootCandidate { mv, score, aborted: reply.aborted });
        }
        if reply.aborted {
            best.aborted = true;
            return best;
        }

        if score > best.score {
            best.score = score;
            best.best_move = Some(mv);
        }
        alpha = alpha.max(score);

        // Beta cutoff - position is too good, opponent won't allow it
        if alpha >= beta {
            if !mv.is_capture() {
                ctx.killers.record(ply as usize, mv.key());
            }
            break;
        }
    }

    let entry_type = if best.score <= window_alpha {
        EntryType::UpperBound
    } else if best.score >= beta {
        EntryType::LowerBound
    } else {
        EntryType::Exact
    };
    ctx.tt.store(
        key,
        TTEntry {
            depth,
            score: best.score,
            entry_type,
            best_move: best.best_move.map(|mv| mv.key()),
        },
        ply,
    );

    best
}

// Search captures to make sure we don't miss any tactical opportunities
pub fn quiescence(board: &Board, alpha: i32, beta: i32, sign: i32, ctx: &mut SearchContext, ply: u8) -> SearchNode {
    quiesce(board, alpha, beta, sign, ctx, ply, 0)
}

fn quiesce(
    board: &Board,
    mut alpha: i32,
    beta: i32,
    sign: i32,
    ctx: &mut SearchContext,
    ply: u8,
    qply: u8,
) -> SearchNode {
    ctx.nodes += 1;
    ctx.seldepth = ctx.seldepth.max(ply);

    // Get a quick evaluation of the current position
    let stand_pat = sign * evaluate_position(board);
    if ctx.out_of_time() {
        return SearchNode::aborted(stand_pat);
    }

    let moves = legal_moves(board);
    if moves.is_empty() {
        let score = if is_king_in_check(board, board.current_turn()) {
            -MATE_SCORE + ply as i32
        } else {
            0
        };
        return SearchNode::leaf(score);
    }

    // Position is already too good - opponent won't allow it
    if stand_pat >= beta || qply >= MAX_QUIESCENCE_PLY {
        return SearchNode::leaf(stand_pat);
    }
    alpha = alpha.max(stand_pat);

    let mut tactical: Vec<Move> = moves.into_iter().filter(|mv| mv.is_tactical()).collect();
    order_tactical(&mut tactical);

    let mut best = stand_pat;
    for mv in tactical {
        let reply = quiesce(&board.apply_move(&mv), -beta, -alpha, -sign, ctx, ply + 1, qply + 1);
        if reply.aborted {
            return SearchNode::aborted(best);
        }
        let score = -reply.score;
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    SearchNode::leaf(best)
}
