use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::tt::{CachePolicy, NoCache, TTEntry, TTFlag, TranspositionTable};
use crate::engine::{Evaluator, SearchStats};
use crate::logic::board::{Board, Color};
use crate::logic::eval_constants::{MINUS_INFINITY, PLUS_INFINITY};
use log::debug;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub best: Board,
    // From the point of view of the player who moved into `best`.
    pub score: i32,
    pub stats: SearchStats,
}

pub struct AlphaBetaEngine<C: CachePolicy = NoCache> {
    evaluator: HeuristicEvaluator,
    cache: C,
    nodes_searched: u32,
}

impl AlphaBetaEngine<NoCache> {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_cache(config, NoCache)
    }
}

impl AlphaBetaEngine<TranspositionTable> {
    pub fn cached(config: &EngineConfig) -> Self {
        Self::with_cache(config, TranspositionTable::new())
    }
}

impl<C: CachePolicy> AlphaBetaEngine<C> {
    pub const fn with_cache(config: &EngineConfig, cache: C) -> Self {
        Self {
            evaluator: HeuristicEvaluator::from_config(config),
            cache,
            nodes_searched: 0,
        }
    }

    pub const fn cache(&self) -> &C {
        &self.cache
    }

    pub const fn nodes_searched(&self) -> u32 {
        self.nodes_searched
    }

    pub fn search(&mut self, board: &Board, max_depth: u8) -> Option<SearchOutcome> {
        if board.is_terminal() {
            return None;
        }
        let start = Instant::now();
        self.nodes_searched = 0;

        let second_player = board.next_player() == Color::Yellow;
        let (score, best) = self.alpha_beta(
            *board,
            MINUS_INFINITY,
            PLUS_INFINITY,
            true,
            second_player,
            max_depth,
            0,
        );
        // Only a pre-populated cache or a zero depth leaves the root without a
        // best child; fall back to the first generated one.
        let best = best.or_else(|| board.children().next())?;

        #[allow(clippy::cast_possible_truncation)]
        let stats = SearchStats {
            depth: max_depth,
            nodes: self.nodes_searched,
            time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            "alpha-beta: player={} depth={} nodes={} score={} column={:?} cached={}",
            board.next_player(),
            max_depth,
            stats.nodes,
            score,
            best.last_column(),
            self.cache.len()
        );
        Some(SearchOutcome { best, score, stats })
    }

    // Scores are seen from Red, negated when `second_player` is set, and
    // `maximizing` alternates per ply. On a cutoff the current bound is
    // returned together with the child that produced it; otherwise the final
    // bound and the last child that improved it.
    #[allow(clippy::too_many_arguments)]
    pub fn alpha_beta(
        &mut self,
        board: Board,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        second_player: bool,
        max_depth: u8,
        depth: u8,
    ) -> (i32, Option<Board>) {
        let perspective = |score: i32| if second_player { -score } else { score };

        // Cache Probe
        if let Some(entry) = self.cache.lookup(&board, depth) {
            let score = perspective(entry.score);
            let flag = if second_player {
                entry.flag.negated()
            } else {
                entry.flag
            };
            let usable = match flag {
                TTFlag::Exact => true,
                TTFlag::LowerBound => score >= beta,
                TTFlag::UpperBound => score <= alpha,
            };
            if usable {
                return (score, None);
            }
        }

        if depth >= max_depth || board.is_terminal() {
            let score = self.evaluator.evaluate(&board);
            self.store(&board, score, depth, TTFlag::Exact, false);
            return (perspective(score), None);
        }

        let alpha_orig = alpha;
        let beta_orig = beta;
        let mut best = None;

        for child in board.children() {
            self.nodes_searched = self.nodes_searched.saturating_add(1);

            let (val, _) = self.alpha_beta(
                child,
                alpha,
                beta,
                !maximizing,
                second_player,
                max_depth,
                depth + 1,
            );

            if maximizing {
                if val > alpha {
                    alpha = val;
                    best = Some(child);
                }
            } else if val < beta {
                beta = val;
                best = Some(child);
            }

            if beta <= alpha {
                let (bound, flag) = if maximizing {
                    (alpha, TTFlag::LowerBound)
                } else {
                    (beta, TTFlag::UpperBound)
                };
                self.store(&board, bound, depth, flag, second_player);
                return (bound, best);
            }
        }

        let (bound, flag) = if maximizing {
            let flag = if alpha > alpha_orig {
                TTFlag::Exact
            } else {
                TTFlag::UpperBound
            };
            (alpha, flag)
        } else {
            let flag = if beta < beta_orig {
                TTFlag::Exact
            } else {
                TTFlag::LowerBound
            };
            (beta, flag)
        };
        self.store(&board, bound, depth, flag, second_player);
        (bound, best)
    }

    // Records a result, converting it back to Red's point of view.
    fn store(&mut self, board: &Board, score: i32, depth: u8, flag: TTFlag, second_player: bool) {
        let entry = if second_player {
            TTEntry {
                score: -score,
                depth,
                flag: flag.negated(),
            }
        } else {
            TTEntry { score, depth, flag }
        };
        self.cache.insert(board, entry);
    }
}

pub fn alpha_beta_choose(board: &Board, max_depth: u8) -> Option<SearchOutcome> {
    AlphaBetaEngine::cached(&EngineConfig::default()).search(board, max_depth)
}
