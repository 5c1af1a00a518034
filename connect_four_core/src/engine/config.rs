use crate::engine::Algorithm;
use crate::logic::eval_constants::{CELLS, COLS, CONNECT, OPENING_COLUMN, WINDOW_WEIGHTS, WIN_SCORE};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub win_score: i32,
    pub window_weights: [i32; CONNECT + 1],

    // Alpha-Beta Parameters
    pub initial_depth: u8,
    pub max_depth: u8,
    pub deepening_node_floor: u32, // Deepen next time if a search visits fewer nodes
    pub use_cache: bool,

    // Monte-Carlo Parameters
    pub mc_samples: u32,
    pub tree_iterations: u32,
    pub tree_samples: u32,
    pub tree_max_depth: usize,
    pub exploration: f64,

    // Policy
    pub opening_column: usize,
    pub algorithms: [Algorithm; 2], // Indexed by Color::index()
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE,
            window_weights: WINDOW_WEIGHTS,

            initial_depth: 10,
            #[allow(clippy::cast_possible_truncation)]
            max_depth: CELLS as u8,
            deepening_node_floor: 2_000_000,
            use_cache: true,

            mc_samples: 10_000,
            tree_iterations: 1,
            tree_samples: 1_000,
            tree_max_depth: CELLS,
            exploration: std::f64::consts::SQRT_2,

            opening_column: OPENING_COLUMN,
            algorithms: [Algorithm::MonteCarlo, Algorithm::AlphaBeta],
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json_str)?;
        Ok(config.sanitized())
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn sanitized(mut self) -> Self {
        let cells = CELLS as u8;
        if self.max_depth == 0 || self.max_depth > cells {
            warn!("max_depth {} out of range, using {cells}", self.max_depth);
            self.max_depth = cells;
        }
        if self.initial_depth == 0 || self.initial_depth > self.max_depth {
            let depth = self.initial_depth.clamp(1, self.max_depth);
            warn!("initial_depth {} out of range, using {depth}", self.initial_depth);
            self.initial_depth = depth;
        }
        if self.mc_samples == 0 {
            warn!("mc_samples must be positive, using 1");
            self.mc_samples = 1;
        }
        if self.tree_samples == 0 {
            warn!("tree_samples must be positive, using 1");
            self.tree_samples = 1;
        }
        if self.tree_max_depth == 0 || self.tree_max_depth > CELLS {
            warn!("tree_max_depth {} out of range, using {CELLS}", self.tree_max_depth);
            self.tree_max_depth = CELLS;
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            warn!("exploration {} invalid, using sqrt(2)", self.exploration);
            self.exploration = std::f64::consts::SQRT_2;
        }
        if self.opening_column >= COLS {
            warn!("opening_column {} out of range, using {OPENING_COLUMN}", self.opening_column);
            self.opening_column = OPENING_COLUMN;
        }
        if self.win_score <= 0 {
            warn!("win_score must be positive, using {WIN_SCORE}");
            self.win_score = WIN_SCORE;
        }
        self
    }
}
