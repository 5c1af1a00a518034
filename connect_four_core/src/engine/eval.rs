use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{all_lines, Board, Color, Line, Outcome};
use crate::logic::eval_constants::{CONNECT, DRAW_SCORE, WINDOW_WEIGHTS, WIN_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicEvaluator {
    win_score: i32,
    weights: [i32; CONNECT + 1],
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self::new(WIN_SCORE, WINDOW_WEIGHTS)
    }
}

impl HeuristicEvaluator {
    pub const fn new(win_score: i32, weights: [i32; CONNECT + 1]) -> Self {
        Self { win_score, weights }
    }

    pub const fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.win_score, config.window_weights)
    }

    fn weight(&self, count: usize) -> i32 {
        self.weights.get(count).copied().unwrap_or(0)
    }

    fn window_value(&self, board: &Board, line: &Line) -> i32 {
        let mut counts = [0usize; 2];
        for (row, col) in line.cells() {
            if let Some(color) = board.get(row, col) {
                if let Some(n) = counts.get_mut(color.index()) {
                    *n += 1;
                }
            }
        }
        let [red, yellow] = counts;
        if red > 0 && yellow > 0 {
            return 0;
        }
        self.weight(red) - self.weight(yellow)
    }

    pub fn heuristic_value(&self, board: &Board) -> i32 {
        all_lines()
            .map(|line| self.window_value(board, &line))
            .sum()
    }

    pub const fn terminal_value(&self, outcome: Outcome) -> Option<i32> {
        match outcome {
            Outcome::Win(Color::Red) => Some(self.win_score),
            Outcome::Win(Color::Yellow) => Some(-self.win_score),
            Outcome::Draw => Some(DRAW_SCORE),
            Outcome::Ongoing => None,
        }
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        self.terminal_value(board.winner())
            .unwrap_or_else(|| self.heuristic_value(board))
    }
}
