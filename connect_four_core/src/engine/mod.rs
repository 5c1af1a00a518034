use crate::logic::board::{Board, Color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub mod config;
pub mod eval;
pub mod mcts;
pub mod move_list;
pub mod search;
pub mod tt;

#[cfg(test)]
mod bench_test;
#[cfg(test)]
mod search_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    AlphaBeta,
    MonteCarlo,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaBeta => write!(f, "AB"),
            Self::MonteCarlo => write!(f, "MC"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchReport {
    Opening {
        player: Color,
        column: usize,
    },
    AlphaBeta {
        player: Color,
        nodes: u32,
        depth: u8,
        score: i32,
    },
    MonteCarlo {
        player: Color,
        elapsed: Duration,
        samples: u32,
        score: f64,
        tree_value: Option<f64>,
    },
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening { player, column } => {
                write!(f, "OPEN({})\ncolumn = {column}", player.index())
            }
            Self::AlphaBeta {
                player,
                nodes,
                depth,
                score,
            } => write!(
                f,
                "AB({})\nmoves = {nodes}\ndepth = {depth}\nscore = {score}",
                player.index()
            ),
            Self::MonteCarlo {
                player,
                elapsed,
                samples,
                score,
                tree_value,
            } => {
                write!(
                    f,
                    "MC({}) {:.3}s\nsamples = {samples}\nscore = {score:.4}",
                    player.index(),
                    elapsed.as_secs_f64()
                )?;
                if let Some(value) = tree_value {
                    write!(f, "\ntree = {value:.4}")?;
                }
                Ok(())
            }
        }
    }
}

pub trait Evaluator {
    // Score of `board` from Red's point of view.
    fn evaluate(&self, board: &Board) -> i32;
}
