//! Connect Four engine: packed board state, heuristic evaluation, alpha-beta
//! and Monte-Carlo search, and the game model that decides which of them runs.

pub mod engine;
pub mod logic;
