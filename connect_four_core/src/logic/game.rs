#![allow(clippy::indexing_slicing)]
use crate::engine::config::EngineConfig;
use crate::engine::mcts::{monte_carlo_choose, MonteCarloTree};
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Algorithm, SearchReport};
use crate::logic::board::{Board, Color, Outcome};
use crate::logic::rules::{try_move, MoveError};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Restart,
    Drop { row: usize, column: usize },
    Error,
    Info,
    Warning,
    Loser,
    Winner,
}

#[derive(Debug, Clone, Copy)]
pub struct GameSnapshot<'a> {
    pub board: Board,
    pub message: &'a str,
    pub automatic: [bool; 2],
    pub algorithms: [Algorithm; 2],
    pub depth: u8,
    pub moves: usize,
    pub history_len: usize,
    pub sound_enabled: bool,
}

pub trait GameObserver {
    fn game_updated(&mut self, snapshot: &GameSnapshot<'_>);
}

impl GameObserver for () {
    fn game_updated(&mut self, _snapshot: &GameSnapshot<'_>) {}
}

pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;

    fn toggle(&mut self) {
        let enabled = self.is_enabled();
        self.set_enabled(!enabled);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SilentSink {
    enabled: bool,
}

impl Default for SilentSink {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SoundSink for SilentSink {
    fn play(&mut self, _effect: SoundEffect) {}

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, Copy)]
struct Turn {
    board: Board,
    // Alpha-beta depth in effect after this move.
    depth: u8,
}

pub struct Game<V: GameObserver = (), S: SoundSink = SilentSink> {
    history: Vec<Turn>,
    cursor: usize,
    automatic: [bool; 2],
    algorithms: [Algorithm; 2],
    depth: u8,
    message: String,
    report: Option<SearchReport>,
    rng: StdRng,
    config: Arc<EngineConfig>,
    observer: V,
    sound: S,
}

impl Game {
    pub fn headless(config: Arc<EngineConfig>) -> Self {
        Self::new(config, (), SilentSink::default())
    }
}

impl<V: GameObserver, S: SoundSink> Game<V, S> {
    pub fn new(config: Arc<EngineConfig>, observer: V, sound: S) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut game = Self {
            history: Vec::new(),
            cursor: 0,
            automatic: [false, true],
            algorithms: config.algorithms,
            depth: config.initial_depth,
            message: String::new(),
            report: None,
            rng,
            config,
            observer,
            sound,
        };
        game.restart();
        game
    }

    // Queries

    pub fn state(&self) -> Board {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.history.get(i))
            .map_or_else(Board::new, |turn| turn.board)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn report(&self) -> Option<&SearchReport> {
        self.report.as_ref()
    }

    pub const fn is_automatic(&self, color: Color) -> bool {
        self.automatic[color.index()]
    }

    pub const fn algorithm(&self, color: Color) -> Algorithm {
        self.algorithms[color.index()]
    }

    pub const fn depth(&self) -> u8 {
        self.depth
    }

    pub const fn moves(&self) -> usize {
        self.cursor
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub const fn observer(&self) -> &V {
        &self.observer
    }

    pub const fn sound(&self) -> &S {
        &self.sound
    }

    pub fn computer_to_move(&self) -> bool {
        let board = self.state();
        !board.is_terminal() && self.is_automatic(board.next_player())
    }

    // Actions

    pub fn restart(&mut self) {
        self.history.clear();
        self.cursor = 0;
        self.automatic = [false, true];
        self.depth = self.config.initial_depth;
        self.report = None;
        self.message.clear();
        self.sound.play(SoundEffect::Restart);
        info!("new game, depth {}", self.depth);
        self.notify();
    }

    // Plays one move for the side to move. The computer ignores `column`.
    pub fn play(&mut self, column: usize) -> Result<Board, MoveError> {
        let board = self.state();
        if board.is_terminal() {
            return Err(MoveError::GameOver);
        }
        let player = board.next_player();

        if self.is_automatic(player) {
            let next = self.think(&board).ok_or(MoveError::GameOver)?;
            self.drop_sound(&board, &next);
            self.record(next);
            if next.winner() == Outcome::Win(player) && !self.is_automatic(player.opposite()) {
                self.sound.play(SoundEffect::Loser);
            }
            self.notify();
            return Ok(next);
        }

        let next = match try_move(&board, column) {
            Ok(next) => next,
            Err(err) => {
                self.sound.play(SoundEffect::Error);
                return Err(err);
            }
        };
        self.drop_sound(&board, &next);
        self.record(next);
        if next.winner() == Outcome::Win(player) && self.is_automatic(player.opposite()) {
            self.sound.play(SoundEffect::Winner);
        }
        self.notify();
        Ok(next)
    }

    pub fn compute(&mut self) {
        let board = self.state();
        if board.is_terminal() {
            return;
        }
        self.automatic[board.next_player().index()] = true;
        self.automatic[board.last_player().index()] = false;
        info!("computer takes {}", board.next_player());
        self.notify();
    }

    // Steps through the four algorithm pairings. Bit 0 is Red, a set bit
    // means Monte-Carlo.
    pub fn toggle_algorithms(&mut self) {
        let bits = self
            .algorithms
            .iter()
            .enumerate()
            .filter(|(_, algorithm)| **algorithm == Algorithm::MonteCarlo)
            .fold(0usize, |acc, (i, _)| acc | (1 << i));
        let bits = (bits + 1) & 3;
        for (i, algorithm) in self.algorithms.iter_mut().enumerate() {
            *algorithm = if bits & (1 << i) == 0 {
                Algorithm::AlphaBeta
            } else {
                Algorithm::MonteCarlo
            };
        }
        info!(
            "algorithms: red={} yellow={}",
            self.algorithms[0], self.algorithms[1]
        );
        self.notify();
    }

    pub fn take_back(&mut self) -> Result<(), MoveError> {
        if self.cursor == 0 {
            self.sound.play(SoundEffect::Error);
            return Err(MoveError::NothingToTakeBack);
        }
        self.cursor -= 1;
        self.after_step();
        Ok(())
    }

    pub fn forward(&mut self) -> Result<(), MoveError> {
        if self.cursor >= self.history.len() {
            self.sound.play(SoundEffect::Error);
            return Err(MoveError::NothingToRedo);
        }
        self.cursor += 1;
        self.after_step();
        Ok(())
    }

    pub fn two_player(&mut self) {
        self.automatic = [false, false];
        info!("two players");
        self.notify();
    }

    pub fn demo(&mut self) {
        self.automatic = [true, true];
        info!("demo");
        self.notify();
    }

    pub fn toggle_sound(&mut self) {
        self.sound.toggle();
        self.sound.play(SoundEffect::Info);
        self.notify();
    }

    // Decision policy

    fn think(&mut self, board: &Board) -> Option<Board> {
        let player = board.next_player();
        if board.is_empty() {
            let column = self.config.opening_column;
            let next = try_move(board, column).ok()?;
            self.set_report(SearchReport::Opening { player, column });
            return Some(next);
        }
        match self.algorithms[player.index()] {
            Algorithm::AlphaBeta => self.alpha_beta_think(board),
            Algorithm::MonteCarlo => self.monte_carlo_think(board),
        }
    }

    fn alpha_beta_think(&mut self, board: &Board) -> Option<Board> {
        let depth = self.depth;
        let outcome = if self.config.use_cache {
            AlphaBetaEngine::cached(&self.config).search(board, depth)
        } else {
            AlphaBetaEngine::new(&self.config).search(board, depth)
        }?;

        self.set_report(SearchReport::AlphaBeta {
            player: board.next_player(),
            nodes: outcome.stats.nodes,
            depth,
            score: outcome.score,
        });
        // Cheap searches deepen the next one.
        if outcome.stats.nodes < self.config.deepening_node_floor
            && self.depth < self.config.max_depth
        {
            self.depth += 1;
        }
        info!(
            "AB({}) depth={} nodes={} score={} time={}ms next depth={}",
            board.next_player(),
            depth,
            outcome.stats.nodes,
            outcome.score,
            outcome.stats.time_ms,
            self.depth
        );
        Some(outcome.best)
    }

    fn monte_carlo_think(&mut self, board: &Board) -> Option<Board> {
        let start = Instant::now();
        let config = Arc::clone(&self.config);
        let outcome = monte_carlo_choose(board, config.mc_samples, &mut self.rng)?;

        let tree_value = (config.tree_iterations > 0).then(|| {
            let mut tree = MonteCarloTree::new(*board, &config);
            tree.run(config.tree_iterations, &mut self.rng)
        });

        let elapsed = start.elapsed();
        self.set_report(SearchReport::MonteCarlo {
            player: board.next_player(),
            elapsed,
            samples: outcome.samples,
            score: outcome.score,
            tree_value,
        });
        info!(
            "MC({}) samples={} score={:.4} tree={:?} time={:?}",
            board.next_player(),
            outcome.samples,
            outcome.score,
            tree_value,
            elapsed
        );
        Some(outcome.best)
    }

    // Helpers

    fn set_report(&mut self, report: SearchReport) {
        self.message = report.to_string();
        self.report = Some(report);
    }

    fn drop_sound(&mut self, before: &Board, after: &Board) {
        if let Some(column) = after.last_column() {
            let row = before.column_height(column);
            self.sound.play(SoundEffect::Drop { row, column });
        }
    }

    fn record(&mut self, board: Board) {
        self.history.truncate(self.cursor);
        self.history.push(Turn {
            board,
            depth: self.depth,
        });
        self.cursor = self.history.len();
    }

    fn after_step(&mut self) {
        self.depth = self
            .cursor
            .checked_sub(1)
            .and_then(|i| self.history.get(i))
            .map_or(self.config.initial_depth, |turn| turn.depth);

        // Keep the human on move after stepping through history.
        let player = self.state().next_player();
        if self.automatic[player.index()] {
            self.automatic[player.index()] = false;
            self.automatic[player.opposite().index()] = true;
        }
        info!("history at move {}/{}, depth {}", self.cursor, self.history.len(), self.depth);
        self.sound.play(SoundEffect::Warning);
        self.notify();
    }

    fn notify(&mut self) {
        let board = self.state();
        let sound_enabled = self.sound.is_enabled();
        let snapshot = GameSnapshot {
            board,
            message: &self.message,
            automatic: self.automatic,
            algorithms: self.algorithms,
            depth: self.depth,
            moves: self.cursor,
            history_len: self.history.len(),
            sound_enabled,
        };
        self.observer.game_updated(&snapshot);
    }
}
