use crate::engine::config::EngineConfig;
use crate::logic::board::{Board, Color, Outcome};
use log::{debug, trace};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Rollout statistics from Red's point of view. Draws only count as samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeData {
    pub wins: u32,
    pub losses: u32,
    pub samples: u32,
}

impl NodeData {
    pub const fn new(wins: u32, losses: u32, samples: u32) -> Self {
        Self {
            wins,
            losses,
            samples,
        }
    }

    /// `(wins - losses) / samples`, zero before the first sample.
    pub fn value(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        (f64::from(self.wins) - f64::from(self.losses)) / f64::from(self.samples)
    }

    pub fn value_for(&self, color: Color) -> f64 {
        match color {
            Color::Red => self.value(),
            Color::Yellow => -self.value(),
        }
    }

    pub fn absorb(&mut self, other: NodeData) {
        self.wins = self.wins.saturating_add(other.wins);
        self.losses = self.losses.saturating_add(other.losses);
        self.samples = self.samples.saturating_add(other.samples);
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeData{{{},{},{}}}({:.4})",
            self.wins,
            self.losses,
            self.samples,
            self.value()
        )
    }
}

/// UCB1 score of `child` below `parent`, seen by the player who moved into
/// `child`. Unvisited children come first.
pub fn ucb(child: &NodeData, parent: &NodeData, mover: Color, exploration: f64) -> f64 {
    if child.samples == 0 {
        return f64::INFINITY;
    }
    let parent_samples = f64::from(parent.samples.max(1));
    child.value_for(mover) + exploration * (parent_samples.log2() / f64::from(child.samples)).sqrt()
}

/// Plays `samples` uniform random games from `board`. A finished position
/// counts as a single sample of its result.
pub fn simulate<R: Rng + ?Sized>(board: &Board, samples: u32, rng: &mut R) -> NodeData {
    match board.winner() {
        Outcome::Win(Color::Red) => return NodeData::new(1, 0, 1),
        Outcome::Win(Color::Yellow) => return NodeData::new(0, 1, 1),
        Outcome::Draw => return NodeData::new(0, 0, 1),
        Outcome::Ongoing => {}
    }

    let mut data = NodeData::new(0, 0, samples);
    for _ in 0..samples {
        let mut playout = *board;
        while !playout.is_terminal() {
            playout = playout.random_move(rng);
        }
        match playout.winner() {
            Outcome::Win(Color::Red) => data.wins += 1,
            Outcome::Win(Color::Yellow) => data.losses += 1,
            _ => {}
        }
    }
    data
}

/// Scores every child by rollouts and keeps the best one for the player to
/// move. The score is from that player's point of view. Ties go to the
/// earliest generated child.
pub fn naive_analyze<R: Rng + ?Sized>(
    board: &Board,
    samples: u32,
    rng: &mut R,
) -> Option<(Board, f64)> {
    if board.is_terminal() {
        return None;
    }
    let mover = board.next_player();
    let mut best: Option<(Board, f64)> = None;

    for child in board.children() {
        let data = simulate(&child, samples, rng);
        let score = data.value_for(mover);
        trace!("mc child column={:?} {data}", child.last_column());
        if best.map_or(true, |(_, current)| score > current) {
            best = Some((child, score));
        }
    }
    best
}

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloOutcome {
    pub best: Board,
    /// From the point of view of the player who moved into `best`.
    pub score: f64,
    pub samples: u32,
    pub elapsed: Duration,
}

/// One-ply Monte-Carlo decision. Returns `None` on a finished game.
pub fn monte_carlo_choose<R: Rng + ?Sized>(
    board: &Board,
    samples: u32,
    rng: &mut R,
) -> Option<MonteCarloOutcome> {
    let start = Instant::now();
    let (best, score) = naive_analyze(board, samples, rng)?;
    let elapsed = start.elapsed();
    debug!(
        "monte-carlo: player={} samples={} score={:.4} column={:?} elapsed={:?}",
        board.next_player(),
        samples,
        score,
        best.last_column(),
        elapsed
    );
    Some(MonteCarloOutcome {
        best,
        score,
        samples,
        elapsed,
    })
}

/// A position at a given ply of the tree. The same position reached at two
/// different plies is tracked twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub board: Board,
    pub depth: usize,
}

/// UCB1 tree kept as one map per ply. Built for a single decision.
pub struct MonteCarloTree {
    levels: Vec<HashMap<NodeKey, NodeData>>,
    root: NodeKey,
    max_depth: usize,
    samples: u32,
    exploration: f64,
}

impl MonteCarloTree {
    pub fn new(root: Board, config: &EngineConfig) -> Self {
        let root = NodeKey {
            board: root,
            depth: 0,
        };
        let mut level = HashMap::new();
        level.insert(root, NodeData::default());
        Self {
            levels: vec![level],
            root,
            max_depth: config.tree_max_depth,
            samples: config.tree_samples,
            exploration: config.exploration,
        }
    }

    pub const fn root(&self) -> Board {
        self.root.board
    }

    pub fn root_data(&self) -> NodeData {
        self.data(&self.root).unwrap_or_default()
    }

    pub fn root_value(&self) -> f64 {
        self.root_data().value_for(self.root.board.next_player())
    }

    pub fn levels(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self, key: &NodeKey) -> Option<NodeData> {
        self.levels.get(key.depth)?.get(key).copied()
    }

    fn expanded_children(&self, key: &NodeKey) -> Vec<(NodeKey, NodeData)> {
        let depth = key.depth + 1;
        let Some(level) = self.levels.get(depth) else {
            return Vec::new();
        };
        key.board
            .children()
            .filter_map(|board| {
                let child = NodeKey { board, depth };
                level.get(&child).map(|data| (child, *data))
            })
            .collect()
    }

    /// Descends from the root by UCB1 until a node has no expanded children
    /// or the depth limit is hit. Returns the path, root first.
    pub fn select(&self) -> Vec<NodeKey> {
        let mut path = vec![self.root];
        let mut current = self.root;
        let mut current_data = self.root_data();

        while current.depth < self.max_depth {
            let mover = current.board.next_player();
            let mut best: Option<(NodeKey, NodeData, f64)> = None;
            for (child, data) in self.expanded_children(&current) {
                let value = ucb(&data, &current_data, mover, self.exploration);
                if best.map_or(true, |(_, _, top)| value > top) {
                    best = Some((child, data, value));
                }
            }
            let Some((child, data, _)) = best else {
                break;
            };
            path.push(child);
            current = child;
            current_data = data;
        }
        path
    }

    /// Adds every untried child of `selected` on the next ply and returns the
    /// last one. Finished positions and nodes at the depth limit are returned
    /// unchanged.
    pub fn expand(&mut self, selected: NodeKey) -> NodeKey {
        if selected.board.is_terminal() || selected.depth >= self.max_depth {
            return selected;
        }
        let depth = selected.depth + 1;
        if self.levels.len() <= depth {
            self.levels.resize_with(depth + 1, HashMap::new);
        }
        let Some(level) = self.levels.get_mut(depth) else {
            return selected;
        };

        let mut last = selected;
        for board in selected.board.children() {
            let child = NodeKey { board, depth };
            level.entry(child).or_default();
            last = child;
        }
        last
    }

    pub fn backpropagate(&mut self, path: &[NodeKey], result: NodeData) {
        for key in path {
            if let Some(data) = self
                .levels
                .get_mut(key.depth)
                .and_then(|level| level.get_mut(key))
            {
                data.absorb(result);
            }
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> NodeData {
        let mut path = self.select();
        let selected = path.last().copied().unwrap_or(self.root);
        let expanded = self.expand(selected);
        if expanded != selected {
            path.push(expanded);
        }
        let result = simulate(&expanded.board, self.samples, rng);
        self.backpropagate(&path, result);
        trace!(
            "mcts step: depth={} column={:?} {result}",
            expanded.depth,
            expanded.board.last_column()
        );
        result
    }

    /// Runs `iterations` rounds and returns the root value for the player to
    /// move.
    pub fn run<R: Rng + ?Sized>(&mut self, iterations: u32, rng: &mut R) -> f64 {
        for _ in 0..iterations {
            self.step(rng);
        }
        let value = self.root_value();
        debug!(
            "mcts: iterations={} nodes={} levels={} root={}",
            iterations,
            self.len(),
            self.levels(),
            self.root_data()
        );
        value
    }

    /// Sampled root child with the best value for the player to move. Ties go
    /// to the earliest generated child.
    pub fn best_child(&self) -> Option<(Board, NodeData)> {
        let mover = self.root.board.next_player();
        let mut best: Option<(Board, NodeData)> = None;
        for (child, data) in self.expanded_children(&self.root) {
            if data.samples == 0 {
                continue;
            }
            if best.map_or(true, |(_, top)| data.value_for(mover) > top.value_for(mover)) {
                best = Some((child.board, data));
            }
        }
        best
    }
}

impl fmt::Display for MonteCarloTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- TREE BEGIN --")?;
        for (depth, level) in self.levels.iter().enumerate() {
            writeln!(f, "LEVEL({depth})")?;
            let mut nodes: Vec<_> = level.iter().collect();
            nodes.sort_by_key(|(key, _)| key.board);
            for (key, data) in nodes {
                writeln!(f, "{:?} DEPTH = {} INFO = {data}", key.board, key.depth)?;
            }
        }
        write!(f, "-- TREE END --")
    }
}
