use connect_four_core::engine::Algorithm;
use connect_four_core::logic::board::Color;
use connect_four_core::logic::game::{GameObserver, GameSnapshot};
use std::io::Write;

pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub const fn output(&self) -> &W {
        &self.out
    }

    fn render(&mut self, snapshot: &GameSnapshot<'_>) -> std::io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", snapshot.board)?;
        writeln!(
            self.out,
            "{}  {}  depth = {}  move {}/{}  sound {}",
            side(Color::Red, snapshot),
            side(Color::Yellow, snapshot),
            snapshot.depth,
            snapshot.moves,
            snapshot.history_len,
            if snapshot.sound_enabled { "on" } else { "off" }
        )?;
        if !snapshot.message.is_empty() {
            writeln!(self.out, "{}", snapshot.message)?;
        }
        self.out.flush()
    }
}

fn side(color: Color, snapshot: &GameSnapshot<'_>) -> String {
    let index = color.index();
    let player = if snapshot.automatic.get(index).copied().unwrap_or(false) {
        "computer"
    } else {
        "human"
    };
    let algorithm = snapshot
        .algorithms
        .get(index)
        .copied()
        .unwrap_or(Algorithm::AlphaBeta);
    format!("{}({color}): {player} [{algorithm}]", color.symbol())
}

impl<W: Write> GameObserver for TerminalView<W> {
    fn game_updated(&mut self, snapshot: &GameSnapshot<'_>) {
        if let Err(err) = self.render(snapshot) {
            tracing::error!("failed to draw board: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_four_core::logic::board::Board;

    #[test]
    fn test_render_snapshot() {
        let mut view = TerminalView::new(Vec::new());
        let board = Board::from_moves(&[3, 3]).unwrap();
        view.game_updated(&GameSnapshot {
            board,
            message: "AB(1)\nmoves = 7",
            automatic: [false, true],
            algorithms: [Algorithm::MonteCarlo, Algorithm::AlphaBeta],
            depth: 10,
            moves: 2,
            history_len: 2,
            sound_enabled: true,
        });
        let text = String::from_utf8(view.output().clone()).unwrap();
        assert!(text.contains("0  1  2  3  4  5  6"));
        assert!(text.contains("X(Red): human [MC]"));
        assert!(text.contains("O(Yellow): computer [AB]"));
        assert!(text.contains("depth = 10  move 2/2  sound on"));
        assert!(text.ends_with("AB(1)\nmoves = 7\n"));
    }
}
