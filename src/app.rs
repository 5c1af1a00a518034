use crate::ui::{TerminalView, TracingSound};
use connect_four_core::engine::config::EngineConfig;
use connect_four_core::logic::game::Game;
use connect_four_core::logic::rules::MoveError;
use std::io::{BufRead, Write};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Drop(usize),
    Compute,
    ToggleAlgorithms,
    TakeBack,
    Forward,
    TwoPlayer,
    Demo,
    ToggleSound,
    Restart,
    Quit,
}

impl Command {
    pub const fn parse(key: char) -> Option<Self> {
        let command = match key {
            '1'..='7' => Self::Drop(key as usize - '1' as usize),
            'c' | 'C' => Self::Compute,
            'a' | 'A' => Self::ToggleAlgorithms,
            't' | 'T' => Self::TakeBack,
            'f' | 'F' => Self::Forward,
            '@' => Self::TwoPlayer,
            'd' | 'D' => Self::Demo,
            's' | 'S' => Self::ToggleSound,
            '$' => Self::Restart,
            'q' | 'Q' => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

pub const HELP: &str = "1-7 drop  c compute  a algorithms  t take back  f forward  \
@ two players  d demo  s sound  $ restart  q quit";

pub struct App<W: Write> {
    game: Game<TerminalView<W>, TracingSound>,
}

impl<W: Write> App<W> {
    pub fn new(config: Arc<EngineConfig>, out: W, bell: bool) -> Self {
        Self {
            game: Game::new(config, TerminalView::new(out), TracingSound::new(bell)),
        }
    }

    pub const fn game(&self) -> &Game<TerminalView<W>, TracingSound> {
        &self.game
    }

    pub fn handle(&mut self, command: Command) -> bool {
        let result = match command {
            Command::Drop(column) => self.game.play(column).map(|_| ()),
            Command::Compute => {
                self.game.compute();
                Ok(())
            }
            Command::ToggleAlgorithms => {
                self.game.toggle_algorithms();
                Ok(())
            }
            Command::TakeBack => self.game.take_back(),
            Command::Forward => self.game.forward(),
            Command::TwoPlayer => {
                self.game.two_player();
                Ok(())
            }
            Command::Demo => {
                self.game.demo();
                Ok(())
            }
            Command::ToggleSound => {
                self.game.toggle_sound();
                Ok(())
            }
            Command::Restart => {
                self.game.restart();
                Ok(())
            }
            Command::Quit => return false,
        };
        if let Err(err) = result {
            report(err);
        }
        self.advance();
        true
    }

    pub fn advance(&mut self) {
        while self.game.computer_to_move() {
            if let Err(err) = self.game.play(0) {
                report(err);
                break;
            }
        }
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> std::io::Result<()> {
        self.advance();
        for line in input.lines() {
            for key in line?.chars().filter(|c| !c.is_whitespace()) {
                match Command::parse(key) {
                    Some(command) => {
                        if !self.handle(command) {
                            return Ok(());
                        }
                    }
                    None => tracing::warn!("unknown key {key:?} ({HELP})"),
                }
            }
        }
        Ok(())
    }
}

fn report(err: MoveError) {
    tracing::warn!("{err}");
}
