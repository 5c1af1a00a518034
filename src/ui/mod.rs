mod audio;
mod board;

pub use audio::TracingSound;
pub use board::TerminalView;
