use connect_four_core::logic::game::{SoundEffect, SoundSink};

#[derive(Debug)]
pub struct TracingSound {
    enabled: bool,
    bell: bool,
}

impl TracingSound {
    pub const fn new(bell: bool) -> Self {
        Self {
            enabled: true,
            bell,
        }
    }
}

pub fn sample_name(effect: SoundEffect) -> String {
    match effect {
        SoundEffect::Restart => "restart".to_string(),
        SoundEffect::Drop { row, .. } => format!("drop{}", row + 1),
        SoundEffect::Error => "error".to_string(),
        SoundEffect::Info => "info".to_string(),
        SoundEffect::Warning => "warning".to_string(),
        SoundEffect::Loser => "loser".to_string(),
        SoundEffect::Winner => "winner".to_string(),
    }
}

impl SoundSink for TracingSound {
    fn play(&mut self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        tracing::debug!(target: "sound", sample = %sample_name(effect), "play");
        if self.bell && matches!(effect, SoundEffect::Drop { .. } | SoundEffect::Error) {
            eprint!("\x07");
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        tracing::info!("sound {}", if enabled { "on" } else { "off" });
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
