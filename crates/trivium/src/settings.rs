//! User-facing settings that persist between runs.

use serde::{Deserialize, Serialize};

/// Text-to-speech preferences for question read-aloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TtsSettings {
    /// Whether questions are read aloud at all.
    pub enabled: bool,
    /// Speech rate multiplier. 1.0 is the synthesizer's native rate.
    pub speed: f32,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 1.0,
        }
    }
}
