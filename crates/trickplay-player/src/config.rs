use crate::rate::PlaybackRate;

/// Default audio sink factory; picks the platform output automatically.
pub const DEFAULT_AUDIO_SINK: &str = "autoaudiosink";

/// Settings used to assemble a trick-play pipeline.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Element factory used for the final audio stage.
    pub audio_sink: String,
    /// Rate the controller starts with once the pipeline is playing.
    pub initial_rate: PlaybackRate,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_sink: DEFAULT_AUDIO_SINK.to_string(),
            initial_rate: PlaybackRate::default(),
        }
    }
}
