use std::path::PathBuf;

pub use trickplay_player::config::PlayerConfig;

use crate::cli::Args;

#[derive(Clone, Debug)]
pub struct TrickPlayConfig {
    pub path: PathBuf,
    pub player: PlayerConfig,
}

impl From<Args> for TrickPlayConfig {
    fn from(args: Args) -> Self {
        let audio_sink = args.audio_sink.trim();
        let player = if audio_sink.is_empty() {
            PlayerConfig::default()
        } else {
            PlayerConfig {
                audio_sink: audio_sink.to_string(),
                ..PlayerConfig::default()
            }
        };
        Self {
            path: args.path,
            player,
        }
    }
}
