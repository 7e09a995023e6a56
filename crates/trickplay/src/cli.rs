use std::path::PathBuf;

use clap::Parser;
use trickplay_player::config::DEFAULT_AUDIO_SINK;

use crate::runtime::FAILURE_EXIT_CODE;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "trickplay", version = VERSION)]
pub struct Args {
    /// Local media file to play
    pub path: PathBuf,

    /// GStreamer element factory used as the audio sink
    #[arg(long, default_value = DEFAULT_AUDIO_SINK)]
    pub audio_sink: String,
}

/// Exit status for a failed parse: help and version exit cleanly, usage errors fail.
pub fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        FAILURE_EXIT_CODE
    } else {
        0
    }
}
