//! `trickplay`: plays a local media file through a hand-built GStreamer pipeline
//! and drives trick-play from the keyboard.
//!
//! ## Pipeline
//! `filesrc → decodebin → audioconvert → audioresample → audio sink`. The decoder's
//! output pad appears at runtime and is linked only when it carries raw audio.
//!
//! ## Controls
//! One command per line on stdin: `p` pause/resume, `s`/`S` fast/slow rate,
//! `d` reverse direction, `n` step one frame, `q` quit.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trickplay::{cli, runtime};

fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            std::process::exit(cli::parse_exit_code(&err));
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,trickplay=info,trickplay_player=info")
        }))
        .init();

    if let Err(e) = runtime::run(args.into(), true) {
        tracing::error!("{e:#}");
        std::process::exit(runtime::FAILURE_EXIT_CODE);
    }
}
