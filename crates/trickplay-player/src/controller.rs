//! Trick-play controller.
//!
//! Holds the play/pause flag and the signed playback rate, and turns keyboard
//! commands into state changes, seeks and steps on a [`PlaybackBackend`].
//! Runtime failures are logged and the offending action is dropped; nothing
//! here ends the run except [`Command::Quit`].

use anyhow::{Context, Result};
use gstreamer as gst;

use crate::command::Command;
use crate::rate::PlaybackRate;
use crate::seek::{SeekRequest, StepRequest};

/// Operations the controller needs from the media pipeline.
pub trait PlaybackBackend {
    /// Request `Playing` (`true`) or `Paused` (`false`).
    fn set_playing(&self, playing: bool) -> Result<()>;
    /// Whether the pipeline is `Playing`, after any pending transition settles.
    fn is_playing(&self) -> bool;
    /// Current stream position, if the pipeline can report one.
    fn position(&self) -> Option<gst::ClockTime>;
    fn send_seek(&self, request: &SeekRequest) -> Result<()>;
    fn send_step(&self, request: &StepRequest) -> Result<()>;
}

/// What the input loop should do after a line has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Quit,
}

pub struct TrickPlayController<B> {
    backend: B,
    playing: bool,
    rate: PlaybackRate,
}

impl<B: PlaybackBackend> TrickPlayController<B> {
    /// Controller for a pipeline that has just been set to `Playing`.
    pub fn new(backend: B, rate: PlaybackRate) -> Self {
        Self {
            backend,
            playing: true,
            rate,
        }
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Dispatch one line of keyboard input.
    pub fn handle_line(&mut self, line: &str) -> Dispatch {
        match Command::parse(line) {
            Some(command) => self.handle(command),
            None => {
                tracing::debug!(line, "ignoring unknown input");
                Dispatch::Continue
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Dispatch {
        match command {
            Command::TogglePause => self.toggle_pause(),
            Command::FastSpeed => self.set_speed(PlaybackRate::FAST),
            Command::SlowSpeed => self.set_speed(PlaybackRate::SLOW),
            Command::ReverseDirection => self.reverse(),
            Command::StepFrame => self.step(),
            Command::Quit => return Dispatch::Quit,
        }
        Dispatch::Continue
    }

    pub fn toggle_pause(&mut self) {
        self.playing = !self.playing;
        let label = if self.playing { "PLAYING" } else { "PAUSE" };
        tracing::info!(state = label, "setting pipeline state");
        if let Err(e) = self.backend.set_playing(self.playing) {
            tracing::warn!("state change failed: {e:#}");
        }
    }

    pub fn set_speed(&mut self, magnitude: f64) {
        self.rate = self.rate.with_magnitude(magnitude);
        self.apply_rate();
    }

    pub fn reverse(&mut self) {
        self.rate = self.rate.reversed();
        self.apply_rate();
    }

    pub fn step(&mut self) {
        match self.backend.send_step(&StepRequest::one_frame(self.rate)) {
            Ok(()) => tracing::info!("stepping one frame"),
            Err(e) => tracing::warn!("step failed: {e:#}"),
        }
    }

    fn apply_rate(&mut self) {
        if let Err(e) = self.send_seek() {
            tracing::warn!(rate = %self.rate, "seek abandoned: {e:#}");
        }
    }

    /// Re-render the stream at the current rate from the current position.
    fn send_seek(&mut self) -> Result<()> {
        if !self.backend.is_playing() {
            self.backend
                .set_playing(true)
                .context("Unable to set the pipeline to the playing state")?;
            self.playing = true;
        }

        let position = self
            .backend
            .position()
            .context("Unable to retrieve current position")?;
        tracing::info!(%position, "current position");

        self.backend
            .send_seek(&SeekRequest::for_rate(self.rate, position))?;
        tracing::info!(rate = %self.rate, "current rate");
        Ok(())
    }
}
