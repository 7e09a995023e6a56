//! Standard-input watch on the main loop.
//!
//! Stdin is watched for readiness instead of being read from a thread, so every
//! command runs on the loop that owns the controller. Reads are unbuffered and
//! split into lines here, which keeps several lines delivered in one read from
//! waiting for the next readiness event.

use std::cell::RefCell;
use std::io::{ErrorKind, Read};
use std::os::fd::{AsFd, AsRawFd};
use std::rc::Rc;

use anyhow::{Context, Result};
use gstreamer::glib;

const READ_CHUNK: usize = 1024;

/// Reassembles newline-terminated lines from arbitrary read chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append `bytes` and return every line completed by them, without terminators.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=end).collect();
            lines.push(decode_line(&raw[..end]));
        }
        lines
    }

    /// Flush an unterminated trailing line (used at end of input).
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        Some(decode_line(&raw))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Handle to the registered stdin watch; dropping it removes the watch.
pub struct StdinWatch {
    source: Rc<RefCell<Option<glib::SourceId>>>,
}

impl Drop for StdinWatch {
    fn drop(&mut self) {
        if let Some(id) = self.source.borrow_mut().take() {
            id.remove();
        }
    }
}

/// Hand `lines` to `on_line` in order, stopping at the first one that asks to stop.
fn dispatch_lines<F>(lines: Vec<String>, on_line: &mut F) -> glib::ControlFlow
where
    F: FnMut(&str) -> glib::ControlFlow,
{
    for line in lines {
        if on_line(&line) == glib::ControlFlow::Break {
            return glib::ControlFlow::Break;
        }
    }
    glib::ControlFlow::Continue
}

/// Register `on_line` for every complete line read from stdin.
///
/// Must be called on the thread that owns the default main context. The watch
/// stays registered while `on_line` returns `Continue`, including for lines no
/// command matches. It is removed when `on_line` returns `Break` (lines after
/// that one in the same read are dropped), at end of input, or on a read error.
pub fn watch_stdin<F>(mut on_line: F) -> Result<StdinWatch>
where
    F: FnMut(&str) -> glib::ControlFlow + 'static,
{
    let fd = std::io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .context("duplicate stdin")?;
    let raw_fd = fd.as_raw_fd();
    let mut reader = std::fs::File::from(fd);
    let mut lines = LineBuffer::default();
    let mut chunk = [0u8; READ_CHUNK];

    let source = Rc::new(RefCell::new(None));
    let source_cb = source.clone();
    let id = glib::unix_fd_add_local(
        raw_fd,
        glib::IOCondition::IN | glib::IOCondition::HUP,
        move |_, _| {
            let flow = match reader.read(&mut chunk) {
                Ok(0) => {
                    let tail = lines.finish().into_iter().collect();
                    if dispatch_lines(tail, &mut on_line) == glib::ControlFlow::Continue {
                        tracing::info!("stdin closed; keyboard control disabled");
                    }
                    glib::ControlFlow::Break
                }
                Ok(n) => dispatch_lines(lines.push(&chunk[..n]), &mut on_line),
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                    glib::ControlFlow::Continue
                }
                Err(e) => {
                    tracing::warn!("stdin read failed: {e}");
                    glib::ControlFlow::Break
                }
            };
            if flow == glib::ControlFlow::Break {
                source_cb.borrow_mut().take();
            }
            flow
        },
    );
    *source.borrow_mut() = Some(id);
    Ok(StdinWatch { source })
}
