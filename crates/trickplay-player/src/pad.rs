//! Linking of decoder pads discovered at runtime.
//!
//! Runs from the decoder's `pad-added` signal on a streaming thread, so it only
//! touches GStreamer objects. The first raw-audio pad wins; later pads find the
//! converter already linked and are ignored.

use gstreamer as gst;
use gstreamer::prelude::*;

/// Media type prefix accepted by the audio converter.
pub const RAW_AUDIO_PREFIX: &str = "audio/x-raw";

/// Result of offering a new pad to the converter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PadOutcome {
    AlreadyLinked,
    /// Not raw audio, or no negotiated media type.
    Ignored(Option<String>),
    Linked(String),
    LinkFailed(String),
}

/// Link `new_pad` to the converter's sink pad if it carries raw audio.
pub fn link_discovered_pad(
    src: &gst::Element,
    new_pad: &gst::Pad,
    converter: &gst::Element,
) -> PadOutcome {
    tracing::info!(pad = %new_pad.name(), element = %src.name(), "received new pad");
    let media_type = media_type(new_pad);
    link_media_pad(new_pad, media_type, converter)
}

/// First caps structure name of the pad, preferring negotiated caps.
pub fn media_type(pad: &gst::Pad) -> Option<String> {
    let caps = pad.current_caps().unwrap_or_else(|| pad.query_caps(None));
    caps.structure(0).map(|s| s.name().to_string())
}

fn link_media_pad(
    new_pad: &gst::Pad,
    media_type: Option<String>,
    converter: &gst::Element,
) -> PadOutcome {
    let Some(sink_pad) = converter.static_pad("sink") else {
        tracing::warn!(element = %converter.name(), "converter has no sink pad");
        return PadOutcome::LinkFailed(media_type.unwrap_or_default());
    };

    if sink_pad.is_linked() {
        tracing::info!("converter already linked; ignoring pad");
        return PadOutcome::AlreadyLinked;
    }

    let media_type = match media_type {
        Some(t) if t.starts_with(RAW_AUDIO_PREFIX) => t,
        other => {
            tracing::info!(
                media_type = other.as_deref().unwrap_or("unknown"),
                "pad is not raw audio; ignoring"
            );
            return PadOutcome::Ignored(other);
        }
    };

    match new_pad.link(&sink_pad) {
        Ok(_) => {
            tracing::info!(media_type = %media_type, "link succeeded");
            PadOutcome::Linked(media_type)
        }
        Err(e) => {
            tracing::warn!(media_type = %media_type, "type matches but link failed: {e:?}");
            PadOutcome::LinkFailed(media_type)
        }
    }
}
