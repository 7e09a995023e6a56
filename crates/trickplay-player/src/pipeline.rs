//! Pipeline assembly and the GStreamer-backed [`PlaybackBackend`].
//!
//! ```text
//! filesrc ─▶ decodebin ┄▶ audioconvert ─▶ audioresample ─▶ audio sink
//! ```
//!
//! The dashed link is made by [`crate::pad::link_discovered_pad`] once the
//! decoder exposes a raw-audio pad. Seek and step events go to the sink, which
//! is looked up by name on first use and cached for the rest of the session.

use std::cell::OnceCell;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use gstreamer as gst;
use gstreamer::prelude::*;

use crate::config::PlayerConfig;
use crate::controller::PlaybackBackend;
use crate::pad;
use crate::seek::{SeekRequest, StepRequest};

pub const PIPELINE_NAME: &str = "trickplay-pipeline";
pub const SOURCE_NAME: &str = "source";
pub const DECODER_NAME: &str = "decoder";
pub const CONVERTER_NAME: &str = "convert";
pub const RESAMPLER_NAME: &str = "resample";
pub const SINK_NAME: &str = "sink";

/// Owns the pipeline and its five stages.
pub struct TrickPlayPipeline {
    pipeline: gst::Pipeline,
    source: gst::Element,
    decoder: gst::Element,
    converter: gst::Element,
    resampler: gst::Element,
    sink: gst::Element,
}

fn make_element(factory: &str, name: &str) -> Result<gst::Element> {
    gst::ElementFactory::make(factory)
        .name(name)
        .build()
        .with_context(|| format!("create {factory} element '{name}'"))
}

impl TrickPlayPipeline {
    /// Create, add and link the stages for playing `path`.
    ///
    /// The decoder-to-converter link is left to the decoder's `pad-added` signal.
    pub fn build(path: &Path, config: &PlayerConfig) -> Result<Self> {
        let location = path
            .to_str()
            .with_context(|| format!("media path is not valid UTF-8: {path:?}"))?;

        let source = make_element("filesrc", SOURCE_NAME)?;
        let decoder = make_element("decodebin", DECODER_NAME)?;
        let converter = make_element("audioconvert", CONVERTER_NAME)?;
        let resampler = make_element("audioresample", RESAMPLER_NAME)?;
        let sink = make_element(&config.audio_sink, SINK_NAME)?;

        let pipeline = gst::Pipeline::with_name(PIPELINE_NAME);
        pipeline
            .add_many([&source, &decoder, &converter, &resampler, &sink])
            .context("add elements to pipeline")?;

        gst::Element::link_many([&converter, &resampler, &sink])
            .context("Elements could not be linked")?;
        source
            .link(&decoder)
            .context("source could not be linked to decoder")?;

        source.set_property("location", location);

        let converter_weak = converter.downgrade();
        decoder.connect_pad_added(move |src, new_pad| {
            let Some(converter) = converter_weak.upgrade() else {
                return;
            };
            pad::link_discovered_pad(src, new_pad, &converter);
        });

        tracing::debug!(path = %path.display(), sink = %config.audio_sink, "pipeline assembled");

        Ok(Self {
            pipeline,
            source,
            decoder,
            converter,
            resampler,
            sink,
        })
    }

    pub fn pipeline(&self) -> &gst::Pipeline {
        &self.pipeline
    }

    /// Stages in acquisition order: source, decoder, converter, resampler, sink.
    pub fn stages(&self) -> [&gst::Element; 5] {
        [
            &self.source,
            &self.decoder,
            &self.converter,
            &self.resampler,
            &self.sink,
        ]
    }

    pub fn start(&self) -> Result<()> {
        self.pipeline
            .set_state(gst::State::Playing)
            .context("Unable to set the pipeline to the playing state")?;
        Ok(())
    }

    /// Backend that drives this pipeline from the controller.
    pub fn backend(&self) -> GstBackend {
        GstBackend::new(self.pipeline.clone())
    }

    /// Return the pipeline to `Null`, releasing devices and streaming threads.
    fn shutdown(&self) {
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            tracing::warn!("Unable to set the pipeline to the null state: {e}");
        }
    }
}

impl Drop for TrickPlayPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// [`PlaybackBackend`] over a live pipeline.
pub struct GstBackend {
    pipeline: gst::Pipeline,
    sink: OnceCell<gst::Element>,
}

impl GstBackend {
    pub fn new(pipeline: gst::Pipeline) -> Self {
        Self {
            pipeline,
            sink: OnceCell::new(),
        }
    }

    /// The sink that receives seek and step events, resolved once.
    fn sink(&self) -> Result<&gst::Element> {
        if let Some(sink) = self.sink.get() {
            return Ok(sink);
        }
        let sink = self
            .pipeline
            .by_name(SINK_NAME)
            .with_context(|| format!("pipeline has no element named '{SINK_NAME}'"))?;
        Ok(self.sink.get_or_init(|| sink))
    }

    fn send_event(&self, event: gst::Event) -> Result<()> {
        let sink = self.sink()?;
        if sink.send_event(event) {
            Ok(())
        } else {
            Err(anyhow!("{} did not handle the event", sink.name()))
        }
    }
}

impl PlaybackBackend for GstBackend {
    fn set_playing(&self, playing: bool) -> Result<()> {
        let state = if playing {
            gst::State::Playing
        } else {
            gst::State::Paused
        };
        self.pipeline
            .set_state(state)
            .with_context(|| format!("set pipeline state to {state:?}"))?;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        let (_, current, _) = self.pipeline.state(gst::ClockTime::NONE);
        current == gst::State::Playing
    }

    fn position(&self) -> Option<gst::ClockTime> {
        self.pipeline.query_position::<gst::ClockTime>()
    }

    fn send_seek(&self, request: &SeekRequest) -> Result<()> {
        self.send_event(request.to_event())
    }

    fn send_step(&self, request: &StepRequest) -> Result<()> {
        self.send_event(request.to_event())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sink_factory_fails_assembly() {
        gst::init().expect("init gstreamer");
        let config = PlayerConfig {
            audio_sink: "no-such-sink-factory".to_string(),
            ..PlayerConfig::default()
        };
        let err = match TrickPlayPipeline::build(Path::new("/tmp/missing.ogg"), &config) {
            Ok(_) => panic!("assembly should fail"),
            Err(e) => e,
        };
        assert!(format!("{err:#}").contains("create"));
    }

    fn raw_audio_pad() -> gst::Pad {
        let templ = gst::PadTemplate::new(
            "src_%u",
            gst::PadDirection::Src,
            gst::PadPresence::Sometimes,
            &gst::Caps::builder("audio/x-raw").build(),
        )
        .expect("pad template");
        gst::Pad::builder_from_template(&templ).name("src_0").build()
    }

    #[test]
    fn decoder_pads_reach_the_converter() {
        gst::init().expect("init gstreamer");
        let config = PlayerConfig {
            audio_sink: "fakesink".to_string(),
            ..PlayerConfig::default()
        };
        let player =
            TrickPlayPipeline::build(Path::new("/tmp/missing.ogg"), &config).expect("assembly");
        let [source, decoder, converter, _, _] = player.stages();
        let converter_sink = converter.static_pad("sink").expect("converter sink pad");

        let pad = raw_audio_pad();
        source.emit_by_name::<()>("pad-added", &[&pad]);
        assert!(!converter_sink.is_linked());

        decoder.emit_by_name::<()>("pad-added", &[&pad]);
        assert!(converter_sink.is_linked());
        assert_eq!(converter_sink.peer().as_ref(), Some(&pad));
    }

    #[test]
    fn backend_resolves_sink_once() {
        gst::init().expect("init gstreamer");
        let pipeline = gst::Pipeline::with_name("resolve-test");
        let sink = gst::ElementFactory::make("fakesink")
            .name(SINK_NAME)
            .build()
            .expect("fakesink");
        pipeline.add(&sink).expect("add sink");

        let backend = GstBackend::new(pipeline.clone());
        let first = backend.sink().expect("sink").clone();
        pipeline.remove(&sink).expect("remove sink");
        let second = backend.sink().expect("cached sink").clone();
        assert_eq!(first, second);
    }

    #[test]
    fn backend_without_sink_reports_error() {
        gst::init().expect("init gstreamer");
        let backend = GstBackend::new(gst::Pipeline::with_name("empty-test"));
        assert!(backend.sink().is_err());
        assert!(backend.position().is_none());
    }
}
