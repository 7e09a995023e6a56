//! Pipeline bus watch on the main loop.

use anyhow::{Context, Result};
use gstreamer as gst;
use gstreamer::prelude::*;

/// Watch `pipeline`'s bus; `on_error` receives a description of each error message.
///
/// End of stream is only logged so the user can still reverse or quit. The
/// watch is attached to the thread-default main context and lives as long as
/// the returned guard.
pub fn watch_bus<F>(pipeline: &gst::Pipeline, on_error: F) -> Result<gst::bus::BusWatchGuard>
where
    F: Fn(String) + 'static,
{
    let bus = pipeline.bus().context("pipeline has no bus")?;
    let pipeline_weak = pipeline.downgrade();

    bus.add_watch_local(move |_bus, msg| {
        let pipeline = pipeline_weak.upgrade();
        if let Some(description) = handle_message(msg, pipeline.as_ref()) {
            on_error(description);
        }
        gst::glib::ControlFlow::Continue
    })
    .context("add bus watch")
}

/// Log `msg`; returns a description when it is a fatal error.
fn handle_message(msg: &gst::Message, pipeline: Option<&gst::Pipeline>) -> Option<String> {
    use gst::MessageView;

    match msg.view() {
        MessageView::Error(err) => {
            let description = format!(
                "error from {}: {} ({})",
                err.src()
                    .map(|s| s.path_string().to_string())
                    .unwrap_or_else(|| "unknown element".to_string()),
                err.error(),
                err.debug().map(|d| d.to_string()).unwrap_or_default(),
            );
            tracing::error!("{description}");
            return Some(description);
        }
        MessageView::Warning(warning) => {
            tracing::warn!(
                source = ?warning.src().map(|s| s.path_string()),
                "{}",
                warning.error()
            );
        }
        MessageView::Eos(_) => {
            tracing::info!("end of stream reached; press 'd' to play backwards or 'q' to quit");
        }
        MessageView::StateChanged(state_changed) => {
            let from_pipeline = match (state_changed.src(), pipeline) {
                (Some(src), Some(pipeline)) => src == pipeline.upcast_ref::<gst::Object>(),
                _ => false,
            };
            if from_pipeline {
                tracing::debug!(
                    old = ?state_changed.old(),
                    current = ?state_changed.current(),
                    "pipeline state changed"
                );
            }
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn error_message(pipeline: &gst::Pipeline) -> gst::Message {
        gst::message::Error::builder(gst::CoreError::Failed, "decoder exploded")
            .src(pipeline)
            .build()
    }

    #[test]
    fn only_errors_are_fatal() {
        gst::init().expect("init gstreamer");
        let pipeline = gst::Pipeline::with_name("bus-test");

        let fatal = handle_message(&error_message(&pipeline), Some(&pipeline));
        let description = fatal.expect("error is fatal");
        assert!(description.contains("decoder exploded"));
        assert!(description.contains("bus-test"));

        let eos = gst::message::Eos::new();
        assert_eq!(handle_message(&eos, Some(&pipeline)), None);
        let warning = gst::message::Warning::new(gst::CoreError::Failed, "glitch");
        assert_eq!(handle_message(&warning, Some(&pipeline)), None);
    }

    #[test]
    fn watch_reports_error_once_and_ignores_eos() {
        gst::init().expect("init gstreamer");
        let context = gst::glib::MainContext::new();
        let errors: Rc<RefCell<Vec<String>>> = Rc::default();

        context
            .with_thread_default(|| {
                let pipeline = gst::Pipeline::with_name("watch-test");
                let seen = errors.clone();
                let _guard = watch_bus(&pipeline, move |description| {
                    seen.borrow_mut().push(description);
                })
                .expect("bus watch");

                let bus = pipeline.bus().expect("bus");
                bus.post(gst::message::Eos::new()).expect("post eos");
                bus.post(error_message(&pipeline)).expect("post error");
                bus.post(gst::message::Eos::new()).expect("post eos");

                while context.iteration(false) {}
            })
            .expect("own test context");

        let errors = errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("decoder exploded"));
    }
}
