//! Trick-play runtime.
//!
//! Assembles the pipeline, runs the bus and stdin watches on one main loop, and
//! tears everything down in reverse order once the loop quits.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use gstreamer as gst;
use gstreamer::glib;
use gstreamer::prelude::*;
use trickplay_player::command::USAGE;
use trickplay_player::controller::{Dispatch, TrickPlayController};
use trickplay_player::pipeline::TrickPlayPipeline;
use trickplay_player::{bus, input};

use crate::config::TrickPlayConfig;

/// Process exit status for setup failures and pipeline errors.
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Play `config.path` until the user quits, Ctrl-C, or a pipeline error.
pub fn run(config: TrickPlayConfig, install_ctrlc: bool) -> Result<()> {
    gst::init().context("initialize GStreamer")?;
    println!("{USAGE}");

    let context = glib::MainContext::default();
    let _owner = context.acquire().context("acquire default main context")?;

    let player = TrickPlayPipeline::build(&config.path, &config.player)?;
    for stage in player.stages() {
        tracing::debug!(element = %stage.name(), "stage created");
    }
    let main_loop = glib::MainLoop::new(Some(&context), false);

    let pipeline_error: Rc<RefCell<Option<String>>> = Rc::default();
    let bus_watch = {
        let pipeline_error = pipeline_error.clone();
        let main_loop = main_loop.clone();
        bus::watch_bus(player.pipeline(), move |description| {
            let mut slot = pipeline_error.borrow_mut();
            if slot.is_none() {
                *slot = Some(description);
            }
            main_loop.quit();
        })?
    };

    if install_ctrlc {
        let main_loop = main_loop.clone();
        if let Err(e) = ctrlc::set_handler(move || main_loop.quit()) {
            tracing::warn!("ctrl-c handler not installed: {e}");
        }
    }

    player.start()?;
    tracing::info!(
        path = %config.path.display(),
        rate = %config.player.initial_rate,
        "playing"
    );

    let controller = Rc::new(RefCell::new(TrickPlayController::new(
        player.backend(),
        config.player.initial_rate,
    )));
    let stdin_watch = {
        let controller = controller.clone();
        let main_loop = main_loop.clone();
        input::watch_stdin(move |line| match controller.borrow_mut().handle_line(line) {
            Dispatch::Continue => glib::ControlFlow::Continue,
            Dispatch::Quit => {
                main_loop.quit();
                glib::ControlFlow::Break
            }
        })?
    };

    main_loop.run();

    drop(stdin_watch);
    drop(controller);
    drop(bus_watch);
    drop(player);

    match pipeline_error.take() {
        Some(description) => bail!("pipeline failed: {description}"),
        None => {
            tracing::info!("playback finished");
            Ok(())
        }
    }
}
