#![forbid(unsafe_code)]

//! Commands registered by the demo.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use xcon::{Accessor, Console, LogSink, RegistryError, kinds};

/// Line prefixes cycled by `flood`, one per colour.
const MARKERS: [char; 13] = ['-', '!', '~', '#', '$', '%', '&', '+', '/', '=', '^', '*', ' '];

/// Settings the demo commands read and write.
#[derive(Debug)]
pub struct DemoState {
    pub quit: AtomicBool,
    pub vsync: Arc<Mutex<bool>>,
    pub fov: Arc<Mutex<i32>>,
    pub sensitivity: Arc<Mutex<f32>>,
    pub player: Arc<Mutex<String>>,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            quit: AtomicBool::new(false),
            vsync: Arc::new(Mutex::new(true)),
            fov: Arc::new(Mutex::new(90)),
            sensitivity: Arc::new(Mutex::new(1.5)),
            player: Arc::new(Mutex::new("player".into())),
        }
    }
}

impl DemoState {
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }
}

pub fn register(console: &Console, state: &Arc<DemoState>) -> Result<(), RegistryError> {
    let quit = Arc::clone(state);
    console.add_command(kinds::function("quit", "leave the demo", move || {
        quit.quit.store(true, Ordering::Relaxed);
    }))?;

    let logger = console.logger();
    console.add_command(kinds::function("clear", "clear the log", move || {
        logger.clear();
    }))?;

    let logger = console.logger();
    console.add_command(kinds::string_func("echo", "print text", 255, move |text| {
        logger.log(text);
    }))?;

    let logger = console.logger();
    console.add_command(kinds::int_func(
        "flood",
        "log numbered lines to fill the scrollback",
        1,
        10_000,
        move |n| {
            for (i, m) in (0..n).zip(MARKERS.iter().cycle()) {
                logger.log(&format!("{m} line {i}"));
            }
        },
    ))?;

    console.add_command(kinds::bool_var(
        "vsync",
        "wait for vertical blank",
        Accessor::shared(Arc::clone(&state.vsync)),
    ))?;
    console.add_command(kinds::int_var(
        "fov",
        "field of view in degrees",
        Accessor::shared(Arc::clone(&state.fov)),
        60,
        120,
    ))?;
    console.add_command(kinds::float_var(
        "sensitivity",
        "mouse sensitivity",
        Accessor::shared(Arc::clone(&state.sensitivity)),
        0.1,
        10.0,
    ))?;
    console.add_command(kinds::string_var(
        "name",
        "player name",
        Accessor::shared(Arc::clone(&state.player)),
        32,
    ))?;
    Ok(())
}
