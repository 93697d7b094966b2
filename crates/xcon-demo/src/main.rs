#![forbid(unsafe_code)]

//! xcon demo binary entry point.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self as ct, Event};
use crossterm::terminal;
use xcon::{Console, ConsoleConfig, Rgb};
use xcon_demo::cli::Opts;
use xcon_demo::commands::{self, DemoState};
use xcon_demo::event::convert;
use xcon_demo::logging;
use xcon_demo::terminal::{TerminalModes, TerminalSurface};

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let opts = Opts::parse();
    if let Err(err) = logging::init(Path::new(&opts.log_file)) {
        eprintln!("Diagnostics disabled: {err}");
    }
    if let Err(err) = run(&opts) {
        eprintln!("Runtime error: {err}");
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> xcon::Result<()> {
    let config = ConsoleConfig::from_env()?;
    let mut console = Console::new(config)?;
    let state = Arc::new(DemoState::default());
    commands::register(&console, &state)?;
    console
        .labels_mut()
        .push("xcon demo: type 'help' and press Enter", Rgb::LIGHT_YELLOW);
    console.log("- Welcome. Esc quits, PageUp/PageDown scroll.");

    let modes = TerminalModes::enable(opts.mouse)?;
    let releases = modes.reports_releases();
    let (width, height) = terminal::size()?;
    let mut surface = TerminalSurface::new(std::io::stdout(), width, height);
    let started = Instant::now();
    let mut dirty = true;

    tracing::info!(width, height, releases, "demo started");
    loop {
        if state.should_quit() {
            break;
        }
        if opts.exit_after_ms > 0 && started.elapsed() >= Duration::from_millis(opts.exit_after_ms)
        {
            break;
        }
        if ct::poll(FRAME)? {
            match ct::read()? {
                Event::Resize(w, h) => {
                    surface.resize(w, h);
                    dirty = true;
                }
                Event::Key(key)
                    if key.code == ct::KeyCode::Esc && key.kind == ct::KeyEventKind::Press =>
                {
                    break;
                }
                event => {
                    for input in convert(event, releases) {
                        dirty |= console.handle_event(input);
                    }
                }
            }
        }
        dirty |= console.pump();
        if dirty {
            console.paint(&mut surface)?;
            dirty = false;
        }
    }

    drop(modes);
    let cancelled = console.shutdown()?;
    tracing::info!(cancelled, "demo stopped");
    Ok(())
}
