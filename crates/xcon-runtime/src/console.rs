#![forbid(unsafe_code)]

//! The console engine.
//!
//! [`Console`] owns every piece of UI state (editor, history, scrollback,
//! painter) and is driven from a single thread:
//!
//! 1. feed input with [`Console::handle_event`];
//! 2. once per frame call [`Console::pump`] to fold in log lines and
//!    repeat-scroll ticks produced on other threads;
//! 3. call [`Console::paint`] when either returned `true`.
//!
//! Commands typed on the command line run on the [`CommandProcessor`]
//! worker and report back through the logger.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, RwLock};

use xcon_commands::dispatch::help_command;
use xcon_commands::{CommandDispatcher, CommandEntry, CommandRegistry, RegistryError};
use xcon_core::{HistoryCache, LogSink};
use xcon_render::{
    ConsoleView, HeaderLabels, LineColorizer, RedrawPlan, RenderContext, ScrollWindow, Surface,
    ViewStyle,
};
use xcon_text::{Clipboard, ClipboardError, LineEditor, MemoryClipboard};

use crate::command_queue::{CommandProcessor, ShutdownError};
use crate::config::ConsoleConfig;
use crate::input::{InputEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers};
use crate::logger::{ChannelLogger, LogEvent, Logger};
use crate::repeat_scroll::{
    RepeatScrollController, RepeatState, RepeatTick, ScrollDirection, ScrollTarget,
    ThreadRepeatTimer,
};

/// Cross-thread notification drained by [`Console::pump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleMsg {
    Log(LogEvent),
    Repeat(RepeatTick),
}

/// Scroll window that moves `step` lines per repeat step.
struct Paged<'a> {
    window: &'a mut ScrollWindow,
    step: usize,
}

impl ScrollTarget for Paged<'_> {
    fn scroll_step(&mut self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Up => self.window.scroll_up(self.step),
            ScrollDirection::Down => self.window.scroll_down(self.step),
        }
    }
}

/// Interactive console state and its input/output plumbing.
pub struct Console {
    config: ConsoleConfig,
    editor: LineEditor,
    history: HistoryCache,
    window: ScrollWindow,
    view: ConsoleView,
    labels: HeaderLabels,
    repeat: RepeatScrollController<ThreadRepeatTimer<ConsoleMsg>>,
    registry: Arc<RwLock<CommandRegistry>>,
    processor: CommandProcessor,
    logger: Arc<dyn Logger>,
    log_rx: Receiver<LogEvent>,
    clipboard: Box<dyn Clipboard + Send>,
    tx: Sender<ConsoleMsg>,
    rx: Receiver<ConsoleMsg>,
}

impl Console {
    /// Console with an in-memory logger and clipboard.
    pub fn new(config: ConsoleConfig) -> io::Result<Self> {
        Self::with_parts(
            config,
            Arc::new(ChannelLogger::new()),
            Box::new(MemoryClipboard::new()),
        )
    }

    /// Console over an existing logger and a platform clipboard.
    ///
    /// Lines the logger already holds are counted but not shown. Fails with
    /// [`io::ErrorKind::InvalidInput`] when `config` does not validate.
    pub fn with_parts(
        config: ConsoleConfig,
        logger: Arc<dyn Logger>,
        clipboard: Box<dyn Clipboard + Send>,
    ) -> io::Result<Self> {
        config
            .validate()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        let mut registry = CommandRegistry::new();
        registry
            .add(help_command())
            .map_err(|e| io::Error::other(e.to_string()))?;
        let registry = Arc::new(RwLock::new(registry));

        let sink: Arc<dyn LogSink> = Arc::new(Arc::clone(&logger));
        let dispatcher = CommandDispatcher::new(Arc::clone(&registry), sink)
            .with_prefixes(config.prefixes.clone());
        let processor = CommandProcessor::with_dispatcher(dispatcher, config.queue_capacity)?;

        let (line_count, log_rx) = logger.subscribe_with_count();
        let mut window = ScrollWindow::with_capacity(config.log_capacity);
        window.attach(line_count);

        let (tx, rx) = mpsc::channel();
        let timer = ThreadRepeatTimer::new(tx.clone(), ConsoleMsg::Repeat);
        let repeat = RepeatScrollController::new(&config.scroll_repeat, timer);

        let view = ConsoleView::new(ViewStyle {
            prompt: config.prompt.clone(),
            show_counter: config.show_counter,
            ..ViewStyle::default()
        });

        tracing::debug!(
            log_capacity = config.log_capacity,
            history_capacity = config.history_capacity,
            "console created"
        );
        Ok(Self {
            history: HistoryCache::with_capacity(config.history_capacity),
            editor: LineEditor::new(),
            window,
            view,
            labels: HeaderLabels::new(),
            repeat,
            registry,
            processor,
            logger,
            log_rx,
            clipboard,
            tx,
            rx,
            config,
        })
    }

    /// Replace the log line colorizer.
    #[must_use]
    pub fn with_colorizer(mut self, colorizer: impl LineColorizer + 'static) -> Self {
        self.view = std::mem::take(&mut self.view).with_colorizer(colorizer);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.editor
    }

    #[must_use]
    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    #[must_use]
    pub fn window(&self) -> &ScrollWindow {
        &self.window
    }

    pub fn labels_mut(&mut self) -> &mut HeaderLabels {
        &mut self.labels
    }

    #[must_use]
    pub fn repeat_state(&self) -> RepeatState {
        self.repeat.state()
    }

    #[must_use]
    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<RwLock<CommandRegistry>> {
        &self.registry
    }

    /// Sender for injecting messages from other threads.
    #[must_use]
    pub fn sender(&self) -> Sender<ConsoleMsg> {
        self.tx.clone()
    }

    pub fn add_command(&self, entry: CommandEntry) -> Result<(), RegistryError> {
        self.registry.write().unwrap().add(entry)
    }

    pub fn remove_command(&self, name: &str) -> Result<CommandEntry, RegistryError> {
        self.registry.write().unwrap().remove(name)
    }

    /// Log a line through the console's logger.
    pub fn log(&self, line: &str) {
        self.logger.log(line);
    }

    pub fn clear_log(&self) {
        self.logger.clear();
    }

    /// Queue a command line as if it had been typed.
    ///
    /// Rejections are reported on the log.
    pub fn submit(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.history.push(line);
        if let Err(err) = self.processor.submit(line) {
            tracing::warn!(error = %err, command = line, "command rejected");
            self.logger
                .log(&format!("{}{err}", self.config.prefixes.unknown_command));
        }
    }

    /// Drain pending log events and ticks. Returns whether a repaint is due.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.log_rx.try_recv() {
            changed |= self.apply_log(event);
        }
        while let Ok(msg) = self.rx.try_recv() {
            changed |= match msg {
                ConsoleMsg::Log(event) => self.apply_log(event),
                ConsoleMsg::Repeat(tick) => {
                    let mut target = Paged {
                        window: &mut self.window,
                        step: self.config.page_step,
                    };
                    self.repeat.on_tick(tick, &mut target)
                }
            };
        }
        changed
    }

    fn apply_log(&mut self, event: LogEvent) -> bool {
        match event {
            LogEvent::Message(line) => {
                self.window.push_line(line);
            }
            LogEvent::Cleared => {
                self.window.clear();
                self.view.invalidate();
            }
        }
        true
    }

    /// Apply one input event. Returns whether a repaint is due.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Wheel(delta) => self.wheel(delta),
            InputEvent::Paste(text) => {
                self.editor.insert(&text.replace(['\r', '\n'], " "));
                true
            }
        }
    }

    /// Scroll by one wheel notch per unit of `delta`; positive scrolls up.
    pub fn wheel(&mut self, delta: i32) -> bool {
        let lines = self.config.wheel_lines;
        match delta.signum() {
            1 => self.window.scroll_up(lines),
            -1 => self.window.scroll_down(lines),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return match key.code {
                KeyCode::PageUp | KeyCode::PageDown => {
                    self.repeat.end_scroll();
                    true
                }
                _ => false,
            };
        }
        let ctrl = key.ctrl();
        let shift = key.shift();
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                // Holding Tab must not cycle through every command.
                if key.kind == KeyEventKind::Repeat {
                    return false;
                }
                self.complete(shift || key.code == KeyCode::BackTab)
            }
            KeyCode::Up => self.history_prev(),
            KeyCode::Down => match self.history.next() {
                Some(cmd) => {
                    self.editor.set_text(cmd);
                    true
                }
                None => false,
            },
            KeyCode::Left => {
                self.editor.move_left(shift, ctrl);
                true
            }
            KeyCode::Right => {
                self.editor.move_right(shift, ctrl);
                true
            }
            KeyCode::Home => {
                self.editor.home(shift);
                true
            }
            KeyCode::End => {
                self.editor.end(shift);
                true
            }
            KeyCode::PageUp | KeyCode::PageDown => {
                let mut target = Paged {
                    window: &mut self.window,
                    step: self.config.page_step,
                };
                if key.code == KeyCode::PageUp {
                    self.repeat.begin_up(&mut target)
                } else {
                    self.repeat.begin_down(&mut target)
                }
            }
            KeyCode::Enter => {
                let line = self.editor.text().to_owned();
                self.editor.reset();
                self.submit(&line);
                true
            }
            KeyCode::Escape => {
                self.editor.reset_selection();
                true
            }
            KeyCode::Backspace => self.editor.backspace(ctrl),
            KeyCode::Delete => self.editor.delete(ctrl),
            KeyCode::Insert => {
                self.editor.toggle_edit_mode();
                true
            }
            KeyCode::Char(c) if ctrl => self.shortcut(c),
            KeyCode::Char(_) if key.modifiers.intersects(Modifiers::ALT | Modifiers::SUPER) => {
                false
            }
            KeyCode::Char(c) => {
                self.editor.insert_char(c);
                true
            }
        }
    }

    fn complete(&mut self, backward: bool) -> bool {
        let registry = self.registry.read().unwrap();
        if registry.is_empty() {
            return false;
        }
        let input = self.editor.text().trim();
        let found = if backward {
            registry.find_prev(input)
        } else {
            registry.find_next(input)
        };
        drop(registry);
        self.editor.set_text(found);
        true
    }

    fn history_prev(&mut self) -> bool {
        let cmd = if self.editor.is_empty() {
            self.history.reset();
            self.history.current()
        } else {
            self.history.prev()
        };
        match cmd {
            Some(cmd) => {
                let cmd = cmd.to_owned();
                self.editor.set_text(cmd);
                true
            }
            None => false,
        }
    }

    fn shortcut(&mut self, c: char) -> bool {
        let result = match c.to_ascii_lowercase() {
            'a' => {
                self.editor.select_all();
                Ok(true)
            }
            'c' => self.editor.copy(self.clipboard.as_mut()),
            'x' => self.editor.cut(self.clipboard.as_mut()),
            'v' => self.editor.paste(self.clipboard.as_mut()),
            _ => Ok(false),
        };
        result.unwrap_or_else(|err: ClipboardError| {
            tracing::warn!(error = %err, "clipboard operation failed");
            false
        })
    }

    /// Paint a frame onto `surface` and return the log plan applied.
    pub fn paint(&mut self, surface: &mut dyn Surface) -> io::Result<RedrawPlan> {
        let mut ctx = RenderContext::acquire(surface);
        self.view
            .paint(&mut ctx, &self.window, &mut self.labels, &self.editor)
    }

    /// Stop scrolling and shut the command worker down.
    ///
    /// Returns the number of commands that were cancelled.
    pub fn shutdown(&mut self) -> Result<usize, ShutdownError> {
        self.repeat.end_scroll();
        self.processor.shutdown(self.config.shutdown_timeout)
    }
}
