#![forbid(unsafe_code)]

//! Terminal session and the crossterm-backed drawing surface.

use std::io::{self, Write};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, ScrollDown, ScrollUp,
    supports_keyboard_enhancement,
};
use crossterm::{ExecutableCommand, QueueableCommand, cursor};
use xcon::{Rect, Rgb, Surface};

/// Terminal modes enabled for the session; restored on drop.
#[derive(Debug, Default)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
    mouse_capture: bool,
    bracketed_paste: bool,
    keyboard_enhancement: bool,
}

impl TerminalModes {
    /// Enter raw mode and the alternate screen. Mouse capture, bracketed
    /// paste, and key release reporting are enabled when available.
    pub fn enable(mouse: bool) -> io::Result<Self> {
        let mut modes = Self::default();
        terminal::enable_raw_mode()?;
        modes.raw_mode = true;

        let mut out = io::stdout();
        if let Err(err) = out.execute(EnterAlternateScreen) {
            modes.restore();
            return Err(err);
        }
        modes.alternate_screen = true;
        let _ = out.execute(cursor::Hide);

        match supports_keyboard_enhancement() {
            Ok(true) => {
                let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
                match out.execute(PushKeyboardEnhancementFlags(flags)) {
                    Ok(_) => modes.keyboard_enhancement = true,
                    Err(err) => tracing::warn!(error = %err, "keyboard enhancement failed"),
                }
            }
            Ok(false) => tracing::info!("terminal does not report key releases"),
            Err(err) => tracing::warn!(error = %err, "keyboard enhancement query failed"),
        }
        if mouse {
            match out.execute(EnableMouseCapture) {
                Ok(_) => modes.mouse_capture = true,
                Err(err) => tracing::warn!(error = %err, "mouse capture failed"),
            }
        }
        match out.execute(EnableBracketedPaste) {
            Ok(_) => modes.bracketed_paste = true,
            Err(err) => tracing::warn!(error = %err, "bracketed paste failed"),
        }
        tracing::debug!(?modes, "terminal modes enabled");
        Ok(modes)
    }

    /// Whether key release events will be delivered.
    #[must_use]
    pub fn reports_releases(&self) -> bool {
        self.keyboard_enhancement
    }

    pub fn restore(&mut self) {
        let mut out = io::stdout();
        if self.bracketed_paste {
            let _ = out.execute(DisableBracketedPaste);
            self.bracketed_paste = false;
        }
        if self.mouse_capture {
            let _ = out.execute(DisableMouseCapture);
            self.mouse_capture = false;
        }
        if self.keyboard_enhancement {
            let _ = out.execute(PopKeyboardEnhancementFlags);
            self.keyboard_enhancement = false;
        }
        if self.alternate_screen {
            let _ = out.execute(cursor::Show);
            let _ = out.execute(LeaveAlternateScreen);
            self.alternate_screen = false;
        }
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
            self.raw_mode = false;
        }
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.restore();
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// [`Surface`] that queues crossterm commands and flushes at frame end.
pub struct TerminalSurface<W: Write> {
    out: W,
    area: Rect,
    background: Rgb,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            area: Rect::new(0, 0, width, height),
            background: Rgb::BLACK,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn area(&self) -> Rect {
        self.area
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgb) -> io::Result<()> {
        self.out
            .queue(cursor::MoveTo(x, y))?
            .queue(SetForegroundColor(color(fg)))?
            .queue(SetBackgroundColor(color(self.background)))?
            .queue(Print(text))?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, bg: Rgb) -> io::Result<()> {
        let blank = " ".repeat(usize::from(rect.width));
        self.out.queue(SetBackgroundColor(color(bg)))?;
        for y in rect.y..rect.bottom() {
            self.out.queue(cursor::MoveTo(rect.x, y))?.queue(Print(&blank))?;
        }
        Ok(())
    }

    fn scroll_region(&mut self, rect: Rect, _dx: i32, dy: i32) -> io::Result<()> {
        if dy == 0 || rect.is_empty() {
            return Ok(());
        }
        // DECSTBM rows are 1-based and inclusive.
        let set_margins = format!("\x1b[{};{}r", rect.y + 1, rect.bottom());
        self.out.queue(Print(set_margins))?;
        let n = u16::try_from(dy.unsigned_abs()).unwrap_or(u16::MAX);
        if dy < 0 {
            self.out.queue(ScrollUp(n))?;
        } else {
            self.out.queue(ScrollDown(n))?;
        }
        self.out.queue(Print("\x1b[r"))?;
        Ok(())
    }

    fn end_frame(&mut self) {
        let flushed = self.out.queue(ResetColor).and_then(|out| out.flush());
        if let Err(err) = flushed {
            tracing::warn!(error = %err, "frame flush failed");
        }
    }
}
