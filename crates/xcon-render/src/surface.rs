#![forbid(unsafe_code)]

//! Drawing surface seam and the per-frame render context.
//!
//! Coordinates are cells, origin at top-left. One log line is one row.

use std::io;

use unicode_width::UnicodeWidthStr;

use crate::color::Rgb;

/// Axis-aligned cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row `row` of this rectangle as a one-row rectangle.
    #[must_use]
    pub const fn row(&self, row: u16) -> Rect {
        Rect::new(self.x, self.y.saturating_add(row), self.width, 1)
    }
}

/// Platform drawing primitives.
pub trait Surface {
    /// Drawable area.
    fn area(&self) -> Rect;

    /// Width of `text` in cells.
    fn measure_text(&self, text: &str) -> u16 {
        u16::try_from(text.width()).unwrap_or(u16::MAX)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Rgb) -> io::Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> io::Result<()>;

    /// Move the contents of `rect` by `(dx, dy)` cells; uncovered cells are
    /// left for the caller to repaint.
    fn scroll_region(&mut self, rect: Rect, dx: i32, dy: i32) -> io::Result<()>;

    /// Show the text caret at a cell.
    fn place_caret(&mut self, x: u16, y: u16, overwrite: bool) -> io::Result<()> {
        let glyph = if overwrite { "\u{2588}" } else { "_" };
        self.draw_text(x, y, glyph, Rgb::WHITE)
    }

    /// Called when a render context is acquired.
    fn begin_frame(&mut self) {}

    /// Called when a render context is released.
    fn end_frame(&mut self) {}
}

/// Scoped access to a surface for one frame.
///
/// Acquiring calls [`Surface::begin_frame`]; dropping calls
/// [`Surface::end_frame`].
pub struct RenderContext<'a> {
    surface: &'a mut dyn Surface,
    area: Rect,
}

impl<'a> RenderContext<'a> {
    pub fn acquire(surface: &'a mut dyn Surface) -> Self {
        surface.begin_frame();
        let area = surface.area();
        Self { surface, area }
    }

    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    #[must_use]
    pub fn measure_text(&self, text: &str) -> u16 {
        self.surface.measure_text(text)
    }

    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Rgb) -> io::Result<()> {
        self.surface.draw_text(x, y, text, color)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) -> io::Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        self.surface.fill_rect(rect, color)
    }

    pub fn scroll_region(&mut self, rect: Rect, dx: i32, dy: i32) -> io::Result<()> {
        self.surface.scroll_region(rect, dx, dy)
    }

    pub fn place_caret(&mut self, x: u16, y: u16, overwrite: bool) -> io::Result<()> {
        self.surface.place_caret(x, y, overwrite)
    }
}

impl Drop for RenderContext<'_> {
    fn drop(&mut self) {
        self.surface.end_frame();
    }
}
