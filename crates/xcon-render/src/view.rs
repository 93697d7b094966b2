#![forbid(unsafe_code)]

//! Console painter: header labels, log viewport, and command line.
//!
//! The area is split top to bottom into header rows (one per label), the
//! log viewport, and a single input row. The log viewport is repainted
//! through a [`RedrawPlanner`], so a frame where nothing scrolled costs no
//! log drawing at all.

use std::io;

use unicode_width::UnicodeWidthChar;
use xcon_text::{EditMode, LineEditor};

use crate::color::{LineColorizer, PrefixColorizer, Rgb};
use crate::labels::HeaderLabels;
use crate::redraw::{RedrawOp, RedrawPlan, RedrawPlanner};
use crate::scroll::ScrollWindow;
use crate::surface::{Rect, RenderContext};

/// Colours and prompt of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStyle {
    pub background: Rgb,
    pub text: Rgb,
    pub selection: Rgb,
    pub counter: Rgb,
    pub prompt: String,
    /// Show `[line/total]` at the right of the input row.
    pub show_counter: bool,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            text: Rgb::WHITE,
            selection: Rgb::DARK_GRAY,
            counter: Rgb::DARK_GRAY,
            prompt: ">>> ".into(),
            show_counter: true,
        }
    }
}

/// Regions of the console area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub header: Rect,
    pub log: Rect,
    pub input: Rect,
}

/// Longest prefix of `text` that fits in `max_cols` cells.
fn clip(text: &str, max_cols: usize) -> &str {
    let mut cols = 0;
    for (i, c) in text.char_indices() {
        cols += c.width().unwrap_or(0);
        if cols > max_cols {
            return &text[..i];
        }
    }
    text
}

/// `text` without its first `n` chars.
fn skip_chars(text: &str, n: usize) -> &str {
    text.char_indices().nth(n).map_or("", |(i, _)| &text[i..])
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Paints console state onto a [`RenderContext`].
pub struct ConsoleView {
    planner: RedrawPlanner,
    colorizer: Box<dyn LineColorizer>,
    style: ViewStyle,
    last_area: Option<Rect>,
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new(ViewStyle::default())
    }
}

impl ConsoleView {
    #[must_use]
    pub fn new(style: ViewStyle) -> Self {
        Self {
            planner: RedrawPlanner::new(),
            colorizer: Box::new(PrefixColorizer),
            style,
            last_area: None,
        }
    }

    #[must_use]
    pub fn with_colorizer(mut self, colorizer: impl LineColorizer + 'static) -> Self {
        self.colorizer = Box::new(colorizer);
        self
    }

    #[must_use]
    pub fn style(&self) -> &ViewStyle {
        &self.style
    }

    /// Repaint the whole log on the next frame.
    pub fn invalidate(&mut self) {
        self.planner.invalidate();
    }

    #[must_use]
    pub fn layout(area: Rect, header_rows: usize) -> Layout {
        let header_h = to_u16(header_rows).min(area.height.saturating_sub(1));
        let input_h = area.height.min(1);
        let log_h = area.height - header_h - input_h;
        Layout {
            header: Rect::new(area.x, area.y, area.width, header_h),
            log: Rect::new(area.x, area.y + header_h, area.width, log_h),
            input: Rect::new(area.x, area.y + header_h + log_h, area.width, input_h),
        }
    }

    /// Paint one frame and return the log plan that was applied.
    pub fn paint(
        &mut self,
        ctx: &mut RenderContext<'_>,
        window: &ScrollWindow,
        labels: &mut HeaderLabels,
        editor: &LineEditor,
    ) -> io::Result<RedrawPlan> {
        let area = ctx.area();
        let bg = self.style.background;
        if self.last_area != Some(area) {
            self.last_area = Some(area);
            self.planner.invalidate();
            labels.invalidate();
            ctx.fill_rect(area, bg)?;
        }
        let layout = Self::layout(area, labels.len());

        for (row, text, color) in labels.take_dirty() {
            let row = to_u16(row);
            if row >= layout.header.height {
                continue;
            }
            let r = layout.header.row(row);
            ctx.fill_rect(r, bg)?;
            ctx.draw_text(r.x, r.y, clip(&text, usize::from(r.width)), color)?;
        }

        let log = layout.log;
        let required = window.visible_range(usize::from(log.height));
        let plan = self.planner.plan(required, log.height);
        for op in &plan {
            match op {
                RedrawOp::Clear { rows } => {
                    let r = Rect::new(log.x, log.y + rows.start, log.width, rows.end - rows.start);
                    ctx.fill_rect(r, bg)?;
                }
                RedrawOp::Shift { delta, .. } => ctx.scroll_region(log, 0, *delta)?,
                RedrawOp::Draw { index, row } => {
                    let line = window.line(*index).unwrap_or_default();
                    self.draw_log_line(ctx, log.row(*row), line)?;
                }
            }
        }

        self.paint_input(ctx, layout.input, window, editor)?;
        Ok(plan)
    }

    fn draw_log_line(&self, ctx: &mut RenderContext<'_>, row: Rect, line: &str) -> io::Result<()> {
        let (color, hidden) = self.colorizer.line_color(line);
        let text = clip(skip_chars(line, hidden), usize::from(row.width));
        ctx.draw_text(row.x, row.y, text, color)
    }

    fn paint_input(
        &self,
        ctx: &mut RenderContext<'_>,
        input: Rect,
        window: &ScrollWindow,
        editor: &LineEditor,
    ) -> io::Result<()> {
        if input.is_empty() {
            return Ok(());
        }
        let style = &self.style;
        ctx.fill_rect(input, style.background)?;

        let mut right = input.right();
        if style.show_counter && let Some(newest) = window.newest_visible() {
            let counter = format!("[{}/{}]", newest + 1, window.total_line_count());
            let w = ctx.measure_text(&counter);
            if w < input.width {
                right -= w;
                ctx.draw_text(right, input.y, &counter, style.counter)?;
            }
        }

        let prompt = clip(&style.prompt, usize::from(right - input.x));
        ctx.draw_text(input.x, input.y, prompt, style.text)?;
        let text_x = input.x + ctx.measure_text(prompt);
        let avail = usize::from(right.saturating_sub(text_x));

        let sel = editor.selection();
        if !sel.is_empty() {
            let start = editor.column_at(sel.start).min(avail);
            let end = editor.column_at(sel.end()).min(avail);
            let r = Rect::new(text_x + to_u16(start), input.y, to_u16(end - start), 1);
            ctx.fill_rect(r, style.selection)?;
        }
        ctx.draw_text(text_x, input.y, clip(editor.text(), avail), style.text)?;

        let col = editor.cursor_column();
        if col < avail {
            let overwrite = editor.mode() == EditMode::Overwrite;
            ctx.place_caret(text_x + to_u16(col), input.y, overwrite)?;
        }
        Ok(())
    }
}
