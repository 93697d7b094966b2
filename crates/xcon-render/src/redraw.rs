#![forbid(unsafe_code)]

//! Incremental redraw planning for the log viewport.
//!
//! The planner remembers which line range is currently on screen. Given the
//! range that should be on screen, it emits the smallest set of operations
//! that gets there:
//!
//! - nothing, when the range is unchanged;
//! - when the old and new ranges overlap, one [`RedrawOp::Shift`] of the
//!   overlapping block, clears for the rows it vacated, and draws for the
//!   newly exposed lines only;
//! - otherwise (or after [`RedrawPlanner::invalidate`]) a full clear and a
//!   draw of every line.
//!
//! Rows are viewport-relative and bottom-anchored: the last line of the
//! range sits on the last row. The planner never touches pixels or text;
//! [`ConsoleView`](crate::ConsoleView) maps operations onto a surface.

use std::ops::Range;

use smallvec::SmallVec;

use crate::range::LineRange;

/// One drawing step for the log viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedrawOp {
    /// Blank the viewport rows in `rows`.
    Clear { rows: Range<u16> },
    /// Move the drawn block holding `lines` by `delta` rows (positive moves down).
    Shift { lines: LineRange, delta: i32 },
    /// Draw log line `index` on viewport row `row`.
    Draw { index: usize, row: u16 },
}

/// Ordered operations produced by one planning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedrawPlan {
    ops: SmallVec<[RedrawOp; 8]>,
}

impl RedrawPlan {
    fn clear(&mut self, rows: Range<u16>) {
        if !rows.is_empty() {
            self.ops.push(RedrawOp::Clear { rows });
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RedrawOp> {
        self.ops.iter()
    }

    /// Line indices drawn by this plan, in order.
    #[must_use]
    pub fn drawn_lines(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RedrawOp::Draw { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Number of shift operations.
    #[must_use]
    pub fn shift_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RedrawOp::Shift { .. }))
            .count()
    }
}

impl<'a> IntoIterator for &'a RedrawPlan {
    type Item = &'a RedrawOp;
    type IntoIter = std::slice::Iter<'a, RedrawOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Tracks the rendered line range between frames.
#[derive(Debug, Clone, Default)]
pub struct RedrawPlanner {
    rendered: LineRange,
    rows: u16,
    force: bool,
}

impl RedrawPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Range currently on screen.
    #[must_use]
    pub fn rendered(&self) -> LineRange {
        self.rendered
    }

    /// Make the next plan a full redraw (resize, font change, log cleared).
    pub fn invalidate(&mut self) {
        self.force = true;
    }

    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.force
    }

    /// Plan the transition from the rendered range to `required` in a
    /// viewport `rows` tall, and record `required` as rendered.
    pub fn plan(&mut self, required: LineRange, rows: u16) -> RedrawPlan {
        let _span = tracing::debug_span!("redraw_plan", %required, rows).entered();
        if rows != self.rows {
            self.rows = rows;
            self.force = true;
        }
        let required = if required.len() > usize::from(rows) {
            LineRange::new(required.max - usize::from(rows), required.max)
        } else {
            required
        };

        let mut plan = RedrawPlan::default();
        let unchanged = self.rendered == required || (self.rendered.is_empty() && required.is_empty());
        if !self.force && unchanged {
            return plan;
        }

        let row_of = |index: usize| rows - (required.max - index) as u16;

        if !self.force
            && let Some(kept) = self.rendered.intersect(&required)
            && self.rendered.max != required.max
        {
            let delta = self.rendered.max as i64 - required.max as i64;
            plan.ops.push(RedrawOp::Shift {
                lines: kept,
                delta: delta as i32,
            });
            let above = LineRange::new(required.min, kept.min);
            let below = LineRange::new(kept.max, required.max);
            if !below.is_empty() {
                plan.clear(row_of(kept.max)..rows);
            }
            // Rows above the kept block: vacated by a downward shift, newly
            // exposed, or still showing lines that left the range.
            if delta > 0 || !above.is_empty() || self.rendered.min < kept.min {
                plan.clear(0..row_of(kept.min));
            }
            for index in above.as_range().chain(below.as_range()) {
                plan.ops.push(RedrawOp::Draw {
                    index,
                    row: row_of(index),
                });
            }
            tracing::debug!(delta, drawn = above.len() + below.len(), "incremental redraw");
        } else {
            plan.clear(0..rows);
            for index in required.as_range() {
                plan.ops.push(RedrawOp::Draw {
                    index,
                    row: row_of(index),
                });
            }
            tracing::debug!(drawn = required.len(), forced = self.force, "full redraw");
        }

        self.rendered = required;
        self.force = false;
        plan
    }
}
