#![forbid(unsafe_code)]

//! Status lines drawn above the log.

use crate::color::Rgb;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Label {
    text: String,
    color: Rgb,
    dirty: bool,
}

/// Ordered header labels with per-label dirty tracking.
#[derive(Debug, Clone, Default)]
pub struct HeaderLabels {
    labels: Vec<Label>,
}

impl HeaderLabels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label, returning its row.
    pub fn push(&mut self, text: impl Into<String>, color: Rgb) -> usize {
        self.labels.push(Label {
            text: text.into(),
            color,
            dirty: true,
        });
        self.labels.len() - 1
    }

    /// Replace a label's text; marks it dirty only if it changed.
    pub fn set_text(&mut self, row: usize, text: &str) {
        if let Some(label) = self.labels.get_mut(row)
            && label.text != text
        {
            label.text = text.to_owned();
            label.dirty = true;
        }
    }

    pub fn set_color(&mut self, row: usize, color: Rgb) {
        if let Some(label) = self.labels.get_mut(row)
            && label.color != color
        {
            label.color = color;
            label.dirty = true;
        }
    }

    #[must_use]
    pub fn text(&self, row: usize) -> Option<&str> {
        self.labels.get(row).map(|l| l.text.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Mark every label for redraw.
    pub fn invalidate(&mut self) {
        for label in &mut self.labels {
            label.dirty = true;
        }
    }

    /// Labels needing a redraw as `(row, text, color)`, clearing their flags.
    pub fn take_dirty(&mut self) -> Vec<(usize, String, Rgb)> {
        self.labels
            .iter_mut()
            .enumerate()
            .filter(|(_, l)| l.dirty)
            .map(|(row, l)| {
                l.dirty = false;
                (row, l.text.clone(), l.color)
            })
            .collect()
    }
}
