#![forbid(unsafe_code)]

//! Scrollback windowing, incremental redraw planning, and console painting.

pub mod color;
pub mod labels;
pub mod range;
pub mod redraw;
pub mod scroll;
pub mod surface;
pub mod view;

pub use color::{LineColorizer, PrefixColorizer, Rgb};
pub use labels::HeaderLabels;
pub use range::LineRange;
pub use redraw::{RedrawOp, RedrawPlan, RedrawPlanner};
pub use scroll::ScrollWindow;
pub use surface::{Rect, RenderContext, Surface};
pub use view::{ConsoleView, ViewStyle};
