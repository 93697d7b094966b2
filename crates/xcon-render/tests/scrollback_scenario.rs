//! End-to-end scrollback scenarios: eviction, windowing, and redraw plans.

use proptest::prelude::*;
use xcon_render::{LineRange, RedrawOp, RedrawPlanner, ScrollWindow};

fn filled(capacity: usize, lines: usize) -> ScrollWindow {
    let mut w = ScrollWindow::with_capacity(capacity);
    for i in 0..lines {
        w.push_line(format!("line {i}"));
    }
    w
}

#[test]
fn overflowing_capacity_keeps_newest_lines() {
    let w = filled(256, 300);
    assert_eq!(w.total_line_count(), 300);
    assert_eq!(w.newest_visible(), Some(299));
    assert_eq!(w.visible_range(10), LineRange::new(290, 300));
    assert_eq!(w.first_buffered(), 44);
    assert_eq!(w.line(44), Some("line 44"));
    assert_eq!(w.line(43), None);
    assert_eq!(w.line(299), Some("line 299"));
    assert_eq!(w.line(300), None);
}

#[test]
fn tail_following_shifts_one_line_per_append() {
    let mut w = filled(64, 20);
    let mut planner = RedrawPlanner::new();
    let first = planner.plan(w.visible_range(10), 10);
    assert_eq!(first.drawn_lines(), (10..20).collect::<Vec<_>>());

    w.push_line("line 20");
    let plan = planner.plan(w.visible_range(10), 10);
    assert_eq!(plan.shift_count(), 1);
    assert_eq!(plan.drawn_lines(), vec![20]);
    assert!(plan.iter().any(|op| matches!(
        op,
        RedrawOp::Shift { delta: -1, .. }
    )));
}

#[test]
fn scroll_up_then_back_down_round_trips() {
    let mut w = filled(64, 40);
    let mut planner = RedrawPlanner::new();
    let _ = planner.plan(w.visible_range(10), 10);

    assert!(w.scroll_up(3));
    let up = planner.plan(w.visible_range(10), 10);
    assert_eq!(up.drawn_lines(), vec![27, 28, 29]);

    assert!(w.scroll_to_bottom());
    let down = planner.plan(w.visible_range(10), 10);
    assert_eq!(down.drawn_lines(), vec![37, 38, 39]);
    assert_eq!(planner.rendered(), LineRange::new(30, 40));
}

#[test]
fn paging_past_the_buffer_forces_full_redraw() {
    let mut w = filled(64, 64);
    let mut planner = RedrawPlanner::new();
    let _ = planner.plan(w.visible_range(10), 10);
    assert!(w.scroll_up(30));
    let plan = planner.plan(w.visible_range(10), 10);
    assert_eq!(plan.shift_count(), 0);
    assert_eq!(plan.drawn_lines(), (24..34).collect::<Vec<_>>());
}

proptest! {
    /// Replaying any plan over a model of the screen yields exactly the
    /// required lines on the required rows.
    #[test]
    fn plans_reproduce_the_required_window(
        steps in proptest::collection::vec((0usize..4, 0usize..6), 1..40),
        rows in 1u16..12,
    ) {
        let mut w = ScrollWindow::with_capacity(24);
        let mut planner = RedrawPlanner::new();
        let mut screen: Vec<Option<usize>> = vec![None; rows as usize];
        let mut next = 0;

        for (action, n) in steps {
            match action {
                0 | 1 => {
                    for _ in 0..n {
                        w.push_line(format!("line {next}"));
                        next += 1;
                    }
                }
                2 => { w.scroll_up(n); }
                _ => { w.scroll_down(n); }
            }
            let required = w.visible_range(rows as usize);
            let plan = planner.plan(required, rows);
            for op in &plan {
                match op {
                    RedrawOp::Clear { rows: r } => {
                        for row in r.clone() {
                            screen[row as usize] = None;
                        }
                    }
                    RedrawOp::Shift { delta, .. } => {
                        let mut shifted = vec![None; rows as usize];
                        for (row, cell) in screen.iter().enumerate() {
                            let to = row as i64 + i64::from(*delta);
                            if (0..i64::from(rows)).contains(&to) {
                                shifted[to as usize] = *cell;
                            }
                        }
                        screen = shifted;
                    }
                    RedrawOp::Draw { index, row } => screen[*row as usize] = Some(*index),
                }
            }

            let offset = rows as usize - required.len();
            for (row, cell) in screen.iter().enumerate() {
                let expected = row.checked_sub(offset).map(|i| required.min + i);
                prop_assert_eq!(*cell, expected, "row {} for {}", row, required);
            }
        }
    }
}
