#![forbid(unsafe_code)]

//! Press-and-hold scrolling with an accelerating repeat rate.
//!
//! [`RepeatScrollController`] is a three-state machine (idle, scrolling up,
//! scrolling down). Beginning a scroll performs one step immediately and
//! starts a [`RepeatTimer`]; each tick the timer delivers performs another
//! step. The timer walks an [`AccelerationTable`] so the interval between
//! steps shrinks the longer the key is held.
//!
//! Ticks are tagged with a generation number. Ending or restarting a scroll
//! bumps the generation, so ticks already queued in a channel when the key
//! was released are ignored.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use xcon_render::ScrollWindow;

use crate::signal::{StopSignal, StopTrigger};

/// Number of intervals in an acceleration table.
pub const ACCELERATION_STEPS: usize = 16;

/// Direction of one scroll step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward older lines.
    Up,
    /// Toward newer lines.
    Down,
}

/// Timing parameters for repeat scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRepeatConfig {
    /// Delay before the first repeat.
    pub initial: Duration,
    /// Shortest interval the table may reach.
    pub min: Duration,
    /// Time to spend on one interval before moving to the next.
    pub accel_step: Duration,
}

impl Default for ScrollRepeatConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(200),
            min: Duration::from_millis(5),
            accel_step: Duration::from_millis(1),
        }
    }
}

/// Decreasing repeat intervals.
///
/// Entry `i` is `ceil((1 - 0.5 * ln(i + 1)) * initial)` milliseconds. Once
/// the curve drops below `min`, the entry and every later entry is `min`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccelerationTable {
    intervals: [Duration; ACCELERATION_STEPS],
}

impl AccelerationTable {
    #[must_use]
    pub fn new(initial: Duration, min: Duration) -> Self {
        let mut intervals = [min; ACCELERATION_STEPS];
        let initial_ms = initial.as_secs_f64() * 1000.0;
        let min_ms = min.as_secs_f64() * 1000.0;
        for (i, slot) in intervals.iter_mut().enumerate() {
            let ms = ((1.0 - 0.5 * ((i + 1) as f64).ln()) * initial_ms).ceil();
            if ms < min_ms {
                break;
            }
            *slot = Duration::from_millis(ms as u64);
        }
        Self { intervals }
    }

    #[must_use]
    pub fn from_config(config: &ScrollRepeatConfig) -> Self {
        Self::new(config.initial, config.min)
    }

    /// Interval at `index`, saturating at the last entry.
    #[must_use]
    pub fn get(&self, index: usize) -> Duration {
        self.intervals[index.min(ACCELERATION_STEPS - 1)]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Duration] {
        &self.intervals
    }
}

impl Default for AccelerationTable {
    fn default() -> Self {
        Self::from_config(&ScrollRepeatConfig::default())
    }
}

/// Progress through an [`AccelerationTable`] for one held key.
#[derive(Debug, Clone)]
pub struct AccelerationSchedule {
    table: AccelerationTable,
    step: Duration,
    index: usize,
    since_step: Duration,
}

impl AccelerationSchedule {
    #[must_use]
    pub fn new(table: AccelerationTable, step: Duration) -> Self {
        Self {
            table,
            step,
            index: 0,
            since_step: Duration::ZERO,
        }
    }

    /// Interval to wait before the next tick.
    #[must_use]
    pub fn current(&self) -> Duration {
        self.table.get(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Account for one tick and return the interval until the next one.
    pub fn advance(&mut self) -> Duration {
        if self.since_step >= self.step {
            self.since_step = Duration::ZERO;
            self.index = (self.index + 1).min(ACCELERATION_STEPS - 1);
        } else {
            self.since_step += self.current();
        }
        self.current()
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.since_step = Duration::ZERO;
    }
}

/// One repeat-scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTick {
    pub generation: u64,
    pub direction: ScrollDirection,
}

/// Source of repeat ticks.
pub trait RepeatTimer {
    /// Start delivering ticks for `generation`, replacing any running timer.
    fn start(&mut self, generation: u64, direction: ScrollDirection, schedule: AccelerationSchedule);

    /// Stop delivering ticks. Returns once no further tick can be sent.
    fn stop(&mut self);
}

type TickMapper<M> = Arc<dyn Fn(RepeatTick) -> M + Send + Sync>;

/// [`RepeatTimer`] backed by a background thread that sends ticks over a
/// channel.
pub struct ThreadRepeatTimer<M: Send + 'static> {
    sender: Sender<M>,
    map: TickMapper<M>,
    running: Option<(StopTrigger, JoinHandle<()>)>,
}

impl<M: Send + 'static> ThreadRepeatTimer<M> {
    pub fn new(sender: Sender<M>, map: impl Fn(RepeatTick) -> M + Send + Sync + 'static) -> Self {
        Self {
            sender,
            map: Arc::new(map),
            running: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl<M: Send + 'static> RepeatTimer for ThreadRepeatTimer<M> {
    fn start(
        &mut self,
        generation: u64,
        direction: ScrollDirection,
        mut schedule: AccelerationSchedule,
    ) {
        self.stop();
        let (signal, trigger) = StopSignal::new();
        let sender = self.sender.clone();
        let map = Arc::clone(&self.map);
        let spawned = thread::Builder::new()
            .name("xcon-repeat-scroll".into())
            .spawn(move || {
                let mut wait = schedule.current();
                loop {
                    if signal.wait_timeout(wait) {
                        break;
                    }
                    let tick = RepeatTick {
                        generation,
                        direction,
                    };
                    if sender.send(map(tick)).is_err() {
                        break;
                    }
                    wait = schedule.advance();
                }
            });
        match spawned {
            Ok(handle) => {
                tracing::debug!(generation, ?direction, "repeat timer started");
                self.running = Some((trigger, handle));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to spawn repeat timer");
            }
        }
    }

    fn stop(&mut self) {
        if let Some((trigger, handle)) = self.running.take() {
            trigger.stop();
            let _ = handle.join();
            tracing::debug!("repeat timer stopped");
        }
    }
}

impl<M: Send + 'static> Drop for ThreadRepeatTimer<M> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Something that can be scrolled one line at a time.
pub trait ScrollTarget {
    /// Scroll one line; returns whether the view changed.
    fn scroll_step(&mut self, direction: ScrollDirection) -> bool;
}

impl ScrollTarget for ScrollWindow {
    fn scroll_step(&mut self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Up => self.scroll_up(1),
            ScrollDirection::Down => self.scroll_down(1),
        }
    }
}

/// Repeat-scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatState {
    #[default]
    Idle,
    ScrollingUp,
    ScrollingDown,
}

impl RepeatState {
    fn direction(self) -> Option<ScrollDirection> {
        match self {
            Self::Idle => None,
            Self::ScrollingUp => Some(ScrollDirection::Up),
            Self::ScrollingDown => Some(ScrollDirection::Down),
        }
    }
}

/// Drives repeat scrolling for one scroll target.
pub struct RepeatScrollController<T: RepeatTimer> {
    state: RepeatState,
    generation: u64,
    table: AccelerationTable,
    accel_step: Duration,
    timer: T,
}

impl<T: RepeatTimer> RepeatScrollController<T> {
    pub fn new(config: &ScrollRepeatConfig, timer: T) -> Self {
        Self {
            state: RepeatState::Idle,
            generation: 0,
            table: AccelerationTable::from_config(config),
            accel_step: config.accel_step,
            timer,
        }
    }

    #[must_use]
    pub fn state(&self) -> RepeatState {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn table(&self) -> &AccelerationTable {
        &self.table
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Start scrolling toward older lines. Returns whether the first step
    /// changed the view.
    pub fn begin_up(&mut self, target: &mut dyn ScrollTarget) -> bool {
        self.begin(ScrollDirection::Up, target)
    }

    /// Start scrolling toward newer lines.
    pub fn begin_down(&mut self, target: &mut dyn ScrollTarget) -> bool {
        self.begin(ScrollDirection::Down, target)
    }

    fn begin(&mut self, direction: ScrollDirection, target: &mut dyn ScrollTarget) -> bool {
        match self.state.direction() {
            // Key auto-repeat: the timer is already running.
            Some(current) if current == direction => return false,
            Some(_) => self.end_scroll(),
            None => {}
        }
        self.state = match direction {
            ScrollDirection::Up => RepeatState::ScrollingUp,
            ScrollDirection::Down => RepeatState::ScrollingDown,
        };
        self.generation += 1;
        let changed = target.scroll_step(direction);
        let schedule = AccelerationSchedule::new(self.table.clone(), self.accel_step);
        self.timer.start(self.generation, direction, schedule);
        tracing::trace!(generation = self.generation, ?direction, "repeat scroll begin");
        changed
    }

    /// Stop scrolling. The timer is stopped and joined before returning.
    pub fn end_scroll(&mut self) {
        if self.state == RepeatState::Idle {
            return;
        }
        self.timer.stop();
        self.state = RepeatState::Idle;
        self.generation += 1;
        tracing::trace!(generation = self.generation, "repeat scroll end");
    }

    /// Apply a tick. Stale ticks (older generation, or while idle) are
    /// ignored. Returns whether the view changed.
    pub fn on_tick(&mut self, tick: RepeatTick, target: &mut dyn ScrollTarget) -> bool {
        if tick.generation != self.generation || self.state.direction() != Some(tick.direction) {
            return false;
        }
        target.scroll_step(tick.direction)
    }
}

impl<T: RepeatTimer> Drop for RepeatScrollController<T> {
    fn drop(&mut self) {
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Instant;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_millis).collect()
    }

    #[derive(Default)]
    struct ManualTimer {
        starts: Vec<(u64, ScrollDirection)>,
        stops: usize,
        running: bool,
    }

    impl RepeatTimer for ManualTimer {
        fn start(&mut self, generation: u64, direction: ScrollDirection, _: AccelerationSchedule) {
            self.starts.push((generation, direction));
            self.running = true;
        }

        fn stop(&mut self) {
            if self.running {
                self.stops += 1;
                self.running = false;
            }
        }
    }

    #[derive(Default)]
    struct Steps(Vec<ScrollDirection>);

    impl ScrollTarget for Steps {
        fn scroll_step(&mut self, direction: ScrollDirection) -> bool {
            self.0.push(direction);
            true
        }
    }

    fn controller() -> RepeatScrollController<ManualTimer> {
        RepeatScrollController::new(&ScrollRepeatConfig::default(), ManualTimer::default())
    }

    // ==========================================================================
    // Acceleration table
    // ==========================================================================

    #[test]
    fn default_table_values() {
        let table = AccelerationTable::default();
        let mut expected = ms(&[200, 131, 91, 62, 40, 21, 6]);
        expected.resize(ACCELERATION_STEPS, Duration::from_millis(5));
        assert_eq!(table.as_slice(), expected.as_slice());
    }

    #[test]
    fn table_is_non_increasing_and_floored() {
        let table = AccelerationTable::new(Duration::from_millis(500), Duration::from_millis(30));
        let slice = table.as_slice();
        assert!(slice.windows(2).all(|w| w[0] >= w[1]));
        assert!(slice.iter().all(|d| *d >= Duration::from_millis(30)));
        assert_eq!(table.get(100), slice[ACCELERATION_STEPS - 1]);
    }

    #[test]
    fn schedule_spends_two_ticks_per_entry_with_short_step() {
        let mut schedule =
            AccelerationSchedule::new(AccelerationTable::default(), Duration::from_millis(1));
        let waits: Vec<_> = (0..6).map(|_| schedule.advance()).collect();
        assert_eq!(waits, ms(&[200, 131, 131, 91, 91, 62]));
        schedule.reset();
        assert_eq!(schedule.index(), 0);
        assert_eq!(schedule.current(), Duration::from_millis(200));
    }

    #[test]
    fn schedule_with_long_step_accelerates_later() {
        let mut schedule =
            AccelerationSchedule::new(AccelerationTable::default(), Duration::from_millis(400));
        // 0 -> 200 -> 400 accumulated, then step.
        assert_eq!(schedule.advance(), Duration::from_millis(200));
        assert_eq!(schedule.advance(), Duration::from_millis(200));
        assert_eq!(schedule.advance(), Duration::from_millis(131));
    }

    #[test]
    fn schedule_caps_at_last_entry() {
        let mut schedule = AccelerationSchedule::new(AccelerationTable::default(), Duration::ZERO);
        for _ in 0..100 {
            schedule.advance();
        }
        assert_eq!(schedule.index(), ACCELERATION_STEPS - 1);
        assert_eq!(schedule.current(), Duration::from_millis(5));
    }

    // ==========================================================================
    // State machine
    // ==========================================================================

    #[test]
    fn begin_steps_immediately_and_starts_timer() {
        let mut c = controller();
        let mut target = Steps::default();
        assert!(c.begin_up(&mut target));
        assert_eq!(c.state(), RepeatState::ScrollingUp);
        assert_eq!(target.0, vec![ScrollDirection::Up]);
        assert_eq!(c.timer().starts, vec![(1, ScrollDirection::Up)]);
    }

    #[test]
    fn auto_repeat_of_same_direction_is_ignored() {
        let mut c = controller();
        let mut target = Steps::default();
        c.begin_down(&mut target);
        assert!(!c.begin_down(&mut target));
        assert_eq!(target.0.len(), 1);
        assert_eq!(c.timer().starts.len(), 1);
    }

    #[test]
    fn opposite_direction_ends_current_scroll() {
        let mut c = controller();
        let mut target = Steps::default();
        c.begin_up(&mut target);
        c.begin_down(&mut target);
        assert_eq!(c.state(), RepeatState::ScrollingDown);
        assert_eq!(c.timer().stops, 1);
        assert_eq!(target.0, vec![ScrollDirection::Up, ScrollDirection::Down]);
    }

    #[test]
    fn end_scroll_returns_to_idle() {
        let mut c = controller();
        let mut target = Steps::default();
        c.end_scroll();
        assert_eq!(c.timer().stops, 0);
        c.begin_up(&mut target);
        c.end_scroll();
        assert_eq!(c.state(), RepeatState::Idle);
        assert_eq!(c.timer().stops, 1);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let mut c = controller();
        let mut target = Steps::default();
        c.begin_up(&mut target);
        let tick = RepeatTick {
            generation: c.generation(),
            direction: ScrollDirection::Up,
        };
        assert!(c.on_tick(tick, &mut target));
        c.end_scroll();
        assert!(!c.on_tick(tick, &mut target));
        c.begin_up(&mut target);
        assert!(!c.on_tick(tick, &mut target));
        assert_eq!(target.0.len(), 3);
    }

    #[test]
    fn scroll_window_is_a_target() {
        let mut window = ScrollWindow::with_capacity(8);
        for i in 0..5 {
            window.push_line(format!("{i}"));
        }
        assert!(window.scroll_step(ScrollDirection::Up));
        assert_eq!(window.newest_visible(), Some(3));
        assert!(window.scroll_step(ScrollDirection::Down));
        assert!(!window.scroll_step(ScrollDirection::Down));
    }

    // ==========================================================================
    // Thread timer
    // ==========================================================================

    #[test]
    fn thread_timer_delivers_ticks_until_stopped() {
        let (tx, rx) = mpsc::channel();
        let mut timer = ThreadRepeatTimer::new(tx, |tick| tick);
        let table = AccelerationTable::new(Duration::from_millis(10), Duration::from_millis(2));
        timer.start(7, ScrollDirection::Down, AccelerationSchedule::new(table, Duration::ZERO));
        assert!(timer.is_running());

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = 0;
        while received < 3 && Instant::now() < deadline {
            if let Ok(tick) = rx.recv_timeout(Duration::from_millis(100)) {
                assert_eq!(tick.generation, 7);
                assert_eq!(tick.direction, ScrollDirection::Down);
                received += 1;
            }
        }
        assert_eq!(received, 3);

        timer.stop();
        assert!(!timer.is_running());
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }
}
