//! Auto-scan: sweeps the reading back and forth until the user grabs the slider.
//!
//! The driver runs once per animation frame. Taking control cancels the
//! pending frame request itself, so no stale frame can land after the user's
//! value.

use crate::clock::Clock;
use crate::normalize::ValueRange;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Reading at wall-clock `now_ms` for a sine sweep across `range`.
///
/// A zero or non-finite period has no phase; the sweep rests at `range.min`.
pub fn oscillate(range: ValueRange, period_ms: f64, now_ms: f64) -> i32 {
    let phase = (now_ms / period_ms).sin();
    if !phase.is_finite() {
        return range.min;
    }
    let normalized = (phase + 1.0) / 2.0;
    let span = range.max as f64 - range.min as f64;
    range.clamp((range.min as f64 + normalized * span).round() as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    AutoScanning,
    UserInteracting,
}

/// Something that runs a callback on the next frame and can take it back.
pub trait FrameScheduler {
    type Handle;

    fn request(&self, callback: Box<dyn FnOnce()>) -> Self::Handle;

    fn cancel(&self, handle: Self::Handle);
}

struct Inner<S: FrameScheduler, C: Clock> {
    scheduler: S,
    clock: C,
    range: ValueRange,
    period_ms: f64,
    on_value: Box<dyn Fn(i32)>,
    mode: Cell<ScanMode>,
    pending: RefCell<Option<S::Handle>>,
}

pub struct AutoScanDriver<S: FrameScheduler + 'static, C: Clock + 'static> {
    inner: Rc<Inner<S, C>>,
}

impl<S: FrameScheduler + 'static, C: Clock + 'static> AutoScanDriver<S, C> {
    /// The driver starts in [`ScanMode::AutoScanning`] but idle; call
    /// [`AutoScanDriver::start`] to request the first frame.
    pub fn new(
        scheduler: S,
        clock: C,
        range: ValueRange,
        period_ms: f64,
        on_value: impl Fn(i32) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                clock,
                range,
                period_ms,
                on_value: Box::new(on_value),
                mode: Cell::new(ScanMode::AutoScanning),
                pending: RefCell::new(None),
            }),
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.inner.mode.get()
    }

    pub fn is_scheduled(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    pub fn start(&self) {
        if self.mode() == ScanMode::AutoScanning && !self.is_scheduled() {
            schedule(&self.inner);
        }
    }

    /// Hand control to the user and cancel the pending frame.
    pub fn begin_interaction(&self) {
        if self.mode() == ScanMode::UserInteracting {
            return;
        }
        self.inner.mode.set(ScanMode::UserInteracting);
        cancel_pending(&self.inner);
        debug!("Auto-scan stopped by user interaction");
    }

    /// Deliberately a no-op: releasing the slider keeps the user's value and
    /// the sweep stays cancelled. Callers track their own dragging flag; only
    /// [`AutoScanDriver::resume`] re-arms the sweep.
    pub fn end_interaction(&self) {}

    /// Re-arm the sweep after an interaction.
    pub fn resume(&self) {
        self.inner.mode.set(ScanMode::AutoScanning);
        self.start();
    }
}

impl<S: FrameScheduler + 'static, C: Clock + 'static> Drop for AutoScanDriver<S, C> {
    fn drop(&mut self) {
        cancel_pending(&self.inner);
    }
}

fn cancel_pending<S: FrameScheduler, C: Clock>(inner: &Inner<S, C>) {
    let handle = inner.pending.borrow_mut().take();
    if let Some(handle) = handle {
        inner.scheduler.cancel(handle);
    }
}

fn schedule<S: FrameScheduler + 'static, C: Clock + 'static>(inner: &Rc<Inner<S, C>>) {
    let weak: Weak<Inner<S, C>> = Rc::downgrade(inner);
    let handle = inner.scheduler.request(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            tick(&inner);
        }
    }));
    *inner.pending.borrow_mut() = Some(handle);
}

fn tick<S: FrameScheduler + 'static, C: Clock + 'static>(inner: &Rc<Inner<S, C>>) {
    inner.pending.borrow_mut().take();
    if inner.mode.get() != ScanMode::AutoScanning {
        return;
    }
    let value = oscillate(inner.range, inner.period_ms, inner.clock.now_ms());
    (inner.on_value)(value);
    // on_value may have handed control to the user
    if inner.mode.get() == ScanMode::AutoScanning {
        schedule(inner);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::FrameScheduler;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// Frame queue driven by hand: `flush` runs every queued callback once.
    #[derive(Clone, Default)]
    pub struct VirtualFrames {
        queue: Rc<RefCell<BTreeMap<u64, Box<dyn FnOnce()>>>>,
        next: Rc<RefCell<u64>>,
    }

    impl VirtualFrames {
        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        pub fn flush(&self) -> usize {
            let due: Vec<Box<dyn FnOnce()>> = {
                let mut queue = self.queue.borrow_mut();
                std::mem::take(&mut *queue).into_values().collect()
            };
            let ran = due.len();
            for callback in due {
                callback();
            }
            ran
        }
    }

    impl FrameScheduler for VirtualFrames {
        type Handle = u64;

        fn request(&self, callback: Box<dyn FnOnce()>) -> u64 {
            let mut next = self.next.borrow_mut();
            *next += 1;
            self.queue.borrow_mut().insert(*next, callback);
            *next
        }

        fn cancel(&self, handle: u64) {
            self.queue.borrow_mut().remove(&handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::VirtualFrames;
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{MAX_READING, MIN_READING, SCAN_PERIOD_MS};
    use std::f64::consts::PI;

    fn driver(
        frames: &VirtualFrames,
        clock: &Rc<ManualClock>,
    ) -> (AutoScanDriver<VirtualFrames, Rc<ManualClock>>, Rc<RefCell<Vec<i32>>>) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = values.clone();
        let driver = AutoScanDriver::new(
            frames.clone(),
            clock.clone(),
            ValueRange::READING,
            SCAN_PERIOD_MS,
            move |v| sink.borrow_mut().push(v),
        );
        (driver, values)
    }

    #[test]
    fn oscillate_sweeps_the_whole_range() {
        let r = ValueRange::READING;
        assert_eq!(oscillate(r, SCAN_PERIOD_MS, 0.0), 350);
        assert_eq!(oscillate(r, SCAN_PERIOD_MS, SCAN_PERIOD_MS * PI / 2.0), MAX_READING);
        assert_eq!(oscillate(r, SCAN_PERIOD_MS, SCAN_PERIOD_MS * 3.0 * PI / 2.0), MIN_READING);
        for ms in (0..20_000).step_by(17) {
            let v = oscillate(r, SCAN_PERIOD_MS, ms as f64);
            assert!((MIN_READING..=MAX_READING).contains(&v));
        }
    }

    #[test]
    fn degenerate_periods_rest_at_the_bottom_of_the_range() {
        let r = ValueRange::READING;
        assert_eq!(oscillate(r, 0.0, 0.0), MIN_READING);
        assert_eq!(oscillate(r, 0.0, 1234.0), MIN_READING);
        assert_eq!(oscillate(r, f64::NAN, 500.0), MIN_READING);
        assert_eq!(oscillate(r, SCAN_PERIOD_MS, f64::INFINITY), MIN_READING);
    }

    #[test]
    fn oscillate_stays_inside_extreme_ranges() {
        let wide = ValueRange {
            min: i32::MIN,
            max: i32::MAX,
        };
        for ms in (0..5_000).step_by(97) {
            let v = oscillate(wide, SCAN_PERIOD_MS, ms as f64);
            assert!((wide.min..=wide.max).contains(&v));
        }
    }

    #[test]
    fn each_frame_emits_the_clock_driven_value() {
        let frames = VirtualFrames::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let (driver, values) = driver(&frames, &clock);
        assert!(values.borrow().is_empty());

        driver.start();
        assert_eq!(frames.pending(), 1);
        frames.flush();
        clock.set(SCAN_PERIOD_MS * PI / 2.0);
        frames.flush();
        assert_eq!(*values.borrow(), vec![350, MAX_READING]);
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn starting_twice_requests_one_frame() {
        let frames = VirtualFrames::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let (driver, _values) = driver(&frames, &clock);
        driver.start();
        driver.start();
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn interaction_cancels_the_pending_frame() {
        let frames = VirtualFrames::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let (driver, values) = driver(&frames, &clock);
        driver.start();
        frames.flush();
        assert_eq!(values.borrow().len(), 1);

        driver.begin_interaction();
        assert_eq!(driver.mode(), ScanMode::UserInteracting);
        assert_eq!(frames.pending(), 0);

        for _ in 0..10 {
            clock.advance(SCAN_PERIOD_MS);
            assert_eq!(frames.flush(), 0);
        }
        assert_eq!(values.borrow().len(), 1);
    }

    #[test]
    fn releasing_the_slider_does_not_resume() {
        let frames = VirtualFrames::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let (driver, values) = driver(&frames, &clock);
        driver.start();
        driver.begin_interaction();
        driver.end_interaction();
        assert_eq!(driver.mode(), ScanMode::UserInteracting);
        clock.advance(SCAN_PERIOD_MS * 5.0);
        frames.flush();
        assert!(values.borrow().is_empty());

        driver.resume();
        frames.flush();
        assert_eq!(values.borrow().len(), 1);
    }

    #[test]
    fn interaction_from_inside_the_setter_stops_rescheduling() {
        let frames = VirtualFrames::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let slot: Rc<RefCell<Option<Rc<AutoScanDriver<VirtualFrames, Rc<ManualClock>>>>>> =
            Rc::new(RefCell::new(None));
        let handle = slot.clone();
        let driver = Rc::new(AutoScanDriver::new(
            frames.clone(),
            clock.clone(),
            ValueRange::READING,
            SCAN_PERIOD_MS,
            move |_| {
                if let Some(d) = handle.borrow().as_ref() {
                    d.begin_interaction();
                }
            },
        ));
        *slot.borrow_mut() = Some(driver.clone());
        driver.start();
        frames.flush();
        assert_eq!(frames.pending(), 0);
        slot.borrow_mut().take();
    }

    #[test]
    fn dropping_the_driver_cancels_the_frame() {
        let frames = VirtualFrames::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let (driver, values) = driver(&frames, &clock);
        driver.start();
        drop(driver);
        assert_eq!(frames.pending(), 0);
        assert_eq!(frames.flush(), 0);
        assert!(values.borrow().is_empty());
    }
}
