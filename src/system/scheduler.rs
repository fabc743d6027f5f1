//! Once-per-second redraw timer for interactive mode

use embassy_time::Duration;

/// Host timer delivering a single pending tick.
///
/// Scheduling replaces any pending tick.
pub trait TickTimer {
    /// Deliver a tick after `delay`
    fn schedule(&mut self, delay: Duration);
    /// Drop the pending tick, if any
    fn cancel(&mut self);
}

/// The timer runs only while the face is visible and interactive
pub fn should_run(visible: bool, ambient: bool) -> bool {
    visible && !ambient
}

/// Delay that lands the next tick on the next interval boundary
pub fn delay_to_next_tick(now_ms: i64, interval_ms: u64) -> Duration {
    let interval = interval_ms.max(1);
    let elapsed = now_ms.rem_euclid(interval as i64) as u64;
    Duration::from_millis(interval - elapsed)
}

/// Decides when the redraw timer runs and owns its handle.
///
/// Dropping the scheduler cancels the pending tick.
pub struct UpdateScheduler<T>
where
    T: TickTimer,
{
    timer: T,
    /// Redraw period in milliseconds
    interval_ms: u64,
    visible: bool,
    ambient: bool,
}

impl<T> UpdateScheduler<T>
where
    T: TickTimer,
{
    pub fn new(timer: T, interval_ms: u64) -> Self {
        Self {
            timer,
            interval_ms,
            visible: false,
            ambient: false,
        }
    }

    pub fn should_run(&self) -> bool {
        should_run(self.visible, self.ambient)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_ambient(&self) -> bool {
        self.ambient
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.update_timer();
    }

    pub fn set_ambient(&mut self, ambient: bool) {
        self.ambient = ambient;
        self.update_timer();
    }

    /// Cancel the pending tick and fire right away when the timer should run
    pub fn update_timer(&mut self) {
        self.timer.cancel();
        if self.should_run() {
            debug!("Redraw timer started");
            self.timer.schedule(Duration::from_millis(0));
        }
    }

    /// Handle a delivered tick and schedule the next one when still running
    pub fn on_tick(&mut self, now_ms: i64) {
        if self.should_run() {
            self.timer
                .schedule(delay_to_next_tick(now_ms, self.interval_ms));
        }
    }

    /// Stop ticking
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

impl<T> Drop for UpdateScheduler<T>
where
    T: TickTimer,
{
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, PartialEq)]
    enum Call {
        Schedule(u64),
        Cancel,
    }

    #[derive(Clone, Default)]
    struct RecordingTimer(Rc<RefCell<Vec<Call>>>);

    impl TickTimer for RecordingTimer {
        fn schedule(&mut self, delay: Duration) {
            self.0.borrow_mut().push(Call::Schedule(delay.as_millis()));
        }
        fn cancel(&mut self) {
            self.0.borrow_mut().push(Call::Cancel);
        }
    }

    #[test]
    fn truth_table() {
        assert!(should_run(true, false));
        assert!(!should_run(true, true));
        assert!(!should_run(false, false));
        assert!(!should_run(false, true));
    }

    #[test]
    fn delay_aligns_to_second_boundary() {
        assert_eq!(delay_to_next_tick(1_250, 1000).as_millis(), 750);
        assert_eq!(delay_to_next_tick(2_000, 1000).as_millis(), 1000);
        assert_eq!(delay_to_next_tick(-250, 1000).as_millis(), 250);
    }

    #[test]
    fn becoming_visible_fires_immediately() {
        let timer = RecordingTimer::default();
        let calls = timer.0.clone();
        let mut scheduler = UpdateScheduler::new(timer, 1000);

        scheduler.set_visible(true);
        assert_eq!(*calls.borrow(), vec![Call::Cancel, Call::Schedule(0)]);

        calls.borrow_mut().clear();
        scheduler.on_tick(10_400);
        assert_eq!(*calls.borrow(), vec![Call::Schedule(600)]);
    }

    #[test]
    fn ambient_stops_ticks() {
        let timer = RecordingTimer::default();
        let calls = timer.0.clone();
        let mut scheduler = UpdateScheduler::new(timer, 1000);
        scheduler.set_visible(true);
        scheduler.set_ambient(true);

        calls.borrow_mut().clear();
        scheduler.on_tick(10_400);
        assert!(calls.borrow().is_empty());
        assert!(!scheduler.should_run());
    }

    #[test]
    fn drop_cancels_pending_tick() {
        let timer = RecordingTimer::default();
        let calls = timer.0.clone();
        let mut scheduler = UpdateScheduler::new(timer, 1000);
        scheduler.set_visible(true);

        calls.borrow_mut().clear();
        drop(scheduler);
        assert_eq!(*calls.borrow(), vec![Call::Cancel]);
    }
}
