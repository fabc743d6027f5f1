//! Host facing side of the watch face
//!
//! The host serializes every callback; [`Engine`] pairs the render engine
//! with the redraw scheduler and reacts to each event.

use embedded_graphics::geometry::Size;

use crate::{
    complications::{registry, ComplicationData, Slot},
    system::{
        config::FaceConfig,
        scheduler::{TickTimer, UpdateScheduler},
        time::local_time,
    },
    ui::{ComplicationWatchface, Frame, WatchFace},
};

/// Notification interruption filter reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptionFilter {
    All,
    Priority,
    /// Nothing may interrupt: the face is muted
    None,
    Alarms,
}

impl InterruptionFilter {
    pub fn is_muted(self) -> bool {
        self == InterruptionFilter::None
    }
}

/// Asks the host for a new frame
pub trait Invalidate {
    fn invalidate(&mut self);
}

/// Host lifecycle events, one method per event
pub trait WatchFaceEvents {
    /// New data, or `None` when the provider went away, for slot `slot_id`.
    ///
    /// Text is evaluated at UTC time `now_ms`.
    fn on_complication_update(
        &mut self,
        slot_id: i32,
        data: Option<&ComplicationData<'_>>,
        now_ms: i64,
    );

    fn on_ambient_mode_changed(&mut self, ambient: bool);

    fn on_visibility_changed(&mut self, visible: bool);

    fn on_interruption_filter_muted(&mut self, muted: bool);

    fn on_interruption_filter_changed(&mut self, filter: InterruptionFilter) {
        self.on_interruption_filter_muted(filter.is_muted());
    }

    fn on_screen_size_changed(&mut self, width: u32, height: u32);

    /// Called once per minute
    fn on_time_tick(&mut self);

    /// Redraw timer tick at UTC time `now_ms`
    fn on_timer_fired(&mut self, now_ms: i64);

    fn on_time_zone_changed(&mut self, utc_offset: i32);

    /// Draw the face for UTC time `now_ms`
    fn on_draw_request(&mut self, now_ms: i64) -> Frame;

    fn on_destroy(&mut self);
}

/// Render engine and redraw scheduler of one face instance
pub struct Engine<T, I>
where
    T: TickTimer,
    I: Invalidate,
{
    face: ComplicationWatchface,
    scheduler: UpdateScheduler<T>,
    host: I,
}

impl<T, I> Engine<T, I>
where
    T: TickTimer,
    I: Invalidate,
{
    pub fn new(config: FaceConfig, timer: T, host: I) -> Self {
        let interval_ms = config.update_interval_ms();
        Self {
            face: ComplicationWatchface::new(config),
            scheduler: UpdateScheduler::new(timer, interval_ms),
            host,
        }
    }

    /// Slot ids the face wants updates for
    pub fn active_slot_ids(&self) -> &'static [i32] {
        registry::slot_ids()
    }

    pub fn face(&self) -> &ComplicationWatchface {
        &self.face
    }

    pub fn scheduler(&self) -> &UpdateScheduler<T> {
        &self.scheduler
    }

    pub fn host(&self) -> &I {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut I {
        &mut self.host
    }

    pub fn timer(&self) -> &T {
        self.scheduler.timer()
    }

    pub fn timer_mut(&mut self) -> &mut T {
        self.scheduler.timer_mut()
    }

    fn invalidate(&mut self) {
        self.host.invalidate();
    }
}

impl<T, I> WatchFaceEvents for Engine<T, I>
where
    T: TickTimer,
    I: Invalidate,
{
    fn on_complication_update(
        &mut self,
        slot_id: i32,
        data: Option<&ComplicationData<'_>>,
        now_ms: i64,
    ) {
        match self.face.apply_complication(slot_id, data, now_ms) {
            Ok(slot) => debug!("Complication {} updated", slot),
            Err(err) => warn!("Complication update degraded: {}", err),
        }
        self.invalidate();
    }

    fn on_ambient_mode_changed(&mut self, ambient: bool) {
        debug!("Ambient mode: {}", ambient);
        self.face.set_ambient(ambient);
        self.scheduler.set_ambient(ambient);
        self.invalidate();
    }

    fn on_visibility_changed(&mut self, visible: bool) {
        debug!("Visible: {}", visible);
        if visible {
            // Time zone may have changed while hidden
            self.invalidate();
        }
        self.scheduler.set_visible(visible);
    }

    fn on_interruption_filter_muted(&mut self, muted: bool) {
        if self.face.set_muted(muted) {
            debug!("Muted: {}", muted);
            self.invalidate();
        }
    }

    fn on_screen_size_changed(&mut self, width: u32, height: u32) {
        self.face.resize(Size::new(width, height));
    }

    fn on_time_tick(&mut self) {
        self.face.toggle_second_mode();
        self.invalidate();
    }

    fn on_timer_fired(&mut self, now_ms: i64) {
        self.invalidate();
        self.scheduler.on_tick(now_ms);
    }

    fn on_time_zone_changed(&mut self, utc_offset: i32) {
        info!("Time zone offset changed to {}s", utc_offset);
        self.face.set_utc_offset(utc_offset);
        self.invalidate();
    }

    fn on_draw_request(&mut self, now_ms: i64) -> Frame {
        let now = local_time(now_ms, self.face.config().utc_offset);
        self.face.render(now)
    }

    fn on_destroy(&mut self) {
        self.scheduler.cancel();
    }
}

/// Route `data` for `slot` through its id, as the host would
pub fn update_slot<E>(
    engine: &mut E,
    slot: Slot,
    data: Option<&ComplicationData<'_>>,
    now_ms: i64,
) where
    E: WatchFaceEvents + ?Sized,
{
    engine.on_complication_update(slot.id(), data, now_ms);
}
