//! PineTime firmware running the complication watch face.
//!
//! The button toggles ambient mode. The top slot shows the time since boot.

#![no_std]
#![no_main]

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use debouncr::{debounce_2, Edge};
use display_interface_spi::SPIInterface;
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::{P0_13, P0_14, P0_15, P0_18, P0_22, P0_23, P0_25, P0_26, SPI2},
    spim::{self, Spim},
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Delay, Duration, Instant, Timer};
use mipidsi::{models::ST7789, Builder, Orientation};

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use complication_watchface::{
    engine::update_slot,
    system::time::{TimeManager, TimeReference},
    ui::painter::{paint, NoImages},
    ComplicationData, ComplicationText, Engine, FaceConfig, Invalidate, Slot, TickTimer,
    WatchFaceEvents,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i32 = 1 * 3_600;

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

/// Backlight levels, see [`Backlight::set`]
const BRIGHTNESS_INTERACTIVE: u8 = 3;
const BRIGHTNESS_AMBIENT: u8 = 1;

type Lcd = mipidsi::Display<
    SPIInterface<Spim<'static, SPI2>, Output<'static, P0_18>, Output<'static, P0_25>>,
    ST7789,
    Output<'static, P0_26>,
>;

// Communication channels
static TOGGLE_AMBIENT: Signal<ThreadModeRawMutex, ()> = Signal::new();

/// Three active-low backlight pins, combined into 7 brightness levels
struct Backlight {
    low: Output<'static, P0_14>,
    mid: Output<'static, P0_22>,
    high: Output<'static, P0_23>,
}

impl Backlight {
    /// Set the brightness level between 0 (off) and 7 (max brightness).
    fn set(&mut self, brightness: u8) {
        defmt::debug!("Setting backlight brightness to {}", brightness);
        self.low.set_level(active_low(brightness & 0x01 > 0));
        self.mid.set_level(active_low(brightness & 0x02 > 0));
        self.high.set_level(active_low(brightness & 0x04 > 0));
    }
}

fn active_low(on: bool) -> Level {
    if on {
        Level::Low
    } else {
        Level::High
    }
}

/// Redraw timer polled by the face task
#[derive(Default)]
struct DeadlineTimer {
    deadline: Option<Instant>,
}

impl DeadlineTimer {
    fn expired(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }
}

impl TickTimer for DeadlineTimer {
    fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Pending redraw request
#[derive(Default)]
struct RedrawFlag {
    pending: bool,
}

impl RedrawFlag {
    fn take(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }
}

impl Invalidate for RedrawFlag {
    fn invalidate(&mut self) {
        self.pending = true;
    }
}

/// Toggles ambient mode on each debounced press (stable for 2 polls)
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut enable: Output<'static, P0_15>, pin: Input<'static, P0_13>) {
    let mut debounce = debounce_2(false);
    loop {
        // Button output settles shortly after its enable pin goes high
        enable.set_high();
        Timer::after(Duration::from_nanos(1)).await;
        let pressed = debounce.update(pin.is_high()) == Some(Edge::Rising);
        // Enable draws around 34µA while high
        enable.set_low();

        if pressed {
            TOGGLE_AMBIENT.signal(());
        }
        Timer::after(Duration::from_millis(10)).await;
    }
}

/// Drives the face: host events in, frames out
#[embassy_executor::task(pool_size = 1)]
async fn run_face(mut lcd: Lcd, mut backlight: Backlight) {
    let clock = TimeManager::init(TimeReference::from_epoch_secs(UTC_EPOCH, Instant::now()));
    let mut engine = Engine::new(
        FaceConfig::new().with_utc_offset(TIMEZONE),
        DeadlineTimer::default(),
        RedrawFlag::default(),
    );
    engine.on_screen_size_changed(LCD_W as u32, LCD_H as u32);

    let boot_ms = clock.now_millis(Instant::now());
    let uptime = ComplicationData::ShortText {
        title: Some(ComplicationText::Plain("Uptime")),
        text: Some(ComplicationText::TimeDifference {
            reference_ms: boot_ms,
        }),
    };
    update_slot(&mut engine, Slot::TopText, Some(&uptime), boot_ms);
    engine.on_visibility_changed(true);

    let mut ambient = false;
    let mut minute = boot_ms / 60_000;
    loop {
        let now = Instant::now();
        let now_ms = clock.now_millis(now);

        if TOGGLE_AMBIENT.signaled() {
            TOGGLE_AMBIENT.wait().await;
            ambient = !ambient;
            backlight.set(if ambient {
                BRIGHTNESS_AMBIENT
            } else {
                BRIGHTNESS_INTERACTIVE
            });
            engine.on_ambient_mode_changed(ambient);
        }

        if now_ms / 60_000 != minute {
            minute = now_ms / 60_000;
            engine.on_time_tick();
            // Re-evaluate the uptime text
            update_slot(&mut engine, Slot::TopText, Some(&uptime), now_ms);
        }

        if engine.timer().expired(now) {
            engine.timer_mut().cancel();
            engine.on_timer_fired(now_ms);
        }

        if engine.host_mut().take() {
            let frame = engine.on_draw_request(now_ms);
            if paint(&frame, &mut lcd, &NoImages).is_err() {
                defmt::warn!("Display update failed");
            }
        }

        // Poll host events and the redraw timer every 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    defmt::info!("Initializing");

    // Initialize Backlight
    let mut backlight = Backlight {
        low: Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        mid: Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        high: Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    };

    // Initialize Button
    let button = Input::new(p.P0_13, Pull::None);
    let btn_enable = Output::new(p.P0_15, Level::Low, OutputDrive::Standard);

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let cs = Output::new(p.P0_25, Level::Low, OutputDrive::Standard);
    let dc = Output::new(p.P0_18, Level::Low, OutputDrive::Standard);
    let rst = Output::new(p.P0_26, Level::Low, OutputDrive::Standard);
    let lcd = match Builder::st7789(SPIInterface::new(spim, dc, cs))
        .with_display_size(LCD_W, LCD_H)
        .with_orientation(Orientation::Portrait(false))
        .init(&mut Delay, Some(rst))
    {
        Ok(lcd) => lcd,
        Err(_) => defmt::panic!("Display initialization failed"),
    };
    backlight.set(BRIGHTNESS_INTERACTIVE);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(_spawner.spawn(poll_button(btn_enable, button)));
    unwrap!(_spawner.spawn(run_face(lcd, backlight)));
}
