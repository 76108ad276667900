//! Refresh tick source
//!
//! The engine's `TickSource` is split in two: [`TickerSource`] is the
//! handle the engine owns, and [`run_refresh`] is the loop that actually
//! waits on the timer. The loop belongs in a task on a high-priority
//! interrupt executor so ticks preempt the thread-mode tasks.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use ledmux_hal::TickSource;

/// Request to the refresh loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshCommand {
    /// (Re)start ticking with this period
    Start { period_us: u32 },
    /// Stop ticking
    Stop,
}

/// Start/stop requests from [`TickerSource`] to [`run_refresh`]
pub static REFRESH_CONTROL: Signal<CriticalSectionRawMutex, RefreshCommand> = Signal::new();

/// `TickSource` handle for the refresh loop
///
/// The refresh loop may still wake once after `stop`. The tick callback
/// makes `stop` synchronous by checking, inside the same critical section
/// that guards the engine, that the engine is still enabled.
#[derive(Debug, Default)]
pub struct TickerSource {
    running: bool,
}

impl TickerSource {
    pub const fn new() -> Self {
        Self { running: false }
    }
}

impl TickSource for TickerSource {
    fn start(&mut self, period_us: u32) {
        REFRESH_CONTROL.signal(RefreshCommand::Start { period_us });
        self.running = true;
    }

    fn stop(&mut self) {
        REFRESH_CONTROL.signal(RefreshCommand::Stop);
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Drive `on_tick` at the period requested through [`REFRESH_CONTROL`]
///
/// Idle until the first `Start`. A new `Start` replaces the running
/// period; `Stop` parks the loop again.
pub async fn run_refresh(mut on_tick: impl FnMut()) -> ! {
    let mut ticker: Option<Ticker> = None;

    loop {
        let event = match ticker.as_mut() {
            Some(t) => select(t.next(), REFRESH_CONTROL.wait()).await,
            None => Either::Second(REFRESH_CONTROL.wait().await),
        };

        match event {
            Either::First(()) => on_tick(),
            Either::Second(RefreshCommand::Start { period_us }) => {
                ticker = Some(Ticker::every(Duration::from_micros(period_us as u64)));
            }
            Either::Second(RefreshCommand::Stop) => ticker = None,
        }
    }
}
