//! The shared panel engine
//!
//! The engine is touched from two priorities: the refresh task on the
//! interrupt executor and the uplink task in thread mode. Every access goes
//! through [`with_panel`], which holds a critical section for the duration
//! of the closure, so a frame swap or a disable can never interleave with
//! a tick.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use ledmux_core::{LedMatrix, SignalPin};
use ledmux_hal_rp2040::{RpOutput, TickerSource};

use crate::channels::FRAME_SYNC;

include!(concat!(env!("OUT_DIR"), "/geometry.rs"));

/// Engine type for this board
pub type Matrix = LedMatrix<SignalPin<RpOutput>, TickerSource, fn(u32), PANEL_COLS>;

static PANEL: Mutex<CriticalSectionRawMutex, RefCell<Option<Matrix>>> =
    Mutex::new(RefCell::new(None));

/// Hand the initialized engine over to the shared slot
pub fn install(matrix: Matrix) {
    PANEL.lock(|cell| cell.replace(Some(matrix)));
}

/// Run `f` on the engine inside a critical section
///
/// Returns `None` before [`install`].
pub fn with_panel<R>(f: impl FnOnce(&mut Matrix) -> R) -> Option<R> {
    PANEL.lock(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Frame-sync callback, runs in the tick context
pub fn on_frame_complete(frame: u32) {
    FRAME_SYNC.signal(frame);
}
