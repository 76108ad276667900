//! Inter-task communication channels
//!
//! Defines the static channels used between the refresh context and the
//! thread-mode tasks. The refresh side only ever signals; it never waits.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use ledmux_protocol::PanelMessage;

/// Capacity of the reply queue to the host
const OUTBOX_SIZE: usize = 8;

/// Index of the last completed frame, raised from the refresh tick
///
/// Overwrite semantics: a slow reader sees the newest frame only.
pub static FRAME_SYNC: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Replies queued for the uplink TX task
pub static OUTBOX: Channel<CriticalSectionRawMutex, PanelMessage, OUTBOX_SIZE> = Channel::new();
