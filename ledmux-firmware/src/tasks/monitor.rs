//! Refresh-rate monitor
//!
//! Counts frame-sync notifications and logs the measured frame rate once
//! per second, warning when it drops more than 10% below the configured rate.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker};

use crate::channels::FRAME_SYNC;
use crate::panel::with_panel;

/// Reporting interval
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[embassy_executor::task]
pub async fn monitor_task() {
    info!("Monitor task started");

    let mut ticker = Ticker::every(REPORT_INTERVAL);
    let mut latest: Option<u32> = None;
    let mut reported: Option<u32> = None;
    let mut window_start = Instant::now();

    loop {
        match select(FRAME_SYNC.wait(), ticker.next()).await {
            Either::First(frame) => latest = Some(frame),
            Either::Second(()) => {
                let elapsed_ms = window_start.elapsed().as_millis().max(1);
                window_start = Instant::now();

                match (reported, latest) {
                    (Some(prev), Some(now)) if prev != now => {
                        // Frame indices wrap; the difference does not
                        let frames = now.wrapping_sub(prev) as u64;
                        let measured = frames * 1000 / elapsed_ms;
                        let target = with_panel(|matrix| matrix.timing().frame_rate_hz()).unwrap_or(0);
                        debug!("Refresh: {} Hz (target {} Hz)", measured, target);
                        if measured * 10 < target as u64 * 9 {
                            warn!("Refresh falling behind: {} of {} Hz", measured, target);
                        }
                    }
                    _ => trace!("Refresh idle"),
                }
                reported = latest;
            }
        }
    }
}
