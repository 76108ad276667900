//! Panel refresh task
//!
//! Ticks the engine at the period requested through its `TickSource`.
//! Nothing here logs after startup; this task preempts everything else.

use defmt::*;
use ledmux_hal_rp2040::run_refresh;

use crate::panel::with_panel;

/// Refresh task - one engine tick per timer period
#[embassy_executor::task]
pub async fn refresh_task() {
    info!("Refresh task started");

    run_refresh(|| {
        with_panel(|matrix| {
            // A tick queued before a disable must not scan again
            if matrix.is_enabled() {
                matrix.tick();
            }
        });
    })
    .await
}
