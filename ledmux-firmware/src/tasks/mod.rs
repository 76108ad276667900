//! Embassy async tasks
//!
//! The refresh task runs on the high-priority interrupt executor; the
//! others run in thread mode and communicate via channels/signals.

pub mod monitor;
pub mod refresh;
pub mod uplink_rx;
pub mod uplink_tx;

pub use monitor::monitor_task;
pub use refresh::refresh_task;
pub use uplink_rx::uplink_rx_task;
pub use uplink_tx::uplink_tx_task;
