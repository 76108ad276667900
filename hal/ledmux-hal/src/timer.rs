//! Periodic tick source abstraction
//!
//! The panel refresh runs entirely inside a periodic callback. This trait
//! lets the engine start and stop that callback without knowing whether it
//! is a hardware timer interrupt, a high-priority executor, or a test stub.

/// Periodic tick source driving the panel refresh
///
/// # Contract
///
/// - The callback must never be re-entered: a tick runs to completion
///   before the next one may start. A tick that cannot be delivered on time
///   is dropped by the source, never queued.
/// - [`TickSource::stop`] is synchronous: once it returns, no further tick
///   may be delivered until [`TickSource::start`] is called again.
pub trait TickSource {
    /// Begin delivering ticks every `period_us` microseconds
    ///
    /// Calling `start` on a running source restarts it with the new period.
    fn start(&mut self, period_us: u32);

    /// Stop delivering ticks
    fn stop(&mut self);

    /// Check whether ticks are currently being delivered
    fn is_running(&self) -> bool;
}
