//! Panel refresh engine
//!
//! [`LedMatrix`] owns everything the refresh tick touches: the panel
//! lines, the framebuffer, the dither accumulators and the row scanner.
//! One instance drives one physical panel.
//!
//! # Concurrency contract
//!
//! [`LedMatrix::tick`] is called from the tick source's context (a timer
//! interrupt or a high-priority executor). It never blocks, allocates or
//! logs. Because every operation takes `&mut self`, a caller sharing the
//! engine between the tick context and application code must wrap it in
//! a critical-section mutex; that is what makes [`LedMatrix::set_frame`]
//! atomic with respect to the tick and [`LedMatrix::disable`] synchronous.

use ledmux_hal::{OutputPin, TickSource};

use crate::config::ScanTiming;
use crate::dither::DitherEngine;
use crate::panel::{Panel, PanelPins};
use crate::pixel::{FrameSizeError, Framebuffer};
use crate::scanner::{RowScanner, ScanSlot};
use crate::seed::SeedRng;

/// Frame-complete notification
///
/// Called once per full sweep, from the tick context, with the index of the
/// frame that just finished. Implementations must be fast and must not
/// block; a stalled callback delays every following row.
pub trait FrameSync {
    fn frame_complete(&mut self, frame: u32);
}

impl<F: FnMut(u32)> FrameSync for F {
    fn frame_complete(&mut self, frame: u32) {
        self(frame)
    }
}

/// Row-multiplexed two-color LED matrix
pub struct LedMatrix<P, T, S, const COLS: usize> {
    panel: Panel<P>,
    ticker: T,
    sync: S,
    framebuffer: Framebuffer<COLS>,
    dither: DitherEngine<COLS>,
    scanner: RowScanner,
    timing: ScanTiming,
    enabled: bool,
}

impl<P, T, S, const COLS: usize> LedMatrix<P, T, S, COLS>
where
    P: OutputPin,
    T: TickSource,
    S: FrameSync,
{
    /// Initialize the engine
    ///
    /// Drives every panel line to idle with the panel disabled, clears the
    /// framebuffer, seeds each accumulator cell independently from `seed`
    /// and resets the row cursor and frame counter. The tick source is not
    /// started until [`LedMatrix::enable`].
    pub fn new(pins: PanelPins<P>, ticker: T, sync: S, timing: ScanTiming, seed: u32) -> Self {
        let mut rng = SeedRng::new(seed);
        Self {
            panel: Panel::new(pins),
            ticker,
            sync,
            framebuffer: Framebuffer::new(),
            dither: DitherEngine::seeded(&mut rng),
            scanner: RowScanner::new(),
            timing,
            enabled: false,
        }
    }

    /// Start periodic refresh and switch the panel on
    ///
    /// Enabling a running engine restarts the tick source with the
    /// configured period.
    pub fn enable(&mut self) {
        self.ticker.start(self.timing.tick_period_us());
        self.panel.set_enabled(true);
        self.enabled = true;
    }

    /// Switch the panel off, stop refresh and flush blank data
    ///
    /// After the tick source has stopped, the cursor is reset, the
    /// framebuffer cleared and exactly one tick is run synchronously so the
    /// shift registers hold dark columns instead of the last rendered row.
    /// The cursor is left at row 0.
    pub fn disable(&mut self) {
        self.panel.set_enabled(false);
        self.ticker.stop();
        self.enabled = false;

        self.scanner.reset_row();
        self.framebuffer.clear();
        self.tick();
        self.scanner.reset_row();
    }

    /// Replace the whole framebuffer
    pub fn set_frame(&mut self, frame: &Framebuffer<COLS>) {
        self.framebuffer.clone_from(frame);
    }

    /// Replace the whole framebuffer from the flat `[r, g, ...]` layout
    ///
    /// Fails without touching the current frame if `bytes` is not exactly
    /// `ROWS * COLS * 2` long.
    pub fn set_frame_bytes(&mut self, bytes: &[u8]) -> Result<(), FrameSizeError> {
        self.framebuffer = Framebuffer::from_bytes(bytes)?;
        Ok(())
    }

    /// Run one refresh tick
    ///
    /// Commits the row shifted on the previous tick, advances the cursor,
    /// then either shifts out the new row or, on the sync slot, reports the
    /// completed frame.
    pub fn tick(&mut self) {
        self.panel.latch_row(self.scanner.address());

        match self.scanner.advance() {
            ScanSlot::Sync(frame) => self.sync.frame_complete(frame),
            ScanSlot::Render(row) => {
                self.dither
                    .render_row(row, self.framebuffer.row(row), &mut self.panel)
            }
        }
    }

    /// Check whether refresh is running
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current row cursor
    pub fn row(&self) -> u8 {
        self.scanner.row()
    }

    /// Completed sweeps so far
    pub fn frame(&self) -> u32 {
        self.scanner.frame()
    }

    /// Configured refresh timing
    pub fn timing(&self) -> ScanTiming {
        self.timing
    }

    /// Current framebuffer contents
    pub fn framebuffer(&self) -> &Framebuffer<COLS> {
        &self.framebuffer
    }

    /// Borrow the tick source
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Borrow the panel lines
    pub fn panel(&self) -> &Panel<P> {
        &self.panel
    }
}
