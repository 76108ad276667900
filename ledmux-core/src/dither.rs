//! Temporal dithering accumulator
//!
//! Reproduces an 8-bit intensity on a 1-bit output by carrying the
//! rounding error of every tick into the next one. Per pixel and per
//! channel, each tick:
//!
//! ```text
//! s        = residual + intensity   (0..=510)
//! data bit = s < 256                (high while no carry)
//! residual = s mod 256
//! ```
//!
//! The column drivers are active-low: a high data bit leaves the LED dark
//! and a carry lights it. Over many ticks the lit fraction converges to
//! `intensity / 256`, so intensity 0 is never lit and intensity 255 is lit
//! on 255 of every 256 ticks, never a literal 100%.

use crate::pixel::{Pixel, ROWS};
use crate::seed::SeedRng;

/// Receives one column's data-line levels, in increasing column order
///
/// Implemented by the panel pins (one shift-clock pulse per column) and by
/// test recorders.
pub trait ColumnSink {
    /// Shift one column's red and green bits into the chain
    fn shift_column(&mut self, red: bool, green: bool);
}

/// Advance one channel's accumulator by one tick
///
/// Returns the data-line level for this tick: `true` when
/// `residual + intensity` stayed below 256 (LED dark). The residual keeps
/// the low 8 bits of the sum.
#[inline(always)]
pub fn dither(residual: &mut u8, intensity: u8) -> bool {
    let (sum, carry) = residual.overflowing_add(intensity);
    *residual = sum;
    !carry
}

/// Per-pixel residual, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Residual {
    pub red: u8,
    pub green: u8,
}

impl Residual {
    /// Advance both channels for `pixel`, returning `(red, green)` data levels
    #[inline(always)]
    pub fn step(&mut self, pixel: Pixel) -> (bool, bool) {
        let red = dither(&mut self.red, pixel.red);
        let green = dither(&mut self.green, pixel.green);
        (red, green)
    }
}

/// Accumulator grid for a `ROWS` × `COLS` panel
///
/// Mutated only by [`DitherEngine::render_row`]; never exposed for writing.
#[derive(Debug, Clone)]
pub struct DitherEngine<const COLS: usize> {
    residuals: [[Residual; COLS]; ROWS],
}

impl<const COLS: usize> DitherEngine<COLS> {
    /// Create an engine with every residual seeded from `rng`
    pub fn seeded(rng: &mut SeedRng) -> Self {
        let mut residuals = [[Residual::default(); COLS]; ROWS];
        for row in residuals.iter_mut() {
            for cell in row.iter_mut() {
                cell.red = rng.next_u8();
                cell.green = rng.next_u8();
            }
        }
        Self { residuals }
    }

    /// Create an engine with explicit starting residuals
    pub const fn with_residuals(residuals: [[Residual; COLS]; ROWS]) -> Self {
        Self { residuals }
    }

    /// Read one residual (diagnostics and tests)
    pub fn residual(&self, row: usize, col: usize) -> Residual {
        self.residuals[row][col]
    }

    /// Dither one row and shift it out, column 0 first
    ///
    /// # Panics
    /// If `row >= ROWS`.
    pub fn render_row<S: ColumnSink>(&mut self, row: usize, pixels: &[Pixel; COLS], sink: &mut S) {
        for (cell, pixel) in self.residuals[row].iter_mut().zip(pixels.iter()) {
            let (red, green) = cell.step(*pixel);
            sink.shift_column(red, green);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Records shifted columns in order
    #[derive(Default)]
    struct Recorder {
        columns: Vec<(bool, bool)>,
    }

    impl ColumnSink for Recorder {
        fn shift_column(&mut self, red: bool, green: bool) {
            self.columns.push((red, green));
        }
    }

    /// Ticks on which the LED was lit (data line low)
    fn lit_count(intensity: u8, start: u8, ticks: u32) -> u32 {
        let mut residual = start;
        (0..ticks).filter(|_| !dither(&mut residual, intensity)).count() as u32
    }

    #[test]
    fn test_comparison_direction() {
        let mut r = 0u8;
        assert!(dither(&mut r, 255)); // 0 + 255 = 255 < 256
        assert_eq!(r, 255);

        let mut r = 1u8;
        assert!(!dither(&mut r, 255)); // 1 + 255 = 256 overflows
        assert_eq!(r, 0);
    }

    #[test]
    fn test_worked_row_example() {
        let pixels = [Pixel::new(255, 0), Pixel::new(0, 255), Pixel::new(128, 128)];
        let mut engine = DitherEngine::<3>::with_residuals([[Residual::default(); 3]; ROWS]);

        // Every sum is below 256 on the first tick, zero intensities included
        let mut tick1 = Recorder::default();
        engine.render_row(2, &pixels, &mut tick1);
        assert_eq!(tick1.columns, [(true, true), (true, true), (true, true)]);
        assert_eq!(engine.residual(2, 0), Residual { red: 255, green: 0 });
        assert_eq!(engine.residual(2, 1), Residual { red: 0, green: 255 });
        assert_eq!(engine.residual(2, 2), Residual { red: 128, green: 128 });

        let mut tick2 = Recorder::default();
        engine.render_row(2, &pixels, &mut tick2);
        // 255 + 255 carries; 128 + 128 = 256 carries and wraps to 0
        assert_eq!(tick2.columns, [(false, true), (true, false), (false, false)]);
        assert_eq!(engine.residual(2, 0), Residual { red: 254, green: 0 });
        assert_eq!(engine.residual(2, 2), Residual::default());
    }

    #[test]
    fn test_render_touches_only_selected_row() {
        let mut rng = SeedRng::new(3);
        let mut engine = DitherEngine::<4>::seeded(&mut rng);
        let before = engine.clone();

        let mut sink = Recorder::default();
        engine.render_row(5, &[Pixel::new(77, 33); 4], &mut sink);

        assert_eq!(sink.columns.len(), 4);
        for row in (0..ROWS).filter(|r| *r != 5) {
            for col in 0..4 {
                assert_eq!(engine.residual(row, col), before.residual(row, col));
            }
        }
    }

    #[test]
    fn test_zero_intensity_is_never_lit() {
        for start in [0u8, 1, 128, 255] {
            assert_eq!(lit_count(0, start, 100), 0);
        }
    }

    #[test]
    fn test_full_intensity_just_below_full_duty() {
        let ticks = 256 * 64;
        let lit = lit_count(255, 0, ticks);
        assert!(lit < ticks);
        assert!(lit * 256 > ticks * 254);
    }

    #[test]
    fn test_seeded_residuals_vary() {
        let mut rng = SeedRng::new(0x1234_5678);
        let engine = DitherEngine::<8>::seeded(&mut rng);
        let first = engine.residual(0, 0);
        let all_same = (0..ROWS)
            .flat_map(|r| (0..8).map(move |c| (r, c)))
            .all(|(r, c)| engine.residual(r, c) == first);
        assert!(!all_same);
    }

    proptest! {
        #[test]
        fn prop_duty_cycle_converges(intensity: u8, start: u8) {
            // A residual below 256 carries exactly `intensity` times per 256
            // ticks, so over 16 such windows the lit count is exact.
            let lit = lit_count(intensity, start, 256 * 16);
            prop_assert_eq!(lit, 16 * intensity as u32);
        }

        #[test]
        fn prop_duty_error_bounded(intensity: u8, start: u8, ticks in 1u32..2000) {
            let lit = lit_count(intensity, start, ticks) as i64;
            let ideal = ticks as i64 * intensity as i64;
            // |lit - ticks * p / 256| <= 1, kept in integers
            prop_assert!((lit * 256 - ideal).abs() <= 256);
        }

        #[test]
        fn prop_residual_stays_in_byte(intensity: u8, start: u8, ticks in 1u32..600) {
            let mut residual = start;
            let mut total = start as u32;
            for _ in 0..ticks {
                let before = residual as u32;
                let dark = dither(&mut residual, intensity);
                total += intensity as u32;
                prop_assert_eq!(residual as u32, total % 256);
                prop_assert_eq!(dark, before + (intensity as u32) < 256);
            }
        }
    }
}
