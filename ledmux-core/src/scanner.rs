//! Row scanner state machine
//!
//! A modulo-8 row cursor. Each tick commits the row whose columns were
//! shifted on the previous tick, then advances. Row 7 is a dead slot: the
//! tick that lands on it shifts nothing and reports a completed frame
//! instead, so frame-sync notifications arrive exactly every `ROWS` ticks.

use crate::pixel::ROWS;

/// Row index reserved for the frame-complete notification
pub const SYNC_ROW: u8 = (ROWS - 1) as u8;

const ROW_MASK: u8 = (ROWS - 1) as u8;

/// What the current tick must do after the row latch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanSlot {
    /// Dither and shift out this framebuffer row
    Render(usize),
    /// Sweep finished; notify with this frame index, shift nothing
    Sync(u32),
}

/// Row-select bus levels, one line per address bit
///
/// Each line is taken from its own bit of the row index; the bit-to-pin
/// mapping must stay one-to-one with the panel's address decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowAddress {
    pub a0: bool,
    pub a1: bool,
    pub a2: bool,
}

impl RowAddress {
    pub const fn from_row(row: u8) -> Self {
        Self {
            a0: row & 0b001 != 0,
            a1: row & 0b010 != 0,
            a2: row & 0b100 != 0,
        }
    }
}

/// Row cursor plus completed-frame counter
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowScanner {
    row: u8,
    frame: u32,
}

impl RowScanner {
    pub const fn new() -> Self {
        Self { row: 0, frame: 0 }
    }

    /// Current row cursor (0..ROWS)
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Number of completed sweeps, wrapping at `u32::MAX`
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Address lines for the row under the cursor
    pub fn address(&self) -> RowAddress {
        RowAddress::from_row(self.row)
    }

    /// Move the cursor to the next row and report what to do there
    pub fn advance(&mut self) -> ScanSlot {
        self.row = (self.row + 1) & ROW_MASK;

        if self.row == SYNC_ROW {
            let frame = self.frame;
            self.frame = self.frame.wrapping_add(1);
            ScanSlot::Sync(frame)
        } else {
            ScanSlot::Render(self.row as usize)
        }
    }

    /// Return the cursor to row 0, keeping the frame counter
    pub fn reset_row(&mut self) {
        self.row = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_ticks_cover_every_row_once() {
        let mut scanner = RowScanner::new();
        let slots: Vec<ScanSlot> = (0..8).map(|_| scanner.advance()).collect();

        assert_eq!(
            slots,
            [
                ScanSlot::Render(1),
                ScanSlot::Render(2),
                ScanSlot::Render(3),
                ScanSlot::Render(4),
                ScanSlot::Render(5),
                ScanSlot::Render(6),
                ScanSlot::Sync(0),
                ScanSlot::Render(0),
            ]
        );
        assert_eq!(scanner.row(), 0);
        assert_eq!(scanner.frame(), 1);
    }

    #[test]
    fn test_any_eight_ticks_hold_one_sync() {
        let mut scanner = RowScanner::new();
        for start in 0..ROWS {
            let frame_before = scanner.frame();
            let syncs = (0..ROWS)
                .filter(|_| matches!(scanner.advance(), ScanSlot::Sync(_)))
                .count();
            assert_eq!(syncs, 1, "window starting at tick {}", start);
            assert_eq!(scanner.frame(), frame_before + 1);
            scanner.advance();
        }
    }

    #[test]
    fn test_frame_counter_wraps() {
        let mut scanner = RowScanner {
            row: SYNC_ROW - 1,
            frame: u32::MAX,
        };
        assert_eq!(scanner.advance(), ScanSlot::Sync(u32::MAX));
        assert_eq!(scanner.frame(), 0);
    }

    #[test]
    fn test_reset_row_keeps_frame() {
        let mut scanner = RowScanner::new();
        for _ in 0..11 {
            scanner.advance();
        }
        scanner.reset_row();
        assert_eq!(scanner.row(), 0);
        assert_eq!(scanner.frame(), 1);
    }

    #[test]
    fn test_row_address_bits() {
        assert_eq!(
            RowAddress::from_row(0),
            RowAddress { a0: false, a1: false, a2: false }
        );
        assert_eq!(
            RowAddress::from_row(5),
            RowAddress { a0: true, a1: false, a2: true }
        );
        assert_eq!(
            RowAddress::from_row(6),
            RowAddress { a0: false, a1: true, a2: true }
        );
        assert_eq!(
            RowAddress::from_row(7),
            RowAddress { a0: true, a1: true, a2: true }
        );
    }
}
