//! Panel signal lines
//!
//! Owns the eight output lines of the panel connector and speaks the
//! physical protocol:
//!
//! ```text
//! row commit : LATCH high -> A0, A1, A2 -> LATCH low
//! per column : SHIFT low  -> RED -> GREEN -> SHIFT high
//! ```
//!
//! All levels here are logical; a [`SignalPin`] translates them for lines
//! wired through an inverting buffer.

use ledmux_hal::OutputPin;

use crate::dither::ColumnSink;
use crate::scanner::RowAddress;

/// Output pin with optional inversion
///
/// Controls a line that may be active-low on a given board. The logical
/// level passed in is always "asserted = high".
pub struct SignalPin<P> {
    pin: P,
    /// If true, asserted = pin LOW
    inverted: bool,
}

impl<P: OutputPin> SignalPin<P> {
    /// Wrap a pin
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the line is asserted when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Recover the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> OutputPin for SignalPin<P> {
    fn set_high(&mut self) {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high() != self.inverted
    }
}

/// The panel connector's output lines
pub struct PanelPins<P> {
    /// Row address bit 0
    pub mux0: P,
    /// Row address bit 1
    pub mux1: P,
    /// Row address bit 2
    pub mux2: P,
    /// Panel output enable
    pub enable: P,
    /// Red column data
    pub data_red: P,
    /// Green column data
    pub data_green: P,
    /// Row latch (commits shifted column data)
    pub latch: P,
    /// Column shift clock
    pub shift: P,
}

/// Panel driven through its shift-register chain
pub struct Panel<P> {
    pins: PanelPins<P>,
}

impl<P: OutputPin> Panel<P> {
    /// Take the lines and drive them to their idle state (all low, panel disabled)
    pub fn new(mut pins: PanelPins<P>) -> Self {
        pins.enable.set_low();
        pins.latch.set_low();
        pins.shift.set_low();
        pins.data_red.set_low();
        pins.data_green.set_low();
        pins.mux0.set_low();
        pins.mux1.set_low();
        pins.mux2.set_low();
        Self { pins }
    }

    /// Commit the shifted columns and select the row they belong to
    #[inline]
    pub fn latch_row(&mut self, address: RowAddress) {
        self.pins.latch.set_high();

        self.pins.mux0.set_state(address.a0);
        self.pins.mux1.set_state(address.a1);
        self.pins.mux2.set_state(address.a2);

        self.pins.latch.set_low();
    }

    /// Drive the panel output-enable line
    pub fn set_enabled(&mut self, enabled: bool) {
        self.pins.enable.set_state(enabled);
    }

    /// Check the panel output-enable line
    pub fn is_enabled(&self) -> bool {
        self.pins.enable.is_set_high()
    }
}

impl<P: OutputPin> ColumnSink for Panel<P> {
    #[inline]
    fn shift_column(&mut self, red: bool, green: bool) {
        self.pins.shift.set_low();
        self.pins.data_red.set_state(red);
        self.pins.data_green.set_state(green);
        self.pins.shift.set_high();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{trace_pins, Line};

    #[test]
    fn test_new_idles_all_lines_low() {
        let (pins, trace) = trace_pins();
        let panel = Panel::new(pins);

        assert!(!panel.is_enabled());
        assert_eq!(trace.borrow().len(), 8);
        assert!(trace.borrow().iter().all(|(_, level)| !level));
    }

    #[test]
    fn test_latch_row_sequence() {
        let (pins, trace) = trace_pins();
        let mut panel = Panel::new(pins);
        trace.borrow_mut().clear();

        panel.latch_row(RowAddress::from_row(6));

        assert_eq!(
            *trace.borrow(),
            [
                (Line::Latch, true),
                (Line::Mux0, false),
                (Line::Mux1, true),
                (Line::Mux2, true),
                (Line::Latch, false),
            ]
        );
    }

    #[test]
    fn test_shift_column_sequence() {
        let (pins, trace) = trace_pins();
        let mut panel = Panel::new(pins);
        trace.borrow_mut().clear();

        panel.shift_column(true, false);

        assert_eq!(
            *trace.borrow(),
            [
                (Line::Shift, false),
                (Line::Red, true),
                (Line::Green, false),
                (Line::Shift, true),
            ]
        );
    }

    #[test]
    fn test_inverted_signal_pin() {
        let (pins, trace) = trace_pins();
        let mut latch = SignalPin::new(pins.latch, true);
        trace.borrow_mut().clear();

        latch.set_high();
        assert!(latch.is_set_high());
        latch.set_low();
        assert!(latch.is_set_low());

        // Physical levels are the opposite of the logical ones
        assert_eq!(*trace.borrow(), [(Line::Latch, false), (Line::Latch, true)]);
    }

    #[test]
    fn test_plain_signal_pin() {
        let (pins, trace) = trace_pins();
        let mut shift = SignalPin::new(pins.shift, false);
        trace.borrow_mut().clear();

        shift.set_high();
        assert!(shift.is_set_high());
        assert_eq!(*trace.borrow(), [(Line::Shift, true)]);
        assert!(shift.into_inner().is_set_high());
    }
}
