//! Config-driven pin allocation
//!
//! Panel lines come from `panel.toml` as GPIO numbers, so pins are handed
//! out by number at startup instead of being named in code.

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::peripherals::{PIN_0, PIN_1, UART0};
use embassy_rp::{Peri, Peripherals};
use ledmux_core::config::PinConfig;
use ledmux_core::SignalPin;

use crate::gpio::RpOutput;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// GPIOs kept back for the host uplink UART (TX, RX)
pub const UART_PINS: [u8; 2] = [0, 1];

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin reserved for the uplink UART
    Reserved(u8),
}

/// Peripherals for the host uplink
pub struct UartPeripherals {
    pub uart: Peri<'static, UART0>,
    pub tx: Peri<'static, PIN_0>,
    pub rx: Peri<'static, PIN_1>,
}

/// Every free GPIO, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Split the chip peripherals into the pin bank and the uplink UART
    pub fn from_peripherals(p: Peripherals) -> (Self, UartPeripherals) {
        let bank = Self {
            pins: [
                None,
                None,
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };
        let uart = UartPeripherals {
            uart: p.UART0,
            tx: p.PIN_0,
            rx: p.PIN_1,
        };
        (bank, uart)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if UART_PINS.contains(&pin_num) {
            return Err(PinError::Reserved(pin_num));
        }
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin(pin_num))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }

    /// Take a configured panel line as an output
    ///
    /// The pin starts at its logical low level, so an active-low line is
    /// driven high from the first instant.
    pub fn output(&mut self, cfg: PinConfig) -> Result<SignalPin<RpOutput>, PinError> {
        let pin = self.take(cfg.pin)?;
        let level = if cfg.inverted { Level::High } else { Level::Low };
        Ok(SignalPin::new(RpOutput::new(Output::new(pin, level)), cfg.inverted))
    }
}
