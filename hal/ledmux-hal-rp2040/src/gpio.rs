//! GPIO output adapter

use embassy_rp::gpio::Output;
use ledmux_hal::OutputPin;

/// Push-pull GPIO output driving one panel line
pub struct RpOutput(Output<'static>);

impl RpOutput {
    pub fn new(output: Output<'static>) -> Self {
        Self(output)
    }

    pub fn into_inner(self) -> Output<'static> {
        self.0
    }
}

impl OutputPin for RpOutput {
    #[inline]
    fn set_high(&mut self) {
        self.0.set_high();
    }

    #[inline]
    fn set_low(&mut self) {
        self.0.set_low();
    }

    #[inline]
    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
