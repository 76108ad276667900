//! GPIO pin abstractions
//!
//! Provides the output pin trait that chip-specific HALs implement for
//! the panel's control and data lines.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. Every method is called from the refresh tick, so
/// implementations must not block.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_state() {
        let mut pin = MockPin { high: false };

        pin.set_state(true);
        assert!(pin.is_set_high());

        pin.set_state(false);
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn drive<P: OutputPin>(mut pin: P) -> bool {
            pin.set_high();
            pin.is_set_high()
        }

        let mut pin = MockPin { high: false };
        assert!(drive(&mut pin));
        assert!(pin.high);
    }
}
