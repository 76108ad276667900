//! Panel configuration types
//!
//! These types define the pin mapping, geometry and refresh timing of a
//! panel. Validation happens once at startup; nothing here is consulted
//! from the refresh tick.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::panel::PanelPins;
use crate::pixel::ROWS;
use crate::seed::DEFAULT_SEED;

/// Lowest accepted full-frame refresh rate; below this the panel flickers
pub const MIN_FRAME_RATE_HZ: u16 = 100;

/// Highest accepted full-frame refresh rate
pub const MAX_FRAME_RATE_HZ: u16 = 1000;

/// Default full-frame refresh rate (4 kHz row tick)
pub const DEFAULT_FRAME_RATE_HZ: u16 = 500;

/// Default column count (one 8-bit shift register per color)
pub const DEFAULT_COLUMNS: u16 = 8;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Pin string is not of the form `gpioNN` / `!gpioNN`
    InvalidPin,
    /// The same GPIO is assigned to two panel lines
    DuplicatePin(u8),
    /// Frame rate outside `MIN_FRAME_RATE_HZ..=MAX_FRAME_RATE_HZ`
    RefreshRateOutOfRange(u16),
    /// Configured column count differs from the compiled-in geometry
    ColumnMismatch { configured: u16, compiled: u16 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidSection => f.write_str("invalid section header"),
            ConfigError::InvalidValue => f.write_str("invalid value"),
            ConfigError::InvalidPin => f.write_str("pin must be \"gpioN\" or \"!gpioN\""),
            ConfigError::DuplicatePin(pin) => write!(f, "gpio{} assigned twice", pin),
            ConfigError::RefreshRateOutOfRange(hz) => write!(
                f,
                "frame rate {} Hz outside {}..={} Hz",
                hz, MIN_FRAME_RATE_HZ, MAX_FRAME_RATE_HZ
            ),
            ConfigError::ColumnMismatch {
                configured,
                compiled,
            } => write!(f, "{} columns configured, firmware built for {}", configured, compiled),
        }
    }
}

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Line is active-low (driven through an inverting buffer)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// GPIO assignment for every panel line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelPinConfig {
    pub mux0: PinConfig,
    pub mux1: PinConfig,
    pub mux2: PinConfig,
    pub enable: PinConfig,
    pub data_red: PinConfig,
    pub data_green: PinConfig,
    pub latch: PinConfig,
    pub shift: PinConfig,
}

impl Default for PanelPinConfig {
    fn default() -> Self {
        Self {
            mux2: PinConfig::new(2),
            mux1: PinConfig::new(3),
            mux0: PinConfig::new(4),
            enable: PinConfig::new(5),
            data_red: PinConfig::new(6),
            data_green: PinConfig::new(7),
            latch: PinConfig::new(8),
            shift: PinConfig::new(9),
        }
    }
}

impl PanelPinConfig {
    /// All lines in connector order
    pub fn all(&self) -> [PinConfig; 8] {
        [
            self.mux2,
            self.mux1,
            self.mux0,
            self.enable,
            self.data_red,
            self.data_green,
            self.latch,
            self.shift,
        ]
    }

    /// Reject a GPIO assigned to more than one line
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = self.all();
        for (i, a) in all.iter().enumerate() {
            if all[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(ConfigError::DuplicatePin(a.pin));
            }
        }
        Ok(())
    }

    /// Build the driver's pin set, resolving each configured line with `take`
    ///
    /// Stops at the first line `take` rejects.
    pub fn resolve<P, E>(
        &self,
        mut take: impl FnMut(PinConfig) -> Result<P, E>,
    ) -> Result<PanelPins<P>, E> {
        Ok(PanelPins {
            mux0: take(self.mux0)?,
            mux1: take(self.mux1)?,
            mux2: take(self.mux2)?,
            enable: take(self.enable)?,
            data_red: take(self.data_red)?,
            data_green: take(self.data_green)?,
            latch: take(self.latch)?,
            shift: take(self.shift)?,
        })
    }
}

/// Refresh timing derived from the full-frame rate
///
/// One tick scans one row, so the tick rate is `ROWS` times the frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawScanTiming"))]
pub struct ScanTiming {
    frame_rate_hz: u16,
}

/// Unchecked wire form of [`ScanTiming`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawScanTiming {
    frame_rate_hz: u16,
}

#[cfg(feature = "serde")]
impl TryFrom<RawScanTiming> for ScanTiming {
    type Error = ConfigError;

    fn try_from(raw: RawScanTiming) -> Result<Self, Self::Error> {
        ScanTiming::new(raw.frame_rate_hz)
    }
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }
}

impl ScanTiming {
    /// Timing for a full-frame rate in Hz
    pub fn new(frame_rate_hz: u16) -> Result<Self, ConfigError> {
        if !(MIN_FRAME_RATE_HZ..=MAX_FRAME_RATE_HZ).contains(&frame_rate_hz) {
            return Err(ConfigError::RefreshRateOutOfRange(frame_rate_hz));
        }
        Ok(Self { frame_rate_hz })
    }

    /// Full sweeps per second
    pub fn frame_rate_hz(&self) -> u16 {
        self.frame_rate_hz
    }

    /// Row ticks per second
    pub fn tick_rate_hz(&self) -> u32 {
        self.frame_rate_hz as u32 * ROWS as u32
    }

    /// Time budget of one tick
    pub fn tick_period_us(&self) -> u32 {
        1_000_000 / self.tick_rate_hz()
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Length of each color's shift-register chain
    pub columns: u16,
    /// Line assignment
    pub pins: PanelPinConfig,
    /// Refresh timing
    pub timing: ScanTiming,
    /// Accumulator seed
    pub seed: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            pins: PanelPinConfig::default(),
            timing: ScanTiming::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl PanelConfig {
    /// Check the configuration against the compiled-in column count
    pub fn validate(&self, compiled_columns: usize) -> Result<(), ConfigError> {
        if self.columns as usize != compiled_columns {
            return Err(ConfigError::ColumnMismatch {
                configured: self.columns,
                compiled: compiled_columns as u16,
            });
        }
        self.pins.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_matches_4khz_tick() {
        let timing = ScanTiming::default();
        assert_eq!(timing.frame_rate_hz(), 500);
        assert_eq!(timing.tick_rate_hz(), 4000);
        assert_eq!(timing.tick_period_us(), 250);
    }

    #[test]
    fn test_timing_range() {
        assert!(ScanTiming::new(100).is_ok());
        assert!(ScanTiming::new(1000).is_ok());
        assert_eq!(
            ScanTiming::new(99),
            Err(ConfigError::RefreshRateOutOfRange(99))
        );
        assert_eq!(
            ScanTiming::new(1001),
            Err(ConfigError::RefreshRateOutOfRange(1001))
        );

        assert_eq!(ScanTiming::new(100).unwrap().tick_period_us(), 1250);
        assert_eq!(ScanTiming::new(1000).unwrap().tick_period_us(), 125);
    }

    #[test]
    fn test_default_pins_are_distinct() {
        assert!(PanelPinConfig::default().validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_frame_rate() {
        use serde::de::value::{Error, MapDeserializer};

        let zero: MapDeserializer<_, Error> =
            MapDeserializer::new([("frame_rate_hz", 0u16)].into_iter());
        assert!(ScanTiming::deserialize(zero).is_err());

        let fast: MapDeserializer<_, Error> =
            MapDeserializer::new([("frame_rate_hz", 2000u16)].into_iter());
        assert!(ScanTiming::deserialize(fast).is_err());

        let ok: MapDeserializer<_, Error> =
            MapDeserializer::new([("frame_rate_hz", 250u16)].into_iter());
        let timing = ScanTiming::deserialize(ok).unwrap();
        assert_eq!(timing.tick_period_us(), 500);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::RefreshRateOutOfRange(60).to_string(),
            "frame rate 60 Hz outside 100..=1000 Hz"
        );
    }

    #[test]
    fn test_resolve_maps_each_line() {
        let mut pins = PanelPinConfig::default();
        pins.shift = PinConfig::inverted(15);

        let resolved = pins.resolve(|cfg| Ok::<_, ()>((cfg.pin, cfg.inverted))).unwrap();
        assert_eq!(resolved.mux0, (4, false));
        assert_eq!(resolved.mux2, (2, false));
        assert_eq!(resolved.shift, (15, true));

        let failed = pins.resolve(|cfg| if cfg.pin == 6 { Err(cfg.pin) } else { Ok(()) });
        assert_eq!(failed.err(), Some(6));
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut pins = PanelPinConfig::default();
        pins.shift = PinConfig::new(6); // same as data_red
        assert_eq!(pins.validate(), Err(ConfigError::DuplicatePin(6)));
    }

    #[test]
    fn test_column_mismatch() {
        let config = PanelConfig::default();
        assert!(config.validate(8).is_ok());
        assert_eq!(
            config.validate(16),
            Err(ConfigError::ColumnMismatch {
                configured: 8,
                compiled: 16
            })
        );
    }
}
