//! Minimal `panel.toml` parser
//!
//! Handles only the subset the panel configuration needs. It does NOT
//! support the full TOML language.
//!
//! Supported:
//! - `[panel]`, `[pins]` and `[timing]` section headers
//! - `key = value` pairs (basic or literal string, integer)
//! - Hex integers (`0x...`) and `_` digit separators
//! - Comments (`# ...`), including trailing ones
//!
//! Keys not listed here are ignored so newer config files still load.
//!
//! ```toml
//! [panel]
//! columns = 8
//! seed = 0x2545F491
//!
//! [pins]
//! mux0 = "gpio4"
//! enable = "!gpio5"
//!
//! [timing]
//! frame_rate_hz = 500
//! ```

use super::types::{ConfigError, PanelConfig, PinConfig, ScanTiming};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Panel,
    Pins,
    Timing,
}

/// Parse `panel.toml` text, starting from defaults
///
/// Every setting is optional; omitted ones keep their [`PanelConfig::default`]
/// value. The result is not yet checked against the compiled geometry, see
/// [`PanelConfig::validate`].
pub fn parse_panel_config(input: &str) -> Result<PanelConfig, ConfigError> {
    let mut config = PanelConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ConfigError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    config.pins.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "panel" => Ok(Section::Panel),
        "pins" => Ok(Section::Pins),
        "timing" => Ok(Section::Timing),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PanelConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Root => {}
        Section::Panel => match key {
            "columns" => {
                let columns: u16 = parse_int(value)?;
                if columns == 0 {
                    return Err(ConfigError::InvalidValue);
                }
                config.columns = columns;
            }
            "seed" => config.seed = parse_int(value)?,
            _ => {}
        },
        Section::Pins => {
            let pins = &mut config.pins;
            let slot = match key {
                "mux0" => &mut pins.mux0,
                "mux1" => &mut pins.mux1,
                "mux2" => &mut pins.mux2,
                "enable" => &mut pins.enable,
                "data_red" => &mut pins.data_red,
                "data_green" => &mut pins.data_green,
                "latch" => &mut pins.latch,
                "shift" => &mut pins.shift,
                _ => return Ok(()),
            };
            *slot = parse_pin(value)?;
        }
        Section::Timing => {
            if key == "frame_rate_hz" {
                config.timing = ScanTiming::new(parse_int(value)?)?;
            }
        }
    }
    Ok(())
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
    // Basic ("...") and literal ('...') strings
    if quoted('"') || quoted('\'') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ConfigError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for ch in value.chars().filter(|c| *c != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }

    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else {
        digits.parse::<u64>()
    };

    let wide = parsed.map_err(|_| ConfigError::InvalidValue)?;
    T::try_from(wide).map_err(|_| ConfigError::InvalidValue)
}

fn parse_pin(value: &str) -> Result<PinConfig, ConfigError> {
    let s = parse_string(value);

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    // Parse "gpioNN"
    let num = s.strip_prefix("gpio").ok_or(ConfigError::InvalidPin)?;
    let pin: u8 = num.parse().map_err(|_| ConfigError::InvalidPin)?;

    Ok(PinConfig { pin, inverted })
}
