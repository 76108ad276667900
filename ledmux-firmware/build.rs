//! Build script for ledmux-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time, and checks that the firmware's
//!   own subset parser reads the same values
//! - Generates the compile-time panel geometry from panel.toml

use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Panel lines that must map to distinct GPIOs
const PIN_KEYS: [&str; 8] = [
    "mux0",
    "mux1",
    "mux2",
    "enable",
    "data_red",
    "data_green",
    "latch",
    "shift",
];

/// GPIOs used by the uplink UART
const RESERVED_PINS: [i64; 2] = [0, 1];

/// Widest panel whose row still fits one uplink packet (1 + 2 * cols <= 250)
const MAX_COLUMNS: i64 = 124;

const MIN_FRAME_RATE_HZ: i64 = 100;
const MAX_FRAME_RATE_HZ: i64 = 1000;

fn main() {
    setup_linker();
    let columns = validate_config();
    write_geometry(columns);
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Emit `PANEL_COLS` so the framebuffer size always matches panel.toml
fn write_geometry(columns: i64) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("geometry.rs")).unwrap();
    writeln!(f, "/// Panel width in columns, from panel.toml").unwrap();
    writeln!(f, "pub const PANEL_COLS: usize = {};", columns).unwrap();
}

/// Validate panel.toml and return the column count
fn validate_config() -> i64 {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panel.toml configuration file.          ║\n\
            ║  Please create one in the ledmux-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let columns = validate_panel(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_timing(&config, &mut errors);
    if errors.is_empty() {
        check_runtime_parser(&config_content, &config, columns, &mut errors);
    }
    report_errors(&errors);

    println!("cargo:warning=panel.toml validated successfully ({} columns)", columns);
    columns
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let body = errors
        .iter()
        .map(|e| format_error_lines(e))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: panel.toml validation failed                             ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        body
    );
}

fn validate_panel(config: &toml::Value, errors: &mut Vec<String>) -> i64 {
    let Some(panel) = config.get("panel") else {
        return 8;
    };

    let columns = match panel.get("columns") {
        None => 8,
        Some(toml::Value::Integer(n)) if (1..=MAX_COLUMNS).contains(n) => *n,
        Some(other) => {
            errors.push(format!("[panel] columns must be 1..={}, got {}", MAX_COLUMNS, other));
            8
        }
    };

    match panel.get("seed") {
        None => {}
        Some(toml::Value::Integer(n)) if (0..=u32::MAX as i64).contains(n) => {}
        Some(other) => errors.push(format!("[panel] seed must be a u32, got {}", other)),
    }

    columns
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = config.get("pins") else {
        return;
    };

    let mut used: HashMap<i64, &str> = HashMap::new();
    for key in PIN_KEYS {
        let Some(value) = pins.get(key) else {
            continue;
        };
        let Some(pin) = value.as_str().and_then(parse_pin) else {
            errors.push(format!("[pins] {} = {} is not \"gpioN\" or \"!gpioN\"", key, value));
            continue;
        };
        if !(0..30).contains(&pin) {
            errors.push(format!("[pins] {}: gpio{} does not exist", key, pin));
        } else if RESERVED_PINS.contains(&pin) {
            errors.push(format!("[pins] {}: gpio{} is reserved for the uplink UART", key, pin));
        } else if let Some(other) = used.insert(pin, key) {
            errors.push(format!("[pins] {} and {} both use gpio{}", other, key, pin));
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(rate) = config.get("timing").and_then(|t| t.get("frame_rate_hz")) else {
        return;
    };
    match rate.as_integer() {
        Some(hz) if (MIN_FRAME_RATE_HZ..=MAX_FRAME_RATE_HZ).contains(&hz) => {}
        _ => errors.push(format!(
            "[timing] frame_rate_hz must be {}..={}, got {}",
            MIN_FRAME_RATE_HZ, MAX_FRAME_RATE_HZ, rate
        )),
    }
}

/// Run the parser the firmware uses at startup and require it to agree
/// with `toml`, so nothing the build accepts falls back or reads differently
fn check_runtime_parser(content: &str, config: &toml::Value, columns: i64, errors: &mut Vec<String>) {
    let parsed = match ledmux_core::config::parse_panel_config(content) {
        Ok(parsed) => parsed,
        Err(e) => {
            errors.push(format!("firmware parser rejects panel.toml: {}", e));
            return;
        }
    };

    if parsed.columns as i64 != columns {
        errors.push(format!(
            "[panel] columns: firmware parser reads {}, toml reads {}",
            parsed.columns, columns
        ));
    }

    let seed = config.get("panel").and_then(|p| p.get("seed")).and_then(|v| v.as_integer());
    if let Some(seed) = seed {
        if parsed.seed as i64 != seed {
            errors.push(format!("[panel] seed: firmware parser reads {}, toml reads {}", parsed.seed, seed));
        }
    }

    let rate = config
        .get("timing")
        .and_then(|t| t.get("frame_rate_hz"))
        .and_then(|v| v.as_integer());
    if let Some(rate) = rate {
        let runtime = parsed.timing.frame_rate_hz() as i64;
        if runtime != rate {
            errors.push(format!("[timing] frame_rate_hz: firmware parser reads {}, toml reads {}", runtime, rate));
        }
    }

    let p = &parsed.pins;
    let runtime_pins = [
        ("mux0", p.mux0),
        ("mux1", p.mux1),
        ("mux2", p.mux2),
        ("enable", p.enable),
        ("data_red", p.data_red),
        ("data_green", p.data_green),
        ("latch", p.latch),
        ("shift", p.shift),
    ];
    let table = config.get("pins");
    for (key, runtime) in runtime_pins {
        let Some(text) = table.and_then(|t| t.get(key)).and_then(|v| v.as_str()) else {
            continue;
        };
        let inverted = text.trim().starts_with('!');
        if parse_pin(text) != Some(runtime.pin as i64) || inverted != runtime.inverted {
            errors.push(format!(
                "[pins] {}: firmware parser reads {}gpio{}, toml reads {}",
                key,
                if runtime.inverted { "!" } else { "" },
                runtime.pin,
                text
            ));
        }
    }
}

fn parse_pin(s: &str) -> Option<i64> {
    let s = s.trim();
    let s = s.strip_prefix('!').unwrap_or(s);
    s.strip_prefix("gpio")?.parse().ok()
}
