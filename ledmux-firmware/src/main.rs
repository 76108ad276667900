//! ledmux - LED Matrix Panel Controller Firmware
//!
//! Main firmware binary for RP2040-based panel controllers. Scans an
//! 8-row red/green matrix at a fixed rate and accepts framebuffers from a
//! host over UART.
//!
//! Panel wiring and refresh rate come from `panel.toml`, which is
//! validated at build time and embedded into the image.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ledmux_core::config::{parse_panel_config, PanelConfig};
use ledmux_core::LedMatrix;
use ledmux_hal_rp2040::{PinBank, TickerSource};

use crate::panel::{on_frame_complete, with_panel, PANEL_COLS};

mod channels;
mod panel;
mod tasks;

/// Embedded panel configuration (compiled into firmware)
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Executor for the refresh task, preempting thread mode
static REFRESH_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    REFRESH_EXECUTOR.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ledmux firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, uart) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Panel: {} columns, {} Hz frame rate, {} us tick",
        config.columns,
        config.timing.frame_rate_hz(),
        config.timing.tick_period_us()
    );

    // Claim the panel lines; build.rs already rejected bad assignments
    let pins = match config.pins.resolve(|cfg| bank.output(cfg)) {
        Ok(pins) => pins,
        Err(e) => defmt::panic!("Panel pin unavailable: {:?}", e),
    };

    let matrix = LedMatrix::new(
        pins,
        TickerSource::new(),
        on_frame_complete as fn(u32),
        config.timing,
        config.seed,
    );
    panel::install(matrix);
    info!("Panel engine initialized");

    // Refresh runs above everything else so row timing stays even
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let refresh_spawner = REFRESH_EXECUTOR.start(interrupt::SWI_IRQ_1);
    refresh_spawner.spawn(tasks::refresh_task()).unwrap();

    // Setup UART for the host uplink
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(uart.uart, uart.tx, uart.rx, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host uplink");

    spawner.spawn(tasks::uplink_rx_task(rx)).unwrap();
    spawner.spawn(tasks::uplink_tx_task(tx)).unwrap();
    spawner.spawn(tasks::monitor_task()).unwrap();

    with_panel(|matrix| matrix.enable());
    info!("All tasks spawned, panel enabled");
}

/// Parse the embedded configuration
///
/// build.rs has already run this same parser over panel.toml, so a failure
/// here means the image is inconsistent; driving guessed pins is worse than
/// not starting.
fn load_config() -> PanelConfig {
    let config = match parse_panel_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => defmt::panic!("panel.toml parse error: {:?}", e),
    };

    if let Err(e) = config.validate(PANEL_COLS) {
        defmt::panic!("panel.toml does not match firmware geometry: {:?}", e);
    }

    config
}
