//! Host uplink receive task
//!
//! Receives packets from the host, stages uploaded rows and applies
//! lifecycle commands to the engine.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use ledmux_core::Framebuffer;
use ledmux_protocol::{HostCommand, NackReason, PacketParser, PanelMessage};

use crate::channels::OUTBOX;
use crate::panel::{with_panel, PANEL_COLS};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Uplink RX task - receives and parses packets from the host
#[embassy_executor::task]
pub async fn uplink_rx_task(mut rx: BufferedUartRx) {
    info!("Uplink RX task started");

    let mut parser = PacketParser::new();
    let mut staging = Framebuffer::<PANEL_COLS>::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };
        trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            match parser.feed(byte) {
                Ok(Some(packet)) => match HostCommand::from_packet(&packet) {
                    Ok(cmd) => handle_command(cmd, &mut staging),
                    Err(e) => {
                        warn!("Rejected host message: {:?}", e);
                        reply(PanelMessage::Nack(e.into()));
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!("Packet parse error: {:?}", e);
                    reply(PanelMessage::Nack(NackReason::Corrupt));
                }
            }
        }
    }
}

/// Apply one host command
///
/// Rows go to the staging buffer only; the engine sees them on `Present`,
/// all at once.
fn handle_command(cmd: HostCommand<'_>, staging: &mut Framebuffer<PANEL_COLS>) {
    match cmd {
        HostCommand::Ping => {
            trace!("PING received");
            reply(PanelMessage::Pong);
        }
        HostCommand::Row { row, pixels } => {
            if let Err(e) = staging.set_row_bytes(row as usize, pixels) {
                warn!("Row {}: {} bytes, panel needs {}", row, e.actual, e.expected);
                reply(PanelMessage::Nack(NackReason::RowLength));
            }
        }
        HostCommand::Present => present(staging),
        HostCommand::Clear => {
            staging.clear();
            present(staging);
        }
        HostCommand::Enable => {
            with_panel(|matrix| matrix.enable());
            info!("Panel enabled");
        }
        HostCommand::Disable => {
            with_panel(|matrix| matrix.disable());
            info!("Panel disabled");
        }
    }
}

fn present(staging: &Framebuffer<PANEL_COLS>) {
    let frame = with_panel(|matrix| {
        matrix.set_frame(staging);
        matrix.frame()
    });
    if let Some(frame) = frame {
        debug!("Frame presented at {}", frame);
        reply(PanelMessage::Presented { frame });
    }
}

fn reply(msg: PanelMessage) {
    if OUTBOX.try_send(msg).is_err() {
        warn!("Outbox full, dropping {:?}", msg);
    }
}
