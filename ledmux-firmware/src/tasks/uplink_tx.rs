//! Host uplink transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use ledmux_protocol::MAX_PACKET_SIZE;

use crate::channels::OUTBOX;

/// Uplink TX task - sends queued replies to the host
#[embassy_executor::task]
pub async fn uplink_tx_task(mut tx: BufferedUartTx) {
    info!("Uplink TX task started");

    let mut buf = [0u8; MAX_PACKET_SIZE];

    loop {
        let msg = OUTBOX.receive().await;
        let len = match msg.to_packet().encode(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Failed to encode {:?}: {:?}", msg, e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send {:?}: {:?}", msg, e);
        } else {
            trace!("Sent {:?}", msg);
        }
    }
}
