//! Decode frames from an async reader with `FramedRead`.
//!
//! Run with:
//!   cargo run --example async-replay --features async

use futures_util::StreamExt;
use gaslink::frame::{encode_frame, ProtocolRevision, SensorCodec};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::FramedRead;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (mut tx, rx) = tokio::io::duplex(64);

    let writer = tokio::spawn(async move {
        for id in 0..10u8 {
            let frame = encode_frame(
                id,
                0,
                [400, 0, 0, 0, 2100],
                [id; 6],
                ProtocolRevision::Standard,
            );
            // Deliver each frame in two writes to exercise resynchronization.
            tx.write_all(&frame[..7]).await?;
            tx.write_all(&frame[7..]).await?;
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut frames = FramedRead::new(rx, SensorCodec::default());
    while let Some(frame) = frames.next().await {
        let frame = frame?;
        println!(
            "frame {} co2={:?} slow={:?}",
            frame.frame_id, frame.waveform.co2, frame.slow
        );
    }

    writer.await??;
    let stats = frames.decoder().session().stats();
    eprintln!("decoded {} frames", stats.frames_decoded);
    Ok(())
}
