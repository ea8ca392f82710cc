//! Replay one slow-data cycle through a blocking reader and print the
//! aggregate after every frame.
//!
//! Run with:
//!   cargo run --example replay
//!
//! Pass a capture file to replay recorded bytes instead:
//!   cargo run --example replay -- capture.bin

use std::fs::File;
use std::io::{Cursor, Read};

use gaslink::frame::{encode_frame, FrameError, ProtocolRevision, SensorReader};
use gaslink::transport::ReadSource;

fn synthetic_cycle() -> Vec<u8> {
    let slow: [[u8; 6]; 10] = [
        [0, 0, 0xFF, 0xFF, 21, 0],
        [38, 0, 0xFF, 0xFF, 19, 0],
        [12, 0, 0xFF, 0xFF, 20, 0],
        [14, 2, 4, 0, 0x03, 0xF5],
        [2, 0, 0, 0, 0, 0],
        [0x43, 0, 0x01, 0x02, 0x02, 0x10],
        [0x30, 0x39, 0, 0, 0, 0],
        [0; 6],
        [0; 6],
        [0; 6],
    ];
    let mut bytes = vec![0x13, 0x37];
    for (id, window) in slow.iter().enumerate() {
        let status = if id == 0 { 0x01 } else { 0x00 };
        bytes.extend(encode_frame(
            id as u8,
            status,
            [520, 0, 0xFFFF, 0xFFFF, 2050],
            *window,
            ProtocolRevision::Standard,
        ));
    }
    bytes
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(Cursor::new(synthetic_cycle())),
    };

    let mut reader = SensorReader::new(ReadSource::new(input));
    reader.session_mut().set_hook(|wave, status, slow| {
        println!(
            "id={:?} co2={:?} o2={:?} flags={:?} agent={}",
            slow.last_frame_id,
            wave.co2,
            wave.o2,
            status.active_flags(),
            slow.general.primary_agent.name()
        );
        Ok(())
    });

    loop {
        match reader.read_frame() {
            Ok(_) => {}
            Err(FrameError::ConnectionClosed) => break,
            Err(e) if e.is_recoverable() => eprintln!("skipped: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    let stats = reader.session().stats();
    eprintln!(
        "decoded {} frames, dropped {} garbage bytes",
        stats.frames_decoded, stats.garbage_bytes
    );
    eprintln!("final aggregate: {:#?}", reader.session().slow_data());
    Ok(())
}
