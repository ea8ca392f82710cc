use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use gaslink_frame::{FrameConfig, FrameError, SensorReader};
use gaslink_transport::{ChunkSource, SerialSettings};
use tracing::{debug, info, warn};

use crate::cmd::StreamArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, print_stats, OutputFormat};

/// How long the main loop waits for input before rechecking for Ctrl-C.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(args: StreamArgs, format: OutputFormat, config: FrameConfig) -> CliResult<i32> {
    let input = open_input(&args.path)?;
    debug!(
        path = %args.path.display(),
        line = %SerialSettings::default().describe(),
        revision = config.revision.name(),
        buffer_capacity = config.buffer_capacity,
        "streaming frames"
    );

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    // Reads block in a helper thread so an idle line never hides Ctrl-C.
    let chunks = spawn_input_reader(input, config.read_chunk_size);
    let mut reader = SensorReader::with_config(ChunkSource::new(), config);
    let limit_reached = |printed: usize| args.count.is_some_and(|count| printed >= count);

    let mut printed = 0usize;
    let result = 'stream: loop {
        if !running.load(Ordering::SeqCst) {
            info!("interrupted");
            break Ok(SUCCESS);
        }
        if limit_reached(printed) {
            break Ok(SUCCESS);
        }

        match chunks.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(chunk)) => reader.get_mut().push(chunk),
            Ok(Err(err)) => break Err(io_error("read failed", err)),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => reader.get_mut().close(),
        }

        while !limit_reached(printed) {
            match reader.try_read_frame() {
                Ok(Some(frame)) => {
                    print_frame(&frame, format);
                    printed = printed.saturating_add(1);
                }
                Ok(None) => break,
                Err(FrameError::ConnectionClosed) => break 'stream Ok(SUCCESS),
                Err(err) if err.is_recoverable() && !args.strict => {
                    warn!(error = %err, "skipping frame");
                }
                Err(err) => break 'stream Err(frame_error("stream failed", err)),
            }
        }
    };

    if args.summary {
        print_stats(&reader.session().stats(), format);
    }
    result
}

fn open_input(path: &Path) -> CliResult<Box<dyn Read + Send>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(path)
        .map_err(|err| io_error(&format!("cannot open {}", path.display()), err))?;
    Ok(Box::new(file))
}

/// Forward chunks from `input` until end of stream or the first error.
///
/// The channel disconnects once the input is exhausted.
fn spawn_input_reader(
    mut input: Box<dyn Read + Send>,
    chunk_size: usize,
) -> Receiver<io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = vec![0u8; chunk_size.max(1)];
        loop {
            match input.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(Ok(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            }
        }
    });
    rx
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
