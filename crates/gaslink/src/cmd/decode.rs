use gaslink_frame::{FrameConfig, SensorSession};
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS};
use crate::hex::{format_hex, parse_hex};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat, config: FrameConfig) -> CliResult<i32> {
    if args.hex.is_empty() {
        return Err(CliError::usage("decode requires frame bytes as hex"));
    }
    let bytes = parse_hex(&args.hex.join(" "))?;
    debug!(bytes = %format_hex(&bytes), revision = config.revision.name(), "decoding frame");

    let mut session = SensorSession::new(config);
    let frame = session
        .decode_and_merge(&bytes)
        .map_err(|err| frame_error("decode failed", err))?;

    print_frame(&frame, format);
    Ok(SUCCESS)
}
