use gaslink_frame::codec::{CHECKSUM_OFFSET, FRAME_SIZE, PAYLOAD_RANGE};
use gaslink_frame::{compute_checksum, verify_checksum};

use crate::cmd::ChecksumArgs;
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::hex::parse_hex;
use crate::output::{print_checksum, ChecksumReport, OutputFormat};

pub fn run(args: ChecksumArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex.join(" "))?;
    let report = report(&bytes)?;
    print_checksum(&report, format);

    Ok(match report.valid {
        Some(false) => DATA_INVALID,
        _ => SUCCESS,
    })
}

fn report(bytes: &[u8]) -> CliResult<ChecksumReport> {
    match bytes.len() {
        CHECKSUM_OFFSET => Ok(ChecksumReport {
            length: bytes.len(),
            checksum: format!("0x{:02X}", compute_checksum(&bytes[PAYLOAD_RANGE])),
            actual: None,
            valid: None,
        }),
        FRAME_SIZE => Ok(ChecksumReport {
            length: bytes.len(),
            checksum: format!("0x{:02X}", compute_checksum(&bytes[PAYLOAD_RANGE])),
            actual: Some(format!("0x{:02X}", bytes[CHECKSUM_OFFSET])),
            valid: Some(verify_checksum(bytes)),
        }),
        other => Err(CliError::usage(format!(
            "checksum needs {CHECKSUM_OFFSET} or {FRAME_SIZE} bytes, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    const EXAMPLE: &str = "AA 55 03 00 00 00 00 00 00 00 00 00 06 40 00 FF 04 00 03 F5 BC";

    #[test]
    fn full_frame_verifies() {
        let report = report(&parse_hex(EXAMPLE).unwrap()).unwrap();
        assert_eq!(report.checksum, "0xBC");
        assert_eq!(report.actual.as_deref(), Some("0xBC"));
        assert_eq!(report.valid, Some(true));
    }

    #[test]
    fn frame_without_checksum_computes_it() {
        let mut bytes = parse_hex(EXAMPLE).unwrap();
        bytes.pop();
        let report = report(&bytes).unwrap();
        assert_eq!(report.checksum, "0xBC");
        assert_eq!(report.valid, None);
    }

    #[test]
    fn bad_sync_fails_verification() {
        let mut bytes = parse_hex(EXAMPLE).unwrap();
        bytes[0] = 0x00;
        assert_eq!(report(&bytes).unwrap().valid, Some(false));
    }

    #[test]
    fn wrong_length_is_usage_error() {
        let err = report(&[0xAA, 0x55]).err().unwrap();
        assert_eq!(err.code, USAGE);
    }
}
