use clap::{Args, Subcommand, ValueEnum};
use gaslink_frame::{FrameConfig, ProtocolRevision};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one frame given as hex.
    Decode(DecodeArgs),
    /// Decode every frame in a capture file or stdin.
    Stream(StreamArgs),
    /// Compute and verify a frame checksum.
    Checksum(ChecksumArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: FrameConfig) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format, config),
        Command::Stream(args) => stream::run(args, format, config),
        Command::Checksum(args) => checksum::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Protocol revision as spelled on the command line.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum RevisionArg {
    /// Slow data at offset 14, unscaled single-byte concentrations.
    Standard,
    /// Slow data at offset 13, single-byte concentrations in tenths.
    Legacy,
}

impl From<RevisionArg> for ProtocolRevision {
    fn from(arg: RevisionArg) -> Self {
        match arg {
            RevisionArg::Standard => ProtocolRevision::Standard,
            RevisionArg::Legacy => ProtocolRevision::Legacy,
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex (e.g. "AA 55 03 00 ...").
    pub hex: Vec<String>,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Capture file to read, or "-" for stdin.
    #[arg(default_value = "-")]
    pub path: PathBuf,
    /// Exit after decoding N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Print session counters when the stream ends.
    #[arg(long)]
    pub summary: bool,
    /// Stop at the first checksum or framing error.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Frame bytes as hex: 21 bytes to verify, or 20 to compute the
    /// checksum byte.
    pub hex: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
