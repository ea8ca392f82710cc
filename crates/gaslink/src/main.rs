mod cmd;
mod exit;
mod hex;
mod logging;
mod output;

use clap::Parser;
use gaslink_frame::FrameConfig;

use crate::cmd::{Command, RevisionArg};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gaslink", version, about = "Phasein gas analyzer frame decoder")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "GASLINK_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Slow-data layout and scaling used by the analyzer firmware.
    #[arg(
        long,
        value_name = "REVISION",
        default_value = "standard",
        env = "GASLINK_REVISION",
        global = true
    )]
    revision: RevisionArg,

    /// Receive buffer capacity in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = gaslink_frame::codec::DEFAULT_BUFFER_CAPACITY,
        env = "GASLINK_BUFFER_CAPACITY",
        global = true
    )]
    buffer_capacity: usize,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            revision: self.revision.into(),
            buffer_capacity: self.buffer_capacity,
            ..FrameConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = cli.frame_config();
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
