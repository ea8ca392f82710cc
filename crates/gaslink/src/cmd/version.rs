use gaslink_frame::FRAME_SIZE;
use gaslink_transport::SerialSettings;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("gaslink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: gaslink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("GASLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("GASLINK_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "features: async={}, serde={}, cli=true",
        cfg!(feature = "async"),
        cfg!(feature = "serde")
    );
    println!("revisions: standard (default), legacy");

    let line = SerialSettings::default();
    println!(
        "line: {} (frame every {:?}, {} bytes take {:?})",
        line.describe(),
        line.frame_interval,
        FRAME_SIZE,
        line.transfer_time(FRAME_SIZE)
    );

    Ok(SUCCESS)
}
