use clap::Parser;
use std::process::ExitCode;
use tracing::warn;

use zai_video_router::{
    cli::{handle_command, CliArgs},
    utils::setup_logging,
};

/// Conventional exit status after SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = setup_logging(args.log_level(), args.show_timestamps(), args.should_use_color()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    // Dropping the command future on Ctrl-C removes any scratch directory it owns
    tokio::select! {
        outcome = handle_command(&args) => match outcome {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}
