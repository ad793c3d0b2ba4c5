use helmfile_values::cli::commands::{CliArgs, Commands};
use helmfile_values::cli::handlers::{handle_config, handle_extract};
use helmfile_values::util::logging::{init_from_env, init_logging, parse_level, LoggingConfig};
use helmfile_values::{NAME, VERSION};

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Extract(extract_args) => handle_extract(extract_args, args.quiet),
        Commands::Config(config_args) => handle_config(config_args),
    };

    std::process::exit(exit_code);
}

/// Command-line flags override the level from the environment.
fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        init_from_env();
        return;
    };

    init_logging(LoggingConfig {
        level,
        ..LoggingConfig::from_env()
    });
}
