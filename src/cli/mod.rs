pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, ExtractArgs};
pub use handlers::{handle_config, handle_extract};
pub use output::{FileReport, OutputFormat, OutputFormatter};
