use crate::config::NonScalarFields;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Extract container image references from helmfile in-line values
#[derive(Parser, Debug)]
#[command(
    name = "helmfile-values",
    about = "Extract container image references from helmfile in-line values",
    version,
    author,
    long_about = "helmfile-values scans helmfile state files for container images declared in \
                  the in-line values of releases and nested helmfiles, and reports them as \
                  docker dependencies ready for in-place updates."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract image dependencies",
        long_about = "Extracts image dependencies from helmfile state files. Files are always \
                      extracted; directories are searched for files matching the manager's \
                      file patterns.\n\n\
                      Examples:\n  \
                      helmfile-values extract\n  \
                      helmfile-values extract deploy/helmfile.yaml\n  \
                      helmfile-values extract . --format json\n  \
                      helmfile-values extract --nested-values --non-scalar-fields reject"
    )]
    Extract(ExtractArgs),

    #[command(
        about = "Show effective configuration",
        long_about = "Prints the manager defaults and extraction options after applying \
                      environment variables."
    )]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(
        value_name = "PATH",
        help = "Files or directories to extract from (defaults to current directory)"
    )]
    pub paths: Vec<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Also search nested keys of in-line values")]
    pub nested_values: bool,

    #[arg(
        long,
        value_name = "POLICY",
        value_parser = parse_non_scalar_fields,
        help = "Handling of non-scalar repository/tag fields: coerce or reject"
    )]
    pub non_scalar_fields: Option<NonScalarFields>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_non_scalar_fields(s: &str) -> Result<NonScalarFields, String> {
    s.parse::<NonScalarFields>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_extract_args() {
        let args = CliArgs::parse_from(["helmfile-values", "extract"]);
        match args.command {
            Commands::Extract(extract_args) => {
                assert!(extract_args.paths.is_empty());
                assert_eq!(extract_args.format, OutputFormatArg::Human);
                assert!(extract_args.output.is_none());
                assert!(!extract_args.nested_values);
                assert!(extract_args.non_scalar_fields.is_none());
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_extract_with_options() {
        let args = CliArgs::parse_from([
            "helmfile-values",
            "extract",
            "helmfile.yaml",
            "envs",
            "--format",
            "json",
            "--nested-values",
            "--non-scalar-fields",
            "reject",
            "-o",
            "out.json",
        ]);
        match args.command {
            Commands::Extract(extract_args) => {
                assert_eq!(
                    extract_args.paths,
                    vec![PathBuf::from("helmfile.yaml"), PathBuf::from("envs")]
                );
                assert_eq!(extract_args.format, OutputFormatArg::Json);
                assert!(extract_args.nested_values);
                assert_eq!(
                    extract_args.non_scalar_fields,
                    Some(NonScalarFields::Reject)
                );
                assert_eq!(extract_args.output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_invalid_non_scalar_policy() {
        let result = CliArgs::try_parse_from([
            "helmfile-values",
            "extract",
            "--non-scalar-fields",
            "drop",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["helmfile-values", "config", "-v", "--log-level", "trace"]);
        assert!(args.verbose);
        assert_eq!(args.log_level.as_deref(), Some("trace"));
        assert!(matches!(args.command, Commands::Config(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = CliArgs::try_parse_from(["helmfile-values", "extract", "-v", "-q"]);
        assert!(result.is_err());
    }
}
