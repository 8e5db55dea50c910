use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for `schemagen`.
#[derive(Debug, Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate typed client code from GraphQL introspection", long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate code for every target in a configuration file
    #[command(about = "Fetch schemas and generate code for every configured target")]
    Generate {
        /// TOML file with one `[[targets]]` table per endpoint
        #[arg(short, long, default_value = "schemagen.toml", help = "Target configuration file")]
        config: PathBuf,
    },

    /// Validate an existing source file
    #[command(about = "Run the generated-code checks on an existing file")]
    Validate {
        /// Source file to check
        #[arg(help = "Source file to validate")]
        file: PathBuf,

        /// Rule ids whose failures are tolerated
        #[arg(short, long, value_delimiter = ',', help = "Rules to ignore, e.g. SEMICOLON_TERMINATION")]
        ignore: Vec<String>,

        /// Language of the file, for diagnostics
        #[arg(short, long, default_value = "Java", help = "Language of the source file")]
        language: String,

        /// Where to write the error report when validation fails
        #[arg(short, long, help = "Write the error report to this file on failure")]
        report: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_generate_defaults_config_path() {
        let cli = Cli::try_parse_from(["schemagen", "generate"]).unwrap();
        let Commands::Generate { config } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(config, PathBuf::from("schemagen.toml"));
    }

    #[test]
    fn test_validate_splits_ignore_list() {
        let cli = Cli::try_parse_from([
            "schemagen",
            "validate",
            "Api.java",
            "--ignore",
            "BASIC_SYNTAX,semicolon_termination",
            "--report",
            "out/report.txt",
        ])
        .unwrap();
        let Commands::Validate {
            file,
            ignore,
            language,
            report,
        } = cli.command
        else {
            panic!("expected validate");
        };
        assert_eq!(file, PathBuf::from("Api.java"));
        assert_eq!(ignore, vec!["BASIC_SYNTAX", "semicolon_termination"]);
        assert_eq!(language, "Java");
        assert_eq!(report, Some(PathBuf::from("out/report.txt")));
    }

    #[test]
    fn test_validate_requires_file() {
        let err = Cli::try_parse_from(["schemagen", "validate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
