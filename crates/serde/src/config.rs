//! Configuration for the `fhir-convert` command.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FHIR_CONVERT_INPUT` | stdin | Input document path |
//! | `FHIR_CONVERT_OUTPUT` | stdout | Output document path |
//! | `FHIR_CONVERT_FROM` | detected | Input format (`json` or `xml`) |
//! | `FHIR_CONVERT_TO` | | Output format (`json` or `xml`) |
//! | `FHIR_CONVERT_PRETTY` | false | Indent the output |
//! | `FHIR_CONVERT_LOG_LEVEL` | warn | Log level |
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use helios_serde::Format;
//! use helios_serde::config::ConvertConfig;
//!
//! let config = ConvertConfig::parse_from(["fhir-convert", "patient.json", "--to", "xml"]);
//! assert_eq!(config.to, Format::Xml);
//! assert_eq!(config.from, None);
//! ```

use crate::convert::Format;
use clap::Parser;
use std::path::PathBuf;

/// Converts one FHIR resource document between JSON and XML.
#[derive(Debug, Clone, Parser)]
#[command(name = "fhir-convert")]
#[command(about = "Convert a FHIR resource between JSON and XML")]
pub struct ConvertConfig {
    /// Input document; stdin when omitted.
    #[arg(env = "FHIR_CONVERT_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long, env = "FHIR_CONVERT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Input format (json or xml); detected from the first byte when omitted.
    #[arg(long, env = "FHIR_CONVERT_FROM")]
    pub from: Option<Format>,

    /// Output format (json or xml).
    #[arg(long, env = "FHIR_CONVERT_TO")]
    pub to: Format,

    /// Indent the output.
    #[arg(long, env = "FHIR_CONVERT_PRETTY", default_value = "false")]
    pub pretty: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FHIR_CONVERT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl ConvertConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let (Some(input), Some(output)) = (&self.input, &self.output)
            && input == output
        {
            errors.push("Output file cannot be the input file".to_string());
        }

        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            errors.push(format!("Unknown log level `{}`", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Installs the `tracing` subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helios_serde={},fhir_convert={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
