//! `fhir-convert`: translate one FHIR resource document between JSON and XML.

use anyhow::Context;
use clap::Parser;
use helios_fhir::Resource;
use helios_serde::convert::{Format, read_resource, write_resource};
use helios_serde::{ConvertConfig, init_logging};
use std::io::{Read, Write};
use tracing::{debug, info};

fn read_input(config: &ConvertConfig) -> anyhow::Result<Vec<u8>> {
    match &config.input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn write_output(config: &ConvertConfig, output: &str) -> anyhow::Result<()> {
    match &config.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = ConvertConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let input = read_input(&config)?;
    let from = match config.from {
        Some(format) => format,
        None => Format::detect(&input)
            .context("Cannot detect the input format; pass --from json or --from xml")?,
    };
    debug!(bytes = input.len(), from = %from, "Read input");

    let resource = read_resource(&input, from)
        .with_context(|| format!("Failed to decode {} input", from))?;
    let output = write_resource(&resource, config.to, config.pretty)
        .with_context(|| format!("Failed to encode {} output", config.to))?;
    write_output(&config, &output)?;

    info!(
        resource_type = resource.resource_type(),
        resource_id = ?resource.as_resource().resource_id(),
        from = %from,
        to = %config.to,
        "Converted resource"
    );
    Ok(())
}
