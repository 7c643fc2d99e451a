//! CLI logic for the Protractor diagram tool.
//!
//! Reads a diagram request document, renders it and writes either an SVG
//! document or the scene as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::info;

use protractor::{DiagramBuilder, ProtractorError};

/// Run the Protractor CLI application
///
/// # Errors
///
/// Returns `ProtractorError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed request documents
/// - Export errors
pub fn run(args: &Args) -> Result<(), ProtractorError> {
    let output = args.output_path();
    info!(
        input_path = args.input,
        output_path = output.as_str(),
        format:? = args.format;
        "Processing diagram request"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let scene = builder.render_request(&source)?;

    let text = match args.format {
        OutputFormat::Svg => builder.render_svg(&scene)?,
        OutputFormat::Json => serde_json::to_string_pretty(&scene)
            .map_err(|err| ProtractorError::Export(err.to_string()))?,
    };

    fs::write(&output, text)?;

    info!(output_file = output.as_str(); "Diagram exported successfully");

    Ok(())
}
