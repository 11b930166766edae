//! CLI logic for the metamodel tool.
//!
//! Loads a metamodel file, resolves it and writes its outline.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io::Write};

use log::info;

use metamodel::{Loader, MetamodelError};

/// Run the metamodel CLI application
///
/// Parses the input file and writes the rendered outline to the output
/// file, or to stdout when no output path is given.
///
/// # Errors
///
/// Returns `MetamodelError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
pub fn run(args: &Args) -> Result<(), MetamodelError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing metamodel"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let loader = Loader::new(app_config);
    let model = loader.load(&args.input)?;
    let outline = loader.render_outline(&model);

    match &args.output {
        Some(path) => {
            fs::write(path, outline)?;
            info!(output_file = path; "Outline written successfully");
        }
        None => {
            std::io::stdout().lock().write_all(outline.as_bytes())?;
        }
    }

    Ok(())
}
