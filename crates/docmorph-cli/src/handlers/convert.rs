//! Convert command handler

use super::build_service;
use super::utils::{read_input, save_document};
use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{info, instrument};

/// Handle the convert command
#[instrument(skip(config, output), fields(input = %args.input.display()))]
pub fn handle_convert(args: ConvertArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("convert_command");

    let data = read_input(&args.input)?;
    let service = build_service(config)?;
    let converted = service.convert(&data, args.mime.as_deref())?;
    info!(mime_type = %converted.source_mime_type, "Conversion completed");

    if let Some(path) = &args.save_to {
        save_document(path, &converted.object, config.output.pretty)?;
        output.info(&format!("Saved converted document to {}", path.display()))?;
    }

    output.info(&format!("Converted from {}", converted.source_mime_type))?;
    output.document(&converted.object)
}
