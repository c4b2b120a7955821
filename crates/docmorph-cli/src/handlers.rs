//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod convert;
mod extract;
mod query;
mod rules;
mod utils;

pub use completions::handle_completions;
pub use convert::handle_convert;
pub use extract::handle_extract;
pub use query::handle_query;
pub use rules::handle_rules;

use crate::config::Config;
use crate::error::Result;
use docmorph_converters::default_converters;
use docmorph_core::JsonPathExtractor;
use docmorph_service::DataProcessingService;

/// Build the processing service every command runs through
pub(crate) fn build_service(config: &Config) -> Result<DataProcessingService> {
    let mut builder = DataProcessingService::builder()
        .converters(default_converters())
        .extractor(JsonPathExtractor::new());

    if let Some(name) = &config.default_extractor {
        builder = builder.default_extractor(name.clone());
    }

    Ok(builder.build()?)
}
