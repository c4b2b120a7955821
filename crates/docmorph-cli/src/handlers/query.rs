//! Query command handler

use super::build_service;
use super::utils::read_input;
use crate::cli::QueryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use docmorph_core::query::{self, QueryPath};
use tracing::{debug, instrument};

/// Handle the query command
#[instrument(skip(config, output), fields(expression = %args.expression))]
pub fn handle_query(args: QueryArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("query_command");

    // Parse first so a bad expression is reported before reading input
    query::validate(&args.expression)?;
    let path = QueryPath::parse(&args.expression)?;

    let data = read_input(&args.input)?;
    let converted = build_service(config)?.convert(&data, args.mime.as_deref())?;

    let matches = path.evaluate(&converted.object);
    debug!(matches = matches.len(), "Query evaluated");
    output.matches(&matches)
}
