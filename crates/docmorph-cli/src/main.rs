//! Docmorph CLI - convert documents and extract data with declarative rules
//!
//! This is the main entry point for the Docmorph CLI application, providing
//! commands for converting JSON/XML input, running rule groups against it,
//! evaluating ad-hoc queries and checking rule files.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    control::set_override(cli.use_color());

    // Load configuration before logging so its logging section applies
    let config = Config::load_with_file(cli.config.as_deref());

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, config));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output.unwrap_or(config.output.format);
    let mut output = OutputWriter::new(format, cli.use_color(), cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Extract(args) => handlers::handle_extract(args, &config, &mut output),
        Commands::Convert(args) => handlers::handle_convert(args, &config, &mut output),
        Commands::Query(args) => handlers::handle_query(args, &config, &mut output),
        Commands::Rules(args) => handlers::handle_rules(args, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_with_config(&config.logging, verbosity);
    }
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["docmorph", "-vv", "rules", "validate", "rules.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["docmorph", "--quiet", "rules", "validate", "rules.json"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_falls_back_to_config() {
        let mut config = Config::default();
        config.output.format = cli::OutputFormat::Yaml;

        let cli = Cli::parse_from(["docmorph", "convert", "in.json"]);
        assert_eq!(cli.output.unwrap_or(config.output.format), cli::OutputFormat::Yaml);

        let cli = Cli::parse_from(["docmorph", "-o", "json", "convert", "in.json"]);
        assert_eq!(cli.output.unwrap_or(config.output.format), cli::OutputFormat::Json);
    }
}
